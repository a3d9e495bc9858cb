use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Training programs, each assigned to a school category. Title and
/// description carry an Arabic variant alongside the English one.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "programs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub title_ar: Option<String>,

    pub description: Option<String>,

    pub description_ar: Option<String>,

    pub image_url: Option<String>,

    pub duration: Option<String>,

    pub skills: Option<String>,

    /// School the program belongs to.
    pub category: String,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
