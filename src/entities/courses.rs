use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(unique)]
    pub slug: String,

    pub summary: Option<String>,

    pub body: Option<String>,

    pub image_url: Option<String>,

    pub published: bool,

    /// External enrolment link, added by a startup migration.
    pub course_link: Option<String>,

    /// Added by a startup migration.
    pub category: Option<String>,

    /// Added by a startup migration.
    pub course_type: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
