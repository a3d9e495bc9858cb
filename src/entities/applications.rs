use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Job/program applications submitted through the public apply form.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub email: String,

    pub phone: Option<String>,

    pub position: String,

    pub resume_url: Option<String>,

    pub cover_letter: Option<String>,

    /// "new", "reviewed" or "archived".
    pub status: String,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
