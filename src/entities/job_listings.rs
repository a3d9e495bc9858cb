use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Open positions shown on the careers page.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "job_listings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub description: Option<String>,

    /// Employment type ("Full-time", "Part-time", ...).
    pub job_type: Option<String>,

    pub location: Option<String>,

    /// Closed listings stay in the database but leave the public page.
    pub open: bool,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
