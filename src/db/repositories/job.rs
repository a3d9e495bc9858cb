use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::entities::job_listings;

#[derive(Debug, Clone, Deserialize)]
pub struct JobListingInput {
    pub title: String,
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub location: Option<String>,
    #[serde(default = "default_open")]
    pub open: bool,
}

const fn default_open() -> bool {
    true
}

pub struct JobRepository {
    conn: DatabaseConnection,
}

impl JobRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, open_only: bool) -> Result<Vec<job_listings::Model>> {
        let mut query =
            job_listings::Entity::find().order_by_desc(job_listings::Column::CreatedAt);

        if open_only {
            query = query.filter(job_listings::Column::Open.eq(true));
        }

        query
            .all(&self.conn)
            .await
            .context("Failed to list job listings")
    }

    pub async fn get(&self, id: i32) -> Result<Option<job_listings::Model>> {
        job_listings::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query job listing")
    }

    pub async fn create(&self, input: JobListingInput) -> Result<job_listings::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = job_listings::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            job_type: Set(input.job_type),
            location: Set(input.location),
            open: Set(input.open),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert job listing")
    }

    pub async fn update(
        &self,
        id: i32,
        input: JobListingInput,
    ) -> Result<Option<job_listings::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: job_listings::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.description = Set(input.description);
        active.job_type = Set(input.job_type);
        active.location = Set(input.location);
        active.open = Set(input.open);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update job listing")?;

        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = job_listings::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete job listing")?;

        Ok(result.rows_affected > 0)
    }
}
