use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::entities::programs;

#[derive(Debug, Clone, Deserialize)]
pub struct ProgramInput {
    pub title: String,
    pub title_ar: Option<String>,
    pub description: Option<String>,
    pub description_ar: Option<String>,
    pub image_url: Option<String>,
    pub duration: Option<String>,
    pub skills: Option<String>,
    pub category: String,
}

pub struct ProgramRepository {
    conn: DatabaseConnection,
}

impl ProgramRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, category: Option<&str>) -> Result<Vec<programs::Model>> {
        let mut query = programs::Entity::find().order_by_asc(programs::Column::Title);

        if let Some(category) = category {
            query = query.filter(programs::Column::Category.eq(category));
        }

        query.all(&self.conn).await.context("Failed to list programs")
    }

    pub async fn get(&self, id: i32) -> Result<Option<programs::Model>> {
        programs::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query program")
    }

    pub async fn create(&self, input: ProgramInput) -> Result<programs::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = programs::ActiveModel {
            title: Set(input.title),
            title_ar: Set(input.title_ar),
            description: Set(input.description),
            description_ar: Set(input.description_ar),
            image_url: Set(input.image_url),
            duration: Set(input.duration),
            skills: Set(input.skills),
            category: Set(input.category),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(&self.conn).await.context("Failed to insert program")
    }

    pub async fn update(&self, id: i32, input: ProgramInput) -> Result<Option<programs::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: programs::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.title_ar = Set(input.title_ar);
        active.description = Set(input.description);
        active.description_ar = Set(input.description_ar);
        active.image_url = Set(input.image_url);
        active.duration = Set(input.duration);
        active.skills = Set(input.skills);
        active.category = Set(input.category);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update program")?;

        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = programs::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete program")?;

        Ok(result.rows_affected > 0)
    }
}
