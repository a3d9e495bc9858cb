use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::entities::courses;

#[derive(Debug, Clone, Deserialize)]
pub struct CourseInput {
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
    pub course_link: Option<String>,
    pub category: Option<String>,
    pub course_type: Option<String>,
}

pub struct CourseRepository {
    conn: DatabaseConnection,
}

impl CourseRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, published_only: bool) -> Result<Vec<courses::Model>> {
        let mut query = courses::Entity::find().order_by_asc(courses::Column::Title);

        if published_only {
            query = query.filter(courses::Column::Published.eq(true));
        }

        query.all(&self.conn).await.context("Failed to list courses")
    }

    pub async fn get(&self, id: i32) -> Result<Option<courses::Model>> {
        courses::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query course")
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<courses::Model>> {
        courses::Entity::find()
            .filter(courses::Column::Slug.eq(slug))
            .one(&self.conn)
            .await
            .context("Failed to query course by slug")
    }

    pub async fn create(&self, input: CourseInput) -> Result<courses::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = courses::ActiveModel {
            title: Set(input.title),
            slug: Set(input.slug),
            summary: Set(input.summary),
            body: Set(input.body),
            image_url: Set(input.image_url),
            published: Set(input.published),
            course_link: Set(input.course_link),
            category: Set(input.category),
            course_type: Set(input.course_type),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(&self.conn).await.context("Failed to insert course")
    }

    pub async fn update(&self, id: i32, input: CourseInput) -> Result<Option<courses::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: courses::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.slug = Set(input.slug);
        active.summary = Set(input.summary);
        active.body = Set(input.body);
        active.image_url = Set(input.image_url);
        active.published = Set(input.published);
        active.course_link = Set(input.course_link);
        active.category = Set(input.category);
        active.course_type = Set(input.course_type);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update course")?;

        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = courses::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete course")?;

        Ok(result.rows_affected > 0)
    }
}
