use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::entities::posts;

#[derive(Debug, Clone, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub body: Option<String>,
    pub cover_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

pub struct PostRepository {
    conn: DatabaseConnection,
}

impl PostRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, published_only: bool) -> Result<Vec<posts::Model>> {
        let mut query = posts::Entity::find().order_by_desc(posts::Column::CreatedAt);

        if published_only {
            query = query.filter(posts::Column::Published.eq(true));
        }

        query.all(&self.conn).await.context("Failed to list posts")
    }

    pub async fn get(&self, id: i32) -> Result<Option<posts::Model>> {
        posts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query post")
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<posts::Model>> {
        posts::Entity::find()
            .filter(posts::Column::Slug.eq(slug))
            .one(&self.conn)
            .await
            .context("Failed to query post by slug")
    }

    pub async fn create(&self, input: PostInput) -> Result<posts::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = posts::ActiveModel {
            title: Set(input.title),
            slug: Set(input.slug),
            excerpt: Set(input.excerpt),
            body: Set(input.body),
            cover_url: Set(input.cover_url),
            published: Set(input.published),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        active.insert(&self.conn).await.context("Failed to insert post")
    }

    pub async fn update(&self, id: i32, input: PostInput) -> Result<Option<posts::Model>> {
        let Some(existing) = self.get(id).await? else {
            return Ok(None);
        };

        let mut active: posts::ActiveModel = existing.into();
        active.title = Set(input.title);
        active.slug = Set(input.slug);
        active.excerpt = Set(input.excerpt);
        active.body = Set(input.body);
        active.cover_url = Set(input.cover_url);
        active.published = Set(input.published);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update post")?;

        Ok(Some(updated))
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = posts::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete post")?;

        Ok(result.rows_affected > 0)
    }
}
