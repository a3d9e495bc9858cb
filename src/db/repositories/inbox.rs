//! Contact messages and job applications submitted through the public site.

use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::entities::{applications, messages};

#[derive(Debug, Clone, Deserialize)]
pub struct MessageInput {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: String,
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
}

pub struct InboxRepository {
    conn: DatabaseConnection,
}

impl InboxRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn add_message(&self, input: MessageInput) -> Result<messages::Model> {
        let active = messages::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            subject: Set(input.subject),
            body: Set(input.body),
            read: Set(false),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active.insert(&self.conn).await.context("Failed to insert message")
    }

    pub async fn list_messages(&self, unread_only: bool) -> Result<Vec<messages::Model>> {
        let mut query = messages::Entity::find().order_by_desc(messages::Column::CreatedAt);

        if unread_only {
            query = query.filter(messages::Column::Read.eq(false));
        }

        query.all(&self.conn).await.context("Failed to list messages")
    }

    pub async fn mark_message_read(&self, id: i32) -> Result<bool> {
        let Some(message) = messages::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query message")?
        else {
            return Ok(false);
        };

        let mut active: messages::ActiveModel = message.into();
        active.read = Set(true);
        active.update(&self.conn).await?;

        Ok(true)
    }

    pub async fn delete_message(&self, id: i32) -> Result<bool> {
        let result = messages::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete message")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn add_application(&self, input: ApplicationInput) -> Result<applications::Model> {
        let active = applications::ActiveModel {
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            position: Set(input.position),
            resume_url: Set(input.resume_url),
            cover_letter: Set(input.cover_letter),
            status: Set("new".to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert application")
    }

    pub async fn list_applications(&self) -> Result<Vec<applications::Model>> {
        applications::Entity::find()
            .order_by_desc(applications::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list applications")
    }

    pub async fn update_application_status(&self, id: i32, status: &str) -> Result<bool> {
        let Some(application) = applications::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query application")?
        else {
            return Ok(false);
        };

        let mut active: applications::ActiveModel = application.into();
        active.status = Set(status.to_string());
        active.update(&self.conn).await?;

        Ok(true)
    }
}
