use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, EntityTrait, Set};
use std::collections::HashMap;

use crate::entities::settings;

pub struct SettingsRepository {
    conn: DatabaseConnection,
}

impl SettingsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn all(&self) -> Result<HashMap<String, String>> {
        let rows = settings::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list settings")?;

        Ok(rows.into_iter().map(|row| (row.name, row.value)).collect())
    }

    pub async fn get(&self, name: &str) -> Result<Option<String>> {
        let row = settings::Entity::find_by_id(name)
            .one(&self.conn)
            .await
            .context("Failed to query setting")?;

        Ok(row.map(|r| r.value))
    }

    pub async fn set(&self, name: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = settings::Entity::find_by_id(name)
            .one(&self.conn)
            .await
            .context("Failed to query setting for upsert")?;

        if let Some(row) = existing {
            let mut active: settings::ActiveModel = row.into();
            active.value = Set(value.to_string());
            active.updated_at = Set(now);
            active.update(&self.conn).await?;
        } else {
            let active = settings::ActiveModel {
                name: ActiveValue::Set(name.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
            };
            active.insert(&self.conn).await?;
        }

        Ok(())
    }
}
