use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::debug;

use crate::config::SecurityConfig;
use crate::entities::accounts;
use crate::services::password;

/// Sanitized account projection. The password hash never appears here, so
/// nothing built from this type can leak it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub last_login_at: Option<String>,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            name: model.name,
            last_login_at: model.last_login_at,
        }
    }
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Account>> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account by id")?;

        Ok(account.map(Account::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;

        Ok(account.map(Account::from))
    }

    pub async fn count(&self) -> Result<u64> {
        accounts::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count accounts")
    }

    /// Check credentials for an account. Returns `None` for an unknown
    /// username and for a wrong password alike; only the server-side log
    /// distinguishes the two. Updates `last_login_at` on success.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<Account>> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account for authentication")?;

        let Some(account) = account else {
            debug!("Login attempt for unknown username: {username}");
            return Ok(None);
        };

        let is_valid = password::verify_password_blocking(password, &account.password_hash).await?;
        if !is_valid {
            debug!("Invalid password for username: {username}");
            return Ok(None);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let mut active: accounts::ActiveModel = account.into();
        active.last_login_at = Set(Some(now));
        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to record login time")?;

        Ok(Some(Account::from(updated)))
    }

    /// Insert a new account. Returns `None` when the username is already
    /// taken; that is a recoverable condition, not a failure.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
        name: Option<&str>,
        config: &SecurityConfig,
    ) -> Result<Option<Account>> {
        let password_hash = password::hash_password_blocking(password, config).await?;
        let now = chrono::Utc::now().to_rfc3339();

        let active = accounts::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            email: Set(email.map(str::to_string)),
            name: Set(name.map(str::to_string)),
            last_login_at: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(Account::from(model))),
            Err(e) if is_unique_violation(&e) => {
                debug!("Account creation skipped, username taken: {username}");
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to insert account"),
        }
    }

    /// Re-hash and overwrite the stored password.
    pub async fn update_password(
        &self,
        id: i32,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account for password update")?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {id}"))?;

        let new_hash = password::hash_password_blocking(new_password, config).await?;
        let now = chrono::Utc::now().to_rfc3339();

        let mut active: accounts::ActiveModel = account.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Fetch the stored hash for current-password verification. Kept out of
    /// the public `Account` projection on purpose.
    pub(crate) async fn password_hash_by_id(&self, id: i32) -> Result<Option<String>> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account hash")?;

        Ok(account.map(|a| a.password_hash))
    }
}

/// Unique-constraint violations surface with driver-specific wording; both
/// the sqlite and postgres spellings are covered.
fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("UNIQUE constraint failed")
        || msg.contains("duplicate key")
        || msg.contains("23505")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_unique_violation_detection() {
        let sqlite = DbErr::Custom("UNIQUE constraint failed: accounts.username".to_string());
        assert!(is_unique_violation(&sqlite));

        let postgres = DbErr::Custom(
            "duplicate key value violates unique constraint \"accounts_username_key\"".to_string(),
        );
        assert!(is_unique_violation(&postgres));

        let other = DbErr::Custom("no such table: accounts".to_string());
        assert!(!is_unique_violation(&other));
    }
}
