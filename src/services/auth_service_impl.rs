//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::config::SecurityConfig;
use crate::db::{Account, Store};
use crate::services::auth_service::{AuthError, AuthService, LoginResult};
use crate::services::password;
use crate::services::token::TokenCodec;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenCodec,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: TokenCodec, security: SecurityConfig) -> Self {
        Self {
            store,
            tokens,
            security,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let account = self
            .store
            .authenticate_account(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self
            .tokens
            .issue(account.id, &account.username)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))?;

        Ok(LoginResult { account, token })
    }

    async fn resolve_token(&self, token: &str) -> Option<Account> {
        let claims = self.tokens.verify(token)?;

        match self.store.get_account_by_id(claims.sub).await {
            Ok(account) => account,
            Err(e) => {
                debug!("Identity lookup failed for account {}: {e}", claims.sub);
                None
            }
        }
    }

    async fn create_account(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<Account, AuthError> {
        if username.is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }
        if password.len() < 8 {
            return Err(AuthError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        self.store
            .create_account(username, password, email, name, &self.security)
            .await?
            .ok_or(AuthError::UsernameTaken)
    }

    async fn change_password(
        &self,
        id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.len() < 8 {
            return Err(AuthError::Validation(
                "New password must be at least 8 characters".to_string(),
            ));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let stored_hash = self
            .store
            .account_password_hash(id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let is_valid = password::verify_password_blocking(current_password, &stored_hash).await?;
        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_account_password(id, new_password, &self.security)
            .await?;

        Ok(())
    }
}
