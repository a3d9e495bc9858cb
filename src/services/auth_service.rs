//! Domain service for administrator authentication and account management.

use thiserror::Error;

use crate::db::Account;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Recoverable: the caller picked a username that already exists.
    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Successful login: the sanitized account plus a freshly signed token.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub account: Account,
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials, records the login time, and mints a token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown username and
    /// a wrong password alike; callers cannot tell the two apart.
    async fn login(&self, username: &str, password: &str) -> Result<LoginResult, AuthError>;

    /// The session-resolver core: decode a bearer token and load the account
    /// it names. Every failure mode (bad signature, expiry, deleted account,
    /// database error) collapses to `None`; this never fails a request.
    async fn resolve_token(&self, token: &str) -> Option<Account>;

    /// Creates a new administrator account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] when the username exists.
    async fn create_account(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<Account, AuthError>;

    /// Changes an account's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is incorrect
    /// or the new password is unacceptable.
    async fn change_password(
        &self,
        id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
