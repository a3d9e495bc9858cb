//! Stateless signed auth tokens.
//!
//! Validity is determined entirely by the HMAC signature plus the expiry
//! baked into the signed payload; the server keeps no session table and
//! cannot revoke an individual token before it expires.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::SecurityConfig;

/// Fallback used when no signing secret is configured. Insecure by
/// construction; the codec warns at startup rather than refusing to start.
pub const DEFAULT_INSECURE_SECRET: &str = "infinityx-insecure-default-secret-change-me";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: i32,

    pub username: String,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,

    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    #[must_use]
    pub fn new(config: &SecurityConfig) -> Self {
        let secret = if config.jwt_secret.is_empty() {
            warn!("JWT_SECRET is not set; falling back to the insecure default secret");
            DEFAULT_INSECURE_SECRET
        } else {
            config.jwt_secret.as_str()
        };

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(config.token_ttl_days),
        }
    }

    /// Sign a token for an authenticated account.
    pub fn issue(&self, account_id: i32, username: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id,
            username: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }

    /// Decode and validate a token. Any failure (bad signature, malformed
    /// input, past expiry) yields `None`; nothing escapes this boundary.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .ok()
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}
