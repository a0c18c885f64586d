//! Signed token generation and validation.
//!
//! Every token is an HS256 JWT carrying a [`Claims`] payload. A valid
//! signature is necessary but not sufficient: the token's SHA-256 hash must
//! also be present in the `tokens` table, which is what makes revocation and
//! one-shot consumption possible.

use chrono::{Duration, Utc};
use fabula_core::scopes::TokenScope;
use fabula_core::types::{DbId, Timestamp};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the owning user's id.
    pub sub: DbId,
    /// What the token may be used for.
    pub scope: TokenScope,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier, so two tokens issued in the same second differ.
    pub jti: String,
}

/// Signing secret and lifetimes per scope.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session (`*`) token lifetime in hours (default: 168).
    pub session_ttl_hours: i64,
    /// Password reset token lifetime in minutes (default: 30).
    pub password_reset_ttl_mins: i64,
    /// Email verification token lifetime in hours (default: 24).
    pub email_verify_ttl_hours: i64,
}

const DEFAULT_SESSION_TTL_HOURS: i64 = 168;
const DEFAULT_PASSWORD_RESET_TTL_MINS: i64 = 30;
const DEFAULT_EMAIL_VERIFY_TTL_HOURS: i64 = 24;

impl JwtConfig {
    /// Load token configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `SESSION_TTL_HOURS`        | no       | `168`   |
    /// | `PASSWORD_RESET_TTL_MINS`  | no       | `30`    |
    /// | `EMAIL_VERIFY_TTL_HOURS`   | no       | `24`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_ttl_hours: i64 = std::env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_HOURS.to_string())
            .parse()
            .expect("SESSION_TTL_HOURS must be a valid i64");

        let password_reset_ttl_mins: i64 = std::env::var("PASSWORD_RESET_TTL_MINS")
            .unwrap_or_else(|_| DEFAULT_PASSWORD_RESET_TTL_MINS.to_string())
            .parse()
            .expect("PASSWORD_RESET_TTL_MINS must be a valid i64");

        let email_verify_ttl_hours: i64 = std::env::var("EMAIL_VERIFY_TTL_HOURS")
            .unwrap_or_else(|_| DEFAULT_EMAIL_VERIFY_TTL_HOURS.to_string())
            .parse()
            .expect("EMAIL_VERIFY_TTL_HOURS must be a valid i64");

        Self {
            secret,
            session_ttl_hours,
            password_reset_ttl_mins,
            email_verify_ttl_hours,
        }
    }

    /// Lifetime of a freshly issued token of the given scope.
    pub fn ttl(&self, scope: TokenScope) -> Duration {
        match scope {
            TokenScope::Session => Duration::hours(self.session_ttl_hours),
            TokenScope::PasswordReset => Duration::minutes(self.password_reset_ttl_mins),
            TokenScope::EmailVerify => Duration::hours(self.email_verify_ttl_hours),
        }
    }
}

/// Sign a token for `user_id` with the given scope.
///
/// Returns the encoded token and its expiry instant.
pub fn generate_token(
    user_id: DbId,
    scope: TokenScope,
    config: &JwtConfig,
) -> Result<(String, Timestamp), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expires_at = now + config.ttl(scope);

    let claims = Claims {
        sub: user_id,
        scope,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok((token, expires_at))
}

/// Check the signature and expiry of a token, returning its [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// SHA-256 hex digest of a token, the form in which it is stored.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
