//! Issuing, checking and consuming stored, scoped tokens.
//!
//! A token is honoured only when all of these hold: the signature verifies
//! and has not expired, its scope is the one the endpoint requires, and its
//! hash is still present in the `tokens` table. Every failure produces the
//! same [`AppError::unauthorized`]; the specific reason goes to the log.

use fabula_core::scopes::TokenScope;
use fabula_core::types::{DbId, Timestamp};
use fabula_db::models::token::{CreateToken, Token};
use fabula_db::repositories::TokenRepo;
use sqlx::{PgExecutor, PgPool};

use crate::auth::jwt::{generate_token, hash_token, validate_token, Claims, JwtConfig};
use crate::error::{AppError, AppResult};

/// A freshly issued token. `token` is shown to its owner exactly once.
#[derive(Debug)]
pub struct IssuedToken {
    pub id: DbId,
    pub token: String,
    pub expires_at: Timestamp,
}

/// Sign a token for `owner_id` and store its hash.
pub async fn issue<'e, E>(
    executor: E,
    config: &JwtConfig,
    owner_id: DbId,
    scope: TokenScope,
) -> AppResult<IssuedToken>
where
    E: PgExecutor<'e>,
{
    let (token, expires_at) = generate_token(owner_id, scope, config)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let input = CreateToken {
        owner_id,
        token_hash: hash_token(&token),
        scope,
        expires_at,
    };
    let row = TokenRepo::create(executor, &input).await?;

    Ok(IssuedToken {
        id: row.id,
        token,
        expires_at: row.expires_at,
    })
}

/// Verify signature, expiry and scope without touching the store.
fn checked_claims(token: &str, scope: TokenScope, config: &JwtConfig) -> AppResult<Claims> {
    let claims = validate_token(token, config).map_err(|e| {
        tracing::debug!(error = %e, "Rejected token: bad signature or expired");
        AppError::unauthorized()
    })?;
    if claims.scope != scope {
        tracing::warn!(
            user_id = %claims.sub,
            presented = %claims.scope,
            required = %scope,
            "Rejected token: wrong scope"
        );
        return Err(AppError::unauthorized());
    }
    Ok(claims)
}

/// Resolve a session (`*`) token to its stored row.
pub async fn authenticate(pool: &PgPool, config: &JwtConfig, token: &str) -> AppResult<Token> {
    let claims = checked_claims(token, TokenScope::Session, config)?;
    let row = TokenRepo::find_active(pool, &hash_token(token), TokenScope::Session)
        .await?
        .filter(|row| row.owner_id == claims.sub)
        .ok_or_else(|| {
            tracing::debug!(user_id = %claims.sub, "Rejected token: revoked or unknown");
            AppError::unauthorized()
        })?;
    Ok(row)
}

/// Delete a one-shot token and return its row.
///
/// Run this on the transaction that applies the token's effect, so the
/// token survives if the effect fails and cannot be used twice if it succeeds.
pub async fn consume<'e, E>(
    executor: E,
    config: &JwtConfig,
    token: &str,
    scope: TokenScope,
) -> AppResult<Token>
where
    E: PgExecutor<'e>,
{
    let claims = checked_claims(token, scope, config)?;
    let row = TokenRepo::take(executor, &hash_token(token), scope)
        .await?
        .filter(|row| row.owner_id == claims.sub)
        .ok_or_else(|| {
            tracing::debug!(user_id = %claims.sub, %scope, "Rejected token: already used or revoked");
            AppError::unauthorized()
        })?;
    Ok(row)
}
