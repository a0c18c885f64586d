//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use fabula_core::types::DbId;

use crate::auth::tokens::authenticate;
use crate::error::AppError;
use crate::state::AppState;

/// The user behind a valid, unrevoked session token.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The owning user's id.
    pub user_id: DbId,
    /// Id of the stored token, for revoking this session alone.
    pub token_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Header problems are rejected before the store is consulted.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                tracing::debug!("Rejected request: missing Authorization header");
                AppError::unauthorized()
            })?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::debug!("Rejected request: malformed Authorization header");
                AppError::unauthorized()
            })?;

        let row = authenticate(&state.pool, &state.config.jwt, token).await?;

        Ok(AuthUser {
            user_id: row.owner_id,
            token_id: row.id,
        })
    }
}
