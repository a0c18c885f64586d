//! Handlers for the `/works` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::error::CoreError;
use fabula_core::types::DbId;
use fabula_db::models::work::{CreateWork, UpdateWork, Work};
use fabula_db::ownership::{OwnedEntity, OwnedRepo};
use fabula_db::repositories::WorkRepo;

use crate::access::{delete_owned, require_owned};
use crate::error::AppResult;
use crate::extract::{ValidPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/works
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateWork>,
) -> AppResult<(StatusCode, Json<Work>)> {
    let work = WorkRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(work)))
}

/// GET /api/works
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<Work>>> {
    let works = OwnedRepo::list_owned::<Work>(&state.pool, auth.user_id).await?;
    Ok(Json(works))
}

/// GET /api/works/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Work>> {
    let work = require_owned::<Work>(&state, id, auth.user_id).await?;
    Ok(Json(work))
}

/// PATCH /api/works/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateWork>,
) -> AppResult<Json<Work>> {
    require_owned::<Work>(&state, id, auth.user_id).await?;
    let work = WorkRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::forbidden(Work::ENTITY))?;
    Ok(Json(work))
}

/// DELETE /api/works/{id}
///
/// Cast entries, location links, events, participants and relationships of
/// the work are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<Work>(&state, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
