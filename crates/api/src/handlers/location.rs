//! Handlers for the `/locations` resource and its parent/child tree.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::error::CoreError;
use fabula_core::linking::{ensure_acyclic, ensure_distinct};
use fabula_core::types::DbId;
use fabula_db::models::location::{AttachChild, CreateLocation, Location, UpdateLocation};
use fabula_db::ownership::{OwnedEntity, OwnedRepo};
use fabula_db::repositories::LocationRepo;

use crate::access::{delete_owned, require_owned};
use crate::error::AppResult;
use crate::extract::{ValidPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/locations
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateLocation>,
) -> AppResult<(StatusCode, Json<Location>)> {
    if let Some(parent_id) = input.parent_id {
        require_owned::<Location>(&state, parent_id, auth.user_id).await?;
    }
    let location = LocationRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

/// GET /api/locations
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<Location>>> {
    let locations = OwnedRepo::list_owned::<Location>(&state.pool, auth.user_id).await?;
    Ok(Json(locations))
}

/// GET /api/locations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Location>> {
    let location = require_owned::<Location>(&state, id, auth.user_id).await?;
    Ok(Json(location))
}

/// PATCH /api/locations/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateLocation>,
) -> AppResult<Json<Location>> {
    require_owned::<Location>(&state, id, auth.user_id).await?;
    let location = LocationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::forbidden(Location::ENTITY))?;
    Ok(Json(location))
}

/// DELETE /api/locations/{id}
///
/// The whole subtree goes with it, along with the work links of every
/// removed location.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<Location>(&state, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/locations/{id}/children
pub async fn list_children(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Vec<Location>>> {
    let parent = require_owned::<Location>(&state, id, auth.user_id).await?;
    let children = LocationRepo::list_children(&state.pool, parent.id).await?;
    Ok(Json(children))
}

/// POST /api/locations/{id}/children
///
/// Place an existing root location under `id`. 400 if that would make a
/// location its own ancestor, 409 if the child already has a parent.
pub async fn attach_child(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<AttachChild>,
) -> AppResult<Json<Location>> {
    let parent = require_owned::<Location>(&state, id, auth.user_id).await?;
    let child = require_owned::<Location>(&state, input.location_id, auth.user_id).await?;
    ensure_distinct("Location", parent.id, child.id)?;

    let mut tx = state.pool.begin().await?;
    LocationRepo::lock_tree(&mut *tx, auth.user_id).await?;
    let ancestors = LocationRepo::ancestors(&mut *tx, parent.id).await?;
    ensure_acyclic(child.id, &ancestors)?;
    let child = LocationRepo::attach_child(&mut *tx, parent.id, child.id)
        .await?
        .ok_or_else(|| CoreError::Conflict("Location already has a parent".into()))?;
    tx.commit().await?;

    tracing::info!(parent_id = %parent.id, child_id = %child.id, "Location attached");
    Ok(Json(child))
}

/// DELETE /api/locations/{id}/children/{child_id}
///
/// Detach a direct child, making it a root again.
pub async fn detach_child(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath((id, child_id)): ValidPath<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let parent = require_owned::<Location>(&state, id, auth.user_id).await?;
    if LocationRepo::detach_child(&state.pool, parent.id, child_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::forbidden(Location::ENTITY).into())
    }
}

/// GET /api/locations/{id}/children/available
///
/// Root locations that could be attached under `id` without a cycle.
pub async fn list_available_children(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Vec<Location>>> {
    let parent = require_owned::<Location>(&state, id, auth.user_id).await?;
    let locations =
        LocationRepo::list_available_children(&state.pool, auth.user_id, parent.id).await?;
    Ok(Json(locations))
}
