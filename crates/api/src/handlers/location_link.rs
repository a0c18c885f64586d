//! Handlers for location links (locations linked into a work).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::error::CoreError;
use fabula_core::types::DbId;
use fabula_db::availability::{self, WORK_LOCATIONS};
use fabula_db::models::location::Location;
use fabula_db::models::location_in_work::{
    CreateLocationInWork, LocationInWork, UpdateLocationInWork,
};
use fabula_db::models::work::Work;
use fabula_db::ownership::OwnedEntity;
use fabula_db::repositories::LocationInWorkRepo;

use crate::access::{delete_owned, require_owned};
use crate::error::AppResult;
use crate::extract::{ValidPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/works/{id}/locations
pub async fn list_by_work(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<LocationInWork>>> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    let links = LocationInWorkRepo::list_by_work(&state.pool, work.id).await?;
    Ok(Json(links))
}

/// POST /api/works/{id}/locations
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<CreateLocationInWork>,
) -> AppResult<(StatusCode, Json<LocationInWork>)> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    require_owned::<Location>(&state, input.location_id, auth.user_id).await?;
    let link = LocationInWorkRepo::create(&state.pool, work.id, &input).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// GET /api/works/{id}/locations/available
///
/// The caller's locations not yet linked into this work.
pub async fn list_available(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<Location>>> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    let locations = availability::list_available::<Location>(
        &state.pool,
        &WORK_LOCATIONS,
        auth.user_id,
        work.id,
    )
    .await?;
    Ok(Json(locations))
}

/// GET /api/location-links/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<LocationInWork>> {
    let link = require_owned::<LocationInWork>(&state, id, auth.user_id).await?;
    Ok(Json(link))
}

/// PATCH /api/location-links/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateLocationInWork>,
) -> AppResult<Json<LocationInWork>> {
    require_owned::<LocationInWork>(&state, id, auth.user_id).await?;
    let link = LocationInWorkRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::forbidden(LocationInWork::ENTITY))?;
    Ok(Json(link))
}

/// DELETE /api/location-links/{id}
///
/// Events placed at this link keep existing without a location.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<LocationInWork>(&state, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
