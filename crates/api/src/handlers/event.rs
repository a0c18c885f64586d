//! Handlers for events on a work's timeline.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::error::CoreError;
use fabula_core::linking::ensure_same_work;
use fabula_core::types::DbId;
use fabula_db::models::event::{CreateEvent, Event, UpdateEvent};
use fabula_db::models::location_in_work::LocationInWork;
use fabula_db::models::work::Work;
use fabula_db::ownership::OwnedEntity;
use fabula_db::repositories::EventRepo;

use crate::access::{delete_owned, require_owned};
use crate::error::AppResult;
use crate::extract::{ValidPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// An event may only take place at a location linked into its own work.
async fn check_location(
    state: &AppState,
    owner_id: DbId,
    work_id: DbId,
    location_in_work_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(link_id) = location_in_work_id {
        let link = require_owned::<LocationInWork>(state, link_id, owner_id).await?;
        ensure_same_work("Location", work_id, link.work_id)?;
    }
    Ok(())
}

/// GET /api/works/{id}/events
///
/// Ordered by `ord`, then creation time.
pub async fn list_by_work(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<Event>>> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    let events = EventRepo::list_by_work(&state.pool, work.id).await?;
    Ok(Json(events))
}

/// POST /api/works/{id}/events
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    check_location(&state, auth.user_id, work.id, input.location_in_work_id).await?;
    let event = EventRepo::create(&state.pool, work.id, &input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /api/events/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Event>> {
    let event = require_owned::<Event>(&state, id, auth.user_id).await?;
    Ok(Json(event))
}

/// PATCH /api/events/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateEvent>,
) -> AppResult<Json<Event>> {
    let event = require_owned::<Event>(&state, id, auth.user_id).await?;
    check_location(&state, auth.user_id, event.work_id, input.location_in_work_id.flatten()).await?;
    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::forbidden(Event::ENTITY))?;
    Ok(Json(event))
}

/// DELETE /api/events/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<Event>(&state, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
