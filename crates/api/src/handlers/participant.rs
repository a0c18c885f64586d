//! Handlers for event participants.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::linking::ensure_same_work;
use fabula_core::types::DbId;
use fabula_db::availability::{self, EVENT_PARTICIPANTS};
use fabula_db::models::character_in_work::CharacterInWork;
use fabula_db::models::event::Event;
use fabula_db::models::event_participant::{CreateEventParticipant, EventParticipant};
use fabula_db::repositories::EventParticipantRepo;

use crate::access::{delete_owned, require_owned};
use crate::error::AppResult;
use crate::extract::{ValidPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/events/{id}/participants
pub async fn list_by_event(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(event_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<EventParticipant>>> {
    let event = require_owned::<Event>(&state, event_id, auth.user_id).await?;
    let participants = EventParticipantRepo::list_by_event(&state.pool, event.id).await?;
    Ok(Json(participants))
}

/// POST /api/events/{id}/participants
///
/// The cast entry must belong to the event's work.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(event_id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<CreateEventParticipant>,
) -> AppResult<(StatusCode, Json<EventParticipant>)> {
    let event = require_owned::<Event>(&state, event_id, auth.user_id).await?;
    let entry =
        require_owned::<CharacterInWork>(&state, input.character_in_work_id, auth.user_id).await?;
    ensure_same_work("Cast entry", event.work_id, entry.work_id)?;

    let participant =
        EventParticipantRepo::create(&state.pool, event.id, event.work_id, entry.id).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// GET /api/events/{id}/participants/available
///
/// Cast entries of the event's work not yet taking part in it.
pub async fn list_available(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(event_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<CharacterInWork>>> {
    let event = require_owned::<Event>(&state, event_id, auth.user_id).await?;
    let entries = availability::list_available_in_work::<CharacterInWork>(
        &state.pool,
        &EVENT_PARTICIPANTS,
        auth.user_id,
        event.id,
        event.work_id,
    )
    .await?;
    Ok(Json(entries))
}

/// DELETE /api/participants/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<EventParticipant>(&state, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
