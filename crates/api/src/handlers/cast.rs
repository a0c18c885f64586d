//! Handlers for cast entries (characters linked into a work).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::error::CoreError;
use fabula_core::types::DbId;
use fabula_db::availability::{self, CAST};
use fabula_db::models::character::Character;
use fabula_db::models::character_in_work::{
    CharacterInWork, CreateCharacterInWork, UpdateCharacterInWork,
};
use fabula_db::models::work::Work;
use fabula_db::ownership::OwnedEntity;
use fabula_db::repositories::CharacterInWorkRepo;

use crate::access::{delete_owned, require_owned};
use crate::error::AppResult;
use crate::extract::{ValidPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/works/{id}/cast
pub async fn list_by_work(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<CharacterInWork>>> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    let cast = CharacterInWorkRepo::list_by_work(&state.pool, work.id).await?;
    Ok(Json(cast))
}

/// POST /api/works/{id}/cast
///
/// Both the work and the character must belong to the caller. Casting the
/// same character twice is a 409.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<CreateCharacterInWork>,
) -> AppResult<(StatusCode, Json<CharacterInWork>)> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    require_owned::<Character>(&state, input.character_id, auth.user_id).await?;
    let entry = CharacterInWorkRepo::create(&state.pool, work.id, &input).await?;
    tracing::info!(work_id = %work.id, character_id = %entry.character_id, "Character cast");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/works/{id}/cast/available
///
/// The caller's characters not yet cast in this work.
pub async fn list_available(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<Character>>> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    let characters =
        availability::list_available::<Character>(&state.pool, &CAST, auth.user_id, work.id)
            .await?;
    Ok(Json(characters))
}

/// GET /api/cast/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<CharacterInWork>> {
    let entry = require_owned::<CharacterInWork>(&state, id, auth.user_id).await?;
    Ok(Json(entry))
}

/// PATCH /api/cast/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCharacterInWork>,
) -> AppResult<Json<CharacterInWork>> {
    require_owned::<CharacterInWork>(&state, id, auth.user_id).await?;
    let entry = CharacterInWorkRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::forbidden(CharacterInWork::ENTITY))?;
    Ok(Json(entry))
}

/// DELETE /api/cast/{id}
///
/// Also drops the entry's relationships and event participation.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<CharacterInWork>(&state, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
