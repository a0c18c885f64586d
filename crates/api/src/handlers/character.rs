//! Handlers for the `/characters` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::error::CoreError;
use fabula_core::types::DbId;
use fabula_db::models::character::{Character, CreateCharacter, UpdateCharacter};
use fabula_db::models::character_in_work::CharacterInWork;
use fabula_db::ownership::{OwnedEntity, OwnedRepo};
use fabula_db::repositories::{CharacterInWorkRepo, CharacterRepo};

use crate::access::{delete_owned, require_owned};
use crate::error::AppResult;
use crate::extract::{ValidPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/characters
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateCharacter>,
) -> AppResult<(StatusCode, Json<Character>)> {
    let character = CharacterRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// GET /api/characters
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<Character>>> {
    let characters = OwnedRepo::list_owned::<Character>(&state.pool, auth.user_id).await?;
    Ok(Json(characters))
}

/// GET /api/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Character>> {
    let character = require_owned::<Character>(&state, id, auth.user_id).await?;
    Ok(Json(character))
}

/// PATCH /api/characters/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCharacter>,
) -> AppResult<Json<Character>> {
    require_owned::<Character>(&state, id, auth.user_id).await?;
    let character = CharacterRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::forbidden(Character::ENTITY))?;
    Ok(Json(character))
}

/// DELETE /api/characters/{id}
///
/// Removes the character from every work it was cast in.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<Character>(&state, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/characters/{id}/works
///
/// The character's cast entries, one per work it appears in.
pub async fn list_appearances(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Vec<CharacterInWork>>> {
    let character = require_owned::<Character>(&state, id, auth.user_id).await?;
    let entries = CharacterInWorkRepo::list_by_character(&state.pool, character.id).await?;
    Ok(Json(entries))
}
