//! Handlers for relationships between cast entries of one work.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::error::CoreError;
use fabula_core::linking::{ensure_distinct, ensure_same_work};
use fabula_core::types::DbId;
use fabula_db::availability::{self, RELATIONSHIPS};
use fabula_db::models::character_in_work::CharacterInWork;
use fabula_db::models::relationship::{CreateRelationship, Relationship, UpdateRelationship};
use fabula_db::models::work::Work;
use fabula_db::ownership::OwnedEntity;
use fabula_db::repositories::RelationshipRepo;

use crate::access::{delete_owned, require_owned};
use crate::error::AppResult;
use crate::extract::{ValidPath, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/works/{id}/relationships
pub async fn list_by_work(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<Relationship>>> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    let relationships = RelationshipRepo::list_by_work(&state.pool, work.id).await?;
    Ok(Json(relationships))
}

/// POST /api/works/{id}/relationships
///
/// Both ends must be distinct cast entries of this work. A second edge
/// between the same ordered pair is a 409.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(work_id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<CreateRelationship>,
) -> AppResult<(StatusCode, Json<Relationship>)> {
    let work = require_owned::<Work>(&state, work_id, auth.user_id).await?;
    ensure_distinct("Relationship", input.from_id, input.to_id)?;

    let from = require_owned::<CharacterInWork>(&state, input.from_id, auth.user_id).await?;
    let to = require_owned::<CharacterInWork>(&state, input.to_id, auth.user_id).await?;
    ensure_same_work("Source cast entry", work.id, from.work_id)?;
    ensure_same_work("Target cast entry", work.id, to.work_id)?;

    let relationship = RelationshipRepo::create(&state.pool, work.id, &input).await?;
    Ok((StatusCode::CREATED, Json(relationship)))
}

/// GET /api/cast/{id}/relationships
///
/// Outgoing edges of one cast entry.
pub async fn list_from(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(cast_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<Relationship>>> {
    let entry = require_owned::<CharacterInWork>(&state, cast_id, auth.user_id).await?;
    let relationships = RelationshipRepo::list_from(&state.pool, entry.id).await?;
    Ok(Json(relationships))
}

/// GET /api/cast/{id}/relationships/available
///
/// Cast entries of the same work that entry `id` has no edge to yet,
/// excluding itself.
pub async fn list_available(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(cast_id): ValidPath<DbId>,
) -> AppResult<Json<Vec<CharacterInWork>>> {
    let entry = require_owned::<CharacterInWork>(&state, cast_id, auth.user_id).await?;
    let entries = availability::list_available_in_work::<CharacterInWork>(
        &state.pool,
        &RELATIONSHIPS,
        auth.user_id,
        entry.id,
        entry.work_id,
    )
    .await?;
    Ok(Json(entries))
}

/// GET /api/relationships/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<Json<Relationship>> {
    let relationship = require_owned::<Relationship>(&state, id, auth.user_id).await?;
    Ok(Json(relationship))
}

/// PATCH /api/relationships/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateRelationship>,
) -> AppResult<Json<Relationship>> {
    require_owned::<Relationship>(&state, id, auth.user_id).await?;
    let relationship = RelationshipRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::forbidden(Relationship::ENTITY))?;
    Ok(Json(relationship))
}

/// DELETE /api/relationships/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidPath(id): ValidPath<DbId>,
) -> AppResult<StatusCode> {
    delete_owned::<Relationship>(&state, id, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
