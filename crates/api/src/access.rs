//! Owner checks shared by every handler.

use fabula_core::error::CoreError;
use fabula_core::types::DbId;
use fabula_db::ownership::{OwnedEntity, OwnedRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// Load `id` as a `T` owned by `owner_id`, or fail with 403.
///
/// Absent rows and rows of another owner are indistinguishable.
pub async fn require_owned<T: OwnedEntity>(
    state: &AppState,
    id: DbId,
    owner_id: DbId,
) -> AppResult<T> {
    OwnedRepo::find_owned::<T>(&state.pool, id, owner_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(entity = T::ENTITY, %id, %owner_id, "Owner check failed");
            CoreError::forbidden(T::ENTITY).into()
        })
}

/// Delete `id` as a `T` owned by `owner_id`, or fail with 403.
pub async fn delete_owned<T: OwnedEntity>(
    state: &AppState,
    id: DbId,
    owner_id: DbId,
) -> AppResult<()> {
    if OwnedRepo::delete_owned::<T>(&state.pool, id, owner_id).await? {
        Ok(())
    } else {
        Err(CoreError::forbidden(T::ENTITY).into())
    }
}
