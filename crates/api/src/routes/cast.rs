//! Route definitions for cast entries.

use axum::routing::get;
use axum::Router;

use crate::handlers::{cast, relationship};
use crate::state::AppState;

/// Routes mounted at `/cast`.
///
/// ```text
/// GET    /{id}                         -> cast::get_by_id
/// PATCH  /{id}                         -> cast::update
/// DELETE /{id}                         -> cast::delete
/// GET    /{id}/relationships           -> relationship::list_from
/// GET    /{id}/relationships/available -> relationship::list_available
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(cast::get_by_id).patch(cast::update).delete(cast::delete),
        )
        .route("/{id}/relationships", get(relationship::list_from))
        .route(
            "/{id}/relationships/available",
            get(relationship::list_available),
        )
}
