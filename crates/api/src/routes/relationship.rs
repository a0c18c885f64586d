//! Route definitions for relationships.

use axum::routing::get;
use axum::Router;

use crate::handlers::relationship;
use crate::state::AppState;

/// Routes mounted at `/relationships`.
///
/// ```text
/// GET    /{id} -> get_by_id
/// PATCH  /{id} -> update
/// DELETE /{id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(relationship::get_by_id)
            .patch(relationship::update)
            .delete(relationship::delete),
    )
}
