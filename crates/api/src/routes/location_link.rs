//! Route definitions for location links.

use axum::routing::get;
use axum::Router;

use crate::handlers::location_link;
use crate::state::AppState;

/// Routes mounted at `/location-links`.
///
/// ```text
/// GET    /{id} -> get_by_id
/// PATCH  /{id} -> update
/// DELETE /{id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(location_link::get_by_id)
            .patch(location_link::update)
            .delete(location_link::delete),
    )
}
