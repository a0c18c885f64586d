//! Route definitions for the `/characters` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /           -> list
/// POST   /           -> create
/// GET    /{id}       -> get_by_id
/// PATCH  /{id}       -> update
/// DELETE /{id}       -> delete
/// GET    /{id}/works -> list_appearances
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list).post(character::create))
        .route(
            "/{id}",
            get(character::get_by_id)
                .patch(character::update)
                .delete(character::delete),
        )
        .route("/{id}/works", get(character::list_appearances))
}
