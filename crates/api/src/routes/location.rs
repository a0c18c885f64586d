//! Route definitions for the `/locations` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::location;
use crate::state::AppState;

/// Routes mounted at `/locations`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PATCH  /{id}                     -> update
/// DELETE /{id}                     -> delete
/// GET    /{id}/children            -> list_children
/// POST   /{id}/children            -> attach_child
/// GET    /{id}/children/available  -> list_available_children
/// DELETE /{id}/children/{child_id} -> detach_child
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(location::list).post(location::create))
        .route(
            "/{id}",
            get(location::get_by_id)
                .patch(location::update)
                .delete(location::delete),
        )
        .route(
            "/{id}/children",
            get(location::list_children).post(location::attach_child),
        )
        .route(
            "/{id}/children/available",
            get(location::list_available_children),
        )
        .route("/{id}/children/{child_id}", delete(location::detach_child))
}
