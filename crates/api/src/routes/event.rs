//! Route definitions for events and their participants.

use axum::routing::get;
use axum::Router;

use crate::handlers::{event, participant};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /{id}                        -> event::get_by_id
/// PATCH  /{id}                        -> event::update
/// DELETE /{id}                        -> event::delete
/// GET    /{id}/participants           -> participant::list_by_event
/// POST   /{id}/participants           -> participant::create
/// GET    /{id}/participants/available -> participant::list_available
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(event::get_by_id)
                .patch(event::update)
                .delete(event::delete),
        )
        .route(
            "/{id}/participants",
            get(participant::list_by_event).post(participant::create),
        )
        .route(
            "/{id}/participants/available",
            get(participant::list_available),
        )
}
