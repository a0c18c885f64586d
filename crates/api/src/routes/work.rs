//! Route definitions for the `/works` resource.
//!
//! Also nests the work-scoped collections (cast, location links, events,
//! relationships) under `/works/{id}/...`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{cast, event, location_link, relationship, work};
use crate::state::AppState;

/// Routes mounted at `/works`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PATCH  /{id}                     -> update
/// DELETE /{id}                     -> delete
///
/// GET    /{id}/cast                -> cast::list_by_work
/// POST   /{id}/cast                -> cast::create
/// GET    /{id}/cast/available      -> cast::list_available
///
/// GET    /{id}/locations           -> location_link::list_by_work
/// POST   /{id}/locations           -> location_link::create
/// GET    /{id}/locations/available -> location_link::list_available
///
/// GET    /{id}/events              -> event::list_by_work
/// POST   /{id}/events              -> event::create
///
/// GET    /{id}/relationships       -> relationship::list_by_work
/// POST   /{id}/relationships       -> relationship::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(work::list).post(work::create))
        .route(
            "/{id}",
            get(work::get_by_id)
                .patch(work::update)
                .delete(work::delete),
        )
        .route(
            "/{id}/cast",
            get(cast::list_by_work).post(cast::create),
        )
        .route("/{id}/cast/available", get(cast::list_available))
        .route(
            "/{id}/locations",
            get(location_link::list_by_work).post(location_link::create),
        )
        .route(
            "/{id}/locations/available",
            get(location_link::list_available),
        )
        .route(
            "/{id}/events",
            get(event::list_by_work).post(event::create),
        )
        .route(
            "/{id}/relationships",
            get(relationship::list_by_work).post(relationship::create),
        )
}
