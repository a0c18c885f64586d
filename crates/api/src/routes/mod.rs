pub mod auth;
pub mod cast;
pub mod character;
pub mod event;
pub mod health;
pub mod location;
pub mod location_link;
pub mod relationship;
pub mod work;

use axum::routing::delete;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` resource routes. `/auth` is mounted next to them by
/// [`crate::router::build_app_router`].
///
/// ```text
/// /works                                           list, create
/// /works/{id}                                      get, update, delete
/// /works/{id}/cast[/available]                     cast entries of a work
/// /works/{id}/locations[/available]                location links of a work
/// /works/{id}/events                               timeline
/// /works/{id}/relationships                        relationships in a work
///
/// /characters                                      list, create
/// /characters/{id}                                 get, update, delete
/// /characters/{id}/works                           cast entries of a character
///
/// /cast/{id}                                       get, update, delete
/// /cast/{id}/relationships[/available]             outgoing edges
///
/// /location-links/{id}                             get, update, delete
///
/// /locations                                       list, create
/// /locations/{id}                                  get, update, delete
/// /locations/{id}/children[/available]             list, attach
/// /locations/{id}/children/{child_id}              detach
///
/// /events/{id}                                     get, update, delete
/// /events/{id}/participants[/available]            list, add
/// /participants/{id}                               remove
///
/// /relationships/{id}                              get, update, delete
/// ```
///
/// Every route here requires a session token, and every id in a path must
/// belong to the caller (403 otherwise).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/works", work::router())
        .nest("/characters", character::router())
        .nest("/cast", cast::router())
        .nest("/location-links", location_link::router())
        .nest("/locations", location::router())
        .nest("/events", event::router())
        .route("/participants/{id}", delete(handlers::participant::delete))
        .nest("/relationships", relationship::router())
}
