//! The complete HTTP surface of the service.
//!
//! `main.rs` and the integration tests both call [`build_app_router`], so the
//! tests exercise the same routes and layers that run in production.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID: &str = "x-request-id";

/// Build the application router.
///
/// ```text
/// /health                 liveness and database check
/// /api/auth/<public>      shared request quota
/// /api/auth/<session>     session token
/// /api/<resources>        session token, owner-scoped
/// ```
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let auth = routes::auth::public_router()
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .merge(routes::auth::session_router());

    let api = routes::api_routes().nest("/auth", auth);

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api", api);

    with_middleware(app, config).with_state(state)
}

/// Wrap `app` so requests pass CORS, request id, tracing, request id echo,
/// timeout and panic recovery, outermost first.
fn with_middleware(app: Router<AppState>, config: &ServerConfig) -> Router<AppState> {
    let request_id = HeaderName::from_static(REQUEST_ID);

    app.layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(config))
}

/// CORS for the configured frontend origins.
///
/// An origin that does not parse aborts startup.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{origin}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
