//! Global request quota for the unauthenticated auth endpoints.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::{Quota, RateLimiter};

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::state::AppState;

/// Single shared bucket; not keyed by client.
pub type GlobalRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Build the limiter described by `config`, or `None` when disabled.
///
/// # Panics
///
/// Panics if the period or request count is zero; [`RateLimitConfig`]
/// rejects both when loading from the environment.
pub fn build_rate_limiter(config: &RateLimitConfig) -> Option<Arc<GlobalRateLimiter>> {
    if !config.enabled {
        return None;
    }
    let quota = Quota::with_period(Duration::from_secs(config.period_secs) / config.requests)
        .expect("Rate limit period must be non-zero")
        .allow_burst(NonZeroU32::new(config.requests).expect("Rate limit must be non-zero"));
    Some(Arc::new(RateLimiter::direct(quota)))
}

/// Reject with 429 once the quota is exhausted. Pass-through when disabled.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
            return Err(AppError::RateLimited);
        }
    }
    Ok(next.run(request).await)
}
