use std::sync::Arc;

use crate::config::ServerConfig;
use crate::mailer::Mailer;
use crate::middleware::rate_limit::GlobalRateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: fabula_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Outbound mail for verification and reset tokens.
    pub mailer: Arc<dyn Mailer>,
    /// Quota for the public auth routes; `None` when disabled.
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
}
