//! Request extractors and middleware.
//!
//! - [`auth::AuthUser`] -- the authenticated owner behind a session token.
//! - [`rate_limit::rate_limit_middleware`] -- global quota for public auth routes.

pub mod auth;
pub mod rate_limit;
