//! Route definitions for the `/auth` resource.
//!
//! The two halves are mounted together by the app router, which puts the
//! rate limit on the public half only.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes that need no session token.
///
/// ```text
/// POST   /sign-up             -> sign_up
/// POST   /sign-in             -> sign_in
/// POST   /confirm-email       -> confirm_email
/// POST   /resend-verification -> resend_verification
/// POST   /forgot-password     -> forgot_password
/// POST   /reset-password      -> reset_password
/// ```
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/confirm-email", post(auth::confirm_email))
        .route("/resend-verification", post(auth::resend_verification))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
}

/// Routes for a signed-in user.
///
/// ```text
/// POST   /sign-out            -> sign_out
/// POST   /sign-out-all        -> sign_out_all
/// GET    /me                  -> me
/// PATCH  /me                  -> update_me
/// DELETE /me                  -> delete_me
/// POST   /change-password     -> change_password
/// POST   /change-email        -> change_email
/// ```
pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/sign-out", post(auth::sign_out))
        .route("/sign-out-all", post(auth::sign_out_all))
        .route(
            "/me",
            get(auth::me).patch(auth::update_me).delete(auth::delete_me),
        )
        .route("/change-password", post(auth::change_password))
        .route("/change-email", post(auth::change_email))
}
