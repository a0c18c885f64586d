//! HTTP-level integration tests for the `/api/auth` endpoints.
//!
//! Covers sign-up and email verification, sign-in, session revocation,
//! one-shot token consumption, password changes and account deletion.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, expect_json, get_auth, patch_json_auth, post_auth, post_json,
    post_json_auth, signed_in_user, PASSWORD,
};
use fabula_api::mailer::MailKind;
use serde_json::json;
use sqlx::PgPool;

async fn sign_up(app: &common::TestApp, username: &str) -> String {
    let email = format!("{username}@example.com");
    let response = post_json(
        app,
        "/api/auth/sign-up",
        json!({ "username": username, "email": email, "password": PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(json["is_verified"], false);
    assert!(json.get("password_hash").is_none());
    email
}

async fn sign_in(app: &common::TestApp, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app,
        "/api/auth/sign-in",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Sign-up and verification
// ---------------------------------------------------------------------------

/// Unverified sign-in is 403; after confirming the mailed token it succeeds.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_up_verify_then_sign_in(pool: PgPool) {
    let app = common::build_test_app(pool);
    let email = sign_up(&app, "ada").await;

    let response = sign_in(&app, &email, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let token = app
        .mailer
        .last_token(&email, MailKind::VerifyEmail)
        .expect("verification mail should be sent");
    let response = post_json(&app, "/api/auth/confirm-email", json!({ "token": token })).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["is_verified"], true);

    let response = sign_in(&app, &email, PASSWORD).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert!(json["token"].is_string());
    assert!(json["expires_at"].is_string());
    assert_eq!(json["username"], "ada");
    assert_eq!(json["email"], email);
}

/// A consumed verification token cannot be used again.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_token_is_one_shot(pool: PgPool) {
    let app = common::build_test_app(pool);
    let email = sign_up(&app, "bea").await;
    let token = app.mailer.last_token(&email, MailKind::VerifyEmail).unwrap();

    let first = post_json(&app, "/api/auth/confirm-email", json!({ "token": token })).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(&app, "/api/auth/confirm-email", json!({ "token": token })).await;
    assert_eq!(second.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_or_email_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    sign_up(&app, "cleo").await;

    let response = post_json(
        &app,
        "/api/auth/sign-up",
        json!({ "username": "cleo", "email": "other@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Email uniqueness ignores case.
    let response = post_json(
        &app,
        "/api/auth/sign-up",
        json!({ "username": "cleo2", "email": "CLEO@example.com", "password": PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_up_validation(pool: PgPool) {
    let app = common::build_test_app(pool);

    let cases = [
        json!({ "username": "ok_name", "email": "not-an-email", "password": PASSWORD }),
        json!({ "username": "no spaces", "email": "a@example.com", "password": PASSWORD }),
        json!({ "username": "ok_name", "email": "a@example.com", "password": "short" }),
        json!({ "username": "ok_name" }),
    ];
    for body in cases {
        let response = post_json(&app, "/api/auth/sign-up", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

/// Resend always answers 204 and only mails known, unverified accounts.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resend_verification(pool: PgPool) {
    let app = common::build_test_app(pool);
    let email = sign_up(&app, "dora").await;
    let first = app.mailer.last_token(&email, MailKind::VerifyEmail).unwrap();

    let response = post_json(
        &app,
        "/api/auth/resend-verification",
        json!({ "email": email }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let second = app.mailer.last_token(&email, MailKind::VerifyEmail).unwrap();
    assert_ne!(first, second);

    // The earlier token was replaced.
    let response = post_json(&app, "/api/auth/confirm-email", json!({ "token": first })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let sent = app.mailer.count();
    let response = post_json(
        &app,
        "/api/auth/resend-verification",
        json!({ "email": "nobody@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.mailer.count(), sent);
}

// ---------------------------------------------------------------------------
// Sign-in and sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bad_credentials_are_401(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    signed_in_user(&pool, &app, "eve").await;

    let response = sign_in(&app, "eve@example.com", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = sign_in(&app, "ghost@example.com", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_or_malformed_header_is_401(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = common::get(&app, "/api/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(&app, "/api/auth/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

/// Signing out revokes the token even though its signature is still valid.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_out_revokes_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (user_id, token) = signed_in_user(&pool, &app, "finn").await;

    let response = get_auth(&app, "/api/auth/me", &token).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["id"], user_id.to_string());

    let response = post_auth(&app, "/api/auth/sign-out", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(&app, "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_out_all_revokes_every_session(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, first) = signed_in_user(&pool, &app, "gus").await;
    let second = body_json(sign_in(&app, "gus@example.com", PASSWORD).await).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_auth(&app, "/api/auth/sign-out-all", &first).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    for token in [&first, &second] {
        let response = get_auth(&app, "/api/auth/me", token).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// Reset sets the new password, ends all sessions and burns the token.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_password_reset_flow(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, session) = signed_in_user(&pool, &app, "hana").await;
    let email = "hana@example.com";

    let response = post_json(&app, "/api/auth/forgot-password", json!({ "email": email })).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let token = app
        .mailer
        .last_token(email, MailKind::PasswordReset)
        .expect("reset mail should be sent");

    // A reset token is not a session token.
    let response = get_auth(&app, "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json!({ "token": token, "password": "brand-new-password" });
    let response = post_json(&app, "/api/auth/reset-password", body.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(&app, "/api/auth/reset-password", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(&app, "/api/auth/me", &session).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(sign_in(&app, email, PASSWORD).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        sign_in(&app, email, "brand-new-password").await.status(),
        StatusCode::OK
    );
}

/// A session token presented to the reset endpoint has the wrong scope.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_token_cannot_reset_password(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, session) = signed_in_user(&pool, &app, "ivo").await;

    let response = post_json(
        &app,
        "/api/auth/reset-password",
        json!({ "token": session, "password": "brand-new-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The session itself is untouched.
    let response = get_auth(&app, "/api/auth/me", &session).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_for_unknown_email_is_silent(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        &app,
        "/api/auth/forgot-password",
        json!({ "email": "nobody@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.mailer.count(), 0);
}

/// Changing the password keeps the current session and ends the others.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_password(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, current) = signed_in_user(&pool, &app, "jade").await;
    let other = body_json(sign_in(&app, "jade@example.com", PASSWORD).await).await["token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_json_auth(
        &app,
        "/api/auth/change-password",
        &current,
        json!({ "current_password": "wrong", "new_password": "another-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        &app,
        "/api/auth/change-password",
        &current,
        json!({ "current_password": PASSWORD, "new_password": "another-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(get_auth(&app, "/api/auth/me", &current).await.status(), StatusCode::OK);
    assert_eq!(
        get_auth(&app, "/api/auth/me", &other).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

// ---------------------------------------------------------------------------
// Profile and email changes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "kim").await;
    signed_in_user(&pool, &app, "taken").await;

    let response = patch_json_auth(
        &app,
        "/api/auth/me",
        &token,
        json!({ "name": "Kim Park" }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["name"], "Kim Park");
    assert_eq!(json["username"], "kim");

    let response = patch_json_auth(
        &app,
        "/api/auth/me",
        &token,
        json!({ "username": "taken" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// The address changes only after the token mailed to the new one is used.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_email_requires_confirmation(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "lea").await;

    let response = post_json_auth(
        &app,
        "/api/auth/change-email",
        &token,
        json!({ "email": "lea.new@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = expect_json(get_auth(&app, "/api/auth/me", &token).await, StatusCode::OK).await;
    assert_eq!(json["email"], "lea@example.com");
    assert_eq!(json["new_email"], "lea.new@example.com");

    let verify = app
        .mailer
        .last_token("lea.new@example.com", MailKind::VerifyEmail)
        .unwrap();
    let response = post_json(&app, "/api/auth/confirm-email", json!({ "token": verify })).await;
    let json = expect_json(response, StatusCode::OK).await;
    assert_eq!(json["email"], "lea.new@example.com");
    assert!(json["new_email"].is_null());
}

/// A taken address is refused when the change is confirmed, whether it was
/// taken before the request or registered while the token was pending.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_change_email_to_taken_address_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "max").await;
    signed_in_user(&pool, &app, "ned").await;

    for address in ["ned@example.com", "nia@example.com"] {
        let response = post_json_auth(
            &app,
            "/api/auth/change-email",
            &token,
            json!({ "email": address }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        if address == "nia@example.com" {
            signed_in_user(&pool, &app, "nia").await;
        }

        let verify = app
            .mailer
            .last_token(address, MailKind::VerifyEmail)
            .unwrap();
        let response = post_json(&app, "/api/auth/confirm-email", json!({ "token": verify })).await;
        let json = expect_json(response, StatusCode::CONFLICT).await;
        assert_eq!(json["code"], "CONFLICT");

        let json = expect_json(get_auth(&app, "/api/auth/me", &token).await, StatusCode::OK).await;
        assert_eq!(json["email"], "max@example.com");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_account(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_, token) = signed_in_user(&pool, &app, "olga").await;

    let response = delete_auth(&app, "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Tokens went with the account.
    let response = get_auth(&app, "/api/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        sign_in(&app, "olga@example.com", PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_auth_routes_are_rate_limited(pool: PgPool) {
    let mut config = common::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.requests = 2;
    config.rate_limit.period_secs = 3600;
    let app = common::build_test_app_with(pool, config);

    let body = json!({ "email": "nobody@example.com" });
    for _ in 0..2 {
        let response = post_json(&app, "/api/auth/forgot-password", body.clone()).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    let response = post_json(&app, "/api/auth/forgot-password", body).await;
    let json = expect_json(response, StatusCode::TOO_MANY_REQUESTS).await;
    assert_eq!(json["code"], "RATE_LIMITED");
}

/// The quota covers the public auth routes only.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_routes_ignore_the_quota(pool: PgPool) {
    let mut config = common::test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.requests = 1;
    config.rate_limit.period_secs = 3600;
    let app = common::build_test_app_with(pool.clone(), config);

    // Signing in spends the single request.
    let (_, token) = signed_in_user(&pool, &app, "pia").await;

    for _ in 0..3 {
        let response = get_auth(&app, "/api/auth/me", &token).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = get_auth(&app, "/api/works", &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = post_json(
        &app,
        "/api/auth/forgot-password",
        json!({ "email": "pia@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
