#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use fabula_api::auth::jwt::JwtConfig;
use fabula_api::auth::password::hash_password;
use fabula_api::config::{RateLimitConfig, ServerConfig};
use fabula_api::mailer::{Mail, MailError, MailKind, Mailer};
use fabula_api::middleware::rate_limit::build_rate_limiter;
use fabula_api::router::build_app_router;
use fabula_api::state::AppState;
use fabula_core::types::DbId;
use fabula_db::models::user::CreateUser;
use fabula_db::repositories::UserRepo;

pub const PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults and rate limiting off.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        min_password_length: 8,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            session_ttl_hours: 1,
            password_reset_ttl_mins: 30,
            email_verify_ttl_hours: 24,
        },
        rate_limit: RateLimitConfig {
            enabled: false,
            requests: 20,
            period_secs: 60,
        },
    }
}

/// Mailer that keeps every message for inspection.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Mail>>,
}

impl RecordingMailer {
    /// Token of the most recent message of `kind` sent to `to`.
    pub fn last_token(&self, to: &str, kind: MailKind) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|m| m.to == to && m.kind == kind)
            .map(|m| m.token.clone())
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: Mail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// A router wired to a real database plus the mailer it delivers to.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<RecordingMailer>,
}

/// Build the full application with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, test_config())
}

pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> TestApp {
    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: mailer.clone(),
        rate_limiter: build_rate_limiter(&config.rate_limit),
    };
    TestApp {
        router: build_app_router(state, &config),
        mailer,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &TestApp, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: &TestApp, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: &TestApp, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn patch_json_auth(app: &TestApp, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &TestApp, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status, then return the parsed body.
pub async fn expect_json(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a verified user directly and sign in through the API.
///
/// Returns the user id and a session token.
pub async fn signed_in_user(pool: &PgPool, app: &TestApp, username: &str) -> (DbId, String) {
    let email = format!("{username}@example.com");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: email.clone(),
            name: None,
            password_hash: hash_password(PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap();
    UserRepo::confirm_email(pool, user.id).await.unwrap();

    let response = post_json(
        app,
        "/api/auth/sign-in",
        serde_json::json!({ "email": email, "password": PASSWORD }),
    )
    .await;
    let json = expect_json(response, StatusCode::OK).await;
    (user.id, json["token"].as_str().unwrap().to_string())
}

/// Create an owned entity through the API and return its id.
pub async fn create(app: &TestApp, uri: &str, token: &str, body: Value) -> String {
    let response = post_json_auth(app, uri, token, body).await;
    let json = expect_json(response, StatusCode::CREATED).await;
    json["id"].as_str().unwrap().to_string()
}
