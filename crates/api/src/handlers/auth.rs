//! Handlers for the `/auth` resource: accounts, sessions and one-shot tokens.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use fabula_core::error::CoreError;
use fabula_core::scopes::TokenScope;
use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::validate_username;
use fabula_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use fabula_db::repositories::{TokenRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::tokens::{consume, issue};
use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::mailer::{deliver, Mail, MailKind};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/sign-up`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
    pub username: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1024))]
    pub password: String,
}

/// Request body for `POST /auth/sign-in`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

/// Request body carrying a one-shot token.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
}

/// Request body carrying just an email address.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, max = 4096))]
    pub token: String,
    #[validate(length(max = 1024))]
    pub password: String,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 1024))]
    pub current_password: String,
    #[validate(length(max = 1024))]
    pub new_password: String,
}

/// Successful sign-in: the session token plus the user.
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub expires_at: Timestamp,
    #[serde(flatten)]
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/sign-up
///
/// Create an unverified account and mail an `email_verify` token.
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignUpRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    validate_password_strength(&input.password, state.config.min_password_length)
        .map_err(CoreError::Validation)?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            username: input.username,
            email: input.email,
            name: input.name,
            password_hash,
        },
    )
    .await?;
    let issued = issue(&mut *tx, &state.config.jwt, user.id, TokenScope::EmailVerify).await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, "User signed up");
    send_token(&state, user.email.clone(), MailKind::VerifyEmail, issued.token).await;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// POST /api/auth/sign-in
///
/// Exchange email + password for a session token. Unverified accounts get 403.
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<SignInRequest>,
) -> AppResult<Json<SignInResponse>> {
    let invalid = || CoreError::Unauthorized("Invalid email or password".into());

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = %user.id, "Sign-in rejected: wrong password");
        return Err(invalid().into());
    }

    if !user.is_verified {
        return Err(CoreError::Forbidden("Email address is not verified".into()).into());
    }

    let issued = issue(&state.pool, &state.config.jwt, user.id, TokenScope::Session).await?;
    tracing::info!(user_id = %user.id, token_id = %issued.id, "User signed in");

    Ok(Json(SignInResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user: UserResponse::from(&user),
    }))
}

/// POST /api/auth/confirm-email
///
/// Consume an `email_verify` token: mark the account verified and swap in a
/// pending new address, if any.
pub async fn confirm_email(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<TokenRequest>,
) -> AppResult<Json<UserResponse>> {
    let mut tx = state.pool.begin().await?;
    let token = consume(
        &mut *tx,
        &state.config.jwt,
        &input.token,
        TokenScope::EmailVerify,
    )
    .await?;
    let user = UserRepo::confirm_email(&mut *tx, token.owner_id)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, "Email confirmed");
    Ok(Json(UserResponse::from(&user)))
}

/// POST /api/auth/resend-verification
///
/// Re-issue the verification mail. Always 204 so callers cannot tell which addresses exist.
pub async fn resend_verification(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<EmailRequest>,
) -> AppResult<StatusCode> {
    if let Some(user) = UserRepo::find_by_email(&state.pool, &input.email).await? {
        let pending = user.new_email.clone();
        if !user.is_verified || pending.is_some() {
            let token = reissue(&state, user.id, TokenScope::EmailVerify).await?;
            let to = pending.unwrap_or(user.email);
            send_token(&state, to, MailKind::VerifyEmail, token).await;
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/forgot-password
///
/// Mail a `password_reset` token. Always 204 so callers cannot tell which addresses exist.
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<EmailRequest>,
) -> AppResult<StatusCode> {
    if let Some(user) = UserRepo::find_by_email(&state.pool, &input.email).await? {
        let token = reissue(&state, user.id, TokenScope::PasswordReset).await?;
        send_token(&state, user.email, MailKind::PasswordReset, token).await;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/reset-password
///
/// Consume a `password_reset` token, set the new password and end every
/// session, all in one transaction.
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.password, state.config.min_password_length)
        .map_err(CoreError::Validation)?;
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut tx = state.pool.begin().await?;
    let token = consume(
        &mut *tx,
        &state.config.jwt,
        &input.token,
        TokenScope::PasswordReset,
    )
    .await?;
    if !UserRepo::update_password(&mut *tx, token.owner_id, &password_hash).await? {
        return Err(AppError::unauthorized());
    }
    let revoked = TokenRepo::delete_for_owner(&mut *tx, token.owner_id, TokenScope::Session).await?;
    tx.commit().await?;

    tracing::info!(user_id = %token.owner_id, revoked, "Password reset");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Authenticated handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/sign-out
///
/// Revoke the token used for this request.
pub async fn sign_out(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    TokenRepo::delete(&state.pool, auth.token_id).await?;
    tracing::info!(user_id = %auth.user_id, token_id = %auth.token_id, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/sign-out-all
///
/// Revoke every session token of the user, including this one.
pub async fn sign_out_all(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = TokenRepo::delete_for_owner(&state.pool, auth.user_id, TokenScope::Session).await?;
    tracing::info!(user_id = %auth.user_id, revoked, "All sessions revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = current_user(&state, auth.user_id).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// PATCH /api/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::update(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/auth/me
///
/// Delete the account. Works, characters, locations, their links and all
/// tokens go with it.
pub async fn delete_me(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    UserRepo::delete(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/change-password
///
/// Requires the current password. Other sessions are revoked; the one
/// making the request stays valid.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = current_user(&state, auth.user_id).await?;

    let password_valid = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(CoreError::Validation("Current password is incorrect".into()).into());
    }
    validate_password_strength(&input.new_password, state.config.min_password_length)
        .map_err(CoreError::Validation)?;
    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut tx = state.pool.begin().await?;
    UserRepo::update_password(&mut *tx, user.id, &password_hash).await?;
    let revoked = TokenRepo::delete_for_owner_except(
        &mut *tx,
        user.id,
        TokenScope::Session,
        auth.token_id,
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = %user.id, revoked, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/auth/change-email
///
/// Record the new address as pending and mail a verification token to it.
/// The address only changes once that token is confirmed; if another account
/// holds it by then, `uq_users_email` turns the confirmation into a 409.
pub async fn change_email(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<EmailRequest>,
) -> AppResult<StatusCode> {
    let user = current_user(&state, auth.user_id).await?;
    if user.email.eq_ignore_ascii_case(&input.email) {
        return Err(CoreError::Validation("New email matches the current one".into()).into());
    }
    UserRepo::set_new_email(&state.pool, user.id, &input.email)
        .await?
        .ok_or_else(AppError::unauthorized)?;
    let token = reissue(&state, user.id, TokenScope::EmailVerify).await?;
    send_token(&state, input.email, MailKind::VerifyEmail, token).await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn current_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(AppError::unauthorized)
}

/// Replace any outstanding one-shot token of `scope` with a fresh one.
async fn reissue(state: &AppState, owner_id: DbId, scope: TokenScope) -> AppResult<String> {
    let mut tx = state.pool.begin().await?;
    TokenRepo::delete_for_owner(&mut *tx, owner_id, scope).await?;
    let issued = issue(&mut *tx, &state.config.jwt, owner_id, scope).await?;
    tx.commit().await?;
    Ok(issued.token)
}

async fn send_token(state: &AppState, to: String, kind: MailKind, token: String) {
    deliver(state.mailer.as_ref(), Mail { to, kind, token }).await;
}
