//! User entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::{validate_not_blank, validate_username};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    /// Address awaiting confirmation; swapped into `email` when verified.
    pub new_email: Option<String>,
    pub is_verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub new_email: Option<String>,
    pub is_verified: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            new_email: user.new_email.clone(),
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user. Built by the sign-up handler after hashing.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// DTO for a user editing their own profile. All fields are optional.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 32), custom(function = "validate_username"))]
    pub username: Option<String>,
    #[validate(length(max = 100), custom(function = "validate_not_blank"))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub name: Option<Option<String>>,
}
