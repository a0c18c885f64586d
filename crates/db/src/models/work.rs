//! Work entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A work (story) row from the `works` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Work {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub annotation: Option<String>,
    pub synopsis: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new work. The owner comes from the authenticated user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWork {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub annotation: Option<String>,
    #[validate(length(max = 20000))]
    pub synopsis: Option<String>,
    #[validate(url, length(max = 2048))]
    pub image_url: Option<String>,
}

/// DTO for updating an existing work. All fields are optional; `null`
/// clears a nullable one.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateWork {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub annotation: Option<Option<String>>,
    #[validate(length(max = 20000))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub synopsis: Option<Option<String>>,
    #[validate(url, length(max = 2048))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub image_url: Option<Option<String>>,
}
