//! Character entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::{validate_attributes, validate_not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A character row from the `characters` table.
///
/// Characters belong to a user, not to a work; they join works through
/// `character_in_work`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub appearance: Option<String>,
    pub personality: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    /// NOT NULL in the database; defaults to `{}`.
    pub attributes: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacter {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(max = 20000))]
    pub appearance: Option<String>,
    #[validate(length(max = 20000))]
    pub personality: Option<String>,
    #[validate(length(max = 20000))]
    pub bio: Option<String>,
    #[validate(url, length(max = 2048))]
    pub image_url: Option<String>,
    #[validate(custom(function = "validate_attributes"))]
    pub attributes: Option<serde_json::Value>,
}

/// DTO for updating an existing character. All fields are optional.
///
/// `attributes` replaces the whole map when present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCharacter {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(length(max = 20000))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub appearance: Option<Option<String>>,
    #[validate(length(max = 20000))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub personality: Option<Option<String>>,
    #[validate(length(max = 20000))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub bio: Option<Option<String>>,
    #[validate(url, length(max = 2048))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub image_url: Option<Option<String>>,
    #[validate(custom(function = "validate_attributes"))]
    pub attributes: Option<serde_json::Value>,
}
