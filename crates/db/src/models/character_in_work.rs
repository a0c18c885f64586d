//! Cast entry (character x work link) model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::validate_attributes;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `character_in_work` table.
///
/// Carries work-specific overrides of the character's image and attributes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterInWork {
    pub id: DbId,
    pub character_id: DbId,
    pub work_id: DbId,
    pub image_url: Option<String>,
    pub attributes: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a character to a work's cast.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCharacterInWork {
    pub character_id: DbId,
    #[validate(url, length(max = 2048))]
    pub image_url: Option<String>,
    #[validate(custom(function = "validate_attributes"))]
    pub attributes: Option<serde_json::Value>,
}

/// DTO for updating a cast entry's overrides.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCharacterInWork {
    #[validate(url, length(max = 2048))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub image_url: Option<Option<String>>,
    #[validate(custom(function = "validate_attributes"))]
    pub attributes: Option<serde_json::Value>,
}
