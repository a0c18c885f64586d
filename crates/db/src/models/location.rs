//! Location entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A location row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub owner_id: DbId,
    /// Enclosing location, if any. Locations of one owner form a forest.
    pub parent_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    #[validate(url, length(max = 2048))]
    pub image_url: Option<String>,
    pub parent_id: Option<DbId>,
}

/// DTO for updating an existing location. All fields are optional.
///
/// The parent is changed through the children sub-resource, which
/// checks for cycles.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 20000))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub description: Option<Option<String>>,
    #[validate(url, length(max = 2048))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub image_url: Option<Option<String>>,
}

/// Request body for attaching an existing root location as a child.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AttachChild {
    pub location_id: DbId,
}
