//! Location x work link model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::validate_attributes;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `location_in_work` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LocationInWork {
    pub id: DbId,
    pub location_id: DbId,
    pub work_id: DbId,
    pub attributes: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for linking a location into a work.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocationInWork {
    pub location_id: DbId,
    #[validate(custom(function = "validate_attributes"))]
    pub attributes: Option<serde_json::Value>,
}

/// DTO for updating a location link's attributes.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLocationInWork {
    #[validate(custom(function = "validate_attributes"))]
    pub attributes: Option<serde_json::Value>,
}
