//! Relationship (directed cast entry -> cast entry edge) model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `relationships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Relationship {
    pub id: DbId,
    pub work_id: DbId,
    pub from_id: DbId,
    pub to_id: DbId,
    /// Free-form label such as "sibling" or "rival".
    #[serde(rename = "type")]
    pub kind: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a relationship between two cast entries of one work.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRelationship {
    pub from_id: DbId,
    pub to_id: DbId,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub kind: String,
    #[validate(length(max = 20000))]
    pub notes: Option<String>,
}

/// DTO for updating a relationship's label or notes.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRelationship {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub kind: Option<String>,
    #[validate(length(max = 20000))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub notes: Option<Option<String>>,
}
