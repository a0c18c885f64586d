//! Event entity model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use fabula_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An event row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub work_id: DbId,
    /// Where the event happens; must be a location linked into the same work.
    pub location_in_work_id: Option<DbId>,
    /// Position within the work's timeline. Ties break on creation time.
    pub ord: i32,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new event. Omitting `ord` appends to the timeline.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 20000))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub ord: Option<i32>,
    pub location_in_work_id: Option<DbId>,
}

/// DTO for updating an existing event. All fields are optional; `null`
/// clears `description` or detaches the location.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 255), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 20000))]
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub description: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub ord: Option<i32>,
    #[serde(default, deserialize_with = "fabula_core::patch::nullable")]
    pub location_in_work_id: Option<Option<DbId>>,
}
