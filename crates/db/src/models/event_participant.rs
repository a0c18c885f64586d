//! Event participant (event x cast entry link) model and DTOs.

use fabula_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `event_participants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventParticipant {
    pub id: DbId,
    pub event_id: DbId,
    pub character_in_work_id: DbId,
    pub work_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for adding a cast entry to an event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventParticipant {
    pub character_in_work_id: DbId,
}
