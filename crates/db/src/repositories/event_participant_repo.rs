//! Repository for the `event_participants` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::event_participant::EventParticipant;
use crate::ownership::{OwnedEntity, WorkScoped};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.event_id, t.character_in_work_id, t.work_id, t.created_at";

impl OwnedEntity for EventParticipant {
    const ENTITY: &'static str = "Participant";
    const TABLE: &'static str = "event_participants";
    const COLUMNS: &'static str = COLUMNS;
    const OWNER_JOIN: &'static str =
        "JOIN events e ON e.id = t.event_id JOIN works w ON w.id = e.work_id";
    const OWNER_COLUMN: &'static str = "w.owner_id";
}

impl WorkScoped for EventParticipant {}

/// Provides storage for event participation links.
pub struct EventParticipantRepo;

impl EventParticipantRepo {
    /// Add a cast entry to an event.
    ///
    /// `work_id` must be the work of both the event and the cast entry;
    /// the composite foreign keys reject anything else.
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        work_id: DbId,
        character_in_work_id: DbId,
    ) -> Result<EventParticipant, sqlx::Error> {
        let query = format!(
            "INSERT INTO event_participants AS t (event_id, character_in_work_id, work_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EventParticipant>(&query)
            .bind(event_id)
            .bind(character_in_work_id)
            .bind(work_id)
            .fetch_one(pool)
            .await
    }

    /// List the participants of an event.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<EventParticipant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM event_participants t
             WHERE t.event_id = $1
             ORDER BY {order}",
            order = EventParticipant::ORDER_BY,
        );
        sqlx::query_as::<_, EventParticipant>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }
}
