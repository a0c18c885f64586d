//! Repository for the `events` table (a work's timeline).

use fabula_core::patch::split;
use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event, UpdateEvent};
use crate::ownership::{OwnedEntity, WorkScoped};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.work_id, t.location_in_work_id, t.ord, t.title, t.description, \
                       t.created_at, t.updated_at";

impl OwnedEntity for Event {
    const ENTITY: &'static str = "Event";
    const TABLE: &'static str = "events";
    const COLUMNS: &'static str = COLUMNS;
    const OWNER_JOIN: &'static str = "JOIN works w ON w.id = t.work_id";
    const OWNER_COLUMN: &'static str = "w.owner_id";
    const ORDER_BY: &'static str = "t.ord ASC, t.created_at ASC";
}

impl WorkScoped for Event {}

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    ///
    /// Without an explicit `ord` the event goes after the last one in the work.
    pub async fn create(
        pool: &PgPool,
        work_id: DbId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events AS t (work_id, location_in_work_id, ord, title, description)
             VALUES ($1, $2,
                     COALESCE($3, (SELECT MAX(ord) + 1 FROM events WHERE work_id = $1), 0),
                     $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(work_id)
            .bind(input.location_in_work_id)
            .bind(input.ord)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List a work's events in timeline order.
    pub async fn list_by_work(pool: &PgPool, work_id: DbId) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events t
             WHERE t.work_id = $1
             ORDER BY {order}",
            order = Event::ORDER_BY,
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(work_id)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Absent fields are kept and `null` clears a nullable one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let (description_set, description) = split(&input.description);
        let (location_in_work_id_set, location_in_work_id) = split(&input.location_in_work_id);
        let query = format!(
            "UPDATE events t SET
                title = COALESCE($2, t.title),
                ord = COALESCE($3, t.ord),
                description = CASE WHEN $4 THEN $5 ELSE t.description END,
                location_in_work_id = CASE WHEN $6 THEN $7 ELSE t.location_in_work_id END
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.ord)
            .bind(description_set)
            .bind(description)
            .bind(location_in_work_id_set)
            .bind(location_in_work_id)
            .fetch_optional(pool)
            .await
    }
}
