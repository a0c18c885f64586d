//! Repository for the `location_in_work` table.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::location_in_work::{
    CreateLocationInWork, LocationInWork, UpdateLocationInWork,
};
use crate::ownership::{OwnedEntity, WorkScoped};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.location_id, t.work_id, t.attributes, t.created_at, t.updated_at";

impl OwnedEntity for LocationInWork {
    const ENTITY: &'static str = "Location link";
    const TABLE: &'static str = "location_in_work";
    const COLUMNS: &'static str = COLUMNS;
    const OWNER_JOIN: &'static str = "JOIN works w ON w.id = t.work_id";
    const OWNER_COLUMN: &'static str = "w.owner_id";
}

impl WorkScoped for LocationInWork {}

/// Provides CRUD operations for location links.
pub struct LocationInWorkRepo;

impl LocationInWorkRepo {
    /// Link a location into a work, returning the created row.
    pub async fn create(
        pool: &PgPool,
        work_id: DbId,
        input: &CreateLocationInWork,
    ) -> Result<LocationInWork, sqlx::Error> {
        let query = format!(
            "INSERT INTO location_in_work AS t (location_id, work_id, attributes)
             VALUES ($1, $2, COALESCE($3, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LocationInWork>(&query)
            .bind(input.location_id)
            .bind(work_id)
            .bind(&input.attributes)
            .fetch_one(pool)
            .await
    }

    /// List the locations linked into a work.
    pub async fn list_by_work(
        pool: &PgPool,
        work_id: DbId,
    ) -> Result<Vec<LocationInWork>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM location_in_work t
             WHERE t.work_id = $1
             ORDER BY {order}",
            order = LocationInWork::ORDER_BY,
        );
        sqlx::query_as::<_, LocationInWork>(&query)
            .bind(work_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a link's attributes if given.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLocationInWork,
    ) -> Result<Option<LocationInWork>, sqlx::Error> {
        let query = format!(
            "UPDATE location_in_work t SET attributes = COALESCE($2, t.attributes)
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LocationInWork>(&query)
            .bind(id)
            .bind(&input.attributes)
            .fetch_optional(pool)
            .await
    }
}
