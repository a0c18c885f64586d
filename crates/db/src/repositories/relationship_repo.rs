//! Repository for the `relationships` table.

use fabula_core::patch::split;
use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::relationship::{CreateRelationship, Relationship, UpdateRelationship};
use crate::ownership::{OwnedEntity, WorkScoped};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.work_id, t.from_id, t.to_id, t.kind, t.notes, \
                       t.created_at, t.updated_at";

impl OwnedEntity for Relationship {
    const ENTITY: &'static str = "Relationship";
    const TABLE: &'static str = "relationships";
    const COLUMNS: &'static str = COLUMNS;
    const OWNER_JOIN: &'static str = "JOIN works w ON w.id = t.work_id";
    const OWNER_COLUMN: &'static str = "w.owner_id";
}

impl WorkScoped for Relationship {}

/// Provides CRUD operations for relationships between cast entries.
pub struct RelationshipRepo;

impl RelationshipRepo {
    /// Insert a directed relationship within `work_id`.
    pub async fn create(
        pool: &PgPool,
        work_id: DbId,
        input: &CreateRelationship,
    ) -> Result<Relationship, sqlx::Error> {
        let query = format!(
            "INSERT INTO relationships AS t (work_id, from_id, to_id, kind, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(work_id)
            .bind(input.from_id)
            .bind(input.to_id)
            .bind(&input.kind)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List every relationship in a work.
    pub async fn list_by_work(
        pool: &PgPool,
        work_id: DbId,
    ) -> Result<Vec<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM relationships t
             WHERE t.work_id = $1
             ORDER BY {order}",
            order = Relationship::ORDER_BY,
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(work_id)
            .fetch_all(pool)
            .await
    }

    /// List outgoing relationships of one cast entry.
    pub async fn list_from(
        pool: &PgPool,
        from_id: DbId,
    ) -> Result<Vec<Relationship>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM relationships t
             WHERE t.from_id = $1
             ORDER BY {order}",
            order = Relationship::ORDER_BY,
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(from_id)
            .fetch_all(pool)
            .await
    }

    /// Update a relationship's label or notes.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRelationship,
    ) -> Result<Option<Relationship>, sqlx::Error> {
        let (notes_set, notes) = split(&input.notes);
        let query = format!(
            "UPDATE relationships t SET
                kind = COALESCE($2, t.kind),
                notes = CASE WHEN $3 THEN $4 ELSE t.notes END
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Relationship>(&query)
            .bind(id)
            .bind(&input.kind)
            .bind(notes_set)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }
}
