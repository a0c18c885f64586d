//! Repository for the `works` table.

use fabula_core::patch::split;
use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::work::{CreateWork, UpdateWork, Work};
use crate::ownership::OwnedEntity;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.owner_id, t.title, t.annotation, t.synopsis, t.image_url, \
                       t.created_at, t.updated_at";

impl OwnedEntity for Work {
    const ENTITY: &'static str = "Work";
    const TABLE: &'static str = "works";
    const COLUMNS: &'static str = COLUMNS;
    const ORDER_BY: &'static str = "t.created_at DESC";
}

/// Provides CRUD operations for works.
pub struct WorkRepo;

impl WorkRepo {
    /// Insert a new work owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateWork,
    ) -> Result<Work, sqlx::Error> {
        let query = format!(
            "INSERT INTO works AS t (owner_id, title, annotation, synopsis, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.annotation)
            .bind(&input.synopsis)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Update a work. Absent fields are kept and `null` clears a nullable one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWork,
    ) -> Result<Option<Work>, sqlx::Error> {
        let (annotation_set, annotation) = split(&input.annotation);
        let (synopsis_set, synopsis) = split(&input.synopsis);
        let (image_url_set, image_url) = split(&input.image_url);
        let query = format!(
            "UPDATE works t SET
                title = COALESCE($2, t.title),
                annotation = CASE WHEN $3 THEN $4 ELSE t.annotation END,
                synopsis = CASE WHEN $5 THEN $6 ELSE t.synopsis END,
                image_url = CASE WHEN $7 THEN $8 ELSE t.image_url END
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Work>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(annotation_set)
            .bind(annotation)
            .bind(synopsis_set)
            .bind(synopsis)
            .bind(image_url_set)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }
}
