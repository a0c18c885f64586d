//! Repository for the `locations` table, including the parent/child tree.

use fabula_core::patch::split;
use fabula_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::location::{CreateLocation, Location, UpdateLocation};
use crate::ownership::OwnedEntity;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.owner_id, t.parent_id, t.title, t.description, t.image_url, \
                       t.created_at, t.updated_at";

/// Recursive CTE yielding `param` and all of its ancestors as `chain(id, depth)`.
fn ancestor_chain(param: &str) -> String {
    format!(
        "WITH RECURSIVE chain AS (
            SELECT id, parent_id, 0 AS depth FROM locations WHERE id = {param}
            UNION ALL
            SELECT l.id, l.parent_id, c.depth + 1
            FROM locations l JOIN chain c ON l.id = c.parent_id
         ) "
    )
}

impl OwnedEntity for Location {
    const ENTITY: &'static str = "Location";
    const TABLE: &'static str = "locations";
    const COLUMNS: &'static str = COLUMNS;
    const ORDER_BY: &'static str = "t.title ASC, t.created_at ASC";
}

/// Provides CRUD operations for locations and their hierarchy.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location, returning the created row.
    ///
    /// The caller is responsible for checking that `parent_id`, if given,
    /// belongs to the same owner.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateLocation,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations AS t (owner_id, parent_id, title, description, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(owner_id)
            .bind(input.parent_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Update a location. Absent fields are kept and `null` clears a nullable one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let (description_set, description) = split(&input.description);
        let (image_url_set, image_url) = split(&input.image_url);
        let query = format!(
            "UPDATE locations t SET
                title = COALESCE($2, t.title),
                description = CASE WHEN $3 THEN $4 ELSE t.description END,
                image_url = CASE WHEN $5 THEN $6 ELSE t.image_url END
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(description_set)
            .bind(description)
            .bind(image_url_set)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }

    /// List the direct children of a location.
    pub async fn list_children(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations t
             WHERE t.parent_id = $1
             ORDER BY {order}",
            order = Location::ORDER_BY,
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Serialize tree mutations for one owner until the transaction ends.
    ///
    /// Two concurrent re-parentings can each pass the cycle check and
    /// still form a loop together; holding this lock makes the check and
    /// the update atomic with respect to each other.
    pub async fn lock_tree<'e, E>(executor: E, owner_id: DbId) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(owner_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Ids of `id` and all its ancestors, nearest first.
    pub async fn ancestors<'e, E>(executor: E, id: DbId) -> Result<Vec<DbId>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("{}SELECT id FROM chain ORDER BY depth", ancestor_chain("$1"));
        sqlx::query_scalar::<_, DbId>(&query)
            .bind(id)
            .fetch_all(executor)
            .await
    }

    /// Set `child_id`'s parent to `parent_id` if it currently has none.
    ///
    /// Returns `None` when the child already has a parent.
    pub async fn attach_child<'e, E>(
        executor: E,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<Option<Location>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE locations t SET parent_id = $1
             WHERE t.id = $2 AND t.parent_id IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(parent_id)
            .bind(child_id)
            .fetch_optional(executor)
            .await
    }

    /// Clear `child_id`'s parent if it is currently `parent_id`.
    ///
    /// Returns `true` if the link existed and was removed.
    pub async fn detach_child(
        pool: &PgPool,
        parent_id: DbId,
        child_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE locations SET parent_id = NULL WHERE id = $2 AND parent_id = $1")
                .bind(parent_id)
                .bind(child_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Owned root locations that could be attached under `parent_id`:
    /// everything without a parent except `parent_id` and its ancestors.
    pub async fn list_available_children(
        pool: &PgPool,
        owner_id: DbId,
        parent_id: DbId,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!(
            "{chain}SELECT {COLUMNS} FROM locations t
             WHERE t.owner_id = $1
               AND t.parent_id IS NULL
               AND t.id NOT IN (SELECT id FROM chain)
             ORDER BY {order}",
            chain = ancestor_chain("$2"),
            order = Location::ORDER_BY,
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(owner_id)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }
}
