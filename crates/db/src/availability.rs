//! "Not yet linked" queries for the add-existing pickers.
//!
//! For a candidate type `T` and a link table, the query returns every `T`
//! the user owns that has no link row against the target:
//!
//! ```text
//! SELECT t.* FROM <T> t
//! LEFT JOIN <link> l ON l.<candidate_fk> = t.id AND l.<target_fk> = $target
//! WHERE <owner> = $owner AND l.id IS NULL
//! ```
//!
//! It runs as one statement so the result is consistent with the link
//! table at that moment. Only the candidate side is owner-checked; callers
//! verify the target before asking.

use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::ownership::{OwnedEntity, WorkScoped};

/// Describes a link table from the point of view of an availability query.
#[derive(Debug, Clone, Copy)]
pub struct LinkTable {
    pub table: &'static str,
    /// Column referencing the candidate row.
    pub candidate_fk: &'static str,
    /// Column referencing the target row.
    pub target_fk: &'static str,
    /// Candidate and target are the same kind of row, so the target itself
    /// is never a candidate.
    pub reflexive: bool,
}

/// Characters not yet cast in a work.
pub const CAST: LinkTable = LinkTable {
    table: "character_in_work",
    candidate_fk: "character_id",
    target_fk: "work_id",
    reflexive: false,
};

/// Locations not yet linked into a work.
pub const WORK_LOCATIONS: LinkTable = LinkTable {
    table: "location_in_work",
    candidate_fk: "location_id",
    target_fk: "work_id",
    reflexive: false,
};

/// Cast entries a given cast entry has no outgoing relationship to.
pub const RELATIONSHIPS: LinkTable = LinkTable {
    table: "relationships",
    candidate_fk: "to_id",
    target_fk: "from_id",
    reflexive: true,
};

/// Cast entries not yet participating in an event.
pub const EVENT_PARTICIPANTS: LinkTable = LinkTable {
    table: "event_participants",
    candidate_fk: "character_in_work_id",
    target_fk: "event_id",
    reflexive: false,
};

/// Build the availability query.
///
/// Binds: `$1` owner, `$2` target, `$3` work (only when `work_column` is set).
pub(crate) fn available_sql<T: OwnedEntity>(link: &LinkTable, work_column: Option<&str>) -> String {
    let mut query = format!(
        "SELECT {cols} FROM {table} t {join} \
         LEFT JOIN {link} l ON l.{candidate_fk} = t.id AND l.{target_fk} = $2 \
         WHERE {owner} = $1 AND l.id IS NULL",
        cols = T::COLUMNS,
        table = T::TABLE,
        join = T::OWNER_JOIN,
        link = link.table,
        candidate_fk = link.candidate_fk,
        target_fk = link.target_fk,
        owner = T::OWNER_COLUMN,
    );
    if let Some(column) = work_column {
        query.push_str(&format!(" AND {column} = $3"));
    }
    if link.reflexive {
        query.push_str(" AND t.id <> $2");
    }
    query.push_str(&format!(" ORDER BY {}", T::ORDER_BY));
    query
}

/// Rows of `T` owned by `owner_id` that have no `link` row against `target_id`.
pub async fn list_available<T: OwnedEntity>(
    pool: &PgPool,
    link: &LinkTable,
    owner_id: DbId,
    target_id: DbId,
) -> Result<Vec<T>, sqlx::Error> {
    let query = available_sql::<T>(link, None);
    sqlx::query_as::<_, T>(&query)
        .bind(owner_id)
        .bind(target_id)
        .fetch_all(pool)
        .await
}

/// Like [`list_available`], restricted to candidates attached to `work_id`.
///
/// Used when both sides of the link are work-scoped (relationships, event
/// participants) and candidates from other works must not be offered.
pub async fn list_available_in_work<T: WorkScoped>(
    pool: &PgPool,
    link: &LinkTable,
    owner_id: DbId,
    target_id: DbId,
    work_id: DbId,
) -> Result<Vec<T>, sqlx::Error> {
    let query = available_sql::<T>(link, Some(T::WORK_COLUMN));
    sqlx::query_as::<_, T>(&query)
        .bind(owner_id)
        .bind(target_id)
        .bind(work_id)
        .fetch_all(pool)
        .await
}
