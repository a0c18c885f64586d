//! Owner-scoped lookups shared by every entity type.
//!
//! Every non-user row's ownership chain ends at exactly one user. Root
//! entities (works, characters, locations) carry `owner_id` directly; link
//! rows reach it by joining through their work. [`OwnedEntity`] describes
//! that path once per row type so [`OwnedRepo`] can fetch, list and delete
//! with the owner check inside the same statement.
//!
//! A lookup that misses returns `None` whether the row is absent or belongs
//! to someone else.

use fabula_core::types::DbId;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

/// A row type whose ownership can be resolved in SQL.
///
/// All SQL fragments use the alias `t` for the entity's own table.
pub trait OwnedEntity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    /// Name used in error messages (e.g. `"Work"`).
    const ENTITY: &'static str;
    /// Table the row lives in.
    const TABLE: &'static str;
    /// Select list, qualified with `t.`.
    const COLUMNS: &'static str;
    /// Joins from `t` to the table that holds `owner_id`. Empty for roots.
    const OWNER_JOIN: &'static str = "";
    /// Column compared against the requesting user's id.
    const OWNER_COLUMN: &'static str = "t.owner_id";
    /// Default ordering for listings.
    const ORDER_BY: &'static str = "t.created_at ASC";
}

/// An [`OwnedEntity`] that is attached to exactly one work.
pub trait WorkScoped: OwnedEntity {
    /// Column on `t` holding the work id.
    const WORK_COLUMN: &'static str = "t.work_id";
}

/// `SELECT` for one row by id, restricted to an owner.
pub(crate) fn find_owned_sql<T: OwnedEntity>() -> String {
    format!(
        "SELECT {cols} FROM {table} t {join} WHERE t.id = $1 AND {owner} = $2",
        cols = T::COLUMNS,
        table = T::TABLE,
        join = T::OWNER_JOIN,
        owner = T::OWNER_COLUMN,
    )
}

/// `DELETE` of one row by id, restricted to an owner.
///
/// The owner check runs in a sub-select so transitive joins work the same
/// way as for root tables.
pub(crate) fn delete_owned_sql<T: OwnedEntity>() -> String {
    format!(
        "DELETE FROM {table} WHERE id = (\
             SELECT t.id FROM {table} t {join} WHERE t.id = $1 AND {owner} = $2\
         )",
        table = T::TABLE,
        join = T::OWNER_JOIN,
        owner = T::OWNER_COLUMN,
    )
}

/// Provides owner-checked reads and deletes for any [`OwnedEntity`].
pub struct OwnedRepo;

impl OwnedRepo {
    /// Fetch a row by id only if `owner_id` owns it (directly or through
    /// its work).
    pub async fn find_owned<T: OwnedEntity>(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<T>, sqlx::Error> {
        let query = find_owned_sql::<T>();
        sqlx::query_as::<_, T>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List every row of `T` owned by `owner_id`.
    pub async fn list_owned<T: OwnedEntity>(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<T>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM {table} t {join} WHERE {owner} = $1 ORDER BY {order}",
            cols = T::COLUMNS,
            table = T::TABLE,
            join = T::OWNER_JOIN,
            owner = T::OWNER_COLUMN,
            order = T::ORDER_BY,
        );
        sqlx::query_as::<_, T>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a row by id only if `owner_id` owns it.
    ///
    /// Returns `true` if a row was removed. Dependent rows go with it
    /// through `ON DELETE CASCADE`.
    pub async fn delete_owned<T: OwnedEntity>(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = delete_owned_sql::<T>();
        let result = sqlx::query(&query)
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
