//! Repository for the `character_in_work` table (a work's cast).

use fabula_core::patch::split;
use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::character_in_work::{
    CharacterInWork, CreateCharacterInWork, UpdateCharacterInWork,
};
use crate::ownership::{OwnedEntity, WorkScoped};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.character_id, t.work_id, t.image_url, t.attributes, \
                       t.created_at, t.updated_at";

impl OwnedEntity for CharacterInWork {
    const ENTITY: &'static str = "Cast entry";
    const TABLE: &'static str = "character_in_work";
    const COLUMNS: &'static str = COLUMNS;
    const OWNER_JOIN: &'static str = "JOIN works w ON w.id = t.work_id";
    const OWNER_COLUMN: &'static str = "w.owner_id";
}

impl WorkScoped for CharacterInWork {}

/// Provides CRUD operations for cast entries.
pub struct CharacterInWorkRepo;

impl CharacterInWorkRepo {
    /// Cast a character in a work, returning the created row.
    ///
    /// A second entry for the same pair fails on `uq_character_in_work_pair`.
    pub async fn create(
        pool: &PgPool,
        work_id: DbId,
        input: &CreateCharacterInWork,
    ) -> Result<CharacterInWork, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_in_work AS t (character_id, work_id, image_url, attributes)
             VALUES ($1, $2, $3, COALESCE($4, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterInWork>(&query)
            .bind(input.character_id)
            .bind(work_id)
            .bind(&input.image_url)
            .bind(&input.attributes)
            .fetch_one(pool)
            .await
    }

    /// List a work's cast in the order it was assembled.
    pub async fn list_by_work(
        pool: &PgPool,
        work_id: DbId,
    ) -> Result<Vec<CharacterInWork>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_in_work t
             WHERE t.work_id = $1
             ORDER BY {order}",
            order = CharacterInWork::ORDER_BY,
        );
        sqlx::query_as::<_, CharacterInWork>(&query)
            .bind(work_id)
            .fetch_all(pool)
            .await
    }

    /// List every work appearance of one character.
    pub async fn list_by_character(
        pool: &PgPool,
        character_id: DbId,
    ) -> Result<Vec<CharacterInWork>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_in_work t
             WHERE t.character_id = $1
             ORDER BY {order}",
            order = CharacterInWork::ORDER_BY,
        );
        sqlx::query_as::<_, CharacterInWork>(&query)
            .bind(character_id)
            .fetch_all(pool)
            .await
    }

    /// Update a cast entry's overrides.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacterInWork,
    ) -> Result<Option<CharacterInWork>, sqlx::Error> {
        let (image_url_set, image_url) = split(&input.image_url);
        let query = format!(
            "UPDATE character_in_work t SET
                attributes = COALESCE($2, t.attributes),
                image_url = CASE WHEN $3 THEN $4 ELSE t.image_url END
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterInWork>(&query)
            .bind(id)
            .bind(&input.attributes)
            .bind(image_url_set)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }
}
