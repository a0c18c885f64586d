//! Repository for the `characters` table.

use fabula_core::patch::split;
use fabula_core::types::DbId;
use sqlx::PgPool;

use crate::models::character::{Character, CreateCharacter, UpdateCharacter};
use crate::ownership::OwnedEntity;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "t.id, t.owner_id, t.name, t.appearance, t.personality, t.bio, \
                       t.image_url, t.attributes, t.created_at, t.updated_at";

impl OwnedEntity for Character {
    const ENTITY: &'static str = "Character";
    const TABLE: &'static str = "characters";
    const COLUMNS: &'static str = COLUMNS;
    const ORDER_BY: &'static str = "t.name ASC, t.created_at ASC";
}

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    ///
    /// If `attributes` is `None`, defaults to `'{}'::jsonb`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateCharacter,
    ) -> Result<Character, sqlx::Error> {
        let query = format!(
            "INSERT INTO characters AS t
                (owner_id, name, appearance, personality, bio, image_url, attributes)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.appearance)
            .bind(&input.personality)
            .bind(&input.bio)
            .bind(&input.image_url)
            .bind(&input.attributes)
            .fetch_one(pool)
            .await
    }

    /// Update a character. Absent fields are kept and `null` clears a nullable one.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCharacter,
    ) -> Result<Option<Character>, sqlx::Error> {
        let (appearance_set, appearance) = split(&input.appearance);
        let (personality_set, personality) = split(&input.personality);
        let (bio_set, bio) = split(&input.bio);
        let (image_url_set, image_url) = split(&input.image_url);
        let query = format!(
            "UPDATE characters t SET
                name = COALESCE($2, t.name),
                attributes = COALESCE($3, t.attributes),
                appearance = CASE WHEN $4 THEN $5 ELSE t.appearance END,
                personality = CASE WHEN $6 THEN $7 ELSE t.personality END,
                bio = CASE WHEN $8 THEN $9 ELSE t.bio END,
                image_url = CASE WHEN $10 THEN $11 ELSE t.image_url END
             WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.attributes)
            .bind(appearance_set)
            .bind(appearance)
            .bind(personality_set)
            .bind(personality)
            .bind(bio_set)
            .bind(bio)
            .bind(image_url_set)
            .bind(image_url)
            .fetch_optional(pool)
            .await
    }
}
