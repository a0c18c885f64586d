//! Repository for the `tokens` table.

use fabula_core::scopes::TokenScope;
use fabula_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::token::{CreateToken, Token};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, token_hash, scope, expires_at, created_at";

/// Provides storage for issued tokens.
///
/// A signed token is only honoured while its row exists, so deleting the
/// row is how tokens are revoked or consumed.
pub struct TokenRepo;

impl TokenRepo {
    /// Insert a new token, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateToken) -> Result<Token, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO tokens (owner_id, token_hash, scope, expires_at)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Token>(&query)
            .bind(input.owner_id)
            .bind(&input.token_hash)
            .bind(input.scope.as_str())
            .bind(input.expires_at)
            .fetch_one(executor)
            .await
    }

    /// Find an unexpired token by hash and scope.
    pub async fn find_active(
        pool: &PgPool,
        token_hash: &str,
        scope: TokenScope,
    ) -> Result<Option<Token>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tokens
             WHERE token_hash = $1 AND scope = $2 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, Token>(&query)
            .bind(token_hash)
            .bind(scope.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Atomically consume an unexpired token: delete it and return the row.
    ///
    /// Of two concurrent consumers only one gets `Some`.
    pub async fn take<'e, E>(
        executor: E,
        token_hash: &str,
        scope: TokenScope,
    ) -> Result<Option<Token>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "DELETE FROM tokens
             WHERE token_hash = $1 AND scope = $2 AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Token>(&query)
            .bind(token_hash)
            .bind(scope.as_str())
            .fetch_optional(executor)
            .await
    }

    /// Delete a single token. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every token of `scope` owned by `owner_id`. Returns the count.
    pub async fn delete_for_owner<'e, E>(
        executor: E,
        owner_id: DbId,
        scope: TokenScope,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tokens WHERE owner_id = $1 AND scope = $2")
            .bind(owner_id)
            .bind(scope.as_str())
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every token of `scope` owned by `owner_id` except `keep`.
    pub async fn delete_for_owner_except<'e, E>(
        executor: E,
        owner_id: DbId,
        scope: TokenScope,
        keep: DbId,
    ) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result =
            sqlx::query("DELETE FROM tokens WHERE owner_id = $1 AND scope = $2 AND id <> $3")
                .bind(owner_id)
                .bind(scope.as_str())
                .bind(keep)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }

    /// Delete expired tokens. Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tokens WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
