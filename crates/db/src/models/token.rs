//! Issued token model and DTOs.

use fabula_core::scopes::TokenScope;
use fabula_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct Token {
    pub id: DbId,
    pub owner_id: DbId,
    pub token_hash: String,
    #[sqlx(try_from = "String")]
    pub scope: TokenScope,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for persisting a freshly signed token.
#[derive(Debug)]
pub struct CreateToken {
    pub owner_id: DbId,
    pub token_hash: String,
    pub scope: TokenScope,
    pub expires_at: Timestamp,
}
