#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Also returned for rows that do not exist, so a caller cannot tell
    /// another user's id from a missing one.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The uniform rejection for an entity the requester cannot see.
    pub fn forbidden(entity: &'static str) -> Self {
        CoreError::Forbidden(format!("{entity} is not accessible"))
    }
}
