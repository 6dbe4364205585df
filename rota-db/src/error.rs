//! Error types for database operations

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx database error
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored row could not be mapped back to a domain value
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, DbError>;

impl From<DbError> for rota_core::Error {
    fn from(err: DbError) -> Self {
        tracing::error!(error = %err, "Database operation failed");
        rota_core::Error::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rota_core::ErrorCode;

    #[test]
    fn test_db_errors_become_internal() {
        let err: rota_core::Error = DbError::InvalidData("bad status".to_string()).into();
        assert_eq!(err.code(), ErrorCode::InternalError);
        assert_eq!(err.public_message(), "internal error");
    }
}
