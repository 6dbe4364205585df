//! Error types for Rota
//!
//! Every error maps to a stable [`ErrorCode`] so callers can report it as a
//! `{code, message}` pair. Backend failures collapse into [`Error::Store`],
//! whose detail is logged but never shown to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Rota operations
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of conflict that rejected an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A team with the same name already exists
    TeamExists,
    /// A pull request with the same id already exists
    PrExists,
    /// The pull request is merged and its reviewers are frozen
    PrMerged,
    /// The user is not currently a reviewer of the pull request
    NotAssigned,
    /// No active teammate is available as a replacement
    NoCandidate,
}

impl ConflictKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConflictKind::TeamExists => ErrorCode::TeamExists,
            ConflictKind::PrExists => ErrorCode::PrExists,
            ConflictKind::PrMerged => ErrorCode::PrMerged,
            ConflictKind::NotAssigned => ErrorCode::NotAssigned,
            ConflictKind::NoCandidate => ErrorCode::NoCandidate,
        }
    }
}

/// Stable, caller-visible error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    TeamExists,
    PrExists,
    PrMerged,
    NotAssigned,
    NoCandidate,
    NotFound,
    BadRequest,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TeamExists => "TEAM_EXISTS",
            ErrorCode::PrExists => "PR_EXISTS",
            ErrorCode::PrMerged => "PR_MERGED",
            ErrorCode::NotAssigned => "NOT_ASSIGNED",
            ErrorCode::NoCandidate => "NO_CANDIDATE",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for Rota operations
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is missing or empty
    #[error("{0}")]
    Validation(String),

    /// A referenced team, user or pull request does not exist
    #[error("{0}")]
    NotFound(String),

    /// The operation conflicts with current state
    #[error("{message}")]
    Conflict { kind: ConflictKind, message: String },

    /// Unexpected failure in the storage backend
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound(message.into())
    }

    pub fn conflict(kind: ConflictKind, message: impl Into<String>) -> Self {
        Error::Conflict {
            kind,
            message: message.into(),
        }
    }

    /// The stable code reported to callers
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Validation(_) => ErrorCode::BadRequest,
            Error::NotFound(_) => ErrorCode::NotFound,
            Error::Conflict { kind, .. } => kind.code(),
            Error::Store(_) | Error::Config(_) | Error::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Message safe to show to callers; internal failures are flattened
    pub fn public_message(&self) -> String {
        match self.code() {
            ErrorCode::InternalError => "internal error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Build the `{code, message}` pair for this error
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.public_message(),
        }
    }
}

/// Caller-facing error payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_codes() {
        let err = Error::conflict(ConflictKind::NoCandidate, "no active replacement");
        assert_eq!(err.code(), ErrorCode::NoCandidate);
        assert_eq!(err.public_message(), "no active replacement");
    }

    #[test]
    fn test_store_errors_are_flattened() {
        let err = Error::Store("database is locked".to_string());
        let body = err.body();
        assert_eq!(body.code, ErrorCode::InternalError);
        assert_eq!(body.message, "internal error");
    }

    #[test]
    fn test_error_body_serialization() {
        let body = Error::not_found("resource not found").body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "resource not found");
    }
}
