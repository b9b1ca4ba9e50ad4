// Error types for account lookup and event validation

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Result type alias for domain operations
pub type Result<T> = std::result::Result<T, DomainError>;

/// Errors that can occur in account and event operations
#[derive(Debug, Error)]
pub enum DomainError {
    /// Keyed record is absent. The message carries the queried key verbatim.
    #[error("{0}")]
    NotFound(String),

    /// Caller input failed validation
    #[error("Bad request: {0}")]
    BadRequest(ValidationErrors),

    /// Record with the same unique key already exists
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Credentials missing or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Storage collaborator failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    /// Create a not found error for an account username
    pub fn account_not_found(username: &str) -> Self {
        DomainError::NotFound(format!("Account not found: {}", username))
    }

    /// Create a not found error for an event id
    pub fn event_not_found(id: impl std::fmt::Display) -> Self {
        DomainError::NotFound(format!("Event not found: {}", id))
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }

    /// Create an unauthorized error
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        DomainError::Unauthorized(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl std::fmt::Display) -> Self {
        DomainError::Storage(msg.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound(_))
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        DomainError::BadRequest(errors)
    }
}
