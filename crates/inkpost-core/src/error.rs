//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule failures detected before or around the store.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid {entity_type} ID format")]
    InvalidIdentifier {
        entity_type: &'static str,
        value: String,
    },

    #[error("{entity_type} not found")]
    NotFound { entity_type: &'static str },

    #[error("{0}")]
    Forbidden(String),

    /// Store failures are forwarded untouched and classified at the HTTP edge.
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Duplicate value for unique field `{field}`")]
    Duplicate { field: String },

    #[error("Schema validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Cannot cast `{value}` to an identifier for field `{field}`")]
    Cast { field: String, value: String },
}
