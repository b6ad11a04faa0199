//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed domain values.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid message dictionary entry '{key}': {message}")]
    InvalidDictionary { key: String, message: String },
}
