//! Typed failures raised by the domain services.
//!
//! Services return `anyhow::Result`; the REST layer downcasts to these types
//! to choose an HTTP status.

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("{kind} {id} was modified by someone else (expected version {expected})")]
    Conflict {
        kind: &'static str,
        id: String,
        expected: i64,
    },
}

impl DomainError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound { kind, id: id.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}
