//! Errors raised while constructing domain values.
//!
//! Role refusals from the DM slot are a separate type, [`crate::RoleError`].

use thiserror::Error;

/// A domain value could not be built from its raw input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input violated the value's invariants
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Input is not a UUID
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

impl DomainError {
    /// Validation failure with a human-readable reason.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
