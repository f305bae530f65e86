//! # Store Error Types
//!
//! Typed failures for the persistence/catalog boundary.
//!
//! ## Recovery Semantics
//! - `NotFound` is terminal for the current page (dedicated empty view),
//!   not a validation error.
//! - `Backend` is session-scoped and retryable: the checkout state machine
//!   stays in its pre-transition state so the user can resubmit.
//! - `InvalidTransition` is a caller error; the record is left untouched.

use thiserror::Error;

use safar_core::TransitionError;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence/catalog operation failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lookup miss: product, property, experience, order or booking.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A human-shareable number collided. Numbers are generated once and
    /// never reused, so a duplicate means the caller must regenerate.
    #[error("order number already exists: {number}")]
    DuplicateNumber { number: String },

    /// The requested lifecycle move is not permitted.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// The backing store failed. Surfaces to the UI as a single
    /// non-field-scoped "please retry" message.
    #[error("store operation failed: {0}")]
    Backend(String),
}

impl StoreError {
    /// Convenience constructor for lookup misses.
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            key: key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("property", "prop-9");
        assert_eq!(err.to_string(), "property not found: prop-9");

        let err = StoreError::DuplicateNumber {
            number: "ORD-123".to_string(),
        };
        assert!(err.to_string().contains("ORD-123"));
    }
}
