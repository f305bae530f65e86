//! # Error Types
//!
//! Domain-specific error types for safar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  safar-core errors (this file + status.rs)                             │
//! │  ├── ValidationError  - Field-scoped form validation failures          │
//! │  └── TransitionError  - Rejected lifecycle moves (status.rs)           │
//! │                                                                         │
//! │  safar-store errors (separate crate)                                   │
//! │  └── StoreError       - Persistence/catalog operation failures         │
//! │                                                                         │
//! │  safar-engine errors (separate crate)                                  │
//! │  ├── CartError        - Cart aggregate rule violations                 │
//! │  ├── CheckoutError    - State machine rejections                       │
//! │  └── TrackingError    - Tracking lookup misses                         │
//! │                                                                         │
//! │  ValidationError is special: it is returned as DATA (a field-keyed     │
//! │  map), never thrown, so the UI can render every offending field at     │
//! │  once.                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (limits, field names)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use serde::Serialize;
use thiserror::Error;

pub use crate::status::TransitionError;

// =============================================================================
// Validation Error
// =============================================================================

/// A single field-scoped validation failure.
///
/// These are recoverable, field-scoped, and always returned as data inside
/// a [`crate::validation::FieldErrors`] map — never raised. The message of
/// each variant is what the UI shows next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required field is missing or empty after trimming.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (phone, email, pincode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date that must be today-or-later lies in the past.
    #[error("{field} cannot be in the past")]
    DateInPast { field: String },

    /// Check-out must be strictly after check-in.
    #[error("check-out must be after check-in")]
    CheckOutNotAfterCheckIn,

    /// A booking needs at least one billable participant.
    #[error("at least one guest is required")]
    NoBillableGuests,

    /// Billable guests exceed the resource's capacity ceiling.
    ///
    /// Distinguished from the generic format errors so the UI copy can name
    /// the exact limit.
    #[error("guest count exceeds the maximum of {limit}")]
    CapacityExceeded { limit: u32 },

    /// Value is not in the allowed set (e.g. a time slot the experience
    /// does not offer).
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// The resource is not currently accepting bookings.
    #[error("{resource} is not currently available")]
    Unavailable { resource: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::CapacityExceeded { limit: 10 };
        assert_eq!(err.to_string(), "guest count exceeds the maximum of 10");
    }

    #[test]
    fn test_capacity_message_names_the_limit() {
        let err = ValidationError::CapacityExceeded { limit: 6 };
        assert!(err.to_string().contains("6"));
    }
}
