//! # Guest Composition
//!
//! Typed head-count for bookings: adults, women, children, infants.
//!
//! ## Billing Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Who Counts Toward Capacity & Billing?                     │
//! │                                                                         │
//! │   adults    ✓ billable   ✓ capacity                                    │
//! │   women     ✓ billable   ✓ capacity                                    │
//! │   children  ✓ billable   ✓ capacity                                    │
//! │   infants   ✗ free       ✗ not counted   (tracked for display only)    │
//! │                                                                         │
//! │   billable_total = adults + women + children                            │
//! │                                                                         │
//! │   Ceiling enforcement is NOT done here: the composer is shared by      │
//! │   property and experience flows, whose ceilings differ. The booking    │
//! │   validator owns the capacity check.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Guest Field
// =============================================================================

/// The four counters of a guest composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GuestField {
    Adults,
    Women,
    Children,
    Infants,
}

// =============================================================================
// Guest Composition
// =============================================================================

/// A typed head-count for a booking.
///
/// ## Invariants
/// - A composition being edited in a booking session always has at least
///   one adult: [`GuestComposition::decrement`] floors `adults` at 1.
/// - All other counters floor at 0.
/// - `infants` never appears in any billed quantity or capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuestComposition {
    pub adults: u32,
    pub women: u32,
    pub children: u32,
    pub infants: u32,
}

impl GuestComposition {
    /// A fresh composition: one responsible adult, nobody else.
    pub const fn new() -> Self {
        GuestComposition {
            adults: 1,
            women: 0,
            children: 0,
            infants: 0,
        }
    }

    /// Adds one to `field`.
    ///
    /// Unconstrained at this layer: capacity ceilings belong to the booking
    /// validator so the composer stays reusable across booking kinds.
    pub fn increment(mut self, field: GuestField) -> Self {
        match field {
            GuestField::Adults => self.adults += 1,
            GuestField::Women => self.women += 1,
            GuestField::Children => self.children += 1,
            GuestField::Infants => self.infants += 1,
        }
        self
    }

    /// Subtracts one from `field`, flooring at 0 — except `adults`, which
    /// floors at 1 (an in-progress booking always keeps one responsible
    /// adult).
    pub fn decrement(mut self, field: GuestField) -> Self {
        match field {
            GuestField::Adults => self.adults = self.adults.saturating_sub(1).max(1),
            GuestField::Women => self.women = self.women.saturating_sub(1),
            GuestField::Children => self.children = self.children.saturating_sub(1),
            GuestField::Infants => self.infants = self.infants.saturating_sub(1),
        }
        self
    }

    /// The billable / capacity-counted figure: adults + women + children.
    ///
    /// Infants are tracked for display only and are always free.
    #[inline]
    pub const fn billable_total(&self) -> u32 {
        self.adults + self.women + self.children
    }
}

impl Default for GuestComposition {
    fn default() -> Self {
        GuestComposition::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
