//! # Order Lifecycle Status
//!
//! The post-creation status progression for orders and bookings.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │   Pending ──► Confirmed ──► Processing ──► Shipped ──► Delivered       │
//! │      │            │             │             │                         │
//! │      └────────────┴──────┬──────┴─────────────┘                         │
//! │                          ▼                                              │
//! │                      Cancelled  (absorbing, from any non-terminal)      │
//! │                                                                         │
//! │   Movement is strictly forward, one step at a time. Skipping or        │
//! │   moving backward is a caller error, never silently corrected.         │
//! │                                                                         │
//! │   Property/experience bookings only exercise the Pending → Confirmed   │
//! │   prefix today, but share the same sum type so future statuses         │
//! │   (completed, no-show) are a non-breaking addition.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Order Status
// =============================================================================

/// The status of a persisted order or booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, payment not yet acknowledged.
    Pending,
    /// Accepted by the store / host.
    Confirmed,
    /// Being packed (retail).
    Processing,
    /// Handed to the courier (retail).
    Shipped,
    /// Received by the customer (retail).
    Delivered,
    /// Cancelled; absorbing terminal state.
    Cancelled,
}

impl OrderStatus {
    /// The forward progression, in order. `Cancelled` is deliberately
    /// outside the sequence: it is a branch, not a step.
    pub const SEQUENCE: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
    ];

    /// The next status in the forward progression, if any.
    pub fn successor(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// Ordinal position in the progress stepper.
    ///
    /// `Cancelled` maps to `None`: the UI renders it as a distinct terminal
    /// branch, not a step index.
    pub fn ordinal(self) -> Option<usize> {
        OrderStatus::SEQUENCE.iter().position(|s| *s == self)
    }

    /// Terminal states accept no further transition of any kind.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Attempts the transition to `next`.
    ///
    /// Permitted moves:
    /// - the immediate successor in [`OrderStatus::SEQUENCE`]
    /// - `Cancelled`, from any non-terminal state
    ///
    /// Everything else (backward, skipping, out of a terminal state) is a
    /// [`TransitionError`].
    pub fn advance(self, next: OrderStatus) -> Result<OrderStatus, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal { status: self });
        }
        if next == OrderStatus::Cancelled {
            return Ok(OrderStatus::Cancelled);
        }
        if self.successor() == Some(next) {
            return Ok(next);
        }
        Err(TransitionError::NotReachable { from: self, to: next })
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Settlement status of the payment attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Recorded but not yet acknowledged as settled.
    Pending,
    /// Settled.
    Paid,
    /// Returned to the customer after cancellation.
    Refunded,
}

impl PaymentStatus {
    /// Attempts the transition to `next`. Only `Pending → Paid` and
    /// `Paid → Refunded` are permitted (admin back-office path).
    pub fn advance(self, next: PaymentStatus) -> Result<PaymentStatus, TransitionError> {
        match (self, next) {
            (PaymentStatus::Pending, PaymentStatus::Paid)
            | (PaymentStatus::Paid, PaymentStatus::Refunded) => Ok(next),
            _ => Err(TransitionError::PaymentNotReachable { from: self, to: next }),
        }
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

// =============================================================================
// Transition Error
// =============================================================================

/// A rejected lifecycle transition.
///
/// These are caller errors: the admin UI (or a buggy caller) asked for a
/// move the lifecycle does not permit. The record is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// Backward or skipping move.
    #[error("cannot move order from {from:?} to {to:?}")]
    NotReachable { from: OrderStatus, to: OrderStatus },

    /// No transition leaves a terminal state.
    #[error("order is {status:?}, which is terminal")]
    Terminal { status: OrderStatus },

    /// Payment status moves only Pending → Paid → Refunded.
    #[error("cannot move payment from {from:?} to {to:?}")]
    PaymentNotReachable { from: PaymentStatus, to: PaymentStatus },
}

// =============================================================================
// Unit Tests
// =============================================================================
