//! # Order Store
//!
//! Persistence operations for orders and bookings.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     OrderStore Contract                                 │
//! │                                                                         │
//! │  create_*            inserts the complete record and returns its id,   │
//! │                      or fails atomically - no partial record. The      │
//! │                      human number must be unique forever.              │
//! │                                                                         │
//! │  update_status       re-checks the monotonic lifecycle rule even       │
//! │                      though the engine checks it too: the admin back   │
//! │                      office calls this directly.                       │
//! │                                                                         │
//! │  find_by_number      the public tracking surface - resolves the        │
//! │                      short shareable number, never the internal id.    │
//! │                                                                         │
//! │  Records are never deleted: cancellation is a status.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use safar_core::{
    ExperienceBooking, OrderRecord, OrderStatus, PaymentStatus, PropertyBooking, RetailOrder,
};

use crate::error::StoreResult;

/// The order/booking persistence collaborator.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a retail order; returns its id.
    async fn create_retail_order(&self, order: RetailOrder) -> StoreResult<String>;

    /// Persists a property booking; returns its id.
    async fn create_property_booking(&self, booking: PropertyBooking) -> StoreResult<String>;

    /// Persists an experience booking; returns its id.
    async fn create_experience_booking(&self, booking: ExperienceBooking) -> StoreResult<String>;

    /// Fetches a record by internal id.
    async fn get_by_id(&self, id: &str) -> StoreResult<OrderRecord>;

    /// Resolves a human-shareable number to the full record.
    async fn find_by_number(&self, number: &str) -> StoreResult<OrderRecord>;

    /// Advances the lifecycle status (admin-triggered). Returns the
    /// updated record. Rejects backward or skipping moves.
    async fn update_status(&self, id: &str, next: OrderStatus) -> StoreResult<OrderRecord>;

    /// Advances the payment status (admin-triggered):
    /// Pending → Paid → Refunded only.
    async fn update_payment_status(
        &self,
        id: &str,
        next: PaymentStatus,
    ) -> StoreResult<OrderRecord>;

    /// Most recent records first, for the back-office list view.
    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<OrderRecord>>;
}
