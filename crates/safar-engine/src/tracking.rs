//! # Order Tracking
//!
//! Human-number lookup and the stepper projection for the tracking page.
//!
//! ## The Stepper Projection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tracking Projection                                │
//! │                                                                         │
//! │  "ORD-250612-0042" ──► find_by_number ──► TrackedOrder                  │
//! │                                                                         │
//! │  Retail (five-step stepper):                                            │
//! │    ● Placed ─ ● Confirmed ─ ◉ Processing ─ ○ Shipped ─ ○ Delivered     │
//! │                     reached up to and including the current position    │
//! │                                                                         │
//! │  Booking (two-step stepper):                                            │
//! │    ● Requested ─ ○ Confirmed                                            │
//! │                                                                         │
//! │  Cancelled orders have NO position on the stepper: the page shows      │
//! │  the cancelled banner instead of a progress bar.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use safar_core::{Money, OrderKind, OrderRecord, OrderStatus};
use safar_store::{OrderStore, StoreError};

// =============================================================================
// Tracking Error
// =============================================================================

/// Why a tracking lookup produced no page.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// No order carries this number. Deliberately does not distinguish
    /// "never existed" from "typo" - the page shows one message.
    #[error("no order found for {number}")]
    NotFound { number: String },

    #[error(transparent)]
    Store(StoreError),
}

// =============================================================================
// Projection Types
// =============================================================================

/// One dot on the tracking stepper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackStep {
    pub status: OrderStatus,
    pub label: &'static str,
    /// Filled in on the stepper (at or before the current position).
    pub reached: bool,
}

/// Everything the tracking page renders for one order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedOrder {
    pub number: String,
    pub kind: OrderKind,
    pub status: OrderStatus,
    /// Cancelled orders render a banner instead of the stepper.
    pub cancelled: bool,
    /// Position on the stepper; `None` when cancelled.
    pub position: Option<usize>,
    pub steps: Vec<TrackStep>,
    pub total: Money,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub placed_at: DateTime<Utc>,
    /// The full record, for the detail panel under the stepper.
    pub record: OrderRecord,
}

fn retail_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Order Placed",
        OrderStatus::Confirmed => "Confirmed",
        OrderStatus::Processing => "Processing",
        OrderStatus::Shipped => "Shipped",
        OrderStatus::Delivered => "Delivered",
        OrderStatus::Cancelled => "Cancelled",
    }
}

/// The stepper template for an order kind. Retail walks the full lifecycle;
/// bookings only ever show Requested → Confirmed.
fn steps_for(kind: OrderKind, position: Option<usize>) -> Vec<TrackStep> {
    let template: &[(OrderStatus, &'static str)] = match kind {
        OrderKind::Retail => &[
            (OrderStatus::Pending, "Order Placed"),
            (OrderStatus::Confirmed, "Confirmed"),
            (OrderStatus::Processing, "Processing"),
            (OrderStatus::Shipped, "Shipped"),
            (OrderStatus::Delivered, "Delivered"),
        ],
        OrderKind::Property | OrderKind::Experience => &[
            (OrderStatus::Pending, "Requested"),
            (OrderStatus::Confirmed, "Confirmed"),
        ],
    };

    template
        .iter()
        .enumerate()
        .map(|(i, &(status, label))| TrackStep {
            status,
            label,
            reached: position.is_some_and(|p| i <= p),
        })
        .collect()
}

// =============================================================================
// Lookup
// =============================================================================

/// Looks an order up by its human-shareable number and projects it for
/// the tracking page. Input is trimmed and upper-cased before the lookup,
/// numbers are shared over the phone.
pub async fn track(store: &dyn OrderStore, number: &str) -> Result<TrackedOrder, TrackingError> {
    let number = number.trim().to_uppercase();
    debug!(number = %number, "Tracking lookup");

    let record = match store.find_by_number(&number).await {
        Ok(record) => record,
        Err(StoreError::NotFound { .. }) => return Err(TrackingError::NotFound { number }),
        Err(err) => return Err(TrackingError::Store(err)),
    };

    let status = record.status();
    let cancelled = status == OrderStatus::Cancelled;
    let position = status.ordinal();
    // Booking steppers stop at Confirmed; clamp deeper retail-only states
    let position = match record.kind() {
        OrderKind::Retail => position,
        OrderKind::Property | OrderKind::Experience => position.map(|p| p.min(1)),
    };

    Ok(TrackedOrder {
        number: record.number().to_string(),
        kind: record.kind(),
        status,
        cancelled,
        position,
        steps: steps_for(record.kind(), position),
        total: record.pricing().total,
        placed_at: record.placed_at(),
        record,
    })
}

/// Human label for a status, as the detail panel prints it.
pub fn status_label(status: OrderStatus) -> &'static str {
    retail_label(status)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    use safar_core::{
        ContactDetails, ExperienceBooking, OrderLine, PaymentDetails, PaymentMethod,
        PriceBreakdown, PropertyBooking, RetailOrder, ShippingAddress,
    };
    use safar_store::MemoryStore;

    fn contact() -> ContactDetails {
        ContactDetails {
            full_name: "Asha Devi".to_string(),
            phone: "9876543210".to_string(),
            email: "asha@example.com".to_string(),
        }
    }

    fn retail_order(number: &str) -> RetailOrder {
        RetailOrder {
            id: Uuid::new_v4().to_string(),
            order_number: number.to_string(),
            contact: contact(),
            address: ShippingAddress {
                address_line: "14 Mall Road".to_string(),
                city: "Dharamshala".to_string(),
                state: "Himachal Pradesh".to_string(),
                pincode: "176215".to_string(),
            },
            lines: vec![OrderLine {
                product_id: "p1".to_string(),
                name: "Kangra Tea".to_string(),
                unit_price: Money::from_rupees(200),
                quantity: 2,
            }],
            pricing: PriceBreakdown {
                subtotal: Money::from_rupees(400),
                shipping_fee: Money::from_rupees(50),
                tax: Money::from_rupees(20),
                total: Money::from_rupees(470),
            },
            payment: PaymentDetails::pending(PaymentMethod::Cash, None),
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
            estimated_delivery: NaiveDate::from_ymd_opt(2099, 6, 20).unwrap(),
            tracking_number: None,
        }
    }

    fn property_booking(number: &str) -> PropertyBooking {
        PropertyBooking {
            id: Uuid::new_v4().to_string(),
            booking_number: number.to_string(),
            property_id: "prop-1".to_string(),
            property_name: "Pine View Homestay".to_string(),
            contact: contact(),
            check_in: NaiveDate::from_ymd_opt(2099, 6, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2099, 6, 13).unwrap(),
            guests: safar_core::GuestComposition::new(),
            special_requests: None,
            pricing: PriceBreakdown {
                subtotal: Money::from_rupees(3000),
                shipping_fee: Money::zero(),
                tax: Money::from_rupees(360),
                total: Money::from_rupees(3360),
            },
            payment: PaymentDetails::pending(PaymentMethod::Upi, Some("UPI123".to_string())),
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
        }
    }

    fn experience_booking(number: &str) -> ExperienceBooking {
        ExperienceBooking {
            id: Uuid::new_v4().to_string(),
            booking_number: number.to_string(),
            experience_id: "exp-1".to_string(),
            experience_name: "Sunrise Trek".to_string(),
            contact: contact(),
            visit_date: NaiveDate::from_ymd_opt(2099, 6, 10).unwrap(),
            time_slot: "06:00 AM".to_string(),
            guests: safar_core::GuestComposition::new(),
            special_requests: None,
            pricing: PriceBreakdown {
                subtotal: Money::from_rupees(1000),
                shipping_fee: Money::zero(),
                tax: Money::from_rupees(120),
                total: Money::from_rupees(1120),
            },
            payment: PaymentDetails::pending(PaymentMethod::Card, Some("AUTH42".to_string())),
            status: OrderStatus::Pending,
            placed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_unknown_number_is_not_found() {
        let store = MemoryStore::new();
        let err = track(&store, "ORD-000000000000-0000").await.unwrap_err();
        assert!(matches!(err, TrackingError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_lookup_trims_and_uppercases() {
        let store = MemoryStore::new();
        store
            .create_retail_order(retail_order("ORD-250612120000-0042"))
            .await
            .unwrap();

        let tracked = track(&store, "  ord-250612120000-0042 ").await.unwrap();
        assert_eq!(tracked.number, "ORD-250612120000-0042");
    }

    #[tokio::test]
    async fn test_retail_stepper_marks_reached_steps() {
        let store = MemoryStore::new();
        let id = store
            .create_retail_order(retail_order("ORD-250612120000-0001"))
            .await
            .unwrap();
        store
            .update_status(&id, OrderStatus::Confirmed)
            .await
            .unwrap();
        store
            .update_status(&id, OrderStatus::Processing)
            .await
            .unwrap();

        let tracked = track(&store, "ORD-250612120000-0001").await.unwrap();
        assert_eq!(tracked.kind, OrderKind::Retail);
        assert_eq!(tracked.position, Some(2));
        assert_eq!(tracked.steps.len(), 5);
        assert!(!tracked.cancelled);

        let reached: Vec<bool> = tracked.steps.iter().map(|s| s.reached).collect();
        assert_eq!(reached, vec![true, true, true, false, false]);
        assert_eq!(tracked.steps[0].label, "Order Placed");
        assert_eq!(tracked.steps[4].label, "Delivered");
    }

    #[tokio::test]
    async fn test_cancelled_order_has_no_position() {
        let store = MemoryStore::new();
        let id = store
            .create_retail_order(retail_order("ORD-250612120000-0002"))
            .await
            .unwrap();
        store
            .update_status(&id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let tracked = track(&store, "ORD-250612120000-0002").await.unwrap();
        assert!(tracked.cancelled);
        assert_eq!(tracked.position, None);
        // No step is filled; the page shows the cancelled banner
        assert!(tracked.steps.iter().all(|s| !s.reached));
    }

    #[tokio::test]
    async fn test_booking_stepper_is_the_two_step_pair() {
        let store = MemoryStore::new();
        let id = store
            .create_property_booking(property_booking("STY-250612120000-0003"))
            .await
            .unwrap();

        let tracked = track(&store, "STY-250612120000-0003").await.unwrap();
        assert_eq!(tracked.kind, OrderKind::Property);
        assert_eq!(tracked.steps.len(), 2);
        assert_eq!(tracked.steps[0].label, "Requested");
        assert_eq!(tracked.position, Some(0));

        store
            .update_status(&id, OrderStatus::Confirmed)
            .await
            .unwrap();
        let tracked = track(&store, "STY-250612120000-0003").await.unwrap();
        assert_eq!(tracked.position, Some(1));
        assert!(tracked.steps.iter().all(|s| s.reached));
    }

    #[tokio::test]
    async fn test_experience_stepper_mirrors_the_booking_pair() {
        let store = MemoryStore::new();
        let id = store
            .create_experience_booking(experience_booking("EXP-250612120000-0008"))
            .await
            .unwrap();

        let tracked = track(&store, "EXP-250612120000-0008").await.unwrap();
        assert_eq!(tracked.kind, OrderKind::Experience);
        assert_eq!(tracked.steps.len(), 2);
        assert_eq!(tracked.steps[0].label, "Requested");
        assert_eq!(tracked.position, Some(0));
        assert_eq!(tracked.total.rupees(), 1120);

        store
            .update_status(&id, OrderStatus::Confirmed)
            .await
            .unwrap();
        let tracked = track(&store, "EXP-250612120000-0008").await.unwrap();
        assert_eq!(tracked.position, Some(1));
        assert!(tracked.steps.iter().all(|s| s.reached));
    }

    #[tokio::test]
    async fn test_projection_carries_the_total_and_record() {
        let store = MemoryStore::new();
        store
            .create_retail_order(retail_order("ORD-250612120000-0004"))
            .await
            .unwrap();

        let tracked = track(&store, "ORD-250612120000-0004").await.unwrap();
        assert_eq!(tracked.total.rupees(), 470);
        match tracked.record {
            OrderRecord::Retail(order) => assert_eq!(order.lines.len(), 1),
            other => panic!("expected a retail record, got {other:?}"),
        }
    }
}
