//! # Domain Types
//!
//! Core domain types used throughout the Safar storefront engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog (read-only to the engine)                                     │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Property     │   │   Experience    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  price          │   │  rate_per_night │   │  rate_per_person│       │
//! │  │  stock          │   │  max_guests     │   │  max_participants│      │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Persisted records (own frozen snapshots, never reference live data)   │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  RetailOrder    │   │ PropertyBooking │   │ExperienceBooking│       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           └─────────────────────┼─────────────────────┘                │
//! │                                 ▼                                       │
//! │                    OrderRecord (tagged union)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every persisted record has:
//! - `id`: UUID v4 - immutable, used for storage relations
//! - Human number: (`ORD-…`, `STY-…`, `EXP-…`) - short, shareable, used by
//!   the public tracking surface

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::guests::GuestComposition;
use crate::money::Money;
use crate::pricing::PriceBreakdown;
use crate::status::{OrderStatus, PaymentStatus};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (retail GST), 1200 bps = 12% (lodging/experience GST)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Catalog Records
// =============================================================================

/// A retail product available in the shop.
///
/// Supplied by the external catalog collaborator; read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the shop and on order lines.
    pub name: String,

    /// Current price in whole rupees.
    pub price: Money,

    /// Units available; caps the cart line quantity.
    pub stock: u32,

    /// Whether product is listed for sale (soft delete).
    pub is_active: bool,
}

/// A bookable stay property (homestay, cottage, lodge).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Property {
    pub id: String,
    pub name: String,
    pub location: String,

    /// Nightly rate in whole rupees.
    pub rate_per_night: Money,

    /// Capacity ceiling for billable guests (infants excluded).
    pub max_guests: u32,

    /// Whether the property currently accepts bookings.
    pub is_available: bool,
}

/// A bookable experience (trek, workshop, guided tour).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Experience {
    pub id: String,
    pub name: String,
    pub location: String,

    /// Per-person rate in whole rupees. Infants are always free.
    pub rate_per_person: Money,

    /// Capacity ceiling for billable participants.
    pub max_participants: u32,

    /// Whether the experience currently accepts bookings.
    pub is_available: bool,

    /// Offered time slots, e.g. "06:00 AM", "09:00 AM".
    pub time_slots: Vec<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery (retail) / cash on arrival (bookings).
    Cash,
    /// UPI transfer; customer supplies the transaction reference.
    Upi,
    /// Card payment on an external terminal or gateway page.
    Card,
    /// Direct bank transfer.
    BankTransfer,
}

impl PaymentMethod {
    /// Whether this method requires a user-supplied transaction reference.
    ///
    /// Cash is settled in person; everything else records the reference the
    /// customer got from their payment app or bank.
    #[inline]
    pub const fn requires_reference(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

/// Payment details frozen onto a persisted record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    pub status: PaymentStatus,

    /// User-supplied reference for non-cash methods.
    pub transaction_id: Option<String>,
}

impl PaymentDetails {
    /// Payment details at record creation: pending, with whatever reference
    /// the customer supplied.
    pub fn pending(method: PaymentMethod, transaction_id: Option<String>) -> Self {
        PaymentDetails {
            method,
            status: PaymentStatus::Pending,
            transaction_id,
        }
    }
}

// =============================================================================
// Price Snapshot Policy
// =============================================================================

/// When a line's price is read from the catalog.
///
/// The storefront intentionally differs per order kind: the retail cart
/// re-reads the live product price when checkout renders, while property and
/// experience bookings freeze the rate into the draft at creation. Neither
/// behavior is silently unified; the policy is explicit so a future decision
/// can flip one without archaeology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PricePolicy {
    /// Re-read the current catalog price when the checkout view renders.
    LiveAtRender,
    /// Keep the price captured when the line/draft was created.
    SnapshotAtAdd,
}

impl PricePolicy {
    /// The observed default per order kind.
    pub const fn default_for(kind: OrderKind) -> Self {
        match kind {
            OrderKind::Retail => PricePolicy::LiveAtRender,
            OrderKind::Property | OrderKind::Experience => PricePolicy::SnapshotAtAdd,
        }
    }
}

// =============================================================================
// Order Kind
// =============================================================================

/// The three kinds of purchasable flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderKind {
    Retail,
    Property,
    Experience,
}

// =============================================================================
// Contact & Address Snapshots
// =============================================================================

/// Contact details frozen onto a record at creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    pub full_name: String,
    pub phone: String,
    pub email: String,
}

/// Shipping address for retail orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address_line: String,
    pub city: String,
    pub state: String,
    /// 6-digit postal code.
    pub pincode: String,
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item frozen onto a retail order.
///
/// Uses the snapshot pattern: name and unit price are copied at commit time
/// so the record stays stable if the catalog changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    /// Product name at time of order (frozen).
    pub name: String,
    /// Unit price at time of order (frozen).
    pub unit_price: Money,
    pub quantity: u32,
}

impl OrderLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity as u64)
    }
}

// =============================================================================
// Persisted Records
// =============================================================================

/// A persisted retail order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RetailOrder {
    pub id: String,
    /// Human-shareable number, `ORD-…`. Generated once, never mutated.
    pub order_number: String,
    pub contact: ContactDetails,
    pub address: ShippingAddress,
    pub lines: Vec<OrderLine>,
    pub pricing: PriceBreakdown,
    pub payment: PaymentDetails,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub estimated_delivery: NaiveDate,
    /// Assigned by the back office when the order ships.
    pub tracking_number: Option<String>,
}

/// A persisted property (stay) booking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PropertyBooking {
    pub id: String,
    /// Human-shareable number, `STY-…`.
    pub booking_number: String,
    pub property_id: String,
    /// Property name at time of booking (frozen).
    pub property_name: String,
    pub contact: ContactDetails,
    #[ts(as = "String")]
    pub check_in: NaiveDate,
    #[ts(as = "String")]
    pub check_out: NaiveDate,
    pub guests: GuestComposition,
    pub special_requests: Option<String>,
    pub pricing: PriceBreakdown,
    pub payment: PaymentDetails,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
}

impl PropertyBooking {
    /// Number of nights in the stay. Positive by construction: a booking is
    /// only persisted after the validator has passed the date pair.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// A persisted experience (visit) booking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceBooking {
    pub id: String,
    /// Human-shareable number, `EXP-…`.
    pub booking_number: String,
    pub experience_id: String,
    /// Experience name at time of booking (frozen).
    pub experience_name: String,
    pub contact: ContactDetails,
    #[ts(as = "String")]
    pub visit_date: NaiveDate,
    pub time_slot: String,
    pub guests: GuestComposition,
    pub special_requests: Option<String>,
    pub pricing: PriceBreakdown,
    pub payment: PaymentDetails,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
}

// =============================================================================
// Order Record (tagged union)
// =============================================================================

/// Any persisted order or booking, matched exhaustively.
///
/// This replaces runtime duck-typing ("does the record have a `checkIn`
/// field?") with a sum type: the tracker, the store and the back office all
/// branch on the tag, and the compiler checks every arm.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderRecord {
    Retail(RetailOrder),
    Property(PropertyBooking),
    Experience(ExperienceBooking),
}

impl OrderRecord {
    /// Internal storage key.
    pub fn id(&self) -> &str {
        match self {
            OrderRecord::Retail(o) => &o.id,
            OrderRecord::Property(b) => &b.id,
            OrderRecord::Experience(b) => &b.id,
        }
    }

    /// Human-shareable order/booking number.
    pub fn number(&self) -> &str {
        match self {
            OrderRecord::Retail(o) => &o.order_number,
            OrderRecord::Property(b) => &b.booking_number,
            OrderRecord::Experience(b) => &b.booking_number,
        }
    }

    pub fn kind(&self) -> OrderKind {
        match self {
            OrderRecord::Retail(_) => OrderKind::Retail,
            OrderRecord::Property(_) => OrderKind::Property,
            OrderRecord::Experience(_) => OrderKind::Experience,
        }
    }

    pub fn status(&self) -> OrderStatus {
        match self {
            OrderRecord::Retail(o) => o.status,
            OrderRecord::Property(b) => b.status,
            OrderRecord::Experience(b) => b.status,
        }
    }

    pub fn payment(&self) -> &PaymentDetails {
        match self {
            OrderRecord::Retail(o) => &o.payment,
            OrderRecord::Property(b) => &b.payment,
            OrderRecord::Experience(b) => &b.payment,
        }
    }

    pub fn pricing(&self) -> &PriceBreakdown {
        match self {
            OrderRecord::Retail(o) => &o.pricing,
            OrderRecord::Property(b) => &b.pricing,
            OrderRecord::Experience(b) => &b.pricing,
        }
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        match self {
            OrderRecord::Retail(o) => o.placed_at,
            OrderRecord::Property(b) => b.placed_at,
            OrderRecord::Experience(b) => b.placed_at,
        }
    }

    /// Advances the status, enforcing the monotonic lifecycle rule.
    ///
    /// Delegates to [`OrderStatus::advance`]: only the immediate successor
    /// or `Cancelled` (from a non-terminal state) is accepted.
    pub fn advance_status(
        &mut self,
        next: OrderStatus,
    ) -> Result<(), crate::status::TransitionError> {
        let advanced = self.status().advance(next)?;
        match self {
            OrderRecord::Retail(o) => o.status = advanced,
            OrderRecord::Property(b) => b.status = advanced,
            OrderRecord::Experience(b) => b.status = advanced,
        }
        Ok(())
    }

    /// Advances the payment status (admin back-office path).
    pub fn advance_payment_status(
        &mut self,
        next: PaymentStatus,
    ) -> Result<(), crate::status::TransitionError> {
        let current = self.payment().status;
        let advanced = current.advance(next)?;
        match self {
            OrderRecord::Retail(o) => o.payment.status = advanced,
            OrderRecord::Property(b) => b.payment.status = advanced,
            OrderRecord::Experience(b) => b.payment.status = advanced,
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1200);
        assert_eq!(rate.bps(), 1200);
        assert!((rate.percentage() - 12.0).abs() < 0.001);
    }

    #[test]
    fn test_payment_method_reference_requirement() {
        assert!(!PaymentMethod::Cash.requires_reference());
        assert!(PaymentMethod::Upi.requires_reference());
        assert!(PaymentMethod::Card.requires_reference());
        assert!(PaymentMethod::BankTransfer.requires_reference());
    }

    #[test]
    fn test_price_policy_defaults_per_kind() {
        assert_eq!(
            PricePolicy::default_for(OrderKind::Retail),
            PricePolicy::LiveAtRender
        );
        assert_eq!(
            PricePolicy::default_for(OrderKind::Property),
            PricePolicy::SnapshotAtAdd
        );
        assert_eq!(
            PricePolicy::default_for(OrderKind::Experience),
            PricePolicy::SnapshotAtAdd
        );
    }

    #[test]
    fn test_order_line_total() {
        let line = OrderLine {
            product_id: "p1".to_string(),
            name: "Kangra Tea".to_string(),
            unit_price: Money::from_rupees(200),
            quantity: 2,
        };
        assert_eq!(line.line_total().rupees(), 400);
    }
}
