//! # safar-core: Pure Business Logic for the Safar Storefront
//!
//! This crate is the **heart** of the Safar booking and retail engine. It
//! contains all business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Safar Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (storefront pages)                  │   │
//! │  │    Shop ──► Cart ──► Checkout        Stay/Visit ──► Booking     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  safar-engine (session layer)                   │   │
//! │  │    cart handle, checkout state machines, tracking               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ safar-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  pricing  │  │ validation│  │  status   │  │   │
//! │  │   │   Money   │  │ breakdown │  │ FieldErrs │  │ lifecycle │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │  guests   │  │   draft   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 safar-store (persistence boundary)              │   │
//! │  │          CatalogStore / OrderStore traits, MemoryStore          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`guests`] - Typed guest head-counts and the billable-total rule
//! - [`pricing`] - The pure pricing calculator for all three order kinds
//! - [`validation`] - The booking validator (field-keyed error maps)
//! - [`draft`] - Validated, priced booking drafts
//! - [`status`] - The order/booking lifecycle sum type
//! - [`types`] - Catalog and persisted-record types
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, clock access is FORBIDDEN here ("today" is a parameter)
//! 3. **Integer Money**: All monetary values are whole rupees (u64), no floats
//! 4. **Errors as Data**: Validation failures are field-keyed maps, never exceptions
//!
//! ## Example Usage
//!
//! ```rust
//! use safar_core::money::Money;
//! use safar_core::pricing::{price, PricingInput, RetailLine};
//!
//! let breakdown = price(&PricingInput::RetailCart {
//!     lines: vec![
//!         RetailLine { unit_price: Money::from_rupees(200), quantity: 2 },
//!         RetailLine { unit_price: Money::from_rupees(150), quantity: 1 },
//!     ],
//! });
//!
//! assert_eq!(breakdown.subtotal.rupees(), 550);
//! assert_eq!(breakdown.shipping_fee.rupees(), 0); // free over ₹500
//! assert_eq!(breakdown.tax.rupees(), 28);         // 5%, rounded half-up
//! assert_eq!(breakdown.total.rupees(), 578);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod guests;
pub mod money;
pub mod pricing;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use safar_core::Money` instead of
// `use safar_core::money::Money`

pub use draft::{BookingDraft, ExperienceDraft, PropertyDraft};
pub use error::{TransitionError, ValidationError};
pub use guests::{GuestComposition, GuestField};
pub use money::Money;
pub use pricing::{nights_between, price, PriceBreakdown, PricingInput, RetailLine};
pub use status::{OrderStatus, PaymentStatus};
pub use types::*;
pub use validation::{FieldErrors, ShippingForm, StayForm, VisitForm};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Retail orders ship free strictly above this subtotal.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_rupees(500);

/// Flat shipping fee below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: Money = Money::from_rupees(50);

/// Retail GST, in basis points (5%).
pub const RETAIL_TAX_RATE: u32 = 500;

/// Lodging/experience GST, in basis points (12%).
pub const LODGING_TAX_RATE: u32 = 1200;

/// Maximum unique lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable order sizes.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 99 instead of 9).
/// The per-product stock cap applies on top of this.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Default delivery estimate for retail orders, in days after placement.
pub const DELIVERY_ESTIMATE_DAYS: i64 = 5;
