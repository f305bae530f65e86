//! # safar-engine: Session Layer for the Safar Storefront
//!
//! Everything that lives for the duration of a visitor's session: the cart
//! and wishlist aggregates, the checkout state machines, the payment
//! gateway seam, and the tracking projection.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     safar-engine (THIS CRATE)                           │
//! │                                                                         │
//! │   ┌──────────┐  ┌──────────┐  ┌─────────────────┐  ┌──────────────┐   │
//! │   │   cart   │  │ wishlist │  │    checkout     │  │   tracking   │   │
//! │   │ handle + │  │ handle + │  │ Retail/Booking  │  │ number look- │   │
//! │   │ snapshot │  │ snapshot │  │ state machines  │  │ up + stepper │   │
//! │   └────┬─────┘  └──────────┘  └───────┬─────────┘  └──────┬───────┘   │
//! │        │                              │                    │           │
//! │        │        ┌──────────┐  ┌───────▼────────┐          │           │
//! │        │        │  config  │  │    gateway     │          │           │
//! │        │        │ SAFAR_*  │  │ Simulated /    │          │           │
//! │        │        │ env vars │  │ PaymentGateway │          │           │
//! │        │        └──────────┘  └────────────────┘          │           │
//! │        ▼                              ▼                    ▼           │
//! │   safar-core (pure rules)      safar-store (CatalogStore/OrderStore)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine owns sequencing and side effects; every business rule it
//! enforces (pricing, validation, lifecycle) is delegated to `safar-core`,
//! and every read/write goes through the `safar-store` traits.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod config;
pub mod gateway;
pub mod tracking;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartError, CartHandle, CartLine};
pub use checkout::{
    BookingCheckout, BookingConfirmation, BookingStep, CheckoutError, RetailCheckout,
    RetailConfirmation, RetailStep,
};
pub use config::EngineConfig;
pub use gateway::{
    AuthorizationRequest, Confirmation, DeclineReason, PaymentGateway, SimulatedGateway,
};
pub use tracking::{track, TrackedOrder, TrackingError, TrackStep};
pub use wishlist::{Wishlist, WishlistHandle};
