//! # Checkout State Machines
//!
//! The ordered checkout steps per order kind.
//!
//! ## The Two Families
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout State Machines                              │
//! │                                                                         │
//! │  Retail cart (multi-item):                                              │
//! │                                                                         │
//! │    Address ◄──────── Payment ─────────► Confirmed                       │
//! │       │      back       │    confirm        terminal                    │
//! │       └──────────────── ┘                                               │
//! │    persist happens ON the Payment → Confirmed transition:               │
//! │    persist order → clear cart → emit number, atomically from the       │
//! │    caller's view. A store failure leaves step AND cart untouched.      │
//! │                                                                         │
//! │  Single-resource booking (property/experience):                         │
//! │    the booking form lives on its own page and produces a               │
//! │    BookingDraft; checkout for the draft is then                        │
//! │                                                                         │
//! │    PaymentMethod ──► Processing ──► Confirmed                           │
//! │         persist        gateway        terminal                          │
//! │         Pending/Pending (simulated)                                     │
//! │                                                                         │
//! │  Forward transitions require an EMPTY error map from the validator;    │
//! │  on failure the machine stays put and surfaces the map. Terminal       │
//! │  states reject every further transition explicitly - never a silent   │
//! │  state change.                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use safar_core::validation::{validate_payment, validate_shipping, FieldErrors, ShippingForm};
use safar_core::{
    BookingDraft, ContactDetails, ExperienceBooking, Money, OrderKind, OrderStatus,
    PaymentDetails, PaymentMethod, PriceBreakdown, PricePolicy, PropertyBooking, RetailOrder,
    ShippingAddress,
};
use safar_store::{CatalogStore, OrderStore, StoreError};

use crate::cart::{Cart, CartHandle, CartLine};
use crate::config::EngineConfig;
use crate::gateway::{AuthorizationRequest, DeclineReason, PaymentGateway};

// =============================================================================
// Checkout Error
// =============================================================================

/// Why a checkout transition was refused.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The step's validator returned a non-empty map. The machine did not
    /// move; the map is surfaced so the UI can mark every field.
    #[error("validation failed on {} field(s)", .0.len())]
    Invalid(FieldErrors),

    /// Checkout cannot start on an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// The requested action does not belong to the current step.
    #[error("cannot {action} during the {step} step")]
    WrongStep {
        step: &'static str,
        action: &'static str,
    },

    /// The session reached a terminal state; a fresh session is required
    /// to buy again.
    #[error("checkout is already complete")]
    Completed,

    /// Persistence failed. Session-scoped and retryable: the machine kept
    /// its pre-transition state, so the user can resubmit as-is.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The payment gateway declined. The session stays in Processing.
    #[error(transparent)]
    Declined(#[from] DeclineReason),
}

// =============================================================================
// Confirmations
// =============================================================================

/// What the confirmation page shows for a retail order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailConfirmation {
    pub order_id: String,
    pub order_number: String,
    pub total: Money,
    #[serde(with = "naive_date_serde")]
    pub estimated_delivery: NaiveDate,
}

/// What the confirmation page shows for a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub booking_number: String,
    pub total: Money,
}

mod naive_date_serde {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        date.to_string().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Retail Checkout
// =============================================================================

/// Steps of the retail cart checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetailStep {
    Address,
    Payment,
    Confirmed,
}

/// The ephemeral retail checkout session.
///
/// Created when checkout starts, destroyed on commit or navigation away.
/// Never persisted.
#[derive(Debug)]
pub struct RetailCheckout {
    step: RetailStep,
    /// The cart snapshot being bought, prices per `policy`.
    cart: Cart,
    policy: PricePolicy,
    address: Option<(ContactDetails, ShippingAddress)>,
}

impl RetailCheckout {
    /// Starts a checkout session for the current cart, applying the retail
    /// default price policy (`LiveAtRender`).
    pub async fn begin(
        handle: &CartHandle,
        catalog: &dyn CatalogStore,
    ) -> Result<Self, CheckoutError> {
        Self::begin_with_policy(handle, catalog, PricePolicy::default_for(OrderKind::Retail)).await
    }

    /// Starts a checkout session under an explicit price policy.
    pub async fn begin_with_policy(
        handle: &CartHandle,
        catalog: &dyn CatalogStore,
        policy: PricePolicy,
    ) -> Result<Self, CheckoutError> {
        let snapshot = handle.snapshot();
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let cart = match policy {
            // Retail re-reads the live catalog price at render time
            PricePolicy::LiveAtRender => {
                let mut lines = Vec::with_capacity(snapshot.lines.len());
                for line in &snapshot.lines {
                    let product = catalog.get_product(&line.product_id).await?;
                    lines.push(CartLine {
                        unit_price: product.price,
                        ..line.clone()
                    });
                }
                Cart {
                    version: snapshot.version,
                    lines,
                    created_at: snapshot.created_at,
                }
            }
            PricePolicy::SnapshotAtAdd => (*snapshot).clone(),
        };

        debug!(lines = cart.line_count(), total = %cart.breakdown().total, "Retail checkout started");
        Ok(RetailCheckout {
            step: RetailStep::Address,
            cart,
            policy,
            address: None,
        })
    }

    pub fn step(&self) -> RetailStep {
        self.step
    }

    pub fn policy(&self) -> PricePolicy {
        self.policy
    }

    /// The breakdown the review panel shows.
    pub fn breakdown(&self) -> PriceBreakdown {
        self.cart.breakdown()
    }

    /// Address step: validates the shipping form and advances to Payment.
    pub fn submit_address(&mut self, form: &ShippingForm) -> Result<(), CheckoutError> {
        match self.step {
            RetailStep::Address => {}
            RetailStep::Payment => {
                return Err(CheckoutError::WrongStep {
                    step: "payment",
                    action: "submit the address form",
                })
            }
            RetailStep::Confirmed => return Err(CheckoutError::Completed),
        }

        let errors = validate_shipping(form);
        if !errors.is_empty() {
            return Err(CheckoutError::Invalid(errors));
        }

        self.address = Some((
            ContactDetails {
                full_name: form.contact.full_name.trim().to_string(),
                phone: form.contact.phone.trim().to_string(),
                email: form.contact.email.trim().to_string(),
            },
            form.to_address(),
        ));
        self.step = RetailStep::Payment;
        Ok(())
    }

    /// Backward transition: allowed only from Payment. The collected
    /// address is kept so the form re-renders filled in.
    pub fn back_to_address(&mut self) -> Result<(), CheckoutError> {
        match self.step {
            RetailStep::Payment => {
                self.step = RetailStep::Address;
                Ok(())
            }
            RetailStep::Address => Err(CheckoutError::WrongStep {
                step: "address",
                action: "go back",
            }),
            RetailStep::Confirmed => Err(CheckoutError::Completed),
        }
    }

    /// The commit: validates the payment step, persists the order, clears
    /// the cart and reaches Confirmed — in that order.
    ///
    /// If persistence fails, neither the step nor the cart changes; the
    /// caller can resubmit without re-entering anything.
    pub async fn confirm(
        &mut self,
        method: PaymentMethod,
        transaction_id: Option<String>,
        store: &dyn OrderStore,
        handle: &CartHandle,
        config: &EngineConfig,
    ) -> Result<RetailConfirmation, CheckoutError> {
        match self.step {
            RetailStep::Payment => {}
            RetailStep::Address => {
                return Err(CheckoutError::WrongStep {
                    step: "address",
                    action: "confirm the order",
                })
            }
            RetailStep::Confirmed => return Err(CheckoutError::Completed),
        }

        let errors = validate_payment(method, transaction_id.as_deref());
        if !errors.is_empty() {
            return Err(CheckoutError::Invalid(errors));
        }

        // Set when Address advanced to Payment; the step check above makes
        // the None arm unreachable
        let (contact, address) = match &self.address {
            Some(pair) => pair.clone(),
            None => {
                return Err(CheckoutError::WrongStep {
                    step: "payment",
                    action: "confirm without an address",
                })
            }
        };

        let now = Utc::now();
        let order = RetailOrder {
            id: Uuid::new_v4().to_string(),
            order_number: generate_number("ORD", now),
            contact,
            address,
            lines: self
                .cart
                .lines
                .iter()
                .map(|l| safar_core::OrderLine {
                    product_id: l.product_id.clone(),
                    name: l.name.clone(),
                    unit_price: l.unit_price,
                    quantity: l.quantity,
                })
                .collect(),
            pricing: self.cart.breakdown(),
            payment: PaymentDetails::pending(method, transaction_id),
            status: OrderStatus::Pending,
            placed_at: now,
            estimated_delivery: now.date_naive() + Duration::days(config.delivery_estimate_days),
            tracking_number: None,
        };
        let order_number = order.order_number.clone();
        let total = order.pricing.total;
        let estimated_delivery = order.estimated_delivery;

        // Persist FIRST; only a successful create may clear the cart
        let order_id = match store.create_retail_order(order).await {
            Ok(id) => id,
            Err(err) => {
                warn!(error = %err, "Order persistence failed, session kept for retry");
                return Err(err.into());
            }
        };

        handle.clear();
        self.step = RetailStep::Confirmed;
        info!(order_id = %order_id, number = %order_number, total = %total, "Order placed");

        Ok(RetailConfirmation {
            order_id,
            order_number,
            total,
            estimated_delivery,
        })
    }
}

// =============================================================================
// Booking Checkout
// =============================================================================

/// Steps of the single-resource booking checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStep {
    PaymentMethod,
    Processing,
    Confirmed,
}

/// The ephemeral booking checkout session.
///
/// Holds a [`BookingDraft`] produced by the booking form page. Persistence
/// happens exactly once, on PaymentMethod → Processing; the gateway then
/// drives Processing → Confirmed.
#[derive(Debug)]
pub struct BookingCheckout {
    step: BookingStep,
    draft: BookingDraft,
    method: Option<PaymentMethod>,
    booking_id: Option<String>,
    booking_number: Option<String>,
}

impl BookingCheckout {
    pub fn new(draft: BookingDraft) -> Self {
        BookingCheckout {
            step: BookingStep::PaymentMethod,
            draft,
            method: None,
            booking_id: None,
            booking_number: None,
        }
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn breakdown(&self) -> PriceBreakdown {
        self.draft.pricing()
    }

    /// Validates the payment selection and persists the booking record as
    /// Pending/Pending, entering Processing.
    ///
    /// A store failure leaves the machine in PaymentMethod for retry.
    pub async fn submit_payment_method(
        &mut self,
        method: PaymentMethod,
        transaction_id: Option<String>,
        store: &dyn OrderStore,
    ) -> Result<(), CheckoutError> {
        match self.step {
            BookingStep::PaymentMethod => {}
            BookingStep::Processing => {
                return Err(CheckoutError::WrongStep {
                    step: "processing",
                    action: "choose a payment method",
                })
            }
            BookingStep::Confirmed => return Err(CheckoutError::Completed),
        }

        let errors = validate_payment(method, transaction_id.as_deref());
        if !errors.is_empty() {
            return Err(CheckoutError::Invalid(errors));
        }

        let now = Utc::now();
        let id = Uuid::new_v4().to_string();
        let payment = PaymentDetails::pending(method, transaction_id);

        let (booking_id, number) = match &self.draft {
            BookingDraft::Property(draft) => {
                let number = generate_number("STY", now);
                let booking = PropertyBooking {
                    id: id.clone(),
                    booking_number: number.clone(),
                    property_id: draft.property_id().to_string(),
                    property_name: draft.property_name().to_string(),
                    contact: draft.contact().clone(),
                    check_in: draft.check_in(),
                    check_out: draft.check_out(),
                    guests: draft.guests(),
                    special_requests: draft.special_requests().map(str::to_string),
                    pricing: draft.pricing(),
                    payment,
                    status: OrderStatus::Pending,
                    placed_at: now,
                };
                (store.create_property_booking(booking).await?, number)
            }
            BookingDraft::Experience(draft) => {
                let number = generate_number("EXP", now);
                let booking = ExperienceBooking {
                    id: id.clone(),
                    booking_number: number.clone(),
                    experience_id: draft.experience_id().to_string(),
                    experience_name: draft.experience_name().to_string(),
                    contact: draft.contact().clone(),
                    visit_date: draft.visit_date(),
                    time_slot: draft.time_slot().to_string(),
                    guests: draft.guests(),
                    special_requests: draft.special_requests().map(str::to_string),
                    pricing: draft.pricing(),
                    payment,
                    status: OrderStatus::Pending,
                    placed_at: now,
                };
                (store.create_experience_booking(booking).await?, number)
            }
        };

        self.method = Some(method);
        self.booking_id = Some(booking_id);
        self.booking_number = Some(number.clone());
        self.step = BookingStep::Processing;
        info!(number = %number, kind = ?self.draft.kind(), "Booking persisted, awaiting gateway");
        Ok(())
    }

    /// Runs the gateway authorization and completes the booking.
    ///
    /// On success the record advances Pending → Confirmed, and the payment
    /// to Paid for non-cash methods. On a decline the session stays in
    /// Processing; no retry or timeout semantics are modeled.
    ///
    /// The two store updates are not atomic: if the status update lands but
    /// the payment update fails, the record is Confirmed with payment still
    /// Pending and the session stays in Processing. A retry then re-runs
    /// the gateway and trips the lifecycle rule on the second status
    /// update. Settling that window needs a combined update on the store
    /// side; until then the admin payment path is the manual fix.
    pub async fn await_confirmation(
        &mut self,
        gateway: &dyn PaymentGateway,
        store: &dyn OrderStore,
    ) -> Result<BookingConfirmation, CheckoutError> {
        match self.step {
            BookingStep::Processing => {}
            BookingStep::PaymentMethod => {
                return Err(CheckoutError::WrongStep {
                    step: "payment method",
                    action: "await confirmation",
                })
            }
            BookingStep::Confirmed => return Err(CheckoutError::Completed),
        }

        // All set when PaymentMethod advanced to Processing
        let (booking_id, number, method) =
            match (&self.booking_id, &self.booking_number, self.method) {
                (Some(id), Some(number), Some(method)) => (id.clone(), number.clone(), method),
                _ => {
                    return Err(CheckoutError::WrongStep {
                        step: "processing",
                        action: "confirm an unpersisted booking",
                    })
                }
            };

        let pricing = self.draft.pricing();
        let request = AuthorizationRequest {
            order_kind: self.draft.kind(),
            number: number.clone(),
            method,
            amount: pricing.total,
            transaction_id: None,
        };
        let confirmation = gateway.authorize(&request).await?;
        debug!(reference = %confirmation.reference, "Gateway authorized");

        store
            .update_status(&booking_id, OrderStatus::Confirmed)
            .await?;
        if method.requires_reference() {
            store
                .update_payment_status(&booking_id, safar_core::PaymentStatus::Paid)
                .await?;
        }

        self.step = BookingStep::Confirmed;
        info!(number = %number, "Booking confirmed");
        Ok(BookingConfirmation {
            booking_id,
            booking_number: number,
            total: pricing.total,
        })
    }
}

// =============================================================================
// Number Generation
// =============================================================================

/// Builds a human-shareable number: prefix, timestamp, random suffix.
/// Generated once at creation, never reused or mutated.
fn generate_number(prefix: &str, now: DateTime<Utc>) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    format!("{}-{}-{:04}", prefix, now.format("%y%m%d%H%M%S"), nanos % 10000)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use safar_core::validation::{StayForm, VisitForm};
    use safar_core::{
        Experience, ExperienceDraft, GuestComposition, OrderRecord, PaymentStatus, Product,
        Property, PropertyDraft,
    };
    use safar_store::{MemoryStore, StoreResult};

    use crate::gateway::{Confirmation, SimulatedGateway};

    // -------------------------------------------------------------------------
    // Test doubles
    // -------------------------------------------------------------------------

    /// OrderStore that fails every create (persistence-failure path).
    struct FailingStore;

    #[async_trait]
    impl OrderStore for FailingStore {
        async fn create_retail_order(&self, _: RetailOrder) -> StoreResult<String> {
            Err(StoreError::Backend("connection refused".to_string()))
        }
        async fn create_property_booking(&self, _: PropertyBooking) -> StoreResult<String> {
            Err(StoreError::Backend("connection refused".to_string()))
        }
        async fn create_experience_booking(&self, _: ExperienceBooking) -> StoreResult<String> {
            Err(StoreError::Backend("connection refused".to_string()))
        }
        async fn get_by_id(&self, id: &str) -> StoreResult<OrderRecord> {
            Err(StoreError::not_found("order", id))
        }
        async fn find_by_number(&self, number: &str) -> StoreResult<OrderRecord> {
            Err(StoreError::not_found("order", number))
        }
        async fn update_status(&self, id: &str, _: OrderStatus) -> StoreResult<OrderRecord> {
            Err(StoreError::not_found("order", id))
        }
        async fn update_payment_status(
            &self,
            id: &str,
            _: PaymentStatus,
        ) -> StoreResult<OrderRecord> {
            Err(StoreError::not_found("order", id))
        }
        async fn list_recent(&self, _: usize) -> StoreResult<Vec<OrderRecord>> {
            Ok(vec![])
        }
    }

    /// Gateway that declines everything.
    struct DecliningGateway;

    #[async_trait]
    impl PaymentGateway for DecliningGateway {
        async fn authorize(
            &self,
            _: &AuthorizationRequest,
        ) -> Result<Confirmation, DeclineReason> {
            Err(DeclineReason::Declined("insufficient funds".to_string()))
        }
    }

    // -------------------------------------------------------------------------
    // Fixtures
    // -------------------------------------------------------------------------

    fn product(id: &str, price: u64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Money::from_rupees(price),
            stock: 10,
            is_active: true,
        }
    }

    fn good_shipping_form() -> ShippingForm {
        ShippingForm {
            contact: ContactDetails {
                full_name: "Asha Devi".to_string(),
                phone: "9876543210".to_string(),
                email: "asha@example.com".to_string(),
            },
            address_line: "14 Mall Road".to_string(),
            city: "Dharamshala".to_string(),
            state: "Himachal Pradesh".to_string(),
            pincode: "176215".to_string(),
        }
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed_product(product("p1", 200)).await;
        store.seed_product(product("p2", 150)).await;
        store
    }

    fn filled_cart(store_products: &[Product]) -> CartHandle {
        let handle = CartHandle::new();
        handle.apply(|c| c.add(&store_products[0], 2)).unwrap();
        handle.apply(|c| c.add(&store_products[1], 1)).unwrap();
        handle
    }

    fn property_draft() -> BookingDraft {
        let property = Property {
            id: "prop-1".to_string(),
            name: "Pine View Homestay".to_string(),
            location: "Bir".to_string(),
            rate_per_night: Money::from_rupees(1000),
            max_guests: 4,
            is_available: true,
        };
        let form = StayForm {
            contact: ContactDetails {
                full_name: "Asha Devi".to_string(),
                phone: "9876543210".to_string(),
                email: "asha@example.com".to_string(),
            },
            check_in: Some(NaiveDate::from_ymd_opt(2099, 6, 10).unwrap()),
            check_out: Some(NaiveDate::from_ymd_opt(2099, 6, 13).unwrap()),
            guests: GuestComposition::new(),
            special_requests: None,
        };
        let today = NaiveDate::from_ymd_opt(2099, 6, 1).unwrap();
        BookingDraft::Property(PropertyDraft::new(form, &property, today).unwrap())
    }

    fn experience_draft() -> BookingDraft {
        let experience = Experience {
            id: "exp-1".to_string(),
            name: "Sunrise Trek".to_string(),
            location: "Triund".to_string(),
            rate_per_person: Money::from_rupees(500),
            max_participants: 6,
            is_available: true,
            time_slots: vec!["06:00 AM".to_string()],
        };
        let form = VisitForm {
            contact: ContactDetails {
                full_name: "Asha Devi".to_string(),
                phone: "9876543210".to_string(),
                email: "asha@example.com".to_string(),
            },
            visit_date: Some(NaiveDate::from_ymd_opt(2099, 6, 10).unwrap()),
            time_slot: Some("06:00 AM".to_string()),
            guests: GuestComposition {
                adults: 2,
                women: 0,
                children: 0,
                infants: 1,
            },
            special_requests: None,
        };
        let today = NaiveDate::from_ymd_opt(2099, 6, 1).unwrap();
        BookingDraft::Experience(ExperienceDraft::new(form, &experience, today).unwrap())
    }

    // -------------------------------------------------------------------------
    // Retail flow
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_retail_checkout_refuses_empty_cart() {
        let store = seeded_store().await;
        let handle = CartHandle::new();
        let err = RetailCheckout::begin(&handle, &store).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_retail_checkout_reprices_live() {
        let store = seeded_store().await;
        let handle = filled_cart(&[product("p1", 200), product("p2", 150)]);

        // Price changed in the catalog after the lines were added
        store.seed_product(product("p1", 300)).await;

        let checkout = RetailCheckout::begin(&handle, &store).await.unwrap();
        // LiveAtRender: 300×2 + 150 = 750, free shipping, tax 38
        let b = checkout.breakdown();
        assert_eq!(b.subtotal.rupees(), 750);
        assert_eq!(b.tax.rupees(), 38);

        // The cart page snapshot itself is untouched
        assert_eq!(handle.snapshot().lines[0].unit_price.rupees(), 200);
    }

    #[tokio::test]
    async fn test_retail_snapshot_policy_keeps_add_time_prices() {
        let store = seeded_store().await;
        let handle = filled_cart(&[product("p1", 200), product("p2", 150)]);
        store.seed_product(product("p1", 300)).await;

        let checkout =
            RetailCheckout::begin_with_policy(&handle, &store, PricePolicy::SnapshotAtAdd)
                .await
                .unwrap();
        assert_eq!(checkout.breakdown().subtotal.rupees(), 550);
    }

    #[tokio::test]
    async fn test_retail_happy_path_commits_once() {
        let store = seeded_store().await;
        let handle = filled_cart(&[product("p1", 200), product("p2", 150)]);
        let config = EngineConfig::default();

        let mut checkout = RetailCheckout::begin(&handle, &store).await.unwrap();
        assert_eq!(checkout.step(), RetailStep::Address);

        // Invalid address: machine stays put, map surfaced
        let err = checkout.submit_address(&ShippingForm::default()).unwrap_err();
        match err {
            CheckoutError::Invalid(errors) => assert!(errors.get("fullName").is_some()),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(checkout.step(), RetailStep::Address);

        checkout.submit_address(&good_shipping_form()).unwrap();
        assert_eq!(checkout.step(), RetailStep::Payment);

        // Back-navigation keeps the collected address
        checkout.back_to_address().unwrap();
        checkout.submit_address(&good_shipping_form()).unwrap();

        // Non-cash without a reference is refused at the gate
        let err = checkout
            .confirm(PaymentMethod::Upi, None, &store, &handle, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Invalid(_)));
        assert_eq!(checkout.step(), RetailStep::Payment);

        let confirmation = checkout
            .confirm(PaymentMethod::Cash, None, &store, &handle, &config)
            .await
            .unwrap();

        assert!(confirmation.order_number.starts_with("ORD-"));
        assert_eq!(confirmation.total.rupees(), 578);
        assert_eq!(checkout.step(), RetailStep::Confirmed);
        // Commit cleared the cart
        assert!(handle.snapshot().is_empty());

        // The record is findable by its human number, Pending/Pending
        let record = store.find_by_number(&confirmation.order_number).await.unwrap();
        assert_eq!(record.status(), OrderStatus::Pending);
        assert_eq!(record.payment().status, PaymentStatus::Pending);

        // Terminal: every further transition is an explicit rejection
        assert!(matches!(
            checkout.submit_address(&good_shipping_form()),
            Err(CheckoutError::Completed)
        ));
        assert!(matches!(
            checkout.back_to_address(),
            Err(CheckoutError::Completed)
        ));
        assert!(matches!(
            checkout
                .confirm(PaymentMethod::Cash, None, &store, &handle, &config)
                .await,
            Err(CheckoutError::Completed)
        ));
    }

    #[tokio::test]
    async fn test_retail_persistence_failure_keeps_cart_and_step() {
        let catalog = seeded_store().await;
        let handle = filled_cart(&[product("p1", 200), product("p2", 150)]);
        let config = EngineConfig::default();

        let mut checkout = RetailCheckout::begin(&handle, &catalog).await.unwrap();
        checkout.submit_address(&good_shipping_form()).unwrap();

        let err = checkout
            .confirm(PaymentMethod::Cash, None, &FailingStore, &handle, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Store(StoreError::Backend(_))));

        // Nothing moved: cart intact, step still Payment, retry possible
        assert_eq!(handle.snapshot().total_quantity(), 3);
        assert_eq!(checkout.step(), RetailStep::Payment);

        checkout
            .confirm(PaymentMethod::Cash, None, &catalog, &handle, &config)
            .await
            .unwrap();
        assert!(handle.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_retail_confirm_before_address_is_out_of_sequence() {
        let store = seeded_store().await;
        let handle = filled_cart(&[product("p1", 200), product("p2", 150)]);
        let config = EngineConfig::default();

        let mut checkout = RetailCheckout::begin(&handle, &store).await.unwrap();
        let err = checkout
            .confirm(PaymentMethod::Cash, None, &store, &handle, &config)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::WrongStep { .. }));
    }

    // -------------------------------------------------------------------------
    // Booking flow
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_booking_happy_path() {
        let store = MemoryStore::new();
        let gateway = SimulatedGateway::instant();

        let mut checkout = BookingCheckout::new(property_draft());
        assert_eq!(checkout.step(), BookingStep::PaymentMethod);
        assert_eq!(checkout.breakdown().total.rupees(), 3360);

        checkout
            .submit_payment_method(PaymentMethod::Upi, Some("UPI123".to_string()), &store)
            .await
            .unwrap();
        assert_eq!(checkout.step(), BookingStep::Processing);

        // Persisted exactly at the Processing transition, Pending/Pending
        let numbers = store.list_recent(1).await.unwrap();
        assert_eq!(numbers[0].status(), OrderStatus::Pending);
        assert!(numbers[0].number().starts_with("STY-"));

        let confirmation = checkout.await_confirmation(&gateway, &store).await.unwrap();
        assert_eq!(checkout.step(), BookingStep::Confirmed);
        assert_eq!(confirmation.total.rupees(), 3360);

        let record = store.get_by_id(&confirmation.booking_id).await.unwrap();
        assert_eq!(record.status(), OrderStatus::Confirmed);
        assert_eq!(record.payment().status, PaymentStatus::Paid);

        // Terminal session
        assert!(matches!(
            checkout.await_confirmation(&gateway, &store).await,
            Err(CheckoutError::Completed)
        ));
    }

    #[tokio::test]
    async fn test_experience_booking_happy_path() {
        let store = MemoryStore::new();
        let gateway = SimulatedGateway::instant();

        let mut checkout = BookingCheckout::new(experience_draft());
        // 2 billable × 500 = 1000, 12% tax ⇒ 1120; the infant rides free
        assert_eq!(checkout.breakdown().total.rupees(), 1120);

        checkout
            .submit_payment_method(PaymentMethod::Card, Some("AUTH42".to_string()), &store)
            .await
            .unwrap();
        assert_eq!(checkout.step(), BookingStep::Processing);

        let confirmation = checkout.await_confirmation(&gateway, &store).await.unwrap();
        assert!(confirmation.booking_number.starts_with("EXP-"));
        assert_eq!(confirmation.total.rupees(), 1120);

        // The persisted record froze the visit details from the draft
        let record = store.get_by_id(&confirmation.booking_id).await.unwrap();
        assert_eq!(record.kind(), OrderKind::Experience);
        assert_eq!(record.status(), OrderStatus::Confirmed);
        assert_eq!(record.payment().status, PaymentStatus::Paid);
        match record {
            OrderRecord::Experience(booking) => {
                assert_eq!(booking.experience_name, "Sunrise Trek");
                assert_eq!(
                    booking.visit_date,
                    NaiveDate::from_ymd_opt(2099, 6, 10).unwrap()
                );
                assert_eq!(booking.time_slot, "06:00 AM");
                assert_eq!(booking.guests.adults, 2);
                assert_eq!(booking.guests.infants, 1);
            }
            other => panic!("expected an experience record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_booking_requires_reference_for_upi() {
        let store = MemoryStore::new();
        let mut checkout = BookingCheckout::new(property_draft());

        let err = checkout
            .submit_payment_method(PaymentMethod::Upi, None, &store)
            .await
            .unwrap_err();
        match err {
            CheckoutError::Invalid(errors) => assert!(errors.get("transactionId").is_some()),
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert_eq!(checkout.step(), BookingStep::PaymentMethod);
        // Nothing was persisted
        assert!(store.list_recent(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_booking_cash_stays_payment_pending() {
        let store = MemoryStore::new();
        let gateway = SimulatedGateway::instant();
        let mut checkout = BookingCheckout::new(property_draft());

        checkout
            .submit_payment_method(PaymentMethod::Cash, None, &store)
            .await
            .unwrap();
        let confirmation = checkout.await_confirmation(&gateway, &store).await.unwrap();

        // Cash settles on arrival: confirmed booking, payment still pending
        let record = store.get_by_id(&confirmation.booking_id).await.unwrap();
        assert_eq!(record.status(), OrderStatus::Confirmed);
        assert_eq!(record.payment().status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_booking_store_failure_allows_retry() {
        let mut checkout = BookingCheckout::new(property_draft());

        let err = checkout
            .submit_payment_method(PaymentMethod::Cash, None, &FailingStore)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Store(StoreError::Backend(_))));
        assert_eq!(checkout.step(), BookingStep::PaymentMethod);

        // Retry against a working store succeeds
        let store = MemoryStore::new();
        checkout
            .submit_payment_method(PaymentMethod::Cash, None, &store)
            .await
            .unwrap();
        assert_eq!(checkout.step(), BookingStep::Processing);
    }

    #[tokio::test]
    async fn test_booking_decline_stays_in_processing() {
        let store = MemoryStore::new();
        let mut checkout = BookingCheckout::new(property_draft());
        checkout
            .submit_payment_method(PaymentMethod::Card, Some("AUTH9".to_string()), &store)
            .await
            .unwrap();

        let err = checkout
            .await_confirmation(&DecliningGateway, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Declined(_)));
        assert_eq!(checkout.step(), BookingStep::Processing);

        // The record is still Pending; no status moved
        let record = store.list_recent(1).await.unwrap().remove(0);
        assert_eq!(record.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_generated_numbers_carry_prefix() {
        let now = Utc::now();
        let number = generate_number("ORD", now);
        assert!(number.starts_with("ORD-"));
        assert_eq!(number.len(), "ORD-".len() + 12 + 1 + 4);
    }
}
