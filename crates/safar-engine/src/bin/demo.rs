//! End-to-end walkthrough of the storefront flows against the in-memory
//! store: a retail cart checkout, a property booking, and a tracking
//! lookup for each. Run with `cargo run --bin demo`.

use std::time::Duration;

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use safar_core::validation::{ShippingForm, StayForm};
use safar_core::{
    BookingDraft, ContactDetails, Experience, GuestComposition, Money, PaymentMethod, Product,
    Property, PropertyDraft,
};
use safar_engine::{
    track, BookingCheckout, CartHandle, EngineConfig, RetailCheckout, SimulatedGateway,
};
use safar_store::{CatalogStore, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = EngineConfig::from_env();
    info!(store = %config.store_name, "Starting demo");

    let store = seed().await;
    let gateway = SimulatedGateway::new(Duration::from_millis(config.gateway_delay_ms));

    retail_flow(&store, &config).await?;
    booking_flow(&store, &gateway).await?;

    Ok(())
}

async fn seed() -> MemoryStore {
    let store = MemoryStore::new();
    store
        .seed_product(Product {
            id: "tea-kangra".to_string(),
            name: "Kangra Green Tea".to_string(),
            price: Money::from_rupees(200),
            stock: 40,
            is_active: true,
        })
        .await;
    store
        .seed_product(Product {
            id: "honey-wild".to_string(),
            name: "Wild Forest Honey".to_string(),
            price: Money::from_rupees(150),
            stock: 25,
            is_active: true,
        })
        .await;
    store
        .seed_property(Property {
            id: "pine-view".to_string(),
            name: "Pine View Homestay".to_string(),
            location: "Bir".to_string(),
            rate_per_night: Money::from_rupees(1000),
            max_guests: 4,
            is_available: true,
        })
        .await;
    store
        .seed_experience(Experience {
            id: "paragliding".to_string(),
            name: "Tandem Paragliding".to_string(),
            location: "Bir Billing".to_string(),
            rate_per_person: Money::from_rupees(2500),
            max_participants: 6,
            is_available: true,
            time_slots: vec!["09:00".to_string(), "14:00".to_string()],
        })
        .await;
    store
}

fn contact() -> ContactDetails {
    ContactDetails {
        full_name: "Asha Devi".to_string(),
        phone: "9876543210".to_string(),
        email: "asha@example.com".to_string(),
    }
}

async fn retail_flow(
    store: &MemoryStore,
    config: &EngineConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- retail checkout ---");

    let tea = store.get_product("tea-kangra").await?;
    let honey = store.get_product("honey-wild").await?;

    let cart = CartHandle::new();
    cart.apply(|c| c.add(&tea, 2))?;
    cart.apply(|c| c.add(&honey, 1))?;
    let breakdown = cart.snapshot().breakdown();
    info!(
        subtotal = %config.format_currency(breakdown.subtotal),
        shipping = %config.format_currency(breakdown.shipping_fee),
        tax = %config.format_currency(breakdown.tax),
        total = %config.format_currency(breakdown.total),
        "Cart priced"
    );

    let mut checkout = RetailCheckout::begin(&cart, store).await?;
    checkout.submit_address(&ShippingForm {
        contact: contact(),
        address_line: "14 Mall Road".to_string(),
        city: "Dharamshala".to_string(),
        state: "Himachal Pradesh".to_string(),
        pincode: "176215".to_string(),
    })?;

    let confirmation = checkout
        .confirm(PaymentMethod::Cash, None, store, &cart, config)
        .await?;
    info!(
        number = %confirmation.order_number,
        total = %config.format_currency(confirmation.total),
        delivery = %confirmation.estimated_delivery,
        "Order placed"
    );

    let tracked = track(store, &confirmation.order_number).await?;
    info!(status = ?tracked.status, steps = tracked.steps.len(), "Tracking lookup");
    Ok(())
}

async fn booking_flow(
    store: &MemoryStore,
    gateway: &SimulatedGateway,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("--- property booking ---");

    let property = store.get_property("pine-view").await?;
    let today = Utc::now().date_naive();
    let form = StayForm {
        contact: contact(),
        check_in: Some(today + chrono::Duration::days(30)),
        check_out: Some(today + chrono::Duration::days(33)),
        guests: GuestComposition::new(),
        special_requests: Some("Early check-in if possible".to_string()),
    };

    let draft = PropertyDraft::new(form, &property, today).map_err(|errors| {
        format!(
            "booking form rejected: {:?}",
            errors.iter().map(|e| e.field.clone()).collect::<Vec<_>>()
        )
    })?;
    let draft = BookingDraft::Property(draft);
    info!(total = %draft.pricing().total, nights = 3, "Draft priced");

    let mut checkout = BookingCheckout::new(draft);
    checkout
        .submit_payment_method(PaymentMethod::Upi, Some("UPI-DEMO-1".to_string()), store)
        .await?;
    info!("Payment submitted, gateway processing");

    let confirmation = checkout.await_confirmation(gateway, store).await?;
    info!(number = %confirmation.booking_number, "Booking confirmed");

    let tracked = track(store, &confirmation.booking_number).await?;
    info!(status = ?tracked.status, position = ?tracked.position, "Tracking lookup");
    Ok(())
}
