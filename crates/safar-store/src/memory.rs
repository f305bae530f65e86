//! # In-Memory Store
//!
//! A process-local document store backing the demo and the test suite.
//!
//! ## Concurrency Note
//! Each collection sits behind its own `tokio::sync::RwLock`. This protects
//! the maps themselves; it does NOT provide cross-session reservation.
//! Two sessions can both read a property's capacity, both validate, and
//! both book — the accepted capacity race. A compare-and-reserve primitive
//! would live exactly here (inside `create_*`) if it is ever required.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use safar_core::{
    Experience, ExperienceBooking, OrderRecord, OrderStatus, PaymentStatus, Product, Property,
    PropertyBooking, RetailOrder,
};

use crate::catalog::CatalogStore;
use crate::error::{StoreError, StoreResult};
use crate::orders::OrderStore;

// =============================================================================
// Memory Store
// =============================================================================

/// HashMap-backed implementation of both store traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<String, Product>>,
    properties: RwLock<HashMap<String, Property>>,
    experiences: RwLock<HashMap<String, Experience>>,
    /// Records keyed by internal id.
    orders: RwLock<HashMap<String, OrderRecord>>,
    /// Human number → internal id. Enforces number uniqueness.
    numbers: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    // -------------------------------------------------------------------------
    // Seeding (catalog writes belong to the back office, not the engine)
    // -------------------------------------------------------------------------

    pub async fn seed_product(&self, product: Product) {
        self.products.write().await.insert(product.id.clone(), product);
    }

    pub async fn seed_property(&self, property: Property) {
        self.properties
            .write()
            .await
            .insert(property.id.clone(), property);
    }

    pub async fn seed_experience(&self, experience: Experience) {
        self.experiences
            .write()
            .await
            .insert(experience.id.clone(), experience);
    }

    /// Inserts a record, enforcing number uniqueness. Either both maps are
    /// updated or neither is.
    async fn insert_record(&self, record: OrderRecord) -> StoreResult<String> {
        let id = record.id().to_string();
        let number = record.number().to_string();

        let mut numbers = self.numbers.write().await;
        if numbers.contains_key(&number) {
            return Err(StoreError::DuplicateNumber { number });
        }
        numbers.insert(number.clone(), id.clone());
        self.orders.write().await.insert(id.clone(), record);

        info!(id = %id, number = %number, "Record persisted");
        Ok(id)
    }
}

// =============================================================================
// CatalogStore Implementation
// =============================================================================

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get_product(&self, id: &str) -> StoreResult<Product> {
        self.products
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    async fn get_property(&self, id: &str) -> StoreResult<Property> {
        self.properties
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("property", id))
    }

    async fn get_experience(&self, id: &str) -> StoreResult<Experience> {
        self.experiences
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("experience", id))
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .await
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }
}

// =============================================================================
// OrderStore Implementation
// =============================================================================

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_retail_order(&self, order: RetailOrder) -> StoreResult<String> {
        debug!(number = %order.order_number, lines = order.lines.len(), "Creating retail order");
        self.insert_record(OrderRecord::Retail(order)).await
    }

    async fn create_property_booking(&self, booking: PropertyBooking) -> StoreResult<String> {
        debug!(number = %booking.booking_number, property = %booking.property_id, "Creating property booking");
        self.insert_record(OrderRecord::Property(booking)).await
    }

    async fn create_experience_booking(&self, booking: ExperienceBooking) -> StoreResult<String> {
        debug!(number = %booking.booking_number, experience = %booking.experience_id, "Creating experience booking");
        self.insert_record(OrderRecord::Experience(booking)).await
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<OrderRecord> {
        self.orders
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    async fn find_by_number(&self, number: &str) -> StoreResult<OrderRecord> {
        let numbers = self.numbers.read().await;
        let id = numbers
            .get(number.trim())
            .ok_or_else(|| StoreError::not_found("order", number))?;
        self.orders
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("order", number))
    }

    async fn update_status(&self, id: &str, next: OrderStatus) -> StoreResult<OrderRecord> {
        let mut orders = self.orders.write().await;
        let record = orders
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("order", id))?;

        record.advance_status(next)?;
        info!(id = %id, status = ?next, "Status advanced");
        Ok(record.clone())
    }

    async fn update_payment_status(
        &self,
        id: &str,
        next: PaymentStatus,
    ) -> StoreResult<OrderRecord> {
        let mut orders = self.orders.write().await;
        let record = orders
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("order", id))?;

        record.advance_payment_status(next)?;
        info!(id = %id, payment_status = ?next, "Payment status advanced");
        Ok(record.clone())
    }

    async fn list_recent(&self, limit: usize) -> StoreResult<Vec<OrderRecord>> {
        let mut records: Vec<OrderRecord> = self.orders.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.placed_at().cmp(&a.placed_at()));
        records.truncate(limit);
        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
