//! # Catalog Store
//!
//! Read-only access to the product, property and experience catalog.
//!
//! The engine only ever reads catalog state; writes belong to the admin
//! back office, outside this boundary.

use async_trait::async_trait;

use safar_core::{Experience, Product, Property};

use crate::error::StoreResult;

/// The catalog collaborator, as the engine sees it.
///
/// Implementations: [`crate::memory::MemoryStore`] for tests/demo, a
/// document database in production.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Looks up a product by id. `Err(NotFound)` on a miss.
    async fn get_product(&self, id: &str) -> StoreResult<Product>;

    /// Looks up a bookable property by id.
    async fn get_property(&self, id: &str) -> StoreResult<Property>;

    /// Looks up a bookable experience by id.
    async fn get_experience(&self, id: &str) -> StoreResult<Experience>;

    /// All active products, for the shop page.
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
}
