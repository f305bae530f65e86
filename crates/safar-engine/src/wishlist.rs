//! # Wishlist Aggregate
//!
//! Session-owned set of saved product ids, with the same versioned
//! immutable-snapshot mutation style as the cart.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

// =============================================================================
// Wishlist Snapshot
// =============================================================================

/// An immutable wishlist snapshot. Ids are unique and keep insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    pub version: u64,
    pub product_ids: Vec<String>,
}

impl Wishlist {
    pub fn new() -> Self {
        Wishlist::default()
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.product_ids.iter().any(|id| id == product_id)
    }

    pub fn len(&self) -> usize {
        self.product_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.product_ids.is_empty()
    }

    /// Returns a new snapshot with the id added (no-op if present).
    pub fn with(&self, product_id: &str) -> Wishlist {
        if self.contains(product_id) {
            return self.clone();
        }
        let mut ids = self.product_ids.clone();
        ids.push(product_id.to_string());
        Wishlist {
            version: self.version + 1,
            product_ids: ids,
        }
    }

    /// Returns a new snapshot with the id removed (no-op if absent).
    pub fn without(&self, product_id: &str) -> Wishlist {
        if !self.contains(product_id) {
            return self.clone();
        }
        Wishlist {
            version: self.version + 1,
            product_ids: self
                .product_ids
                .iter()
                .filter(|id| *id != product_id)
                .cloned()
                .collect(),
        }
    }

    /// The heart-icon toggle: add if absent, remove if present.
    pub fn toggled(&self, product_id: &str) -> Wishlist {
        if self.contains(product_id) {
            self.without(product_id)
        } else {
            self.with(product_id)
        }
    }
}

// =============================================================================
// Wishlist Handle
// =============================================================================

/// Session-owned handle, same snapshot-swap discipline as the cart handle.
#[derive(Debug, Default)]
pub struct WishlistHandle {
    current: Mutex<Arc<Wishlist>>,
}

impl WishlistHandle {
    pub fn new() -> Self {
        WishlistHandle::default()
    }

    pub fn snapshot(&self) -> Arc<Wishlist> {
        self.current.lock().expect("wishlist mutex poisoned").clone()
    }

    /// Toggles an id and returns the new snapshot.
    pub fn toggle(&self, product_id: &str) -> Arc<Wishlist> {
        let mut guard = self.current.lock().expect("wishlist mutex poisoned");
        let next = Arc::new(guard.toggled(product_id));
        *guard = next.clone();
        next
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
