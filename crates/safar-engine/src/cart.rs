//! # Cart Aggregate
//!
//! The shopping cart as an explicit, session-owned aggregate.
//!
//! ## Versioned Snapshots
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Cart Mutation Model                                     │
//! │                                                                         │
//! │  Every mutation returns a NEW snapshot with a bumped version:          │
//! │                                                                         │
//! │    Cart v1 ──add(product)──► Cart v2 ──update_quantity──► Cart v3      │
//! │                                                                         │
//! │  Nothing mutates a cart in place. The CartHandle holds the current     │
//! │  snapshot behind a mutex and swaps whole snapshots atomically, so a    │
//! │  reader always sees a consistent cart and concurrent-access bugs are   │
//! │  structurally impossible.                                              │
//! │                                                                         │
//! │  Lines snapshot the product name and price AT ADD TIME. The retail    │
//! │  checkout re-reads live prices when it begins (LiveAtRender policy);   │
//! │  the snapshot here is what the cart page displays meanwhile.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use safar_core::pricing::{price, PriceBreakdown, PricingInput, RetailLine};
use safar_core::{Money, Product, MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Cart Error
// =============================================================================

/// Cart aggregate rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The cart already holds the maximum number of unique lines.
    #[error("cart cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Requested quantity exceeds available stock.
    #[error("only {available} of {name} in stock, requested {requested}")]
    InsufficientStock {
        name: String,
        available: u32,
        requested: u32,
    },

    /// Requested quantity exceeds the per-line cap.
    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// The product is not listed for sale.
    #[error("{name} is not available for purchase")]
    NotForSale { name: String },

    /// The product is not in the cart.
    #[error("product {product_id} not in cart")]
    NotInCart { product_id: String },
}

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart.
///
/// `unit_price` and `name` are snapshots taken when the line was added;
/// `max_quantity` is the stock cap observed at the same moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub max_quantity: u32,
}

impl CartLine {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity as u64)
    }
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// An immutable cart snapshot.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges
///   quantities)
/// - Every quantity is ≥ 1 (dropping to 0 removes the line)
/// - At most [`MAX_CART_LINES`] lines; each quantity capped by stock and
///   [`MAX_LINE_QUANTITY`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Bumped on every mutation; lets the UI detect stale renders.
    pub version: u64,
    pub lines: Vec<CartLine>,
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// A fresh, empty cart at version 0.
    pub fn new() -> Self {
        Cart {
            version: 0,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn next(&self, lines: Vec<CartLine>) -> Cart {
        Cart {
            version: self.version + 1,
            lines,
            created_at: self.created_at,
        }
    }

    /// Returns a new snapshot with `quantity` of `product` added, merging
    /// into an existing line for the same product.
    pub fn add(&self, product: &Product, quantity: u32) -> Result<Cart, CartError> {
        if !product.is_active {
            return Err(CartError::NotForSale {
                name: product.name.clone(),
            });
        }

        let mut lines = self.lines.clone();
        if let Some(line) = lines.iter_mut().find(|l| l.product_id == product.id) {
            // Saturate rather than wrap; the caps below reject the result
            let requested = line.quantity.saturating_add(quantity);
            check_quantity(product, requested)?;
            line.quantity = requested;
            return Ok(self.next(lines));
        }

        if lines.len() >= MAX_CART_LINES {
            return Err(CartError::TooManyLines {
                max: MAX_CART_LINES,
            });
        }
        check_quantity(product, quantity)?;

        debug!(product_id = %product.id, quantity, "Line added to cart");
        lines.push(CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            max_quantity: product.stock.min(MAX_LINE_QUANTITY),
        });
        Ok(self.next(lines))
    }

    /// Returns a new snapshot with the line's quantity replaced.
    /// Quantity 0 removes the line.
    pub fn update_quantity(&self, product_id: &str, quantity: u32) -> Result<Cart, CartError> {
        if quantity == 0 {
            return self.remove(product_id);
        }

        let mut lines = self.lines.clone();
        let line = lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CartError::NotInCart {
                product_id: product_id.to_string(),
            })?;

        if quantity > line.max_quantity {
            return Err(CartError::QuantityTooLarge {
                requested: quantity,
                max: line.max_quantity,
            });
        }
        line.quantity = quantity;
        Ok(self.next(lines))
    }

    /// Returns a new snapshot without the line.
    pub fn remove(&self, product_id: &str) -> Result<Cart, CartError> {
        let mut lines = self.lines.clone();
        let before = lines.len();
        lines.retain(|l| l.product_id != product_id);
        if lines.len() == before {
            return Err(CartError::NotInCart {
                product_id: product_id.to_string(),
            });
        }
        Ok(self.next(lines))
    }

    /// Returns a new, empty snapshot (checkout commit or explicit clear).
    pub fn cleared(&self) -> Cart {
        Cart {
            version: self.version + 1,
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of unique lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// The money-bearing view the pricing calculator consumes.
    pub fn retail_lines(&self) -> Vec<RetailLine> {
        self.lines
            .iter()
            .map(|l| RetailLine {
                unit_price: l.unit_price,
                quantity: l.quantity,
            })
            .collect()
    }

    /// Full price breakdown for the current snapshot.
    pub fn breakdown(&self) -> PriceBreakdown {
        price(&PricingInput::RetailCart {
            lines: self.retail_lines(),
        })
    }
}

impl Default for Cart {
    fn default() -> Self {
        Cart::new()
    }
}

/// Per-line quantity cap: stock first (named in the error), then the
/// absolute per-line maximum.
fn check_quantity(product: &Product, requested: u32) -> Result<(), CartError> {
    if requested > product.stock {
        return Err(CartError::InsufficientStock {
            name: product.name.clone(),
            available: product.stock,
            requested,
        });
    }
    if requested > MAX_LINE_QUANTITY {
        return Err(CartError::QuantityTooLarge {
            requested,
            max: MAX_LINE_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Cart Handle
// =============================================================================

/// Session-owned handle to the current cart snapshot.
///
/// ## Thread Safety
/// `Mutex<Arc<Cart>>`: mutations build a new snapshot and swap the Arc;
/// readers clone the Arc and work on a consistent snapshot without holding
/// the lock.
#[derive(Debug)]
pub struct CartHandle {
    current: Mutex<Arc<Cart>>,
}

impl CartHandle {
    pub fn new() -> Self {
        CartHandle {
            current: Mutex::new(Arc::new(Cart::new())),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Cart> {
        self.current.lock().expect("cart mutex poisoned").clone()
    }

    /// Applies a snapshot-producing mutation and swaps it in atomically.
    /// On error the handle keeps its previous snapshot.
    pub fn apply<F>(&self, f: F) -> Result<Arc<Cart>, CartError>
    where
        F: FnOnce(&Cart) -> Result<Cart, CartError>,
    {
        let mut guard = self.current.lock().expect("cart mutex poisoned");
        let next = Arc::new(f(&guard)?);
        *guard = next.clone();
        Ok(next)
    }

    /// Swaps in an empty cart.
    pub fn clear(&self) -> Arc<Cart> {
        let mut guard = self.current.lock().expect("cart mutex poisoned");
        let next = Arc::new(guard.cleared());
        *guard = next.clone();
        next
    }
}

impl Default for CartHandle {
    fn default() -> Self {
        CartHandle::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
