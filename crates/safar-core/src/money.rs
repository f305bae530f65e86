//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Whole Rupees as u64                                      │
//! │    Every price, rate, tax and total in the storefront is a whole       │
//! │    rupee amount. There are no fractional paise anywhere in the         │
//! │    system, so the minor unit is simply not modeled.                    │
//! │                                                                         │
//! │  Derived amounts (tax, fees) round half-up to the nearest whole        │
//! │  rupee at the moment they are computed, so nothing downstream          │
//! │  carries more precision than the UI displays.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use safar_core::money::Money;
//! use safar_core::types::TaxRate;
//!
//! let rate = Money::from_rupees(1000);       // ₹1000 per night
//! let subtotal = rate.multiply_quantity(3);  // 3 nights = ₹3000
//!
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(1200)); // 12%
//! assert_eq!(tax.rupees(), 360);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units (rupees).
///
/// ## Design Decisions
/// - **u64 (unsigned)**: Negative amounts are unrepresentable. The engine
///   never owes money; discounts use [`Money::saturating_sub`] which floors
///   at zero instead.
/// - **Single field tuple struct**: Zero-cost abstraction over u64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(u64);

impl Money {
    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: u64) -> Self {
        Money(rupees)
    }

    /// Returns the value in whole rupees.
    #[inline]
    pub const fn rupees(&self) -> u64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts, flooring at zero.
    ///
    /// Used for discount application: a discount larger than the amount
    /// yields a free item, never a negative total.
    #[inline]
    pub const fn saturating_sub(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }

    /// Calculates tax on this amount, rounding half-up to the whole rupee.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`
    /// The +5000 provides round-half-up (5000/10000 = 0.5).
    /// u128 intermediate prevents overflow on large amounts.
    ///
    /// ## Example
    /// ```rust
    /// use safar_core::money::Money;
    /// use safar_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_rupees(550);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(500)); // 5%
    /// // 550 × 5% = 27.5 → rounds up to 28
    /// assert_eq!(tax.rupees(), 28);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax = (self.0 as u128 * rate.bps() as u128 + 5000) / 10000;
        Money::from_rupees(tax as u64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use safar_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(200);
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.rupees(), 400);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Arguments
    /// * `discount_bps` - Discount in basis points (1000 = 10%)
    ///
    /// The discount amount itself rounds half-up, then is subtracted with
    /// a floor at zero.
    pub fn apply_percentage_discount(&self, discount_bps: u32) -> Money {
        let discount = (self.0 as u128 * discount_bps as u128 + 5000) / 10000;
        self.saturating_sub(Money::from_rupees(discount as u64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging. Use frontend formatting for actual UI display
/// to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Multiplication by quantity (for line totals).
impl Mul<u64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
