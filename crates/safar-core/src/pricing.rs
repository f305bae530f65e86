//! # Pricing Calculator
//!
//! Turns a priced line-item set, a nightly rate × stay, or a per-person
//! rate × head-count into `{subtotal, shipping_fee, tax, total}`.
//!
//! ## Calculation Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pricing Modes                                      │
//! │                                                                         │
//! │  RetailCart                                                             │
//! │    subtotal = Σ (unit_price × quantity)                                 │
//! │    shipping = 0 if subtotal > 500 else 50                               │
//! │    tax      = round(subtotal × 5%)                                      │
//! │    total    = subtotal + shipping + tax                                 │
//! │                                                                         │
//! │  PropertyStay                                                           │
//! │    nights   = check_out − check_in (days)                               │
//! │    nights ≤ 0 → zeroed breakdown (validator blocks submission)          │
//! │    subtotal = rate_per_night × nights                                   │
//! │    tax      = round(subtotal × 12%);  total = subtotal + tax            │
//! │                                                                         │
//! │  ExperienceVisit                                                        │
//! │    subtotal = rate_per_person × billable_total(guests)                  │
//! │    tax      = round(subtotal × 12%);  total = subtotal + tax            │
//! │    infants are excluded and always free                                 │
//! │                                                                         │
//! │  Contract: pure total function. No I/O, no errors, same inputs always  │
//! │  yield the same breakdown. Invalid inputs price to zero; rejection is  │
//! │  the booking validator's job (two-gate design).                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::guests::GuestComposition;
use crate::money::Money;
use crate::types::TaxRate;
use crate::{FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD, LODGING_TAX_RATE, RETAIL_TAX_RATE};

// =============================================================================
// Inputs
// =============================================================================

/// A priced retail line, as the calculator sees it.
///
/// The session cart owns richer lines (names, stock caps); pricing only
/// needs the money-bearing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RetailLine {
    pub unit_price: Money,
    pub quantity: u32,
}

impl RetailLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity as u64)
    }
}

/// The three pricing modes, selected by order kind.
///
/// A tagged union matched exhaustively — there is no structural sniffing of
/// which fields happen to be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingInput {
    RetailCart {
        lines: Vec<RetailLine>,
    },
    PropertyStay {
        rate_per_night: Money,
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    ExperienceVisit {
        rate_per_person: Money,
        guests: GuestComposition,
    },
}

// =============================================================================
// Breakdown
// =============================================================================

/// The derived money amounts for an order or booking.
///
/// Tax and fee lines are always derived here, never user-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub subtotal: Money,
    /// Zero for bookings; bookings have no shipping concept.
    pub shipping_fee: Money,
    pub tax: Money,
    pub total: Money,
}

impl PriceBreakdown {
    /// The all-zero breakdown, used for invalid inputs (e.g. nights ≤ 0).
    pub const fn zeroed() -> Self {
        PriceBreakdown {
            subtotal: Money::zero(),
            shipping_fee: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Number of nights between check-in and check-out.
///
/// Negative or zero means the date pair is invalid; the validator rejects
/// it before any pricing is trusted.
#[inline]
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

/// Computes the price breakdown for any order kind.
///
/// Pure and total: performs no I/O and never fails. Same inputs always
/// yield the same triple.
pub fn price(input: &PricingInput) -> PriceBreakdown {
    match input {
        PricingInput::RetailCart { lines } => {
            let subtotal: Money = lines.iter().map(RetailLine::line_total).sum();
            let shipping_fee = if subtotal > FREE_SHIPPING_THRESHOLD {
                Money::zero()
            } else {
                FLAT_SHIPPING_FEE
            };
            let tax = subtotal.calculate_tax(TaxRate::from_bps(RETAIL_TAX_RATE));
            PriceBreakdown {
                subtotal,
                shipping_fee,
                tax,
                total: subtotal + shipping_fee + tax,
            }
        }

        PricingInput::PropertyStay {
            rate_per_night,
            check_in,
            check_out,
        } => {
            let nights = nights_between(*check_in, *check_out);
            if nights <= 0 {
                return PriceBreakdown::zeroed();
            }
            let subtotal = rate_per_night.multiply_quantity(nights as u64);
            booking_breakdown(subtotal)
        }

        PricingInput::ExperienceVisit {
            rate_per_person,
            guests,
        } => {
            let subtotal = rate_per_person.multiply_quantity(guests.billable_total() as u64);
            booking_breakdown(subtotal)
        }
    }
}

/// Bookings share the 12% rate and have no shipping line.
fn booking_breakdown(subtotal: Money) -> PriceBreakdown {
    let tax = subtotal.calculate_tax(TaxRate::from_bps(LODGING_TAX_RATE));
    PriceBreakdown {
        subtotal,
        shipping_fee: Money::zero(),
        tax,
        total: subtotal + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn line(price: u64, qty: u32) -> RetailLine {
        RetailLine {
            unit_price: Money::from_rupees(price),
            quantity: qty,
        }
    }

    #[test]
    fn test_retail_cart_over_threshold_ships_free() {
        // cart [{200 × 2}, {150 × 1}] ⇒ subtotal 550, shipping 0,
        // tax round(550 × 5%) = 28, total 578
        let input = PricingInput::RetailCart {
            lines: vec![line(200, 2), line(150, 1)],
        };
        let b = price(&input);
        assert_eq!(b.subtotal.rupees(), 550);
        assert_eq!(b.shipping_fee.rupees(), 0);
        assert_eq!(b.tax.rupees(), 28);
        assert_eq!(b.total.rupees(), 578);
    }

    #[test]
    fn test_retail_shipping_threshold_is_strict() {
        // Exactly 500 is NOT free shipping; only strictly greater is
        let at_threshold = price(&PricingInput::RetailCart {
            lines: vec![line(500, 1)],
        });
        assert_eq!(at_threshold.shipping_fee.rupees(), 50);

        let above = price(&PricingInput::RetailCart {
            lines: vec![line(501, 1)],
        });
        assert_eq!(above.shipping_fee.rupees(), 0);
    }

    #[test]
    fn test_retail_small_cart_pays_flat_fee() {
        let b = price(&PricingInput::RetailCart {
            lines: vec![line(100, 1)],
        });
        assert_eq!(b.subtotal.rupees(), 100);
        assert_eq!(b.shipping_fee.rupees(), 50);
        assert_eq!(b.tax.rupees(), 5);
        assert_eq!(b.total.rupees(), 155);
    }

    #[test]
    fn test_empty_cart_still_prices() {
        // Empty cart prices to subtotal 0 + flat fee + 0 tax; the checkout
        // gate refuses to start on an empty cart, not the calculator
        let b = price(&PricingInput::RetailCart { lines: vec![] });
        assert_eq!(b.subtotal, Money::zero());
        assert_eq!(b.shipping_fee.rupees(), 50);
    }

    #[test]
    fn test_property_stay_three_nights() {
        // rate 1000/night, Day1 → Day4 ⇒ nights 3, subtotal 3000,
        // tax 360, total 3360
        let input = PricingInput::PropertyStay {
            rate_per_night: Money::from_rupees(1000),
            check_in: date(2025, 6, 1),
            check_out: date(2025, 6, 4),
        };
        let b = price(&input);
        assert_eq!(b.subtotal.rupees(), 3000);
        assert_eq!(b.shipping_fee, Money::zero());
        assert_eq!(b.tax.rupees(), 360);
        assert_eq!(b.total.rupees(), 3360);
    }

    #[test]
    fn test_property_stay_invalid_dates_price_to_zero() {
        for (check_in, check_out) in [
            (date(2025, 6, 4), date(2025, 6, 4)), // zero nights
            (date(2025, 6, 4), date(2025, 6, 1)), // negative nights
        ] {
            let b = price(&PricingInput::PropertyStay {
                rate_per_night: Money::from_rupees(1000),
                check_in,
                check_out,
            });
            assert_eq!(b, PriceBreakdown::zeroed());
        }
    }

    #[test]
    fn test_experience_infants_are_free() {
        // guests {adults: 2, infants: 3}, rate 1000 ⇒ subtotal 2000,
        // tax 240, total 2240
        let input = PricingInput::ExperienceVisit {
            rate_per_person: Money::from_rupees(1000),
            guests: GuestComposition {
                adults: 2,
                women: 0,
                children: 0,
                infants: 3,
            },
        };
        let b = price(&input);
        assert_eq!(b.subtotal.rupees(), 2000);
        assert_eq!(b.tax.rupees(), 240);
        assert_eq!(b.total.rupees(), 2240);
    }

    #[test]
    fn test_calculator_is_idempotent() {
        let input = PricingInput::RetailCart {
            lines: vec![line(299, 3), line(120, 2)],
        };
        assert_eq!(price(&input), price(&input));
    }

    #[test]
    fn test_nights_between() {
        assert_eq!(nights_between(date(2025, 6, 1), date(2025, 6, 4)), 3);
        assert_eq!(nights_between(date(2025, 6, 4), date(2025, 6, 4)), 0);
        assert_eq!(nights_between(date(2025, 6, 4), date(2025, 6, 1)), -3);
    }
}
