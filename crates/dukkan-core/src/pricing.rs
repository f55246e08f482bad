//! # Pricing Calculator
//!
//! Pure derivation of sale totals from the cart and the invoice discount
//! inputs. Evaluated on demand; nothing is cached, every call recomputes
//! from the current cart state.
//!
//! ## Derivation
//! ```text
//! subtotal = Σ line.total                    (net of per-line discounts)
//! discount = flat + subtotal × rate          (stack additively; the
//!                                             percentage applies to the
//!                                             PRE-discount subtotal)
//! taxable  = subtotal − discount             (NOT floored at zero)
//! tax      = taxable × 15%
//! total    = taxable + tax
//! ```
//!
//! A discount exceeding the subtotal yields a negative taxable base and
//! negative tax. That is defined behavior, not an error; the caller sees a
//! negative grand total and can decide what to do with it.

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::money::{Money, Rate, VAT_RATE};
use crate::types::PaymentStatus;

// =============================================================================
// Totals
// =============================================================================

/// The derived amounts for one sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Effective invoice discount (flat + percentage portion).
    pub discount: Money,
    /// subtotal − discount; may be negative.
    pub taxable: Money,
    /// 15% of the taxable base; negative when the base is.
    pub tax: Money,
    /// taxable + tax.
    pub total: Money,
}

/// Computes the totals for a cart using its own discount fields.
pub fn totals(cart: &Cart) -> Totals {
    let subtotal = cart.items().iter().map(|i| i.line_total()).sum();
    totals_of(subtotal, cart.discount_amount(), cart.discount_rate())
}

/// Computes totals from raw inputs.
///
/// Split out from [`totals`] so the derivation is testable without
/// building carts.
pub fn totals_of(subtotal: Money, flat_discount: Money, rate: Rate) -> Totals {
    let discount = flat_discount + subtotal.portion(rate);
    let taxable = subtotal - discount;
    let tax = taxable.portion(VAT_RATE);

    Totals {
        subtotal,
        discount,
        taxable,
        tax,
        total: taxable + tax,
    }
}

// =============================================================================
// Payment derivation
// =============================================================================

/// Classifies a payment against the grand total.
///
/// `paid ≥ total` is paid in full, including the degenerate case of a
/// zero or negative total with nothing tendered.
pub fn payment_status(paid: Money, total: Money) -> PaymentStatus {
    if paid >= total {
        PaymentStatus::Paid
    } else if paid.is_positive() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    }
}

/// Change due to the customer, floored at zero.
pub fn change_due(paid: Money, total: Money) -> Money {
    (paid - total).max(Money::zero())
}

// =============================================================================
// Unit Tests
// =============================================================================
