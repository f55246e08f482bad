//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and the
//! `Rate` type for percentages expressed in basis points.
//!
//! ## Why Integer Money?
//! ```text
//! In floating point:   0.1 + 0.2 = 0.30000000000000004
//! In integer cents:    10 + 20   = 30
//! ```
//! Every monetary value in the system is an `i64` count of the smallest
//! currency unit. The database, calculations and APIs all use minor units;
//! only display code converts to major units.
//!
//! ## Usage
//! ```rust
//! use dukkan_core::money::{Money, Rate, VAT_RATE};
//!
//! let price = Money::from_cents(20000); // 200.00
//! let vat = price.portion(VAT_RATE);    // 15% = 30.00
//! assert_eq!(vat.cents(), 3000);
//!
//! let discount = price.portion(Rate::from_bps(1000)); // 10% = 20.00
//! assert_eq!(discount.cents(), 2000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Flat 15% VAT applied to every sale. Not configurable.
pub const VAT_RATE: Rate = Rate::from_bps(1500);

// =============================================================================
// Rate
// =============================================================================

/// A percentage expressed in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 1500 bps = 15%.
/// Used for the VAT rate and for invoice-level percentage discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rate(u32);

impl Rate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Rate(bps)
    }

    /// Creates a rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Rate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Money
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values are legal (refunds, credit balances
///   and over-discounted taxable bases all go below zero)
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns the larger of two values.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// Computes a rate-sized portion of this amount, rounded half away
    /// from zero.
    ///
    /// Used for both the VAT amount and percentage discounts. Integer math
    /// only: `amount × bps / 10000`, with a ±5000 bias so that halves round
    /// away from zero on both sides of the axis (a negative taxable base
    /// must yield the mirror image of the positive one).
    ///
    /// ## Example
    /// ```rust
    /// use dukkan_core::money::{Money, Rate};
    ///
    /// let base = Money::from_cents(18000); // 180.00
    /// let vat = base.portion(Rate::from_bps(1500));
    /// assert_eq!(vat.cents(), 2700); // 27.00
    /// assert_eq!((-base).portion(Rate::from_bps(1500)).cents(), -2700);
    /// ```
    pub fn portion(&self, rate: Rate) -> Money {
        // i128 to prevent overflow on large amounts
        let prod = self.0 as i128 * rate.bps() as i128;
        let rounded = if prod >= 0 {
            (prod + 5000) / 10000
        } else {
            (prod - 5000) / 10000
        };
        Money(rounded as i64)
    }

    /// Multiplies the amount by a quantity.
    #[inline]
    pub const fn times(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly display: `207.00 SAR`, `-5.50 SAR`.
///
/// Frontend formatting (Arabic numerals, ر.س) is out of scope here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02} SAR", sign, self.major().abs(), self.minor_part())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99 SAR");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00 SAR");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50 SAR");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00 SAR");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_vat_portion() {
        // 180.00 at 15% = 27.00
        let base = Money::from_cents(18000);
        assert_eq!(base.portion(VAT_RATE).cents(), 2700);
    }

    #[test]
    fn test_portion_rounding() {
        // 10.01 at 15% = 1.5015 → 1.50; 10.03 at 15% = 1.5045 → 1.50
        assert_eq!(Money::from_cents(1001).portion(VAT_RATE).cents(), 150);
        assert_eq!(Money::from_cents(1003).portion(VAT_RATE).cents(), 150);
        // 10.10 at 15% = 1.515 → rounds half away from zero → 1.52
        assert_eq!(Money::from_cents(1010).portion(VAT_RATE).cents(), 152);
    }

    #[test]
    fn test_portion_negative_mirrors_positive() {
        let base = Money::from_cents(1010);
        assert_eq!(base.portion(VAT_RATE).cents(), 152);
        assert_eq!((-base).portion(VAT_RATE).cents(), -152);

        // Exact multiples stay exact on both sides
        assert_eq!(Money::from_cents(-18000).portion(VAT_RATE).cents(), -2700);
    }

    #[test]
    fn test_percentage_rate() {
        let rate = Rate::from_percentage(10.0);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);

        let discount = Money::from_cents(20000).portion(rate);
        assert_eq!(discount.cents(), 2000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_times() {
        let unit_price = Money::from_cents(299);
        assert_eq!(unit_price.times(3).cents(), 897);
    }
}
