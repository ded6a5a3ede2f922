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
//! │  Commission balances are summed across hundreds of sales per            │
//! │  influencer per month. Accumulating binary floats drifts, and the       │
//! │  payout threshold comparison (Kz 49.99 vs Kz 50.00) is exactly where   │
//! │  that drift bites.                                                      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Balances are i64 cents. Rate application happens in i128 with an    │
//! │    explicit half-up rounding step, so repeated additions round-trip.   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use gota_core::money::Money;
//! use gota_core::types::{RateBps, TierMultiplier};
//!
//! let sale = Money::from_cents(10_000); // Kz 100.00
//!
//! // Commission: 5% base rate at a 1.5x Gold multiplier
//! let commission = sale.apply_commission(RateBps::from_bps(500), TierMultiplier::from_hundredths(150));
//! assert_eq!(commission.cents(), 750); // Kz 7.50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{RateBps, TierMultiplier};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for corrections and reversals
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization; `Ord` so cap
///   clamping and threshold checks read as plain comparisons
///
/// ## Where Money Flows
/// ```text
/// Sale.amount_cents ──► cashback (customer) ──► Customer credit
///                  └──► commission (influencer) ──► monthly accrual
///                           │
///                           ▼
///                  pending payout balance ──► payout threshold check
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use gota_core::money::Money;
    ///
    /// let price = Money::from_cents(5_000); // Kz 50.00
    /// assert_eq!(price.cents(), 5_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -Kz 5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents (smallest currency unit).
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

    /// Applies a percentage rate expressed in basis points.
    ///
    /// Used for customer cashback: `amount × rate / 10000`, rounded half-up.
    ///
    /// ## Example
    /// ```rust
    /// use gota_core::money::Money;
    /// use gota_core::types::RateBps;
    ///
    /// let sale = Money::from_cents(2_000);          // Kz 20.00
    /// let cashback = sale.apply_rate(RateBps::from_bps(3_000)); // 30%
    /// assert_eq!(cashback.cents(), 600);            // Kz 6.00
    /// ```
    pub fn apply_rate(&self, rate: RateBps) -> Money {
        // i128 prevents overflow on large amounts
        let cents = (self.0 as i128 * rate.bps() as i128 + 5_000) / 10_000;
        Money::from_cents(cents as i64)
    }

    /// Applies the commission formula: `amount × base_rate × multiplier / 100`.
    ///
    /// The base rate is in basis points (500 = 5%) and the tier multiplier in
    /// hundredths (150 = 1.5x), so the combined divisor is 10000 × 100.
    /// Rounded half-up in i128.
    ///
    /// ## Example
    /// ```rust
    /// use gota_core::money::Money;
    /// use gota_core::types::{RateBps, TierMultiplier};
    ///
    /// // Kz 100.00 sale, 5% base rate, Gold 1.5x multiplier → Kz 7.50
    /// let sale = Money::from_cents(10_000);
    /// let commission = sale.apply_commission(
    ///     RateBps::from_bps(500),
    ///     TierMultiplier::from_hundredths(150),
    /// );
    /// assert_eq!(commission.cents(), 750);
    /// ```
    pub fn apply_commission(&self, base_rate: RateBps, multiplier: TierMultiplier) -> Money {
        let numerator =
            self.0 as i128 * base_rate.bps() as i128 * multiplier.hundredths() as i128;
        let cents = (numerator + 500_000) / 1_000_000;
        Money::from_cents(cents as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and log output. The admin dashboard formats
/// amounts itself to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Kz {}.{:02}", sign, self.major().abs(), self.minor_part())
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

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
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
        let money = Money::from_cents(5_099);
        assert_eq!(money.cents(), 5_099);
        assert_eq!(money.major(), 50);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(50, 99);
        assert_eq!(money.cents(), 5_099);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(5_099)), "Kz 50.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "Kz 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-Kz 5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "Kz 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1_000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1_500);
        assert_eq!((a - b).cents(), 500);

        let mut total = Money::zero();
        total += a;
        total += b;
        assert_eq!(total.cents(), 1_500);
    }

    #[test]
    fn test_apply_rate_basic() {
        // Kz 10.00 at 10% = Kz 1.00
        let amount = Money::from_cents(1_000);
        assert_eq!(amount.apply_rate(RateBps::from_bps(1_000)).cents(), 100);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // Kz 10.00 at 8.25% = Kz 0.825 → Kz 0.83
        let amount = Money::from_cents(1_000);
        assert_eq!(amount.apply_rate(RateBps::from_bps(825)).cents(), 83);
    }

    #[test]
    fn test_apply_commission_reference_case() {
        // The canonical case: Kz 100.00 × 5% × 1.5 = Kz 7.50
        let sale = Money::from_cents(10_000);
        let commission = sale.apply_commission(
            RateBps::from_bps(500),
            TierMultiplier::from_hundredths(150),
        );
        assert_eq!(commission.cents(), 750);
    }

    #[test]
    fn test_apply_commission_unit_multiplier() {
        // 1.0x multiplier degenerates to a plain rate application
        let sale = Money::from_cents(10_000);
        let flat = sale.apply_commission(
            RateBps::from_bps(500),
            TierMultiplier::from_hundredths(100),
        );
        assert_eq!(flat, sale.apply_rate(RateBps::from_bps(500)));
    }

    #[test]
    fn test_apply_commission_rounding() {
        // Kz 0.99 × 5% × 1.2 = 5.94 cents → 6 cents
        let sale = Money::from_cents(99);
        let commission = sale.apply_commission(
            RateBps::from_bps(500),
            TierMultiplier::from_hundredths(120),
        );
        assert_eq!(commission.cents(), 6);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_cents(100);
        assert!(positive.is_positive());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().cents(), 100);
    }

    /// Repeated accumulation must stay exact: 1000 × Kz 0.07 = Kz 70.00,
    /// with no drift from any intermediate representation.
    #[test]
    fn test_accumulation_round_trip() {
        let mut total = Money::zero();
        for _ in 0..1_000 {
            total += Money::from_cents(7);
        }
        assert_eq!(total.cents(), 7_000);
    }
}
