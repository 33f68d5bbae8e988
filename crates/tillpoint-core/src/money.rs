//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A till ledger that drifts by fractions of a cent will never           │
//! │  reconcile against the cash counted in the drawer.                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    R85.00 is 8500 cents. Every sum, refund and breakdown is exact.     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Split-payment submissions historically tolerated a 0.01-currency-unit
//! mismatch between the legs and the cart total. That comparison survives
//! here as [`Money::within_split_tolerance`] (≤ 1 cent), so edge cases that
//! used to be accepted still are.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Largest leg-sum/total mismatch a split payment may carry, in cents.
///
/// Equals 0.01 currency units: the comparison tolerance of the original
/// floating-point checkout, preserved so previously accepted submissions
/// stay accepted.
pub const SPLIT_TOLERANCE_CENTS: i64 = 1;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: refunds and drawer variances can be negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// let price = Money::from_cents(8500); // R85.00
    /// assert_eq!(price.cents(), 8500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
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

    /// Multiplies a unit price by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(8500);
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 17_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Checks whether `other` matches this value within the split-payment
    /// tolerance ([`SPLIT_TOLERANCE_CENTS`]).
    ///
    /// ## Example
    /// ```rust
    /// use tillpoint_core::money::Money;
    ///
    /// let total = Money::from_cents(30_000);
    /// assert!(total.within_split_tolerance(Money::from_cents(30_001)));
    /// assert!(!total.within_split_tolerance(Money::from_cents(29_950)));
    /// ```
    #[inline]
    pub const fn within_split_tolerance(&self, other: Money) -> bool {
        (self.0 - other.0).abs() <= SPLIT_TOLERANCE_CENTS
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable format for logs and debugging; the frontend owns
/// localized display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Summing an iterator of Money values (line totals, split legs).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
