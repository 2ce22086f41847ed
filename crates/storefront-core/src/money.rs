//! # Money Module
//!
//! Provides the `Money` and `DiscountRate` types for handling monetary values.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The catalog sends prices as JSON floats:                               │
//! │    109.95 × 3 = 329.84999999999997  ❌ (binary f64)                     │
//! │                                                                         │
//! │  Rounding that to 2 places can land on the wrong cent at .xx5           │
//! │  boundaries, and the discount is computed from the UNROUNDED subtotal.  │
//! │                                                                         │
//! │  OUR SOLUTION: Decimal Money                                            │
//! │    Prices are converted ONCE at the catalog boundary, then every sum    │
//! │    and product is exact:  109.95 × 3 = 329.85                           │
//! │    Rounding happens only where the pricing engine asks for it.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::{DiscountRate, Money};
//!
//! let price = Money::from_minor(10995); // 109.95
//! let line = price.multiply_quantity(3);
//! assert_eq!(line, Money::from_minor(32985));
//!
//! let discount = line.apply_rate(DiscountRate::from_percent(10));
//! assert_eq!(discount.round2(), Money::from_minor(3299)); // 32.985 → 32.99
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the store's single currency.
///
/// ## Design Decisions
/// - **Decimal inside**: sums and products are exact, no binary float drift
/// - **No currency field**: the store is single-currency; the currency code
///   travels next to the totals, not inside every amount
/// - **JSON number on the wire**: the frontend consumes plain numbers
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price ──┬──► ResolvedLineItem.unit_price ──► line_total        │
/// │                  │                                                      │
/// │                  └──► Product grid, price filters, catalog stats        │
/// │                                                                         │
/// │  Σ line_total ──► subtotal ──► discount ──► total                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an exact decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Creates a whole amount (e.g., `from_major(200)` = 200.00).
    #[inline]
    pub fn from_major(units: i64) -> Self {
        Money(Decimal::from(units))
    }

    /// Creates an amount from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_minor(1099);
    /// assert_eq!(price.to_string(), "10.99");
    /// ```
    #[inline]
    pub fn from_minor(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Converts a catalog float into decimal money.
    ///
    /// Uses the shortest decimal that round-trips to the same float, so
    /// `109.95_f64` becomes exactly `109.95`. Returns `None` for NaN/infinity.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        // f64's Display is the shortest round-trip representation
        Decimal::from_str(&value.to_string()).ok().map(Money)
    }

    /// Returns the exact decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Lossy conversion for JSON output and averages.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to 2 decimal places, half away from zero.
    ///
    /// ## Rounding Explained
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  HALF AWAY FROM ZERO                                                │
    /// │                                                                     │
    /// │    0.125 → 0.13     0.135 → 0.14     -0.125 → -0.13                 │
    /// │                                                                     │
    /// │  Amounts in this domain are non-negative, so this coincides with    │
    /// │  "round half up" everywhere that matters.                           │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    pub fn round2(&self) -> Self {
        Money(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::from_minor(897));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Returns `self × rate`, unrounded.
    pub fn apply_rate(&self, rate: DiscountRate) -> Money {
        Money(self.0 * rate.fraction())
    }

    /// Divides by a count, unrounded. Zero count yields zero.
    pub fn average_over(&self, count: usize) -> Money {
        if count == 0 {
            return Money::zero();
        }
        Money(self.0 / Decimal::from(count))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with exactly two decimals.
///
/// ## Note
/// This is for logs. The frontend formats currency for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.round2().0;
        rounded.rescale(2);
        write!(f, "{}", rounded)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
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

/// Multiplication by quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Serialized as a JSON number (`109.95`), the shape the frontend expects.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Money::from_f64(value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid money amount: {}", value)))
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// A discount rate as a decimal fraction (0.10 = 10%).
///
/// Negative or >1 rates are representable; the pricing engine does not
/// guard them. Configuration loading rejects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DiscountRate(Decimal);

impl DiscountRate {
    /// Creates a rate from a fraction (`0.10` = 10%).
    #[inline]
    pub const fn from_fraction(fraction: Decimal) -> Self {
        DiscountRate(fraction)
    }

    /// Creates a rate from whole percent (`10` = 10%).
    pub fn from_percent(pct: u32) -> Self {
        DiscountRate(Decimal::new(i64::from(pct), 2))
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(Decimal::ZERO)
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub const fn fraction(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    pub fn percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// Whether the rate lies in `0..=1`.
    pub fn is_within_unit_range(&self) -> bool {
        self.0 >= Decimal::ZERO && self.0 <= Decimal::ONE
    }
}

impl FromStr for DiscountRate {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(DiscountRate)
    }
}

impl fmt::Display for DiscountRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage().normalize())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
