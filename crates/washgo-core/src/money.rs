//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing option prices as floats:                                       │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Catalog prices, overrides and surcharges are exact in cents.         │
//! │    Sums of options are exact. The only rounding step is VAT.            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use washgo_core::money::Money;
//!
//! let price = Money::from_cents(1099); // 10.99 €
//! let doubled = price * 2u32;          // 21.98 €
//! let total = price + Money::from_cents(500);
//! assert_eq!(total.cents(), 1599);
//! assert_eq!(doubled.cents(), 2198);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::types::VatRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: raw override inputs may arrive negative; the sanitizer
///   clamps them, so the type itself must be able to hold them
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as cents**: the front-end converts for display
///
/// ## Where Money Flows
/// ```text
/// ServiceOption.unit_price ──┬──► resolved unit price × quantity ──► price
///                            │
/// OptionOverride.unit_price ─┘
///
/// price + Engagement.additional_charge ──► subtotal ──► VAT ──► total TTC
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use washgo_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from euros and cents.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50 €.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts a raw major-unit amount (as typed in a form) into cents.
    ///
    /// This is the only float entry point and it lives at the input boundary.
    /// Returns `None` for NaN and infinities. Rounds half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use washgo_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(12.5), Some(Money::from_cents(1250)));
    /// assert_eq!(Money::from_major(f64::NAN), None);
    /// ```
    pub fn from_major(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Some(Money((value * 100.0).round() as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the euro portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
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

    /// Clamps negative amounts to zero.
    ///
    /// ## Example
    /// ```rust
    /// use washgo_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(-300).non_negative(), Money::zero());
    /// assert_eq!(Money::from_cents(300).non_negative().cents(), 300);
    /// ```
    #[inline]
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Calculates VAT on this amount, rounded to the cent.
    ///
    /// ## Rounding
    /// Half away from zero, matching how the invoices have always been
    /// printed: 0.825 € becomes 0.83 €.
    ///
    /// ## Implementation
    /// Integer math in basis points: `(amount × bps ± 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use washgo_core::money::Money;
    /// use washgo_core::types::VatRate;
    ///
    /// let subtotal = Money::from_cents(4000); // 40.00 €
    /// let vat = subtotal.calculate_vat(VatRate::from_bps(2000)); // 20 %
    /// assert_eq!(vat.cents(), 800);
    /// ```
    pub fn calculate_vat(&self, rate: VatRate) -> Money {
        // i128 keeps large subtotals from overflowing
        let product = self.0 as i128 * rate.bps() as i128;
        let rounded = if product >= 0 {
            (product + 5000) / 10000
        } else {
            (product - 5000) / 10000
        };
        let cents = i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX });
        Money::from_cents(cents)
    }

    /// Multiplies money by a whole quantity, saturating at the bounds of i64.
    ///
    /// ## Example
    /// ```rust
    /// use washgo_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 3000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Multiplies by a possibly fractional quantity. The result is not
    /// rounded: 10.00 € × 1.5 is exactly 15.00 €, 0.99 € × 1.5 is 148.5 cents.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use washgo_core::money::{ExactMoney, Money};
    ///
    /// let line = Money::from_cents(99).times(Decimal::new(15, 1));
    /// assert_eq!(line.cents(), Decimal::new(1485, 1));
    /// assert_eq!(line.round(), Money::from_cents(149));
    /// ```
    pub fn times(&self, quantity: Decimal) -> ExactMoney {
        ExactMoney(Decimal::from(self.0).saturating_mul(quantity))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount the way it is printed on documents.
///
/// ## Note
/// This is for logs and plain-text exports. The front-end handles localized
/// formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02} €", sign, self.euros().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a quantity.
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

// =============================================================================
// Exact Money
// =============================================================================

/// An amount in cents that may carry fractions of a cent.
///
/// Line totals with fractional quantities land here and are summed without
/// rounding. [`ExactMoney::round`] and [`ExactMoney::calculate_vat`] are the
/// only ways back to [`Money`]; the totals engine calls them once, where VAT
/// is applied.
///
/// Arithmetic saturates at the bounds of [`Decimal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExactMoney(#[ts(type = "string")] Decimal);

impl ExactMoney {
    pub const fn zero() -> Self {
        ExactMoney(Decimal::ZERO)
    }

    pub fn from_cents(cents: i64) -> Self {
        ExactMoney(Decimal::from(cents))
    }

    /// The exact value in cents.
    pub fn cents(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Rounds to the cent, half away from zero.
    pub fn round(&self) -> Money {
        let rounded = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });
        Money::from_cents(cents)
    }

    /// VAT on the exact amount, rounded to the cent half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use washgo_core::money::Money;
    /// use washgo_core::types::VatRate;
    ///
    /// // 1.5 × 26.67 € = 40.005 €, VAT at 20 % is 8.001 €
    /// let subtotal = Money::from_cents(2667).times(Decimal::new(15, 1));
    /// assert_eq!(subtotal.round().cents(), 4001);
    /// assert_eq!(subtotal.calculate_vat(VatRate::from_bps(2000)).cents(), 800);
    /// ```
    pub fn calculate_vat(&self, rate: VatRate) -> Money {
        let vat = self.0.saturating_mul(Decimal::from(rate.bps())) / Decimal::from(10_000);
        ExactMoney(vat).round()
    }
}

impl From<Money> for ExactMoney {
    fn from(money: Money) -> Self {
        ExactMoney::from_cents(money.cents())
    }
}

impl fmt::Display for ExactMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.round().fmt(f)
    }
}

impl Add for ExactMoney {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        ExactMoney(self.0.saturating_add(other.0))
    }
}

impl AddAssign for ExactMoney {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for ExactMoney {
    fn sum<I: Iterator<Item = ExactMoney>>(iter: I) -> Self {
        iter.fold(ExactMoney::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
