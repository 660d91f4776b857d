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
//! │  OUR SOLUTION: Integer minor units (hundredths)                         │
//! │    Storage, arithmetic and SQL sums all run on i64                      │
//! │    Only the JSON boundary speaks decimal major units                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! ```text
//!   JSON in:   10000   "10000"   "10000.50"   10.5
//!                 │        │          │          │
//!                 └────────┴────┬─────┴──────────┘
//!                               ▼
//!                   parse as exact decimal (≤ 2 places)
//!                               ▼
//!              Money(1_000_000)  Money(1_000_050)  Money(1_050)
//!                               ▼
//!   JSON out:  10000             10000.5            10.5
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price: Money = "10000".parse().unwrap();
//! assert_eq!(price.cents(), 1_000_000);
//!
//! let line = price.multiply_quantity(2);
//! assert_eq!(line, Some(Money::from_major(20_000)));
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;

/// Minor units per major unit.
const SCALE: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in hundredths of the currency unit.
///
/// Stored in SQLite as a plain INTEGER column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
#[ts(export)]
pub struct Money(#[ts(type = "number")] i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(15_000).cents(), 1_500_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * SCALE)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Kopi 10000
    /// Quantity: 3
    ///      │
    ///      ▼
    /// multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Cart line price: 30000
    /// ```
    ///
    /// `None` when the product does not fit in an i64 of minor units.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(self, other: Money) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums `amounts`, or `None` on overflow.
    ///
    /// ```rust
    /// use kasir_core::money::Money;
    ///
    /// let lines = [Money::from_major(10), Money::from_major(5)];
    /// assert_eq!(Money::checked_sum(lines), Some(Money::from_major(15)));
    /// assert_eq!(Money::checked_sum([Money::from_cents(i64::MAX), Money::from_cents(1)]), None);
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Parses a decimal string in major units.
    ///
    /// Accepts an optional leading `-`, digits, and at most two significant
    /// fractional digits (trailing zeros beyond that are tolerated).
    pub fn parse_decimal(input: &str) -> Result<Money, ParseMoneyError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };

        if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseMoneyError::InvalidFormat(input.to_string()));
        }

        let mut frac_cents = 0i64;
        if let Some(frac) = frac_part {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseMoneyError::InvalidFormat(input.to_string()));
            }
            let (significant, rest) = frac.split_at(frac.len().min(2));
            if rest.bytes().any(|b| b != b'0') {
                return Err(ParseMoneyError::TooPrecise(input.to_string()));
            }
            for (i, b) in significant.bytes().enumerate() {
                let weight = if i == 0 { 10 } else { 1 };
                frac_cents += i64::from(b - b'0') * weight;
            }
        }

        let major: i64 = int_part.parse().map_err(|_| ParseMoneyError::Overflow)?;
        let cents = major
            .checked_mul(SCALE)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or(ParseMoneyError::Overflow)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Parse Error
// =============================================================================

/// Why a decimal amount could not be turned into [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    #[error("amount is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    InvalidFormat(String),

    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),

    #[error("amount is too large")]
    Overflow,
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse_decimal(s)
    }
}

// =============================================================================
// Serde (decimal major units on the wire)
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % SCALE == 0 {
            serializer.serialize_i64(self.0 / SCALE)
        } else {
            serializer.serialize_f64(self.0 as f64 / SCALE as f64)
        }
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(SCALE)
            .map(Money)
            .ok_or_else(|| E::custom(ParseMoneyError::Overflow))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let v = i64::try_from(v).map_err(|_| E::custom(ParseMoneyError::Overflow))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("amount must be finite"));
        }
        Money::parse_decimal(&v.to_string()).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse_decimal(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// The operators saturate at the i64 bounds. Amounts that are stored or
// returned to a client go through the `checked_*` methods instead.

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / SCALE as u64, abs % SCALE as u64)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Money(cents)
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
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
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("10000"), Ok(Money::from_major(10_000)));
        assert_eq!(Money::parse_decimal(" 10.5 "), Ok(Money::from_cents(1050)));
        assert_eq!(Money::parse_decimal("10.05"), Ok(Money::from_cents(1005)));
        assert_eq!(Money::parse_decimal("0.1"), Ok(Money::from_cents(10)));
        assert_eq!(Money::parse_decimal("-5.50"), Ok(Money::from_cents(-550)));
        assert_eq!(Money::parse_decimal("1000.0"), Ok(Money::from_major(1000)));
        assert_eq!(Money::parse_decimal("7.500"), Ok(Money::from_cents(750)));
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert_eq!(Money::parse_decimal(""), Err(ParseMoneyError::Empty));
        assert!(matches!(
            Money::parse_decimal("abc"),
            Err(ParseMoneyError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse_decimal("1e3"),
            Err(ParseMoneyError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse_decimal("10."),
            Err(ParseMoneyError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse_decimal(".5"),
            Err(ParseMoneyError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse_decimal("NaN"),
            Err(ParseMoneyError::InvalidFormat(_))
        ));
        assert!(matches!(
            Money::parse_decimal("1.234"),
            Err(ParseMoneyError::TooPrecise(_))
        ));
        assert_eq!(
            Money::parse_decimal("99999999999999999999"),
            Err(ParseMoneyError::Overflow)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_major(5).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_major(1000);
        let b = Money::from_major(500);

        assert_eq!(a + b, Money::from_major(1500));
        assert_eq!(a - b, Money::from_major(500));
        assert_eq!(a * 3, Money::from_major(3000));

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total, Money::from_major(2000));
    }

    #[test]
    fn test_overflow_is_caught() {
        let huge = Money::from_cents(5_000_000_000_000_000_000);

        assert_eq!(huge.multiply_quantity(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_sub(Money::from_cents(1)), None);
        assert_eq!(Money::checked_sum([huge, huge]), None);
        assert_eq!(
            Money::from_major(10_000).multiply_quantity(3),
            Some(Money::from_major(30_000))
        );

        // Operators never wrap
        assert_eq!(huge + huge, Money::from_cents(i64::MAX));
        let total: Money = [huge, huge].iter().sum();
        assert_eq!(total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
    }

    #[test]
    fn test_json_wire_format() {
        assert_eq!(serde_json::to_string(&Money::from_major(35_000)).unwrap(), "35000");
        assert_eq!(serde_json::to_string(&Money::from_cents(1099)).unwrap(), "10.99");

        let m: Money = serde_json::from_str("40000").unwrap();
        assert_eq!(m, Money::from_major(40_000));
        let m: Money = serde_json::from_str("\"40000.25\"").unwrap();
        assert_eq!(m, Money::from_cents(4_000_025));
        let m: Money = serde_json::from_str("0.3").unwrap();
        assert_eq!(m, Money::from_cents(30));

        assert!(serde_json::from_str::<Money>("\"lots\"").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }
}
