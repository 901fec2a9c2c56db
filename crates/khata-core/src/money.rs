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
//! │  A creditor balance built from many += and -= drifts, so matching a    │
//! │  purchase by amount needs an epsilon and "exactly zero" never happens. │
//! │                                                                         │
//! │  OUR SOLUTION: Integer paisa                                            │
//! │    500.00 is stored as 50000; equality is exact, zero is zero          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::money::Money;
//!
//! let price = Money::from_cents(50000); // Rs 500.00
//! let parsed = Money::parse("amount", "500").unwrap();
//! assert_eq!(price, parsed);
//!
//! let total = price + Money::from_cents(2550); // Rs 525.50
//! assert_eq!(total.to_string(), "Rs 525.50");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paisa).
///
/// ## Design Decisions
/// - **i64 (signed)**: creditor balances can be driven below zero by edits
/// - **Single field tuple struct**: serializes as a plain JSON integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Rs 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Parses an amount typed by the operator.
    ///
    /// ## Rules
    /// - Surrounding whitespace is ignored
    /// - Optional leading `+` or `-`
    /// - Digits with at most two decimal places: `500`, `500.5`, `500.50`
    /// - Anything else (empty, `abc`, `NaN`, `inf`, `1e3`, `1.234`) is rejected
    ///
    /// Sign checks are left to the caller so the error can name the rule
    /// that failed ("must be positive" vs "invalid format").
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// assert_eq!(Money::parse("amount", " 12.5 ").unwrap().cents(), 1250);
    /// assert!(Money::parse("amount", "NaN").is_err());
    /// assert!(Money::parse("amount", "").is_err());
    /// ```
    pub fn parse(field: &str, input: &str) -> Result<Money, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::required(field));
        }

        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        let (negative, unsigned) = match trimmed.as_bytes()[0] {
            b'-' => (true, &trimmed[1..]),
            b'+' => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("must be a number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("must be a number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most two decimal places"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("number is too large"))?
        };
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("must be a number"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("must be a number"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("number is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
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

    /// Purchase matching equality: amounts closer than one paisa are the
    /// same amount. With integer paisa that is plain equality.
    #[inline]
    pub const fn approx_eq(&self, other: Money) -> bool {
        (self.0 - other.0).abs() < 1
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation for logs and CLI output.
///
/// ## Note
/// The CLI uses `ConfigState::format_currency` for the configured symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}Rs {}.{:02}", sign, self.major().abs(), self.cents_part())
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
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "Rs 10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "Rs 5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-Rs 5.50");
        assert_eq!(format!("{}", Money::zero()), "Rs 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);
    }

    #[test]
    fn test_sum() {
        let amounts = [Money::from_major(100), Money::from_major(250)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total, Money::from_major(350));
    }

    #[test]
    fn test_parse_accepts_plain_amounts() {
        assert_eq!(Money::parse("amount", "500").unwrap(), Money::from_major(500));
        assert_eq!(Money::parse("amount", "500.5").unwrap().cents(), 50050);
        assert_eq!(Money::parse("amount", "500.05").unwrap().cents(), 50005);
        assert_eq!(Money::parse("amount", ".75").unwrap().cents(), 75);
        assert_eq!(Money::parse("amount", "7.").unwrap().cents(), 700);
        assert_eq!(Money::parse("amount", "-20").unwrap().cents(), -2000);
        assert_eq!(Money::parse("amount", "+20").unwrap().cents(), 2000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            Money::parse("amount", "   "),
            Err(ValidationError::required("amount"))
        );
        for input in ["abc", "NaN", "inf", "-inf", "1e3", "1.234", "1,000", ".", "-", "1.2.3"] {
            assert!(
                matches!(
                    Money::parse("amount", input),
                    Err(ValidationError::InvalidFormat { .. })
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(Money::parse("amount", "99999999999999999999").is_err());
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(100).is_positive());
        assert!(!Money::from_cents(-100).is_positive());
    }

    #[test]
    fn test_approx_eq_is_exact_in_minor_units() {
        assert!(Money::from_cents(50000).approx_eq(Money::from_cents(50000)));
        assert!(!Money::from_cents(50000).approx_eq(Money::from_cents(50001)));
    }
}
