//! Rupiah amounts
//!
//! Every monetary value in the till is a whole-rupiah integer. Fractional
//! rates (tax, discounts, vouchers) are applied through [`Rupiah::apply_rate`],
//! which floors the product back to whole rupiah at each step.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised by rupiah rate arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// A rate application overflowed or could not be represented as `i64`.
    #[error("rate application overflowed or was not representable")]
    RateOverflow,
}

/// An amount of Indonesian rupiah in whole units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize,
)]
#[serde(transparent)]
pub struct Rupiah(i64);

impl Rupiah {
    /// The zero amount.
    pub const ZERO: Rupiah = Rupiah(0);

    /// Creates an amount from whole rupiah.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Rupiah(amount)
    }

    /// Returns the raw amount in whole rupiah.
    #[must_use]
    pub const fn amount(self) -> i64 {
        self.0
    }

    /// Returns `true` when the amount is exactly zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when the amount is greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` when the amount is below zero.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value of the amount.
    #[must_use]
    pub const fn abs(self) -> Self {
        Rupiah(self.0.abs())
    }

    /// Applies a fractional rate and floors the result to whole rupiah.
    ///
    /// The pricing pipeline truncates at every monetary step, so `101 * 0.10`
    /// yields `10`, never `11`.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyError::RateOverflow`] if the multiplication
    /// overflows the decimal range or the floored result does not fit `i64`.
    pub fn apply_rate(self, rate: Decimal) -> Result<Rupiah, CurrencyError> {
        let Some(amount) = Decimal::from_i64(self.0) else {
            unreachable!("always returns `Some` for every `i64`")
        };

        let applied = rate
            .checked_mul(amount)
            .ok_or(CurrencyError::RateOverflow)?;

        applied
            .floor()
            .to_i64()
            .map(Rupiah)
            .ok_or(CurrencyError::RateOverflow)
    }
}

/// Dotted thousands grouping: `1000` renders as `1.000`, `0` as `0`.
impl fmt::Display for Rupiah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let len = digits.len();
        let mut grouped = String::with_capacity(len + len / 3 + 1);

        if self.0 < 0 {
            grouped.push('-');
        }

        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (len - idx) % 3 == 0 {
                grouped.push('.');
            }

            grouped.push(ch);
        }

        f.write_str(&grouped)
    }
}

impl Add for Rupiah {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Rupiah(self.0 + other.0)
    }
}

impl AddAssign for Rupiah {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Rupiah {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Rupiah(self.0 - other.0)
    }
}

/// Multiplication by a day count or quantity.
impl Mul<i64> for Rupiah {
    type Output = Self;

    fn mul(self, quantity: i64) -> Self {
        Rupiah(self.0 * quantity)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn display_groups_thousands_with_dots() {
        assert_eq!(Rupiah::new(0).to_string(), "0");
        assert_eq!(Rupiah::new(999).to_string(), "999");
        assert_eq!(Rupiah::new(1000).to_string(), "1.000");
        assert_eq!(Rupiah::new(20000).to_string(), "20.000");
        assert_eq!(Rupiah::new(700_000).to_string(), "700.000");
        assert_eq!(Rupiah::new(123_456_789).to_string(), "123.456.789");
    }

    #[test]
    fn display_keeps_sign_outside_the_grouping() {
        assert_eq!(Rupiah::new(-1500).to_string(), "-1.500");
        assert_eq!(Rupiah::new(-42).to_string(), "-42");
    }

    #[test]
    fn apply_rate_floors_toward_zero() -> TestResult {
        let rate: Decimal = "0.10".parse()?;

        assert_eq!(Rupiah::new(101).apply_rate(rate)?, Rupiah::new(10));
        assert_eq!(Rupiah::new(7_000_000).apply_rate(rate)?, Rupiah::new(700_000));

        let voucher: Decimal = "0.05".parse()?;
        assert_eq!(
            Rupiah::new(7_315_000).apply_rate(voucher)?,
            Rupiah::new(365_750)
        );

        Ok(())
    }

    #[test]
    fn apply_rate_with_zero_rate_is_zero() -> TestResult {
        assert_eq!(
            Rupiah::new(5_000_000).apply_rate(Decimal::ZERO)?,
            Rupiah::ZERO
        );

        Ok(())
    }

    #[test]
    fn apply_rate_overflow_returns_error() {
        let result = Rupiah::new(i64::MAX).apply_rate(Decimal::MAX);

        assert_eq!(result, Err(CurrencyError::RateOverflow));
    }

    #[test]
    fn arithmetic_matches_integer_semantics() {
        let a = Rupiah::new(100_000);
        let b = Rupiah::new(40_000);

        assert_eq!(a + b, Rupiah::new(140_000));
        assert_eq!(b - a, Rupiah::new(-60_000));
        assert_eq!(a * 3, Rupiah::new(300_000));
        assert!((b - a).is_negative());
        assert_eq!((b - a).abs(), Rupiah::new(60_000));

        let mut total = Rupiah::ZERO;
        total += a;
        total += b;
        assert_eq!(total.amount(), 140_000);
    }
}
