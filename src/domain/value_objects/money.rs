//! # Money Value Object
//!
//! Decimal monetary amount with checked arithmetic and explicit rounding.
//!
//! Intermediate pricing math keeps full `Decimal` precision; rounding to two
//! decimal places happens only at the point of external emission via
//! [`Money::round2`], so accumulation never compounds rounding error.
//!
//! # Examples
//!
//! ```
//! use order_dispatch::domain::value_objects::money::Money;
//!
//! let subtotal = Money::from_major(500);
//! let discount = subtotal.percentage_of(10).unwrap();
//! assert_eq!(discount, Money::from_major(50));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A monetary amount backed by `rust_decimal::Decimal`.
///
/// Negative values are representable on purpose: aggressive coupon stacking
/// can drive an order total below zero and the pricing engine must surface
/// that rather than clamp it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a money value from a raw decimal.
    #[must_use]
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Creates a money value from whole currency units.
    #[must_use]
    pub fn from_major(units: i64) -> Self {
        Self(Decimal::new(units, 0))
    }

    /// Creates a money value from minor units (e.g. cents / paise).
    #[must_use]
    pub fn from_minor(units: i64) -> Self {
        Self(Decimal::new(units, 2))
    }

    /// Returns the underlying decimal.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is exactly zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly negative.
    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn safe_add(self, rhs: Self) -> DomainResult<Self> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(DomainError::Arithmetic("addition overflow"))
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn safe_sub(self, rhs: Self) -> DomainResult<Self> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(DomainError::Arithmetic("subtraction overflow"))
    }

    /// Checked multiplication by a scalar factor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn safe_mul(self, factor: Decimal) -> DomainResult<Self> {
        self.0
            .checked_mul(factor)
            .map(Self)
            .ok_or(DomainError::Arithmetic("multiplication overflow"))
    }

    /// Computes `percent`% of this amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Arithmetic` on overflow.
    pub fn percentage_of(self, percent: impl Into<Decimal>) -> DomainResult<Self> {
        let pct: Decimal = percent.into();
        let scaled = self
            .0
            .checked_mul(pct)
            .ok_or(DomainError::Arithmetic("percentage overflow"))?;
        scaled
            .checked_div(Decimal::ONE_HUNDRED)
            .map(Self)
            .ok_or(DomainError::Arithmetic("percentage division"))
    }

    /// Returns the larger of this amount and zero.
    #[must_use]
    pub fn clamp_floor_zero(self) -> Self {
        if self.is_negative() { Self::ZERO } else { self }
    }

    /// Returns the maximum of two amounts.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 { self } else { other }
    }

    /// Returns the minimum of two amounts.
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 { self } else { other }
    }

    /// Rounds to two decimal places, midpoint away from zero, the convention
    /// customer-facing totals use.
    #[must_use]
    pub fn round2(self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Compares two amounts.
    #[must_use]
    pub fn cmp_value(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod construction {
        use super::*;

        #[test]
        fn from_major_and_minor_agree() {
            assert_eq!(Money::from_major(5), Money::from_minor(500));
        }

        #[test]
        fn zero_constant() {
            assert!(Money::ZERO.is_zero());
            assert!(!Money::ZERO.is_negative());
            assert!(!Money::ZERO.is_positive());
        }
    }

    mod arithmetic {
        use super::*;

        #[test]
        fn safe_add_works() {
            let sum = Money::from_major(100).safe_add(Money::from_major(50)).unwrap();
            assert_eq!(sum, Money::from_major(150));
        }

        #[test]
        fn safe_sub_can_go_negative() {
            let diff = Money::from_major(10).safe_sub(Money::from_major(60)).unwrap();
            assert!(diff.is_negative());
            assert_eq!(diff, Money::from_major(-50));
        }

        #[test]
        fn percentage_of_works() {
            let pct = Money::from_major(500).percentage_of(10).unwrap();
            assert_eq!(pct, Money::from_major(50));
        }

        #[test]
        fn percentage_keeps_precision() {
            // 5% of 460 = 23, exactly.
            let pct = Money::from_major(460).percentage_of(5).unwrap();
            assert_eq!(pct, Money::from_major(23));
        }

        #[test]
        fn clamp_floor_zero() {
            assert_eq!(Money::from_major(-5).clamp_floor_zero(), Money::ZERO);
            assert_eq!(Money::from_major(5).clamp_floor_zero(), Money::from_major(5));
        }

        #[test]
        fn max_min() {
            let a = Money::from_major(3);
            let b = Money::from_major(7);
            assert_eq!(a.max(b), b);
            assert_eq!(a.min(b), a);
        }
    }

    mod rounding {
        use super::*;

        #[test]
        fn round2_midpoint_away_from_zero() {
            let value = Money::new(Decimal::new(12345, 3)); // 12.345
            assert_eq!(value.round2(), Money::new(Decimal::new(1235, 2))); // 12.35
        }

        #[test]
        fn round2_leaves_two_dp_untouched() {
            let value = Money::from_minor(1234);
            assert_eq!(value.round2(), value);
        }

        #[test]
        fn display_shows_two_decimals() {
            assert_eq!(Money::from_major(7).to_string(), "7.00");
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn serde_roundtrip() {
            let value = Money::from_minor(499);
            let json = serde_json::to_string(&value).unwrap();
            let back: Money = serde_json::from_str(&json).unwrap();
            assert_eq!(back, value);
        }
    }
}
