//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront sells in Algerian dinar only, so a [`Price`] is a bare
//! non-negative decimal amount. Arithmetic stays in [`Decimal`] to keep cart
//! totals exact.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency code printed after every amount.
pub const CURRENCY_CODE: &str = "DZD";

/// A price in dinar.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of dinar.
    #[must_use]
    pub fn from_dinar(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }

    /// Create a price from hundredths of a dinar (`18999` → `189.99`).
    #[must_use]
    pub fn from_centimes(centimes: i64) -> Self {
        Self(Decimal::new(centimes, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Format for display with thousands separators (e.g. `1,300 DZD`,
    /// `189.99 DZD`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{self} {CURRENCY_CODE}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.0.round_dp(2).normalize();
        let text = rounded.abs().to_string();
        let (whole, fraction) = text
            .split_once('.')
            .map_or((text.as_str(), None), |(w, fr)| (w, Some(fr)));

        if rounded.is_sign_negative() && !rounded.is_zero() {
            f.write_str("-")?;
        }

        let digits = whole.len();
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (digits - i) % 3 == 0 {
                f.write_str(",")?;
            }
            write!(f, "{ch}")?;
        }

        if let Some(fraction) = fraction {
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_dinar(1300).to_string(), "1,300");
        assert_eq!(Price::from_dinar(600).to_string(), "600");
        assert_eq!(Price::from_dinar(1_234_567).to_string(), "1,234,567");
    }

    #[test]
    fn test_display_keeps_significant_fraction() {
        assert_eq!(Price::from_centimes(18_999).to_string(), "189.99");
        assert_eq!(Price::from_centimes(8_550).to_string(), "85.5");
        assert_eq!(Price::from_centimes(34_900).to_string(), "349");
        assert_eq!(Price::from_centimes(18_999).display(), "189.99 DZD");
    }

    #[test]
    fn test_arithmetic() {
        let unit = Price::from_centimes(18_999);
        assert_eq!(unit * 2, Price::from_centimes(37_998));
        let total: Price = [Price::from_dinar(100), Price::from_dinar(50)].into_iter().sum();
        assert_eq!(total, Price::from_dinar(150));
    }

    #[test]
    fn test_deserializes_from_number_and_string() {
        let from_number: Price = serde_json::from_str("189.99").unwrap();
        let from_string: Price = serde_json::from_str("\"189.99\"").unwrap();
        assert_eq!(from_number, Price::from_centimes(18_999));
        assert_eq!(from_string, from_number);
    }

    #[test]
    fn test_negative_detection() {
        assert!(Price::from_centimes(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
    }
}
