//! Type-safe price representation in integer cents.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a parseable decimal amount.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// Prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more than two fractional digits.
    #[error("price cannot have sub-cent precision")]
    SubCent,
}

/// A price in integer cents (USD).
///
/// Catalog prices are stored in the smallest currency unit so that rating
/// aggregates and file round-trips never touch floating point.
///
/// ## Examples
///
/// ```
/// use gift_grove_core::Price;
///
/// let price = Price::parse("12.50").unwrap();
/// assert_eq!(price.cents(), 1250);
/// assert_eq!(price.to_string(), "$12.50");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(0);

    /// Create a price from integer cents.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `cents` is negative.
    pub const fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        Ok(Self(cents))
    }

    /// Create a price from a decimal dollar amount.
    ///
    /// # Errors
    ///
    /// Returns an error for negative amounts or sub-cent precision.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() {
            return Err(PriceError::Negative);
        }

        let cents = amount * Decimal::ONE_HUNDRED;
        if cents.fract() != Decimal::ZERO {
            return Err(PriceError::SubCent);
        }

        cents
            .to_i64()
            .map(Self)
            .ok_or_else(|| PriceError::Invalid(amount.to_string()))
    }

    /// Parse a price from a decimal string such as `"12.50"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid non-negative amount
    /// with at most two fractional digits.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount: Decimal = s
            .trim()
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::from_decimal(amount)
    }

    /// The price in integer cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The price as a decimal dollar amount.
    #[must_use]
    pub fn as_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dollars_and_cents() {
        assert_eq!(Price::parse("12.50").unwrap().cents(), 1250);
        assert_eq!(Price::parse("0.99").unwrap().cents(), 99);
        assert_eq!(Price::parse("19").unwrap().cents(), 1900);
        assert_eq!(Price::parse(" 5.00 ").unwrap().cents(), 500);
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(Price::parse("-1.00"), Err(PriceError::Negative));
        assert_eq!(Price::from_cents(-5), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_rejects_sub_cent() {
        assert_eq!(Price::parse("1.005"), Err(PriceError::SubCent));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Price::parse("twelve"),
            Err(PriceError::Invalid(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(1250).unwrap().to_string(), "$12.50");
        assert_eq!(Price::from_cents(5).unwrap().to_string(), "$0.05");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_serde_is_plain_cents() {
        let price = Price::from_cents(1250).unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "1250");

        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }

    #[test]
    fn test_as_decimal() {
        let price = Price::from_cents(1250).unwrap();
        assert_eq!(price.as_decimal().to_string(), "12.50");
    }
}
