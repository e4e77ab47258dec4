//! Monetary amount type with fixed two-digit precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! `Amount` wraps `rust_decimal::Decimal` and enforces the ledger's
//! contract at construction: strictly positive, exactly 2 fraction digits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while converting caller input into an [`Amount`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// The input could not be parsed as a decimal number.
    #[error("Amount '{0}' is not a valid decimal number")]
    Unparsable(String),

    /// The amount was zero or negative.
    #[error("Amount must be positive, got {0}")]
    NotPositive(Decimal),

    /// The amount carried more than 2 fraction digits.
    ///
    /// Sub-cent input is rejected rather than rounded: silently rounding
    /// would record an amount the caller never entered.
    #[error("Amount {0} has more than 2 fraction digits")]
    TooPrecise(Decimal),
}

/// A strictly positive monetary amount with exactly 2 fraction digits.
///
/// All ledger arithmetic (commission splits, balance folds) operates on
/// the wrapped `Decimal`, so totals never drift the way floats would.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Validates and normalizes a decimal into an `Amount`.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::NotPositive`] for zero/negative values and
    /// [`AmountError::TooPrecise`] for values with sub-cent precision.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }
        let normalized = value.normalize();
        if normalized.scale() > 2 {
            return Err(AmountError::TooPrecise(value));
        }
        let mut rescaled = normalized;
        rescaled.rescale(2);
        Ok(Self(rescaled))
    }

    /// Parses caller-supplied text into an `Amount`.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::Unparsable`] when the text is not a decimal
    /// number, plus the [`Self::from_decimal`] failures.
    pub fn parse(raw: &str) -> Result<Self, AmountError> {
        let value: Decimal = raw
            .trim()
            .parse()
            .map_err(|_| AmountError::Unparsable(raw.to_string()))?;
        Self::from_decimal(value)
    }

    /// Returns the wrapped decimal value (always scale 2, always > 0).
    #[must_use]
    pub const fn into_inner(self) -> Decimal {
        self.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO 4217 currency codes supported by the system.
///
/// The deployment runs in exactly one of these; entries never mix
/// currencies (multi-currency conversion is out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Egyptian Pound
    Egp,
    /// Saudi Riyal
    Sar,
    /// UAE Dirham
    Aed,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Egp => write!(f, "EGP"),
            Self::Sar => write!(f, "SAR"),
            Self::Aed => write!(f, "AED"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "EGP" => Ok(Self::Egp),
            "SAR" => Ok(Self::Sar),
            "AED" => Ok(Self::Aed),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case("100", dec!(100.00))]
    #[case("100.5", dec!(100.50))]
    #[case("1000.00", dec!(1000.00))]
    #[case(" 42.01 ", dec!(42.01))]
    #[case("0.01", dec!(0.01))]
    fn test_parse_valid(#[case] raw: &str, #[case] expected: Decimal) {
        let amount = Amount::parse(raw).unwrap();
        assert_eq!(amount.into_inner(), expected);
        assert_eq!(amount.into_inner().scale(), 2);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("12,50")]
    fn test_parse_unparsable(#[case] raw: &str) {
        assert!(matches!(
            Amount::parse(raw),
            Err(AmountError::Unparsable(_))
        ));
    }

    #[rstest]
    #[case("0")]
    #[case("0.00")]
    #[case("-5")]
    #[case("-0.01")]
    fn test_parse_non_positive(#[case] raw: &str) {
        assert!(matches!(
            Amount::parse(raw),
            Err(AmountError::NotPositive(_))
        ));
    }

    #[test]
    fn test_parse_sub_cent_rejected() {
        assert!(matches!(
            Amount::parse("10.555"),
            Err(AmountError::TooPrecise(_))
        ));
    }

    #[test]
    fn test_trailing_zeros_are_not_extra_precision() {
        // 10.500 normalizes to 10.5, which fits in 2 fraction digits.
        let amount = Amount::parse("10.500").unwrap();
        assert_eq!(amount.into_inner(), dec!(10.50));
    }

    #[test]
    fn test_from_decimal() {
        assert!(Amount::from_decimal(dec!(3.14)).is_ok());
        assert!(Amount::from_decimal(dec!(0)).is_err());
        assert!(Amount::from_decimal(dec!(3.141)).is_err());
    }

    #[test]
    fn test_currency_display_roundtrip() {
        for c in [
            Currency::Usd,
            Currency::Eur,
            Currency::Egp,
            Currency::Sar,
            Currency::Aed,
        ] {
            assert_eq!(Currency::from_str(&c.to_string()).unwrap(), c);
        }
        assert!(Currency::from_str("XXX").is_err());
    }
}
