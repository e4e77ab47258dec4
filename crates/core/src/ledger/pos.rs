//! POS collection math.
//!
//! A POS request supplies either (net, commission) or (gross, commission);
//! the missing figure is derived so that `gross = net + commission` always
//! holds exactly. The effective rate keeps the full precision of the
//! division; rounding is a display concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tesoro_shared::types::Amount;

use super::error::LedgerError;

/// Which pair of figures the caller supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosMode {
    /// Caller supplies net + commission; gross is derived.
    NetPlusCommission,
    /// Caller supplies gross + commission; net is derived.
    GrossLessCommission,
}

/// Raw POS input as the request layer hands it over.
///
/// The fields stay optional on purpose: whether the mode-required field
/// is present is a business precondition (`MissingPosField`), not a
/// transport parsing concern.
#[derive(Debug, Clone)]
pub struct PosInput {
    /// Mode selector.
    pub mode: PosMode,
    /// Gross figure (required in gross mode).
    pub gross: Option<Amount>,
    /// Net figure (required in net mode).
    pub net: Option<Amount>,
    /// Commission retained by the provider (always required).
    pub commission: Option<Amount>,
}

impl PosInput {
    /// Derives the full breakdown for this input.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MissingPosField`] when the mode-required
    /// field or the commission is absent, and
    /// [`LedgerError::ValidationFailed`] when the commission is not
    /// smaller than the gross figure.
    pub fn breakdown(&self) -> Result<PosBreakdown, LedgerError> {
        let commission = self
            .commission
            .ok_or(LedgerError::MissingPosField("commission"))?
            .into_inner();

        let (gross, net) = match self.mode {
            PosMode::NetPlusCommission => {
                let net = self
                    .net
                    .ok_or(LedgerError::MissingPosField("net"))?
                    .into_inner();
                (net + commission, net)
            }
            PosMode::GrossLessCommission => {
                let gross = self
                    .gross
                    .ok_or(LedgerError::MissingPosField("gross"))?
                    .into_inner();
                if commission >= gross {
                    return Err(LedgerError::ValidationFailed(format!(
                        "POS commission {commission} must be smaller than gross {gross}"
                    )));
                }
                (gross, gross - commission)
            }
        };

        Ok(PosBreakdown {
            gross,
            commission,
            net,
            effective_rate: commission / gross,
        })
    }
}

/// Fully derived POS figures stored on the collection entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosBreakdown {
    /// Amount the customer paid at the terminal.
    pub gross: Decimal,
    /// Commission retained by the provider.
    pub commission: Decimal,
    /// Amount that reaches the bank account (`gross - commission`).
    pub net: Decimal,
    /// `commission / gross`, full precision.
    pub effective_rate: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(s: &str) -> Option<Amount> {
        Some(Amount::parse(s).unwrap())
    }

    #[test]
    fn test_net_mode_derives_gross() {
        let input = PosInput {
            mode: PosMode::NetPlusCommission,
            gross: None,
            net: amount("970.00"),
            commission: amount("30.00"),
        };
        let b = input.breakdown().unwrap();
        assert_eq!(b.gross, dec!(1000.00));
        assert_eq!(b.net, dec!(970.00));
        assert_eq!(b.commission, dec!(30.00));
        assert_eq!(b.effective_rate, dec!(0.03));
    }

    #[test]
    fn test_gross_mode_derives_net() {
        let input = PosInput {
            mode: PosMode::GrossLessCommission,
            gross: amount("1000.00"),
            net: None,
            commission: amount("25.50"),
        };
        let b = input.breakdown().unwrap();
        assert_eq!(b.net, dec!(974.50));
        assert_eq!(b.gross - b.commission, b.net);
    }

    #[test]
    fn test_missing_mode_field() {
        let input = PosInput {
            mode: PosMode::NetPlusCommission,
            gross: amount("1000.00"), // wrong field for the mode
            net: None,
            commission: amount("30.00"),
        };
        assert!(matches!(
            input.breakdown(),
            Err(LedgerError::MissingPosField("net"))
        ));
    }

    #[test]
    fn test_missing_commission() {
        let input = PosInput {
            mode: PosMode::GrossLessCommission,
            gross: amount("1000.00"),
            net: None,
            commission: None,
        };
        assert!(matches!(
            input.breakdown(),
            Err(LedgerError::MissingPosField("commission"))
        ));
    }

    #[test]
    fn test_commission_swallowing_gross_rejected() {
        let input = PosInput {
            mode: PosMode::GrossLessCommission,
            gross: amount("30.00"),
            net: None,
            commission: amount("30.00"),
        };
        assert!(matches!(
            input.breakdown(),
            Err(LedgerError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_effective_rate_keeps_precision() {
        let input = PosInput {
            mode: PosMode::GrossLessCommission,
            gross: amount("300.00"),
            net: None,
            commission: amount("10.00"),
        };
        let b = input.breakdown().unwrap();
        // 10 / 300 does not terminate; the stored rate keeps Decimal's
        // full division precision instead of a display rounding.
        assert!(b.effective_rate > dec!(0.0333));
        assert!(b.effective_rate < dec!(0.0334));
    }
}
