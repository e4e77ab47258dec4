//! Check register domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tesoro_shared::types::{Amount, ContactId};

/// Lifecycle status of a check in the register.
///
/// `InSafe` is the entry state for received instruments and the only
/// state with defined successor transitions; `Endorsed` and `Paid` are
/// terminal, and `Issued` can only move to `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Held in the organization's safe awaiting collection.
    InSafe,
    /// Handed to a supplier in lieu of cash.
    Endorsed,
    /// Written by the organization to a payee.
    Issued,
    /// Settled through a bank account.
    Paid,
}

impl CheckStatus {
    /// Returns true if no transition leaves this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Endorsed | Self::Paid)
    }
}

/// Action recorded on a lifecycle move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    /// Instrument entered the safe.
    In,
    /// Instrument handed out to a supplier.
    Out,
    /// Instrument issued by the organization.
    Issue,
    /// Instrument settled.
    Payment,
}

/// Input for putting a new check on the register.
#[derive(Debug, Clone)]
pub struct NewCheck {
    /// Serial number printed on the instrument (unique in the register).
    pub serial_no: String,
    /// Name of the issuing bank.
    pub bank_name: String,
    /// Face amount.
    pub amount: Amount,
    /// Due date of the instrument.
    pub due_date: NaiveDate,
    /// Counterparty (required for received checks).
    pub contact_id: Option<ContactId>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Label for instruments the organization itself issues.
    pub issuer_label: Option<String>,
}

/// One validated state transition: the status the check moves to and the
/// move action to append to the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The status after the transition.
    pub status: CheckStatus,
    /// The audit action to record.
    pub action: MoveAction,
}

/// Validation view of a check reference, as the entry factory sees it.
#[derive(Debug, Clone, Copy)]
pub struct CheckInfo {
    /// Current lifecycle status.
    pub status: CheckStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!CheckStatus::InSafe.is_terminal());
        assert!(!CheckStatus::Issued.is_terminal());
        assert!(CheckStatus::Endorsed.is_terminal());
        assert!(CheckStatus::Paid.is_terminal());
    }
}
