//! The check lifecycle state machine.
//!
//! Pure transition rules: each function validates its preconditions and
//! returns the [`Transition`] to apply (new status + audit action). The
//! persistence layer applies the status change and appends the move
//! inside one database transaction; for settlement it additionally
//! re-asserts the prior status with a conditional update, so a
//! concurrent settle loses with `AlreadyPaid` instead of double-booking.

use super::error::InstrumentError;
use super::types::{CheckStatus, MoveAction, Transition};
use crate::ledger::ContactKind;

/// A received customer instrument enters the safe.
///
/// # Errors
///
/// `WrongCounterparty` unless the contact is customer-typed;
/// `AttachmentRequired` without at least one attachment (scan of the
/// physical instrument).
pub fn receive(
    contact_kind: ContactKind,
    attachment_count: usize,
) -> Result<Transition, InstrumentError> {
    if contact_kind != ContactKind::Customer {
        return Err(InstrumentError::WrongCounterparty {
            action: MoveAction::In,
            expected: ContactKind::Customer,
        });
    }
    if attachment_count == 0 {
        return Err(InstrumentError::AttachmentRequired);
    }
    Ok(Transition {
        status: CheckStatus::InSafe,
        action: MoveAction::In,
    })
}

/// A held instrument is handed to a supplier in lieu of cash.
///
/// # Errors
///
/// `InvalidTransition` unless the check is in the safe;
/// `WrongCounterparty` unless the target contact is supplier-typed.
pub fn endorse(
    status: CheckStatus,
    target_kind: ContactKind,
) -> Result<Transition, InstrumentError> {
    if status != CheckStatus::InSafe {
        return Err(InstrumentError::InvalidTransition {
            from: status,
            action: MoveAction::Out,
        });
    }
    if target_kind != ContactKind::Supplier {
        return Err(InstrumentError::WrongCounterparty {
            action: MoveAction::Out,
            expected: ContactKind::Supplier,
        });
    }
    Ok(Transition {
        status: CheckStatus::Endorsed,
        action: MoveAction::Out,
    })
}

/// The organization writes its own instrument to a payee.
///
/// No prior check exists; the check is created directly in `Issued`.
///
/// # Errors
///
/// `AttachmentRequired` without at least one attachment.
pub fn issue(attachment_count: usize) -> Result<Transition, InstrumentError> {
    if attachment_count == 0 {
        return Err(InstrumentError::AttachmentRequired);
    }
    Ok(Transition {
        status: CheckStatus::Issued,
        action: MoveAction::Issue,
    })
}

/// A check is settled through a bank account.
///
/// # Errors
///
/// `AlreadyPaid` if the check has been settled before; `InvalidTransition`
/// from `Endorsed` (the instrument left the organization's hands).
pub fn settle(status: CheckStatus) -> Result<Transition, InstrumentError> {
    match status {
        CheckStatus::Paid => Err(InstrumentError::AlreadyPaid),
        CheckStatus::Endorsed => Err(InstrumentError::InvalidTransition {
            from: status,
            action: MoveAction::Payment,
        }),
        CheckStatus::InSafe | CheckStatus::Issued => Ok(Transition {
            status: CheckStatus::Paid,
            action: MoveAction::Payment,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_receive_customer_with_attachment() {
        let t = receive(ContactKind::Customer, 1).unwrap();
        assert_eq!(t.status, CheckStatus::InSafe);
        assert_eq!(t.action, MoveAction::In);
    }

    #[rstest]
    #[case(ContactKind::Supplier)]
    #[case(ContactKind::Other)]
    fn test_receive_rejects_non_customer(#[case] kind: ContactKind) {
        assert!(matches!(
            receive(kind, 1),
            Err(InstrumentError::WrongCounterparty {
                expected: ContactKind::Customer,
                ..
            })
        ));
    }

    #[test]
    fn test_receive_requires_attachment() {
        assert!(matches!(
            receive(ContactKind::Customer, 0),
            Err(InstrumentError::AttachmentRequired)
        ));
    }

    #[test]
    fn test_endorse_from_safe_to_supplier() {
        let t = endorse(CheckStatus::InSafe, ContactKind::Supplier).unwrap();
        assert_eq!(t.status, CheckStatus::Endorsed);
        assert_eq!(t.action, MoveAction::Out);
    }

    #[rstest]
    #[case(CheckStatus::Endorsed)]
    #[case(CheckStatus::Issued)]
    #[case(CheckStatus::Paid)]
    fn test_endorse_requires_in_safe(#[case] status: CheckStatus) {
        assert!(matches!(
            endorse(status, ContactKind::Supplier),
            Err(InstrumentError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_endorse_rejects_non_supplier() {
        assert!(matches!(
            endorse(CheckStatus::InSafe, ContactKind::Customer),
            Err(InstrumentError::WrongCounterparty {
                expected: ContactKind::Supplier,
                ..
            })
        ));
    }

    #[test]
    fn test_issue_requires_attachment() {
        assert!(matches!(issue(0), Err(InstrumentError::AttachmentRequired)));
        let t = issue(2).unwrap();
        assert_eq!(t.status, CheckStatus::Issued);
        assert_eq!(t.action, MoveAction::Issue);
    }

    #[rstest]
    #[case(CheckStatus::InSafe)]
    #[case(CheckStatus::Issued)]
    fn test_settle_from_live_states(#[case] status: CheckStatus) {
        let t = settle(status).unwrap();
        assert_eq!(t.status, CheckStatus::Paid);
        assert_eq!(t.action, MoveAction::Payment);
    }

    #[test]
    fn test_settle_paid_fails_with_already_paid() {
        assert!(matches!(
            settle(CheckStatus::Paid),
            Err(InstrumentError::AlreadyPaid)
        ));
    }

    #[test]
    fn test_settle_endorsed_is_invalid() {
        assert!(matches!(
            settle(CheckStatus::Endorsed),
            Err(InstrumentError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_no_state_is_revisited() {
        // From each reachable status, enumerate every defined transition
        // and confirm none leads back to a previously-left state.
        assert!(endorse(CheckStatus::Endorsed, ContactKind::Supplier).is_err());
        assert!(settle(CheckStatus::Paid).is_err());
        // Paid is absorbing: nothing transitions out of it.
        assert!(endorse(CheckStatus::Paid, ContactKind::Supplier).is_err());
    }
}
