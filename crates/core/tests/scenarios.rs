//! End-to-end scenarios composing the state machine, the entry factory,
//! and the aggregator the way the repositories do.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal_macros::dec;

use tesoro_core::instrument::{machine, CheckInfo, CheckStatus, InstrumentError, MoveAction, NewCheck};
use tesoro_core::ledger::{
    ContactInfo, ContactKind, Direction, LedgerContext, LedgerError, LedgerPolicy, LedgerService,
    Method, NewEntry, Operation, OperationKind, ReferenceInfo,
};
use tesoro_core::reports::{day_ledger, EntryLine, ReportPeriod};
use tesoro_shared::config::SettlementDirection;
use tesoro_shared::types::{
    Amount, BankAccountId, CardId, CheckId, ContactId, Currency, EntryId, UserId,
};

fn ctx() -> LedgerContext {
    LedgerContext {
        currency: Currency::Egp,
        timezone: chrono_tz::Africa::Cairo,
        policy: LedgerPolicy {
            book_pos_commission: false,
            settlement_direction: SettlementDirection::Inflow,
        },
    }
}

fn resolve(
    input: &NewEntry,
    check_status: CheckStatus,
    today: NaiveDate,
) -> Result<tesoro_core::ledger::ResolvedOperation, LedgerError> {
    LedgerService::resolve(
        input,
        &ctx(),
        today,
        |_: BankAccountId| Ok(ReferenceInfo { is_active: true }),
        |_: CardId| Ok(ReferenceInfo { is_active: true }),
        |_: ContactId| {
            Ok(ContactInfo {
                kind: ContactKind::Customer,
                is_active: true,
            })
        },
        |_: CheckId| {
            Ok(CheckInfo {
                status: check_status,
            })
        },
    )
}

fn received_check() -> NewCheck {
    NewCheck {
        serial_no: "A-001".to_string(),
        bank_name: "X Bank".to_string(),
        amount: Amount::parse("1000.00").unwrap(),
        due_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        contact_id: Some(ContactId::new()),
        notes: None,
        issuer_label: None,
    }
}

#[test]
fn receive_customer_check_enters_safe_with_in_move() {
    let check = received_check();
    assert_eq!(check.serial_no, "A-001");

    let transition = machine::receive(ContactKind::Customer, 1).unwrap();
    assert_eq!(transition.status, CheckStatus::InSafe);
    assert_eq!(transition.action, MoveAction::In);
}

#[test]
fn receive_without_attachment_persists_nothing() {
    // The transition fails before any check row could be written.
    let result = machine::receive(ContactKind::Customer, 0);
    assert!(matches!(result, Err(InstrumentError::AttachmentRequired)));
}

#[test]
fn settle_received_check_then_second_settle_fails() {
    let check_id = CheckId::new();
    let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();

    // First settlement: the transition and the factory both succeed,
    // producing exactly one entry and one payment move.
    let transition = machine::settle(CheckStatus::InSafe).unwrap();
    assert_eq!(transition.status, CheckStatus::Paid);
    assert_eq!(transition.action, MoveAction::Payment);

    let input = NewEntry::new(
        UserId::new(),
        Operation::CheckSettlement {
            check_id,
            bank_account_id: BankAccountId::new(),
            amount: Amount::parse("1000.00").unwrap(),
        },
    );
    let resolved = resolve(&input, CheckStatus::InSafe, today).unwrap();
    assert_eq!(resolved.entry.method, Method::Check);
    assert_eq!(resolved.entry.kind, OperationKind::CheckSettlement);
    assert_eq!(resolved.entry.amount, dec!(1000.00));
    assert_eq!(resolved.entry.check_id, Some(check_id));
    assert!(resolved.commission.is_none(), "exactly one entry");

    // Second settlement: the machine rejects before the factory runs,
    // so zero new entries are created.
    assert!(matches!(
        machine::settle(CheckStatus::Paid),
        Err(InstrumentError::AlreadyPaid)
    ));
}

#[test]
fn pos_collection_net_mode_scenario() {
    use tesoro_core::ledger::{PosInput, PosMode};

    let input = NewEntry::new(
        UserId::new(),
        Operation::PosCollection {
            bank_account_id: BankAccountId::new(),
            pos: PosInput {
                mode: PosMode::NetPlusCommission,
                gross: None,
                net: Some(Amount::parse("970.00").unwrap()),
                commission: Some(Amount::parse("30.00").unwrap()),
            },
        },
    );
    let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
    let resolved = resolve(&input, CheckStatus::InSafe, today).unwrap();

    let pos = resolved.entry.pos.unwrap();
    assert_eq!(pos.gross, dec!(1000.00));
    assert_eq!(pos.effective_rate, dec!(0.03));
}

#[test]
fn settlement_entry_feeds_the_day_ledger() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
    let input = NewEntry::new(
        UserId::new(),
        Operation::CheckSettlement {
            check_id: CheckId::new(),
            bank_account_id: BankAccountId::new(),
            amount: Amount::parse("1000.00").unwrap(),
        },
    );
    let resolved = resolve(&input, CheckStatus::InSafe, today).unwrap();

    let line = EntryLine {
        id: EntryId::new(),
        seq_no: 1,
        method: resolved.entry.method,
        kind: resolved.entry.kind,
        direction: resolved.entry.direction,
        amount: resolved.entry.amount,
        effective_date: resolved.entry.effective_date,
        recorded_at: DateTime::<Utc>::from_timestamp(1_740_000_000, 0).unwrap(),
        bank_account_id: resolved.entry.bank_account_id,
        card_id: None,
        contact_id: None,
        description: None,
    };

    let ledger = day_ledger(
        ReportPeriod {
            from: today,
            to: today,
        },
        vec![line],
    );
    assert_eq!(ledger.rows.len(), 1);
    // Settlements are inflows under the default deployment policy.
    assert_eq!(ledger.rows[0].line.direction, Direction::Inflow);
    assert_eq!(ledger.totals.closing_balance, dec!(1000.00));
}
