//! Property tests for the entry factory.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use tesoro_shared::config::SettlementDirection;
use tesoro_shared::types::{Amount, BankAccountId, CardId, CheckId, ContactId, Currency, UserId};

use super::error::LedgerError;
use super::factory::LedgerService;
use super::pos::{PosInput, PosMode};
use super::types::{
    ContactInfo, ContactKind, Direction, LedgerContext, LedgerPolicy, NewEntry, Operation,
    OutflowCategory, ReferenceInfo,
};
use crate::instrument::{CheckInfo, CheckStatus};

fn ctx(book_pos_commission: bool, settlement: SettlementDirection) -> LedgerContext {
    LedgerContext {
        currency: Currency::Egp,
        timezone: chrono_tz::Africa::Cairo,
        policy: LedgerPolicy {
            book_pos_commission,
            settlement_direction: settlement,
        },
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

fn resolve_ok(
    input: &NewEntry,
    ctx: &LedgerContext,
) -> Result<super::types::ResolvedOperation, LedgerError> {
    LedgerService::resolve(
        input,
        ctx,
        today(),
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
                status: CheckStatus::InSafe,
            })
        },
    )
}

/// Strategy for positive two-digit amounts (0.01 ..= 100,000.00).
fn amount_strategy() -> impl Strategy<Value = Amount> + Clone {
    (1i64..10_000_000).prop_map(|n| Amount::from_decimal(Decimal::new(n, 2)).unwrap())
}

/// Strategy covering every caller-facing operation.
fn operation_strategy() -> impl Strategy<Value = Operation> {
    let amt = amount_strategy();
    prop_oneof![
        amt.clone().prop_map(|amount| Operation::CashIn { amount }),
        amt.clone().prop_map(|amount| Operation::CashOut {
            amount,
            category: Some(OutflowCategory::Supplies),
        }),
        amt.clone().prop_map(|amount| Operation::BankIn {
            bank_account_id: BankAccountId::new(),
            amount,
        }),
        amt.clone().prop_map(|amount| Operation::BankOut {
            bank_account_id: BankAccountId::new(),
            amount,
            category: None,
        }),
        (amt.clone(), amt.clone()).prop_map(|(net, commission)| Operation::PosCollection {
            bank_account_id: BankAccountId::new(),
            pos: PosInput {
                mode: PosMode::NetPlusCommission,
                gross: None,
                net: Some(net),
                commission: Some(commission),
            },
        }),
        amt.clone().prop_map(|amount| Operation::CardExpense {
            card_id: CardId::new(),
            amount,
            category: OutflowCategory::Fuel,
        }),
        amt.clone().prop_map(|amount| Operation::CardPayment {
            card_id: CardId::new(),
            amount,
        }),
        amt.prop_map(|amount| Operation::CheckSettlement {
            check_id: CheckId::new(),
            bank_account_id: BankAccountId::new(),
            amount,
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For every created entry, `direction` equals the canonical mapping
    /// for its operation kind - no exceptions, including the commission
    /// sibling.
    #[test]
    fn prop_direction_matches_canonical_mapping(
        operation in operation_strategy(),
        book_commission in any::<bool>(),
        settle_inflow in any::<bool>(),
    ) {
        let settlement = if settle_inflow {
            SettlementDirection::Inflow
        } else {
            SettlementDirection::Outflow
        };
        let ctx = ctx(book_commission, settlement);
        let input = NewEntry::new(UserId::new(), operation);

        let resolved = resolve_ok(&input, &ctx).unwrap();
        prop_assert_eq!(
            resolved.entry.direction,
            resolved.entry.kind.direction(settlement)
        );
        if let Some(commission) = resolved.commission {
            prop_assert_eq!(
                commission.direction,
                commission.kind.direction(settlement)
            );
            prop_assert_eq!(commission.direction, Direction::Outflow);
        }
    }

    /// `gross - commission == net` holds exactly, in both POS modes.
    #[test]
    fn prop_pos_identity_net_mode(
        net in amount_strategy(),
        commission in amount_strategy(),
    ) {
        let pos = PosInput {
            mode: PosMode::NetPlusCommission,
            gross: None,
            net: Some(net),
            commission: Some(commission),
        };
        let b = pos.breakdown().unwrap();
        prop_assert_eq!(b.gross - b.commission, b.net);
        prop_assert!(b.effective_rate > Decimal::ZERO);
        prop_assert!(b.effective_rate < Decimal::ONE);
    }

    /// Same identity when the caller supplies gross.
    #[test]
    fn prop_pos_identity_gross_mode(
        gross in amount_strategy(),
        commission in amount_strategy(),
    ) {
        prop_assume!(commission.into_inner() < gross.into_inner());
        let pos = PosInput {
            mode: PosMode::GrossLessCommission,
            gross: Some(gross),
            net: None,
            commission: Some(commission),
        };
        let b = pos.breakdown().unwrap();
        prop_assert_eq!(b.gross - b.commission, b.net);
    }

    /// Both POS booking conventions produce the same net bank effect.
    #[test]
    fn prop_pos_conventions_agree_on_bank_effect(
        net in amount_strategy(),
        commission in amount_strategy(),
    ) {
        let operation = |mode_net: Amount, mode_comm: Amount| Operation::PosCollection {
            bank_account_id: BankAccountId::new(),
            pos: PosInput {
                mode: PosMode::NetPlusCommission,
                gross: None,
                net: Some(mode_net),
                commission: Some(mode_comm),
            },
        };

        let single = resolve_ok(
            &NewEntry::new(UserId::new(), operation(net, commission)),
            &ctx(false, SettlementDirection::Inflow),
        )
        .unwrap();
        let split = resolve_ok(
            &NewEntry::new(UserId::new(), operation(net, commission)),
            &ctx(true, SettlementDirection::Inflow),
        )
        .unwrap();

        let single_effect = single.entry.amount;
        let split_effect = split.entry.amount - split.commission.unwrap().amount;
        prop_assert_eq!(single_effect, split_effect);
    }

    /// An entry is back-dated exactly when its effective date precedes
    /// today in the organization's time zone.
    #[test]
    fn prop_back_dated_iff_before_today(day_offset in -400i64..400) {
        let effective = today() + chrono::Duration::days(day_offset);
        let mut input = NewEntry::new(
            UserId::new(),
            Operation::CashIn {
                amount: Amount::parse("1.00").unwrap(),
            },
        );
        input.effective_date = Some(effective);

        let resolved = resolve_ok(&input, &ctx(false, SettlementDirection::Inflow)).unwrap();
        prop_assert_eq!(resolved.entry.back_dated, day_offset < 0);
        prop_assert_eq!(resolved.entry.effective_date, effective);
    }
}
