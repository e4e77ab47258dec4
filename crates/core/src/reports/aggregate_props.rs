//! Property tests for the aggregator folds.

use chrono::{DateTime, NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use tesoro_shared::types::{BankAccountId, EntryId};

use super::aggregate::{
    bank_account_balance, bank_account_balance_from, cash_balance, day_ledger,
};
use super::types::{BalanceCheckpoint, EntryLine, ReportPeriod};
use crate::ledger::{Direction, Method, OperationKind};

fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_740_000_000, 0).unwrap()
}

/// Raw ingredients for one generated line.
#[derive(Debug, Clone)]
struct LineSeed {
    inflow: bool,
    cents: i64,
    day: u32,
    secs_offset: i64,
}

fn seed_strategy() -> impl Strategy<Value = LineSeed> {
    (any::<bool>(), 1i64..10_000_000, 1u32..=28, 0i64..500).prop_map(
        |(inflow, cents, day, secs_offset)| LineSeed {
            inflow,
            cents,
            day,
            secs_offset,
        },
    )
}

fn build_lines(seeds: &[LineSeed], method: Method) -> Vec<EntryLine> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let direction = if seed.inflow {
                Direction::Inflow
            } else {
                Direction::Outflow
            };
            EntryLine {
                id: EntryId::new(),
                seq_no: i64::try_from(i).unwrap() + 1,
                method,
                kind: match direction {
                    Direction::Inflow => OperationKind::CashIn,
                    Direction::Outflow => OperationKind::CashOut,
                },
                direction,
                amount: Decimal::new(seed.cents, 2),
                effective_date: NaiveDate::from_ymd_opt(2025, 3, seed.day).unwrap(),
                recorded_at: base_time() + chrono::Duration::seconds(seed.secs_offset),
                bank_account_id: None,
                card_id: None,
                contact_id: None,
                description: None,
            }
        })
        .collect()
}

fn full_period() -> ReportPeriod {
    ReportPeriod {
        from: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        to: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The last row's running balance always equals the window's net
    /// total.
    #[test]
    fn prop_closing_balance_equals_net(seeds in prop::collection::vec(seed_strategy(), 1..40)) {
        let lines = build_lines(&seeds, Method::Cash);
        let ledger = day_ledger(full_period(), lines);

        let last = ledger.rows.last().unwrap();
        prop_assert_eq!(last.running_balance, ledger.totals.net);
        prop_assert_eq!(ledger.totals.closing_balance, ledger.totals.net);
        prop_assert_eq!(
            ledger.totals.net,
            ledger.totals.inflow - ledger.totals.outflow
        );
    }

    /// Each row's running balance is the previous row's plus its own
    /// signed amount - the prefix-sum structure the display depends on.
    #[test]
    fn prop_running_balance_is_prefix_sum(seeds in prop::collection::vec(seed_strategy(), 1..40)) {
        let lines = build_lines(&seeds, Method::Cash);
        let ledger = day_ledger(full_period(), lines);

        let mut previous = Decimal::ZERO;
        for row in &ledger.rows {
            prop_assert_eq!(row.running_balance, previous + row.line.signed_amount());
            previous = row.running_balance;
        }
    }

    /// The report order is (effective date, recorded at, seq no),
    /// regardless of input order.
    #[test]
    fn prop_rows_are_ordered(seeds in prop::collection::vec(seed_strategy(), 1..40)) {
        let lines = build_lines(&seeds, Method::Cash);
        let ledger = day_ledger(full_period(), lines);

        for pair in ledger.rows.windows(2) {
            let a = &pair[0].line;
            let b = &pair[1].line;
            prop_assert!(
                (a.effective_date, a.recorded_at, a.seq_no)
                    <= (b.effective_date, b.recorded_at, b.seq_no)
            );
        }
    }

    /// Input permutation does not change the built report.
    #[test]
    fn prop_order_insensitive_to_input(seeds in prop::collection::vec(seed_strategy(), 2..30)) {
        let lines = build_lines(&seeds, Method::Cash);
        let mut reversed = lines.clone();
        reversed.reverse();

        let a = day_ledger(full_period(), lines);
        let b = day_ledger(full_period(), reversed);

        let seq_a: Vec<i64> = a.rows.iter().map(|r| r.line.seq_no).collect();
        let seq_b: Vec<i64> = b.rows.iter().map(|r| r.line.seq_no).collect();
        prop_assert_eq!(seq_a, seq_b);
        prop_assert_eq!(a.totals, b.totals);
    }

    /// Recomputing a balance from the same entry set yields the same
    /// result, and it equals the plain signed sum.
    #[test]
    fn prop_balance_determinism(seeds in prop::collection::vec(seed_strategy(), 0..40)) {
        let lines = build_lines(&seeds, Method::Cash);
        let first = cash_balance(&lines);
        let second = cash_balance(&lines);
        prop_assert_eq!(first, second);

        let expected: Decimal = lines.iter().map(EntryLine::signed_amount).sum();
        prop_assert_eq!(first, expected);
    }

    /// Folding forward from any checkpoint split agrees with the full
    /// fold.
    #[test]
    fn prop_checkpoint_split_agrees(
        seeds in prop::collection::vec(seed_strategy(), 1..40),
        split in 0usize..40,
    ) {
        let account = BankAccountId::new();
        let mut lines = build_lines(&seeds, Method::Bank);
        for line in &mut lines {
            line.bank_account_id = Some(account);
        }
        let split = split.min(lines.len());

        let full = bank_account_balance(Decimal::ZERO, account, &lines);
        let checkpoint = BalanceCheckpoint {
            as_of: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            balance: bank_account_balance(Decimal::ZERO, account, &lines[..split]),
        };
        let resumed = bank_account_balance_from(&checkpoint, account, &lines[split..]);
        prop_assert_eq!(resumed, full);
    }
}
