//! Balance folds and report construction.
//!
//! Balances are never stored: every read recomputes the fold over the
//! committed entries, so the figure cannot drift out of sync with the
//! log. The report order (effective date, recorded at, seq no) is
//! load-bearing: the running-balance column is a prefix sum over exactly
//! this order.

use std::collections::HashMap;

use rust_decimal::Decimal;

use tesoro_shared::types::{BankAccountId, EntryId};

use super::types::{
    BalanceCheckpoint, CheckLine, DayLedger, DayLedgerRow, EntryLine, HeldInstruments,
    LedgerReport, LedgerRow, NameIndex, ReportPeriod, ReportTotals,
};
use crate::instrument::CheckStatus;
use crate::ledger::{ContactKind, Direction, Method};

/// Folds signed amounts onto an opening balance.
fn fold_signed<'a>(opening: Decimal, lines: impl Iterator<Item = &'a EntryLine>) -> Decimal {
    lines.fold(opening, |acc, line| acc + line.signed_amount())
}

/// Point-in-time balance of one bank account.
///
/// `initial_balance + Σ inflow − Σ outflow` over the account's
/// method-bank entries. POS and settlement entries reference an account
/// but move through their own methods and are not part of this fold.
#[must_use]
pub fn bank_account_balance(
    initial_balance: Decimal,
    account_id: BankAccountId,
    lines: &[EntryLine],
) -> Decimal {
    fold_signed(
        initial_balance,
        lines
            .iter()
            .filter(|l| l.method == Method::Bank && l.bank_account_id == Some(account_id)),
    )
}

/// Bank account balance folded forward from a checkpoint.
///
/// `lines_after` must contain only entries with an effective date after
/// `checkpoint.as_of`; the result equals the full fold by construction.
#[must_use]
pub fn bank_account_balance_from(
    checkpoint: &BalanceCheckpoint,
    account_id: BankAccountId,
    lines_after: &[EntryLine],
) -> Decimal {
    bank_account_balance(checkpoint.balance, account_id, lines_after)
}

/// The organization-wide cash balance: the fold over all method-cash
/// entries, with no account scoping.
#[must_use]
pub fn cash_balance(lines: &[EntryLine]) -> Decimal {
    fold_signed(
        Decimal::ZERO,
        lines.iter().filter(|l| l.method == Method::Cash),
    )
}

/// Cash balance folded forward from a checkpoint.
#[must_use]
pub fn cash_balance_from(checkpoint: &BalanceCheckpoint, lines_after: &[EntryLine]) -> Decimal {
    fold_signed(
        checkpoint.balance,
        lines_after.iter().filter(|l| l.method == Method::Cash),
    )
}

/// The "checks awaiting collection" figure: count and sum of customer
/// checks sitting in the safe.
#[must_use]
pub fn held_instruments(checks: &[CheckLine]) -> HeldInstruments {
    let mut count = 0u64;
    let mut total = Decimal::ZERO;
    for check in checks {
        if check.status == CheckStatus::InSafe && check.contact_kind == Some(ContactKind::Customer)
        {
            count += 1;
            total += check.amount;
        }
    }
    HeldInstruments { count, total }
}

/// Sorts lines into the report order: effective date ascending, then
/// recorded-at ascending, then sequence number.
pub fn sort_for_report(lines: &mut [EntryLine]) {
    lines.sort_by(|a, b| {
        (a.effective_date, a.recorded_at, a.seq_no)
            .cmp(&(b.effective_date, b.recorded_at, b.seq_no))
    });
}

fn totals_over(lines: &[EntryLine]) -> ReportTotals {
    let mut inflow = Decimal::ZERO;
    let mut outflow = Decimal::ZERO;
    for line in lines {
        match line.direction {
            Direction::Inflow => inflow += line.amount,
            Direction::Outflow => outflow += line.amount,
        }
    }
    let net = inflow - outflow;
    ReportTotals {
        inflow,
        outflow,
        net,
        closing_balance: net,
    }
}

/// Builds the day ledger for a window.
///
/// Rows are ordered by (effective date, recorded at, seq no); the
/// running balance starts at zero for the window, not at the account's
/// all-time balance.
#[must_use]
pub fn day_ledger(period: ReportPeriod, mut lines: Vec<EntryLine>) -> DayLedger {
    lines.retain(|l| period.contains(l.effective_date));
    sort_for_report(&mut lines);

    let totals = totals_over(&lines);
    let mut running = Decimal::ZERO;
    let rows = lines
        .into_iter()
        .map(|line| {
            running += line.signed_amount();
            DayLedgerRow {
                running_balance: running,
                line,
            }
        })
        .collect();

    DayLedger {
        period,
        rows,
        totals,
    }
}

/// Builds the full ledger report: day-ledger ordering and prefix sum,
/// plus tag grouping and resolved reference names per row.
#[must_use]
pub fn ledger_report(
    period: ReportPeriod,
    mut lines: Vec<EntryLine>,
    tags_by_entry: &HashMap<EntryId, Vec<String>>,
    names: &NameIndex,
) -> LedgerReport {
    lines.retain(|l| period.contains(l.effective_date));
    sort_for_report(&mut lines);

    let totals = totals_over(&lines);
    let mut running = Decimal::ZERO;
    let rows = lines
        .into_iter()
        .map(|line| {
            running += line.signed_amount();
            LedgerRow {
                running_balance: running,
                tags: tags_by_entry.get(&line.id).cloned().unwrap_or_default(),
                bank_account: line
                    .bank_account_id
                    .and_then(|id| names.bank_accounts.get(&id).cloned()),
                card: line.card_id.and_then(|id| names.cards.get(&id).cloned()),
                contact: line
                    .contact_id
                    .and_then(|id| names.contacts.get(&id).cloned()),
                line,
            }
        })
        .collect();

    LedgerReport {
        period,
        rows,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::OperationKind;
    use chrono::{DateTime, NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_740_000_000 + secs, 0).unwrap()
    }

    fn line(
        seq_no: i64,
        method: Method,
        direction: Direction,
        amount: Decimal,
        day: u32,
        secs: i64,
    ) -> EntryLine {
        EntryLine {
            id: EntryId::new(),
            seq_no,
            method,
            kind: match direction {
                Direction::Inflow => OperationKind::CashIn,
                Direction::Outflow => OperationKind::CashOut,
            },
            direction,
            amount,
            effective_date: date(day),
            recorded_at: at(secs),
            bank_account_id: None,
            card_id: None,
            contact_id: None,
            description: None,
        }
    }

    fn bank_line(
        seq_no: i64,
        direction: Direction,
        amount: Decimal,
        account: BankAccountId,
    ) -> EntryLine {
        let mut l = line(seq_no, Method::Bank, direction, amount, 5, seq_no);
        l.bank_account_id = Some(account);
        l
    }

    #[test]
    fn test_bank_balance_folds_only_this_account() {
        let a = BankAccountId::new();
        let b = BankAccountId::new();
        let lines = vec![
            bank_line(1, Direction::Inflow, dec!(500.00), a),
            bank_line(2, Direction::Outflow, dec!(120.00), a),
            bank_line(3, Direction::Inflow, dec!(999.00), b),
        ];
        assert_eq!(bank_account_balance(dec!(100.00), a, &lines), dec!(480.00));
    }

    #[test]
    fn test_bank_balance_ignores_other_methods() {
        let a = BankAccountId::new();
        let mut pos = line(4, Method::Pos, Direction::Inflow, dec!(970.00), 5, 4);
        pos.bank_account_id = Some(a);
        let lines = vec![bank_line(1, Direction::Inflow, dec!(500.00), a), pos];
        // Only the method-bank entry counts.
        assert_eq!(bank_account_balance(dec!(0), a, &lines), dec!(500.00));
    }

    #[test]
    fn test_balance_recomputation_is_deterministic() {
        let a = BankAccountId::new();
        let lines = vec![
            bank_line(1, Direction::Inflow, dec!(10.00), a),
            bank_line(2, Direction::Outflow, dec!(3.50), a),
        ];
        let first = bank_account_balance(dec!(0), a, &lines);
        let second = bank_account_balance(dec!(0), a, &lines);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cash_balance_is_organization_wide() {
        let lines = vec![
            line(1, Method::Cash, Direction::Inflow, dec!(200.00), 3, 1),
            line(2, Method::Cash, Direction::Outflow, dec!(50.00), 4, 2),
            line(3, Method::Bank, Direction::Inflow, dec!(999.00), 4, 3),
        ];
        assert_eq!(cash_balance(&lines), dec!(150.00));
    }

    #[test]
    fn test_checkpoint_fold_agrees_with_full_fold() {
        let a = BankAccountId::new();
        let before = vec![
            bank_line(1, Direction::Inflow, dec!(500.00), a),
            bank_line(2, Direction::Outflow, dec!(100.00), a),
        ];
        let after = vec![bank_line(3, Direction::Inflow, dec!(50.00), a)];

        let full: Vec<EntryLine> = before.iter().chain(after.iter()).cloned().collect();
        let full_balance = bank_account_balance(dec!(0), a, &full);

        let checkpoint = BalanceCheckpoint {
            as_of: date(5),
            balance: bank_account_balance(dec!(0), a, &before),
        };
        assert_eq!(
            bank_account_balance_from(&checkpoint, a, &after),
            full_balance
        );
    }

    #[test]
    fn test_held_instruments() {
        let checks = vec![
            CheckLine {
                status: CheckStatus::InSafe,
                amount: dec!(1000.00),
                contact_kind: Some(ContactKind::Customer),
            },
            CheckLine {
                status: CheckStatus::InSafe,
                amount: dec!(500.00),
                contact_kind: Some(ContactKind::Customer),
            },
            CheckLine {
                status: CheckStatus::Paid,
                amount: dec!(700.00),
                contact_kind: Some(ContactKind::Customer),
            },
            CheckLine {
                status: CheckStatus::InSafe,
                amount: dec!(300.00),
                contact_kind: Some(ContactKind::Supplier),
            },
        ];
        let held = held_instruments(&checks);
        assert_eq!(held.count, 2);
        assert_eq!(held.total, dec!(1500.00));
    }

    #[test]
    fn test_day_ledger_ordering_and_running_balance() {
        let period = ReportPeriod {
            from: date(1),
            to: date(31),
        };
        // Deliberately out of order: same effective date, recorded later
        // first.
        let lines = vec![
            line(2, Method::Cash, Direction::Outflow, dec!(30.00), 10, 200),
            line(1, Method::Cash, Direction::Inflow, dec!(100.00), 10, 100),
            line(3, Method::Cash, Direction::Inflow, dec!(5.00), 2, 300),
        ];

        let ledger = day_ledger(period, lines);
        let seqs: Vec<i64> = ledger.rows.iter().map(|r| r.line.seq_no).collect();
        assert_eq!(seqs, vec![3, 1, 2]);

        let balances: Vec<Decimal> = ledger.rows.iter().map(|r| r.running_balance).collect();
        assert_eq!(balances, vec![dec!(5.00), dec!(105.00), dec!(75.00)]);

        assert_eq!(ledger.totals.inflow, dec!(105.00));
        assert_eq!(ledger.totals.outflow, dec!(30.00));
        assert_eq!(ledger.totals.net, dec!(75.00));
        assert_eq!(
            ledger.rows.last().unwrap().running_balance,
            ledger.totals.net
        );
    }

    #[test]
    fn test_day_ledger_window_filter() {
        let period = ReportPeriod {
            from: date(10),
            to: date(20),
        };
        let lines = vec![
            line(1, Method::Cash, Direction::Inflow, dec!(10.00), 9, 1),
            line(2, Method::Cash, Direction::Inflow, dec!(20.00), 10, 2),
            line(3, Method::Cash, Direction::Inflow, dec!(30.00), 21, 3),
        ];
        let ledger = day_ledger(period, lines);
        assert_eq!(ledger.rows.len(), 1);
        assert_eq!(ledger.totals.net, dec!(20.00));
    }

    #[test]
    fn test_ledger_report_resolves_names_and_tags() {
        let account = BankAccountId::new();
        let entry = bank_line(1, Direction::Inflow, dec!(250.00), account);
        let entry_id = entry.id;

        let mut names = NameIndex::default();
        names
            .bank_accounts
            .insert(account, "Operating Account".to_string());

        let mut tags_by_entry = HashMap::new();
        tags_by_entry.insert(entry_id, vec!["rent".to_string(), "march".to_string()]);

        let report = ledger_report(
            ReportPeriod {
                from: date(1),
                to: date(31),
            },
            vec![entry],
            &tags_by_entry,
            &names,
        );

        let row = &report.rows[0];
        assert_eq!(row.bank_account.as_deref(), Some("Operating Account"));
        assert_eq!(row.tags, vec!["rent", "march"]);
        assert_eq!(report.totals.closing_balance, dec!(250.00));
    }
}
