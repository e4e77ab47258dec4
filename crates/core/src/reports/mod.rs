//! The balance & report aggregator.
//!
//! Read-side only: folds committed entries into point-in-time balances
//! and builds ordered ledger reports with a running balance. Never
//! writes.

pub mod aggregate;
pub mod types;

#[cfg(test)]
mod aggregate_props;

pub use aggregate::{
    bank_account_balance, bank_account_balance_from, cash_balance, cash_balance_from, day_ledger,
    held_instruments, ledger_report, sort_for_report,
};
pub use types::{
    BalanceCheckpoint, CheckLine, DayLedger, DayLedgerRow, EntryLine, HeldInstruments,
    LedgerReport, LedgerRow, NameIndex, ReportPeriod, ReportTotals,
};
