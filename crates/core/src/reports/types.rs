//! Report data types.
//!
//! These structures are the sole input contract for document rendering
//! (PDF/CSV) and the dashboard; the core computes them, it never formats
//! documents.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tesoro_shared::types::{BankAccountId, CardId, ContactId, EntryId};

use crate::instrument::CheckStatus;
use crate::ledger::{ContactKind, Direction, Method, OperationKind};

/// The projection of a ledger entry the aggregator folds over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryLine {
    /// Entry id.
    pub id: EntryId,
    /// Creation-ordered sequence number (tiebreaker for the report
    /// order).
    pub seq_no: i64,
    /// Payment method.
    pub method: Method,
    /// Operation kind.
    pub kind: OperationKind,
    /// Movement direction.
    pub direction: Direction,
    /// Amount (scale 2, positive).
    pub amount: Decimal,
    /// Business date.
    pub effective_date: NaiveDate,
    /// System creation time.
    pub recorded_at: DateTime<Utc>,
    /// Linked bank account.
    pub bank_account_id: Option<BankAccountId>,
    /// Linked card.
    pub card_id: Option<CardId>,
    /// Counterparty.
    pub contact_id: Option<ContactId>,
    /// Description.
    pub description: Option<String>,
}

impl EntryLine {
    /// The amount with the direction's sign applied: inflow positive,
    /// outflow negative.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Inflow => self.amount,
            Direction::Outflow => -self.amount,
        }
    }
}

/// The projection of a check the exposure figure folds over.
#[derive(Debug, Clone)]
pub struct CheckLine {
    /// Lifecycle status.
    pub status: CheckStatus,
    /// Face amount.
    pub amount: Decimal,
    /// Counterparty classification, when a counterparty is linked.
    pub contact_kind: Option<ContactKind>,
}

/// Count and sum of checks awaiting collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldInstruments {
    /// Number of customer checks in the safe.
    pub count: u64,
    /// Their summed face value.
    pub total: Decimal,
}

/// A date window for ledger reports (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// First day of the window.
    pub from: NaiveDate,
    /// Last day of the window.
    pub to: NaiveDate,
}

impl ReportPeriod {
    /// Returns true if the date falls inside the window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// One row of the day ledger: the entry plus the running balance after
/// it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayLedgerRow {
    /// The entry.
    pub line: EntryLine,
    /// Prefix sum of signed amounts up to and including this row,
    /// starting at zero for the window.
    pub running_balance: Decimal,
}

/// The day ledger: ordered rows with running balance, plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayLedger {
    /// The date window.
    pub period: ReportPeriod,
    /// Rows ordered by (effective date, recorded at, seq no).
    pub rows: Vec<DayLedgerRow>,
    /// Window totals.
    pub totals: ReportTotals,
}

/// Totals over a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTotals {
    /// Sum of inflow amounts.
    pub inflow: Decimal,
    /// Sum of outflow amounts.
    pub outflow: Decimal,
    /// `inflow - outflow`.
    pub net: Decimal,
    /// The final running balance (equals `net` by construction).
    pub closing_balance: Decimal,
}

/// Human-readable names for linked references, resolved by the read
/// side.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    /// Bank account names by id.
    pub bank_accounts: HashMap<BankAccountId, String>,
    /// Card names by id.
    pub cards: HashMap<CardId, String>,
    /// Contact names by id.
    pub contacts: HashMap<ContactId, String>,
}

/// One row of the full ledger report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    /// The entry.
    pub line: EntryLine,
    /// Prefix sum of signed amounts up to and including this row.
    pub running_balance: Decimal,
    /// Names of the tags attached to this entry.
    pub tags: Vec<String>,
    /// Resolved bank account name.
    pub bank_account: Option<String>,
    /// Resolved card name.
    pub card: Option<String>,
    /// Resolved contact name.
    pub contact: Option<String>,
}

/// The full ledger report handed to document rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerReport {
    /// The date window.
    pub period: ReportPeriod,
    /// Rows ordered by (effective date, recorded at, seq no).
    pub rows: Vec<LedgerRow>,
    /// Window totals.
    pub totals: ReportTotals,
}

/// A materialized balance snapshot.
///
/// Purely a performance optimization: the fold over all entries remains
/// the source of truth, and folding forward from a checkpoint must agree
/// with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheckpoint {
    /// The date this snapshot covers through (inclusive).
    pub as_of: NaiveDate,
    /// The balance at end of `as_of`.
    pub balance: Decimal,
}
