//! Ledger domain types for entry creation and validation.
//!
//! Eight caller-facing operation kinds are normalized into one canonical
//! entry record. The operation set is a closed tagged-variant enum, so a
//! match over it is checked at compile time instead of relying on runtime
//! field-presence checks.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tesoro_shared::config::{LedgerSettings, SettlementDirection};
use tesoro_shared::types::{
    Amount, BankAccountId, CardId, CheckId, ContactId, Currency, TagId, UserId,
};

use super::pos::{PosBreakdown, PosInput};

/// Payment method classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Physical cash in the safe.
    Cash,
    /// Bank account movement.
    Bank,
    /// Point-of-sale terminal collection.
    Pos,
    /// Payment card movement.
    Card,
    /// Check settlement.
    Check,
}

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money received.
    Inflow,
    /// Money paid out.
    Outflow,
}

/// Operation kind of a canonical ledger entry.
///
/// `PosCommission` is only ever produced by the factory as the linked
/// sibling of a POS collection; `Other` is reserved for imported legacy
/// rows. Neither has a caller-facing constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Cash received into the safe.
    CashIn,
    /// Cash paid out of the safe.
    CashOut,
    /// Deposit into a bank account.
    BankIn,
    /// Withdrawal/transfer out of a bank account.
    BankOut,
    /// POS terminal collection.
    PosCollection,
    /// Commission retained by the POS provider.
    PosCommission,
    /// Expense charged to a card.
    CardExpense,
    /// Payment of a card balance.
    CardPayment,
    /// Settlement of a check from the register.
    CheckSettlement,
    /// Imported legacy row with no specific kind.
    Other,
}

impl OperationKind {
    /// The payment method this kind belongs to.
    #[must_use]
    pub const fn method(self) -> Method {
        match self {
            Self::CashIn | Self::CashOut | Self::Other => Method::Cash,
            Self::BankIn | Self::BankOut => Method::Bank,
            Self::PosCollection | Self::PosCommission => Method::Pos,
            Self::CardExpense | Self::CardPayment => Method::Card,
            Self::CheckSettlement => Method::Check,
        }
    }

    /// The canonical direction for this kind.
    ///
    /// Direction is never independently settable: every entry stores the
    /// value this mapping yields. Check settlements are the single
    /// policy-dependent case; everything else is fixed.
    #[must_use]
    pub const fn direction(self, settlement: SettlementDirection) -> Direction {
        match self {
            Self::CashIn | Self::BankIn | Self::PosCollection => Direction::Inflow,
            Self::CashOut
            | Self::BankOut
            | Self::PosCommission
            | Self::CardExpense
            | Self::CardPayment
            | Self::Other => Direction::Outflow,
            Self::CheckSettlement => match settlement {
                SettlementDirection::Inflow => Direction::Inflow,
                SettlementDirection::Outflow => Direction::Outflow,
            },
        }
    }
}

/// Classification for outflows that require one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutflowCategory {
    /// Staff salaries.
    Salary,
    /// Taxes and government fees.
    Tax,
    /// Vehicle fuel.
    Fuel,
    /// Premises rent.
    Rent,
    /// Electricity, water, connectivity.
    Utilities,
    /// Consumables and office supplies.
    Supplies,
    /// Repairs and maintenance.
    Maintenance,
    /// Bank and service fees.
    Fees,
    /// Anything else.
    Other,
}

/// Counterparty classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    /// A customer the organization collects from.
    Customer,
    /// A supplier the organization pays.
    Supplier,
    /// Any other counterparty.
    Other,
}

/// Booking conventions the factory honors, fixed per deployment.
#[derive(Debug, Clone, Copy)]
pub struct LedgerPolicy {
    /// Book the POS commission as a separate linked outflow entry.
    pub book_pos_commission: bool,
    /// Direction check settlements are booked in.
    pub settlement_direction: SettlementDirection,
}

/// Deployment constants the factory needs: currency, organizational time
/// zone, and booking policy.
#[derive(Debug, Clone, Copy)]
pub struct LedgerContext {
    /// The deployment currency.
    pub currency: Currency,
    /// The organization's time zone; "today" for back-date detection is
    /// computed here, never from host-local time.
    pub timezone: chrono_tz::Tz,
    /// Booking conventions.
    pub policy: LedgerPolicy,
}

impl LedgerContext {
    /// Builds the context from loaded configuration.
    #[must_use]
    pub const fn from_settings(settings: &LedgerSettings) -> Self {
        Self {
            currency: settings.currency,
            timezone: settings.timezone,
            policy: LedgerPolicy {
                book_pos_commission: settings.book_pos_commission,
                settlement_direction: settings.settlement_direction,
            },
        }
    }

    /// The current business date in the organization's time zone.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// One caller-facing ledger operation.
///
/// Each variant carries exactly the references its kind requires, so a
/// request that would be missing a field in a loosely-typed payload
/// simply does not construct.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Cash received into the safe.
    CashIn {
        /// Amount received.
        amount: Amount,
    },
    /// Cash paid out of the safe.
    CashOut {
        /// Amount paid.
        amount: Amount,
        /// Optional outflow classification.
        category: Option<OutflowCategory>,
    },
    /// Deposit into a bank account.
    BankIn {
        /// Target bank account.
        bank_account_id: BankAccountId,
        /// Amount deposited.
        amount: Amount,
    },
    /// Withdrawal/transfer out of a bank account.
    BankOut {
        /// Source bank account.
        bank_account_id: BankAccountId,
        /// Amount withdrawn.
        amount: Amount,
        /// Optional outflow classification.
        category: Option<OutflowCategory>,
    },
    /// POS terminal collection settled into a bank account.
    PosCollection {
        /// Account the terminal settles into.
        bank_account_id: BankAccountId,
        /// Mode selector plus the mode's amounts.
        pos: PosInput,
    },
    /// Expense charged to a card.
    CardExpense {
        /// The card charged.
        card_id: CardId,
        /// Amount charged.
        amount: Amount,
        /// Required outflow classification.
        category: OutflowCategory,
    },
    /// Payment of a card balance.
    CardPayment {
        /// The card paid.
        card_id: CardId,
        /// Amount paid.
        amount: Amount,
    },
    /// Settlement of a check against a bank account.
    CheckSettlement {
        /// The check being settled.
        check_id: CheckId,
        /// The account the settlement moves through.
        bank_account_id: BankAccountId,
        /// Settled amount.
        amount: Amount,
    },
}

impl Operation {
    /// The operation kind of the primary entry this operation produces.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::CashIn { .. } => OperationKind::CashIn,
            Self::CashOut { .. } => OperationKind::CashOut,
            Self::BankIn { .. } => OperationKind::BankIn,
            Self::BankOut { .. } => OperationKind::BankOut,
            Self::PosCollection { .. } => OperationKind::PosCollection,
            Self::CardExpense { .. } => OperationKind::CardExpense,
            Self::CardPayment { .. } => OperationKind::CardPayment,
            Self::CheckSettlement { .. } => OperationKind::CheckSettlement,
        }
    }
}

/// Attachment pointer received from the file-storage layer.
///
/// The core never reads file bytes; it holds path and metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttachment {
    /// Storage path/key of the uploaded file.
    pub file_path: String,
    /// Original filename.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// File size in bytes.
    pub byte_size: i64,
}

/// Input for recording one ledger entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// The acting user (pre-authenticated by the request layer).
    pub actor: UserId,
    /// The operation to record.
    pub operation: Operation,
    /// Business date of the movement; defaults to today in the
    /// organization's time zone.
    pub effective_date: Option<NaiveDate>,
    /// Free-text description.
    pub description: Option<String>,
    /// Optional counterparty.
    pub contact_id: Option<ContactId>,
    /// Opaque metadata bag, not interpreted by the core.
    pub metadata: serde_json::Value,
    /// Tags to associate.
    pub tags: Vec<TagId>,
    /// Evidentiary files to link.
    pub attachments: Vec<NewAttachment>,
}

impl NewEntry {
    /// Creates an input with the common optional fields empty.
    #[must_use]
    pub fn new(actor: UserId, operation: Operation) -> Self {
        Self {
            actor,
            operation,
            effective_date: None,
            description: None,
            contact_id: None,
            metadata: serde_json::Value::Null,
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }
}

/// The canonical ledger entry, resolved and ready to persist.
///
/// Identity (`id`, `seq_no`) and `recorded_at` are assigned by the
/// persistence layer at insert time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDraft {
    /// Payment method.
    pub method: Method,
    /// Operation kind.
    pub kind: OperationKind,
    /// Direction, derived from `kind` through the canonical mapping.
    pub direction: Direction,
    /// Amount, strictly positive with scale 2.
    pub amount: Decimal,
    /// Deployment currency.
    pub currency: Currency,
    /// Business date of the movement.
    pub effective_date: NaiveDate,
    /// Whether `effective_date` precedes today in the organization's
    /// time zone (triggers a post-commit notification).
    pub back_dated: bool,
    /// Linked bank account, when the kind requires one.
    pub bank_account_id: Option<BankAccountId>,
    /// Linked card, when the kind requires one.
    pub card_id: Option<CardId>,
    /// Counterparty.
    pub contact_id: Option<ContactId>,
    /// The check being settled (method = check only).
    pub check_id: Option<CheckId>,
    /// Outflow classification.
    pub category: Option<OutflowCategory>,
    /// Free-text description.
    pub description: Option<String>,
    /// Opaque metadata bag.
    pub metadata: serde_json::Value,
    /// POS math breakdown (method = pos only).
    pub pos: Option<PosBreakdown>,
    /// The acting user.
    pub created_by: UserId,
}

/// Result of resolving one operation: the primary entry plus the linked
/// commission entry when the deployment books commissions separately.
#[derive(Debug, Clone)]
pub struct ResolvedOperation {
    /// The primary canonical entry.
    pub entry: EntryDraft,
    /// The linked `pos_commission` outflow, if policy requires one.
    pub commission: Option<EntryDraft>,
}

/// Validation view of a bank account or card reference.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceInfo {
    /// Whether the entity is enabled.
    pub is_active: bool,
}

/// Validation view of a contact reference.
#[derive(Debug, Clone, Copy)]
pub struct ContactInfo {
    /// The contact's classification.
    pub kind: ContactKind,
    /// Whether the contact is enabled.
    pub is_active: bool,
}
