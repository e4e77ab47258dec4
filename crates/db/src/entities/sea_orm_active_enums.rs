//! Postgres enum types mapped with `DeriveActiveEnum`, plus conversions
//! to and from the core domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tesoro_core::instrument;
use tesoro_core::ledger;

/// Payment method of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_method")]
pub enum EntryMethod {
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank account movement.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// POS terminal collection.
    #[sea_orm(string_value = "pos")]
    Pos,
    /// Payment card movement.
    #[sea_orm(string_value = "card")]
    Card,
    /// Check settlement.
    #[sea_orm(string_value = "check")]
    Check,
}

/// Operation kind of a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_kind")]
pub enum EntryKind {
    /// Cash received into the safe.
    #[sea_orm(string_value = "cash_in")]
    CashIn,
    /// Cash paid out of the safe.
    #[sea_orm(string_value = "cash_out")]
    CashOut,
    /// Deposit into a bank account.
    #[sea_orm(string_value = "bank_in")]
    BankIn,
    /// Withdrawal out of a bank account.
    #[sea_orm(string_value = "bank_out")]
    BankOut,
    /// POS terminal collection.
    #[sea_orm(string_value = "pos_collection")]
    PosCollection,
    /// Commission retained by the POS provider.
    #[sea_orm(string_value = "pos_commission")]
    PosCommission,
    /// Expense charged to a card.
    #[sea_orm(string_value = "card_expense")]
    CardExpense,
    /// Payment of a card balance.
    #[sea_orm(string_value = "card_payment")]
    CardPayment,
    /// Settlement of a check.
    #[sea_orm(string_value = "check_settlement")]
    CheckSettlement,
    /// Imported legacy row.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Direction of a money movement.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_direction")]
pub enum EntryDirection {
    /// Money received.
    #[sea_orm(string_value = "inflow")]
    Inflow,
    /// Money paid out.
    #[sea_orm(string_value = "outflow")]
    Outflow,
}

/// Outflow classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "outflow_category")]
pub enum OutflowCategory {
    /// Staff salaries.
    #[sea_orm(string_value = "salary")]
    Salary,
    /// Taxes and government fees.
    #[sea_orm(string_value = "tax")]
    Tax,
    /// Vehicle fuel.
    #[sea_orm(string_value = "fuel")]
    Fuel,
    /// Premises rent.
    #[sea_orm(string_value = "rent")]
    Rent,
    /// Electricity, water, connectivity.
    #[sea_orm(string_value = "utilities")]
    Utilities,
    /// Consumables and office supplies.
    #[sea_orm(string_value = "supplies")]
    Supplies,
    /// Repairs and maintenance.
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
    /// Bank and service fees.
    #[sea_orm(string_value = "fees")]
    Fees,
    /// Anything else.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Counterparty classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contact_kind")]
pub enum ContactKind {
    /// A customer the organization collects from.
    #[sea_orm(string_value = "customer")]
    Customer,
    /// A supplier the organization pays.
    #[sea_orm(string_value = "supplier")]
    Supplier,
    /// Any other counterparty.
    #[sea_orm(string_value = "other")]
    Other,
}

/// Lifecycle status of a check.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "check_status")]
pub enum CheckStatus {
    /// Held in the safe.
    #[sea_orm(string_value = "in_safe")]
    InSafe,
    /// Handed to a supplier.
    #[sea_orm(string_value = "endorsed")]
    Endorsed,
    /// Written by the organization.
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Settled.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// Action recorded on a check lifecycle move.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "move_action")]
pub enum MoveAction {
    /// Instrument entered the safe.
    #[sea_orm(string_value = "in")]
    In,
    /// Instrument handed out.
    #[sea_orm(string_value = "out")]
    Out,
    /// Instrument issued.
    #[sea_orm(string_value = "issue")]
    Issue,
    /// Instrument settled.
    #[sea_orm(string_value = "payment")]
    Payment,
}

// ============================================================
// Conversions to/from the core domain enums
// ============================================================

impl From<ledger::Method> for EntryMethod {
    fn from(value: ledger::Method) -> Self {
        match value {
            ledger::Method::Cash => Self::Cash,
            ledger::Method::Bank => Self::Bank,
            ledger::Method::Pos => Self::Pos,
            ledger::Method::Card => Self::Card,
            ledger::Method::Check => Self::Check,
        }
    }
}

impl From<EntryMethod> for ledger::Method {
    fn from(value: EntryMethod) -> Self {
        match value {
            EntryMethod::Cash => Self::Cash,
            EntryMethod::Bank => Self::Bank,
            EntryMethod::Pos => Self::Pos,
            EntryMethod::Card => Self::Card,
            EntryMethod::Check => Self::Check,
        }
    }
}

impl From<ledger::OperationKind> for EntryKind {
    fn from(value: ledger::OperationKind) -> Self {
        match value {
            ledger::OperationKind::CashIn => Self::CashIn,
            ledger::OperationKind::CashOut => Self::CashOut,
            ledger::OperationKind::BankIn => Self::BankIn,
            ledger::OperationKind::BankOut => Self::BankOut,
            ledger::OperationKind::PosCollection => Self::PosCollection,
            ledger::OperationKind::PosCommission => Self::PosCommission,
            ledger::OperationKind::CardExpense => Self::CardExpense,
            ledger::OperationKind::CardPayment => Self::CardPayment,
            ledger::OperationKind::CheckSettlement => Self::CheckSettlement,
            ledger::OperationKind::Other => Self::Other,
        }
    }
}

impl From<EntryKind> for ledger::OperationKind {
    fn from(value: EntryKind) -> Self {
        match value {
            EntryKind::CashIn => Self::CashIn,
            EntryKind::CashOut => Self::CashOut,
            EntryKind::BankIn => Self::BankIn,
            EntryKind::BankOut => Self::BankOut,
            EntryKind::PosCollection => Self::PosCollection,
            EntryKind::PosCommission => Self::PosCommission,
            EntryKind::CardExpense => Self::CardExpense,
            EntryKind::CardPayment => Self::CardPayment,
            EntryKind::CheckSettlement => Self::CheckSettlement,
            EntryKind::Other => Self::Other,
        }
    }
}

impl From<ledger::Direction> for EntryDirection {
    fn from(value: ledger::Direction) -> Self {
        match value {
            ledger::Direction::Inflow => Self::Inflow,
            ledger::Direction::Outflow => Self::Outflow,
        }
    }
}

impl From<EntryDirection> for ledger::Direction {
    fn from(value: EntryDirection) -> Self {
        match value {
            EntryDirection::Inflow => Self::Inflow,
            EntryDirection::Outflow => Self::Outflow,
        }
    }
}

impl From<ledger::OutflowCategory> for OutflowCategory {
    fn from(value: ledger::OutflowCategory) -> Self {
        match value {
            ledger::OutflowCategory::Salary => Self::Salary,
            ledger::OutflowCategory::Tax => Self::Tax,
            ledger::OutflowCategory::Fuel => Self::Fuel,
            ledger::OutflowCategory::Rent => Self::Rent,
            ledger::OutflowCategory::Utilities => Self::Utilities,
            ledger::OutflowCategory::Supplies => Self::Supplies,
            ledger::OutflowCategory::Maintenance => Self::Maintenance,
            ledger::OutflowCategory::Fees => Self::Fees,
            ledger::OutflowCategory::Other => Self::Other,
        }
    }
}

impl From<OutflowCategory> for ledger::OutflowCategory {
    fn from(value: OutflowCategory) -> Self {
        match value {
            OutflowCategory::Salary => Self::Salary,
            OutflowCategory::Tax => Self::Tax,
            OutflowCategory::Fuel => Self::Fuel,
            OutflowCategory::Rent => Self::Rent,
            OutflowCategory::Utilities => Self::Utilities,
            OutflowCategory::Supplies => Self::Supplies,
            OutflowCategory::Maintenance => Self::Maintenance,
            OutflowCategory::Fees => Self::Fees,
            OutflowCategory::Other => Self::Other,
        }
    }
}

impl From<ledger::ContactKind> for ContactKind {
    fn from(value: ledger::ContactKind) -> Self {
        match value {
            ledger::ContactKind::Customer => Self::Customer,
            ledger::ContactKind::Supplier => Self::Supplier,
            ledger::ContactKind::Other => Self::Other,
        }
    }
}

impl From<ContactKind> for ledger::ContactKind {
    fn from(value: ContactKind) -> Self {
        match value {
            ContactKind::Customer => Self::Customer,
            ContactKind::Supplier => Self::Supplier,
            ContactKind::Other => Self::Other,
        }
    }
}

impl From<instrument::CheckStatus> for CheckStatus {
    fn from(value: instrument::CheckStatus) -> Self {
        match value {
            instrument::CheckStatus::InSafe => Self::InSafe,
            instrument::CheckStatus::Endorsed => Self::Endorsed,
            instrument::CheckStatus::Issued => Self::Issued,
            instrument::CheckStatus::Paid => Self::Paid,
        }
    }
}

impl From<CheckStatus> for instrument::CheckStatus {
    fn from(value: CheckStatus) -> Self {
        match value {
            CheckStatus::InSafe => Self::InSafe,
            CheckStatus::Endorsed => Self::Endorsed,
            CheckStatus::Issued => Self::Issued,
            CheckStatus::Paid => Self::Paid,
        }
    }
}

impl From<instrument::MoveAction> for MoveAction {
    fn from(value: instrument::MoveAction) -> Self {
        match value {
            instrument::MoveAction::In => Self::In,
            instrument::MoveAction::Out => Self::Out,
            instrument::MoveAction::Issue => Self::Issue,
            instrument::MoveAction::Payment => Self::Payment,
        }
    }
}

impl From<MoveAction> for instrument::MoveAction {
    fn from(value: MoveAction) -> Self {
        match value {
            MoveAction::In => Self::In,
            MoveAction::Out => Self::Out,
            MoveAction::Issue => Self::Issue,
            MoveAction::Payment => Self::Payment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_conversion_roundtrip() {
        for kind in [
            ledger::OperationKind::CashIn,
            ledger::OperationKind::CashOut,
            ledger::OperationKind::BankIn,
            ledger::OperationKind::BankOut,
            ledger::OperationKind::PosCollection,
            ledger::OperationKind::PosCommission,
            ledger::OperationKind::CardExpense,
            ledger::OperationKind::CardPayment,
            ledger::OperationKind::CheckSettlement,
            ledger::OperationKind::Other,
        ] {
            let db: EntryKind = kind.into();
            let back: ledger::OperationKind = db.into();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_status_conversion_roundtrip() {
        for status in [
            instrument::CheckStatus::InSafe,
            instrument::CheckStatus::Endorsed,
            instrument::CheckStatus::Issued,
            instrument::CheckStatus::Paid,
        ] {
            let db: CheckStatus = status.into();
            let back: instrument::CheckStatus = db.into();
            assert_eq!(back, status);
        }
    }
}
