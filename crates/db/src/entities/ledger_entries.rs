//! `SeaORM` Entity for the ledger_entries table.
//!
//! One row per money movement. `seq_no` is assigned from a Postgres
//! sequence at insert and is the tiebreaker that makes the report order
//! total; `direction` is stored but always derived from `kind` through
//! the canonical mapping.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{EntryDirection, EntryKind, EntryMethod, OutflowCategory};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub seq_no: i64,
    pub method: EntryMethod,
    pub kind: EntryKind,
    pub direction: EntryDirection,
    pub amount: Decimal,
    pub currency: String,
    pub effective_date: Date,
    pub recorded_at: DateTimeWithTimeZone,
    pub bank_account_id: Option<Uuid>,
    pub card_id: Option<Uuid>,
    pub contact_id: Option<Uuid>,
    pub check_id: Option<Uuid>,
    pub category: Option<OutflowCategory>,
    pub description: Option<String>,
    pub metadata: Json,
    pub pos_gross: Option<Decimal>,
    pub pos_commission: Option<Decimal>,
    pub pos_net: Option<Decimal>,
    pub pos_effective_rate: Option<Decimal>,
    pub linked_entry_id: Option<Uuid>,
    pub created_by: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id"
    )]
    BankAccounts,
    #[sea_orm(
        belongs_to = "super::cards::Entity",
        from = "Column::CardId",
        to = "super::cards::Column::Id"
    )]
    Cards,
    #[sea_orm(
        belongs_to = "super::contacts::Entity",
        from = "Column::ContactId",
        to = "super::contacts::Column::Id"
    )]
    Contacts,
    #[sea_orm(
        belongs_to = "super::checks::Entity",
        from = "Column::CheckId",
        to = "super::checks::Column::Id"
    )]
    Checks,
    #[sea_orm(has_many = "super::entry_tags::Entity")]
    EntryTags,
    #[sea_orm(has_many = "super::attachments::Entity")]
    Attachments,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccounts.def()
    }
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::contacts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contacts.def()
    }
}

impl Related<super::checks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checks.def()
    }
}

impl Related<super::entry_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryTags.def()
    }
}

impl Related<super::attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
