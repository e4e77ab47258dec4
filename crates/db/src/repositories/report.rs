//! Report repository: the read side feeding the core aggregator.
//!
//! Queries committed entries, maps them to the aggregator's projections,
//! and resolves human-readable names. Never writes to the ledger; the
//! only write here is the optional balance checkpoint snapshot.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use tesoro_core::reports::{
    self, BalanceCheckpoint, CheckLine, DayLedger, EntryLine, HeldInstruments, LedgerReport,
    NameIndex, ReportPeriod,
};
use tesoro_shared::types::{BankAccountId, CardId, ContactId, EntryId};

use crate::entities::sea_orm_active_enums::CheckStatus as DbCheckStatus;
use crate::entities::{
    balance_checkpoints, bank_accounts, cards, checks, contacts, entry_tags, ledger_entries, tags,
};

/// Error types for report queries.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Referenced entity not found.
    #[error("Not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Point-in-time balance of one bank account.
    ///
    /// Folds forward from the latest checkpoint when one exists,
    /// otherwise from `initial_balance` over the full history. Both
    /// paths compute the same figure; nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NotFound` if the account does not exist.
    pub async fn bank_account_balance(
        &self,
        account_id: BankAccountId,
    ) -> Result<Decimal, ReportError> {
        let account = bank_accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| ReportError::NotFound(account_id.into_inner()))?;

        let checkpoint = self.latest_checkpoint(Some(account_id)).await?;

        let mut query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::BankAccountId.eq(account_id.into_inner()));
        if let Some(checkpoint) = &checkpoint {
            query = query.filter(ledger_entries::Column::EffectiveDate.gt(checkpoint.as_of));
        }
        let lines: Vec<EntryLine> = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(entry_line)
            .collect();

        let balance = match checkpoint {
            Some(checkpoint) => {
                reports::bank_account_balance_from(&checkpoint, account_id, &lines)
            }
            None => reports::bank_account_balance(account.initial_balance, account_id, &lines),
        };
        Ok(balance)
    }

    /// The organization-wide cash balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn cash_balance(&self) -> Result<Decimal, ReportError> {
        let checkpoint = self.latest_checkpoint(None).await?;

        let mut query = ledger_entries::Entity::find().filter(
            ledger_entries::Column::Method
                .eq(crate::entities::sea_orm_active_enums::EntryMethod::Cash),
        );
        if let Some(checkpoint) = &checkpoint {
            query = query.filter(ledger_entries::Column::EffectiveDate.gt(checkpoint.as_of));
        }
        let lines: Vec<EntryLine> = query
            .all(&self.db)
            .await?
            .into_iter()
            .map(entry_line)
            .collect();

        let balance = match checkpoint {
            Some(checkpoint) => reports::cash_balance_from(&checkpoint, &lines),
            None => reports::cash_balance(&lines),
        };
        Ok(balance)
    }

    /// The "checks awaiting collection" figure.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn held_instruments(&self) -> Result<HeldInstruments, ReportError> {
        let check_rows = checks::Entity::find()
            .filter(checks::Column::Status.eq(DbCheckStatus::InSafe))
            .all(&self.db)
            .await?;

        let contact_ids: Vec<Uuid> = check_rows.iter().filter_map(|c| c.contact_id).collect();
        let contact_kinds: HashMap<Uuid, tesoro_core::ledger::ContactKind> = if contact_ids
            .is_empty()
        {
            HashMap::new()
        } else {
            contacts::Entity::find()
                .filter(contacts::Column::Id.is_in(contact_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| (c.id, c.kind.into()))
                .collect()
        };

        let lines: Vec<CheckLine> = check_rows
            .into_iter()
            .map(|c| CheckLine {
                status: c.status.into(),
                amount: c.amount,
                contact_kind: c.contact_id.and_then(|id| contact_kinds.get(&id).copied()),
            })
            .collect();

        Ok(reports::held_instruments(&lines))
    }

    /// The day ledger for a date window.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn day_ledger(&self, period: ReportPeriod) -> Result<DayLedger, ReportError> {
        let lines = self.window_lines(period).await?;
        Ok(reports::day_ledger(period, lines))
    }

    /// The full ledger report for a date window, with tags and resolved
    /// reference names.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ledger_report(&self, period: ReportPeriod) -> Result<LedgerReport, ReportError> {
        let lines = self.window_lines(period).await?;

        let entry_ids: Vec<Uuid> = lines.iter().map(|l| l.id.into_inner()).collect();
        let tags_by_entry = self.tags_for(&entry_ids).await?;
        let names = self.name_index(&lines).await?;

        Ok(reports::ledger_report(period, lines, &tags_by_entry, &names))
    }

    /// Materializes a balance checkpoint through `as_of` (inclusive).
    ///
    /// Pass `None` for the organization-wide cash balance. The snapshot
    /// only shortens later folds; correctness never depends on it.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NotFound` for an unknown account.
    pub async fn save_checkpoint(
        &self,
        account_id: Option<BankAccountId>,
        as_of: NaiveDate,
    ) -> Result<BalanceCheckpoint, ReportError> {
        let balance = match account_id {
            Some(account_id) => {
                let account = bank_accounts::Entity::find_by_id(account_id.into_inner())
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| ReportError::NotFound(account_id.into_inner()))?;

                let lines: Vec<EntryLine> = ledger_entries::Entity::find()
                    .filter(ledger_entries::Column::BankAccountId.eq(account_id.into_inner()))
                    .filter(ledger_entries::Column::EffectiveDate.lte(as_of))
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(entry_line)
                    .collect();
                reports::bank_account_balance(account.initial_balance, account_id, &lines)
            }
            None => {
                let lines: Vec<EntryLine> = ledger_entries::Entity::find()
                    .filter(
                        ledger_entries::Column::Method
                            .eq(crate::entities::sea_orm_active_enums::EntryMethod::Cash),
                    )
                    .filter(ledger_entries::Column::EffectiveDate.lte(as_of))
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(entry_line)
                    .collect();
                reports::cash_balance(&lines)
            }
        };

        balance_checkpoints::ActiveModel {
            id: Set(Uuid::now_v7()),
            bank_account_id: Set(account_id.map(BankAccountId::into_inner)),
            as_of: Set(as_of),
            balance: Set(balance),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        Ok(BalanceCheckpoint { as_of, balance })
    }

    async fn latest_checkpoint(
        &self,
        account_id: Option<BankAccountId>,
    ) -> Result<Option<BalanceCheckpoint>, ReportError> {
        let mut query = balance_checkpoints::Entity::find();
        query = match account_id {
            Some(account_id) => query.filter(
                balance_checkpoints::Column::BankAccountId.eq(account_id.into_inner()),
            ),
            None => query.filter(balance_checkpoints::Column::BankAccountId.is_null()),
        };

        let row = query
            .order_by_desc(balance_checkpoints::Column::AsOf)
            .limit(1)
            .one(&self.db)
            .await?;

        Ok(row.map(|r| BalanceCheckpoint {
            as_of: r.as_of,
            balance: r.balance,
        }))
    }

    async fn window_lines(&self, period: ReportPeriod) -> Result<Vec<EntryLine>, ReportError> {
        let rows = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::EffectiveDate.gte(period.from))
            .filter(ledger_entries::Column::EffectiveDate.lte(period.to))
            .order_by_asc(ledger_entries::Column::EffectiveDate)
            .order_by_asc(ledger_entries::Column::RecordedAt)
            .order_by_asc(ledger_entries::Column::SeqNo)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(entry_line).collect())
    }

    async fn tags_for(
        &self,
        entry_ids: &[Uuid],
    ) -> Result<HashMap<EntryId, Vec<String>>, ReportError> {
        if entry_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = entry_tags::Entity::find()
            .filter(entry_tags::Column::EntryId.is_in(entry_ids.to_vec()))
            .all(&self.db)
            .await?;

        let tag_ids: Vec<Uuid> = links.iter().map(|l| l.tag_id).collect();
        let tag_names: HashMap<Uuid, String> = if tag_ids.is_empty() {
            HashMap::new()
        } else {
            tags::Entity::find()
                .filter(tags::Column::Id.is_in(tag_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|t| (t.id, t.name))
                .collect()
        };

        let mut by_entry: HashMap<EntryId, Vec<String>> = HashMap::new();
        for link in links {
            if let Some(name) = tag_names.get(&link.tag_id) {
                by_entry
                    .entry(EntryId::from_uuid(link.entry_id))
                    .or_default()
                    .push(name.clone());
            }
        }
        Ok(by_entry)
    }

    async fn name_index(&self, lines: &[EntryLine]) -> Result<NameIndex, ReportError> {
        let account_ids: Vec<Uuid> = lines
            .iter()
            .filter_map(|l| l.bank_account_id.map(BankAccountId::into_inner))
            .collect();
        let card_ids: Vec<Uuid> = lines
            .iter()
            .filter_map(|l| l.card_id.map(CardId::into_inner))
            .collect();
        let contact_ids: Vec<Uuid> = lines
            .iter()
            .filter_map(|l| l.contact_id.map(ContactId::into_inner))
            .collect();

        let mut names = NameIndex::default();

        if !account_ids.is_empty() {
            for account in bank_accounts::Entity::find()
                .filter(bank_accounts::Column::Id.is_in(account_ids))
                .all(&self.db)
                .await?
            {
                names
                    .bank_accounts
                    .insert(BankAccountId::from_uuid(account.id), account.name);
            }
        }
        if !card_ids.is_empty() {
            for card in cards::Entity::find()
                .filter(cards::Column::Id.is_in(card_ids))
                .all(&self.db)
                .await?
            {
                names.cards.insert(CardId::from_uuid(card.id), card.name);
            }
        }
        if !contact_ids.is_empty() {
            for contact in contacts::Entity::find()
                .filter(contacts::Column::Id.is_in(contact_ids))
                .all(&self.db)
                .await?
            {
                names
                    .contacts
                    .insert(ContactId::from_uuid(contact.id), contact.name);
            }
        }

        Ok(names)
    }
}

/// Maps an entry row to the aggregator's projection.
fn entry_line(model: ledger_entries::Model) -> EntryLine {
    EntryLine {
        id: EntryId::from_uuid(model.id),
        seq_no: model.seq_no,
        method: model.method.into(),
        kind: model.kind.into(),
        direction: model.direction.into(),
        amount: model.amount,
        effective_date: model.effective_date,
        recorded_at: model.recorded_at.with_timezone(&chrono::Utc),
        bank_account_id: model.bank_account_id.map(BankAccountId::from_uuid),
        card_id: model.card_id.map(CardId::from_uuid),
        contact_id: model.contact_id.map(ContactId::from_uuid),
        description: model.description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::{EntryDirection, EntryKind, EntryMethod};
    use rust_decimal_macros::dec;
    use tesoro_core::ledger::{Direction, Method, OperationKind};

    fn sample_model() -> ledger_entries::Model {
        ledger_entries::Model {
            id: Uuid::now_v7(),
            seq_no: 7,
            method: EntryMethod::Bank,
            kind: EntryKind::BankIn,
            direction: EntryDirection::Inflow,
            amount: dec!(125.50),
            currency: "EGP".to_string(),
            effective_date: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
            recorded_at: Utc::now().into(),
            bank_account_id: Some(Uuid::now_v7()),
            card_id: None,
            contact_id: None,
            check_id: None,
            category: None,
            description: Some("deposit".to_string()),
            metadata: serde_json::Value::Null,
            pos_gross: None,
            pos_commission: None,
            pos_net: None,
            pos_effective_rate: None,
            linked_entry_id: None,
            created_by: Uuid::now_v7(),
        }
    }

    #[test]
    fn test_entry_line_mapping() {
        let model = sample_model();
        let expected_account = model.bank_account_id;
        let line = entry_line(model);

        assert_eq!(line.seq_no, 7);
        assert_eq!(line.method, Method::Bank);
        assert_eq!(line.kind, OperationKind::BankIn);
        assert_eq!(line.direction, Direction::Inflow);
        assert_eq!(line.amount, dec!(125.50));
        assert_eq!(
            line.bank_account_id.map(BankAccountId::into_inner),
            expected_account
        );
        assert_eq!(line.signed_amount(), dec!(125.50));
    }
}
