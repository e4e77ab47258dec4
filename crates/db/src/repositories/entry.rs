//! Entry repository: the transactional write path of the ledger entry
//! factory, plus read access to recorded entries.
//!
//! `record` executes everything the factory resolved - the entry, its
//! optional commission sibling, tag links, and attachment rows - inside
//! one database transaction. Notifications fire only after the commit
//! and never roll it back.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tesoro_core::ledger::{
    ContactInfo, EntryDraft, LedgerContext, LedgerError, LedgerService, Method, NewEntry,
    Operation, OperationKind, ReferenceInfo, ResolvedOperation,
};
use tesoro_core::instrument::CheckInfo;
use tesoro_shared::notify::{EntryEvent, EntryNotifier};
use tesoro_shared::types::{
    BankAccountId, CardId, CheckId, ContactId, EntryId, PageRequest, PageResponse, UserId,
};

use crate::entities::{attachments, bank_accounts, cards, checks, contacts, entry_tags, ledger_entries, tags};

/// Error types for entry operations.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// A factory validation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Entry not found.
    #[error("Entry not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// The authenticated actor, as handed over by the request layer.
#[derive(Debug, Clone)]
pub struct Actor {
    /// User id.
    pub id: UserId,
    /// User email.
    pub email: String,
    /// Display name.
    pub display_name: String,
}

/// Result of recording one operation.
#[derive(Debug, Clone)]
pub struct CreatedEntry {
    /// The primary entry row.
    pub entry: ledger_entries::Model,
    /// The linked commission row, when policy books it separately.
    pub commission: Option<ledger_entries::Model>,
    /// Tags attached to the entry.
    pub tags: Vec<Uuid>,
    /// Attachment rows created with the entry.
    pub attachments: Vec<attachments::Model>,
}

/// An entry with its tag and attachment links resolved.
#[derive(Debug, Clone)]
pub struct EntryDetail {
    /// The entry row.
    pub entry: ledger_entries::Model,
    /// Tags attached to it.
    pub tags: Vec<tags::Model>,
    /// Attachment rows it owns.
    pub attachments: Vec<attachments::Model>,
}

/// Filter options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by payment method.
    pub method: Option<Method>,
    /// Filter by operation kind.
    pub kind: Option<OperationKind>,
    /// Filter by effective date range start.
    pub date_from: Option<chrono::NaiveDate>,
    /// Filter by effective date range end.
    pub date_to: Option<chrono::NaiveDate>,
    /// Filter by linked bank account.
    pub bank_account_id: Option<BankAccountId>,
}

/// Entry repository.
#[derive(Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
    ctx: LedgerContext,
    notifier: Option<Arc<dyn EntryNotifier>>,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, ctx: LedgerContext) -> Self {
        Self {
            db,
            ctx,
            notifier: None,
        }
    }

    /// Attaches the notifier fired after commits.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn EntryNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Records one ledger operation.
    ///
    /// Resolves the operation through the factory (all validation before
    /// any write), then inserts the entry plus every side record in one
    /// transaction. A back-dated effective date schedules a notification
    /// after the commit.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::Ledger` for validation failures and
    /// `EntryError::Database` for persistence failures; either way no
    /// partial state remains.
    pub async fn record(&self, actor: &Actor, input: NewEntry) -> Result<CreatedEntry, EntryError> {
        let resolved = self.resolve(&input).await?;

        let tag_ids = self.validate_tags(&input).await?;

        let txn = self.db.begin().await?;
        let recorded_at = Utc::now();

        let entry = insert_draft(&txn, &resolved.entry, recorded_at, None).await?;

        let commission = match &resolved.commission {
            Some(draft) => Some(insert_draft(&txn, draft, recorded_at, Some(entry.id)).await?),
            None => None,
        };

        for tag_id in &tag_ids {
            entry_tags::ActiveModel {
                entry_id: Set(entry.id),
                tag_id: Set(*tag_id),
            }
            .insert(&txn)
            .await?;
        }

        let mut attachment_rows = Vec::with_capacity(input.attachments.len());
        for attachment in &input.attachments {
            let row = attachments::ActiveModel {
                id: Set(Uuid::now_v7()),
                entry_id: Set(Some(entry.id)),
                check_id: Set(None),
                file_path: Set(attachment.file_path.clone()),
                file_name: Set(attachment.file_name.clone()),
                mime_type: Set(attachment.mime_type.clone()),
                byte_size: Set(attachment.byte_size),
                uploaded_by: Set(actor.id.into_inner()),
                created_at: Set(recorded_at.into()),
            }
            .insert(&txn)
            .await?;
            attachment_rows.push(row);
        }

        txn.commit().await?;

        if resolved.entry.back_dated {
            self.spawn_notification(actor, &entry, NotificationKind::BackDated);
        }

        Ok(CreatedEntry {
            entry,
            commission,
            tags: tag_ids,
            attachments: attachment_rows,
        })
    }

    /// Hard-deletes one entry by id.
    ///
    /// The row and its tag/attachment links are gone for good - there is
    /// no soft delete and no undo. A notification is scheduled after the
    /// delete commits.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::NotFound` if the entry does not exist.
    pub async fn delete(&self, actor: &Actor, id: EntryId) -> Result<(), EntryError> {
        let entry = ledger_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| EntryError::NotFound(id.into_inner()))?;

        ledger_entries::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;

        self.spawn_notification(actor, &entry, NotificationKind::Deleted);
        Ok(())
    }

    /// Gets one entry with its tags and attachments.
    ///
    /// # Errors
    ///
    /// Returns `EntryError::NotFound` if the entry does not exist.
    pub async fn get(&self, id: EntryId) -> Result<EntryDetail, EntryError> {
        let entry = ledger_entries::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| EntryError::NotFound(id.into_inner()))?;

        let tag_links = entry_tags::Entity::find()
            .filter(entry_tags::Column::EntryId.eq(entry.id))
            .all(&self.db)
            .await?;
        let tag_ids: Vec<Uuid> = tag_links.into_iter().map(|l| l.tag_id).collect();
        let tag_rows = if tag_ids.is_empty() {
            Vec::new()
        } else {
            tags::Entity::find()
                .filter(tags::Column::Id.is_in(tag_ids))
                .all(&self.db)
                .await?
        };

        let attachment_rows = attachments::Entity::find()
            .filter(attachments::Column::EntryId.eq(entry.id))
            .all(&self.db)
            .await?;

        Ok(EntryDetail {
            entry,
            tags: tag_rows,
            attachments: attachment_rows,
        })
    }

    /// Lists entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: EntryFilter,
        page: PageRequest,
    ) -> Result<PageResponse<ledger_entries::Model>, EntryError> {
        let mut query = ledger_entries::Entity::find();

        if let Some(method) = filter.method {
            let method: crate::entities::sea_orm_active_enums::EntryMethod = method.into();
            query = query.filter(ledger_entries::Column::Method.eq(method));
        }
        if let Some(kind) = filter.kind {
            let kind: crate::entities::sea_orm_active_enums::EntryKind = kind.into();
            query = query.filter(ledger_entries::Column::Kind.eq(kind));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(ledger_entries::Column::EffectiveDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(ledger_entries::Column::EffectiveDate.lte(date_to));
        }
        if let Some(account_id) = filter.bank_account_id {
            query =
                query.filter(ledger_entries::Column::BankAccountId.eq(account_id.into_inner()));
        }

        let total = query.clone().count(&self.db).await?;

        let rows = query
            .order_by_desc(ledger_entries::Column::EffectiveDate)
            .order_by_desc(ledger_entries::Column::RecordedAt)
            .order_by_desc(ledger_entries::Column::SeqNo)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }

    /// Prefetches the referenced entities and runs the factory.
    async fn resolve(&self, input: &NewEntry) -> Result<ResolvedOperation, EntryError> {
        let bank_account = match referenced_bank_account(&input.operation) {
            Some(id) => bank_accounts::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?,
            None => None,
        };
        let card = match referenced_card(&input.operation) {
            Some(id) => cards::Entity::find_by_id(id.into_inner()).one(&self.db).await?,
            None => None,
        };
        let check = match referenced_check(&input.operation) {
            Some(id) => checks::Entity::find_by_id(id.into_inner()).one(&self.db).await?,
            None => None,
        };
        let contact = match input.contact_id {
            Some(id) => contacts::Entity::find_by_id(id.into_inner())
                .one(&self.db)
                .await?,
            None => None,
        };

        let resolved = LedgerService::resolve(
            input,
            &self.ctx,
            self.ctx.today(),
            |id: BankAccountId| match &bank_account {
                Some(account) if account.id == id.into_inner() => Ok(ReferenceInfo {
                    is_active: account.is_active,
                }),
                _ => Err(LedgerError::NotFound {
                    entity: "bank account",
                    id: id.into_inner(),
                }),
            },
            |id: CardId| match &card {
                Some(card) if card.id == id.into_inner() => Ok(ReferenceInfo {
                    is_active: card.is_active,
                }),
                _ => Err(LedgerError::NotFound {
                    entity: "card",
                    id: id.into_inner(),
                }),
            },
            |id: ContactId| match &contact {
                Some(contact) if contact.id == id.into_inner() => Ok(ContactInfo {
                    kind: contact.kind.clone().into(),
                    is_active: contact.is_active,
                }),
                _ => Err(LedgerError::NotFound {
                    entity: "contact",
                    id: id.into_inner(),
                }),
            },
            |id: CheckId| match &check {
                Some(check) if check.id == id.into_inner() => Ok(CheckInfo {
                    status: check.status.clone().into(),
                }),
                _ => Err(LedgerError::NotFound {
                    entity: "check",
                    id: id.into_inner(),
                }),
            },
        )?;

        Ok(resolved)
    }

    /// Validates that every requested tag exists.
    async fn validate_tags(&self, input: &NewEntry) -> Result<Vec<Uuid>, EntryError> {
        let tag_ids: Vec<Uuid> = input.tags.iter().map(|t| t.into_inner()).collect();
        if tag_ids.is_empty() {
            return Ok(tag_ids);
        }

        let found: HashSet<Uuid> = tags::Entity::find()
            .filter(tags::Column::Id.is_in(tag_ids.clone()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();

        if let Some(missing) = tag_ids.iter().find(|id| !found.contains(id)) {
            return Err(LedgerError::NotFound {
                entity: "tag",
                id: *missing,
            }
            .into());
        }

        Ok(tag_ids)
    }

    fn spawn_notification(
        &self,
        actor: &Actor,
        entry: &ledger_entries::Model,
        kind: NotificationKind,
    ) {
        spawn_entry_notification(self.notifier.as_ref(), actor, entry, kind);
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum NotificationKind {
    BackDated,
    Deleted,
}

/// Fire-and-forget notification delivery, decoupled from the commit.
pub(crate) fn spawn_entry_notification(
    notifier: Option<&Arc<dyn EntryNotifier>>,
    actor: &Actor,
    entry: &ledger_entries::Model,
    kind: NotificationKind,
) {
    let Some(notifier) = notifier else {
        return;
    };

    let notifier = Arc::clone(notifier);
    let event = EntryEvent {
        seq_no: entry.seq_no,
        amount: entry.amount,
        description: entry.description.clone(),
        effective_date: entry.effective_date,
        recorded_at: entry.recorded_at.with_timezone(&Utc),
        actor_name: actor.display_name.clone(),
        actor_email: actor.email.clone(),
    };

    tokio::spawn(async move {
        let result = match kind {
            NotificationKind::BackDated => notifier.entry_back_dated(&event).await,
            NotificationKind::Deleted => notifier.entry_deleted(&event).await,
        };
        if let Err(err) = result {
            tracing::warn!(
                error = %err,
                seq_no = event.seq_no,
                "failed to deliver entry notification"
            );
        }
    });
}

/// Inserts one resolved draft as a ledger entry row.
///
/// `seq_no` stays unset so the database sequence assigns it; `recorded_at`
/// is the transaction's single creation timestamp.
pub(crate) async fn insert_draft(
    txn: &DatabaseTransaction,
    draft: &EntryDraft,
    recorded_at: DateTime<Utc>,
    linked_entry_id: Option<Uuid>,
) -> Result<ledger_entries::Model, DbErr> {
    let model = ledger_entries::ActiveModel {
        id: Set(EntryId::new().into_inner()),
        seq_no: NotSet,
        method: Set(draft.method.into()),
        kind: Set(draft.kind.into()),
        direction: Set(draft.direction.into()),
        amount: Set(draft.amount),
        currency: Set(draft.currency.to_string()),
        effective_date: Set(draft.effective_date),
        recorded_at: Set(recorded_at.into()),
        bank_account_id: Set(draft.bank_account_id.map(BankAccountId::into_inner)),
        card_id: Set(draft.card_id.map(CardId::into_inner)),
        contact_id: Set(draft.contact_id.map(ContactId::into_inner)),
        check_id: Set(draft.check_id.map(CheckId::into_inner)),
        category: Set(draft.category.map(Into::into)),
        description: Set(draft.description.clone()),
        metadata: Set(draft.metadata.clone()),
        pos_gross: Set(draft.pos.map(|p| p.gross)),
        pos_commission: Set(draft.pos.map(|p| p.commission)),
        pos_net: Set(draft.pos.map(|p| p.net)),
        pos_effective_rate: Set(draft.pos.map(|p| p.effective_rate)),
        linked_entry_id: Set(linked_entry_id),
        created_by: Set(draft.created_by.into_inner()),
    };

    model.insert(txn).await
}

fn referenced_bank_account(operation: &Operation) -> Option<BankAccountId> {
    match operation {
        Operation::BankIn {
            bank_account_id, ..
        }
        | Operation::BankOut {
            bank_account_id, ..
        }
        | Operation::PosCollection {
            bank_account_id, ..
        }
        | Operation::CheckSettlement {
            bank_account_id, ..
        } => Some(*bank_account_id),
        _ => None,
    }
}

fn referenced_card(operation: &Operation) -> Option<CardId> {
    match operation {
        Operation::CardExpense { card_id, .. } | Operation::CardPayment { card_id, .. } => {
            Some(*card_id)
        }
        _ => None,
    }
}

fn referenced_check(operation: &Operation) -> Option<CheckId> {
    match operation {
        Operation::CheckSettlement { check_id, .. } => Some(*check_id),
        _ => None,
    }
}
