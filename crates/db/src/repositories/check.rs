//! Check register repository: lifecycle operations over the checks
//! table and their linked ledger entries.
//!
//! Every transition appends one immutable move row inside the same
//! transaction as the status change. Settlement composes the entry
//! factory with the state machine, and re-asserts the prior status with
//! a conditional update so concurrent settles cannot double-book.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use tesoro_core::instrument::{self, machine, InstrumentError, MoveAction, NewCheck, Transition};
use tesoro_core::ledger::{
    ContactInfo, LedgerContext, LedgerError, LedgerService, NewAttachment, NewEntry, Operation,
    ReferenceInfo,
};
use tesoro_shared::notify::EntryNotifier;
use tesoro_shared::types::{Amount, BankAccountId, CheckId, ContactId, MoveId};

use crate::entities::sea_orm_active_enums::CheckStatus as DbCheckStatus;
use crate::entities::{attachments, bank_accounts, check_moves, checks, contacts, ledger_entries};

use super::entry::{insert_draft, spawn_entry_notification, Actor, NotificationKind};

/// Error types for check operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// A state machine precondition failed.
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// A factory validation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of a lifecycle operation that created or moved a check.
#[derive(Debug, Clone)]
pub struct CheckWithMove {
    /// The check row after the operation.
    pub check: checks::Model,
    /// The move appended to the audit trail.
    pub r#move: check_moves::Model,
}

/// Result of settling a check.
#[derive(Debug, Clone)]
pub struct SettledCheck {
    /// The check row, now paid.
    pub check: checks::Model,
    /// The settlement ledger entry.
    pub entry: ledger_entries::Model,
    /// The payment move linked to the entry.
    pub r#move: check_moves::Model,
}

/// A check with its full audit trail and attachments.
#[derive(Debug, Clone)]
pub struct CheckDetail {
    /// The check row.
    pub check: checks::Model,
    /// Moves in creation order.
    pub moves: Vec<check_moves::Model>,
    /// Attachment rows owned by the check.
    pub attachments: Vec<attachments::Model>,
}

/// Input for settling a check against a bank account.
#[derive(Debug, Clone)]
pub struct SettleCheck {
    /// The check to settle.
    pub check_id: CheckId,
    /// The account the settlement moves through.
    pub bank_account_id: BankAccountId,
    /// Settled amount.
    pub amount: Amount,
    /// Business date; defaults to today in the organization's time zone.
    pub effective_date: Option<NaiveDate>,
    /// Description for the ledger entry.
    pub description: Option<String>,
    /// Free-text note for the move.
    pub note: Option<String>,
}

/// Filter options for listing checks.
#[derive(Debug, Clone, Default)]
pub struct CheckFilter {
    /// Filter by lifecycle status.
    pub status: Option<instrument::CheckStatus>,
    /// Filter by counterparty.
    pub contact_id: Option<ContactId>,
}

/// Check register repository.
#[derive(Clone)]
pub struct CheckRepository {
    db: DatabaseConnection,
    ctx: LedgerContext,
    notifier: Option<Arc<dyn EntryNotifier>>,
}

impl CheckRepository {
    /// Creates a new check repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, ctx: LedgerContext) -> Self {
        Self {
            db,
            ctx,
            notifier: None,
        }
    }

    /// Attaches the notifier fired after settlement commits.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn EntryNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// A received customer instrument enters the safe.
    ///
    /// # Errors
    ///
    /// `AttachmentRequired` without a scan of the instrument;
    /// `WrongCounterparty` unless the contact is customer-typed; no check
    /// row is persisted on failure.
    pub async fn receive(
        &self,
        actor: &Actor,
        input: NewCheck,
        attachment_files: Vec<NewAttachment>,
    ) -> Result<CheckWithMove, CheckError> {
        let contact_id = input.contact_id.ok_or_else(|| {
            LedgerError::ValidationFailed("a customer contact is required to receive a check".into())
        })?;
        let contact = self.load_contact(contact_id).await?;

        let transition = machine::receive(contact.kind, attachment_files.len())?;

        self.create_check(actor, input, attachment_files, transition, None)
            .await
    }

    /// The organization writes its own instrument to a payee.
    ///
    /// # Errors
    ///
    /// `AttachmentRequired` without at least one attachment.
    pub async fn issue(
        &self,
        actor: &Actor,
        input: NewCheck,
        attachment_files: Vec<NewAttachment>,
    ) -> Result<CheckWithMove, CheckError> {
        if let Some(contact_id) = input.contact_id {
            self.load_contact(contact_id).await?;
        }

        let transition = machine::issue(attachment_files.len())?;

        self.create_check(actor, input, attachment_files, transition, None)
            .await
    }

    /// A held instrument is handed to a supplier in lieu of cash.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the check is in the safe;
    /// `WrongCounterparty` unless the target contact is supplier-typed.
    pub async fn endorse(
        &self,
        actor: &Actor,
        check_id: CheckId,
        supplier_id: ContactId,
        note: Option<String>,
    ) -> Result<CheckWithMove, CheckError> {
        let check = self.load_check(check_id).await?;
        let supplier = self.load_contact(supplier_id).await?;

        let transition = machine::endorse(check.status.clone().into(), supplier.kind)?;
        let next_status: DbCheckStatus = transition.status.into();

        let txn = self.db.begin().await?;

        // Guarded transition: only an in-safe check can leave the safe.
        let updated = checks::Entity::update_many()
            .col_expr(checks::Column::Status, Expr::value(next_status))
            .col_expr(checks::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(checks::Column::Id.eq(check_id.into_inner()))
            .filter(checks::Column::Status.eq(DbCheckStatus::InSafe))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(InstrumentError::InvalidTransition {
                from: self.load_check(check_id).await?.status.into(),
                action: MoveAction::Out,
            }
            .into());
        }

        let note = match note {
            Some(extra) => format!("Endorsed to {}: {extra}", supplier.name),
            None => format!("Endorsed to {}", supplier.name),
        };
        let move_row = insert_move(
            &txn,
            check_id.into_inner(),
            transition.action,
            None,
            actor,
            Some(note),
        )
        .await?;

        txn.commit().await?;

        let check = self.load_check(check_id).await?;
        Ok(CheckWithMove {
            check,
            r#move: move_row,
        })
    }

    /// Settles a check against a bank account.
    ///
    /// Composes the factory's check-settlement operation with the
    /// `Paid` transition: the ledger entry, the status flip, and the
    /// payment move commit together or not at all. The flip is a
    /// conditional update, so of two concurrent settles exactly one
    /// commits; the loser fails with `AlreadyPaid` and creates nothing.
    ///
    /// # Errors
    ///
    /// `AlreadyPaid` for settled checks, `InvalidTransition` for
    /// endorsed ones, plus factory validation failures.
    pub async fn settle(&self, actor: &Actor, input: SettleCheck) -> Result<SettledCheck, CheckError> {
        let check = self.load_check(input.check_id).await?;
        let transition = machine::settle(check.status.clone().into())?;
        let next_status: DbCheckStatus = transition.status.into();

        let bank_account = bank_accounts::Entity::find_by_id(input.bank_account_id.into_inner())
            .one(&self.db)
            .await?;
        let contact = match check.contact_id {
            Some(contact_id) => contacts::Entity::find_by_id(contact_id).one(&self.db).await?,
            None => None,
        };

        let mut new_entry = NewEntry::new(
            actor.id,
            Operation::CheckSettlement {
                check_id: input.check_id,
                bank_account_id: input.bank_account_id,
                amount: input.amount,
            },
        );
        new_entry.effective_date = input.effective_date;
        new_entry.description = input.description.clone();
        new_entry.contact_id = check.contact_id.map(ContactId::from_uuid);

        let resolved = LedgerService::resolve(
            &new_entry,
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
            |id: tesoro_shared::types::CardId| {
                Err(LedgerError::NotFound {
                    entity: "card",
                    id: id.into_inner(),
                })
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
            |_: CheckId| {
                Ok(instrument::CheckInfo {
                    status: check.status.clone().into(),
                })
            },
        )?;

        let txn = self.db.begin().await?;
        let recorded_at = Utc::now();

        // The settlement race guard: assert the prior status in the
        // UPDATE itself. Two concurrent settles both pass the read
        // above; only one of them flips the row.
        let updated = checks::Entity::update_many()
            .col_expr(checks::Column::Status, Expr::value(next_status))
            .col_expr(checks::Column::UpdatedAt, Expr::value(recorded_at))
            .filter(checks::Column::Id.eq(input.check_id.into_inner()))
            .filter(checks::Column::Status.ne(DbCheckStatus::Paid))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(InstrumentError::AlreadyPaid.into());
        }

        let entry = insert_draft(&txn, &resolved.entry, recorded_at, None).await?;

        let move_row = insert_move(
            &txn,
            input.check_id.into_inner(),
            transition.action,
            Some(entry.id),
            actor,
            input.note.clone(),
        )
        .await?;

        txn.commit().await?;

        if resolved.entry.back_dated {
            spawn_entry_notification(
                self.notifier.as_ref(),
                actor,
                &entry,
                NotificationKind::BackDated,
            );
        }

        let check = self.load_check(input.check_id).await?;
        Ok(SettledCheck {
            check,
            entry,
            r#move: move_row,
        })
    }

    /// Gets one check with its audit trail and attachments.
    ///
    /// # Errors
    ///
    /// Returns `InstrumentError::NotFound` if the check does not exist.
    pub async fn get(&self, check_id: CheckId) -> Result<CheckDetail, CheckError> {
        let check = self.load_check(check_id).await?;

        let moves = check_moves::Entity::find()
            .filter(check_moves::Column::CheckId.eq(check_id.into_inner()))
            .order_by_asc(check_moves::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let attachment_rows = attachments::Entity::find()
            .filter(attachments::Column::CheckId.eq(check_id.into_inner()))
            .all(&self.db)
            .await?;

        Ok(CheckDetail {
            check,
            moves,
            attachments: attachment_rows,
        })
    }

    /// Lists checks with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: CheckFilter) -> Result<Vec<checks::Model>, CheckError> {
        let mut query = checks::Entity::find();

        if let Some(status) = filter.status {
            let status: DbCheckStatus = status.into();
            query = query.filter(checks::Column::Status.eq(status));
        }
        if let Some(contact_id) = filter.contact_id {
            query = query.filter(checks::Column::ContactId.eq(contact_id.into_inner()));
        }

        let rows = query
            .order_by_desc(checks::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// Inserts the check row, its first move, and its attachments in one
    /// transaction.
    async fn create_check(
        &self,
        actor: &Actor,
        input: NewCheck,
        attachment_files: Vec<NewAttachment>,
        transition: Transition,
        note: Option<String>,
    ) -> Result<CheckWithMove, CheckError> {
        let txn = self.db.begin().await?;
        let now = Utc::now();
        let check_id = CheckId::new();

        let status: DbCheckStatus = transition.status.into();
        let check = checks::ActiveModel {
            id: Set(check_id.into_inner()),
            serial_no: Set(input.serial_no),
            bank_name: Set(input.bank_name),
            amount: Set(input.amount.into_inner()),
            due_date: Set(input.due_date),
            status: Set(status),
            contact_id: Set(input.contact_id.map(ContactId::into_inner)),
            notes: Set(input.notes),
            issuer_label: Set(input.issuer_label),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;

        let move_row = insert_move(
            &txn,
            check.id,
            transition.action,
            None,
            actor,
            note,
        )
        .await?;

        for attachment in &attachment_files {
            attachments::ActiveModel {
                id: Set(Uuid::now_v7()),
                entry_id: Set(None),
                check_id: Set(Some(check.id)),
                file_path: Set(attachment.file_path.clone()),
                file_name: Set(attachment.file_name.clone()),
                mime_type: Set(attachment.mime_type.clone()),
                byte_size: Set(attachment.byte_size),
                uploaded_by: Set(actor.id.into_inner()),
                created_at: Set(now.into()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        Ok(CheckWithMove {
            check,
            r#move: move_row,
        })
    }

    async fn load_check(&self, check_id: CheckId) -> Result<checks::Model, CheckError> {
        checks::Entity::find_by_id(check_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| InstrumentError::NotFound(check_id.into_inner()).into())
    }

    async fn load_contact(&self, contact_id: ContactId) -> Result<LoadedContact, CheckError> {
        let contact = contacts::Entity::find_by_id(contact_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(LedgerError::NotFound {
                entity: "contact",
                id: contact_id.into_inner(),
            })?;

        if !contact.is_active {
            return Err(LedgerError::InactiveReference {
                entity: "contact",
                id: contact_id.into_inner(),
            }
            .into());
        }

        Ok(LoadedContact {
            name: contact.name,
            kind: contact.kind.into(),
        })
    }
}

struct LoadedContact {
    name: String,
    kind: tesoro_core::ledger::ContactKind,
}

/// Appends one immutable move to a check's audit trail.
async fn insert_move(
    txn: &DatabaseTransaction,
    check_id: Uuid,
    action: MoveAction,
    entry_id: Option<Uuid>,
    actor: &Actor,
    note: Option<String>,
) -> Result<check_moves::Model, DbErr> {
    let action: crate::entities::sea_orm_active_enums::MoveAction = action.into();
    check_moves::ActiveModel {
        id: Set(MoveId::new().into_inner()),
        check_id: Set(check_id),
        action: Set(action),
        entry_id: Set(entry_id),
        actor_id: Set(actor.id.into_inner()),
        note: Set(note),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await
}
