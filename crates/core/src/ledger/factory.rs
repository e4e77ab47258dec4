//! The ledger entry factory.
//!
//! One operation per kind, all sharing the same contract: validate every
//! referenced entity before any write, compute the derived fields, and
//! produce the canonical entry draft (plus the linked commission draft
//! when policy books POS commissions separately).
//!
//! This service is pure: reference lookups are injected as closures, so
//! the persistence layer decides where the data comes from and tests need
//! no database. Status preconditions on checks (`AlreadyPaid`) belong to
//! the instrument state machine, which the settlement flow composes with
//! this factory inside one transaction.

use chrono::NaiveDate;

use tesoro_shared::types::{BankAccountId, CardId, CheckId, ContactId};

use super::error::LedgerError;
use super::types::{
    ContactInfo, EntryDraft, LedgerContext, NewEntry, Operation, OperationKind, OutflowCategory,
    ReferenceInfo, ResolvedOperation,
};
use crate::instrument::CheckInfo;

/// Ledger entry factory.
pub struct LedgerService;

impl LedgerService {
    /// Validates and resolves one operation into its canonical entry.
    ///
    /// Steps, in order, all before any write:
    /// 1. Resolve the effective date (default: today in the
    ///    organization's time zone) and detect back-dating.
    /// 2. Validate the optional counterparty (exists, active).
    /// 3. Validate the kind-specific references (exist, active).
    /// 4. Derive POS figures when the operation is a collection.
    /// 5. Produce the draft with method/kind/direction from the
    ///    canonical mapping, plus the commission sibling if policy
    ///    requires one.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any validation fails; nothing is
    /// partially resolved.
    pub fn resolve<B, C, P, K>(
        input: &NewEntry,
        ctx: &LedgerContext,
        today: NaiveDate,
        bank_account_lookup: B,
        card_lookup: C,
        contact_lookup: P,
        check_lookup: K,
    ) -> Result<ResolvedOperation, LedgerError>
    where
        B: Fn(BankAccountId) -> Result<ReferenceInfo, LedgerError>,
        C: Fn(CardId) -> Result<ReferenceInfo, LedgerError>,
        P: Fn(ContactId) -> Result<ContactInfo, LedgerError>,
        K: Fn(CheckId) -> Result<CheckInfo, LedgerError>,
    {
        let effective_date = input.effective_date.unwrap_or(today);
        let back_dated = effective_date < today;

        if let Some(contact_id) = input.contact_id {
            let contact = contact_lookup(contact_id)?;
            if !contact.is_active {
                return Err(LedgerError::InactiveReference {
                    entity: "contact",
                    id: contact_id.into_inner(),
                });
            }
        }

        let kind = input.operation.kind();
        let settlement = ctx.policy.settlement_direction;
        let base = |amount: rust_decimal::Decimal| EntryDraft {
            method: kind.method(),
            kind,
            direction: kind.direction(settlement),
            amount,
            currency: ctx.currency,
            effective_date,
            back_dated,
            bank_account_id: None,
            card_id: None,
            contact_id: input.contact_id,
            check_id: None,
            category: None,
            description: input.description.clone(),
            metadata: input.metadata.clone(),
            pos: None,
            created_by: input.actor,
        };

        let resolved = match &input.operation {
            Operation::CashIn { amount } => ResolvedOperation {
                entry: base(amount.into_inner()),
                commission: None,
            },

            Operation::CashOut { amount, category } => {
                let mut entry = base(amount.into_inner());
                entry.category = *category;
                ResolvedOperation {
                    entry,
                    commission: None,
                }
            }

            Operation::BankIn {
                bank_account_id,
                amount,
            } => {
                Self::validate_bank_account(*bank_account_id, &bank_account_lookup)?;
                let mut entry = base(amount.into_inner());
                entry.bank_account_id = Some(*bank_account_id);
                ResolvedOperation {
                    entry,
                    commission: None,
                }
            }

            Operation::BankOut {
                bank_account_id,
                amount,
                category,
            } => {
                Self::validate_bank_account(*bank_account_id, &bank_account_lookup)?;
                let mut entry = base(amount.into_inner());
                entry.bank_account_id = Some(*bank_account_id);
                entry.category = *category;
                ResolvedOperation {
                    entry,
                    commission: None,
                }
            }

            Operation::PosCollection {
                bank_account_id,
                pos,
            } => {
                Self::validate_bank_account(*bank_account_id, &bank_account_lookup)?;
                let breakdown = pos.breakdown()?;

                // Separate-commission deployments book the collection at
                // gross and carry the commission as a linked outflow;
                // otherwise a single entry at net. Either way the bank
                // fold lands on the same figure.
                let (amount, commission) = if ctx.policy.book_pos_commission {
                    let mut commission_entry = EntryDraft {
                        kind: OperationKind::PosCommission,
                        method: OperationKind::PosCommission.method(),
                        direction: OperationKind::PosCommission.direction(settlement),
                        category: Some(OutflowCategory::Fees),
                        pos: None,
                        ..base(breakdown.commission)
                    };
                    commission_entry.bank_account_id = Some(*bank_account_id);
                    (breakdown.gross, Some(commission_entry))
                } else {
                    (breakdown.net, None)
                };

                let mut entry = base(amount);
                entry.bank_account_id = Some(*bank_account_id);
                entry.pos = Some(breakdown);
                ResolvedOperation {
                    entry,
                    commission,
                }
            }

            Operation::CardExpense {
                card_id,
                amount,
                category,
            } => {
                Self::validate_card(*card_id, &card_lookup)?;
                let mut entry = base(amount.into_inner());
                entry.card_id = Some(*card_id);
                entry.category = Some(*category);
                ResolvedOperation {
                    entry,
                    commission: None,
                }
            }

            Operation::CardPayment { card_id, amount } => {
                Self::validate_card(*card_id, &card_lookup)?;
                let mut entry = base(amount.into_inner());
                entry.card_id = Some(*card_id);
                ResolvedOperation {
                    entry,
                    commission: None,
                }
            }

            Operation::CheckSettlement {
                check_id,
                bank_account_id,
                amount,
            } => {
                // Existence only; the not-already-paid precondition is the
                // state machine's and is re-asserted by the conditional
                // update at commit time.
                check_lookup(*check_id)?;
                Self::validate_bank_account(*bank_account_id, &bank_account_lookup)?;
                let mut entry = base(amount.into_inner());
                entry.bank_account_id = Some(*bank_account_id);
                entry.check_id = Some(*check_id);
                ResolvedOperation {
                    entry,
                    commission: None,
                }
            }
        };

        Ok(resolved)
    }

    fn validate_bank_account<B>(id: BankAccountId, lookup: &B) -> Result<(), LedgerError>
    where
        B: Fn(BankAccountId) -> Result<ReferenceInfo, LedgerError>,
    {
        let info = lookup(id)?;
        if !info.is_active {
            return Err(LedgerError::InactiveReference {
                entity: "bank account",
                id: id.into_inner(),
            });
        }
        Ok(())
    }

    fn validate_card<C>(id: CardId, lookup: &C) -> Result<(), LedgerError>
    where
        C: Fn(CardId) -> Result<ReferenceInfo, LedgerError>,
    {
        let info = lookup(id)?;
        if !info.is_active {
            return Err(LedgerError::InactiveReference {
                entity: "card",
                id: id.into_inner(),
            });
        }
        Ok(())
    }
}
