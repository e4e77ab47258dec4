//! Reference-entity repository: bank accounts, cards, and contacts.
//!
//! These are the entities every factory validation path resolves
//! against. They are deactivated, never deleted, so historical entries
//! keep their references.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use tesoro_core::ledger::ContactKind;
use tesoro_shared::types::{BankAccountId, CardId, ContactId};

use crate::entities::{bank_accounts, cards, contacts};

/// Error types for reference-entity operations.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// Entity not found.
    #[error("Not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a bank account or card.
#[derive(Debug, Clone)]
pub struct CreateMoneySourceInput {
    /// Display name.
    pub name: String,
    /// Opening balance, fixed at creation. Zero is a legitimate opening
    /// figure, so this is a plain decimal rather than an entry amount.
    pub initial_balance: Decimal,
}

/// Input for creating a contact.
#[derive(Debug, Clone)]
pub struct CreateContactInput {
    /// Display name.
    pub name: String,
    /// Counterparty classification.
    pub kind: ContactKind,
}

/// Reference-entity repository.
#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    db: DatabaseConnection,
}

impl ReferenceRepository {
    /// Creates a new reference repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a bank account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_bank_account(
        &self,
        input: CreateMoneySourceInput,
    ) -> Result<bank_accounts::Model, ReferenceError> {
        let now = Utc::now();
        let account = bank_accounts::ActiveModel {
            id: Set(BankAccountId::new().into_inner()),
            name: Set(input.name),
            initial_balance: Set(input.initial_balance),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;
        Ok(account)
    }

    /// Creates a card.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_card(
        &self,
        input: CreateMoneySourceInput,
    ) -> Result<cards::Model, ReferenceError> {
        let now = Utc::now();
        let card = cards::ActiveModel {
            id: Set(CardId::new().into_inner()),
            name: Set(input.name),
            initial_balance: Set(input.initial_balance),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;
        Ok(card)
    }

    /// Creates a contact.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_contact(
        &self,
        input: CreateContactInput,
    ) -> Result<contacts::Model, ReferenceError> {
        let now = Utc::now();
        let kind: crate::entities::sea_orm_active_enums::ContactKind = input.kind.into();
        let contact = contacts::ActiveModel {
            id: Set(ContactId::new().into_inner()),
            name: Set(input.name),
            kind: Set(kind),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await?;
        Ok(contact)
    }

    /// Enables or disables a bank account.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::NotFound` for an unknown account.
    pub async fn set_bank_account_active(
        &self,
        id: BankAccountId,
        is_active: bool,
    ) -> Result<bank_accounts::Model, ReferenceError> {
        let account = bank_accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| ReferenceError::NotFound(id.into_inner()))?;

        let mut active: bank_accounts::ActiveModel = account.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Enables or disables a card.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::NotFound` for an unknown card.
    pub async fn set_card_active(
        &self,
        id: CardId,
        is_active: bool,
    ) -> Result<cards::Model, ReferenceError> {
        let card = cards::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| ReferenceError::NotFound(id.into_inner()))?;

        let mut active: cards::ActiveModel = card.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Enables or disables a contact.
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::NotFound` for an unknown contact.
    pub async fn set_contact_active(
        &self,
        id: ContactId,
        is_active: bool,
    ) -> Result<contacts::Model, ReferenceError> {
        let contact = contacts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| ReferenceError::NotFound(id.into_inner()))?;

        let mut active: contacts::ActiveModel = contact.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Lists bank accounts, optionally only active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_bank_accounts(
        &self,
        only_active: bool,
    ) -> Result<Vec<bank_accounts::Model>, ReferenceError> {
        let mut query = bank_accounts::Entity::find();
        if only_active {
            query = query.filter(bank_accounts::Column::IsActive.eq(true));
        }
        Ok(query
            .order_by_asc(bank_accounts::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Lists cards, optionally only active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_cards(&self, only_active: bool) -> Result<Vec<cards::Model>, ReferenceError> {
        let mut query = cards::Entity::find();
        if only_active {
            query = query.filter(cards::Column::IsActive.eq(true));
        }
        Ok(query.order_by_asc(cards::Column::Name).all(&self.db).await?)
    }

    /// Lists contacts, optionally filtered by kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_contacts(
        &self,
        kind: Option<ContactKind>,
        only_active: bool,
    ) -> Result<Vec<contacts::Model>, ReferenceError> {
        let mut query = contacts::Entity::find();
        if let Some(kind) = kind {
            let kind: crate::entities::sea_orm_active_enums::ContactKind = kind.into();
            query = query.filter(contacts::Column::Kind.eq(kind));
        }
        if only_active {
            query = query.filter(contacts::Column::IsActive.eq(true));
        }
        Ok(query
            .order_by_asc(contacts::Column::Name)
            .all(&self.db)
            .await?)
    }
}
