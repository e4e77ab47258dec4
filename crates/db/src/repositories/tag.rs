//! Tag repository.
//!
//! Tags are shared references: many entries may point at the same tag
//! row, and the tag name is unique across the organization.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use tesoro_shared::types::TagId;

use crate::entities::tags;

/// Error types for tag operations.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// A tag with this name already exists.
    #[error("Tag '{0}' already exists")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a tag.
#[derive(Debug, Clone)]
pub struct CreateTagInput {
    /// Unique label.
    pub name: String,
    /// Optional display color.
    pub color: Option<String>,
}

/// Tag repository.
#[derive(Debug, Clone)]
pub struct TagRepository {
    db: DatabaseConnection,
}

impl TagRepository {
    /// Creates a new tag repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a tag with a unique name.
    ///
    /// # Errors
    ///
    /// Returns `TagError::DuplicateName` when the name is taken.
    pub async fn create(&self, input: CreateTagInput) -> Result<tags::Model, TagError> {
        let existing = tags::Entity::find()
            .filter(tags::Column::Name.eq(&input.name))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(TagError::DuplicateName(input.name));
        }

        let tag = tags::ActiveModel {
            id: Set(TagId::new().into_inner()),
            name: Set(input.name),
            color: Set(input.color),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;
        Ok(tag)
    }

    /// Lists all tags by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<tags::Model>, TagError> {
        Ok(tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await?)
    }
}
