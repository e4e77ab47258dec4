//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Every factory operation that writes more than one row runs inside a
//! single database transaction; partial writes are never observable.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    CheckRepository, EntryRepository, ReferenceRepository, ReportRepository, TagRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
