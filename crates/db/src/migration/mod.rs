//! Database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260215_000001_initial;

/// The migration runner for all Tesoro migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260215_000001_initial::Migration)]
    }
}
