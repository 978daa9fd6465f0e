//! Database migrations for the learning store.

use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;

mod m20260101_000001_create_learning_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260101_000001_create_learning_tables::Migration)]
    }
}

/// Apply every pending migration.
///
/// # Errors
/// Returns the backend error of the first migration that fails.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(conn, None).await?;
    tracing::info!("learning store migrations applied");
    Ok(())
}
