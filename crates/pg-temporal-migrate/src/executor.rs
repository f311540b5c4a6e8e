//! Executing migration statements against PostgreSQL.

use async_trait::async_trait;
use tokio_postgres::{Client, Transaction};

use crate::error::{DriverError, Result};
use crate::migration::Migration;

/// Executes raw schema-change statements.
///
/// Migrations issue their DDL through this seam so the same plan can run
/// inside a live transaction, against a bare client, or into a recording
/// fake in tests. A statement string may contain several `;`-separated
/// statements; implementations must execute them in order.
#[async_trait]
pub trait SchemaExecutor: Send {
    /// Execute one step's SQL, returning the raw driver error on failure.
    async fn execute(&mut self, sql: &str) -> std::result::Result<(), DriverError>;
}

#[async_trait]
impl<'a> SchemaExecutor for Transaction<'a> {
    async fn execute(&mut self, sql: &str) -> std::result::Result<(), DriverError> {
        Transaction::batch_execute(self, sql).await.map_err(Into::into)
    }
}

#[async_trait]
impl SchemaExecutor for Client {
    async fn execute(&mut self, sql: &str) -> std::result::Result<(), DriverError> {
        Client::batch_execute(self, sql).await.map_err(Into::into)
    }
}

/// Apply a migration's `up` inside a single transaction.
///
/// Either every step commits or none do; a failed step leaves the schema
/// untouched (the transaction rolls back when dropped). Sequencing of
/// multiple migrations, and recording which have run, stays with the caller.
pub async fn apply_up(client: &mut Client, migration: &dyn Migration) -> Result<()> {
    let mut tx = client.transaction().await?;
    migration.up(&mut tx).await?;
    tx.commit().await?;
    Ok(())
}

/// Revert a migration inside a single transaction.
///
/// Same atomicity as [`apply_up`]: the schema either returns to its
/// pre-`up` object set or stays exactly as it was.
pub async fn apply_down(client: &mut Client, migration: &dyn Migration) -> Result<()> {
    let mut tx = client.transaction().await?;
    migration.down(&mut tx).await?;
    tx.commit().await?;
    Ok(())
}
