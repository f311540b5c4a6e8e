//! # pg-temporal-migrate
//!
//! Reversible PostgreSQL schema migrations for temporal (history-tracked)
//! tables.
//!
//! A tracked table keeps only current rows; every row carries a `sys_period`
//! `tstzrange` naming the half-open interval over which it is the truth.
//! Superseded versions move into an append-only `{table}_history` companion,
//! maintained by a shared `versioning()` trigger procedure. This library
//! provides the schema machinery around that pattern:
//!
//! - **Versioning procedure** installation, one per database
//! - **History provisioning** per tracked table: history table, period
//!   indexes, trigger binding
//! - **Whole-unit renames** that carry table, row type, history table,
//!   indexes, and trigger binding together
//! - **Domain types** for identifier-format columns
//!
//! Every migration exposes its statements as an inspectable plan, runs
//! through a [`SchemaExecutor`], and has a `down` that restores the exact
//! object set its `up` created.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pg_temporal_migrate::{
//!     apply_up, HistoryTableConfig, HistoryTableMigration, VersioningFunctionMigration,
//! };
//!
//! async fn provision(client: &mut tokio_postgres::Client) -> pg_temporal_migrate::Result<()> {
//!     apply_up(client, &VersioningFunctionMigration::new()).await?;
//!
//!     let accounts = HistoryTableMigration::new(HistoryTableConfig {
//!         table: "accounts".to_string(),
//!         row_type: "account".to_string(),
//!         schema: None,
//!     })?;
//!     apply_up(client, &accounts).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod executor;
pub mod ident;
pub mod migration;
pub mod migrations;
pub mod naming;
pub mod testkit;

// Re-exports for convenient access
pub use error::{DriverError, MigrateError, Result, StepFailure};
pub use executor::{apply_down, apply_up, SchemaExecutor};
pub use migration::{Direction, Migration, Step};
pub use migrations::{
    DomainTypeConfig, DomainTypeMigration, HistoryTableConfig, HistoryTableMigration,
    RenameTableConfig, RenameTableMigration, VersioningFunctionMigration,
};
