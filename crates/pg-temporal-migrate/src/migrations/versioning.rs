//! Installs the shared `versioning()` trigger procedure.

use async_trait::async_trait;

use crate::error::Result;
use crate::executor::SchemaExecutor;
use crate::ident::quote_ident;
use crate::migration::{run_steps, Direction, Migration, Step};
use crate::naming::VERSIONING_FUNCTION;

/// Complete PL/pgSQL source of the `versioning()` trigger procedure.
///
/// Kept as a standalone asset so it can be diffed against a live database
/// (`pg_get_functiondef`) when debugging drift.
pub const VERSIONING_FUNCTION_SQL: &str = include_str!("versioning.sql");

/// Installs the table-agnostic `versioning()` trigger procedure that every
/// history-table binding executes.
///
/// Apply once per database, before any
/// [`HistoryTableMigration`](crate::migrations::HistoryTableMigration).
/// `up` is repeatable (`CREATE OR REPLACE`); `down` drops the procedure,
/// which the server refuses while any trigger binding still references it.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersioningFunctionMigration;

impl VersioningFunctionMigration {
    pub fn new() -> Self {
        VersioningFunctionMigration
    }

    /// The `up` statements, in execution order.
    pub fn plan_up(&self) -> Vec<Step> {
        vec![Step::new(
            "install versioning procedure",
            VERSIONING_FUNCTION_SQL,
        )]
    }

    /// The `down` statements. Unguarded: dropping a procedure that was never
    /// installed is schema drift worth surfacing.
    pub fn plan_down(&self) -> Vec<Step> {
        vec![Step::new(
            "drop versioning procedure",
            format!("DROP FUNCTION {}()", quote_ident(VERSIONING_FUNCTION)),
        )]
    }
}

#[async_trait]
impl Migration for VersioningFunctionMigration {
    fn name(&self) -> String {
        "versioning_function".to_string()
    }

    async fn up(&self, executor: &mut dyn SchemaExecutor) -> Result<()> {
        run_steps(executor, &self.name(), Direction::Up, &self.plan_up()).await
    }

    async fn down(&self, executor: &mut dyn SchemaExecutor) -> Result<()> {
        run_steps(executor, &self.name(), Direction::Down, &self.plan_down()).await
    }
}
