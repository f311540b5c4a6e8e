//! Provision and tear down the history side of a tracked table.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::executor::SchemaExecutor;
use crate::ident::{qualified, quote_ident, validate_identifier};
use crate::migration::{run_steps, Direction, Migration, Step};
use crate::migrations::versioning_trigger_sql;
use crate::naming::{self, DEFAULT_SCHEMA, PERIOD_COLUMN};

/// Configuration for [`HistoryTableMigration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTableConfig {
    /// Tracked table name.
    pub table: String,

    /// Composite (row) type the tracked table was created `OF`. The history
    /// table is created of the same type, which keeps the two column sets
    /// identical through later `ALTER TYPE` changes.
    pub row_type: String,

    /// Schema holding the table and type. Defaults to `public`.
    #[serde(default)]
    pub schema: Option<String>,
}

impl HistoryTableConfig {
    /// Schema name with the default applied.
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    fn validate(&self) -> Result<()> {
        naming::validate_table_name(&self.table)?;
        validate_identifier(&self.row_type)?;
        validate_identifier(self.schema())?;
        Ok(())
    }
}

/// Provisions the history table, both period indexes, and the versioning
/// trigger for one tracked table; `down` removes exactly those objects.
///
/// Preconditions checked by the server, not by this crate: the tracked
/// table exists, was created `OF` the configured row type, carries a
/// `sys_period tstzrange` column, and `versioning()` is installed (see
/// [`VersioningFunctionMigration`](crate::migrations::VersioningFunctionMigration)).
#[derive(Debug, Clone)]
pub struct HistoryTableMigration {
    config: HistoryTableConfig,
}

impl HistoryTableMigration {
    /// Validate the configured names and build the migration.
    ///
    /// Name validation happens here, once, so the plans below are
    /// infallible and safe to render anywhere.
    pub fn new(config: HistoryTableConfig) -> Result<Self> {
        config.validate()?;
        Ok(HistoryTableMigration { config })
    }

    pub fn config(&self) -> &HistoryTableConfig {
        &self.config
    }

    /// The `up` statements, in execution order.
    ///
    /// Order matters: the history table must exist before the trigger that
    /// writes into it, and the trigger binding is the last thing activated
    /// on the tracked table.
    pub fn plan_up(&self) -> Vec<Step> {
        let schema = self.config.schema();
        let table = &self.config.table;
        let target = qualified(schema, table);
        let history = qualified(schema, &naming::history_table(table));

        vec![
            Step::new(
                "index live sys_period",
                format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    quote_ident(&naming::period_index(table)),
                    target,
                    quote_ident(PERIOD_COLUMN),
                ),
            ),
            Step::new(
                "create history table",
                format!(
                    "CREATE TABLE {} OF {}",
                    history,
                    qualified(schema, &self.config.row_type),
                ),
            ),
            Step::new(
                "bind versioning trigger",
                versioning_trigger_sql(schema, table),
            ),
            Step::new(
                "index history sys_period",
                format!(
                    "CREATE INDEX {} ON {} ({})",
                    quote_ident(&naming::history_period_index(table)),
                    history,
                    quote_ident(PERIOD_COLUMN),
                ),
            ),
        ]
    }

    /// The `down` statements: structural inverse of [`plan_up`].
    ///
    /// Each step is `IF EXISTS`-guarded so a partially applied `up` (or a
    /// hand-cleaned schema) can still be reverted; dropping the history
    /// table takes its index with it.
    ///
    /// [`plan_up`]: HistoryTableMigration::plan_up
    pub fn plan_down(&self) -> Vec<Step> {
        let schema = self.config.schema();
        let table = &self.config.table;

        vec![
            Step::new(
                "drop versioning trigger",
                format!(
                    "DROP TRIGGER IF EXISTS {} ON {}",
                    quote_ident(naming::VERSIONING_TRIGGER),
                    qualified(schema, table),
                ),
            ),
            Step::new(
                "drop history table",
                format!(
                    "DROP TABLE IF EXISTS {}",
                    qualified(schema, &naming::history_table(table)),
                ),
            ),
            Step::new(
                "drop live sys_period index",
                format!(
                    "DROP INDEX IF EXISTS {}",
                    qualified(schema, &naming::period_index(table)),
                ),
            ),
        ]
    }
}

#[async_trait]
impl Migration for HistoryTableMigration {
    fn name(&self) -> String {
        format!("history_{}", self.config.table)
    }

    async fn up(&self, executor: &mut dyn SchemaExecutor) -> Result<()> {
        run_steps(executor, &self.name(), Direction::Up, &self.plan_up()).await
    }

    async fn down(&self, executor: &mut dyn SchemaExecutor) -> Result<()> {
        run_steps(executor, &self.name(), Direction::Down, &self.plan_down()).await
    }
}
