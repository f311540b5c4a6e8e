//! Rename a tracked table and every derived artifact in one reversible unit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::executor::SchemaExecutor;
use crate::ident::{qualified, quote_ident, validate_identifier};
use crate::migration::{run_steps, Direction, Migration, Step};
use crate::migrations::versioning_trigger_sql;
use crate::naming::{self, DEFAULT_SCHEMA, VERSIONING_TRIGGER};

/// Configuration for [`RenameTableMigration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameTableConfig {
    /// Current tracked table name.
    pub old_table: String,

    /// New tracked table name.
    pub new_table: String,

    /// Current row-type name.
    pub old_row_type: String,

    /// New row-type name.
    pub new_row_type: String,

    /// Schema holding all of the above. Defaults to `public`.
    #[serde(default)]
    pub schema: Option<String>,
}

impl RenameTableConfig {
    /// Schema name with the default applied.
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    /// The same rename read in the opposite direction.
    ///
    /// `down` runs the `up` of the swapped config, so the two directions
    /// share one code path and can never drift apart.
    pub fn swapped(&self) -> Self {
        RenameTableConfig {
            old_table: self.new_table.clone(),
            new_table: self.old_table.clone(),
            old_row_type: self.new_row_type.clone(),
            new_row_type: self.old_row_type.clone(),
            schema: self.schema.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        naming::validate_table_name(&self.old_table)?;
        naming::validate_table_name(&self.new_table)?;
        validate_identifier(&self.old_row_type)?;
        validate_identifier(&self.new_row_type)?;
        validate_identifier(self.schema())?;
        Ok(())
    }
}

/// Renames a tracked table together with its row type, history table, both
/// period indexes, and the trigger binding's history-table argument.
///
/// The trigger name itself never changes; only the statements inside the
/// binding do. Leaving any one artifact under the old name would break the
/// derived-name contract for every later migration touching this table, so
/// all six renames travel as one unit.
#[derive(Debug, Clone)]
pub struct RenameTableMigration {
    config: RenameTableConfig,
}

impl RenameTableMigration {
    /// Validate both the old and new name sets and build the migration.
    pub fn new(config: RenameTableConfig) -> Result<Self> {
        config.validate()?;
        Ok(RenameTableMigration { config })
    }

    pub fn config(&self) -> &RenameTableConfig {
        &self.config
    }

    /// The `up` statements, in execution order.
    pub fn plan_up(&self) -> Vec<Step> {
        rename_steps(&self.config)
    }

    /// The `down` statements: the `up` plan of the swapped config.
    pub fn plan_down(&self) -> Vec<Step> {
        rename_steps(&self.config.swapped())
    }
}

/// Build the rename plan for one direction.
///
/// The trigger rebuild is deliberately unguarded: exactly one binding must
/// exist on the table, and a missing one means the schema has drifted from
/// what the history migration provisioned.
fn rename_steps(config: &RenameTableConfig) -> Vec<Step> {
    let schema = config.schema();
    let old_history = naming::history_table(&config.old_table);
    let new_history = naming::history_table(&config.new_table);

    vec![
        Step::new(
            "rename row type",
            format!(
                "ALTER TYPE {} RENAME TO {}",
                qualified(schema, &config.old_row_type),
                quote_ident(&config.new_row_type),
            ),
        ),
        Step::new(
            "rename live table",
            format!(
                "ALTER TABLE {} RENAME TO {}",
                qualified(schema, &config.old_table),
                quote_ident(&config.new_table),
            ),
        ),
        Step::new(
            "rename live sys_period index",
            format!(
                "ALTER INDEX {} RENAME TO {}",
                qualified(schema, &naming::period_index(&config.old_table)),
                quote_ident(&naming::period_index(&config.new_table)),
            ),
        ),
        Step::new(
            "rename history table",
            format!(
                "ALTER TABLE {} RENAME TO {}",
                qualified(schema, &old_history),
                quote_ident(&new_history),
            ),
        ),
        Step::new(
            "rebind versioning trigger",
            format!(
                "DROP TRIGGER {} ON {};\n{}",
                quote_ident(VERSIONING_TRIGGER),
                qualified(schema, &config.new_table),
                versioning_trigger_sql(schema, &config.new_table),
            ),
        ),
        Step::new(
            "rename history sys_period index",
            format!(
                "ALTER INDEX {} RENAME TO {}",
                qualified(schema, &naming::history_period_index(&config.old_table)),
                quote_ident(&naming::history_period_index(&config.new_table)),
            ),
        ),
    ]
}

#[async_trait]
impl Migration for RenameTableMigration {
    fn name(&self) -> String {
        format!("rename_{}_to_{}", self.config.old_table, self.config.new_table)
    }

    async fn up(&self, executor: &mut dyn SchemaExecutor) -> Result<()> {
        run_steps(executor, &self.name(), Direction::Up, &self.plan_up()).await
    }

    async fn down(&self, executor: &mut dyn SchemaExecutor) -> Result<()> {
        run_steps(executor, &self.name(), Direction::Down, &self.plan_down()).await
    }
}
