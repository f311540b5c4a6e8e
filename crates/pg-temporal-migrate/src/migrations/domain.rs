//! Domain types for identifier-format columns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};
use crate::executor::SchemaExecutor;
use crate::ident::{quote_ident, quote_literal, validate_identifier};
use crate::migration::{run_steps, Direction, Migration, Step};

/// Configuration for [`DomainTypeMigration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainTypeConfig {
    /// Domain type name.
    pub name: String,

    /// POSIX regular expression every value must match.
    pub pattern: String,
}

impl DomainTypeConfig {
    fn validate(&self) -> Result<()> {
        validate_identifier(&self.name)?;
        if self.pattern.is_empty() {
            return Err(MigrateError::Config(
                "Domain check pattern cannot be empty".to_string(),
            ));
        }
        if self.pattern.contains('\0') {
            return Err(MigrateError::Config(format!(
                "Domain check pattern contains null byte: {:?}",
                self.pattern
            )));
        }
        Ok(())
    }
}

/// Installs a `TEXT` domain constrained to an identifier format, for columns
/// that several otherwise-unrelated tables share.
///
/// Typed columns keep the format check in one place instead of repeating a
/// `CHECK` clause per table. `down` drops the domain; the server refuses
/// while any column still uses it.
#[derive(Debug, Clone)]
pub struct DomainTypeMigration {
    config: DomainTypeConfig,
}

impl DomainTypeMigration {
    /// Validate the domain name and pattern and build the migration.
    pub fn new(config: DomainTypeConfig) -> Result<Self> {
        config.validate()?;
        Ok(DomainTypeMigration { config })
    }

    /// The `up` statements.
    pub fn plan_up(&self) -> Vec<Step> {
        vec![Step::new(
            "create domain",
            format!(
                "CREATE DOMAIN {} AS TEXT CHECK (VALUE ~ {})",
                quote_ident(&self.config.name),
                quote_literal(&self.config.pattern),
            ),
        )]
    }

    /// The `down` statements, guarded like the other teardown paths.
    pub fn plan_down(&self) -> Vec<Step> {
        vec![Step::new(
            "drop domain",
            format!("DROP DOMAIN IF EXISTS {}", quote_ident(&self.config.name)),
        )]
    }
}

#[async_trait]
impl Migration for DomainTypeMigration {
    fn name(&self) -> String {
        format!("domain_{}", self.config.name)
    }

    async fn up(&self, executor: &mut dyn SchemaExecutor) -> Result<()> {
        run_steps(executor, &self.name(), Direction::Up, &self.plan_up()).await
    }

    async fn down(&self, executor: &mut dyn SchemaExecutor) -> Result<()> {
        run_steps(executor, &self.name(), Direction::Down, &self.plan_down()).await
    }
}
