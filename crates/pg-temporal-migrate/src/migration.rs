//! The migration contract: named, reversible units of schema change.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{MigrateError, Result, StepFailure};
use crate::executor::SchemaExecutor;

/// Direction a migration runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Apply the schema change.
    Up,
    /// Revert it, restoring the pre-`up` object set.
    Down,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One statement within a migration plan.
///
/// `sql` may hold several `;`-separated statements when they only make sense
/// as a unit (the trigger rebuild during a rename does this). The label is
/// for logs and error context only; it never reaches the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Short human-readable description of the step.
    pub label: &'static str,

    /// The statement text, exactly as it will be executed.
    pub sql: String,
}

impl Step {
    pub fn new(label: &'static str, sql: impl Into<String>) -> Self {
        Step {
            label,
            sql: sql.into(),
        }
    }
}

/// A named, reversible unit of schema change.
///
/// Implementations build their statements as [`Step`] plans, so callers and
/// tests can inspect exactly what will run without a database. `down` must
/// restore the object set that existed before `up`; sequencing multiple
/// migrations and recording which have been applied is the caller's job.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Migration name, used in logs and error context.
    fn name(&self) -> String;

    /// Apply the migration through `executor`.
    async fn up(&self, executor: &mut dyn SchemaExecutor) -> Result<()>;

    /// Revert the migration through `executor`.
    async fn down(&self, executor: &mut dyn SchemaExecutor) -> Result<()>;
}

/// Run a plan's steps in order, stopping at the first failure.
///
/// A failure is wrapped with the migration name, step index, and the exact
/// statement that was running; the driver error stays reachable through the
/// source chain, unmodified.
pub(crate) async fn run_steps(
    executor: &mut dyn SchemaExecutor,
    migration: &str,
    direction: Direction,
    steps: &[Step],
) -> Result<()> {
    for (index, step) in steps.iter().enumerate() {
        debug!(
            "{} {} step {}/{}: {}",
            migration,
            direction,
            index + 1,
            steps.len(),
            step.label
        );
        if let Err(source) = executor.execute(&step.sql).await {
            let failure = StepFailure {
                migration: migration.to_string(),
                direction,
                step: index,
                label: step.label,
                statement: step.sql.clone(),
                source,
            };
            return Err(match direction {
                Direction::Up => MigrateError::Schema(failure),
                Direction::Down => MigrateError::Reversal(failure),
            });
        }
    }
    info!("{} {} complete ({} steps)", migration, direction, steps.len());
    Ok(())
}
