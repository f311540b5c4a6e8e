//! Error types for the migration library.

use thiserror::Error;

use crate::migration::Direction;

/// Raw failure reported by a [`SchemaExecutor`](crate::executor::SchemaExecutor).
///
/// Boxed so test executors can fail with their own error types; the live
/// implementations put a `tokio_postgres::Error` here.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Invalid migration configuration (bad identifier, derived name over
    /// the length limit, etc.). Raised before any statement is issued.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A step of an `up` migration failed. The schema may hold a prefix of
    /// the migration's objects; the enclosing transaction decides whether
    /// that prefix survives.
    #[error("Schema change failed: {0}")]
    Schema(#[source] StepFailure),

    /// A step of a `down` migration failed, usually because the schema has
    /// drifted from what the prior `up` left behind.
    #[error("Reversal failed: {0}")]
    Reversal(#[source] StepFailure),

    /// Database error outside a migration step (opening or committing the
    /// enclosing transaction, catalog queries).
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

impl MigrateError {
    /// Create a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        MigrateError::Config(message.into())
    }

    /// Render the error with its full source chain, one numbered cause per
    /// line.
    ///
    /// `Display` stays single-line for log fields; this form is for
    /// surfacing a failed migration to a person, driver error included.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);
        let mut cause = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = cause {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            cause = err.source();
            depth += 1;
        }
        output
    }
}

/// Context for a single failed migration step: which migration, which step,
/// and the exact statement that was running.
#[derive(Error, Debug)]
#[error("migration {migration} ({direction}) step {step} [{label}]: {statement}")]
pub struct StepFailure {
    /// Name of the migration that was running.
    pub migration: String,

    /// Direction the migration was being applied in.
    pub direction: Direction,

    /// Zero-based index of the failing step.
    pub step: usize,

    /// Short label of the failing step, as carried by its
    /// [`Step`](crate::migration::Step).
    pub label: &'static str,

    /// The statement that failed, verbatim.
    pub statement: String,

    /// The driver error, unmodified.
    #[source]
    pub source: DriverError,
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn make_failure(direction: Direction) -> StepFailure {
        StepFailure {
            migration: "history_accounts".to_string(),
            direction,
            step: 1,
            label: "create history table",
            statement: "CREATE TABLE \"public\".\"accounts_history\" OF \"public\".\"account\""
                .to_string(),
            source: "type \"public.account\" does not exist".into(),
        }
    }

    #[test]
    fn test_source_chain_reaches_the_driver_error() {
        let err = MigrateError::Schema(make_failure(Direction::Up));

        let failure = std::error::Error::source(&err).expect("Schema exposes the step failure");
        assert!(
            failure
                .to_string()
                .contains("history_accounts (up) step 1 [create history table]"),
            "got: {failure}"
        );

        let driver = failure.source().expect("step failure exposes the driver error");
        assert_eq!(driver.to_string(), "type \"public.account\" does not exist");
        assert!(driver.source().is_none());
    }

    #[test]
    fn test_format_detailed_renders_the_chain() {
        let detailed = MigrateError::Reversal(make_failure(Direction::Down)).format_detailed();

        assert!(
            detailed.starts_with("Error: Reversal failed:"),
            "got: {detailed}"
        );
        assert!(detailed.contains("Caused by:\n  1: migration history_accounts (down)"));
        assert!(detailed.contains("Caused by:\n  2: type \"public.account\" does not exist"));
    }
}
