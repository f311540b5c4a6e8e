//! Canonical names for the schema objects the migrations manage.
//!
//! These patterns are a wire-format contract: deployed databases, the
//! versioning trigger bindings inside them, and external tooling all assume
//! them. Derived names are pure string functions of the tracked table name
//! so that `up`, `down`, and rename can reconstruct the exact object set
//! without consulting the catalog.

use crate::error::{MigrateError, Result};
use crate::ident::{validate_identifier, MAX_IDENTIFIER_LENGTH};

/// Schema used when a migration config does not name one.
pub const DEFAULT_SCHEMA: &str = "public";

/// Period column every tracked table (and history table) carries.
pub const PERIOD_COLUMN: &str = "sys_period";

/// Name of the shared trigger function.
pub const VERSIONING_FUNCTION: &str = "versioning";

/// Name of the per-table trigger binding. Identical on every tracked table;
/// triggers are namespaced per table, so this never collides.
pub const VERSIONING_TRIGGER: &str = "versioning_trigger";

/// History table for a tracked table: `{table}_history`.
pub fn history_table(table: &str) -> String {
    format!("{table}_history")
}

/// Period index on the tracked table: `{table}_sys_period`.
pub fn period_index(table: &str) -> String {
    format!("{table}_{PERIOD_COLUMN}")
}

/// Period index on the history table: `{table}_history_sys_period`.
pub fn history_period_index(table: &str) -> String {
    format!("{table}_history_{PERIOD_COLUMN}")
}

/// Longest suffix appended to a table name by the derived-name functions.
const LONGEST_SUFFIX: usize = "_history_sys_period".len();

/// Validate a tracked table name, including the length of every name
/// derived from it.
///
/// A table name can be a valid identifier on its own while
/// `{table}_history_sys_period` overruns the server's 63-byte limit and gets
/// silently truncated, breaking the naming contract. Rejected here instead.
pub fn validate_table_name(table: &str) -> Result<()> {
    validate_identifier(table)?;
    if table.len() + LONGEST_SUFFIX > MAX_IDENTIFIER_LENGTH {
        return Err(MigrateError::Config(format!(
            "Table name too long for derived history names: {:?} is {} bytes, maximum is {} \
             so that \"{}_history_{}\" stays within {} bytes",
            table,
            table.len(),
            MAX_IDENTIFIER_LENGTH - LONGEST_SUFFIX,
            table,
            PERIOD_COLUMN,
            MAX_IDENTIFIER_LENGTH
        )));
    }
    Ok(())
}
