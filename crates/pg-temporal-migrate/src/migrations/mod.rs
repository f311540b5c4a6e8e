//! The migration units: versioning function, history tables, renames, and
//! domain types.
//!
//! Each unit builds its statements as an inspectable plan and executes it
//! through a [`SchemaExecutor`](crate::executor::SchemaExecutor). The object
//! names they create follow the patterns in [`crate::naming`] exactly;
//! deployed databases were provisioned with those patterns and the `down`
//! directions reconstruct them from configuration alone.

mod domain;
mod history;
mod rename;
mod versioning;

pub use domain::{DomainTypeConfig, DomainTypeMigration};
pub use history::{HistoryTableConfig, HistoryTableMigration};
pub use rename::{RenameTableConfig, RenameTableMigration};
pub use versioning::{VersioningFunctionMigration, VERSIONING_FUNCTION_SQL};

use crate::ident::{qualified, quote_ident, quote_literal};
use crate::naming::{self, PERIOD_COLUMN, VERSIONING_FUNCTION, VERSIONING_TRIGGER};

/// Render the trigger binding for one tracked table.
///
/// The argument literals are part of the deployed contract and must stay in
/// this order: period column name, schema-qualified history table, adjust
/// flag. Existing bindings in production databases carry exactly this shape.
pub(crate) fn versioning_trigger_sql(schema: &str, table: &str) -> String {
    format!(
        "CREATE TRIGGER {trigger} BEFORE INSERT OR UPDATE OR DELETE ON {target} \
         FOR EACH ROW EXECUTE PROCEDURE {function}({period}, {history}, true)",
        trigger = quote_ident(VERSIONING_TRIGGER),
        target = qualified(schema, table),
        function = quote_ident(VERSIONING_FUNCTION),
        period = quote_literal(PERIOD_COLUMN),
        history = quote_literal(&format!("{}.{}", schema, naming::history_table(table))),
    )
}
