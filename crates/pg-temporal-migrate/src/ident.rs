//! Identifier validation and quoting for dynamically built schema statements.
//!
//! Every statement this crate issues is DDL, and SQL identifiers (table,
//! type, index, schema names) cannot be passed as parameters in prepared
//! statements - only data values can be parameterized. To safely splice
//! caller-supplied names into statements, we:
//!
//! 1. Validate names eagerly, when a migration is constructed
//! 2. Quote every identifier (and every string literal) at the point it is
//!    rendered into a statement
//!
//! Validation is deliberately stricter than what PostgreSQL itself accepts:
//! only lower-case unquoted-style names are allowed, because the derived
//! object names (`{table}_history` and friends) are contracts shared with
//! other tooling and must not depend on quoting to round-trip.

use crate::error::{MigrateError, Result};

/// Maximum identifier length in bytes (PostgreSQL `NAMEDATALEN - 1`).
/// Longer names are truncated by the server, which would silently corrupt
/// the derived-name convention, so they are rejected up front.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Validate a name for use as a PostgreSQL identifier.
///
/// Accepts `[a-z_][a-z0-9_]*` up to [`MAX_IDENTIFIER_LENGTH`] bytes.
///
/// # Errors
///
/// Returns `MigrateError::Config` with a descriptive message for empty,
/// over-long, or out-of-charset names.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MigrateError::Config(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MigrateError::Config(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    let mut chars = name.chars();
    // Non-empty, checked above
    let first = chars.next().unwrap_or('\0');
    if !(first.is_ascii_lowercase() || first == '_') {
        return Err(MigrateError::Config(format!(
            "Identifier must start with a lower-case letter or underscore: {:?}",
            name
        )));
    }

    if let Some(bad) = chars.find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
    {
        return Err(MigrateError::Config(format!(
            "Identifier contains {:?}; only lower-case letters, digits, and underscores are allowed: {:?}",
            bad, name
        )));
    }

    Ok(())
}

/// Quote a PostgreSQL identifier.
///
/// Escapes double quotes by doubling them and wraps in double quotes. Safe
/// for any input; validation of *which* names are acceptable happens
/// separately via [`validate_identifier`].
///
/// # Examples
///
/// ```
/// use pg_temporal_migrate::ident::quote_ident;
/// assert_eq!(quote_ident("accounts"), "\"accounts\"");
/// assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for splicing into a statement.
///
/// Escapes single quotes by doubling them and wraps in single quotes. Used
/// for trigger arguments and domain check patterns, which are values rather
/// than identifiers but still live inside DDL text.
///
/// # Examples
///
/// ```
/// use pg_temporal_migrate::ident::quote_literal;
/// assert_eq!(quote_literal("sys_period"), "'sys_period'");
/// assert_eq!(quote_literal("it's"), "'it''s'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Qualify a name with its schema: `"schema"."name"`.
pub fn qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}
