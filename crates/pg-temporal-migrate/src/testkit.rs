//! Destructive database helpers for test harnesses.
//!
//! Everything here can destroy data, so every entry point demands an
//! explicit `allow_destructive` opt-in from its caller. Nothing consults
//! environment variables or connection metadata; a harness that wants these
//! helpers says so in its own configuration, and a production service that
//! never sets the flag cannot reach them by accident.

use serde::{Deserialize, Serialize};
use tokio_postgres::Client;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{MigrateError, Result};
use crate::ident::{qualified, quote_ident, validate_identifier};
use crate::naming::DEFAULT_SCHEMA;

/// Prefix identifying scratch databases created by this module.
const SCRATCH_PREFIX: &str = "_scratch_";

/// Configuration for [`reset_schema`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Explicit opt-in; without it the helper refuses to run.
    pub allow_destructive: bool,

    /// Extra schemas dropped (with `CASCADE`) in addition to recreating
    /// `public`.
    #[serde(default)]
    pub drop_schemas: Vec<String>,
}

/// Configuration for [`truncate_all`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TruncateConfig {
    /// Explicit opt-in; without it the helper refuses to run.
    pub allow_destructive: bool,

    /// Schemas whose tables are truncated. Empty means `public`.
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Tables left untouched (reference data, lookup tables).
    #[serde(default)]
    pub skip_tables: Vec<String>,
}

fn ensure_destructive(allowed: bool, operation: &str) -> Result<()> {
    if !allowed {
        return Err(MigrateError::config(format!(
            "{} is destructive and requires allow_destructive = true",
            operation
        )));
    }
    Ok(())
}

fn validate_scratch_name(name: &str) -> Result<()> {
    validate_identifier(name)?;
    if !name.starts_with(SCRATCH_PREFIX) {
        return Err(MigrateError::config(format!(
            "refusing to drop {:?}: not a {}* scratch database",
            name, SCRATCH_PREFIX
        )));
    }
    Ok(())
}

/// Drop and recreate the `public` schema, removing every object in it.
///
/// This is the between-suite reset: afterwards the database looks freshly
/// created and migrations can be applied from scratch. Extra schemas listed
/// in the config are dropped outright, not recreated.
pub async fn reset_schema(client: &Client, config: &ResetConfig) -> Result<()> {
    ensure_destructive(config.allow_destructive, "reset_schema")?;
    for schema in &config.drop_schemas {
        validate_identifier(schema)?;
    }

    warn!(
        "dropping and recreating schema public ({} extra schemas)",
        config.drop_schemas.len()
    );
    client
        .batch_execute(
            "DROP SCHEMA public CASCADE;\n\
             CREATE SCHEMA public;\n\
             GRANT ALL ON SCHEMA public TO public",
        )
        .await?;

    for schema in &config.drop_schemas {
        client
            .batch_execute(&format!(
                "DROP SCHEMA IF EXISTS {} CASCADE",
                quote_ident(schema)
            ))
            .await?;
    }
    Ok(())
}

/// Remove every row from every table in the configured schemas, leaving the
/// schema objects themselves in place.
///
/// The faster between-test reset when the schema is already migrated. All
/// targets go into a single `TRUNCATE`, so foreign keys between them are
/// fine; a foreign key arriving from a skipped table makes the server
/// refuse, which is the right outcome for a skip list that holds referenced
/// reference data by mistake.
pub async fn truncate_all(client: &Client, config: &TruncateConfig) -> Result<()> {
    ensure_destructive(config.allow_destructive, "truncate_all")?;

    let schemas: Vec<String> = if config.schemas.is_empty() {
        vec![DEFAULT_SCHEMA.to_string()]
    } else {
        config.schemas.clone()
    };
    for schema in &schemas {
        validate_identifier(schema)?;
    }
    for table in &config.skip_tables {
        validate_identifier(table)?;
    }

    let rows = client
        .query(
            "SELECT schemaname, tablename FROM pg_tables WHERE schemaname = ANY($1)",
            &[&schemas],
        )
        .await?;

    let mut targets = Vec::new();
    for row in rows {
        let schema: String = row.get(0);
        let table: String = row.get(1);
        if config.skip_tables.iter().any(|skip| skip == &table) {
            continue;
        }
        targets.push(qualified(&schema, &table));
    }

    if targets.is_empty() {
        debug!("truncate_all: no tables in {:?}", schemas);
        return Ok(());
    }

    warn!("truncating {} tables", targets.len());
    client
        .batch_execute(&format!("TRUNCATE {}", targets.join(", ")))
        .await?;
    Ok(())
}

/// Create a uuid-named throwaway database and return its name.
///
/// For suites that need a database of their own (anything exercising
/// `down` paths concurrently). `CREATE DATABASE` cannot run inside a
/// transaction, so this takes a plain client connected to any database on
/// the server. Creation needs no opt-in; only dropping does.
pub async fn create_scratch_database(client: &Client) -> Result<String> {
    let name = format!("{}{}", SCRATCH_PREFIX, Uuid::new_v4().simple());
    debug!("creating scratch database {}", name);
    client
        .batch_execute(&format!("CREATE DATABASE {}", quote_ident(&name)))
        .await?;
    Ok(name)
}

/// Drop a database created by [`create_scratch_database`].
///
/// Refuses names without the scratch prefix, so a mistyped call cannot take
/// down a real database even with the opt-in set.
pub async fn drop_scratch_database(
    client: &Client,
    name: &str,
    allow_destructive: bool,
) -> Result<()> {
    ensure_destructive(allow_destructive, "drop_scratch_database")?;
    validate_scratch_name(name)?;

    warn!("dropping scratch database {}", name);
    client
        .batch_execute(&format!("DROP DATABASE IF EXISTS {}", quote_ident(name)))
        .await?;
    Ok(())
}
