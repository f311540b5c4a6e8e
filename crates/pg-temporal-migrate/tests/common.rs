use pg_temporal_migrate::testkit::{self, ResetConfig};
use tokio_postgres::{Client, NoTls};
use tracing_subscriber::EnvFilter;

/// Install the env-filter subscriber once, so `RUST_LOG=debug` shows the
/// per-step migration logging while a suite runs.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Connect to the database named by `PG_TEST_DSN`.
///
/// Returns `None` when the variable is unset, which makes every live test
/// silently skip; suites must hold a real database to run.
pub async fn connect() -> Option<Client> {
    init_tracing();
    let dsn = std::env::var("PG_TEST_DSN").ok()?;
    let (client, connection) = tokio_postgres::connect(&dsn, NoTls)
        .await
        .expect("connect to PG_TEST_DSN");
    tokio::spawn(async move {
        if let Err(err) = connection.await {
            eprintln!("postgres connection error: {err}");
        }
    });
    Some(client)
}

/// Reset `public` to an empty schema.
pub async fn fresh_schema(client: &Client) {
    testkit::reset_schema(
        client,
        &ResetConfig {
            allow_destructive: true,
            drop_schemas: Vec::new(),
        },
    )
    .await
    .expect("reset schema");
}

/// Create the canonical tracked-table fixture: a composite row type and a
/// typed table carrying `sys_period`.
pub async fn create_tracked_accounts(client: &Client) {
    client
        .batch_execute(
            "CREATE TYPE account AS (id integer, name text, balance integer, sys_period tstzrange);
             CREATE TABLE accounts OF account (PRIMARY KEY (id))",
        )
        .await
        .expect("create accounts fixture");
}

/// Non-internal trigger names on a table in `public`.
pub async fn trigger_names(client: &Client, table: &str) -> Vec<String> {
    let rows = client
        .query(
            "SELECT t.tgname::text \
               FROM pg_trigger t \
               JOIN pg_class c ON c.oid = t.tgrelid \
               JOIN pg_namespace n ON n.oid = c.relnamespace \
              WHERE n.nspname = 'public' AND c.relname = $1 AND NOT t.tgisinternal \
              ORDER BY t.tgname",
            &[&table],
        )
        .await
        .expect("query pg_trigger");
    rows.iter().map(|row| row.get(0)).collect()
}

/// Every user-visible object in `public`, as sorted `kind: name` strings.
///
/// Snapshots taken before `up` and after `down` must be identical; this is
/// how the suites prove reversibility object-by-object.
pub async fn schema_snapshot(client: &Client) -> Vec<String> {
    let rows = client
        .query(
            "SELECT 'table: ' || tablename AS obj \
               FROM pg_tables WHERE schemaname = 'public' \
             UNION ALL \
             SELECT 'index: ' || indexname \
               FROM pg_indexes WHERE schemaname = 'public' \
             UNION ALL \
             SELECT 'type: ' || t.typname \
               FROM pg_type t \
               JOIN pg_namespace n ON n.oid = t.typnamespace \
              WHERE n.nspname = 'public' AND t.typtype = 'c' \
             UNION ALL \
             SELECT 'domain: ' || t.typname \
               FROM pg_type t \
               JOIN pg_namespace n ON n.oid = t.typnamespace \
              WHERE n.nspname = 'public' AND t.typtype = 'd' \
             UNION ALL \
             SELECT 'trigger: ' || c.relname || '.' || t.tgname \
               FROM pg_trigger t \
               JOIN pg_class c ON c.oid = t.tgrelid \
               JOIN pg_namespace n ON n.oid = c.relnamespace \
              WHERE n.nspname = 'public' AND NOT t.tgisinternal \
             UNION ALL \
             SELECT 'function: ' || p.proname \
               FROM pg_proc p \
               JOIN pg_namespace n ON n.oid = p.pronamespace \
              WHERE n.nspname = 'public' \
             ORDER BY 1",
            &[],
        )
        .await
        .expect("snapshot catalog");
    rows.iter().map(|row| row.get(0)).collect()
}

/// `count(*)` of a table already known to exist.
pub async fn row_count(client: &Client, table: &str) -> i64 {
    let row = client
        .query_one(&format!("SELECT count(*) FROM {table}"), &[])
        .await
        .expect("count rows");
    row.get(0)
}
