//! Live tests for whole-unit renames of tracked tables.

#[path = "common.rs"]
mod common;

use pg_temporal_migrate::{
    apply_down, apply_up, HistoryTableConfig, HistoryTableMigration, MigrateError,
    RenameTableConfig, RenameTableMigration, VersioningFunctionMigration,
};
use serial_test::serial;
use tokio_postgres::Client;

fn accounts_to_clients() -> RenameTableMigration {
    RenameTableMigration::new(RenameTableConfig {
        old_table: "accounts".to_string(),
        new_table: "clients".to_string(),
        old_row_type: "account".to_string(),
        new_row_type: "client".to_string(),
        schema: None,
    })
    .expect("valid config")
}

/// Full provisioning plus one archived version, so renames have real
/// history to carry over.
async fn setup_with_history() -> Option<Client> {
    let mut client = common::connect().await?;
    common::fresh_schema(&client).await;
    apply_up(&mut client, &VersioningFunctionMigration::new())
        .await
        .expect("install versioning()");
    common::create_tracked_accounts(&client).await;
    let history = HistoryTableMigration::new(HistoryTableConfig {
        table: "accounts".to_string(),
        row_type: "account".to_string(),
        schema: None,
    })
    .expect("valid config");
    apply_up(&mut client, &history).await.expect("history up");

    client
        .execute(
            "INSERT INTO accounts (id, name, balance) VALUES (1, 'alice', 100)",
            &[],
        )
        .await
        .expect("insert");
    client
        .execute("UPDATE accounts SET balance = 150 WHERE id = 1", &[])
        .await
        .expect("update");
    Some(client)
}

#[tokio::test]
#[serial]
async fn rename_moves_every_artifact() {
    let Some(mut client) = setup_with_history().await else {
        return;
    };
    apply_up(&mut client, &accounts_to_clients())
        .await
        .expect("rename up");

    let snapshot = common::schema_snapshot(&client).await;
    for expected in [
        "table: clients",
        "table: clients_history",
        "index: clients_sys_period",
        "index: clients_history_sys_period",
        "type: client",
        "trigger: clients.versioning_trigger",
    ] {
        assert!(
            snapshot.iter().any(|obj| obj == expected),
            "missing {expected} in {snapshot:?}"
        );
    }
    // Objects outside the managed set (the fixture's primary key index)
    // keep their names; only the derived artifacts move.
    for stale in [
        "table: accounts",
        "table: accounts_history",
        "index: accounts_sys_period",
        "index: accounts_history_sys_period",
        "type: account",
        "trigger: accounts.versioning_trigger",
    ] {
        assert!(
            !snapshot.iter().any(|obj| obj == stale),
            "old object {stale:?} still present in {snapshot:?}"
        );
    }
}

#[tokio::test]
#[serial]
async fn rename_preserves_history_rows_and_periods() {
    let Some(mut client) = setup_with_history().await else {
        return;
    };
    let before = client
        .query_one(
            "SELECT sys_period::text, balance FROM accounts_history",
            &[],
        )
        .await
        .expect("read history before rename");
    let period_before: String = before.get(0);

    apply_up(&mut client, &accounts_to_clients())
        .await
        .expect("rename up");

    let after = client
        .query_one("SELECT sys_period::text, balance FROM clients_history", &[])
        .await
        .expect("read history after rename");
    let period_after: String = after.get(0);
    let balance: i32 = after.get(1);

    assert_eq!(period_before, period_after);
    assert_eq!(balance, 100);
}

#[tokio::test]
#[serial]
async fn versioning_continues_after_rename() {
    let Some(mut client) = setup_with_history().await else {
        return;
    };
    apply_up(&mut client, &accounts_to_clients())
        .await
        .expect("rename up");

    client
        .execute("UPDATE clients SET balance = 200 WHERE id = 1", &[])
        .await
        .expect("update after rename");

    assert_eq!(common::row_count(&client, "clients_history").await, 2);

    // The rebuilt binding wrote into the renamed mirror with intact ordering
    let rows = client
        .query(
            "SELECT balance FROM clients_history ORDER BY lower(sys_period)",
            &[],
        )
        .await
        .expect("read history order");
    let balances: Vec<i32> = rows.iter().map(|row| row.get(0)).collect();
    assert_eq!(balances, vec![100, 150]);
}

#[tokio::test]
#[serial]
async fn rename_down_restores_original_object_set() {
    let Some(mut client) = setup_with_history().await else {
        return;
    };
    let before = common::schema_snapshot(&client).await;

    apply_up(&mut client, &accounts_to_clients())
        .await
        .expect("rename up");
    apply_down(&mut client, &accounts_to_clients())
        .await
        .expect("rename down");

    assert_eq!(common::schema_snapshot(&client).await, before);

    // Versioning still works under the restored names
    client
        .execute("UPDATE accounts SET balance = 999 WHERE id = 1", &[])
        .await
        .expect("update after round trip");
    assert_eq!(common::row_count(&client, "accounts_history").await, 2);
}

#[tokio::test]
#[serial]
async fn rename_fails_atomically_when_trigger_is_missing() {
    let Some(mut client) = setup_with_history().await else {
        return;
    };
    client
        .batch_execute("DROP TRIGGER versioning_trigger ON accounts")
        .await
        .expect("remove trigger binding");
    let before = common::schema_snapshot(&client).await;

    let err = apply_up(&mut client, &accounts_to_clients())
        .await
        .expect_err("rename must fail without the binding");
    match err {
        MigrateError::Schema(failure) => {
            assert_eq!(failure.label, "rebind versioning trigger");
            assert_eq!(failure.step, 4);
        }
        other => panic!("expected Schema error, got: {other}"),
    }

    // Earlier renames in the plan rolled back with the failure
    assert_eq!(common::schema_snapshot(&client).await, before);
}
