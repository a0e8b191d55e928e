use super::*;
use serde_json::json;
use tb_db::{ExecutorCall, RecordingExecutor};

fn row(value: serde_json::Value) -> Row {
    value.as_object().cloned().unwrap()
}

fn tables() -> Vec<DdlTable> {
    vec![
        DdlTable::new("users", "CREATE TABLE users (id VARCHAR)"),
        DdlTable::new("orders", "CREATE TABLE orders (id VARCHAR)").with_dependencies(&["users"]),
        DdlTable::new("audit", "CREATE TABLE audit (id VARCHAR)"),
    ]
}

#[tokio::test]
async fn test_create_truncate_insert_sequence() {
    let users = TableData {
        truncate_before: true,
        ..TableData::new("users", vec![row(json!({ "id": "$UUID" })), row(json!({ "id": "u2" }))])
    };
    let orders = TableData::new("orders", vec![row(json!({ "id": "o1" }))]);
    let mut data = HashMap::new();
    data.insert("users", vec![&users]);
    data.insert("orders", vec![&orders]);

    let exec = RecordingExecutor::new();
    let counts = TableSeeder::new().seed(&tables(), &data, &exec).await.unwrap();

    assert_eq!(
        counts,
        SeedCounts {
            tables_created: 3,
            rows_inserted: 3
        }
    );

    let steps: Vec<(ExecutorStep, String)> = exec
        .calls()
        .iter()
        .map(|c| (c.step(), c.table().to_string()))
        .collect();
    assert_eq!(
        steps,
        vec![
            (ExecutorStep::CreateTable, "users".to_string()),
            (ExecutorStep::Truncate, "users".to_string()),
            (ExecutorStep::InsertRows, "users".to_string()),
            (ExecutorStep::CreateTable, "orders".to_string()),
            (ExecutorStep::InsertRows, "orders".to_string()),
            (ExecutorStep::CreateTable, "audit".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_rows_resolved_in_order() {
    let users = TableData::new(
        "users",
        vec![
            row(json!({ "id": "$UUID", "n": 1 })),
            row(json!({ "id": "$UUID", "n": 2 })),
        ],
    );
    let mut data = HashMap::new();
    data.insert("users", vec![&users]);

    let exec = RecordingExecutor::new();
    TableSeeder::new()
        .seed(&tables()[..1], &data, &exec)
        .await
        .unwrap();

    let calls = exec.calls();
    let ExecutorCall::InsertRows { rows, .. } = &calls[1] else {
        panic!("expected insert, got {:?}", calls[1]);
    };
    assert_eq!(rows[0]["n"], 1);
    assert_eq!(rows[1]["n"], 2);
    assert_ne!(rows[0]["id"], "$UUID");
    assert_ne!(rows[0]["id"], rows[1]["id"]);
}

#[tokio::test]
async fn test_failure_stops_with_progress() {
    let users = TableData::new("users", vec![row(json!({ "id": "u1" }))]);
    let mut data = HashMap::new();
    data.insert("users", vec![&users]);

    let exec = RecordingExecutor::new().fail_on("orders", ExecutorStep::CreateTable);
    let err = TableSeeder::new()
        .seed(&tables(), &data, &exec)
        .await
        .unwrap_err();

    assert_eq!(err.table, "orders");
    assert_eq!(err.step, ExecutorStep::CreateTable);
    assert_eq!(
        err.progress,
        SeedCounts {
            tables_created: 1,
            rows_inserted: 1
        }
    );
    // audit is never reached
    assert!(exec.calls().iter().all(|c| c.table() != "audit"));
}

#[tokio::test]
async fn test_empty_rows_skip_insert() {
    let users = TableData::new("users", Vec::new());
    let mut data = HashMap::new();
    data.insert("users", vec![&users]);

    let exec = RecordingExecutor::new();
    let counts = TableSeeder::new()
        .seed(&tables()[..1], &data, &exec)
        .await
        .unwrap();

    assert_eq!(counts.rows_inserted, 0);
    assert_eq!(exec.calls().len(), 1);
}
