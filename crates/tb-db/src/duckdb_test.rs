use super::*;
use serde_json::json;

fn row(value: Value) -> Row {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbExecutor::in_memory().unwrap();
    assert_eq!(db.executor_type(), "duckdb");
}

#[tokio::test]
async fn test_create_table_runs_ddl() {
    let db = DuckDbExecutor::in_memory().unwrap();
    db.create_table("users", "CREATE TABLE users (id VARCHAR, age INTEGER)")
        .await
        .unwrap();
    assert!(db.relation_exists("users").unwrap());
    assert!(!db.relation_exists("orders").unwrap());
}

#[tokio::test]
async fn test_create_table_error_carries_table() {
    let db = DuckDbExecutor::in_memory().unwrap();
    let err = db
        .create_table("broken", "CREATE TABLE broken (")
        .await
        .unwrap_err();
    assert_eq!(err.table(), Some("broken"));
}

#[tokio::test]
async fn test_insert_rows_in_order() {
    let db = DuckDbExecutor::in_memory().unwrap();
    db.create_table(
        "users",
        "CREATE TABLE users (id VARCHAR, age INTEGER, active BOOLEAN, score DOUBLE, meta VARCHAR)",
    )
    .await
    .unwrap();

    let rows = vec![
        row(json!({ "id": "a", "age": 30, "active": true, "score": 1.5, "meta": { "k": 1 } })),
        row(json!({ "id": "b", "age": null, "active": false })),
        row(json!({ "id": "c" })),
    ];
    let inserted = db.insert_rows("users", &rows).await.unwrap();

    assert_eq!(inserted, 3);
    assert_eq!(db.row_count("users").unwrap(), 3);
    assert_eq!(
        db.column_values("users", "id").unwrap(),
        vec![Some("a".to_string()), Some("b".to_string()), Some("c".to_string())]
    );
    assert_eq!(
        db.column_values("users", "meta").unwrap()[0].as_deref(),
        Some(r#"{"k":1}"#)
    );
}

#[tokio::test]
async fn test_insert_failure_rolls_back_table() {
    let db = DuckDbExecutor::in_memory().unwrap();
    db.create_table("t", "CREATE TABLE t (id INTEGER NOT NULL)")
        .await
        .unwrap();

    let rows = vec![row(json!({ "id": 1 })), row(json!({ "id": null }))];
    let err = db.insert_rows("t", &rows).await.unwrap_err();

    assert_eq!(err.table(), Some("t"));
    assert!(err.to_string().contains("row 1"));
    assert_eq!(db.row_count("t").unwrap(), 0);
}

#[tokio::test]
async fn test_truncate() {
    let db = DuckDbExecutor::in_memory().unwrap();
    db.execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (1), (2);")
        .unwrap();
    db.truncate("t").await.unwrap();
    assert_eq!(db.row_count("t").unwrap(), 0);
}

#[tokio::test]
async fn test_truncate_missing_table_fails() {
    let db = DuckDbExecutor::in_memory().unwrap();
    let err = db.truncate("ghost").await.unwrap_err();
    assert_eq!(err.table(), Some("ghost"));
}

#[tokio::test]
async fn test_quoted_column_names() {
    let db = DuckDbExecutor::in_memory().unwrap();
    db.create_table("t", r#"CREATE TABLE t ("order" VARCHAR, "we""ird" VARCHAR)"#)
        .await
        .unwrap();
    let rows = vec![row(json!({ "order": "x", "we\"ird": "y" }))];
    db.insert_rows("t", &rows).await.unwrap();
    assert_eq!(db.row_count("t").unwrap(), 1);
}

#[tokio::test]
async fn test_file_backed_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tb.duckdb");
    {
        let db = DuckDbExecutor::from_path(&path).unwrap();
        db.create_table("t", "CREATE TABLE t (id INTEGER)").await.unwrap();
    }
    let db = DuckDbExecutor::new(path.to_str().unwrap()).unwrap();
    assert!(db.relation_exists("t").unwrap());
}

#[test]
fn test_quote_helpers() {
    assert_eq!(quote_qualified("main.users").unwrap(), r#""main"."users""#);
    assert!(quote_ident("").is_err());
    assert_eq!(
        insert_sql("\"t\"", &Row::new()).unwrap(),
        "INSERT INTO \"t\" DEFAULT VALUES"
    );
}
