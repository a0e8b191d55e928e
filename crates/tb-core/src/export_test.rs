use super::*;
use serde_json::json;

fn scenario() -> TestScenario {
    parse_scenario(&json!({
        "id": "login",
        "name": "login flow",
        "targetApi": {
            "method": "POST",
            "url": "http://localhost:8080/login",
            "headers": { "X-Request-Id": "$UUID" },
            "body": { "user": "alice" },
            "timeout": 5000
        },
        "tables": [
            { "name": "users", "ddl": "CREATE TABLE users (id TEXT)", "order": 1 }
        ],
        "tableData": [
            { "tableName": "users", "rows": [{ "id": "$SEQ" }], "truncateBefore": true, "encryptedColumns": ["id"] }
        ],
        "mockApis": [{
            "id": "sso",
            "enabled": false,
            "method": "GET",
            "path": "/sso",
            "requestMatch": { "headers": { "X-Test": "1" } },
            "response": { "status": 302, "headers": { "Location": "/home" }, "delay": 50 }
        }],
        "expectedResponse": { "status": 200 },
        "tags": ["auth"],
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-02T00:00:00Z"
    }))
    .unwrap()
}

#[test]
fn test_export_then_restore_is_identical() {
    let original = scenario();
    let exported = serde_json::to_value(export_scenario(&original)).unwrap();

    assert_eq!(exported["version"], json!(EXPORT_VERSION));
    assert!(exported.get("exportedAt").is_some());

    let restored = import_scenario(&exported, ImportMode::Restore).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn test_create_new_assigns_identity() {
    let original = scenario();
    let exported = serde_json::to_value(export_scenario(&original)).unwrap();

    let imported = import_scenario(&exported, ImportMode::CreateNew).unwrap();
    assert_ne!(imported.id, original.id);
    assert!(imported.created_at > original.created_at);
    assert_eq!(imported.tables, original.tables);
    assert_eq!(imported.table_data, original.table_data);
    assert_eq!(imported.mock_apis, original.mock_apis);
    assert_eq!(imported.target_api, original.target_api);
}

#[test]
fn test_bare_scenario_accepted() {
    let original = scenario();
    let bare = serde_json::to_value(&original).unwrap();
    let restored = import_scenario(&bare, ImportMode::Restore).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn test_future_major_version_rejected() {
    let mut exported = serde_json::to_value(export_scenario(&scenario())).unwrap();
    exported["version"] = json!("2.0");
    let errors = import_scenario(&exported, ImportMode::Restore).unwrap_err();
    assert!(errors.has_path("version"));
}

#[test]
fn test_minor_versions_accepted() {
    let mut exported = serde_json::to_value(export_scenario(&scenario())).unwrap();
    exported["version"] = json!("1.7");
    assert!(import_scenario(&exported, ImportMode::Restore).is_ok());
}

#[test]
fn test_garbage_version_rejected() {
    let mut exported = serde_json::to_value(export_scenario(&scenario())).unwrap();
    exported["version"] = json!("latest");
    assert!(import_scenario(&exported, ImportMode::Restore).is_err());
}

#[test]
fn test_inner_errors_are_prefixed() {
    let mut exported = serde_json::to_value(export_scenario(&scenario())).unwrap();
    exported["scenario"]["tableData"][0]["tableName"] = json!("ghosts");

    let errors = import_scenario(&exported, ImportMode::Restore).unwrap_err();
    assert!(errors.has_path("scenario.tableData[0].tableName"));
}
