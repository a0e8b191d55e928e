use super::*;
use crate::repository::{LayeredScenarioRepository, ScenarioRepository};
use tempfile::TempDir;

#[test]
fn test_parse_empty_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("{}").unwrap();
    assert!(config.name.is_none());
    assert_eq!(config.scenario_paths, vec!["scenarios".to_string()]);
    assert_eq!(config.database.path, "target/testbed.duckdb");
    assert_eq!(config.mock_server.host, "127.0.0.1");
    assert_eq!(config.mock_server.port, 4010);
    assert!(!config.mock_server.cors);
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: shop
scenario_paths:
  - fixtures/scenarios
  - shared
database:
  path: ":memory:"
mock_server:
  host: 0.0.0.0
  port: 9000
  cors: true
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.name.as_deref(), Some("shop"));
    assert_eq!(config.scenario_paths.len(), 2);
    assert_eq!(config.mock_server.port, 9000);
    assert!(config.mock_server.cors);

    let root = Path::new("/project");
    assert_eq!(
        config.scenario_paths_absolute(root),
        vec![root.join("fixtures/scenarios"), root.join("shared")]
    );
    assert_eq!(config.database_path(root), ":memory:");
}

#[test]
fn test_unknown_fields_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("nmae: typo\n");
    assert!(result.is_err());
}

#[test]
fn test_relative_database_path_resolved() {
    let config = Config::default();
    let root = Path::new("/project");
    assert_eq!(
        config.database_path(root),
        root.join("target/testbed.duckdb").display().to_string()
    );
}

#[test]
fn test_load_from_dir_without_file() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.mock_server.port, 4010);
}

#[test]
fn test_load_from_dir_reads_yaml_variant() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("testbed.yaml"), "mock_server:\n  port: 5050\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.mock_server.port, 5050);
}

#[test]
fn test_load_rejects_empty_scenario_paths() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("testbed.yml");
    std::fs::write(&path, "scenario_paths: []\n").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        Config::load(&dir.path().join("nope.yml")),
        Err(CoreError::ConfigNotFound { .. })
    ));
}

#[test]
fn test_every_scenario_path_is_searched() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("testbed.yml"),
        "scenario_paths:\n  - mine\n  - team\n",
    )
    .unwrap();
    let team = dir.path().join("team");
    std::fs::create_dir_all(&team).unwrap();
    std::fs::write(
        team.join("shared-login.json"),
        r#"{"id":"shared-login","name":"login","targetApi":{"method":"GET","url":"http://localhost/"},"createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}"#,
    )
    .unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    let repo = LayeredScenarioRepository::new(config.scenario_paths_absolute(dir.path()));
    assert_eq!(repo.require("shared-login").unwrap().name, "login");
    assert_eq!(repo.list().unwrap().len(), 1);
}
