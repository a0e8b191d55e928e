use super::*;

#[test]
fn test_inspect_simple_create() {
    let info = inspect_ddl("CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50))").unwrap();
    assert_eq!(info.created_table.as_deref(), Some("users"));
    assert!(info.references.is_empty());
}

#[test]
fn test_inspect_qualified_and_quoted_name() {
    let info = inspect_ddl(r#"CREATE TABLE IF NOT EXISTS main."Orders" (id INTEGER)"#).unwrap();
    assert_eq!(info.created_table.as_deref(), Some("orders"));
}

#[test]
fn test_column_and_table_level_references() {
    let sql = "CREATE TABLE order_items (
        id INTEGER,
        order_id INTEGER REFERENCES orders(id),
        product_id INTEGER,
        FOREIGN KEY (product_id) REFERENCES shop.products (id)
    )";
    let info = inspect_ddl(sql).unwrap();
    assert_eq!(info.references, vec!["orders".to_string(), "products".to_string()]);
}

#[test]
fn test_empty_ddl_rejected() {
    assert!(matches!(inspect_ddl("   "), Err(SqlError::EmptySql)));
}

#[test]
fn test_garbage_ddl_is_parse_error() {
    assert!(matches!(
        inspect_ddl("CREATE TABLE ("),
        Err(SqlError::ParseError(_))
    ));
}

#[test]
fn test_lint_clean_scenario() {
    let tables = vec![
        DdlTable::new("users", "CREATE TABLE users (id INTEGER PRIMARY KEY)"),
        DdlTable::new(
            "orders",
            "CREATE TABLE orders (id INTEGER, user_id INTEGER REFERENCES users(id))",
        )
        .with_dependencies(&["users"]),
    ];
    assert!(lint_tables(&tables).is_empty());
}

#[test]
fn test_lint_flags_undeclared_reference() {
    let tables = vec![
        DdlTable::new("users", "CREATE TABLE users (id INTEGER PRIMARY KEY)"),
        DdlTable::new(
            "orders",
            "CREATE TABLE orders (id INTEGER, user_id INTEGER REFERENCES users(id))",
        ),
    ];
    assert_eq!(
        lint_tables(&tables),
        vec![DdlWarning::UndeclaredReference {
            table: "orders".to_string(),
            referenced: "users".to_string(),
        }]
    );
}

#[test]
fn test_lint_ignores_external_references() {
    let tables = vec![DdlTable::new(
        "orders",
        "CREATE TABLE orders (id INTEGER, region_id INTEGER REFERENCES regions(id))",
    )];
    assert!(lint_tables(&tables).is_empty());
}

#[test]
fn test_lint_flags_name_mismatch_and_non_create() {
    let tables = vec![
        DdlTable::new("users", "CREATE TABLE people (id INTEGER)"),
        DdlTable::new("idx", "CREATE INDEX idx_people ON people (id)"),
    ];
    let warnings = lint_tables(&tables);
    assert_eq!(warnings.len(), 2);
    assert!(matches!(&warnings[0], DdlWarning::NameMismatch { found, .. } if found == "people"));
    assert!(matches!(&warnings[1], DdlWarning::NotCreateTable { table } if table == "idx"));
}

#[test]
fn test_lint_reports_unparseable() {
    let tables = vec![DdlTable::new("weird", "CREATE TABLE (")];
    let warnings = lint_tables(&tables);
    assert!(matches!(&warnings[0], DdlWarning::Unparseable { table, .. } if table == "weird"));
    assert!(warnings[0].to_string().contains("could not be parsed"));
}

#[test]
fn test_self_reference_is_not_a_dependency() {
    let tables = vec![DdlTable::new(
        "employees",
        "CREATE TABLE employees (id INTEGER PRIMARY KEY, manager_id INTEGER REFERENCES employees(id))",
    )];
    assert!(lint_tables(&tables).is_empty());
}
