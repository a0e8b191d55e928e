//! DuckDB table executor

use crate::error::{DbError, DbResult};
use crate::traits::TableExecutor;
use async_trait::async_trait;
use duckdb::types::Value as DuckValue;
use duckdb::{params_from_iter, Connection};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tb_core::Row;

/// DuckDB-backed executor
pub struct DuckDbExecutor {
    conn: Mutex<Connection>,
}

impl DuckDbExecutor {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DbError::ConnectionError(format!("{}: {}", parent.display(), e))
            })?;
        }
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute one or more statements outside any table operation
    #[cfg(any(test, feature = "test-support"))]
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Number of rows currently in `table`
    #[cfg(any(test, feature = "test-support"))]
    pub fn row_count(&self, table: &str) -> DbResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_qualified(table)?);
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(count as usize)
    }

    /// Text values of one column, in insertion order
    #[cfg(any(test, feature = "test-support"))]
    pub fn column_values(&self, table: &str, column: &str) -> DbResult<Vec<Option<String>>> {
        let sql = format!(
            "SELECT CAST({} AS VARCHAR) FROM {}",
            quote_ident(column)?,
            quote_qualified(table)?
        );
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::QueryError(e.to_string()))
    }

    /// Check whether a table or view exists
    #[cfg(any(test, feature = "test-support"))]
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (schema, table),
            None => ("main", name),
        };
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl TableExecutor for DuckDbExecutor {
    async fn create_table(&self, table: &str, ddl: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(ddl)
            .map_err(|e| DbError::execution(table, e.to_string()))
    }

    async fn truncate(&self, table: &str) -> DbResult<()> {
        let sql = format!("DELETE FROM {}", quote_qualified(table)?);
        let conn = self.lock()?;
        conn.execute(&sql, [])
            .map_err(|e| DbError::execution(table, e.to_string()))?;
        Ok(())
    }

    /// Rows for one table are written in a single transaction
    async fn insert_rows(&self, table: &str, rows: &[Row]) -> DbResult<usize> {
        let target = quote_qualified(table)?;
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| DbError::execution(table, e.to_string()))?;

        for (i, row) in rows.iter().enumerate() {
            let sql = insert_sql(&target, row)?;
            let params: Vec<DuckValue> = row.values().map(json_to_duck).collect();
            tx.execute(&sql, params_from_iter(params))
                .map_err(|e| DbError::execution(table, format!("row {}: {}", i, e)))?;
        }

        tx.commit()
            .map_err(|e| DbError::execution(table, e.to_string()))?;
        Ok(rows.len())
    }

    fn executor_type(&self) -> &'static str {
        "duckdb"
    }
}

fn insert_sql(target: &str, row: &Row) -> DbResult<String> {
    if row.is_empty() {
        return Ok(format!("INSERT INTO {} DEFAULT VALUES", target));
    }
    let columns = row
        .keys()
        .map(|k| quote_ident(k))
        .collect::<DbResult<Vec<_>>>()?;
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({})",
        target,
        columns.join(", "),
        placeholders
    ))
}

/// Map a JSON value to a DuckDB parameter; nested values are stored as JSON text
fn json_to_duck(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Bool(b) => DuckValue::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                DuckValue::BigInt(i)
            } else if let Some(u) = n.as_u64() {
                DuckValue::UBigInt(u)
            } else {
                DuckValue::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => DuckValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => DuckValue::Text(value.to_string()),
    }
}

fn quote_ident(ident: &str) -> DbResult<String> {
    if ident.is_empty() || ident.contains('\0') {
        return Err(DbError::InvalidIdentifier(ident.to_string()));
    }
    Ok(format!("\"{}\"", ident.replace('"', "\"\"")))
}

/// Quote each part of a possibly schema-qualified name
fn quote_qualified(name: &str) -> DbResult<String> {
    Ok(name
        .split('.')
        .map(quote_ident)
        .collect::<DbResult<Vec<_>>>()?
        .join("."))
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
