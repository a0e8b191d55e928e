//! Error types for tb-db

use thiserror::Error;

/// Executor errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed on '{table}': {message}")]
    ExecutionError { table: String, message: String },

    /// Identifier cannot be quoted safely (D003)
    #[error("[D003] Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Mutex poisoned (D004)
    #[error("[D004] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Query error outside of a table operation (D005)
    #[error("[D005] Query failed: {0}")]
    QueryError(String),
}

impl DbError {
    pub fn execution(table: &str, message: impl Into<String>) -> Self {
        DbError::ExecutionError {
            table: table.to_string(),
            message: message.into(),
        }
    }

    /// Table the failure originated from, when known
    pub fn table(&self) -> Option<&str> {
        match self {
            DbError::ExecutionError { table, .. } => Some(table),
            _ => None,
        }
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
