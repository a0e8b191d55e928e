//! Table executor trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use std::fmt;
use tb_core::Row;

/// The three operations a scenario performs against a database
#[async_trait]
pub trait TableExecutor: Send + Sync {
    /// Run a table's DDL statement verbatim
    async fn create_table(&self, table: &str, ddl: &str) -> DbResult<()>;

    /// Remove every row from a table
    async fn truncate(&self, table: &str) -> DbResult<()>;

    /// Insert rows in order, returning how many were written
    async fn insert_rows(&self, table: &str, rows: &[Row]) -> DbResult<usize>;

    /// Executor identifier for logging
    fn executor_type(&self) -> &'static str;
}

/// Which executor operation was running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutorStep {
    CreateTable,
    Truncate,
    InsertRows,
}

impl fmt::Display for ExecutorStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorStep::CreateTable => write!(f, "create table"),
            ExecutorStep::Truncate => write!(f, "truncate"),
            ExecutorStep::InsertRows => write!(f, "insert rows"),
        }
    }
}
