//! Recording executor used for dry runs and tests

use crate::error::{DbError, DbResult};
use crate::traits::{ExecutorStep, TableExecutor};
use async_trait::async_trait;
use std::sync::Mutex;
use tb_core::Row;

/// One operation observed by [`RecordingExecutor`]
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutorCall {
    CreateTable { table: String, ddl: String },
    Truncate { table: String },
    InsertRows { table: String, rows: Vec<Row> },
}

impl ExecutorCall {
    pub fn table(&self) -> &str {
        match self {
            ExecutorCall::CreateTable { table, .. }
            | ExecutorCall::Truncate { table }
            | ExecutorCall::InsertRows { table, .. } => table,
        }
    }

    pub fn step(&self) -> ExecutorStep {
        match self {
            ExecutorCall::CreateTable { .. } => ExecutorStep::CreateTable,
            ExecutorCall::Truncate { .. } => ExecutorStep::Truncate,
            ExecutorCall::InsertRows { .. } => ExecutorStep::InsertRows,
        }
    }
}

/// Executor that records every call instead of touching a database.
///
/// A failure can be injected for one table and step; the failing call is
/// still recorded.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<ExecutorCall>>,
    fail_on: Option<(String, ExecutorStep)>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail when `step` runs against `table`
    pub fn fail_on(mut self, table: impl Into<String>, step: ExecutorStep) -> Self {
        self.fail_on = Some((table.into(), step));
        self
    }

    /// Calls recorded so far, in order
    pub fn calls(&self) -> Vec<ExecutorCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn record(&self, call: ExecutorCall) -> DbResult<()> {
        let failure = match &self.fail_on {
            Some((table, step)) if table == call.table() && *step == call.step() => Some(
                DbError::execution(table, format!("injected failure during {}", step)),
            ),
            _ => None,
        };
        self.calls
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?
            .push(call);
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TableExecutor for RecordingExecutor {
    async fn create_table(&self, table: &str, ddl: &str) -> DbResult<()> {
        self.record(ExecutorCall::CreateTable {
            table: table.to_string(),
            ddl: ddl.to_string(),
        })
    }

    async fn truncate(&self, table: &str) -> DbResult<()> {
        self.record(ExecutorCall::Truncate {
            table: table.to_string(),
        })
    }

    async fn insert_rows(&self, table: &str, rows: &[Row]) -> DbResult<usize> {
        self.record(ExecutorCall::InsertRows {
            table: table.to_string(),
            rows: rows.to_vec(),
        })?;
        Ok(rows.len())
    }

    fn executor_type(&self) -> &'static str {
        "recording"
    }
}
