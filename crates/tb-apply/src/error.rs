//! Error types for tb-apply

use tb_core::{ApplyScenarioResult, CoreError, ValidationErrors};
use tb_db::{DbError, ExecutorStep};
use thiserror::Error;

/// Apply errors
#[derive(Error, Debug)]
pub enum ApplyError {
    /// Scenario failed validation; nothing was applied (A001)
    #[error("[A001] Scenario validation failed:\n{0}")]
    Validation(ValidationErrors),

    /// Tables cannot be ordered; nothing was applied (A002)
    #[error("[A002] Cannot order tables: {0}")]
    Ordering(#[source] CoreError),

    /// Executor failed part way; earlier steps stay applied (A003)
    #[error(
        "[A003] {step} failed on table '{table}' after {} table(s) and {} row(s): {source}",
        progress.tables_created,
        progress.data_inserted
    )]
    Execution {
        table: String,
        step: ExecutorStep,
        source: DbError,
        progress: ApplyScenarioResult,
    },
}

impl ApplyError {
    /// Counts reached before the failure
    pub fn progress(&self) -> ApplyScenarioResult {
        match self {
            ApplyError::Execution { progress, .. } => *progress,
            _ => ApplyScenarioResult::default(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApplyError::Validation(_))
    }
}

/// Result type alias for ApplyError
pub type ApplyResult<T> = Result<T, ApplyError>;
