//! tb-db - Table executor layer for Testbed
//!
//! This crate provides the `TableExecutor` trait the seeder drives, a DuckDB
//! implementation, and a recording implementation for dry runs.

pub mod duckdb;
pub mod error;
pub mod recording;
pub mod traits;

pub use crate::duckdb::DuckDbExecutor;
pub use error::{DbError, DbResult};
pub use recording::{ExecutorCall, RecordingExecutor};
pub use traits::{ExecutorStep, TableExecutor};
