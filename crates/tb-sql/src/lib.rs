//! tb-sql - DDL inspection for Testbed
//!
//! Scenario DDL is executed verbatim; this crate only reads enough of it to
//! check that a table's declared dependencies agree with its foreign keys.

pub mod ddl;
pub mod error;

pub use ddl::{inspect_ddl, lint_tables, referenced_tables, DdlInfo, DdlWarning};
pub use error::SqlError;
