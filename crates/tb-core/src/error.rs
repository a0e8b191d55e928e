//! Error types for tb-core

use std::fmt;
use thiserror::Error;

/// Core error type for Testbed
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E011: Invalid configuration value
    #[error("[E011] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Table dependency graph contains a cycle
    #[error("[E004] Cyclic table dependency: {cycle}")]
    CyclicDependency {
        /// Human readable cycle path (`a -> b -> a`)
        cycle: String,
        /// Every table that could not be placed
        tables: Vec<String>,
    },

    /// E005: A table depends on a table that is not part of the scenario
    #[error("[E005] Unknown table dependency: {}", format_unknown(.missing))]
    UnknownDependency {
        /// `(table, missing dependency)` pairs
        missing: Vec<(String, String)>,
    },

    /// E006: Two tables share a name
    #[error("[E006] Duplicate table name: {name}")]
    DuplicateTable { name: String },

    /// E007: Scenario not found in the repository
    #[error("[E007] Scenario not found: {id}")]
    ScenarioNotFound { id: String },

    /// E012: Scenario id cannot be used as a file name
    #[error("[E012] Invalid scenario id '{id}': use letters, digits, '-', '_' or '.'")]
    InvalidScenarioId { id: String },

    /// E008: IO error with file path context
    #[error("[E008] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E009: IO error
    #[error("[E009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_unknown(missing: &[(String, String)]) -> String {
    missing
        .iter()
        .map(|(table, dep)| format!("'{}' depends on '{}'", table, dep))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// A single field-level violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path to the offending field (`tables[1].dependencies[0]`)
    pub path: String,

    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Every violation found while validating a scenario.
///
/// Validation never stops at the first problem; callers get the full list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, message));
    }

    /// Absorb another set, prefixing each path with `prefix`
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for err in other.errors {
            let path = if err.path.is_empty() {
                prefix.to_string()
            } else if prefix.is_empty() {
                err.path
            } else {
                format!("{}.{}", prefix, err.path)
            };
            self.errors.push(FieldError::new(path, err.message));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any violation was recorded at exactly `path`
    pub fn has_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
