//! Scenario export/import wrapper
//!
//! Exported scenarios are wrapped as `{version, exportedAt, scenario}`. Import
//! accepts the wrapper or a bare scenario object and runs the usual
//! validation over it.

use crate::error::ValidationErrors;
use crate::names::ScenarioId;
use crate::scenario::TestScenario;
use crate::validation::parse_scenario;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format version written by [`export_scenario`]
pub const EXPORT_VERSION: &str = "1.0";

/// Highest major version this build can read
pub const SUPPORTED_MAJOR_VERSION: u32 = 1;

/// Portable envelope around a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioExport {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub scenario: TestScenario,
}

/// How imported identity and timestamps are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Keep the exported id and timestamps
    Restore,
    /// Assign a fresh id and stamp creation time
    #[default]
    CreateNew,
}

pub fn export_scenario(scenario: &TestScenario) -> ScenarioExport {
    ScenarioExport {
        version: EXPORT_VERSION.to_string(),
        exported_at: Utc::now(),
        scenario: scenario.clone(),
    }
}

/// Import a wrapped or bare scenario
pub fn import_scenario(value: &Value, mode: ImportMode) -> Result<TestScenario, ValidationErrors> {
    let wrapped = value
        .as_object()
        .and_then(|obj| obj.get("scenario"))
        .filter(|s| s.is_object());

    let mut scenario = match wrapped {
        Some(inner) => {
            let mut errors = ValidationErrors::new();
            if let Some(version) = value.get("version") {
                check_version(version, &mut errors);
            }
            match parse_scenario(inner) {
                Ok(scenario) if errors.is_empty() => scenario,
                Ok(_) => return Err(errors),
                Err(inner_errors) => {
                    errors.extend_prefixed("scenario", inner_errors);
                    return Err(errors);
                }
            }
        }
        None => parse_scenario(value)?,
    };

    if mode == ImportMode::CreateNew {
        let now = Utc::now();
        scenario.id = ScenarioId::generate();
        scenario.created_at = now;
        scenario.updated_at = now;
    }

    log::debug!("Imported scenario '{}' ({:?})", scenario.id, mode);
    Ok(scenario)
}

fn check_version(version: &Value, errors: &mut ValidationErrors) {
    let Some(text) = version.as_str() else {
        errors.push("version", "must be a string");
        return;
    };
    let major = text.split('.').next().and_then(|m| m.trim().parse::<u32>().ok());
    match major {
        None => errors.push("version", format!("unrecognized version '{}'", text)),
        Some(major) if major > SUPPORTED_MAJOR_VERSION => errors.push(
            "version",
            format!(
                "version '{}' is newer than supported major version {}",
                text, SUPPORTED_MAJOR_VERSION
            ),
        ),
        Some(_) => {}
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
