//! Scenario validation
//!
//! Untyped JSON is turned into a [`TestScenario`] at the boundary. Every
//! problem is collected into one [`ValidationErrors`] so authors can fix a
//! scenario in one pass; components downstream only ever see typed, checked
//! data.

use crate::error::ValidationErrors;
use crate::scenario::{
    DdlTable, ExpectedResponse, MockEndpoint, TableData, TargetApi, TestScenario,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Checks a typed scenario before it is applied
pub trait ScenarioValidator: Send + Sync {
    fn validate(&self, scenario: &TestScenario) -> Result<(), ValidationErrors>;
}

/// Shape and referential-integrity checks performed by [`check_scenario`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl ScenarioValidator for StructuralValidator {
    fn validate(&self, scenario: &TestScenario) -> Result<(), ValidationErrors> {
        check_scenario(scenario)
    }
}

/// Parse an untyped value into a fully-populated scenario.
///
/// Optional fields receive their defaults. On failure the error lists every
/// field-level problem found, not just the first.
pub fn parse_scenario(value: &Value) -> Result<TestScenario, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let Some(obj) = value.as_object() else {
        errors.push("", "scenario must be a JSON object");
        return Err(errors);
    };

    let id = required(obj, "id", &mut errors);
    let name = required(obj, "name", &mut errors);
    let target_api = required::<TargetApi>(obj, "targetApi", &mut errors);
    let description = optional(obj, "description", &mut errors);
    let tables = list::<DdlTable>(obj, "tables", &mut errors);
    let table_data = list::<TableData>(obj, "tableData", &mut errors);
    let mock_apis = list::<MockEndpoint>(obj, "mockApis", &mut errors);
    let expected_response = optional::<ExpectedResponse>(obj, "expectedResponse", &mut errors);
    let tags = optional::<Vec<String>>(obj, "tags", &mut errors).unwrap_or_default();
    let created_at = optional::<DateTime<Utc>>(obj, "createdAt", &mut errors);
    let updated_at = optional::<DateTime<Utc>>(obj, "updatedAt", &mut errors);

    let (Some(id), Some(name), Some(target_api)) = (id, name, target_api) else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let now = Utc::now();
    let scenario = TestScenario {
        id,
        name,
        description,
        target_api,
        tables,
        table_data,
        mock_apis,
        expected_response,
        tags,
        created_at: created_at.unwrap_or(now),
        updated_at: updated_at.unwrap_or(now),
    };

    check_scenario(&scenario)?;
    Ok(scenario)
}

/// Parse a JSON document into a scenario
pub fn parse_scenario_str(json: &str) -> Result<TestScenario, ValidationErrors> {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => parse_scenario(&value),
        Err(e) => {
            let mut errors = ValidationErrors::new();
            errors.push("", format!("invalid JSON: {}", e));
            Err(errors)
        }
    }
}

fn required<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match obj.get(key) {
        None | Some(Value::Null) => {
            errors.push(key, "required field is missing");
            None
        }
        Some(v) => decode(v.clone(), key, errors),
    }
}

fn optional<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(v) => decode(v.clone(), key, errors),
    }
}

/// Decode each array element on its own so one bad entry does not hide others
fn list<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Vec<T> {
    match obj.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| decode(item.clone(), &format!("{}[{}]", key, i), errors))
            .collect(),
        Some(_) => {
            errors.push(key, "expected an array");
            Vec::new()
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value, path: &str, errors: &mut ValidationErrors) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(path, e.to_string());
            None
        }
    }
}

/// Referential-integrity and value checks over a typed scenario
pub fn check_scenario(scenario: &TestScenario) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if scenario.name.trim().is_empty() {
        errors.push("name", "must not be empty");
    }
    if scenario.target_api.url.trim().is_empty() {
        errors.push("targetApi.url", "must not be empty");
    }

    let mut table_names = HashSet::with_capacity(scenario.tables.len());
    for (i, table) in scenario.tables.iter().enumerate() {
        if !table_names.insert(table.name.as_str()) {
            errors.push(
                format!("tables[{}].name", i),
                format!("duplicate table name '{}'", table.name),
            );
        }
        if table.ddl.trim().is_empty() {
            errors.push(format!("tables[{}].ddl", i), "must not be empty");
        }
    }

    for (i, table) in scenario.tables.iter().enumerate() {
        for (j, dep) in table.dependencies.iter().enumerate() {
            let path = format!("tables[{}].dependencies[{}]", i, j);
            if *dep == table.name {
                errors.push(path, format!("table '{}' depends on itself", table.name));
            } else if !table_names.contains(dep.as_str()) {
                errors.push(path, format!("unknown table '{}'", dep));
            }
        }
    }

    for (i, data) in scenario.table_data.iter().enumerate() {
        if !table_names.contains(data.table_name.as_str()) {
            errors.push(
                format!("tableData[{}].tableName", i),
                format!("unknown table '{}'", data.table_name),
            );
        }
    }

    let mut mock_ids = HashSet::with_capacity(scenario.mock_apis.len());
    for (i, mock) in scenario.mock_apis.iter().enumerate() {
        if !mock_ids.insert(mock.id.as_str()) {
            errors.push(
                format!("mockApis[{}].id", i),
                format!("duplicate mock id '{}'", mock.id),
            );
        }
        if !mock.path.starts_with('/') {
            errors.push(format!("mockApis[{}].path", i), "must start with '/'");
        }
        if !is_valid_status(mock.response.status) {
            errors.push(
                format!("mockApis[{}].response.status", i),
                format!("invalid HTTP status {}", mock.response.status),
            );
        }
        if let Some(rm) = &mock.request_match {
            if rm.headers.keys().any(|k| k.trim().is_empty()) {
                errors.push(
                    format!("mockApis[{}].requestMatch.headers", i),
                    "header names must not be empty",
                );
            }
        }
    }

    if let Some(status) = scenario.expected_response.as_ref().and_then(|e| e.status) {
        if !is_valid_status(status) {
            errors.push(
                "expectedResponse.status",
                format!("invalid HTTP status {}", status),
            );
        }
    }

    errors.into_result()
}

fn is_valid_status(status: u16) -> bool {
    (100..=599).contains(&status)
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
