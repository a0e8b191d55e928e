//! Test scenario data model
//!
//! A scenario bundles the API call under test with everything that must exist
//! before the call is made: table definitions, seed rows and mock endpoints.
//! The JSON shape uses camelCase field names.

use crate::constants::ConstantResolver;
use crate::names::{MockId, ScenarioId, TableName};
use crate::serde_helpers::{default_status, default_true};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// A single seed row: column name to value
pub type Row = serde_json::Map<String, Value>;

/// A named bundle of target API call, table definitions, seed data and mocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestScenario {
    pub id: ScenarioId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The API call this scenario prepares for
    pub target_api: TargetApi,

    /// Table definitions, in authoring order
    #[serde(default)]
    pub tables: Vec<DdlTable>,

    /// Rows to seed per table
    #[serde(default)]
    pub table_data: Vec<TableData>,

    /// Mock endpoints activated with the scenario
    #[serde(default)]
    pub mock_apis: Vec<MockEndpoint>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_response: Option<ExpectedResponse>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl TestScenario {
    /// Seed data keyed by table name.
    ///
    /// When a table appears more than once in `tableData` the entries are
    /// kept in declaration order.
    pub fn table_data_by_name(&self) -> HashMap<&str, Vec<&TableData>> {
        let mut map: HashMap<&str, Vec<&TableData>> = HashMap::new();
        for data in &self.table_data {
            map.entry(data.table_name.as_str()).or_default().push(data);
        }
        map
    }

    /// Mock endpoints with `enabled = true`
    pub fn enabled_mocks(&self) -> impl Iterator<Item = &MockEndpoint> {
        self.mock_apis.iter().filter(|m| m.enabled)
    }

    /// Total number of seed rows across all tables
    pub fn total_rows(&self) -> usize {
        self.table_data.iter().map(|d| d.rows.len()).sum()
    }
}

/// HTTP method of a target call or mock endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| format!("unsupported HTTP method '{}'", s))
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HttpMethod {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The API call a scenario is built around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetApi {
    #[serde(default)]
    pub method: HttpMethod,

    pub url: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// Request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl TargetApi {
    /// This call with constants in headers and body resolved
    pub fn resolved(&self) -> TargetApi {
        ConstantResolver::new().resolve_target(self)
    }
}

/// A table definition: raw DDL plus the metadata used to order it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DdlTable {
    pub name: TableName,

    /// Raw schema statement, executed verbatim
    pub ddl: String,

    /// Tables that must be created before this one
    #[serde(default)]
    pub dependencies: Vec<TableName>,

    /// Tie-break hint among tables whose dependencies are satisfied
    #[serde(default)]
    pub order: u32,
}

impl DdlTable {
    pub fn new(name: impl Into<String>, ddl: impl Into<String>) -> Self {
        Self {
            name: TableName::new(name),
            ddl: ddl.into(),
            dependencies: Vec::new(),
            order: 0,
        }
    }

    pub fn with_dependencies(mut self, deps: &[&str]) -> Self {
        self.dependencies = deps.iter().map(|d| TableName::new(*d)).collect();
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }
}

/// Rows to seed into one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub table_name: TableName,

    #[serde(default)]
    pub rows: Vec<Row>,

    /// Empty the table before inserting
    #[serde(default)]
    pub truncate_before: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_columns: Option<Vec<String>>,
}

impl TableData {
    pub fn new(table_name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            table_name: TableName::new(table_name),
            rows,
            truncate_before: false,
            read_only: None,
            encrypted_columns: None,
        }
    }
}

/// A declarative rule mapping a request pattern to a canned response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockEndpoint {
    pub id: MockId,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Higher wins when several endpoints match
    #[serde(default)]
    pub priority: i32,

    pub method: HttpMethod,

    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_match: Option<RequestMatch>,

    pub response: MockResponse,
}

impl MockEndpoint {
    /// Number of request constraints beyond method and path
    pub fn constraint_count(&self) -> usize {
        self.request_match
            .as_ref()
            .map(RequestMatch::constraint_count)
            .unwrap_or(0)
    }
}

/// Subset-match criteria; unspecified fields match anything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMatch {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RequestMatch {
    pub fn constraint_count(&self) -> usize {
        self.query.len() + self.headers.len() + usize::from(self.body.is_some())
    }
}

/// Canned response returned by a mock endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockResponse {
    #[serde(default = "default_status")]
    pub status: u16,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub body: Value,

    /// Advisory delay in milliseconds before responding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: default_status(),
            headers: BTreeMap::new(),
            body: Value::Null,
            delay: None,
        }
    }
}

/// What the target API call is expected to return
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Counters produced by one apply run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyScenarioResult {
    pub tables_created: usize,
    pub data_inserted: usize,
    pub mocks_configured: usize,
}

#[cfg(test)]
#[path = "scenario_test.rs"]
mod tests;
