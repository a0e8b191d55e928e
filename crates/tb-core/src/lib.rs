//! tb-core - Core library for Testbed
//!
//! This crate provides the scenario data model, dynamic constant resolution,
//! table dependency ordering, scenario validation, export/import and the
//! scenario repository used across all Testbed components.

pub mod config;
pub mod constants;
pub mod dag;
pub mod error;
pub mod export;
pub mod names;
mod newtype_string;
pub mod repository;
pub mod scenario;
pub(crate) mod serde_helpers;
pub mod validation;

pub use config::Config;
pub use constants::{supported_tokens, ConstantResolver, ConstantToken};
pub use dag::{order_tables, TableDag};
pub use error::{CoreError, CoreResult, FieldError, ValidationErrors};
pub use export::{export_scenario, import_scenario, ImportMode, ScenarioExport};
pub use names::{MockId, ScenarioId, TableName};
pub use repository::{
    FileScenarioRepository, InMemoryScenarioRepository, LayeredScenarioRepository,
    ScenarioRepository,
};
pub use scenario::{
    ApplyScenarioResult, DdlTable, ExpectedResponse, HttpMethod, MockEndpoint, MockResponse,
    RequestMatch, Row, TableData, TargetApi, TestScenario,
};
pub use validation::{
    check_scenario, parse_scenario, parse_scenario_str, ScenarioValidator, StructuralValidator,
};
