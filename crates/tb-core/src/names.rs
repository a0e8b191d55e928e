//! Strongly-typed identifiers used throughout a scenario.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Name of a table declared by a scenario's DDL section.
    pub struct TableName;
}

define_newtype_string! {
    /// Identifier of a mock endpoint, unique within a scenario.
    pub struct MockId;
}

define_newtype_string! {
    /// Identifier of a stored scenario.
    pub struct ScenarioId;
}

impl ScenarioId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
