//! Inbound request and resolved response descriptors

use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tb_core::MockId;

/// A request to be matched against the active mocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockRequest {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON body, a string for non-JSON payloads, `Null` when empty
    pub body: Value,
}

impl MockRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Header lookup ignoring ASCII case of the name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response produced by a matched endpoint, constants already resolved.
///
/// `delay` is advisory; the caller waits before responding.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResponse {
    pub mock_id: MockId,
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    pub delay: Option<Duration>,
}
