//! Mock match engine

use crate::matcher::endpoint_matches;
use crate::request::{MockRequest, ResolvedResponse};
use std::cmp::Reverse;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tb_core::{ConstantResolver, MockEndpoint, ScenarioId};

/// The mock set of one activated scenario.
///
/// Endpoints are enabled only and held in precedence order: highest
/// priority first, then most constraints, then smallest id.
#[derive(Debug, Default)]
pub struct ActiveMocks {
    scenario_id: Option<ScenarioId>,
    endpoints: Vec<MockEndpoint>,
}

impl ActiveMocks {
    fn new(scenario_id: ScenarioId, endpoints: &[MockEndpoint]) -> Self {
        let mut endpoints: Vec<MockEndpoint> =
            endpoints.iter().filter(|e| e.enabled).cloned().collect();
        endpoints.sort_by(|a, b| {
            (Reverse(a.priority), Reverse(a.constraint_count()), &a.id).cmp(&(
                Reverse(b.priority),
                Reverse(b.constraint_count()),
                &b.id,
            ))
        });
        Self {
            scenario_id: Some(scenario_id),
            endpoints,
        }
    }

    pub fn scenario_id(&self) -> Option<&ScenarioId> {
        self.scenario_id.as_ref()
    }

    pub fn endpoints(&self) -> &[MockEndpoint] {
        &self.endpoints
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// The winning endpoint for `request`, if any
    pub fn find(&self, request: &MockRequest) -> Option<&MockEndpoint> {
        self.endpoints
            .iter()
            .find(|e| endpoint_matches(e, request))
    }
}

/// Resolves inbound requests against the mocks of the active scenario.
///
/// One writer replaces the whole set on activation while any number of
/// readers match concurrently. Readers work on an `Arc` snapshot, so a
/// replacement never shows up half-applied.
#[derive(Debug, Default)]
pub struct MockMatchEngine {
    active: RwLock<Arc<ActiveMocks>>,
    resolver: ConstantResolver,
}

impl MockMatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active set with the enabled endpoints of a scenario.
    ///
    /// Returns the number of endpoints registered.
    pub fn activate(&self, scenario_id: ScenarioId, endpoints: &[MockEndpoint]) -> usize {
        let mocks = Arc::new(ActiveMocks::new(scenario_id, endpoints));
        let count = mocks.len();
        log::info!(
            "Activated {} mock(s) for scenario '{}'",
            count,
            mocks.scenario_id.as_ref().map(|s| s.as_str()).unwrap_or("")
        );
        *self.active.write().unwrap_or_else(|e| e.into_inner()) = mocks;
        count
    }

    /// Discard the active set, returning the scenario it belonged to
    pub fn deactivate(&self) -> Option<ScenarioId> {
        let previous = std::mem::take(&mut *self.active.write().unwrap_or_else(|e| e.into_inner()));
        if let Some(id) = previous.scenario_id() {
            log::info!("Deactivated mocks for scenario '{}'", id);
        }
        previous.scenario_id.clone()
    }

    pub fn active_scenario(&self) -> Option<ScenarioId> {
        self.snapshot().scenario_id.clone()
    }

    /// Consistent view of the current mock set
    pub fn snapshot(&self) -> Arc<ActiveMocks> {
        Arc::clone(&self.active.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Match a request and resolve the winning endpoint's response.
    ///
    /// `None` means no mock qualifies; the caller picks the fallback.
    pub fn match_request(&self, request: &MockRequest) -> Option<ResolvedResponse> {
        let mocks = self.snapshot();
        let Some(endpoint) = mocks.find(request) else {
            log::debug!("No mock matched {} {}", request.method, request.path);
            return None;
        };
        log::debug!(
            "{} {} matched mock '{}'",
            request.method,
            request.path,
            endpoint.id
        );

        let response = &endpoint.response;
        Some(ResolvedResponse {
            mock_id: endpoint.id.clone(),
            status: response.status,
            headers: self.resolver.resolve_headers(&response.headers),
            body: self.resolver.resolve(&response.body),
            delay: response.delay.map(Duration::from_millis),
        })
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
