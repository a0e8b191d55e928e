//! tb-mock - Mock endpoint matching for Testbed
//!
//! [`MockMatchEngine`] holds the mock set of the active scenario and resolves
//! inbound requests to canned responses. [`server`] exposes the engine over
//! HTTP with axum.

pub mod engine;
pub mod error;
pub mod matcher;
pub mod request;
pub mod server;

pub use engine::{ActiveMocks, MockMatchEngine};
pub use error::{MockError, MockResult};
pub use matcher::{body_contains, path_matches};
pub use request::{MockRequest, ResolvedResponse};
pub use server::{mock_router, serve, socket_addr};
