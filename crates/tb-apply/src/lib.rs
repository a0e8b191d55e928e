//! tb-apply - Scenario application for Testbed
//!
//! [`ScenarioApplier`] validates a scenario, orders its tables, seeds them
//! through a [`tb_db::TableExecutor`] and finally activates its mocks.

pub mod applier;
pub mod error;
pub mod seeder;

pub use applier::ScenarioApplier;
pub use error::{ApplyError, ApplyResult};
pub use seeder::{SeedCounts, SeedError, TableSeeder};
