//! Scenario application
//!
//! `apply` runs strictly in sequence: validate, order tables, create and
//! seed, then activate mocks. Validation and ordering failures happen before
//! any side effect. Mocks are only activated once every table step succeeded.

use crate::error::{ApplyError, ApplyResult};
use crate::seeder::TableSeeder;
use std::sync::Arc;
use tb_core::{
    order_tables, ApplyScenarioResult, DdlTable, ScenarioValidator, StructuralValidator,
    TestScenario,
};
use tb_db::TableExecutor;
use tb_mock::MockMatchEngine;

/// Materializes scenarios against an executor and a mock engine
pub struct ScenarioApplier {
    validator: Box<dyn ScenarioValidator>,
    seeder: TableSeeder,
    engine: Arc<MockMatchEngine>,
}

impl ScenarioApplier {
    pub fn new(engine: Arc<MockMatchEngine>) -> Self {
        Self {
            validator: Box::new(StructuralValidator),
            seeder: TableSeeder::new(),
            engine,
        }
    }

    /// Replace the default structural validator
    pub fn with_validator(mut self, validator: impl ScenarioValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn engine(&self) -> &Arc<MockMatchEngine> {
        &self.engine
    }

    /// Validate and order without touching the executor or the engine
    pub fn plan(&self, scenario: &TestScenario) -> ApplyResult<Vec<DdlTable>> {
        self.validator
            .validate(scenario)
            .map_err(ApplyError::Validation)?;

        for warning in tb_sql::lint_tables(&scenario.tables) {
            log::warn!("Scenario '{}': {}", scenario.id, warning);
        }

        order_tables(&scenario.tables).map_err(ApplyError::Ordering)
    }

    /// Apply a scenario.
    ///
    /// Activation replaces whatever mock set was active before. On an
    /// execution failure the error carries the counts reached so far and the
    /// previous mock set stays in place.
    pub async fn apply(
        &self,
        scenario: &TestScenario,
        executor: &dyn TableExecutor,
    ) -> ApplyResult<ApplyScenarioResult> {
        log::info!(
            "Applying scenario '{}' with {} executor",
            scenario.id,
            executor.executor_type()
        );
        let ordered = self.plan(scenario)?;

        let data_by_table = scenario.table_data_by_name();
        let counts = self
            .seeder
            .seed(&ordered, &data_by_table, executor)
            .await
            .map_err(|e| ApplyError::Execution {
                table: e.table,
                step: e.step,
                source: e.source,
                progress: ApplyScenarioResult {
                    tables_created: e.progress.tables_created,
                    data_inserted: e.progress.rows_inserted,
                    mocks_configured: 0,
                },
            })?;

        let mocks_configured = self
            .engine
            .activate(scenario.id.clone(), &scenario.mock_apis);

        let result = ApplyScenarioResult {
            tables_created: counts.tables_created,
            data_inserted: counts.rows_inserted,
            mocks_configured,
        };
        log::info!(
            "Applied scenario '{}': {} table(s), {} row(s), {} mock(s)",
            scenario.id,
            result.tables_created,
            result.data_inserted,
            result.mocks_configured
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "applier_test.rs"]
mod tests;
