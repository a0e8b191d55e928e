//! Serve command implementation

use anyhow::{Context, Result};
use std::sync::Arc;
use tb_mock::MockMatchEngine;

use crate::cli::{GlobalArgs, ServeArgs};
use crate::commands::common::{load_project, load_scenario};

/// Execute the serve command
pub(crate) async fn execute(args: &ServeArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let scenario = load_scenario(&project, &args.scenario)?;

    let engine = Arc::new(MockMatchEngine::new());
    let count = engine.activate(scenario.id.clone(), &scenario.mock_apis);

    let addr = project.mock_addr(args.host.as_deref(), args.port).await?;
    println!(
        "Serving {} mock(s) for '{}' at http://{} (Ctrl+C to stop)",
        count, scenario.id, addr
    );
    tb_mock::serve(engine, addr, project.config.mock_server.cors)
        .await
        .context("Mock server failed")
}
