//! Apply command implementation

use anyhow::{Context, Result};
use std::sync::Arc;
use tb_apply::{ApplyError, ScenarioApplier};
use tb_core::ApplyScenarioResult;
use tb_db::{RecordingExecutor, TableExecutor};
use tb_mock::MockMatchEngine;

use crate::cli::{ApplyArgs, GlobalArgs, OutputFormat};
use crate::commands::common::{
    load_project, load_scenario, ExitCode, EXIT_DATABASE, EXIT_VALIDATION,
};

/// Execute the apply command
pub(crate) async fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let scenario = load_scenario(&project, &args.scenario)?;

    let engine = Arc::new(MockMatchEngine::new());
    let applier = ScenarioApplier::new(Arc::clone(&engine));

    let recording = RecordingExecutor::new();
    let database;
    let executor: &dyn TableExecutor = if args.dry_run {
        &recording
    } else {
        database = project.open_database(global)?;
        &database
    };

    let result = match applier.apply(&scenario, executor).await {
        Ok(result) => result,
        Err(e) => return Err(report_failure(&e)),
    };

    if args.dry_run {
        for call in recording.calls() {
            println!("  {:<12} {}", call.step().to_string(), call.table());
        }
    }
    print_result(&scenario.id, &result, args.output)?;

    if args.serve {
        let addr = project.mock_addr(None, None).await?;
        println!("Serving mocks at http://{} (Ctrl+C to stop)", addr);
        tb_mock::serve(engine, addr, project.config.mock_server.cors)
            .await
            .context("Mock server failed")?;
    }
    Ok(())
}

fn print_result(id: &str, result: &ApplyScenarioResult, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(result).context("Failed to serialize result")?;
            println!("{}", json);
        }
        OutputFormat::Text => println!(
            "Applied '{}': {} table(s) created, {} row(s) inserted, {} mock(s) configured",
            id, result.tables_created, result.data_inserted, result.mocks_configured
        ),
    }
    Ok(())
}

fn report_failure(err: &ApplyError) -> anyhow::Error {
    eprintln!("{}", err);
    let code = match err {
        ApplyError::Validation(_) | ApplyError::Ordering(_) => EXIT_VALIDATION,
        ApplyError::Execution { progress, .. } => {
            eprintln!(
                "Partially applied: {} table(s) created, {} row(s) inserted; nothing was rolled back",
                progress.tables_created, progress.data_inserted
            );
            EXIT_DATABASE
        }
    };
    ExitCode(code).into()
}
