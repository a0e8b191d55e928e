//! Export command implementation

use anyhow::{Context, Result};
use tb_core::{export_scenario, ScenarioRepository};

use crate::cli::{ExportArgs, GlobalArgs};
use crate::commands::common::load_project;

/// Execute the export command
pub(crate) async fn execute(args: &ExportArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let scenario = project.repository().require(&args.id)?;

    let json = serde_json::to_string_pretty(&export_scenario(&scenario))
        .context("Failed to serialize export")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json + "\n").with_context(|| format!("Failed to write {}", path))?;
            println!("Exported '{}' to {}", scenario.id, path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
