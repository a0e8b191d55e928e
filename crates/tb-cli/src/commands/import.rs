//! Import command implementation

use anyhow::{Context, Result};
use std::path::Path;
use tb_core::{ImportMode, ScenarioRepository};

use crate::cli::{GlobalArgs, ImportArgs};
use crate::commands::common::{load_project, read_scenario_file};

/// Execute the import command
pub(crate) async fn execute(args: &ImportArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let mode = if args.restore {
        ImportMode::Restore
    } else {
        ImportMode::CreateNew
    };

    let scenario = read_scenario_file(Path::new(&args.file), mode)?;
    let repository = project.repository();
    if mode == ImportMode::Restore && repository.get(&scenario.id)?.is_some() {
        log::warn!("Overwriting stored scenario '{}'", scenario.id);
    }
    repository
        .save(&scenario)
        .with_context(|| format!("Failed to save scenario '{}'", scenario.id))?;

    println!("Imported '{}' as {}", scenario.name, scenario.id);
    Ok(())
}
