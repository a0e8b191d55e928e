//! Rm command implementation

use anyhow::{bail, Result};
use tb_core::ScenarioRepository;

use crate::cli::{GlobalArgs, RmArgs};
use crate::commands::common::load_project;

/// Execute the rm command
pub(crate) async fn execute(args: &RmArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    if !project.repository().delete(&args.id)? {
        bail!("Scenario '{}' not found", args.id);
    }
    println!("Removed '{}'", args.id);
    Ok(())
}
