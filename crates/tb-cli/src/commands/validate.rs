//! Validate command implementation

use anyhow::Result;
use tb_core::order_tables;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{load_project, load_scenario, ExitCode, EXIT_VALIDATION};

/// Execute the validate command
pub(crate) async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let scenario = load_scenario(&project, &args.scenario)?;

    let mut errors = 0;
    if let Err(e) = order_tables(&scenario.tables) {
        println!("[ERROR] {}", e);
        errors += 1;
    }

    let warnings = tb_sql::lint_tables(&scenario.tables);
    for warning in &warnings {
        println!("[WARNING] {}", warning);
    }

    println!(
        "Scenario '{}' ({}): {} table(s), {} mock(s), {} error(s), {} warning(s)",
        scenario.id,
        scenario.name,
        scenario.tables.len(),
        scenario.mock_apis.len(),
        errors,
        warnings.len()
    );

    if errors > 0 || (args.strict && !warnings.is_empty()) {
        return Err(ExitCode(EXIT_VALIDATION).into());
    }
    Ok(())
}
