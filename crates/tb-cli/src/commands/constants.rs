//! Constants command implementation

use anyhow::Result;
use tb_core::supported_tokens;

/// Execute the constants command
pub(crate) async fn execute() -> Result<()> {
    let width = supported_tokens()
        .iter()
        .map(|t| t.as_str().len())
        .max()
        .unwrap_or(0);
    for token in supported_tokens() {
        println!("{:<width$}  {}", token.as_str(), token.description(), width = width);
        println!("{:<width$}  e.g. {}", "", token.generate(), width = width);
    }
    println!("\nTokens followed by a letter, digit or underscore are not replaced.");
    Ok(())
}
