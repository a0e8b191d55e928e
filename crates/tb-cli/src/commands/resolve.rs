//! Resolve command implementation

use anyhow::{Context, Result};
use serde_json::Value;
use tb_core::ConstantResolver;

use crate::cli::ResolveArgs;

/// Execute the resolve command
pub(crate) async fn execute(args: &ResolveArgs) -> Result<()> {
    let value = parse_input(&args.value);
    let resolved = ConstantResolver::new().resolve(&value);
    let json = serde_json::to_string_pretty(&resolved).context("Failed to serialize value")?;
    println!("{}", json);
    Ok(())
}

/// JSON when it parses, otherwise the raw text as a string
fn parse_input(input: &str) -> Value {
    serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input(r#"{"id":"$UUID"}"#), json!({ "id": "$UUID" }));
        assert_eq!(parse_input("user-$SEQ"), json!("user-$SEQ"));
    }
}
