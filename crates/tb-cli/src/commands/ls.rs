//! Ls command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use tb_core::ScenarioRepository;

use crate::cli::{GlobalArgs, LsArgs, OutputFormat};
use crate::commands::common::load_project;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioSummary {
    id: String,
    name: String,
    tables: usize,
    rows: usize,
    mocks: usize,
    tags: Vec<String>,
    updated_at: String,
}

/// Execute the ls command
pub(crate) async fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let repository = project.repository();
    let scenarios = repository.list().with_context(|| {
        let dirs: Vec<String> = repository
            .layers()
            .iter()
            .map(|layer| layer.root().display().to_string())
            .collect();
        format!("Failed to list {}", dirs.join(", "))
    })?;

    let summaries: Vec<ScenarioSummary> = scenarios
        .iter()
        .filter(|s| args.tag.as_ref().map_or(true, |tag| s.tags.contains(tag)))
        .map(|s| ScenarioSummary {
            id: s.id.to_string(),
            name: s.name.clone(),
            tables: s.tables.len(),
            rows: s.total_rows(),
            mocks: s.enabled_mocks().count(),
            tags: s.tags.clone(),
            updated_at: s.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        })
        .collect();

    match args.output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summaries).context("Failed to serialize list")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_table(&summaries),
    }
    Ok(())
}

fn print_table(summaries: &[ScenarioSummary]) {
    if summaries.is_empty() {
        println!("No scenarios found.");
        return;
    }

    let id_width = summaries.iter().map(|s| s.id.len()).max().unwrap_or(2).max(2);
    let name_width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(4).max(4);

    println!(
        "{:<id_width$}  {:<name_width$}  {:>6}  {:>5}  {:>5}  {:<16}  TAGS",
        "ID",
        "NAME",
        "TABLES",
        "ROWS",
        "MOCKS",
        "UPDATED",
        id_width = id_width,
        name_width = name_width
    );
    for s in summaries {
        println!(
            "{:<id_width$}  {:<name_width$}  {:>6}  {:>5}  {:>5}  {:<16}  {}",
            s.id,
            s.name,
            s.tables,
            s.rows,
            s.mocks,
            s.updated_at,
            s.tags.join(","),
            id_width = id_width,
            name_width = name_width
        );
    }
    println!("\n{} scenario(s)", summaries.len());
}
