//! Plan command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use tb_core::{CoreResult, DdlTable, TableDag, TargetApi};
use tb_mock::MockMatchEngine;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::common::{load_project, load_scenario, ExitCode, EXIT_VALIDATION};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlannedTable {
    name: String,
    /// Dependency depth; tables on one level do not depend on each other
    level: usize,
    order: u32,
    dependencies: Vec<String>,
    rows: usize,
    truncate_before: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlannedMock {
    id: String,
    method: String,
    path: String,
    priority: i32,
    constraints: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Plan {
    scenario: String,
    tables: Vec<PlannedTable>,
    mocks: Vec<PlannedMock>,
    target_api: TargetApi,
}

/// Execute the plan command
pub(crate) async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let scenario = load_scenario(&project, &args.scenario)?;

    let (ordered, levels) = match creation_plan(&scenario.tables) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{}", e);
            return Err(ExitCode(EXIT_VALIDATION).into());
        }
    };

    let data = scenario.table_data_by_name();
    let tables = ordered
        .iter()
        .map(|t| {
            let entries = data.get(t.name.as_str()).map(Vec::as_slice).unwrap_or(&[]);
            PlannedTable {
                name: t.name.to_string(),
                level: levels.get(t.name.as_str()).copied().unwrap_or(0),
                order: t.order,
                dependencies: t.dependencies.iter().map(|d| d.to_string()).collect(),
                rows: entries.iter().map(|d| d.rows.len()).sum(),
                truncate_before: entries.iter().any(|d| d.truncate_before),
            }
        })
        .collect();

    // a scratch engine yields the mocks in match precedence
    let engine = MockMatchEngine::new();
    engine.activate(scenario.id.clone(), &scenario.mock_apis);
    let mocks = engine
        .snapshot()
        .endpoints()
        .iter()
        .map(|m| PlannedMock {
            id: m.id.to_string(),
            method: m.method.to_string(),
            path: m.path.clone(),
            priority: m.priority,
            constraints: m.constraint_count(),
        })
        .collect();

    let plan = Plan {
        scenario: scenario.id.to_string(),
        tables,
        mocks,
        target_api: scenario.target_api.resolved(),
    };

    match args.output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_plan(&plan),
    }
    Ok(())
}

/// Creation order plus each table's level in the dependency graph
fn creation_plan(tables: &[DdlTable]) -> CoreResult<(Vec<&DdlTable>, HashMap<&str, usize>)> {
    let dag = TableDag::build(tables)?;
    let ordered = dag.creation_order()?;
    let mut levels = HashMap::with_capacity(ordered.len());
    for (level, group) in dag.levels()?.into_iter().enumerate() {
        for table in group {
            levels.insert(table.name.as_str(), level);
        }
    }
    Ok((ordered, levels))
}

fn print_plan(plan: &Plan) {
    println!("Scenario: {}\n", plan.scenario);

    println!("Tables (creation order):");
    let width = plan.tables.iter().map(|t| t.name.len()).max().unwrap_or(0);
    for (i, t) in plan.tables.iter().enumerate() {
        let truncate = if t.truncate_before { ", truncate" } else { "" };
        let deps = if t.dependencies.is_empty() {
            String::new()
        } else {
            format!(" <- {}", t.dependencies.join(", "))
        };
        println!(
            "  {:>2}. {:<width$}  level {}, {} row(s){}{}",
            i + 1,
            t.name,
            t.level,
            t.rows,
            truncate,
            deps,
            width = width
        );
    }

    println!("\nMocks (match precedence):");
    if plan.mocks.is_empty() {
        println!("  (none)");
    }
    for m in &plan.mocks {
        println!(
            "  {:<7} {}  [{}] priority {}, {} constraint(s)",
            m.method, m.path, m.id, m.priority, m.constraints
        );
    }

    let target = &plan.target_api;
    println!("\nTarget API: {} {}", target.method, target.url);
    for (name, value) in &target.headers {
        println!("  {}: {}", name, value);
    }
    if let Some(body) = &target.body {
        println!("  body: {}", body);
    }
}
