//! Table creation and seeding

use std::collections::HashMap;
use tb_core::{ConstantResolver, DdlTable, Row, TableData};
use tb_db::{DbError, ExecutorStep, TableExecutor};
use thiserror::Error;

/// Work completed by a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
    pub tables_created: usize,
    pub rows_inserted: usize,
}

/// An executor failure, with how far seeding got before it
#[derive(Error, Debug)]
#[error("{step} failed on table '{table}': {source}")]
pub struct SeedError {
    pub table: String,
    pub step: ExecutorStep,
    pub source: DbError,
    pub progress: SeedCounts,
}

/// Creates tables in the given order and seeds their rows
#[derive(Debug, Clone, Copy, Default)]
pub struct TableSeeder {
    resolver: ConstantResolver,
}

impl TableSeeder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create each table, then truncate and insert its data.
    ///
    /// `ordered` must already be in dependency order. Each table is created
    /// before any of its rows are written. The first executor failure stops
    /// the run; nothing already applied is undone.
    pub async fn seed(
        &self,
        ordered: &[DdlTable],
        data_by_table: &HashMap<&str, Vec<&TableData>>,
        executor: &dyn TableExecutor,
    ) -> Result<SeedCounts, SeedError> {
        let mut counts = SeedCounts::default();

        for table in ordered {
            let name = table.name.as_str();
            executor
                .create_table(name, &table.ddl)
                .await
                .map_err(|e| seed_error(name, ExecutorStep::CreateTable, e, counts))?;
            counts.tables_created += 1;
            log::debug!("Created table '{}'", name);

            let Some(entries) = data_by_table.get(name) else {
                continue;
            };
            for data in entries {
                if data.truncate_before {
                    executor
                        .truncate(name)
                        .await
                        .map_err(|e| seed_error(name, ExecutorStep::Truncate, e, counts))?;
                    log::debug!("Truncated table '{}'", name);
                }
                if data.rows.is_empty() {
                    continue;
                }

                let rows: Vec<Row> = data
                    .rows
                    .iter()
                    .map(|row| self.resolver.resolve_row(row))
                    .collect();
                let inserted = executor
                    .insert_rows(name, &rows)
                    .await
                    .map_err(|e| seed_error(name, ExecutorStep::InsertRows, e, counts))?;
                counts.rows_inserted += inserted;
                log::debug!("Inserted {} row(s) into '{}'", inserted, name);
            }
        }

        Ok(counts)
    }
}

fn seed_error(table: &str, step: ExecutorStep, source: DbError, progress: SeedCounts) -> SeedError {
    log::warn!("{} failed on table '{}': {}", step, table, source);
    SeedError {
        table: table.to_string(),
        step,
        source,
        progress,
    }
}

#[cfg(test)]
#[path = "seeder_test.rs"]
mod tests;
