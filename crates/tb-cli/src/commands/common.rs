//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tb_core::{
    check_scenario, import_scenario, Config, ImportMode, LayeredScenarioRepository,
    ScenarioRepository, TestScenario, ValidationErrors,
};
use tb_db::DuckDbExecutor;

use crate::cli::GlobalArgs;

/// Exit code for a scenario that fails validation
pub(crate) const EXIT_VALIDATION: i32 = 2;

/// Exit code for a database execution failure
pub(crate) const EXIT_DATABASE: i32 = 4;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; the command already reported the failure.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Loaded configuration plus the project root it is relative to
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// Every configured scenario directory, searched in order
    pub(crate) fn repository(&self) -> LayeredScenarioRepository {
        LayeredScenarioRepository::new(self.config.scenario_paths_absolute(&self.root))
    }

    /// Database path, honoring `--target`
    pub(crate) fn database_path(&self, global: &GlobalArgs) -> String {
        match &global.target {
            Some(target) => target.clone(),
            None => self.config.database_path(&self.root),
        }
    }

    pub(crate) fn open_database(&self, global: &GlobalArgs) -> Result<DuckDbExecutor> {
        let path = self.database_path(global);
        log::debug!("Opening database {}", path);
        DuckDbExecutor::new(&path).with_context(|| format!("Failed to open database {}", path))
    }

    pub(crate) async fn mock_addr(
        &self,
        host: Option<&str>,
        port: Option<u16>,
    ) -> Result<SocketAddr> {
        let host = host.unwrap_or(&self.config.mock_server.host);
        let port = port.unwrap_or(self.config.mock_server.port);
        Ok(tb_mock::socket_addr(host, port).await?)
    }
}

/// Load the project configuration
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load configuration")?;
    Ok(Project { root, config })
}

/// Load a scenario from a file, or from the repository by id.
///
/// Files may hold a bare scenario or an export wrapper. Stored scenarios are
/// checked again since they may have been edited by hand. Validation failures
/// are printed and turned into exit code 2.
pub(crate) fn load_scenario(project: &Project, source: &str) -> Result<TestScenario> {
    let path = Path::new(source);
    if path.is_file() {
        return read_scenario_file(path, ImportMode::Restore);
    }

    let scenario = project
        .repository()
        .require(source)
        .with_context(|| format!("'{}' is neither a file nor a stored scenario", source))?;
    check_scenario(&scenario).map_err(|errors| report_validation(path, &errors))?;
    Ok(scenario)
}

/// Read and validate a scenario document
pub(crate) fn read_scenario_file(path: &Path, mode: ImportMode) -> Result<TestScenario> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{}: invalid JSON: {}", path.display(), e);
            return Err(ExitCode(EXIT_VALIDATION).into());
        }
    };
    import_scenario(&value, mode).map_err(|errors| report_validation(path, &errors))
}

/// Print validation errors and produce the matching exit code
pub(crate) fn report_validation(path: &Path, errors: &ValidationErrors) -> anyhow::Error {
    eprintln!(
        "{}: {} validation error(s)\n{}",
        path.display(),
        errors.len(),
        errors
    );
    ExitCode(EXIT_VALIDATION).into()
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
