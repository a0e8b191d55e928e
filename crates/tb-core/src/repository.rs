//! Scenario storage
//!
//! The core only needs get/list/save/delete by id. Scenarios are stored as
//! one pretty-printed JSON document per id.

use crate::error::{CoreError, CoreResult};
use crate::names::ScenarioId;
use crate::scenario::TestScenario;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Opaque scenario store
pub trait ScenarioRepository: Send + Sync {
    fn get(&self, id: &str) -> CoreResult<Option<TestScenario>>;

    /// All scenarios, sorted by id
    fn list(&self) -> CoreResult<Vec<TestScenario>>;

    fn save(&self, scenario: &TestScenario) -> CoreResult<()>;

    /// Returns `true` when a scenario was removed
    fn delete(&self, id: &str) -> CoreResult<bool>;

    /// Like [`get`](Self::get) but a missing scenario is an error
    fn require(&self, id: &str) -> CoreResult<TestScenario> {
        self.get(id)?
            .ok_or_else(|| CoreError::ScenarioNotFound { id: id.to_string() })
    }
}

/// Directory of `<id>.json` files
#[derive(Debug, Clone)]
pub struct FileScenarioRepository {
    root: PathBuf,
}

impl FileScenarioRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> CoreResult<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && id != "."
            && id != "..";
        if !safe {
            return Err(CoreError::InvalidScenarioId { id: id.to_string() });
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    fn read(path: &Path) -> CoreResult<TestScenario> {
        let content = fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ScenarioRepository for FileScenarioRepository {
    fn get(&self, id: &str) -> CoreResult<Option<TestScenario>> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    fn list(&self) -> CoreResult<Vec<TestScenario>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| CoreError::IoWithPath {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let mut scenarios = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json") {
                match Self::read(&path) {
                    Ok(scenario) => scenarios.push(scenario),
                    Err(e) => log::warn!("Skipping unreadable scenario {}: {}", path.display(), e),
                }
            }
        }

        scenarios.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(scenarios)
    }

    /// Write to a temporary file, then rename over the target
    fn save(&self, scenario: &TestScenario) -> CoreResult<()> {
        let path = self.path_for(scenario.id.as_str())?;
        fs::create_dir_all(&self.root).map_err(|e| CoreError::IoWithPath {
            path: self.root.display().to_string(),
            source: e,
        })?;

        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(scenario)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        log::debug!("Saved scenario '{}' to {}", scenario.id, path.display());
        Ok(())
    }

    fn delete(&self, id: &str) -> CoreResult<bool> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }
}

/// Several scenario directories searched in order.
///
/// Reads see every directory; an id found in an earlier directory shadows the
/// same id further down. New scenarios are saved to the first directory.
#[derive(Debug, Clone)]
pub struct LayeredScenarioRepository {
    layers: Vec<FileScenarioRepository>,
}

impl LayeredScenarioRepository {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            layers: dirs.into_iter().map(FileScenarioRepository::new).collect(),
        }
    }

    pub fn layers(&self) -> &[FileScenarioRepository] {
        &self.layers
    }

    fn primary(&self) -> CoreResult<&FileScenarioRepository> {
        self.layers.first().ok_or_else(|| CoreError::ConfigInvalid {
            message: "No scenario directory configured".to_string(),
        })
    }
}

impl ScenarioRepository for LayeredScenarioRepository {
    fn get(&self, id: &str) -> CoreResult<Option<TestScenario>> {
        for layer in &self.layers {
            if let Some(scenario) = layer.get(id)? {
                return Ok(Some(scenario));
            }
        }
        Ok(None)
    }

    fn list(&self) -> CoreResult<Vec<TestScenario>> {
        let mut merged: BTreeMap<ScenarioId, TestScenario> = BTreeMap::new();
        for layer in &self.layers {
            for scenario in layer.list()? {
                if merged.contains_key(&scenario.id) {
                    log::debug!(
                        "Scenario '{}' in {} is shadowed by an earlier directory",
                        scenario.id,
                        layer.root().display()
                    );
                    continue;
                }
                merged.insert(scenario.id.clone(), scenario);
            }
        }
        Ok(merged.into_values().collect())
    }

    fn save(&self, scenario: &TestScenario) -> CoreResult<()> {
        self.primary()?.save(scenario)
    }

    /// Removes the copy that [`get`](ScenarioRepository::get) would return
    fn delete(&self, id: &str) -> CoreResult<bool> {
        for layer in &self.layers {
            if layer.delete(id)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryScenarioRepository {
    scenarios: RwLock<BTreeMap<ScenarioId, TestScenario>>,
}

impl InMemoryScenarioRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioRepository for InMemoryScenarioRepository {
    fn get(&self, id: &str) -> CoreResult<Option<TestScenario>> {
        let guard = self.scenarios.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> CoreResult<Vec<TestScenario>> {
        let guard = self.scenarios.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.values().cloned().collect())
    }

    fn save(&self, scenario: &TestScenario) -> CoreResult<()> {
        let mut guard = self.scenarios.write().unwrap_or_else(|e| e.into_inner());
        guard.insert(scenario.id.clone(), scenario.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> CoreResult<bool> {
        let mut guard = self.scenarios.write().unwrap_or_else(|e| e.into_inner());
        Ok(guard.remove(id).is_some())
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;
