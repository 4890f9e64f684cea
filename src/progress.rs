//! Key-value progress store: which functions a student has completed, how
//! many simulations they ran, and their per-module preferences.
//!
//! Bookkeeping must never break a simulation: a missing or corrupt store
//! loads as empty, and a failed save logs a warning and moves on.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-module progress record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleProgress {
    /// Feature keys (function names) completed at least once.
    pub completed: Vec<String>,
    /// Total animated runs, across features.
    pub simulations_run: u64,
    /// Free-form preferences (animation speed, simulation mode, ...).
    pub preferences: serde_json::Map<String, serde_json::Value>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// JSON-backed progress store keyed by module id.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
    modules: BTreeMap<String, ModuleProgress>,
}

impl ProgressStore {
    /// Where progress lives when the caller does not choose a path.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("id", "vlab", "vlab")
            .map(|dirs| dirs.data_dir().join("progress.json"))
            .unwrap_or_else(|| PathBuf::from("vlab_progress.json"))
    }

    /// Load the store, degrading to empty on any read or parse failure.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let modules = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(modules) => modules,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "progress file unreadable, starting empty");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, modules }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) {
        let write = || -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let raw = serde_json::to_string_pretty(&self.modules)?;
            std::fs::write(&self.path, raw)
        };
        if let Err(err) = write() {
            tracing::warn!(path = %self.path.display(), %err, "failed to save progress");
        }
    }

    fn module_mut(&mut self, module: &str) -> &mut ModuleProgress {
        self.modules.entry(module.to_string()).or_default()
    }

    fn touch(&mut self, module: &str) {
        self.module_mut(module).last_updated = Some(Utc::now());
    }

    pub fn module(&self, module: &str) -> Option<&ModuleProgress> {
        self.modules.get(module)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&String, &ModuleProgress)> {
        self.modules.iter()
    }

    /// Record a feature as completed (idempotent).
    pub fn mark_completed(&mut self, module: &str, feature: &str) {
        let record = self.module_mut(module);
        if !record.completed.iter().any(|f| f == feature) {
            record.completed.push(feature.to_string());
        }
        self.touch(module);
        self.save();
    }

    pub fn is_completed(&self, module: &str, feature: &str) -> bool {
        self.module(module)
            .map(|m| m.completed.iter().any(|f| f == feature))
            .unwrap_or(false)
    }

    pub fn completion_count(&self, module: &str) -> usize {
        self.module(module).map(|m| m.completed.len()).unwrap_or(0)
    }

    /// Bump the animated-run counter, returning the new count.
    pub fn increment_simulation_count(&mut self, module: &str) -> u64 {
        let record = self.module_mut(module);
        record.simulations_run += 1;
        let count = record.simulations_run;
        self.touch(module);
        self.save();
        count
    }

    pub fn set_preference(&mut self, module: &str, key: &str, value: serde_json::Value) {
        self.module_mut(module)
            .preferences
            .insert(key.to_string(), value);
        self.touch(module);
        self.save();
    }

    pub fn preference(&self, module: &str, key: &str) -> Option<&serde_json::Value> {
        self.module(module)?.preferences.get(key)
    }

    /// Wipe everything and persist the empty store.
    pub fn reset(&mut self) {
        self.modules.clear();
        self.save();
    }
}
