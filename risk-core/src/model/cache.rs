//! Model Cache - lazily loaded models keyed by name
//!
//! Entries are loaded on first use and kept until invalidated, either
//! explicitly (`invalidate`, `invalidate_all`, `reload`) or by the file
//! watcher when an artifact changes on disk.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::Serialize;

use crate::error::ScoringResult;
use crate::features::ColumnSpec;
use super::artifact::{load_model, LoadedModel, ModelMetrics};
use super::registry::ModelRegistry;

/// Cache status for one configured model
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    pub name: String,
    pub path: String,
    pub is_default: bool,
    pub loaded: bool,
    pub kind: Option<String>,
    pub sha256: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub metrics: Option<ModelMetrics>,
}

pub struct ModelCache {
    registry: ModelRegistry,
    columns: ColumnSpec,
    entries: RwLock<HashMap<String, Arc<LoadedModel>>>,
}

impl ModelCache {
    pub fn new(registry: ModelRegistry, columns: ColumnSpec) -> Self {
        Self {
            registry,
            columns,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    /// Get a model by optional name, loading it on a miss
    pub fn get(&self, name: Option<&str>) -> ScoringResult<Arc<LoadedModel>> {
        let (name, path) = self.registry.resolve(name)?;

        if let Some(model) = self.entries.read().get(name) {
            log::debug!("Model cache hit: {}", name);
            return Ok(model.clone());
        }

        log::debug!("Model cache miss: {}", name);
        let loaded = Arc::new(load_model(name, path, &self.columns)?);

        // Another request may have loaded it meanwhile; keep the first
        let mut entries = self.entries.write();
        let entry = entries.entry(name.to_string()).or_insert(loaded);
        Ok(entry.clone())
    }

    /// Load a model from disk and replace any cached entry
    pub fn reload(&self, name: &str) -> ScoringResult<Arc<LoadedModel>> {
        let (name, path) = self.registry.resolve(Some(name))?;
        let loaded = Arc::new(load_model(name, path, &self.columns)?);
        self.entries.write().insert(name.to_string(), loaded.clone());
        log::info!("Model '{}' reloaded", name);
        Ok(loaded)
    }

    /// Drop one entry; the next `get` loads it again
    pub fn invalidate(&self, name: &str) -> bool {
        let removed = self.entries.write().remove(name).is_some();
        if removed {
            log::info!("Model '{}' invalidated", name);
        }
        removed
    }

    pub fn invalidate_all(&self) -> usize {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        log::info!("Model cache cleared ({} entries)", count);
        count
    }

    /// Invalidate every model whose artifact is `path`
    pub fn invalidate_path(&self, path: &Path) -> Vec<String> {
        self.registry
            .names_for_path(path)
            .into_iter()
            .filter(|name| self.invalidate(name))
            .collect()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    pub fn status(&self) -> Vec<ModelStatus> {
        let entries = self.entries.read();
        self.registry
            .names()
            .map(|name| {
                let entry = entries.get(name);
                let path = self
                    .registry
                    .resolve(Some(name))
                    .map(|(_, p)| p.display().to_string())
                    .unwrap_or_default();
                ModelStatus {
                    name: name.to_string(),
                    path,
                    is_default: name == self.registry.default_model(),
                    loaded: entry.is_some(),
                    kind: entry.map(|m| m.model.kind().to_string()),
                    sha256: entry.map(|m| m.sha256.clone()),
                    loaded_at: entry.map(|m| m.loaded_at),
                    metrics: entry.and_then(|m| m.metrics.clone()),
                }
            })
            .collect()
    }

    /// Watch `dir` and invalidate entries whose artifact changes.
    /// The cache stays watched for as long as the returned watcher lives.
    pub fn watch(self: &Arc<Self>, dir: &Path) -> notify::Result<RecommendedWatcher> {
        let cache = Arc::clone(self);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    if !matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    ) {
                        return;
                    }
                    for path in &event.paths {
                        let names = cache.invalidate_path(path);
                        if !names.is_empty() {
                            log::info!(
                                "Artifact {} changed; invalidated {:?}",
                                path.display(),
                                names
                            );
                        }
                    }
                }
                Err(e) => log::warn!("Model watcher error: {}", e),
            }
        })?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        log::info!("Watching {} for model changes", dir.display());
        Ok(watcher)
    }
}

// ============================================================================
// TESTS
// ============================================================================
