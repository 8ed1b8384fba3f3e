//! Configuration resolution with caching.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use ylint_engine::{ConfigSource, LintConfig};

use crate::engine::RuleEngine;

/// Configuration files looked up in the workspace root, in priority order.
pub const CONFIG_FILES: [&str; 4] = [
    ".yamllint",
    ".yamllint.yaml",
    ".yamllint.yml",
    ".yamllint.json",
];

/// Cache key identifying where a configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolutionKey {
    Path(PathBuf),
    /// The built-in default configuration.
    Default,
}

/// Finds the configuration that applies to a document.
///
/// Resolution order, first success wins:
/// 1. the explicit `config` setting, relative to the workspace root;
/// 2. the first of [`CONFIG_FILES`] in the workspace root that parses;
/// 3. the engine's built-in default.
///
/// Successful loads are cached by resolved path, so repeated resolutions
/// return the same `Arc`. Failed loads are logged and never cached.
pub struct ConfigResolver {
    engine: Arc<dyn RuleEngine>,
    cache: Mutex<HashMap<ResolutionKey, Arc<LintConfig>>>,
}

impl fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("cached", &self.cache.lock().len())
            .finish()
    }
}

impl ConfigResolver {
    pub fn new(engine: Arc<dyn RuleEngine>) -> Self {
        Self {
            engine,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves the configuration for `document_path`. Never fails: the
    /// default configuration is the last resort.
    pub fn resolve(
        &self,
        document_path: &Path,
        workspace_root: Option<&Path>,
        explicit: &str,
    ) -> Arc<LintConfig> {
        let explicit = explicit.trim();
        if !explicit.is_empty() {
            let path = Self::explicit_path(explicit, workspace_root);
            if let Some(config) = self.load_cached(&path, false) {
                return config;
            }
        }

        if let Some(root) = workspace_root {
            for name in CONFIG_FILES {
                if let Some(config) = self.load_cached(&root.join(name), true) {
                    return config;
                }
            }
        }

        debug!(
            "Using default configuration for {}",
            document_path.display()
        );
        self.default_config()
    }

    /// Drops every cached configuration.
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        if !cache.is_empty() {
            info!("Clearing {} cached configurations", cache.len());
        }
        cache.clear();
    }

    pub fn is_cached(&self, key: &ResolutionKey) -> bool {
        self.cache.lock().contains_key(key)
    }

    pub fn cached_count(&self) -> usize {
        self.cache.lock().len()
    }

    fn explicit_path(explicit: &str, workspace_root: Option<&Path>) -> PathBuf {
        let path = Path::new(explicit);
        match workspace_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Returns the cached configuration for `path`, or loads and caches it.
    /// With `require_exists`, a missing file is skipped silently.
    fn load_cached(&self, path: &Path, require_exists: bool) -> Option<Arc<LintConfig>> {
        let key = ResolutionKey::Path(path.to_path_buf());
        if let Some(config) = self.cache.lock().get(&key) {
            return Some(Arc::clone(config));
        }

        if require_exists && !path.is_file() {
            return None;
        }

        match self
            .engine
            .parse_config(&ConfigSource::File(path.to_path_buf()))
        {
            Ok(config) => {
                info!("Loaded configuration from {}", path.display());
                let mut cache = self.cache.lock();
                let entry = cache.entry(key).or_insert_with(|| Arc::new(config));
                Some(Arc::clone(entry))
            }
            Err(e) => {
                warn!("Failed to load config {}: {}", path.display(), e);
                None
            }
        }
    }

    fn default_config(&self) -> Arc<LintConfig> {
        let mut cache = self.cache.lock();
        let entry = cache
            .entry(ResolutionKey::Default)
            .or_insert_with(|| Arc::new(self.engine.default_config()));
        Arc::clone(entry)
    }
}
