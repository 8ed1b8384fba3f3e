//! Rule engine seam.

use std::path::Path;

use ylint_engine::{ConfigSource, Engine, EngineError, LintConfig, Problem};

/// The rule engine the orchestrator drives.
///
/// The core treats it as a black box: it parses configurations and turns
/// document text into problems. Calls may be slow and are always made from a
/// blocking worker thread.
pub trait RuleEngine: Send + Sync + 'static {
    /// Parses a configuration from a file or inline text.
    fn parse_config(&self, source: &ConfigSource) -> Result<LintConfig, EngineError>;

    /// The built-in configuration; cannot fail.
    fn default_config(&self) -> LintConfig;

    /// Lints `text` with `config`. `path` identifies the document.
    fn lint(&self, text: &str, config: &LintConfig, path: &Path)
    -> Result<Vec<Problem>, EngineError>;
}

impl RuleEngine for Engine {
    fn parse_config(&self, source: &ConfigSource) -> Result<LintConfig, EngineError> {
        Engine::parse_config(self, source)
    }

    fn default_config(&self) -> LintConfig {
        Engine::default_config(self)
    }

    fn lint(
        &self,
        text: &str,
        config: &LintConfig,
        path: &Path,
    ) -> Result<Vec<Problem>, EngineError> {
        Engine::lint(self, text, config, path)
    }
}
