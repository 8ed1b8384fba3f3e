//! The engine entry points: parse a configuration, lint a document.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::config::{ConfigSource, LintConfig};
use crate::problem::Problem;
use crate::source::Source;
use crate::EngineError;

/// Largest document the engine will lint, in bytes.
pub const MAX_DOCUMENT_BYTES: usize = 8 * 1024 * 1024;

/// Stateless YAML lint engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Parses a configuration from a file or inline text.
    pub fn parse_config(&self, source: &ConfigSource) -> Result<LintConfig, EngineError> {
        LintConfig::load(source)
    }

    /// The built-in configuration used when nothing else applies.
    pub fn default_config(&self) -> LintConfig {
        LintConfig::default_preset()
    }

    /// Lints `text` and returns its problems ordered by position.
    ///
    /// `path` is only used to match the configuration's `ignore` patterns.
    pub fn lint(
        &self,
        text: &str,
        config: &LintConfig,
        path: &Path,
    ) -> Result<Vec<Problem>, EngineError> {
        if text.len() > MAX_DOCUMENT_BYTES {
            return Err(EngineError::DocumentTooLarge {
                size: text.len(),
                limit: MAX_DOCUMENT_BYTES,
            });
        }

        if config.is_file_ignored(path) {
            debug!("Skipping ignored file: {}", path.display());
            return Ok(Vec::new());
        }

        let source = Source::new(text);
        let mut problems = Vec::new();

        if let Some(problem) = syntax_problem(text) {
            problems.push(problem);
        }

        let relative = config.relative(path);
        for configured in config.rules() {
            if configured
                .ignore
                .as_ref()
                .is_some_and(|set| set.is_match(relative))
            {
                continue;
            }
            configured
                .rule
                .check(&source, configured.level, &mut problems);
        }

        problems.sort_by(|a, b| (a.line, a.column).cmp(&(b.line, b.column)));
        Ok(problems)
    }
}

/// Reports the first YAML syntax error of a (possibly multi-document) stream.
fn syntax_problem(text: &str) -> Option<Problem> {
    for document in serde_yaml::Deserializer::from_str(text) {
        if let Err(e) = serde_yaml::Value::deserialize(document) {
            let (line, column) = e
                .location()
                .map(|loc| (loc.line(), loc.column()))
                .unwrap_or((1, 1));
            return Some(Problem::syntax(
                line.max(1),
                column.max(1),
                format!("syntax error: {}", e),
            ));
        }
    }
    None
}
