//! Engine error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a configuration or linting a document.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configuration file could not be read.
    #[error("Failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid.
    #[error("Invalid config: {0}")]
    ConfigParse(String),

    /// The configuration names a rule the engine does not know.
    #[error("Invalid config: no such rule: \"{0}\"")]
    UnknownRule(String),

    /// A rule option has the wrong shape or value.
    #[error("Invalid config: rule \"{rule}\": {message}")]
    InvalidOption { rule: String, message: String },

    /// An ignore pattern could not be compiled.
    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// The document is larger than the engine accepts.
    #[error("Document too large to lint ({size} bytes, limit {limit})")]
    DocumentTooLarge { size: usize, limit: usize },
}

impl EngineError {
    /// Creates a configuration parse error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigParse(message.into())
    }

    /// Creates an invalid option error for `rule`.
    pub fn option(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            rule: rule.into(),
            message: message.into(),
        }
    }
}
