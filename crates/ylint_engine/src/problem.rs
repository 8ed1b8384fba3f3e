//! Problems reported by the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Level attached to a problem by the configuration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
        }
    }
}

/// A single problem found in a document.
///
/// `line` and `column` are 1-based; `column` counts characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub level: Level,
    /// Rule that produced the problem; `None` for syntax errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

impl Problem {
    /// Creates a problem produced by `rule`.
    pub fn new(
        line: usize,
        column: usize,
        message: impl Into<String>,
        level: Level,
        rule: &str,
    ) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            level,
            rule: Some(rule.to_string()),
        }
    }

    /// Creates a syntax error problem, which has no rule id.
    pub fn syntax(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
            level: Level::Error,
            rule: None,
        }
    }
}
