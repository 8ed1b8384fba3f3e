//! Core error types.

use std::time::Duration;

use thiserror::Error;
use ylint_engine::EngineError;

/// Errors that can occur while linting.
///
/// None of these escape [`LintOrchestrator::lint_now`](crate::LintOrchestrator::lint_now);
/// they are turned into a diagnostic on the affected document instead.
#[derive(Debug, Error)]
pub enum LintError {
    /// The rule engine rejected the document or configuration.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The engine did not finish in time.
    #[error("Lint timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The blocking worker running the engine failed (panic or cancellation).
    #[error("Lint worker failed: {0}")]
    Worker(String),

    /// Invalid file pattern.
    #[error("Invalid pattern: {0}")]
    Pattern(String),

    /// Linting is switched off in the settings.
    #[error("Linting is disabled")]
    Disabled,
}

impl LintError {
    /// Creates a pattern error.
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern(message.into())
    }
}
