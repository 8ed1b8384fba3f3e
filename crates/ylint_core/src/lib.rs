//! # ylint_core
//!
//! Editor-facing lint core for ylint.
//!
//! This crate provides:
//! - Configuration resolution with caching (`ConfigResolver`)
//! - Per-document debouncing (`DebounceScheduler`)
//! - The `LintOrchestrator`, which lints documents and publishes diagnostics
//! - Cancellable workspace linting
//!
//! It knows nothing about editors: results go to a [`DiagnosticSink`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ylint_core::{LintDocument, LintOrchestrator, Settings};
//! use ylint_engine::Engine;
//!
//! let orchestrator = LintOrchestrator::new(Arc::new(Engine::new()), Settings::default())
//!     .with_sink(sink);
//!
//! let document = LintDocument::from_path("/project/a.yaml", text, Some("/project".into()));
//! orchestrator.lint_now(document).await;
//! ```

mod debounce;
mod diagnostic;
mod document;
mod engine;
mod error;
pub mod file_finder;
mod orchestrator;
pub mod resolver;
mod settings;
mod store;
mod workspace;

pub use debounce::DebounceScheduler;
pub use diagnostic::{
    DIAGNOSTIC_SOURCE, DiagnosticRecord, Position, Range, Severity, failure_diagnostic,
    to_diagnostics,
};
pub use document::{DocumentId, LintDocument};
pub use engine::RuleEngine;
pub use error::LintError;
pub use orchestrator::{DEFAULT_LINT_TIMEOUT, LintOrchestrator};
pub use resolver::{CONFIG_FILES, ConfigResolver, ResolutionKey};
pub use settings::{DEFAULT_DEBOUNCE_MS, SETTINGS_SECTION, Settings};
pub use store::{DiagnosticSink, DiagnosticStore};
pub use workspace::{CancellationFlag, WorkspaceProgress, WorkspaceSummary};
