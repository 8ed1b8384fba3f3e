//! # ylint_engine
//!
//! YAML rule engine for ylint.
//!
//! This crate provides:
//! - yamllint-compatible configuration parsing (`extends`, `rules`, `ignore`)
//! - A built-in, line-oriented rule set
//! - YAML syntax checking
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//! use ylint_engine::Engine;
//!
//! let engine = Engine::new();
//! let config = engine.default_config();
//! let problems = engine.lint("---\nkey: value \n", &config, Path::new("a.yaml")).unwrap();
//! assert_eq!(problems[0].rule.as_deref(), Some("trailing-spaces"));
//! ```

mod config;
mod error;
mod linter;
mod problem;
pub mod rules;
mod source;

pub use config::{ConfigSource, DEFAULT_PRESET, LintConfig};
pub use error::EngineError;
pub use linter::{Engine, MAX_DOCUMENT_BYTES};
pub use problem::{Level, Problem};
