#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ylint_core::{DiagnosticRecord, DiagnosticSink, DocumentId, RuleEngine};
use ylint_engine::{ConfigSource, Engine, EngineError, LintConfig, Problem};

/// Real engine that counts how often it is called.
#[derive(Default)]
pub struct CountingEngine {
    inner: Engine,
    pub lints: AtomicUsize,
    pub config_loads: AtomicUsize,
}

impl CountingEngine {
    pub fn lint_count(&self) -> usize {
        self.lints.load(Ordering::SeqCst)
    }

    pub fn config_load_count(&self) -> usize {
        self.config_loads.load(Ordering::SeqCst)
    }
}

impl RuleEngine for CountingEngine {
    fn parse_config(&self, source: &ConfigSource) -> Result<LintConfig, EngineError> {
        self.config_loads.fetch_add(1, Ordering::SeqCst);
        self.inner.parse_config(source)
    }

    fn default_config(&self) -> LintConfig {
        self.inner.default_config()
    }

    fn lint(
        &self,
        text: &str,
        config: &LintConfig,
        path: &Path,
    ) -> Result<Vec<Problem>, EngineError> {
        self.lints.fetch_add(1, Ordering::SeqCst);
        self.inner.lint(text, config, path)
    }
}

/// Sink that records every publish.
#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<(DocumentId, Vec<DiagnosticRecord>)>>);

impl RecordingSink {
    pub fn published(&self) -> Vec<(DocumentId, Vec<DiagnosticRecord>)> {
        self.0.lock().unwrap().clone()
    }

    pub fn last_for(&self, id: &DocumentId) -> Option<Vec<DiagnosticRecord>> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(doc, _)| doc == id)
            .map(|(_, diagnostics)| diagnostics.clone())
    }
}

impl DiagnosticSink for RecordingSink {
    fn publish(&self, document: &DocumentId, diagnostics: &[DiagnosticRecord]) {
        self.0
            .lock()
            .unwrap()
            .push((document.clone(), diagnostics.to_vec()));
    }
}

/// Codes of the diagnostics, in order.
pub fn codes(diagnostics: &[DiagnosticRecord]) -> Vec<Option<&str>> {
    diagnostics.iter().map(|d| d.code.as_deref()).collect()
}
