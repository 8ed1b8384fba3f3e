//! Lint orchestration: settings, config resolution, debouncing, publishing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info, warn};
use ylint_engine::Problem;

use crate::debounce::DebounceScheduler;
use crate::diagnostic::{DiagnosticRecord, failure_diagnostic, to_diagnostics};
use crate::document::{DocumentId, LintDocument};
use crate::engine::RuleEngine;
use crate::error::LintError;
use crate::resolver::ConfigResolver;
use crate::settings::Settings;
use crate::store::{DiagnosticSink, DiagnosticStore};

/// Default upper bound on a single engine run.
pub const DEFAULT_LINT_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns everything needed to lint documents and publish the results.
///
/// One instance per editor session. After [`dispose`](Self::dispose) every
/// operation is a no-op.
pub struct LintOrchestrator {
    engine: Arc<dyn RuleEngine>,
    settings: RwLock<Settings>,
    resolver: Arc<ConfigResolver>,
    scheduler: DebounceScheduler,
    store: DiagnosticStore,
    lint_timeout: Duration,
    disposed: AtomicBool,
}

impl std::fmt::Debug for LintOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LintOrchestrator")
            .field("settings", &*self.settings.read())
            .field("resolver", &self.resolver)
            .field("scheduler", &self.scheduler)
            .field("store", &self.store)
            .field("lint_timeout", &self.lint_timeout)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl LintOrchestrator {
    pub fn new(engine: Arc<dyn RuleEngine>, settings: Settings) -> Self {
        Self {
            resolver: Arc::new(ConfigResolver::new(Arc::clone(&engine))),
            engine,
            settings: RwLock::new(settings),
            scheduler: DebounceScheduler::new(),
            store: DiagnosticStore::new(),
            lint_timeout: DEFAULT_LINT_TIMEOUT,
            disposed: AtomicBool::new(false),
        }
    }

    /// Attaches the sink that receives every published diagnostic set.
    pub fn with_sink(self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.store.attach(sink);
        self
    }

    pub fn with_lint_timeout(mut self, timeout: Duration) -> Self {
        self.lint_timeout = timeout;
        self
    }

    /// A copy of the current settings.
    pub fn settings(&self) -> Settings {
        self.settings.read().clone()
    }

    /// Replaces the settings and drops every cached configuration.
    pub fn update_settings(&self, settings: Settings) {
        debug!("Updating settings: {:?}", settings);
        *self.settings.write() = settings;
        self.resolver.clear();
    }

    /// Drops every cached configuration, e.g. after a config file changed.
    pub fn invalidate_configs(&self) {
        self.resolver.clear();
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    /// Lints `document` immediately and publishes the result.
    ///
    /// Never fails: engine errors, worker panics and timeouts are published
    /// as a single diagnostic on the document's first character.
    pub async fn lint_now(&self, document: LintDocument) {
        if self.is_disposed() {
            return;
        }

        let settings = self.settings();
        if !settings.enable {
            debug!("Linting disabled, clearing {}", document.id);
            self.clear(&document.id);
            return;
        }

        debug!("Validating document: {}", document.id);
        let diagnostics = match self.run_engine(&document, settings.config).await {
            Ok(problems) => to_diagnostics(&problems, &document.text),
            Err(e) => {
                warn!("Lint failed for {}: {}", document.id, e);
                vec![failure_diagnostic(
                    format!("yamllint failed: {e}"),
                    &document.text,
                )]
            }
        };

        if self.is_disposed() {
            return;
        }
        debug!(
            "Publishing {} diagnostics for {}",
            diagnostics.len(),
            document.id
        );
        self.store.replace(&document.id, diagnostics);
    }

    /// Schedules a lint of `document` after the configured quiet period.
    ///
    /// A newer request for the same document supersedes this one. The delay
    /// is read from the settings now; a pending timer keeps its delay.
    pub fn lint_debounced(self: &Arc<Self>, document: LintDocument) {
        if self.is_disposed() {
            return;
        }

        let delay = self.settings.read().debounce();
        let this: Weak<Self> = Arc::downgrade(self);
        let id = document.id.clone();
        self.scheduler.schedule(id, delay, move || async move {
            if let Some(this) = this.upgrade() {
                this.lint_now(document).await;
            }
        });
    }

    /// Lints each document now, one after another.
    pub async fn relint(&self, documents: Vec<LintDocument>) {
        info!("Re-linting {} open documents", documents.len());
        for document in documents {
            self.lint_now(document).await;
        }
    }

    /// Clears the document's diagnostics and cancels its pending lint.
    pub fn clear(&self, document: &DocumentId) {
        self.scheduler.cancel(document);
        if !self.is_disposed() {
            self.store.remove(document);
        }
    }

    /// Clears every document's diagnostics and cancels all pending lints.
    pub fn clear_all(&self) {
        self.scheduler.cancel_all();
        if !self.is_disposed() {
            self.store.clear_all();
        }
    }

    /// Cancels timers, clears all diagnostics and detaches the sink.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Disposing lint orchestrator");
        self.scheduler.cancel_all();
        self.store.clear_all();
        self.store.detach();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// Snapshot of the document's current diagnostics.
    pub fn diagnostics(&self, document: &DocumentId) -> Option<Arc<[DiagnosticRecord]>> {
        self.store.get(document)
    }

    /// Documents that currently have diagnostics published.
    pub fn published_documents(&self) -> Vec<DocumentId> {
        self.store.documents()
    }

    /// Number of debounced lints waiting to run.
    pub fn pending_lints(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Resolves the configuration and runs the engine on the blocking pool.
    async fn run_engine(
        &self,
        document: &LintDocument,
        explicit: String,
    ) -> Result<Vec<Problem>, LintError> {
        let engine = Arc::clone(&self.engine);
        let resolver = Arc::clone(&self.resolver);
        let text = Arc::clone(&document.text);
        let path = document.path.clone();
        let root = document.workspace_root.clone();

        let task = tokio::task::spawn_blocking(move || {
            let config = resolver.resolve(&path, root.as_deref(), &explicit);
            engine.lint(&text, &config, &path)
        });

        // A timed-out worker cannot be interrupted; its result is discarded.
        match tokio::time::timeout(self.lint_timeout, task).await {
            Ok(Ok(result)) => result.map_err(LintError::from),
            Ok(Err(e)) => Err(LintError::Worker(join_error_message(e))),
            Err(_) => Err(LintError::Timeout(self.lint_timeout)),
        }
    }
}

fn join_error_message(error: tokio::task::JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }
    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "engine panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use ylint_engine::{ConfigSource, EngineError, LintConfig};

    #[derive(Debug)]
    enum Behaviour {
        Panic,
        Sleep(Duration),
        Fail,
    }

    #[derive(Debug)]
    struct FaultyEngine(Behaviour);

    impl RuleEngine for FaultyEngine {
        fn parse_config(&self, _source: &ConfigSource) -> Result<LintConfig, EngineError> {
            Err(EngineError::config("unused"))
        }

        fn default_config(&self) -> LintConfig {
            LintConfig::default()
        }

        fn lint(
            &self,
            _text: &str,
            _config: &LintConfig,
            _path: &Path,
        ) -> Result<Vec<Problem>, EngineError> {
            match &self.0 {
                Behaviour::Panic => panic!("rule exploded"),
                Behaviour::Sleep(d) => {
                    std::thread::sleep(*d);
                    Ok(Vec::new())
                }
                Behaviour::Fail => Err(EngineError::config("bad input")),
            }
        }
    }

    fn document() -> LintDocument {
        LintDocument::new("file:///a.yaml".into(), "/a.yaml", "key: 1\n", None)
    }

    async fn only_diagnostic(orchestrator: &LintOrchestrator) -> DiagnosticRecord {
        orchestrator.lint_now(document()).await;
        let diagnostics = orchestrator.diagnostics(&"file:///a.yaml".into()).unwrap();
        assert_eq!(diagnostics.len(), 1);
        diagnostics[0].clone()
    }

    #[tokio::test]
    async fn test_engine_error_becomes_diagnostic() {
        let orchestrator =
            LintOrchestrator::new(Arc::new(FaultyEngine(Behaviour::Fail)), Settings::default());

        let diagnostic = only_diagnostic(&orchestrator).await;
        assert_eq!(diagnostic.severity, Severity::Error);
        assert!(diagnostic.message.contains("bad input"));
        assert_eq!(diagnostic.range.start.character, 0);
        assert_eq!(diagnostic.range.end.character, 1);
    }

    #[tokio::test]
    async fn test_worker_panic_becomes_diagnostic() {
        let orchestrator =
            LintOrchestrator::new(Arc::new(FaultyEngine(Behaviour::Panic)), Settings::default());

        let diagnostic = only_diagnostic(&orchestrator).await;
        assert!(diagnostic.message.contains("rule exploded"));
    }

    #[tokio::test]
    async fn test_timeout_becomes_diagnostic() {
        let orchestrator = LintOrchestrator::new(
            Arc::new(FaultyEngine(Behaviour::Sleep(Duration::from_millis(500)))),
            Settings::default(),
        )
        .with_lint_timeout(Duration::from_millis(20));

        let diagnostic = only_diagnostic(&orchestrator).await;
        assert!(diagnostic.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_dispose_is_final() {
        let orchestrator =
            LintOrchestrator::new(Arc::new(FaultyEngine(Behaviour::Fail)), Settings::default());
        orchestrator.lint_now(document()).await;
        assert_eq!(orchestrator.published_documents().len(), 1);

        orchestrator.dispose();
        assert!(orchestrator.published_documents().is_empty());

        orchestrator.lint_now(document()).await;
        assert!(orchestrator.published_documents().is_empty());
        assert!(orchestrator.is_disposed());
    }
}
