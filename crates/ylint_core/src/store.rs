//! Per-document diagnostic store.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::diagnostic::DiagnosticRecord;
use crate::document::DocumentId;

/// Where published diagnostics go (an editor connection, a test probe).
///
/// Every call carries the document's full diagnostic set; an empty slice
/// clears the document.
pub trait DiagnosticSink: Send + Sync {
    fn publish(&self, document: &DocumentId, diagnostics: &[DiagnosticRecord]);
}

/// Current diagnostics for every document.
///
/// Each update replaces the document's whole set and is forwarded to the
/// sink while the store lock is held, so the sink sees updates in the same
/// order as the store.
#[derive(Default)]
pub struct DiagnosticStore {
    entries: Mutex<HashMap<DocumentId, Arc<[DiagnosticRecord]>>>,
    sink: RwLock<Option<Arc<dyn DiagnosticSink>>>,
}

impl fmt::Debug for DiagnosticStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticStore")
            .field("documents", &self.entries.lock().len())
            .field("attached", &self.sink.read().is_some())
            .finish()
    }
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the sink that receives every update.
    pub fn attach(&self, sink: Arc<dyn DiagnosticSink>) {
        *self.sink.write() = Some(sink);
    }

    /// Detaches the sink; later updates are kept in the store only.
    pub fn detach(&self) {
        *self.sink.write() = None;
    }

    /// Replaces the document's diagnostics.
    pub fn replace(&self, document: &DocumentId, diagnostics: Vec<DiagnosticRecord>) {
        let diagnostics: Arc<[DiagnosticRecord]> = diagnostics.into();
        let mut entries = self.entries.lock();
        entries.insert(document.clone(), Arc::clone(&diagnostics));
        self.forward(document, &diagnostics);
    }

    /// Drops the document's entry and clears it in the sink.
    pub fn remove(&self, document: &DocumentId) {
        let mut entries = self.entries.lock();
        entries.remove(document);
        self.forward(document, &[]);
    }

    /// Drops every entry, clearing each in the sink.
    pub fn clear_all(&self) {
        let mut entries = self.entries.lock();
        for document in entries.keys() {
            self.forward(document, &[]);
        }
        debug!("Cleared diagnostics for {} documents", entries.len());
        entries.clear();
    }

    /// Snapshot of the document's current diagnostics.
    pub fn get(&self, document: &DocumentId) -> Option<Arc<[DiagnosticRecord]>> {
        self.entries.lock().get(document).cloned()
    }

    /// Documents that currently have an entry.
    pub fn documents(&self) -> Vec<DocumentId> {
        let mut documents: Vec<_> = self.entries.lock().keys().cloned().collect();
        documents.sort();
        documents
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn forward(&self, document: &DocumentId, diagnostics: &[DiagnosticRecord]) {
        if let Some(sink) = self.sink.read().as_ref() {
            sink.publish(document, diagnostics);
        }
    }
}
