//! Ordered delivery of diagnostics to the client.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tower_lsp::Client;
use tower_lsp::lsp_types::{Diagnostic, Url};
use tracing::{debug, warn};
use ylint_core::{DiagnosticRecord, DiagnosticSink, DocumentId};

use crate::conversion::to_lsp_diagnostic;

pub(crate) type Publish = (Url, Vec<Diagnostic>);
pub(crate) type PublishReceiver = UnboundedReceiver<Publish>;

/// Queues every update for a single forwarding task, so the client sees
/// them in the order the store produced them.
#[derive(Debug)]
pub(crate) struct LspDiagnosticSink {
    tx: UnboundedSender<Publish>,
}

impl LspDiagnosticSink {
    pub fn new(tx: UnboundedSender<Publish>) -> Self {
        Self { tx }
    }
}

impl DiagnosticSink for LspDiagnosticSink {
    fn publish(&self, document: &DocumentId, diagnostics: &[DiagnosticRecord]) {
        let uri = match Url::parse(document.as_str()) {
            Ok(uri) => uri,
            Err(e) => {
                warn!("Cannot publish diagnostics for {}: {}", document, e);
                return;
            }
        };

        let diagnostics = diagnostics.iter().map(to_lsp_diagnostic).collect();
        if self.tx.send((uri, diagnostics)).is_err() {
            debug!("Diagnostic forwarder stopped, dropping update for {}", document);
        }
    }
}

/// Starts the task that forwards queued updates as `publishDiagnostics`.
pub(crate) fn spawn_forwarder(client: Client, mut rx: PublishReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some((uri, diagnostics)) = rx.recv().await {
            client.publish_diagnostics(uri, diagnostics, None).await;
        }
        debug!("Diagnostic forwarder finished");
    })
}
