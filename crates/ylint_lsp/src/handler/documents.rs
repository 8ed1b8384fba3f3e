//! Document lifecycle handlers (open, change, save, close).

use std::sync::Arc;

use tower_lsp::lsp_types::*;
use tracing::debug;
use ylint_core::{DocumentId, LintOrchestrator};

use crate::state::SharedState;

/// Handles the `textDocument/didOpen` notification.
pub async fn handle_did_open(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    params: DidOpenTextDocumentParams,
) {
    let document = params.text_document;
    debug!("Document opened: {}", document.uri);

    let text: Arc<str> = document.text.into();
    state.upsert_document(document.uri.clone(), Arc::clone(&text), document.version);

    if orchestrator.settings().lint_on_open {
        orchestrator
            .lint_now(state.lint_document(&document.uri, text))
            .await;
    }
}

/// Handles the `textDocument/didChange` notification.
///
/// Full sync: the last change carries the whole text.
pub async fn handle_did_change(
    state: &SharedState,
    orchestrator: &Arc<LintOrchestrator>,
    params: DidChangeTextDocumentParams,
) {
    debug!("Document changed: {}", params.text_document.uri);

    let Some(change) = params.content_changes.into_iter().last() else {
        return;
    };
    let uri = params.text_document.uri;
    let text: Arc<str> = change.text.into();
    state.upsert_document(uri.clone(), Arc::clone(&text), params.text_document.version);

    if orchestrator.settings().lint_on_change {
        orchestrator.lint_debounced(state.lint_document(&uri, text));
    }
}

/// Handles the `textDocument/didSave` notification.
pub async fn handle_did_save(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    params: DidSaveTextDocumentParams,
) {
    let uri = params.text_document.uri;
    debug!("Document saved: {}", uri);

    let stored = state.document(&uri);
    let text: Arc<str> = match (params.text, stored) {
        (Some(text), stored) => {
            let text: Arc<str> = text.into();
            let version = stored.map_or(0, |doc| doc.version);
            state.upsert_document(uri.clone(), Arc::clone(&text), version);
            text
        }
        (None, Some(stored)) => stored.text,
        (None, None) => {
            debug!("Saved document is not open: {}", uri);
            return;
        }
    };

    if orchestrator.settings().lint_on_save {
        orchestrator.lint_now(state.lint_document(&uri, text)).await;
    }
}

/// Handles the `textDocument/didClose` notification.
pub async fn handle_did_close(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    params: DidCloseTextDocumentParams,
) {
    let uri = params.text_document.uri;
    debug!("Document closed: {}", uri);

    state.remove_document(&uri);
    orchestrator.clear(&DocumentId::new(uri.as_str()));
}
