//! ylint LSP Server
//!
//! Language Server Protocol front end for ylint.
//! Lints YAML documents as they are opened, edited and saved, and offers
//! `yamllint.lintFile` and `yamllint.lintWorkspace` commands.

mod conversion;
mod handler;
mod progress;
mod sink;
mod state;

use std::sync::Arc;

use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, ClientSocket, LanguageServer, LspService, Server};
use tracing::{debug, info};

use ylint_core::{LintOrchestrator, Settings};
use ylint_engine::Engine;

pub use handler::{COMMANDS, LINT_FILE_COMMAND, LINT_WORKSPACE_COMMAND};

use crate::sink::LspDiagnosticSink;
use crate::state::{BackendState, SharedState};

/// The LSP backend for ylint.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
    orchestrator: Arc<LintOrchestrator>,
}

impl Backend {
    /// Creates a new backend with the given client.
    ///
    /// Diagnostics produced before `initialize` are queued and delivered once
    /// the forwarding task starts.
    pub fn new(client: Client) -> Self {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let orchestrator = LintOrchestrator::new(Arc::new(Engine::new()), Settings::default())
            .with_sink(Arc::new(LspDiagnosticSink::new(tx)));

        Self {
            client,
            state: Arc::new(BackendState::new(rx)),
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// Handles `window/workDoneProgress/cancel` for workspace lints.
    async fn cancel_progress(&self, params: WorkDoneProgressCancelParams) {
        let key = progress::token_key(&params.token);
        if self.state.cancel_progress(&key) {
            info!("Cancelling workspace lint {}", key);
        } else {
            debug!("No running task for progress token {}", key);
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, &self.orchestrator, &self.client, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.state, &self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown(&self.orchestrator).await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        handler::handle_did_open(&self.state, &self.orchestrator, params).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        handler::handle_did_change(&self.state, &self.orchestrator, params).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        handler::handle_did_save(&self.state, &self.orchestrator, params).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handler::handle_did_close(&self.state, &self.orchestrator, params).await;
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handler::handle_did_change_configuration(
            &self.state,
            &self.orchestrator,
            &self.client,
            params,
        )
        .await;
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        handler::handle_did_change_watched_files(&self.state, &self.orchestrator, params).await;
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        handler::handle_did_change_workspace_folders(&self.state, &self.orchestrator, params)
            .await;
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        handler::handle_execute_command(&self.state, &self.orchestrator, &self.client, params)
            .await
    }
}

/// Builds the service with the custom methods the backend understands.
pub fn service() -> (LspService<Backend>, ClientSocket) {
    LspService::build(Backend::new)
        .custom_method("window/workDoneProgress/cancel", Backend::cancel_progress)
        .finish()
}

/// Starts the LSP server.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    info!("ylint LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = service();
    Server::new(stdin, stdout, socket).serve(service).await;
}
