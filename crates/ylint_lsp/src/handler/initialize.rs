//! Initialize and shutdown handlers.

use std::path::PathBuf;
use std::sync::atomic::Ordering;

use tower_lsp::Client;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{error, info, warn};
use ylint_core::{CONFIG_FILES, LintOrchestrator, Settings};

use crate::handler::commands::COMMANDS;
use crate::sink::spawn_forwarder;
use crate::state::SharedState;

const CONFIG_WATCHER_ID: &str = "yamllint-config-watcher";

/// Handles the `initialize` LSP request.
pub async fn handle_initialize(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    client: &Client,
    params: InitializeParams,
) -> Result<InitializeResult> {
    info!("ylint LSP server initializing...");

    if let Some(options) = params.initialization_options.as_ref() {
        match Settings::from_json(options) {
            Ok(settings) => orchestrator.update_settings(settings),
            Err(e) => warn!("Ignoring invalid initialization options: {}", e),
        }
    }

    state.set_workspace_folders(workspace_folders(&params));

    let capabilities = &params.capabilities;
    let supports_progress = capabilities
        .window
        .as_ref()
        .and_then(|w| w.work_done_progress)
        .unwrap_or(false);
    let supports_configuration = capabilities
        .workspace
        .as_ref()
        .and_then(|w| w.configuration)
        .unwrap_or(false);
    let supports_watch_registration = capabilities
        .workspace
        .as_ref()
        .and_then(|w| w.did_change_watched_files.as_ref())
        .and_then(|w| w.dynamic_registration)
        .unwrap_or(false);
    state
        .supports_progress
        .store(supports_progress, Ordering::Relaxed);
    state
        .supports_configuration
        .store(supports_configuration, Ordering::Relaxed);
    state
        .supports_watch_registration
        .store(supports_watch_registration, Ordering::Relaxed);

    match state.take_publish_rx() {
        Some(rx) => {
            spawn_forwarder(client.clone(), rx);
        }
        None => error!("Diagnostic forwarder already started"),
    }

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                    ..Default::default()
                },
            )),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
                work_done_progress_options: Default::default(),
            }),
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                file_operations: None,
            }),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "ylint-lsp".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Workspace folders from the request, falling back to the root URI.
fn workspace_folders(params: &InitializeParams) -> Vec<PathBuf> {
    let folders: Vec<PathBuf> = params
        .workspace_folders
        .iter()
        .flatten()
        .filter_map(|folder| folder.uri.to_file_path().ok())
        .collect();
    if !folders.is_empty() {
        return folders;
    }

    #[allow(deprecated)]
    let root = params.root_uri.as_ref();
    root.and_then(|uri| uri.to_file_path().ok())
        .into_iter()
        .collect()
}

/// Handles the `initialized` LSP notification.
pub async fn handle_initialized(state: &SharedState, client: &Client) {
    client
        .log_message(MessageType::INFO, "ylint LSP server initialized!")
        .await;

    if !state.supports_watch_registration.load(Ordering::Relaxed) {
        return;
    }

    let watchers = CONFIG_FILES
        .iter()
        .map(|name| FileSystemWatcher {
            glob_pattern: GlobPattern::String(format!("**/{name}")),
            kind: None,
        })
        .collect();
    let options = DidChangeWatchedFilesRegistrationOptions { watchers };
    let registration = Registration {
        id: CONFIG_WATCHER_ID.to_string(),
        method: "workspace/didChangeWatchedFiles".to_string(),
        register_options: serde_json::to_value(options).ok(),
    };

    if let Err(e) = client.register_capability(vec![registration]).await {
        warn!("Failed to register config file watcher: {}", e);
    }
}

/// Handles the `shutdown` LSP request.
pub async fn handle_shutdown(orchestrator: &LintOrchestrator) -> Result<()> {
    info!("ylint LSP server shutting down...");
    orchestrator.dispose();
    Ok(())
}
