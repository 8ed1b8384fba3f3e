//! Watched files and workspace folder handlers.

use tower_lsp::lsp_types::*;
use tracing::{debug, info};
use ylint_core::{CONFIG_FILES, LintOrchestrator};

use crate::conversion::document_path;
use crate::state::SharedState;

/// Whether `uri` names one of the configuration files.
fn is_config_file(uri: &Url) -> bool {
    document_path(uri)
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| CONFIG_FILES.contains(&name))
}

/// Handles the `workspace/didChangeWatchedFiles` notification.
pub async fn handle_did_change_watched_files(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    params: DidChangeWatchedFilesParams,
) {
    debug!("Watched files changed: {:?}", params.changes);

    let config_changed = params.changes.iter().any(|change| is_config_file(&change.uri));
    if !config_changed {
        return;
    }

    info!("Configuration file changed, reloading...");
    orchestrator.invalidate_configs();
    if orchestrator.settings().enable {
        orchestrator.relint(state.open_documents()).await;
    }
}

/// Handles the `workspace/didChangeWorkspaceFolders` notification.
pub async fn handle_did_change_workspace_folders(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    params: DidChangeWorkspaceFoldersParams,
) {
    let removed: Vec<_> = params
        .event
        .removed
        .iter()
        .filter_map(|folder| folder.uri.to_file_path().ok())
        .collect();
    let added = params
        .event
        .added
        .iter()
        .filter_map(|folder| folder.uri.to_file_path().ok());

    let mut folders = state.workspace_folders();
    folders.retain(|folder| !removed.contains(folder));
    folders.extend(added);
    info!("Workspace folders: {:?}", folders);
    state.set_workspace_folders(folders);
    orchestrator.invalidate_configs();
}
