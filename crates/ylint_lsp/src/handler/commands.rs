//! `workspace/executeCommand` handlers.

use std::sync::Arc;

use serde_json::{Value, json};
use tower_lsp::Client;
use tower_lsp::jsonrpc::{Error, Result};
use tower_lsp::lsp_types::*;
use tracing::{debug, info, warn};
use ylint_core::{
    CancellationFlag, DocumentId, LintError, LintOrchestrator, WorkspaceProgress, WorkspaceSummary,
};

use crate::conversion::document_path;
use crate::progress::ProgressReporter;
use crate::state::SharedState;

pub const LINT_FILE_COMMAND: &str = "yamllint.lintFile";
pub const LINT_WORKSPACE_COMMAND: &str = "yamllint.lintWorkspace";
pub const COMMANDS: [&str; 2] = [LINT_FILE_COMMAND, LINT_WORKSPACE_COMMAND];

const DISABLED_MESSAGE: &str = "YAML linting is disabled (yamllint.enable is false)";

/// Handles the `workspace/executeCommand` request.
pub async fn handle_execute_command(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    client: &Client,
    params: ExecuteCommandParams,
) -> Result<Option<Value>> {
    info!("Executing command: {}", params.command);

    match params.command.as_str() {
        LINT_FILE_COMMAND => lint_file(state, orchestrator, client, &params.arguments).await,
        LINT_WORKSPACE_COMMAND => lint_workspace(state, orchestrator, client).await,
        other => Err(Error::invalid_params(format!("Unknown command: {other}"))),
    }
}

/// Lints one document now, open or not.
async fn lint_file(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    client: &Client,
    arguments: &[Value],
) -> Result<Option<Value>> {
    let uri = arguments
        .first()
        .and_then(Value::as_str)
        .and_then(|arg| Url::parse(arg).ok())
        .ok_or_else(|| {
            Error::invalid_params(format!("{LINT_FILE_COMMAND} expects a document URI"))
        })?;

    if !orchestrator.settings().enable {
        client.show_message(MessageType::WARNING, DISABLED_MESSAGE).await;
        return Ok(None);
    }

    let text: Arc<str> = match state.document(&uri) {
        Some(document) => document.text,
        None => {
            let path = document_path(&uri);
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => text.into(),
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    client
                        .show_message(
                            MessageType::ERROR,
                            format!("Cannot read {}: {e}", path.display()),
                        )
                        .await;
                    return Ok(None);
                }
            }
        }
    };

    orchestrator.lint_now(state.lint_document(&uri, text)).await;

    let problems = orchestrator
        .diagnostics(&DocumentId::new(uri.as_str()))
        .map_or(0, |d| d.len());
    Ok(Some(json!({ "problems": problems })))
}

/// Lints every YAML file in the first workspace folder with cancellable
/// progress.
async fn lint_workspace(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    client: &Client,
) -> Result<Option<Value>> {
    if !orchestrator.settings().enable {
        client.show_message(MessageType::WARNING, DISABLED_MESSAGE).await;
        return Ok(None);
    }
    let Some(root) = state.primary_root() else {
        client
            .show_message(MessageType::WARNING, "Open a folder to lint its YAML files")
            .await;
        return Ok(None);
    };

    let progress = ProgressReporter::create(client, state.supports_progress()).await;
    let cancel = CancellationFlag::new();
    let key = progress.key();
    state.register_progress(key.clone(), cancel.clone());
    progress.begin("Linting YAML files").await;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<WorkspaceProgress>();
    let reporter = {
        let progress = progress.clone();
        tokio::spawn(async move {
            while let Some(step) = rx.recv().await {
                let name = step
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let message = format!("{}/{} {}", step.index + 1, step.total, name);
                progress.report(message, step.percentage()).await;
            }
        })
    };

    let result = orchestrator
        .lint_workspace(&root, &cancel, |step| {
            if tx.send(step.clone()).is_err() {
                debug!("Progress reporter stopped, dropping step {}", step.index + 1);
            }
        })
        .await;
    drop(tx);
    if let Err(e) = reporter.await {
        warn!("Progress reporter failed: {}", e);
    }
    state.finish_progress(&key);

    match result {
        Ok(summary) => {
            let message = summary_message(&summary);
            progress.end(message.clone()).await;
            client.show_message(MessageType::INFO, message).await;
            Ok(serde_json::to_value(&summary).ok())
        }
        Err(LintError::Disabled) => {
            progress.end(DISABLED_MESSAGE.to_string()).await;
            client.show_message(MessageType::WARNING, DISABLED_MESSAGE).await;
            Ok(None)
        }
        Err(e) => {
            let message = format!("Workspace lint failed: {e}");
            progress.end(message.clone()).await;
            client.show_message(MessageType::ERROR, message).await;
            Ok(None)
        }
    }
}

fn summary_message(summary: &WorkspaceSummary) -> String {
    if summary.cancelled {
        return format!(
            "Workspace lint cancelled after {} of {} YAML files",
            summary.linted, summary.total_files
        );
    }

    let mut message = format!(
        "Linted {} YAML files ({} problems)",
        summary.linted, summary.problems
    );
    if summary.failed > 0 {
        message.push_str(&format!(", {} could not be read", summary.failed));
    }
    message
}
