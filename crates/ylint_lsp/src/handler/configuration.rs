//! Settings change handler.

use serde_json::Value;
use tower_lsp::Client;
use tower_lsp::lsp_types::*;
use tracing::{debug, info, warn};
use ylint_core::{LintOrchestrator, SETTINGS_SECTION, Settings};

use crate::state::SharedState;

/// Handles the `workspace/didChangeConfiguration` notification.
///
/// Only the `yamllint` section is read. When the payload lacks it, the
/// section is pulled from clients that support `workspace/configuration`
/// and the notification is ignored otherwise. The new settings replace the
/// old ones wholesale. Open documents are re-linted, or every diagnostic is
/// cleared when linting was switched off.
pub async fn handle_did_change_configuration(
    state: &SharedState,
    orchestrator: &LintOrchestrator,
    client: &Client,
    params: DidChangeConfigurationParams,
) {
    let parsed = match Settings::from_section(&params.settings) {
        Some(parsed) => parsed,
        None if state.supports_configuration() => match pull_section(client).await {
            Some(section) => Settings::from_json(&section),
            None => return,
        },
        None => {
            debug!("Settings change without a {} section", SETTINGS_SECTION);
            return;
        }
    };

    let settings = match parsed {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Ignoring invalid settings: {}", e);
            client
                .log_message(
                    MessageType::WARNING,
                    format!("Ignoring invalid yamllint settings: {e}"),
                )
                .await;
            return;
        }
    };

    info!("Settings changed: {:?}", settings);
    let enabled = settings.enable;
    orchestrator.update_settings(settings);

    if enabled {
        orchestrator.relint(state.open_documents()).await;
    } else {
        orchestrator.clear_all();
        client
            .log_message(MessageType::INFO, "YAML linting disabled")
            .await;
    }
}

/// Asks the client for the current `yamllint` section.
async fn pull_section(client: &Client) -> Option<Value> {
    let items = vec![ConfigurationItem {
        scope_uri: None,
        section: Some(SETTINGS_SECTION.to_string()),
    }];
    match client.configuration(items).await {
        Ok(values) => values.into_iter().next().filter(|v| !v.is_null()),
        Err(e) => {
            warn!("Failed to fetch {} settings: {}", SETTINGS_SECTION, e);
            None
        }
    }
}
