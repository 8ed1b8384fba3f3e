//! Work-done progress for long-running commands.

use std::sync::atomic::{AtomicU64, Ordering};

use tower_lsp::Client;
use tower_lsp::lsp_types::notification::Progress;
use tower_lsp::lsp_types::request::WorkDoneProgressCreate;
use tower_lsp::lsp_types::{
    NumberOrString, ProgressParams, ProgressParamsValue, ProgressToken, WorkDoneProgress,
    WorkDoneProgressBegin, WorkDoneProgressCreateParams, WorkDoneProgressEnd,
    WorkDoneProgressReport,
};
use tracing::warn;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Key used to look up a token in the backend's progress table.
pub(crate) fn token_key(token: &ProgressToken) -> String {
    match token {
        NumberOrString::String(s) => s.clone(),
        NumberOrString::Number(n) => n.to_string(),
    }
}

/// A cancellable progress bar in the client. Without client support every
/// call is a no-op.
#[derive(Clone)]
pub(crate) struct ProgressReporter {
    client: Client,
    token: ProgressToken,
    active: bool,
}

impl ProgressReporter {
    /// Allocates a fresh token and, when `supported`, asks the client to
    /// create the progress bar.
    pub async fn create(client: &Client, supported: bool) -> Self {
        let id = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        let token = NumberOrString::String(format!("yamllint/lintWorkspace/{id}"));

        let active = supported
            && match client
                .send_request::<WorkDoneProgressCreate>(WorkDoneProgressCreateParams {
                    token: token.clone(),
                })
                .await
            {
                Ok(()) => true,
                Err(e) => {
                    warn!("Client refused progress token: {}", e);
                    false
                }
            };

        Self {
            client: client.clone(),
            token,
            active,
        }
    }

    pub fn key(&self) -> String {
        token_key(&self.token)
    }

    pub async fn begin(&self, title: &str) {
        self.send(WorkDoneProgress::Begin(WorkDoneProgressBegin {
            title: title.to_string(),
            cancellable: Some(true),
            message: None,
            percentage: Some(0),
        }))
        .await;
    }

    pub async fn report(&self, message: String, percentage: u32) {
        self.send(WorkDoneProgress::Report(WorkDoneProgressReport {
            cancellable: Some(true),
            message: Some(message),
            percentage: Some(percentage),
        }))
        .await;
    }

    pub async fn end(&self, message: String) {
        self.send(WorkDoneProgress::End(WorkDoneProgressEnd {
            message: Some(message),
        }))
        .await;
    }

    async fn send(&self, value: WorkDoneProgress) {
        if !self.active {
            return;
        }
        self.client
            .send_notification::<Progress>(ProgressParams {
                token: self.token.clone(),
                value: ProgressParamsValue::WorkDone(value),
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_key() {
        assert_eq!(token_key(&NumberOrString::Number(7)), "7");
        assert_eq!(
            token_key(&NumberOrString::String("yamllint/lintWorkspace/1".to_string())),
            "yamllint/lintWorkspace/1"
        );
    }
}
