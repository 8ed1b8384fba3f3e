//! Cancellable whole-workspace lint.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::{info, warn};

use crate::document::LintDocument;
use crate::error::LintError;
use crate::file_finder::FileFinder;
use crate::orchestrator::LintOrchestrator;

/// Shared flag used to stop a running workspace lint.
///
/// Cancellation is observed between files; the file being linted finishes.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Reported before each file is linted.
#[derive(Debug, Clone)]
pub struct WorkspaceProgress {
    /// 0-based index of the file about to be linted.
    pub index: usize,
    pub total: usize,
    pub path: PathBuf,
}

impl WorkspaceProgress {
    /// Completion percentage before this file, 0 to 100.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        u32::try_from(self.index * 100 / self.total).unwrap_or(100)
    }
}

/// Outcome of a workspace lint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSummary {
    pub total_files: usize,
    pub linted: usize,
    /// Files that could not be read.
    pub failed: usize,
    /// Diagnostics published across all linted files.
    pub problems: usize,
    pub cancelled: bool,
}

impl LintOrchestrator {
    /// Lints every YAML file under `root`, one at a time.
    ///
    /// Unreadable files are logged and counted; they never abort the batch.
    /// Returns [`LintError::Disabled`] when linting is switched off.
    pub async fn lint_workspace<F>(
        &self,
        root: &Path,
        cancel: &CancellationFlag,
        mut on_progress: F,
    ) -> Result<WorkspaceSummary, LintError>
    where
        F: FnMut(&WorkspaceProgress),
    {
        if !self.settings().enable {
            return Err(LintError::Disabled);
        }

        let finder = FileFinder::yaml()?;
        let root_owned = root.to_path_buf();
        let files = tokio::task::spawn_blocking(move || finder.discover_files(&root_owned))
            .await
            .map_err(|e| LintError::Worker(e.to_string()))?;

        let mut summary = WorkspaceSummary {
            total_files: files.len(),
            ..WorkspaceSummary::default()
        };

        for (index, path) in files.into_iter().enumerate() {
            if cancel.is_cancelled() {
                info!("Workspace lint cancelled after {} files", summary.linted);
                summary.cancelled = true;
                break;
            }

            on_progress(&WorkspaceProgress {
                index,
                total: summary.total_files,
                path: path.clone(),
            });

            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    summary.failed += 1;
                    continue;
                }
            };

            let document = LintDocument::from_path(path, text, Some(root.to_path_buf()));
            let id = document.id.clone();
            self.lint_now(document).await;

            summary.linted += 1;
            summary.problems += self.diagnostics(&id).map_or(0, |d| d.len());
        }

        info!(
            "Linted {} of {} YAML files ({} problems, {} failed)",
            summary.linted, summary.total_files, summary.problems, summary.failed
        );
        Ok(summary)
    }
}
