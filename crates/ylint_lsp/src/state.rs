//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tower_lsp::lsp_types::Url;
use tracing::error;
use ylint_core::{CancellationFlag, DocumentId, LintDocument};

use crate::conversion::document_path;
use crate::sink::PublishReceiver;

/// Document content and version cache.
#[derive(Debug, Clone)]
pub(crate) struct DocumentData {
    pub text: Arc<str>,
    pub version: i32,
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Document contents cache.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    /// Workspace folder paths, in the order the client sent them.
    pub workspace_folders: RwLock<Vec<PathBuf>>,
    /// Cancellation flags of running workspace lints, by progress token.
    pub progress: Mutex<HashMap<String, CancellationFlag>>,
    /// Client accepts `window/workDoneProgress/create`.
    pub supports_progress: AtomicBool,
    /// Client answers `workspace/configuration` requests.
    pub supports_configuration: AtomicBool,
    /// Client accepts dynamic `didChangeWatchedFiles` registration.
    pub supports_watch_registration: AtomicBool,
    /// Diagnostic updates waiting for the forwarding task to start.
    pub publish_rx: Mutex<Option<PublishReceiver>>,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("workspace_folders", &self.workspace_folders)
            .field("supports_progress", &self.supports_progress)
            .finish()
    }
}

impl BackendState {
    pub fn new(publish_rx: PublishReceiver) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            workspace_folders: RwLock::new(Vec::new()),
            progress: Mutex::new(HashMap::new()),
            supports_progress: AtomicBool::new(false),
            supports_configuration: AtomicBool::new(false),
            supports_watch_registration: AtomicBool::new(false),
            publish_rx: Mutex::new(Some(publish_rx)),
        }
    }

    pub fn upsert_document(&self, uri: Url, text: Arc<str>, version: i32) {
        match self.documents.write() {
            Ok(mut docs) => {
                docs.insert(uri, DocumentData { text, version });
            }
            Err(e) => error!("Documents lock poisoned: {}", e),
        }
    }

    pub fn remove_document(&self, uri: &Url) {
        match self.documents.write() {
            Ok(mut docs) => {
                docs.remove(uri);
            }
            Err(e) => error!("Documents lock poisoned: {}", e),
        }
    }

    pub fn document(&self, uri: &Url) -> Option<DocumentData> {
        match self.documents.read() {
            Ok(docs) => docs.get(uri).cloned(),
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                None
            }
        }
    }

    /// Lint input for every open document.
    pub fn open_documents(&self) -> Vec<LintDocument> {
        let docs = match self.documents.read() {
            Ok(docs) => docs,
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                return Vec::new();
            }
        };
        docs.iter()
            .map(|(uri, data)| self.lint_document(uri, Arc::clone(&data.text)))
            .collect()
    }

    /// Builds the lint input for `uri` with `text`.
    pub fn lint_document(&self, uri: &Url, text: Arc<str>) -> LintDocument {
        let path = document_path(uri);
        let root = self.workspace_root_for(&path);
        LintDocument::new(DocumentId::new(uri.as_str()), path, text, root)
    }

    pub fn set_workspace_folders(&self, folders: Vec<PathBuf>) {
        match self.workspace_folders.write() {
            Ok(mut current) => *current = folders,
            Err(e) => error!("Workspace folders lock poisoned: {}", e),
        }
    }

    pub fn workspace_folders(&self) -> Vec<PathBuf> {
        match self.workspace_folders.read() {
            Ok(folders) => folders.to_vec(),
            Err(e) => {
                error!("Workspace folders lock poisoned: {}", e);
                Vec::new()
            }
        }
    }

    /// The first workspace folder, used for workspace-wide commands.
    pub fn primary_root(&self) -> Option<PathBuf> {
        match self.workspace_folders.read() {
            Ok(folders) => folders.first().cloned(),
            Err(e) => {
                error!("Workspace folders lock poisoned: {}", e);
                None
            }
        }
    }

    /// The innermost workspace folder containing `path`.
    pub fn workspace_root_for(&self, path: &Path) -> Option<PathBuf> {
        let folders = match self.workspace_folders.read() {
            Ok(folders) => folders,
            Err(e) => {
                error!("Workspace folders lock poisoned: {}", e);
                return None;
            }
        };
        folders
            .iter()
            .filter(|folder| path.starts_with(folder))
            .max_by_key(|folder| folder.components().count())
            .cloned()
    }

    pub fn register_progress(&self, token: String, flag: CancellationFlag) {
        match self.progress.lock() {
            Ok(mut progress) => {
                progress.insert(token, flag);
            }
            Err(e) => error!("Progress lock poisoned: {}", e),
        }
    }

    pub fn finish_progress(&self, token: &str) {
        match self.progress.lock() {
            Ok(mut progress) => {
                progress.remove(token);
            }
            Err(e) => error!("Progress lock poisoned: {}", e),
        }
    }

    /// Cancels the workspace lint behind `token`. Returns whether one was running.
    pub fn cancel_progress(&self, token: &str) -> bool {
        match self.progress.lock() {
            Ok(progress) => match progress.get(token) {
                Some(flag) => {
                    flag.cancel();
                    true
                }
                None => false,
            },
            Err(e) => {
                error!("Progress lock poisoned: {}", e);
                false
            }
        }
    }

    pub fn take_publish_rx(&self) -> Option<PublishReceiver> {
        match self.publish_rx.lock() {
            Ok(mut rx) => rx.take(),
            Err(e) => {
                error!("Publish channel lock poisoned: {}", e);
                None
            }
        }
    }

    pub fn supports_progress(&self) -> bool {
        self.supports_progress.load(Ordering::Relaxed)
    }

    pub fn supports_configuration(&self) -> bool {
        self.supports_configuration.load(Ordering::Relaxed)
    }
}

/// Type alias for shared state.
pub(crate) type SharedState = Arc<BackendState>;
