//! Document identity and lint input.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

/// Identity of a document, as the host knows it (a URI string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds a `file://` identity for an absolute path, or uses the path
    /// text as-is when it cannot be expressed as a URI.
    pub fn from_path(path: &Path) -> Self {
        match Url::from_file_path(path) {
            Ok(url) => Self(url.to_string()),
            Err(()) => Self(path.display().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The filesystem path behind a `file://` identity.
    pub fn to_path(&self) -> Option<PathBuf> {
        Url::parse(&self.0).ok()?.to_file_path().ok()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A snapshot of a document to lint.
#[derive(Debug, Clone)]
pub struct LintDocument {
    pub id: DocumentId,
    pub path: PathBuf,
    pub text: Arc<str>,
    /// Workspace folder containing the document, if any.
    pub workspace_root: Option<PathBuf>,
}

impl LintDocument {
    pub fn new(
        id: DocumentId,
        path: impl Into<PathBuf>,
        text: impl Into<Arc<str>>,
        workspace_root: Option<PathBuf>,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            text: text.into(),
            workspace_root,
        }
    }

    /// A document read from disk, identified by its `file://` URI.
    pub fn from_path(
        path: impl Into<PathBuf>,
        text: impl Into<Arc<str>>,
        workspace_root: Option<PathBuf>,
    ) -> Self {
        let path = path.into();
        Self::new(DocumentId::from_path(&path), path, text, workspace_root)
    }
}
