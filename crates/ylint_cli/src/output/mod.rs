//! Output formatting module

mod json;
mod text;

use std::path::PathBuf;

use miette::Result;
use serde::Serialize;
use ylint_core::{DiagnosticRecord, Severity};

use crate::cli::OutputFormat;

/// Diagnostics for one linted file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<DiagnosticRecord>,
}

impl FileReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

/// Prints `reports` and returns whether any of them carries an error.
pub fn output_results(reports: &[FileReport], format: OutputFormat) -> Result<bool> {
    let has_errors = reports.iter().any(FileReport::has_errors);

    match format {
        OutputFormat::Json => json::output_json(reports)?,
        OutputFormat::Text => text::output_text(reports),
    }

    Ok(has_errors)
}
