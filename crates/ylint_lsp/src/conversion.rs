//! LSP type conversion utilities.

use std::path::PathBuf;

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString, Position, Range};

use ylint_core::{DiagnosticRecord, Severity};

/// Converts a diagnostic record to an LSP diagnostic.
pub fn to_lsp_diagnostic(record: &DiagnosticRecord) -> Diagnostic {
    let severity = match record.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
    };

    Diagnostic {
        range: to_lsp_range(record.range),
        severity: Some(severity),
        code: record.code.clone().map(NumberOrString::String),
        source: Some(record.source.clone()),
        message: record.message.clone(),
        ..Default::default()
    }
}

/// Converts a core range to an LSP range. Both are 0-based UTF-16.
pub fn to_lsp_range(range: ylint_core::Range) -> Range {
    Range::new(
        Position::new(range.start.line, range.start.character),
        Position::new(range.end.line, range.end.character),
    )
}

/// Filesystem path of a document; non-file URIs map to their path component.
pub fn document_path(uri: &tower_lsp::lsp_types::Url) -> PathBuf {
    uri.to_file_path()
        .unwrap_or_else(|_| PathBuf::from(uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::Url;
    use ylint_core::failure_diagnostic;

    fn record(severity: Severity, code: Option<&str>) -> DiagnosticRecord {
        DiagnosticRecord {
            range: ylint_core::Range::new(
                ylint_core::Position::new(1, 4),
                ylint_core::Position::new(1, 5),
            ),
            message: "trailing spaces".to_string(),
            severity,
            source: "yamllint".to_string(),
            code: code.map(str::to_string),
        }
    }

    #[test]
    fn test_to_lsp_diagnostic() {
        let diagnostic = to_lsp_diagnostic(&record(Severity::Error, Some("trailing-spaces")));

        assert_eq!(
            diagnostic.range,
            Range::new(Position::new(1, 4), Position::new(1, 5))
        );
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(
            diagnostic.code,
            Some(NumberOrString::String("trailing-spaces".to_string()))
        );
        assert_eq!(diagnostic.source.as_deref(), Some("yamllint"));
        assert_eq!(diagnostic.message, "trailing spaces");
    }

    #[test]
    fn test_warning_without_code() {
        let diagnostic = to_lsp_diagnostic(&record(Severity::Warning, None));
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diagnostic.code, None);
    }

    #[test]
    fn test_failure_diagnostic_range() {
        let diagnostic = to_lsp_diagnostic(&failure_diagnostic("boom", "a: 1\n"));
        assert_eq!(
            diagnostic.range,
            Range::new(Position::new(0, 0), Position::new(0, 1))
        );
    }

    #[test]
    fn test_document_path_for_untitled() {
        let uri = Url::parse("untitled:Untitled-1").unwrap();
        assert_eq!(document_path(&uri), PathBuf::from("Untitled-1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_document_path_for_file() {
        let uri = Url::parse("file:///work/a%20b.yaml").unwrap();
        assert_eq!(document_path(&uri), PathBuf::from("/work/a b.yaml"));
    }
}
