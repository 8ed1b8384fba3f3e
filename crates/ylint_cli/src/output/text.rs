//! Text output formatter

use ylint_core::{DiagnosticRecord, Severity};

use super::FileReport;

pub fn output_text(reports: &[FileReport]) {
    for report in reports {
        if report.diagnostics.is_empty() {
            continue;
        }

        println!("\n{}:", report.path.display());
        for diag in &report.diagnostics {
            println!("  {}", format_diagnostic(diag));
        }
    }

    let total_files = reports.len();
    let total_problems: usize = reports.iter().map(|r| r.diagnostics.len()).sum();

    println!();
    println!(
        "Checked {} files, found {} problems",
        total_files, total_problems
    );
}

/// `line:col severity [rule]: message`, 1-based.
fn format_diagnostic(diag: &DiagnosticRecord) -> String {
    let severity = match diag.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };
    let position = format!(
        "{}:{}",
        diag.range.start.line + 1,
        diag.range.start.character + 1
    );
    match &diag.code {
        Some(code) => format!("{position} {severity} [{code}]: {}", diag.message),
        None => format!("{position} {severity}: {}", diag.message),
    }
}
