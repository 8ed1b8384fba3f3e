//! Lint command implementation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use miette::{IntoDiagnostic, Result, miette};
use tracing::{debug, info};
use ylint_core::{CancellationFlag, LintDocument, LintOrchestrator, Settings};
use ylint_engine::{ConfigSource, Engine};

use crate::cli::{Cli, OutputFormat};
use crate::output::{FileReport, output_results};
use crate::utils::create_tokio_runtime;

pub fn run_lint(cli: &Cli, paths: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let engine = Engine::new();
    let mut settings = Settings::default();

    // The orchestrator falls back to discovery on a broken explicit config;
    // on the command line that is a hard error instead.
    if let Some(config) = &cli.config {
        let config = std::path::absolute(config).into_diagnostic()?;
        engine
            .parse_config(&ConfigSource::File(config.clone()))
            .into_diagnostic()?;
        settings.config = config.display().to_string();
    }

    let cwd = std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .into_diagnostic()?;
    let targets = paths
        .iter()
        .map(|path| {
            if !path.exists() {
                return Err(miette!("No such file or directory: {}", path.display()));
            }
            path.canonicalize().into_diagnostic()
        })
        .collect::<Result<Vec<_>>>()?;

    let orchestrator = LintOrchestrator::new(Arc::new(engine), settings);
    let runtime = create_tokio_runtime()?;

    runtime.block_on(async {
        for target in &targets {
            if target.is_dir() {
                lint_directory(&orchestrator, target).await?;
            } else {
                lint_file(&orchestrator, target, &cwd).await?;
            }
        }
        Ok::<_, miette::Report>(())
    })?;

    let mut reports: Vec<FileReport> = orchestrator
        .published_documents()
        .into_iter()
        .filter_map(|id| {
            let path = display_path(&id.to_path()?, &cwd);
            let diagnostics = orchestrator.diagnostics(&id)?.to_vec();
            Some(FileReport { path, diagnostics })
        })
        .collect();
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    output_results(&reports, format)
}

async fn lint_file(orchestrator: &LintOrchestrator, path: &Path, cwd: &Path) -> Result<()> {
    debug!("Linting {}", path.display());
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| miette!("Failed to read {}: {}", path.display(), e))?;
    let document = LintDocument::from_path(path, text, Some(cwd.to_path_buf()));
    orchestrator.lint_now(document).await;
    Ok(())
}

async fn lint_directory(orchestrator: &LintOrchestrator, root: &Path) -> Result<()> {
    let summary = orchestrator
        .lint_workspace(root, &CancellationFlag::new(), |progress| {
            debug!(
                "[{}/{}] {}",
                progress.index + 1,
                progress.total,
                progress.path.display()
            );
        })
        .await
        .into_diagnostic()?;

    if summary.failed > 0 {
        return Err(miette!(
            "{} of {} files under {} could not be read",
            summary.failed,
            summary.total_files,
            root.display()
        ));
    }
    info!("Linted {} files under {}", summary.linted, root.display());
    Ok(())
}

/// Shows paths relative to the working directory when they live under it.
fn display_path(path: &Path, cwd: &Path) -> PathBuf {
    path.strip_prefix(cwd)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
