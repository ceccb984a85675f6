//! One-shot checking of files on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use kodi_diagnostics::{Diagnostic, DiagnosticsService, EngineLoader, report};
use serde::Serialize;

/// What a run over a set of files found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckOutcome {
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    fn record(&mut self, diagnostics: &[Diagnostic]) {
        self.files += 1;
        for diagnostic in diagnostics {
            if diagnostic.is_error() {
                self.errors += 1;
            } else {
                self.warnings += 1;
            }
        }
    }
}

/// One line of `--json` output.
#[derive(Debug, Serialize)]
struct FileReport<'a> {
    file: String,
    diagnostics: &'a [Diagnostic],
}

/// Check each file and write its diagnostics to `out`.
///
/// A file that cannot be read aborts the run.
pub async fn check_files<L, W>(
    service: &DiagnosticsService<L>,
    files: &[PathBuf],
    json: bool,
    out: &mut W,
) -> Result<CheckOutcome>
where
    L: EngineLoader + 'static,
    W: Write,
{
    let mut outcome = CheckOutcome::default();

    for path in files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let diagnostics = service.produce_diagnostics(&text).await;
        tracing::debug!(file = %path.display(), count = diagnostics.len(), "checked");
        outcome.record(&diagnostics);

        if json {
            let line = serde_json::to_string(&FileReport {
                file: path.display().to_string(),
                diagnostics: &diagnostics,
            })?;
            writeln!(out, "{line}")?;
        } else {
            write_report(service, path, &text, &diagnostics, out)?;
        }
    }

    Ok(outcome)
}

fn write_report<L: EngineLoader, W: Write>(
    service: &DiagnosticsService<L>,
    path: &Path,
    text: &str,
    diagnostics: &[Diagnostic],
    out: &mut W,
) -> Result<()> {
    if diagnostics.is_empty() {
        return Ok(());
    }
    let name = path.display().to_string();
    let width = service.config().marker_width;
    out.write_all(report::render(&name, text, diagnostics, width).as_bytes())?;
    Ok(())
}
