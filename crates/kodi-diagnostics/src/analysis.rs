//! One validation pass over a buffer.

use kodi_types::Diagnostic;
use tracing::debug;

use crate::config::DiagnosticsConfig;
use crate::declarations::collect_declarations;
use crate::engine::{EngineFailure, ScriptEngine};
use crate::locator::locate;
use crate::usage::scan_usages_with_globals;

/// Syntax check then lint, syntax diagnostic first.
///
/// A syntax failure yields exactly one Error and does not stop the lint,
/// which always runs over the raw text. The result is the complete set of
/// diagnostics for `text`; it replaces, never adds to, earlier results.
pub fn diagnose<E>(engine: &E, text: &str, config: &DiagnosticsConfig) -> Vec<Diagnostic>
where
    E: ScriptEngine + ?Sized,
{
    let mut diagnostics = Vec::new();

    if let Err(failure) = check_syntax(engine, text) {
        debug!(error = %failure, "syntax check failed");
        diagnostics.push(locate(&failure));
    }

    if config.undefined_variables {
        let lines: Vec<&str> = text.split('\n').collect();
        let declared = collect_declarations(&lines);
        diagnostics.extend(scan_usages_with_globals(&lines, &declared, &config.globals));
    }

    debug!(count = diagnostics.len(), "diagnostics produced");
    diagnostics
}

/// Tokenize and parse, discarding the tree.
pub fn check_syntax<E>(engine: &E, text: &str) -> Result<(), EngineFailure>
where
    E: ScriptEngine + ?Sized,
{
    let tokens = engine.tokenize(text)?;
    engine.parse(tokens)?;
    Ok(())
}
