//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kodi_diagnostics::DiagnosticsConfig;

/// Check KodiScript files for syntax errors and undefined variables.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "kodi-check", version, about)]
pub struct Cli {
    /// Print one JSON object per file instead of annotated reports.
    #[arg(long)]
    pub json: bool,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Serve JSON-lines requests on stdin/stdout.
    #[arg(long, conflicts_with = "files")]
    pub stdio: bool,

    /// Files to check.
    #[arg(value_name = "FILE", required_unless_present = "stdio")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Load the configuration named by `--config`, or the default one.
    pub fn load_config(&self) -> Result<DiagnosticsConfig> {
        match &self.config {
            Some(path) => DiagnosticsConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display())),
            None => DiagnosticsConfig::load_default().context("failed to load default config"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_mode() {
        let cli = Cli::try_parse_from(["kodi-check", "--json", "a.kodi", "b.kodi"]).expect("parse");
        assert!(cli.json);
        assert!(!cli.stdio);
        assert_eq!(cli.files, vec![PathBuf::from("a.kodi"), PathBuf::from("b.kodi")]);
    }

    #[test]
    fn stdio_mode_needs_no_files() {
        let cli = Cli::try_parse_from(["kodi-check", "--stdio"]).expect("parse");
        assert!(cli.stdio);
        assert!(cli.files.is_empty());
    }

    #[test]
    fn files_are_required_outside_stdio() {
        assert!(Cli::try_parse_from(["kodi-check"]).is_err());
    }

    #[test]
    fn stdio_conflicts_with_files() {
        assert!(Cli::try_parse_from(["kodi-check", "--stdio", "a.kodi"]).is_err());
    }

    #[test]
    fn explicit_config_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("diagnostics.toml");
        std::fs::write(&path, "undefined_variables = false\nglobals = [\"env\"]\n").expect("write");

        let cli = Cli::try_parse_from(["kodi-check", "--config", path.to_str().expect("utf8"), "x"])
            .expect("parse");
        let config = cli.load_config().expect("config");
        assert!(!config.undefined_variables);
        assert_eq!(config.globals, vec!["env"]);
    }
}
