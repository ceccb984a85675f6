//! kodi-check: check KodiScript files, or serve diagnostics over stdio.
//!
//! # Usage
//!
//! ```bash
//! kodi-check scripts/*.kodi
//! kodi-check --json main.kodi
//! kodi-check --stdio
//! ```
//!
//! Exit status is 0 when no file has a syntax error, 1 when one does, and
//! 2 when the arguments, configuration or files cannot be used.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use kodi_check::{Cli, check_files, serve};
use kodi_diagnostics::DiagnosticsService;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_tracing() {
        eprintln!("kodi-check: {err:#}");
        return ExitCode::from(2);
    }

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("kodi-check: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("kodi_check=warn".parse()?))
        .init();
    Ok(())
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.load_config()?;
    let service = DiagnosticsService::builtin(config);

    if cli.stdio {
        tracing::info!("serving diagnostics on stdio");
        serve(Arc::new(service), tokio::io::stdin(), tokio::io::stdout()).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut stdout = std::io::stdout().lock();
    let outcome = check_files(&service, &cli.files, cli.json, &mut stdout).await?;
    tracing::info!(
        files = outcome.files,
        errors = outcome.errors,
        warnings = outcome.warnings,
        "check complete"
    );

    Ok(if outcome.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
