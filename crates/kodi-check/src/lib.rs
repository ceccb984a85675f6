//! kodi-check: KodiScript diagnostics from the command line.
//!
//! Two modes share one [`DiagnosticsService`](kodi_diagnostics::DiagnosticsService):
//!
//! - [`files`]: check files once and print reports or JSON.
//! - [`stdio`]: a long-running JSON-lines server for editors, with
//!   per-buffer debouncing.

pub mod cli;
pub mod files;
pub mod stdio;

pub use cli::Cli;
pub use files::{CheckOutcome, check_files};
pub use stdio::{Request, Response, serve};
