//! kodi-diagnostics: live diagnostics for KodiScript buffers.
//!
//! Every validation runs two independent passes over the text:
//!
//! - **Syntax**: the script engine tokenizes and parses. A failure becomes
//!   one Error, positioned by reading the engine's message ([`locator`]).
//! - **Undefined variables**: a line-based lint. [`declarations`] gathers
//!   every `let` name and `fn` parameter in the file, then [`usage`] reports
//!   the first plain use of each name that is not declared, a keyword, a
//!   native function or a configured global. Strings and comments are
//!   blanked first ([`scrub`]).
//!
//! The syntax diagnostic (if any) comes first, then warnings in source
//! order. The engine is loaded lazily, once, through [`EngineHandle`]; if it
//! cannot be loaded, validation yields nothing rather than an error.
//!
//! # Example
//!
//! ```
//! use kodi_diagnostics::{DiagnosticsConfig, DiagnosticsService};
//!
//! # tokio_test_block(async {
//! let service = DiagnosticsService::builtin(DiagnosticsConfig::default());
//! let diagnostics = service.produce_diagnostics("let x = 1\nprint(y)").await;
//! assert_eq!(diagnostics[0].to_string(), "2:7: warning: Undefined variable 'y'");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod declarations;
pub mod engine;
pub mod locator;
pub mod report;
pub mod scrub;
pub mod service;
pub mod usage;
pub mod vocabulary;

pub use analysis::{check_syntax, diagnose};
pub use config::{ConfigError, DiagnosticsConfig};
pub use declarations::{DeclaredNames, collect_declarations};
pub use engine::{
    BuiltinEngineLoader, EngineFailure, EngineHandle, EngineLoader, LoadError, ScriptEngine,
};
pub use kodi_types::{Diagnostic, Marker, Severity};
pub use locator::{locate, locate_message};
pub use scrub::scrub;
pub use service::DiagnosticsService;
pub use usage::{scan_usages, scan_usages_with_globals};
