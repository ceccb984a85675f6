//! kodi-types: the data shared between the diagnostics engine and editors.
//!
//! Everything here is a plain value. A [`Diagnostic`] serializes to the stable
//! wire shape used by out-of-process transports:
//!
//! ```json
//! { "line": 2, "column": 7, "message": "Undefined variable 'y'", "severity": "warning" }
//! ```
//!
//! Editors that draw squiggles want a range rather than a point, so a
//! diagnostic can be widened into a [`Marker`].

mod diagnostic;
mod marker;

pub use diagnostic::{Diagnostic, ParseSeverityError, Severity};
pub use marker::Marker;
