//! Diagnostic values and severities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How serious a diagnostic is.
///
/// Serialized lowercase to match the editor wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// The lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of `error`, `warning`, `info`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity '{0}' (expected error, warning or info)")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// A single reported issue in a buffer.
///
/// `line` and `column` are 1-based. Columns count characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    /// Create a diagnostic. Positions below 1 are clamped to 1.
    pub fn new(line: u32, column: u32, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            line: line.max(1),
            column: column.max(1),
            message: message.into(),
            severity,
        }
    }

    pub fn error(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::new(line, column, message, Severity::Error)
    }

    pub fn warning(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::new(line, column, message, Severity::Warning)
    }

    pub fn info(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::new(line, column, message, Severity::Info)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.severity, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn wire_shape_is_stable() {
        let d = Diagnostic::warning(2, 7, "Undefined variable 'y'");
        let json = serde_json::to_value(&d).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "line": 2,
                "column": 7,
                "message": "Undefined variable 'y'",
                "severity": "warning",
            })
        );
    }

    #[test]
    fn deserializes_from_wire_shape() {
        let d: Diagnostic = serde_json::from_str(
            r#"{"line":1,"column":3,"message":"bad","severity":"error"}"#,
        )
        .expect("deserialize");
        assert_eq!(d, Diagnostic::error(1, 3, "bad"));
    }

    #[test]
    fn positions_are_clamped_to_one() {
        let d = Diagnostic::error(0, 0, "x");
        assert_eq!((d.line, d.column), (1, 1));
    }

    #[rstest]
    #[case::error("error", Severity::Error)]
    #[case::warning("warning", Severity::Warning)]
    #[case::warn_alias("warn", Severity::Warning)]
    #[case::info("info", Severity::Info)]
    #[case::mixed_case("Error", Severity::Error)]
    fn severity_parses(#[case] input: &str, #[case] expected: Severity) {
        assert_eq!(input.parse::<Severity>(), Ok(expected));
    }

    #[test]
    fn severity_rejects_unknown() {
        let err = "hint".parse::<Severity>().unwrap_err();
        assert!(err.to_string().contains("hint"));
    }

    #[test]
    fn display_is_compact() {
        let d = Diagnostic::error(3, 4, "Unexpected token");
        assert_eq!(d.to_string(), "3:4: error: Unexpected token");
    }
}
