//! Display ranges for editor gutters and squiggles.

use serde::{Deserialize, Serialize};

use crate::{Diagnostic, Severity};

/// A diagnostic widened into a single-line range.
///
/// The start position is always the diagnostic's own position; only the end
/// is approximate, since neither pass knows the extent of the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub message: String,
    pub severity: Severity,
    pub source: String,
}

impl Diagnostic {
    /// Widen into a marker spanning `width` columns (at least one).
    pub fn to_marker(&self, width: u32, source: &str) -> Marker {
        Marker {
            start_line: self.line,
            start_column: self.column,
            end_line: self.line,
            end_column: self.column.saturating_add(width.max(1)),
            message: self.message.clone(),
            severity: self.severity,
            source: source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_keeps_start_position() {
        let m = Diagnostic::warning(2, 7, "Undefined variable 'y'").to_marker(10, "KodiScript");
        assert_eq!((m.start_line, m.start_column), (2, 7));
        assert_eq!((m.end_line, m.end_column), (2, 17));
        assert_eq!(m.source, "KodiScript");
    }

    #[test]
    fn zero_width_still_covers_one_column() {
        let m = Diagnostic::error(1, 1, "x").to_marker(0, "KodiScript");
        assert_eq!(m.end_column, 2);
    }

    #[test]
    fn marker_serializes_camel_case() {
        let m = Diagnostic::info(1, 2, "note").to_marker(3, "KodiScript");
        let json = serde_json::to_value(&m).expect("serialize");
        assert_eq!(json["startLine"], 1);
        assert_eq!(json["endColumn"], 5);
        assert_eq!(json["severity"], "info");
    }
}
