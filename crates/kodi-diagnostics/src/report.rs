//! Terminal rendering of diagnostics with source snippets.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};
use kodi_types::{Diagnostic, Severity};

/// Render every diagnostic as an ariadne report against `source`.
///
/// `name` labels the file in the output. Color is off, so the text is
/// stable across terminals. Each label covers up to `width` characters
/// from the diagnostic's position, stopping at the end of its line.
pub fn render(name: &str, source: &str, diagnostics: &[Diagnostic], width: u32) -> String {
    let mut out = Vec::new();
    for diagnostic in diagnostics {
        let span = char_span(source, diagnostic, width);
        let report = Report::build(report_kind(diagnostic.severity), (name, span.clone()))
            .with_config(Config::default().with_color(false))
            .with_message(&diagnostic.message)
            .with_label(Label::new((name, span)).with_message(label_text(diagnostic)))
            .finish();
        if report.write((name, Source::from(source)), &mut out).is_err() {
            out.extend(format!("{name}:{diagnostic}\n").into_bytes());
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn report_kind(severity: Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    }
}

fn label_text(diagnostic: &Diagnostic) -> &'static str {
    match diagnostic.severity {
        Severity::Error => "syntax error here",
        Severity::Warning => "not declared in this file",
        Severity::Info => "note",
    }
}

/// Character range for a 1-based line/column, clamped to the source.
fn char_span(source: &str, diagnostic: &Diagnostic, width: u32) -> Range<usize> {
    let line_index = diagnostic.line.saturating_sub(1) as usize;
    let mut offset = 0;
    let mut line_len = 0;
    for (i, line) in source.split('\n').enumerate() {
        line_len = line.chars().count();
        if i == line_index {
            break;
        }
        offset += line_len + 1;
    }

    let total = source.chars().count();
    let column = (diagnostic.column.saturating_sub(1) as usize).min(line_len);
    let start = (offset + column).min(total);
    let end = (start + width.max(1) as usize).min(offset + line_len).max(start);
    start..end.min(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_mentions_message_and_kind() {
        let source = "let x = 1\nprint(y)";
        let out = render(
            "main.kodi",
            source,
            &[Diagnostic::warning(2, 7, "Undefined variable 'y'")],
            10,
        );
        assert!(out.contains("Undefined variable 'y'"), "{out}");
        assert!(out.contains("Warning"), "{out}");
        assert!(out.contains("main.kodi"), "{out}");
    }

    #[test]
    fn span_stops_at_end_of_line() {
        let source = "let x = 1\nprint(y)";
        let d = Diagnostic::warning(2, 7, "m");
        assert_eq!(char_span(source, &d, 10), 16..18);
    }

    #[test]
    fn span_positions_beyond_the_text_are_clamped() {
        let source = "ab";
        let d = Diagnostic::error(9, 9, "m");
        let span = char_span(source, &d, 10);
        assert!(span.start <= 2 && span.end <= 2);
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert!(render("x", "", &[], 10).is_empty());
    }
}
