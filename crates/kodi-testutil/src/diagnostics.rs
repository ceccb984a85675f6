//! Diagnostics fixture files.
//!
//! Format:
//!
//! ```text
//! # test: undefined_after_let
//! # globals: request, env
//! ---
//! let x = 1
//! print(y)
//! ---
//! 2:7 warning Undefined variable 'y'
//! ===
//! ```
//!
//! Header lines between `# test:` and the first `---` are optional:
//! `# globals: a, b` adds host globals, `# syntax-only` turns the lint off,
//! `# skip: reason` skips the case. The expected section holds one
//! `line:column severity message` per diagnostic, in order; an empty
//! section means no diagnostics.

use kodi_diagnostics::{Diagnostic, DiagnosticsConfig, diagnose};

use crate::{TestResult, TestSummary};

/// A single fixture case.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsTestCase {
    pub name: String,
    /// Line of the `# test:` header (1-indexed).
    pub line_number: usize,
    pub input: String,
    /// Expected lines, trimmed, in order.
    pub expected: Vec<String>,
    pub globals: Vec<String>,
    pub syntax_only: bool,
    pub skip: Option<String>,
}

/// Parse a fixture file into cases.
pub fn parse_diagnostics_tests(content: &str) -> Vec<DiagnosticsTestCase> {
    let mut cases = Vec::new();
    let lines: Vec<&str> = content.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let Some(name) = lines[i].trim().strip_prefix("# test:") else {
            i += 1;
            continue;
        };
        let mut case = DiagnosticsTestCase {
            name: name.trim().to_string(),
            line_number: i + 1,
            input: String::new(),
            expected: Vec::new(),
            globals: Vec::new(),
            syntax_only: false,
            skip: None,
        };
        i += 1;

        // Settings up to the first ---
        while i < lines.len() && lines[i].trim() != "---" {
            let header = lines[i].trim();
            if let Some(globals) = header.strip_prefix("# globals:") {
                case.globals.extend(
                    globals
                        .split(',')
                        .map(str::trim)
                        .filter(|g| !g.is_empty())
                        .map(str::to_string),
                );
            } else if header == "# syntax-only" {
                case.syntax_only = true;
            } else if let Some(reason) = header.strip_prefix("# skip:") {
                case.skip = Some(reason.trim().to_string());
            }
            i += 1;
        }
        i += 1; // skip the ---

        // Input, verbatim, until the next ---
        let mut input_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            input_lines.push(lines[i]);
            i += 1;
        }
        i += 1; // skip the ---

        // Expected until ===
        while i < lines.len() && lines[i].trim() != "===" {
            let expected = lines[i].trim();
            if !expected.is_empty() {
                case.expected.push(expected.to_string());
            }
            i += 1;
        }
        i += 1; // skip the ===

        case.input = input_lines.join("\n");
        cases.push(case);
    }

    cases
}

/// `line:column severity message`
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{} {} {}",
        diagnostic.line, diagnostic.column, diagnostic.severity, diagnostic.message
    )
}

impl DiagnosticsTestCase {
    pub fn config(&self) -> DiagnosticsConfig {
        DiagnosticsConfig {
            undefined_variables: !self.syntax_only,
            globals: self.globals.clone(),
            ..DiagnosticsConfig::default()
        }
    }

    /// Run against the bundled engine.
    pub fn run(&self) -> TestResult {
        if let Some(reason) = &self.skip {
            return TestResult::Skip {
                reason: reason.clone(),
            };
        }
        if self.name.is_empty() {
            return TestResult::Error {
                message: "test has no name".to_string(),
            };
        }

        let engine = kodi_script::Engine::new();
        let actual: Vec<String> = diagnose(&engine, &self.input, &self.config())
            .iter()
            .map(format_diagnostic)
            .collect();

        if actual == self.expected {
            TestResult::Pass
        } else {
            TestResult::Fail {
                expected: render(&self.expected),
                actual: render(&actual),
            }
        }
    }
}

fn render(lines: &[String]) -> String {
    if lines.is_empty() {
        "(none)".to_string()
    } else {
        lines.join("\n")
    }
}

/// Run every case and summarise.
pub fn run_diagnostics_tests(cases: &[DiagnosticsTestCase]) -> TestSummary {
    let mut summary = TestSummary::new();
    for case in cases {
        summary.record(&case.name, case.line_number, case.run());
    }
    summary
}
