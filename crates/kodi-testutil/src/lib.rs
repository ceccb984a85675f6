//! Test utilities for KodiScript diagnostics.
//!
//! Provides the parser and runner for `tests/diagnostics/*.test` fixture
//! files: a script, optional settings, and the exact diagnostics expected
//! from it.

pub mod diagnostics;

use std::fmt;

/// The result of running a single fixture case.
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    Pass,
    /// Produced diagnostics differ from the expected ones.
    Fail { expected: String, actual: String },
    Skip { reason: String },
    /// The case itself is malformed.
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }
}

/// Tally of a fixture run.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub failures: Vec<TestFailure>,
}

/// A failing or broken case, with where it lives.
#[derive(Debug, Clone)]
pub struct TestFailure {
    pub name: String,
    pub line: usize,
    pub result: TestResult,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, line: usize, result: TestResult) {
        match result {
            TestResult::Pass => self.passed += 1,
            TestResult::Skip { .. } => self.skipped += 1,
            TestResult::Fail { .. } | TestResult::Error { .. } => {
                if result.is_fail() {
                    self.failed += 1;
                } else {
                    self.errors += 1;
                }
                self.failures.push(TestFailure {
                    name: name.into(),
                    line,
                    result,
                });
            }
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}", "═".repeat(60))?;
        writeln!(
            f,
            "Diagnostics fixtures: {} total, {} passed, {} failed, {} skipped, {} errors",
            self.total(),
            self.passed,
            self.failed,
            self.skipped,
            self.errors
        )?;

        for failure in &self.failures {
            writeln!(f, "\n  {} (line {})", failure.name, failure.line)?;
            match &failure.result {
                TestResult::Fail { expected, actual } => {
                    writeln!(f, "    expected:")?;
                    for line in expected.lines() {
                        writeln!(f, "      {line}")?;
                    }
                    writeln!(f, "    actual:")?;
                    for line in actual.lines() {
                        writeln!(f, "      {line}")?;
                    }
                }
                TestResult::Error { message } => writeln!(f, "    error: {message}")?,
                TestResult::Pass | TestResult::Skip { .. } => {}
            }
        }
        writeln!(f, "{}", "═".repeat(60))
    }
}
