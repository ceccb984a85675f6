//! Recovering a position from a free-form error message.
//!
//! The engine only promises human-readable text. Messages usually embed a
//! location such as `at line 3, column 5` or `line 3:5`, so the locator
//! looks for those shapes in order and falls back to the top of the file.
//! It never fails.

use kodi_types::Diagnostic;

use crate::engine::EngineFailure;

/// Turn an engine failure into an Error diagnostic.
pub fn locate(failure: &EngineFailure) -> Diagnostic {
    locate_message(failure.message())
}

/// Turn raw error text into an Error diagnostic.
///
/// In order, first match wins:
/// 1. `[at ]line N, column M` or `[at ]line N:M` gives `N:M`, and the
///    matched text is cut out of the message (the full text is kept if
///    nothing else remains).
/// 2. `line N` gives `N:1` with the message unchanged.
/// 3. Otherwise `1:1` with the message unchanged.
///
/// Keywords match case-insensitively.
pub fn locate_message(message: &str) -> Diagnostic {
    let chars: Vec<char> = message.chars().collect();

    if let Some(found) = (0..chars.len()).find_map(|i| match_line_column(&chars, i)) {
        let mut rest: String = chars[..found.start].iter().collect();
        rest.extend(&chars[found.end..]);
        let rest = rest.trim();
        let text = if rest.is_empty() { message } else { rest };
        return Diagnostic::error(found.line, found.column, text);
    }

    if let Some(line) = (0..chars.len()).find_map(|i| match_line(&chars, i).map(|(n, _)| n)) {
        return Diagnostic::error(line, 1, message);
    }

    Diagnostic::error(1, 1, message)
}

/// A rule 1 match: `[start, end)` in chars.
struct LineColumn {
    start: usize,
    end: usize,
    line: u32,
    column: u32,
}

fn match_line_column(chars: &[char], start: usize) -> Option<LineColumn> {
    // Prefer the longer match that swallows a leading `at `
    let with_at = keyword(chars, start, "at")
        .and_then(|i| whitespace1(chars, i))
        .and_then(|i| line_column_from(chars, i));
    let (end, line, column) = with_at.or_else(|| line_column_from(chars, start))?;
    Some(LineColumn {
        start,
        end,
        line,
        column,
    })
}

/// `line N` then `,? column M` or `: M`. Returns `(end, N, M)`.
fn line_column_from(chars: &[char], i: usize) -> Option<(usize, u32, u32)> {
    let (line, i) = match_line(chars, i)?;
    let i = column_separator(chars, i)?;
    let (column, end) = number(chars, i)?;
    Some((end, line, column))
}

/// `line` whitespace+ digits+. Returns the number and the index after it.
fn match_line(chars: &[char], i: usize) -> Option<(u32, usize)> {
    let i = keyword(chars, i, "line")?;
    let i = whitespace1(chars, i)?;
    number(chars, i)
}

fn column_separator(chars: &[char], i: usize) -> Option<usize> {
    // `,? \s* column \s+`
    let mut j = i;
    if chars.get(j) == Some(&',') {
        j += 1;
    }
    let j = whitespace0(chars, j);
    if let Some(after) = keyword(chars, j, "column").and_then(|k| whitespace1(chars, k)) {
        return Some(after);
    }

    // `\s* : \s*`
    let j = whitespace0(chars, i);
    if chars.get(j) == Some(&':') {
        return Some(whitespace0(chars, j + 1));
    }

    None
}

/// Case-insensitive literal. Returns the index after it.
fn keyword(chars: &[char], i: usize, word: &str) -> Option<usize> {
    let mut j = i;
    for expected in word.chars() {
        match chars.get(j) {
            Some(c) if c.eq_ignore_ascii_case(&expected) => j += 1,
            _ => return None,
        }
    }
    Some(j)
}

fn whitespace0(chars: &[char], mut i: usize) -> usize {
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    i
}

fn whitespace1(chars: &[char], i: usize) -> Option<usize> {
    let j = whitespace0(chars, i);
    (j > i).then_some(j)
}

/// Digits starting at `i`, parsed. Values that do not fit are no match.
fn number(chars: &[char], i: usize) -> Option<(u32, usize)> {
    let len = chars[i.min(chars.len())..]
        .iter()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if len == 0 {
        return None;
    }
    let digits: String = chars[i..i + len].iter().collect();
    let value = digits.parse::<u32>().ok()?;
    Some((value, i + len))
}
