//! Undefined-variable lint.
//!
//! Walks every identifier in the scrubbed text and reports plain uses of
//! names that are neither declared, keywords, natives nor host globals.
//! This is a heuristic over text, not name resolution: scoping, shadowing
//! and declaration order are all ignored.

use std::collections::HashSet;

use kodi_types::Diagnostic;

use crate::declarations::{DeclaredNames, identifier_end, is_word_char};
use crate::scrub::{is_comment_line, scrub};
use crate::vocabulary::{is_keyword, is_native_function};

/// Report undefined names in `lines`, given the file's declarations.
pub fn scan_usages<S: AsRef<str>>(lines: &[S], declared: &DeclaredNames) -> Vec<Diagnostic> {
    scan_usages_with_globals(lines, declared, &[])
}

/// Like [`scan_usages`], also treating `globals` as known.
///
/// Each name is reported once, at its first plain use.
pub fn scan_usages_with_globals<S: AsRef<str>>(
    lines: &[S],
    declared: &DeclaredNames,
    globals: &[String],
) -> Vec<Diagnostic> {
    let mut reported: HashSet<String> = HashSet::new();
    let mut diagnostics = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if is_comment_line(line) {
            continue;
        }
        let chars: Vec<char> = scrub(line).chars().collect();

        for (start, end) in identifiers(&chars) {
            if is_declaration_site(&chars, start)
                || is_property_access(&chars, start)
                || is_call_target(&chars, end)
            {
                continue;
            }

            let name: String = chars[start..end].iter().collect();
            if is_keyword(&name)
                || is_native_function(&name)
                || declared.contains(&name)
                || globals.contains(&name)
                || reported.contains(&name)
            {
                continue;
            }

            diagnostics.push(Diagnostic::warning(
                to_u32(index + 1),
                to_u32(start + 1),
                format!("Undefined variable '{name}'"),
            ));
            reported.insert(name);
        }
    }

    diagnostics
}

/// `(start, end)` of every identifier, left to right.
///
/// An identifier starts at a letter or `_` that follows a non-word
/// character; word runs starting with a digit are skipped whole.
fn identifiers(chars: &[char]) -> Vec<(usize, usize)> {
    let mut found = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if !is_word_char(chars[i]) {
            i += 1;
            continue;
        }
        let end = match identifier_end(chars, i) {
            Some(end) => {
                found.push((i, end));
                end
            }
            None => i + chars[i..].iter().take_while(|&&c| is_word_char(c)).count(),
        };
        i = end;
    }
    found
}

/// Preceded by the word `let` and at least one space.
fn is_declaration_site(chars: &[char], start: usize) -> bool {
    let before = &chars[..start];
    let trimmed = before.len()
        - before
            .iter()
            .rev()
            .take_while(|c| c.is_whitespace())
            .count();
    if trimmed == before.len() || trimmed < 3 {
        return false;
    }
    before[trimmed - 3..trimmed] == ['l', 'e', 't']
        && (trimmed == 3 || !is_word_char(before[trimmed - 4]))
}

/// Preceded by `.` (which also covers `?.`).
fn is_property_access(chars: &[char], start: usize) -> bool {
    chars[..start]
        .iter()
        .rev()
        .find(|c| !c.is_whitespace())
        .is_some_and(|&c| c == '.')
}

/// Followed by `(`.
fn is_call_target(chars: &[char], end: usize) -> bool {
    chars[end..]
        .iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|&c| c == '(')
}

fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
