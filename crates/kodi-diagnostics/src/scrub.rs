//! Blanking of string literals and comments.
//!
//! Scanning passes work on raw lines with simple character tests, so text
//! inside `"..."`, `'...'` and after `//` must not look like code. Scrubbing
//! replaces that text with spaces and keeps every other character where it
//! was, so a column in the scrubbed line is a column in the original.

/// Replace string literals and the trailing comment of `line` with spaces.
///
/// The result has exactly as many characters as the input.
///
/// Literals are found first, left to right: a quote opens a literal that
/// runs to the next quote of the same kind (the quotes included), or to the
/// end of the line when it never closes. Backslash escapes are not
/// understood, so `"a\"b"` closes at the escaped quote. Only then is the
/// first remaining `//` located; it and everything after it are blanked.
pub fn scrub(line: &str) -> String {
    let mut out: Vec<char> = Vec::with_capacity(line.len());
    let mut open: Option<char> = None;

    for ch in line.chars() {
        match open {
            Some(quote) => {
                if ch == quote {
                    open = None;
                }
                out.push(' ');
            }
            None if ch == '"' || ch == '\'' => {
                open = Some(ch);
                out.push(' ');
            }
            None => out.push(ch),
        }
    }

    if let Some(start) = out.windows(2).position(|w| w == ['/', '/']) {
        for ch in &mut out[start..] {
            *ch = ' ';
        }
    }

    out.into_iter().collect()
}

/// Whether the whole line is a comment (ignoring leading whitespace).
pub fn is_comment_line(line: &str) -> bool {
    line.trim_start().starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("let x = 1", "let x = 1")]
    #[case::double_quoted(r#"print("hi")"#, "print(    )")]
    #[case::single_quoted("print('hi')", "print(    )")]
    #[case::other_quote_inside("\"it's\" x", "       x")]
    #[case::unterminated("let s = \"abc", "let s =     ")]
    #[case::trailing_comment("x // note", "x        ")]
    #[case::comment_only("// all of it", "            ")]
    #[case::escape_not_understood(r#""a\"b" c"#, "    b   ")]
    fn scrubs(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(scrub(input), expected);
    }

    #[test]
    fn comment_marker_inside_string_is_not_a_comment() {
        let line = r#""// not a comment" x // real comment"#;
        let scrubbed = scrub(line);
        assert_eq!(scrubbed.trim(), "x");
        assert_eq!(scrubbed.find('x'), line.find(" x ").map(|i| i + 1));
    }

    #[test]
    fn multibyte_characters_keep_their_column() {
        let scrubbed = scrub("\"é\" y");
        assert_eq!(scrubbed.chars().position(|c| c == 'y'), Some(4));
    }

    #[rstest]
    #[case::comment("// hi", true)]
    #[case::indented_comment("    // hi", true)]
    #[case::code_then_comment("x // hi", false)]
    #[case::blank("", false)]
    fn comment_lines(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_comment_line(line), expected);
    }

    proptest! {
        #[test]
        fn length_is_preserved(line in "[^\n]{0,80}") {
            prop_assert_eq!(scrub(&line).chars().count(), line.chars().count());
        }

        #[test]
        fn code_without_quotes_or_comments_is_unchanged(line in "[a-z0-9_ .,=()+-]{0,60}") {
            prop_assert_eq!(scrub(&line), line);
        }

        #[test]
        fn scrubbing_is_idempotent(line in "[^\n]{0,80}") {
            let once = scrub(&line);
            prop_assert_eq!(scrub(&once), once.clone());
        }
    }
}
