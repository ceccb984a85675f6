//! Collection of declared names.
//!
//! One forward pass over every line records names bound by `let` and names
//! listed as `fn (...)` parameters. The set covers the whole file: there is
//! no block or function scoping, and a declaration late in the file counts
//! for uses before it.

use std::collections::HashSet;

/// Names declared anywhere in a file. Case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredNames {
    names: HashSet<String>,
}

impl DeclaredNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Collect every `let` binding and function parameter in `lines`.
pub fn collect_declarations<S: AsRef<str>>(lines: &[S]) -> DeclaredNames {
    let mut declared = DeclaredNames::new();
    for line in lines {
        let chars: Vec<char> = line.as_ref().chars().collect();
        collect_let_bindings(&chars, &mut declared);
        collect_fn_params(&chars, &mut declared);
    }
    declared
}

/// `let <ident> =`, with at least one space after `let`.
fn collect_let_bindings(chars: &[char], declared: &mut DeclaredNames) {
    for start in keyword_positions(chars, "let") {
        let mut i = start + 3;
        let after_keyword = i;
        i = skip_whitespace(chars, i);
        if i == after_keyword {
            continue;
        }
        let Some(end) = identifier_end(chars, i) else {
            continue;
        };
        let j = skip_whitespace(chars, end);
        if chars.get(j) == Some(&'=') {
            declared.insert(chars[i..end].iter().collect::<String>());
        }
    }
}

/// `fn ( a, b, c )` on a single line.
fn collect_fn_params(chars: &[char], declared: &mut DeclaredNames) {
    for start in keyword_positions(chars, "fn") {
        let open = skip_whitespace(chars, start + 2);
        if chars.get(open) != Some(&'(') {
            continue;
        }
        let Some(len) = chars[open + 1..].iter().position(|&c| c == ')') else {
            continue;
        };
        let params: String = chars[open + 1..open + 1 + len].iter().collect();
        for param in params.split(',') {
            let param: Vec<char> = param.trim().chars().collect();
            // Only the leading identifier; anything after it is ignored.
            if let Some(end) = identifier_end(&param, 0) {
                declared.insert(param[..end].iter().collect::<String>());
            }
        }
    }
}

/// Positions where `word` occurs with no word character immediately before.
fn keyword_positions<'a>(chars: &'a [char], word: &'a str) -> impl Iterator<Item = usize> + 'a {
    let word: Vec<char> = word.chars().collect();
    (0..chars.len()).filter(move |&i| {
        chars[i..].starts_with(&word) && (i == 0 || !is_word_char(chars[i - 1]))
    })
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// End of the identifier starting at `start`, if one starts there.
pub(crate) fn identifier_end(chars: &[char], start: usize) -> Option<usize> {
    match chars.get(start) {
        Some(&c) if is_ident_start(c) => {
            let len = chars[start..].iter().take_while(|&&c| is_word_char(c)).count();
            Some(start + len)
        }
        _ => None,
    }
}

pub(crate) fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(source: &str) -> Vec<String> {
        let lines: Vec<&str> = source.split('\n').collect();
        let declared = collect_declarations(&lines);
        let mut names: Vec<String> = declared.iter().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn let_bindings() {
        assert_eq!(names("let x = 1\nlet  total=2"), vec!["total", "x"]);
    }

    #[test]
    fn several_bindings_on_one_line() {
        assert_eq!(names("let a = 1; let b = 2"), vec!["a", "b"]);
    }

    #[test]
    fn let_needs_a_word_boundary_and_a_space() {
        assert!(names("outlet x = 1").is_empty());
        assert!(names("letx = 1").is_empty());
        assert!(names("let x == 1").contains(&"x".to_string()));
    }

    #[test]
    fn let_without_assignment_is_not_a_declaration() {
        assert!(names("let x").is_empty());
        assert!(names("let 9 = 1").is_empty());
    }

    #[test]
    fn function_parameters() {
        assert_eq!(names("let add = fn(a, b) {"), vec!["a", "add", "b"]);
        assert_eq!(names("map(items, fn (item) { return item })"), vec!["item"]);
    }

    #[test]
    fn parameters_keep_only_the_leading_identifier() {
        assert_eq!(names("fn(a: number, b = 2, , 3c)"), vec!["a", "b"]);
    }

    #[test]
    fn parameter_list_must_close_on_the_same_line() {
        assert!(names("fn(a,\n b)").is_empty());
    }

    #[test]
    fn fn_inside_a_longer_word_is_ignored() {
        assert!(names("myfn(a)").is_empty());
    }

    #[test]
    fn empty_input() {
        assert!(collect_declarations::<&str>(&[]).is_empty());
    }
}
