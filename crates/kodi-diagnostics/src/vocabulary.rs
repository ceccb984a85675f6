//! Names the usage scanner always treats as known.
//!
//! The keyword list and the native function table are fixed for the life of
//! the process. Native entries carry their documentation so that hover and
//! completion providers can share the same table.

/// A language keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub name: &'static str,
    pub description: &'static str,
}

/// A function provided by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFunction {
    pub name: &'static str,
    pub signature: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

pub const KEYWORDS: &[Keyword] = &[
    Keyword { name: "let", description: "Declare a variable" },
    Keyword { name: "if", description: "Conditional statement" },
    Keyword { name: "else", description: "Alternative branch of an if statement" },
    Keyword { name: "return", description: "Return a value from a function" },
    Keyword { name: "true", description: "Boolean true" },
    Keyword { name: "false", description: "Boolean false" },
    Keyword { name: "null", description: "The absence of a value" },
    Keyword { name: "and", description: "Logical and" },
    Keyword { name: "or", description: "Logical or" },
    Keyword { name: "not", description: "Logical negation" },
    Keyword { name: "fn", description: "Function literal" },
    Keyword { name: "for", description: "Iterate over a collection" },
    Keyword { name: "in", description: "Separates the loop variable from its collection" },
    Keyword { name: "while", description: "Loop while a condition holds" },
];

pub const NATIVE_FUNCTIONS: &[NativeFunction] = &[
    // Encoding
    NativeFunction {
        name: "json",
        signature: "json(value: any): string",
        description: "Serialize a value to a JSON string",
        example: "json({ name: \"Ann\" })",
    },
    NativeFunction {
        name: "parseJson",
        signature: "parseJson(text: string): any",
        description: "Parse a JSON string into a value",
        example: "parseJson(\"{\\\"a\\\": 1}\")",
    },
    NativeFunction {
        name: "base64Encode",
        signature: "base64Encode(text: string): string",
        description: "Encode a string as Base64",
        example: "base64Encode(\"hello\")",
    },
    NativeFunction {
        name: "base64Decode",
        signature: "base64Decode(text: string): string",
        description: "Decode a Base64 string",
        example: "base64Decode(\"aGVsbG8=\")",
    },
    NativeFunction {
        name: "urlEncode",
        signature: "urlEncode(text: string): string",
        description: "Percent-encode a string for use in a URL",
        example: "urlEncode(\"a b\")",
    },
    NativeFunction {
        name: "urlDecode",
        signature: "urlDecode(text: string): string",
        description: "Decode a percent-encoded string",
        example: "urlDecode(\"a%20b\")",
    },
    // Conversion
    NativeFunction {
        name: "toString",
        signature: "toString(value: any): string",
        description: "Convert a value to its string form",
        example: "toString(42)",
    },
    NativeFunction {
        name: "toNumber",
        signature: "toNumber(text: string): number",
        description: "Parse a number from a string",
        example: "toNumber(\"3.14\")",
    },
    // Output
    NativeFunction {
        name: "print",
        signature: "print(...values: any[]): void",
        description: "Print values to the output",
        example: "print(\"total:\", total)",
    },
    // Strings
    NativeFunction {
        name: "length",
        signature: "length(value: string | array): number",
        description: "Length of a string or array",
        example: "length(items)",
    },
    NativeFunction {
        name: "substring",
        signature: "substring(text: string, start: number, end?: number): string",
        description: "Extract part of a string",
        example: "substring(\"hello\", 1, 3)",
    },
    NativeFunction {
        name: "upper",
        signature: "upper(text: string): string",
        description: "Convert a string to upper case",
        example: "upper(\"abc\")",
    },
    NativeFunction {
        name: "lower",
        signature: "lower(text: string): string",
        description: "Convert a string to lower case",
        example: "lower(\"ABC\")",
    },
    NativeFunction {
        name: "trim",
        signature: "trim(text: string): string",
        description: "Remove leading and trailing whitespace",
        example: "trim(\"  hi  \")",
    },
    NativeFunction {
        name: "split",
        signature: "split(text: string, separator: string): string[]",
        description: "Split a string into parts",
        example: "split(\"a,b\", \",\")",
    },
    NativeFunction {
        name: "join",
        signature: "join(items: array, separator: string): string",
        description: "Join array items into a string",
        example: "join([\"a\", \"b\"], \"-\")",
    },
    // Collections
    NativeFunction {
        name: "keys",
        signature: "keys(object: object): string[]",
        description: "Keys of an object",
        example: "keys(user)",
    },
    NativeFunction {
        name: "values",
        signature: "values(object: object): any[]",
        description: "Values of an object",
        example: "values(user)",
    },
    NativeFunction {
        name: "contains",
        signature: "contains(haystack: string | array, needle: any): boolean",
        description: "Whether a string or array contains a value",
        example: "contains(tags, \"new\")",
    },
    NativeFunction {
        name: "replace",
        signature: "replace(text: string, search: string, replacement: string): string",
        description: "Replace occurrences of a substring",
        example: "replace(\"a-b\", \"-\", \"+\")",
    },
    // Math
    NativeFunction {
        name: "abs",
        signature: "abs(n: number): number",
        description: "Absolute value",
        example: "abs(-3)",
    },
    NativeFunction {
        name: "round",
        signature: "round(n: number): number",
        description: "Round to the nearest integer",
        example: "round(2.5)",
    },
    NativeFunction {
        name: "floor",
        signature: "floor(n: number): number",
        description: "Round down",
        example: "floor(2.7)",
    },
    NativeFunction {
        name: "ceil",
        signature: "ceil(n: number): number",
        description: "Round up",
        example: "ceil(2.1)",
    },
];

pub fn is_keyword(name: &str) -> bool {
    keyword(name).is_some()
}

pub fn is_native_function(name: &str) -> bool {
    native_function(name).is_some()
}

pub fn keyword(name: &str) -> Option<&'static Keyword> {
    KEYWORDS.iter().find(|k| k.name == name)
}

/// Look up a native function by exact (case-sensitive) name.
pub fn native_function(name: &str) -> Option<&'static NativeFunction> {
    NATIVE_FUNCTIONS.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn tables_have_no_duplicates() {
        let keywords: HashSet<_> = KEYWORDS.iter().map(|k| k.name).collect();
        assert_eq!(keywords.len(), KEYWORDS.len());
        let natives: HashSet<_> = NATIVE_FUNCTIONS.iter().map(|f| f.name).collect();
        assert_eq!(natives.len(), NATIVE_FUNCTIONS.len());
        assert_eq!(NATIVE_FUNCTIONS.len(), 24);
    }

    #[test]
    fn keywords_and_natives_do_not_overlap() {
        for f in NATIVE_FUNCTIONS {
            assert!(!is_keyword(f.name), "{} is both", f.name);
        }
    }

    #[test]
    fn lookups_are_case_sensitive() {
        assert!(is_native_function("parseJson"));
        assert!(!is_native_function("parsejson"));
        assert!(is_keyword("while"));
        assert!(!is_keyword("While"));
    }

    #[test]
    fn signatures_start_with_the_name() {
        for f in NATIVE_FUNCTIONS {
            assert!(f.signature.starts_with(f.name), "{}", f.signature);
            assert!(f.example.starts_with(f.name), "{}", f.example);
        }
    }
}
