//! Lexer for KodiScript source code.
//!
//! Whitespace (newlines included) and `//` comments are skipped; statements
//! are delimited by the grammar, with `;` optional.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::error::{LineIndex, SyntaxError};

/// A KodiScript token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip(r"(?:[ \t\r\n\f]+|//[^\n]*)", allow_greedy = true))]
pub enum Token {
    // Keywords
    #[token("let")]
    Let,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("return")]
    Return,
    #[token("fn")]
    Fn,
    #[token("for")]
    For,
    #[token("in")]
    In,
    #[token("while")]
    While,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // Literals
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| unescape(lex.slice()))]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, |lex| unescape(lex.slice()))]
    Str(String),
    /// A quote that never closes on its line.
    #[regex(r#""([^"\\\n]|\\.)*"#)]
    #[regex(r#"'([^'\\\n]|\\.)*"#)]
    UnterminatedStr,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("!")]
    Bang,
    #[token("?.")]
    QuestionDot,
    #[token("??")]
    QuestionQuestion,
    #[token("?:")]
    Elvis,
    #[token("?")]
    Question,

    // Punctuation
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Let => "let",
            Token::If => "if",
            Token::Else => "else",
            Token::Return => "return",
            Token::Fn => "fn",
            Token::For => "for",
            Token::In => "in",
            Token::While => "while",
            Token::And => "and",
            Token::Or => "or",
            Token::Not => "not",
            Token::True => "true",
            Token::False => "false",
            Token::Null => "null",
            Token::Ident(name) => return f.write_str(name),
            Token::Int(n) => return write!(f, "{n}"),
            Token::Float(x) => return write!(f, "{x}"),
            Token::Str(s) => return write!(f, "\"{s}\""),
            Token::UnterminatedStr => "unterminated string",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::LtEq => "<=",
            Token::GtEq => ">=",
            Token::Lt => "<",
            Token::Gt => ">",
            Token::Assign => "=",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::AmpAmp => "&&",
            Token::PipePipe => "||",
            Token::Bang => "!",
            Token::QuestionDot => "?.",
            Token::QuestionQuestion => "??",
            Token::Elvis => "?:",
            Token::Question => "?",
            Token::Colon => ":",
            Token::Dot => ".",
            Token::Comma => ",",
            Token::Semi => ";",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LBracket => "[",
            Token::RBracket => "]",
        };
        f.write_str(text)
    }
}

/// A token with its byte range in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

/// The output of [`tokenize`]: tokens plus the line index of their source,
/// so that later stages can report positions without the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStream {
    pub tokens: Vec<Spanned>,
    pub index: LineIndex,
}

impl TokenStream {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Byte offset one past the last character of the source.
    pub fn end_offset(&self) -> usize {
        self.index.source().len()
    }
}

/// Tokenize KodiScript source. Stops at the first invalid token.
pub fn tokenize(source: &str) -> Result<TokenStream, SyntaxError> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();

    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(Token::UnterminatedStr) => {
                return Err(SyntaxError::at("Unterminated string literal", span, &index));
            }
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(()) => {
                let text = &source[span.clone()];
                let message = if text.starts_with(|c: char| c.is_ascii_digit()) {
                    format!("Invalid number '{text}'")
                } else {
                    format!("Unexpected character '{text}'")
                };
                return Err(SyntaxError::at(message, span, &index));
            }
        }
    }

    Ok(TokenStream { tokens, index })
}

/// Strip the quotes from a string literal and process escapes.
fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}
