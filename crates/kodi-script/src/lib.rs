//! kodi-script: the KodiScript syntax engine.
//!
//! This crate provides:
//!
//! - **Lexer**: Tokenizes KodiScript source using logos
//! - **Parser**: Builds an AST from tokens using chumsky
//! - **AST**: Type definitions for the abstract syntax tree
//!
//! Failures carry a human-readable message with the position embedded as
//! text (`... at line 3, column 5`). Callers that only see the message can
//! recover the position from it.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{LineIndex, SyntaxError};
pub use lexer::{Spanned, Token, TokenStream};

/// The KodiScript engine: tokenize, then parse.
#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Split source into tokens.
    pub fn tokenize(&self, source: &str) -> Result<TokenStream, SyntaxError> {
        lexer::tokenize(source)
    }

    /// Build a program from a token stream.
    pub fn parse(&self, tokens: TokenStream) -> Result<ast::Program, SyntaxError> {
        parser::parse(tokens)
    }

    /// Tokenize and parse in one step.
    pub fn check(&self, source: &str) -> Result<ast::Program, SyntaxError> {
        self.parse(self.tokenize(source)?)
    }
}
