//! SmartScript Lexer
//!
//! Tokenizes SmartScript template documents into a stream of tokens.
//! Switches between a text mode (literal runs with `\\`, `\"` and `\{` escapes)
//! and a tag mode (keywords, identifiers, literals and operators inside `{$ ... $}`).
//!
//! # Example
//!
//! ```
//! use smartscript_lexer::Tokenizer;
//!
//! let tokens = Tokenizer::tokenize("").unwrap();
//! assert_eq!(tokens.len(), 1); // Just EOF
//! ```

pub mod token;
pub mod tokenizer;

pub use token::{is_identifier, is_operator, Keyword, Span, Token, TokenKind};
pub use tokenizer::{Mode, Tokenizer};

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Lexer error at line {line}, column {column}: {kind}")]
pub struct LexerError {
    pub kind: LexerErrorKind,
    pub line: usize,
    pub column: usize,
}

/// What went wrong while tokenizing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerErrorKind {
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("unterminated escape sequence")]
    UnterminatedEscape,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("tag opened but never closed")]
    UnterminatedTag,

    #[error("no more tokens after end of input")]
    NoMoreTokens,
}
