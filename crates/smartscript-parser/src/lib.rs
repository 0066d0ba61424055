//! SmartScript Parser
//!
//! Parses a SmartScript template into an arena-backed Abstract Syntax Tree
//! and exposes the [`Visitor`] trait through which every tree consumer
//! (source reconstruction, evaluation) walks the result.
//!
//! ```
//! use smartscript_parser::{Node, Parser};
//!
//! let doc = Parser::parse("Hi {$= name $}!").unwrap();
//! assert_eq!(doc.root().children().len(), 3);
//! assert!(matches!(doc.node(doc.root().children()[1]), Node::Echo(_)));
//! ```

pub mod ast;
pub mod parser;
pub mod visitor;

pub use ast::{
    Document, DocumentNode, EchoNode, Element, ForLoopNode, Function, Node, NodeId, Operator,
    TextNode, Variable,
};
pub use parser::Parser;
pub use visitor::Visitor;

use smartscript_lexer::{LexerError, LexerErrorKind};

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub column: usize,
}

impl From<LexerError> for ParseError {
    fn from(err: LexerError) -> Self {
        Self {
            kind: ParseErrorKind::Lexical(err.kind),
            line: err.line,
            column: err.column,
        }
    }
}

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error(transparent)]
    Lexical(LexerErrorKind),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("FOR expects a variable name, found {0}")]
    InvalidForVariable(String),

    #[error("FOR bounds must be variables, strings or numbers, found {0}")]
    InvalidForElement(String),

    #[error("FOR expects 3 or 4 elements, found {0}")]
    ForArity(usize),

    #[error("invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("unknown tag '{0}'")]
    UnknownTag(String),

    #[error("END without a matching FOR")]
    UnbalancedEnd,

    #[error("{0} FOR loop(s) still open at end of input")]
    UnclosedForLoop(usize),

    #[error("echo tag has no elements")]
    EmptyEcho,
}
