/// A position in source text, tracking line and column for error reporting.
///
/// `start` and `end` are byte offsets, so `&source[span.start..span.end]`
/// is the raw text a token was scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

/// Tag names. Only the first significant token of a tag is classified as a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `FOR`
    For,
    /// `END`
    End,
    /// `=`, the echo tag
    Echo,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::For => "FOR",
            Keyword::End => "END",
            Keyword::Echo => "=",
        }
    }
}

/// Token classification for SmartScript source.
///
/// Data-carrying variants embed their value directly, with escapes already resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Text mode
    Text(String),

    // Tag delimiters
    TagOpen,  // `{` of `{$`
    TagMark,  // `$` of `{$` or `$}`
    TagClose, // `}` of `$}`

    // Tag mode
    Whitespace(String),
    Keyword(Keyword),
    Identifier(String),
    String(String),
    Int(i32),
    Double(f64),
    Function(String),
    Operator(char),
    Symbol(char),

    // End of input
    Eof,
}

impl TokenKind {
    /// Short human-readable description, used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Text(_) => "text".into(),
            TokenKind::TagOpen => "'{'".into(),
            TokenKind::TagMark => "'$'".into(),
            TokenKind::TagClose => "'}'".into(),
            TokenKind::Whitespace(_) => "whitespace".into(),
            TokenKind::Keyword(k) => format!("keyword '{}'", k.as_str()),
            TokenKind::Identifier(name) => format!("identifier '{name}'"),
            TokenKind::String(s) => format!("string {s:?}"),
            TokenKind::Int(n) => format!("integer {n}"),
            TokenKind::Double(n) => format!("number {n}"),
            TokenKind::Function(name) => format!("function '@{name}'"),
            TokenKind::Operator(op) => format!("operator '{op}'"),
            TokenKind::Symbol(c) => format!("symbol '{c}'"),
            TokenKind::Eof => "end of input".into(),
        }
    }
}

/// A token produced by the SmartScript tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Single-character operators recognized inside tags.
pub const OPERATORS: &[char] = &['+', '-', '*', '/', '^'];

/// Check if a character is an operator.
pub fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

/// Check a name against the identifier grammar: a letter, then letters, digits or `_`.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
