use crate::token::{is_operator, Keyword, Span, Token, TokenKind};
use crate::{LexerError, LexerErrorKind};

/// Tokenizer mode determines how characters are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Literal text up to the next unescaped `{$`.
    Text,
    /// Inside a `{$ ... $}` tag.
    Tag,
}

/// Start of a token being scanned.
#[derive(Debug, Clone, Copy)]
struct Mark {
    offset: usize,
    line: usize,
    column: usize,
}

/// SmartScript tokenizer.
///
/// Produces tokens one at a time on demand. All state lives in the instance:
/// the cursor, the current mode, and the token last handed out.
///
/// - `Vec<char>` source for index-based navigation
/// - Byte offsets tracked alongside for spans
/// - Mode switches on `{$` and `$}`
pub struct Tokenizer<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
    offset: usize,
    line: usize,
    column: usize,
    mode: Mode,
    tag_start: bool,
    keep_whitespace: bool,
    queued: Option<Token>,
    current: Option<Token>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given source, starting in text mode.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
            offset: 0,
            line: 1,
            column: 1,
            mode: Mode::Text,
            tag_start: false,
            keep_whitespace: false,
            queued: None,
            current: None,
            finished: false,
        }
    }

    /// Emit whitespace inside tags as `Whitespace` tokens instead of skipping it.
    pub fn keep_whitespace(mut self, keep: bool) -> Self {
        self.keep_whitespace = keep;
        self
    }

    /// Tokenize the entire source, up to and including `Eof`.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        Tokenizer::new(source).collect_tokens()
    }

    /// Drain the remaining tokens, up to and including `Eof`.
    pub fn collect_tokens(mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// The current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Force the tokenizer into a mode. Any half-emitted tag delimiter is dropped.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.queued = None;
        self.tag_start = mode == Mode::Tag;
    }

    /// The token most recently returned by `next_token`, if any.
    pub fn current_token(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Scan and return the next token.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        if self.finished {
            return Err(self.error(LexerErrorKind::NoMoreTokens));
        }

        let token = match self.queued.take() {
            Some(token) => token,
            None => match self.mode {
                Mode::Text => self.scan_text()?,
                Mode::Tag => self.scan_tag_token()?,
            },
        };

        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        self.current = Some(token.clone());
        Ok(token)
    }

    // --- Text mode ---

    /// Scan a run of literal text, resolving `\\`, `\"` and `\{` escapes.
    fn scan_text(&mut self) -> Result<Token, LexerError> {
        if self.is_at_end() {
            let start = self.mark();
            return Ok(self.token(TokenKind::Eof, start));
        }
        if self.at_tag_open() {
            return Ok(self.open_tag());
        }

        let start = self.mark();
        let mut text = String::new();

        while !self.is_at_end() && !self.at_tag_open() {
            let c = self.peek();
            if c == '\\' {
                self.advance(); // consume backslash
                if self.is_at_end() {
                    return Err(self.error(LexerErrorKind::UnterminatedEscape));
                }
                match self.peek() {
                    '\\' | '"' | '{' => text.push(self.peek()),
                    other => return Err(self.error(LexerErrorKind::InvalidEscape(other))),
                }
                self.advance();
            } else {
                text.push(c);
                self.advance();
            }
        }

        Ok(self.token(TokenKind::Text(text), start))
    }

    /// Emit `TagOpen` for `{` and queue `TagMark` for the following `$`.
    fn open_tag(&mut self) -> Token {
        let start = self.mark();
        self.advance();
        let open = self.token(TokenKind::TagOpen, start);

        let start = self.mark();
        self.advance();
        self.queued = Some(self.token(TokenKind::TagMark, start));

        self.mode = Mode::Tag;
        self.tag_start = true;
        open
    }

    // --- Tag mode ---

    fn scan_tag_token(&mut self) -> Result<Token, LexerError> {
        if self.peek().is_whitespace() {
            let start = self.mark();
            let mut ws = String::new();
            while self.peek().is_whitespace() {
                ws.push(self.peek());
                self.advance();
            }
            if self.keep_whitespace {
                return Ok(self.token(TokenKind::Whitespace(ws), start));
            }
        }

        if self.is_at_end() {
            return Err(self.error(LexerErrorKind::UnterminatedTag));
        }

        let at_tag_start = std::mem::replace(&mut self.tag_start, false);
        let start = self.mark();
        let c = self.peek();

        match c {
            '$' if self.peek_next() == '}' => Ok(self.close_tag()),

            '=' if at_tag_start => {
                self.advance();
                Ok(self.token(TokenKind::Keyword(Keyword::Echo), start))
            }

            '"' => self.scan_string(),

            '@' if self.peek_next().is_alphabetic() => {
                self.advance(); // consume @
                let name = self.scan_name();
                Ok(self.token(TokenKind::Function(name), start))
            }

            '-' if self.peek_next().is_ascii_digit() => self.scan_number(),
            c if c.is_ascii_digit() => self.scan_number(),

            c if is_operator(c) => {
                self.advance();
                Ok(self.token(TokenKind::Operator(c), start))
            }

            c if c.is_alphabetic() => {
                let word = self.scan_name();
                let kind = if at_tag_start {
                    Self::keyword_or_ident(word)
                } else {
                    TokenKind::Identifier(word)
                };
                Ok(self.token(kind, start))
            }

            c => {
                self.advance();
                Ok(self.token(TokenKind::Symbol(c), start))
            }
        }
    }

    /// Emit `TagMark` for `$` and queue `TagClose` for the following `}`.
    fn close_tag(&mut self) -> Token {
        let start = self.mark();
        self.advance();
        let mark = self.token(TokenKind::TagMark, start);

        let start = self.mark();
        self.advance();
        self.queued = Some(self.token(TokenKind::TagClose, start));

        self.mode = Mode::Text;
        mark
    }

    /// Scan a name: a letter, then letters, digits or `_`.
    fn scan_name(&mut self) -> String {
        let mut name = String::new();
        name.push(self.peek());
        self.advance();

        while !self.is_at_end() && (self.peek().is_alphanumeric() || self.peek() == '_') {
            name.push(self.peek());
            self.advance();
        }
        name
    }

    /// Scan a double-quoted string literal.
    fn scan_string(&mut self) -> Result<Token, LexerError> {
        let start = self.mark();
        self.advance(); // consume opening quote

        let mut value = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            if self.peek() == '\\' {
                self.advance(); // consume backslash
                if self.is_at_end() {
                    return Err(self.error(LexerErrorKind::UnterminatedEscape));
                }
                match self.peek() {
                    '"' => value.push('"'),
                    '\\' => value.push('\\'),
                    'n' => value.push('\n'),
                    'r' => value.push('\r'),
                    't' => value.push('\t'),
                    other => return Err(self.error(LexerErrorKind::InvalidEscape(other))),
                }
                self.advance();
            } else {
                value.push(self.peek());
                self.advance();
            }
        }

        if self.is_at_end() {
            return Err(LexerError {
                kind: LexerErrorKind::UnterminatedString,
                line: start.line,
                column: start.column,
            });
        }

        self.advance(); // consume closing quote
        Ok(self.token(TokenKind::String(value), start))
    }

    /// Scan an integer or decimal literal, optionally negative.
    fn scan_number(&mut self) -> Result<Token, LexerError> {
        let start = self.mark();

        if self.peek() == '-' {
            self.advance();
        }
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        let is_double = self.peek() == '.' && self.peek_next().is_ascii_digit();
        if is_double {
            self.advance(); // consume `.`
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = &self.source[start.offset..self.offset];
        let invalid = || LexerError {
            kind: LexerErrorKind::InvalidNumber(text.to_string()),
            line: start.line,
            column: start.column,
        };

        let kind = if is_double {
            TokenKind::Double(text.parse::<f64>().map_err(|_| invalid())?)
        } else {
            TokenKind::Int(text.parse::<i32>().map_err(|_| invalid())?)
        };
        Ok(self.token(kind, start))
    }

    // --- Keyword detection ---

    /// Tag names are matched case-insensitively.
    fn keyword_or_ident(word: String) -> TokenKind {
        if word.eq_ignore_ascii_case("for") {
            TokenKind::Keyword(Keyword::For)
        } else if word.eq_ignore_ascii_case("end") {
            TokenKind::Keyword(Keyword::End)
        } else {
            TokenKind::Identifier(word)
        }
    }

    // --- Helpers ---

    fn at_tag_open(&self) -> bool {
        self.peek() == '{' && self.peek_next() == '$'
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn token(&self, kind: TokenKind, start: Mark) -> Token {
        let span = Span::new(start.offset, self.offset, start.line, start.column);
        Token::new(kind, span)
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.chars[self.pos]
        }
    }

    fn peek_next(&self) -> char {
        if self.pos + 1 >= self.chars.len() {
            '\0'
        } else {
            self.chars[self.pos + 1]
        }
    }

    fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        let c = self.chars[self.pos];
        self.pos += 1;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn error(&self, kind: LexerErrorKind) -> LexerError {
        LexerError {
            kind,
            line: self.line,
            column: self.column,
        }
    }
}
