//! Document parser for SmartScript.
//!
//! Pulls tokens from the tokenizer one at a time and builds a `Document`.
//! Loop nesting is tracked with an explicit stack of open container ids:
//! `FOR` pushes, `END` pops, and the stack must be back at the root when
//! input runs out. The first error aborts the parse and the partial tree
//! is dropped.

use crate::ast::{
    Document, EchoNode, Element, ForLoopNode, Function, Node, NodeId, Operator, TextNode, Variable,
};
use crate::{ParseError, ParseErrorKind};
use smartscript_lexer::{Keyword, Span, Token, TokenKind, Tokenizer};

/// SmartScript document parser.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    document: Document,
    stack: Vec<NodeId>,
}

impl<'a> Parser<'a> {
    /// Create a new parser over the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            document: Document::new(),
            stack: vec![NodeId::ROOT],
        }
    }

    /// Parse source text into a document AST.
    pub fn parse(source: &str) -> Result<Document, ParseError> {
        Parser::new(source).parse_document()
    }

    /// Parse the whole input, consuming the parser.
    pub fn parse_document(mut self) -> Result<Document, ParseError> {
        loop {
            let token = self.tokenizer.next_token()?;
            match token.kind {
                TokenKind::Text(text) => {
                    self.append(Node::Text(TextNode::new(text)));
                }
                TokenKind::TagOpen => self.parse_tag()?,
                TokenKind::Eof => return self.finish(token.span),
                other => {
                    return Err(unexpected("text or a tag", &other, token.span));
                }
            }
        }
    }

    /// Check that every loop was closed and hand back the tree.
    fn finish(self, span: Span) -> Result<Document, ParseError> {
        let open = self.stack.len() - 1;
        if open > 0 {
            return Err(error_at(ParseErrorKind::UnclosedForLoop(open), span));
        }
        Ok(self.document)
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Parse a tag after its opening `{`.
    fn parse_tag(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::TagMark, "'$' after '{'")?;

        let token = self.tokenizer.next_token()?;
        match token.kind {
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::Echo) => self.parse_echo(token.span),
            TokenKind::Keyword(Keyword::End) => self.parse_end(token.span),
            TokenKind::Identifier(name) => {
                Err(error_at(ParseErrorKind::UnknownTag(name), token.span))
            }
            other => Err(unexpected("a tag name", &other, token.span)),
        }
    }

    /// Parse `{$ FOR var start end [step] $}` and open it as the new container.
    fn parse_for(&mut self) -> Result<(), ParseError> {
        let token = self.tokenizer.next_token()?;
        let variable = match token.kind {
            TokenKind::Identifier(name) => {
                Variable::new(name).map_err(|kind| error_at(kind, token.span))?
            }
            other => {
                return Err(error_at(
                    ParseErrorKind::InvalidForVariable(other.describe()),
                    token.span,
                ));
            }
        };

        let (operands, close) = self.parse_elements()?;
        for (element, span) in &operands {
            if !element.is_for_operand() {
                return Err(error_at(
                    ParseErrorKind::InvalidForElement(describe_element(element)),
                    *span,
                ));
            }
        }

        let arity = operands.len() + 1;
        let mut operands = operands.into_iter().map(|(element, _)| element);
        let (Some(start), Some(end), step, None) = (
            operands.next(),
            operands.next(),
            operands.next(),
            operands.next(),
        ) else {
            return Err(error_at(ParseErrorKind::ForArity(arity), close));
        };

        let id = self.append(Node::ForLoop(ForLoopNode::new(variable, start, end, step)));
        self.stack.push(id);
        Ok(())
    }

    /// Parse `{$= element... $}`.
    fn parse_echo(&mut self, keyword: Span) -> Result<(), ParseError> {
        let (elements, _) = self.parse_elements()?;
        if elements.is_empty() {
            return Err(error_at(ParseErrorKind::EmptyEcho, keyword));
        }

        let elements = elements.into_iter().map(|(element, _)| element).collect();
        self.append(Node::Echo(EchoNode::new(elements)));
        Ok(())
    }

    /// Parse `{$END$}` and close the innermost loop.
    fn parse_end(&mut self, keyword: Span) -> Result<(), ParseError> {
        self.expect(TokenKind::TagMark, "'$}' after END")?;
        self.expect(TokenKind::TagClose, "'}' after '$'")?;

        if self.stack.len() <= 1 {
            return Err(error_at(ParseErrorKind::UnbalancedEnd, keyword));
        }
        self.stack.pop();
        Ok(())
    }

    /// Collect elements up to and including the closing `$}`.
    /// Returns the elements with their spans, and the span of the closing `$`.
    fn parse_elements(&mut self) -> Result<(Vec<(Element, Span)>, Span), ParseError> {
        let mut elements = Vec::new();

        loop {
            let token = self.tokenizer.next_token()?;
            if token.kind == TokenKind::TagMark {
                self.expect(TokenKind::TagClose, "'}' after '$'")?;
                return Ok((elements, token.span));
            }
            let span = token.span;
            elements.push((self.element(token)?, span));
        }
    }

    /// Convert a tag-mode token into an element.
    fn element(&self, token: Token) -> Result<Element, ParseError> {
        let span = token.span;
        let element = match token.kind {
            TokenKind::Identifier(name) => {
                Element::Variable(Variable::new(name).map_err(|kind| error_at(kind, span))?)
            }
            TokenKind::Function(name) => {
                Element::Function(Function::new(name).map_err(|kind| error_at(kind, span))?)
            }
            TokenKind::String(value) => Element::String(value),
            TokenKind::Int(value) => Element::Int(value),
            TokenKind::Double(value) => Element::Double(value),
            TokenKind::Operator(c) => match Operator::from_char(c) {
                Some(op) => Element::Operator(op),
                None => return Err(unexpected("an element", &TokenKind::Operator(c), span)),
            },
            other => return Err(unexpected("an element or '$}'", &other, span)),
        };
        Ok(element)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Append a node to the innermost open container.
    fn append(&mut self, node: Node) -> NodeId {
        let parent = *self.stack.last().expect("container stack never empty");
        self.document.append(parent, node)
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        let token = self.tokenizer.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(expected, &token.kind, token.span))
        }
    }
}

fn error_at(kind: ParseErrorKind, span: Span) -> ParseError {
    ParseError {
        kind,
        line: span.line,
        column: span.column,
    }
}

fn unexpected(expected: &str, found: &TokenKind, span: Span) -> ParseError {
    error_at(
        ParseErrorKind::UnexpectedToken {
            expected: expected.to_string(),
            found: found.describe(),
        },
        span,
    )
}

fn describe_element(element: &Element) -> String {
    match element {
        Element::Variable(v) => format!("variable '{}'", v.name()),
        Element::String(s) => format!("string {s:?}"),
        Element::Int(n) => format!("integer {n}"),
        Element::Double(n) => format!("number {n}"),
        Element::Function(f) => format!("function '@{}'", f.name()),
        Element::Operator(op) => format!("operator '{}'", op.symbol()),
    }
}
