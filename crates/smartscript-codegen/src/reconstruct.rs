//! Source reconstruction.
//!
//! Walks a document and writes SmartScript source that reparses to an equal
//! tree. Escaping restores exactly what the tokenizer consumed: `\\` and
//! `\{$` in text, `\\` and `\"` in strings. Whitespace inside tags is
//! normalized to single spaces.

use std::convert::Infallible;

use crate::{element_source, escape_text};
use smartscript_parser::{
    Document, DocumentNode, EchoNode, Element, ForLoopNode, TextNode, Visitor,
};

/// Reconstruct canonical source text for a document.
pub fn reconstruct(doc: &Document) -> String {
    let mut reconstructor = Reconstructor::new();
    match doc.accept(&mut reconstructor) {
        Ok(()) => reconstructor.finish(),
        Err(never) => match never {},
    }
}

/// Visitor that accumulates reconstructed source.
#[derive(Debug, Default)]
pub struct Reconstructor {
    out: String,
}

impl Reconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The source written so far.
    pub fn finish(self) -> String {
        self.out
    }

    fn push_elements<'e>(&mut self, elements: impl IntoIterator<Item = &'e Element>) {
        for element in elements {
            self.out.push(' ');
            self.out.push_str(&element_source(element));
        }
    }
}

impl Visitor for Reconstructor {
    type Error = Infallible;

    fn visit_document(&mut self, _node: &DocumentNode) -> Result<(), Infallible> {
        Ok(())
    }

    fn visit_text(&mut self, node: &TextNode) -> Result<(), Infallible> {
        self.out.push_str(&escape_text(node.text()));
        Ok(())
    }

    fn visit_echo(&mut self, node: &EchoNode) -> Result<(), Infallible> {
        self.out.push_str("{$ =");
        self.push_elements(node.elements());
        self.out.push_str(" $}");
        Ok(())
    }

    fn visit_for_loop(&mut self, node: &ForLoopNode) -> Result<(), Infallible> {
        self.out.push_str("{$ FOR ");
        self.out.push_str(node.variable().name());
        self.push_elements([node.start(), node.end()].into_iter().chain(node.step()));
        self.out.push_str(" $}");
        Ok(())
    }

    fn leave_for_loop(&mut self, _node: &ForLoopNode) -> Result<(), Infallible> {
        self.out.push_str("{$END$}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smartscript_parser::{Node, Parser};

    fn parse(source: &str) -> Document {
        Parser::parse(source).unwrap()
    }

    /// Parse, reconstruct, reparse and compare trees.
    fn assert_round_trip(source: &str) -> String {
        let original = parse(source);
        let rebuilt = reconstruct(&original);
        let reparsed = Parser::parse(&rebuilt)
            .unwrap_or_else(|e| panic!("reconstructed source failed to parse: {e}\n{rebuilt}"));
        assert_eq!(reparsed, original, "round trip changed the tree:\n{rebuilt}");
        rebuilt
    }

    // =========================================================================
    // Exact output
    // =========================================================================

    #[test]
    fn test_empty() {
        assert_eq!(reconstruct(&parse("")), "");
    }

    #[test]
    fn test_echo_output() {
        assert_eq!(
            reconstruct(&parse(r#"{$=i i*@sin "0.000"   @decfmt$}"#)),
            r#"{$ = i i * @sin "0.000" @decfmt $}"#
        );
    }

    #[test]
    fn test_for_output() {
        assert_eq!(
            reconstruct(&parse("{$for i 1 10$}x{$end$}")),
            "{$ FOR i 1 10 $}x{$END$}"
        );
        assert_eq!(
            reconstruct(&parse("{$ FOR i -1 10.0 \"2\" $}{$END$}")),
            "{$ FOR i -1 10.0 \"2\" $}{$END$}"
        );
    }

    #[test]
    fn test_text_escaping_is_exact() {
        let source = r#"Text with \\ backslash, "quotes" and \{$ escaped tag"#;
        assert_eq!(reconstruct(&parse(source)), source);
    }

    #[test]
    fn test_literal_backslash_and_quote_survive() {
        // source `a \\ b " c` holds the text `a \ b " c`
        let source = "a \\\\ b \" c";
        let doc = parse(source);
        match doc.node(doc.root().children()[0]) {
            Node::Text(text) => assert_eq!(text.text(), "a \\ b \" c"),
            other => panic!("Expected text node, got {other:?}"),
        }
        assert_eq!(reconstruct(&doc), source);
    }

    #[test]
    fn test_string_elements_escaped_independently() {
        let source = r#"{$= "a\"b" "\\" "" $}"#;
        assert_eq!(
            reconstruct(&parse(source)),
            r#"{$ = "a\"b" "\\" "" $}"#
        );
    }

    // =========================================================================
    // Round trip
    // =========================================================================

    #[test]
    fn test_round_trip_sample_document() {
        assert_round_trip(
            "This is sample text.\r\n\
             {$ FOR i 1 10 1 $}\r\n\
             This is {$= i $}-th time this message is generated.\r\n\
             {$END$}\r\n\
             {$FOR i 0 10 2 $}\r\n\
             sin({$=i$}^2) = {$= i i * @sin \"0.000\" @decfmt $}\r\n\
             {$END$}",
        );
    }

    #[test]
    fn test_round_trip_nested_loops() {
        let rebuilt = assert_round_trip(
            "{$ FOR i 1 3 $}outer {$ FOR j i 3 1 $}inner {$= i j * $}{$END$} after{$END$}",
        );
        assert_eq!(rebuilt.matches("{$END$}").count(), 2);

        let doc = parse(&rebuilt);
        let outer = doc.root().children()[0];
        let inner = doc.children(outer)[1];
        assert!(matches!(doc.node(inner), Node::ForLoop(_)));
    }

    #[test]
    fn test_round_trip_escapes_everywhere() {
        assert_round_trip(
            r#"\\{$= "say \"hi\" \\ now" $}\{$ plain \\\{$ {$ FOR i 1 2 $}\\{$END$}"#,
        );
    }

    #[test]
    fn test_round_trip_numbers() {
        assert_round_trip("{$= 0 -0 2147483647 -2147483648 1.0 -2.5 0.1 123456.789 $}");
    }

    #[test]
    fn test_escaped_quote_in_text() {
        // `\"` and `"` hold the same text, written back unescaped
        let rebuilt = assert_round_trip(r#"say \"hi\" {$= x $}\""#);
        assert_eq!(rebuilt, r#"say "hi" {$ = x $}""#);
    }

    #[test]
    fn test_round_trip_deep_nesting() {
        let depth = 50_000;
        let source = format!("{}x{}", "{$FOR i 1 2$}".repeat(depth), "{$END$}".repeat(depth));
        let rebuilt = assert_round_trip(&source);
        assert_eq!(rebuilt.matches("{$END$}").count(), depth);
        assert!(rebuilt.starts_with("{$ FOR i 1 2 $}{$ FOR i 1 2 $}"));
    }

    #[test]
    fn test_round_trip_operators_and_negatives() {
        let rebuilt = assert_round_trip("{$= i - 1 i -1 a+b $}");
        assert_eq!(rebuilt, "{$ = i - 1 i -1 a + b $}");
    }

    #[test]
    fn test_round_trip_braces_near_tags() {
        assert_round_trip("a{{$= x $}}{ {$= y $}$}");
    }

    #[test]
    fn test_round_trip_string_with_newlines() {
        assert_round_trip("{$= \"multi\nline\\tand\\r\" $}");
    }

    #[test]
    fn test_round_trip_unicode_text() {
        assert_round_trip("Čćžšđ {$= \"ünïcödé\" $} 文字");
    }

    #[test]
    fn test_reconstruct_is_stable() {
        let once = reconstruct(&parse("{$FOR x 1 2$}{$=x \"q\\\"\"$}\\{$ {$END$}"));
        let twice = reconstruct(&parse(&once));
        assert_eq!(once, twice);
    }
}
