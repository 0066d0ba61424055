//! Indented tree outline, one line per node.
//!
//! ```text
//! Document
//!   Text "Hi "
//!   Echo name
//!   For i 1 3
//!     Text "x"
//! ```

use std::convert::Infallible;

use crate::element_source;
use smartscript_parser::{Document, DocumentNode, EchoNode, ForLoopNode, TextNode, Visitor};

/// Render the outline of a document.
pub fn print_tree(doc: &Document) -> String {
    let mut printer = TreePrinter::default();
    match doc.accept(&mut printer) {
        Ok(()) => printer.lines.join("\n"),
        Err(never) => match never {},
    }
}

#[derive(Debug, Default)]
pub struct TreePrinter {
    lines: Vec<String>,
    depth: usize,
}

impl TreePrinter {
    fn line(&mut self, text: String) {
        self.lines.push(format!("{}{text}", "  ".repeat(self.depth)));
    }
}

impl Visitor for TreePrinter {
    type Error = Infallible;

    fn visit_document(&mut self, _node: &DocumentNode) -> Result<(), Infallible> {
        self.line("Document".into());
        self.depth += 1;
        Ok(())
    }

    fn visit_text(&mut self, node: &TextNode) -> Result<(), Infallible> {
        self.line(format!("Text {:?}", node.text()));
        Ok(())
    }

    fn visit_echo(&mut self, node: &EchoNode) -> Result<(), Infallible> {
        let elements: Vec<String> = node.elements().iter().map(element_source).collect();
        self.line(format!("Echo {}", elements.join(" ")));
        Ok(())
    }

    fn visit_for_loop(&mut self, node: &ForLoopNode) -> Result<(), Infallible> {
        let mut header = format!(
            "For {} {} {}",
            node.variable().name(),
            element_source(node.start()),
            element_source(node.end())
        );
        if let Some(step) = node.step() {
            header.push(' ');
            header.push_str(&element_source(step));
        }
        self.line(header);
        self.depth += 1;
        Ok(())
    }

    fn leave_for_loop(&mut self, _node: &ForLoopNode) -> Result<(), Infallible> {
        self.depth -= 1;
        Ok(())
    }

    fn leave_document(&mut self, _node: &DocumentNode) -> Result<(), Infallible> {
        self.depth -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use smartscript_parser::Parser;

    #[test]
    fn test_empty_document() {
        let doc = Parser::parse("").unwrap();
        assert_eq!(print_tree(&doc), "Document");
    }

    #[test]
    fn test_nested_outline() {
        let doc = Parser::parse(
            "Hi {$= name \"!\" $}\n{$ FOR i 1 3 $}{$ FOR j i 3 1 $}x{$END$}{$END$}",
        )
        .unwrap();
        assert_eq!(
            print_tree(&doc),
            [
                "Document",
                "  Text \"Hi \"",
                "  Echo name \"!\"",
                "  Text \"\\n\"",
                "  For i 1 3",
                "    For j i 3 1",
                "      Text \"x\"",
            ]
            .join("\n")
        );
    }
}
