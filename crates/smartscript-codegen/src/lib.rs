//! SmartScript Code Generator
//!
//! Turns a parsed document back into text. Two visitors live here:
//!
//! ```text
//! Document AST → reconstruct() → canonical SmartScript source
//! Document AST → print_tree()  → indented outline for inspection
//! ```
//!
//! Reconstructed source always reparses to a tree equal to the input.

pub mod reconstruct;
pub mod tree;

pub use reconstruct::{reconstruct, Reconstructor};
pub use tree::{print_tree, TreePrinter};

use smartscript_parser::Element;

// =========================================================================
// Element → source conversion
// =========================================================================

/// Source form of a single element, as it would appear inside a tag.
pub fn element_source(element: &Element) -> String {
    match element {
        Element::Variable(v) => v.name().to_string(),
        Element::String(s) => quote_string(s),
        Element::Int(n) => n.to_string(),
        Element::Double(n) => format_double(*n),
        Element::Function(f) => format!("@{}", f.name()),
        Element::Operator(op) => op.symbol().to_string(),
    }
}

/// Quote a string literal, escaping `\` and `"`.
pub fn quote_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Escape literal text: `\` and the `{$` tag opener.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\").replace("{$", "\\{$")
}

/// Format a double so it always relexes as a double, never as an integer.
pub fn format_double(n: f64) -> String {
    let text = n.to_string();
    if text.contains('.') || !n.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}
