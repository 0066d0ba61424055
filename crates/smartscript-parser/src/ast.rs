//! Abstract Syntax Tree for SmartScript.
//!
//! Nodes live in an arena owned by [`Document`] and refer to their children
//! by [`NodeId`]. Slot 0 always holds the root. The parser allocates nodes in
//! document order, so equivalent documents produce equal arenas.
//!
//! Trees are read-only once built: fields are private and exposed through
//! accessors.

use serde::Serialize;
use smartscript_lexer::is_identifier;

use crate::ParseErrorKind;

// ---------------------------------------------------------------------------
// Arena
// ---------------------------------------------------------------------------

/// Index of a node inside its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The document root.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// A parsed SmartScript document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// An empty document holding only the root.
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::Document(DocumentNode::default())],
        }
    }

    /// Allocate `node` and append it to `parent`'s children.
    pub(crate) fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        match &mut self.nodes[parent.0] {
            Node::Document(doc) => doc.children.push(id),
            Node::ForLoop(for_loop) => for_loop.children.push(id),
            Node::Text(_) | Node::Echo(_) => {
                unreachable!("only documents and loops are containers")
            }
        }
        id
    }

    /// The root node.
    pub fn root(&self) -> &DocumentNode {
        match &self.nodes[0] {
            Node::Document(root) => root,
            _ => unreachable!("arena slot 0 always holds the document root"),
        }
    }

    /// Look up a node. Panics if `id` belongs to another document.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Child ids of a node, empty for leaves.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

// ---------------------------------------------------------------------------
// Nodes
// ---------------------------------------------------------------------------

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    /// The root.
    Document(DocumentNode),

    /// Literal text, escapes resolved.
    Text(TextNode),

    /// `{$= ... $}`
    Echo(EchoNode),

    /// `{$ FOR ... $} ... {$END$}`
    ForLoop(ForLoopNode),
}

impl Node {
    /// Child ids, empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Document(doc) => &doc.children,
            Node::ForLoop(for_loop) => &for_loop.children,
            Node::Text(_) | Node::Echo(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentNode {
    children: Vec<NodeId>,
}

impl DocumentNode {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextNode {
    text: String,
}

impl TextNode {
    pub(crate) fn new(text: String) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EchoNode {
    elements: Vec<Element>,
}

impl EchoNode {
    pub(crate) fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

/// A `FOR` loop. `start`, `end` and `step` are always for-operands
/// (see [`Element::is_for_operand`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForLoopNode {
    variable: Variable,
    start: Element,
    end: Element,
    step: Option<Element>,
    children: Vec<NodeId>,
}

impl ForLoopNode {
    pub(crate) fn new(
        variable: Variable,
        start: Element,
        end: Element,
        step: Option<Element>,
    ) -> Self {
        Self {
            variable,
            start,
            end,
            step,
            children: Vec::new(),
        }
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn start(&self) -> &Element {
        &self.start
    }

    pub fn end(&self) -> &Element {
        &self.end
    }

    pub fn step(&self) -> Option<&Element> {
        self.step.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

// ---------------------------------------------------------------------------
// Elements
// ---------------------------------------------------------------------------

/// One typed unit of tag content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    /// `i`, `sco_re`
    Variable(Variable),

    /// `"0.000"`, escapes resolved
    String(String),

    /// `42`, `-1`
    Int(i32),

    /// `2.75`
    Double(f64),

    /// `@sin`
    Function(Function),

    /// `+ - * / ^`
    Operator(Operator),
}

impl Element {
    /// Variables, strings and numbers are allowed as loop bounds and step.
    pub fn is_for_operand(&self) -> bool {
        matches!(
            self,
            Element::Variable(_) | Element::String(_) | Element::Int(_) | Element::Double(_)
        )
    }
}

/// A variable reference. The name always satisfies the identifier grammar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Variable {
    name: String,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Result<Self, ParseErrorKind> {
        Ok(Self {
            name: checked_identifier(name.into())?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A function reference (`@name`). The name excludes the `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Function {
    name: String,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Result<Self, ParseErrorKind> {
        Ok(Self {
            name: checked_identifier(name.into())?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn checked_identifier(name: String) -> Result<String, ParseErrorKind> {
    if is_identifier(&name) {
        Ok(name)
    } else {
        Err(ParseErrorKind::InvalidIdentifier(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_has_root_only() {
        let doc = Document::new();
        assert_eq!(doc.node_count(), 1);
        assert!(doc.root().children().is_empty());
    }

    #[test]
    fn test_append_links_parent_and_child() {
        let mut doc = Document::new();
        let text = doc.append(NodeId::ROOT, Node::Text(TextNode::new("a".into())));
        let variable = Variable::new("i").unwrap();
        let for_loop = doc.append(
            NodeId::ROOT,
            Node::ForLoop(ForLoopNode::new(variable, Element::Int(1), Element::Int(3), None)),
        );
        let inner = doc.append(for_loop, Node::Echo(EchoNode::new(vec![Element::Int(1)])));

        assert_eq!(doc.root().children(), &[text, for_loop]);
        assert_eq!(doc.children(for_loop), &[inner]);
        assert!(doc.children(inner).is_empty());
        assert_eq!(inner.index(), 3);
    }

    #[test]
    fn test_variable_validation() {
        assert_eq!(Variable::new("sco_re").unwrap().name(), "sco_re");
        assert_eq!(
            Variable::new("5x"),
            Err(ParseErrorKind::InvalidIdentifier("5x".into()))
        );
        assert!(Function::new("").is_err());
        assert_eq!(Function::new("sin").unwrap().name(), "sin");
    }

    #[test]
    fn test_for_operands() {
        assert!(Element::Int(1).is_for_operand());
        assert!(Element::Double(1.5).is_for_operand());
        assert!(Element::String("x".into()).is_for_operand());
        assert!(Element::Variable(Variable::new("x").unwrap()).is_for_operand());
        assert!(!Element::Operator(Operator::Add).is_for_operand());
        assert!(!Element::Function(Function::new("sin").unwrap()).is_for_operand());
    }

    #[test]
    fn test_operator_symbols() {
        for c in ['+', '-', '*', '/', '^'] {
            assert_eq!(Operator::from_char(c).map(Operator::symbol), Some(c));
        }
        assert_eq!(Operator::from_char('%'), None);
    }
}
