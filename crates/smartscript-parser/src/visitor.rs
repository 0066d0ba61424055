//! Tree walking.
//!
//! [`Visitor`] has one callback per node kind. [`Document::accept`] drives
//! the walk in document order: a container is visited, then its children,
//! then left. Evaluators and the source reconstructor are both visitors.

use crate::ast::{Document, DocumentNode, EchoNode, ForLoopNode, Node, NodeId, TextNode};

/// A consumer of a parsed document.
pub trait Visitor {
    type Error;

    fn visit_document(&mut self, node: &DocumentNode) -> Result<(), Self::Error>;

    fn visit_text(&mut self, node: &TextNode) -> Result<(), Self::Error>;

    fn visit_echo(&mut self, node: &EchoNode) -> Result<(), Self::Error>;

    fn visit_for_loop(&mut self, node: &ForLoopNode) -> Result<(), Self::Error>;

    /// Called after all of the document's children were visited.
    fn leave_document(&mut self, _node: &DocumentNode) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after all of the loop's children were visited.
    fn leave_for_loop(&mut self, _node: &ForLoopNode) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Pending work in a walk.
enum Step {
    Enter(NodeId),
    Leave(NodeId),
}

impl Document {
    /// Walk the whole tree with `visitor`. Stops at the first error.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        self.accept_from(NodeId::ROOT, visitor)
    }

    /// Walk the subtree rooted at `id`.
    ///
    /// The walk keeps its own stack, so nesting depth is limited by memory
    /// rather than by the call stack.
    pub fn accept_from<V: Visitor + ?Sized>(
        &self,
        id: NodeId,
        visitor: &mut V,
    ) -> Result<(), V::Error> {
        let mut pending = vec![Step::Enter(id)];

        while let Some(step) = pending.pop() {
            match step {
                Step::Enter(id) => {
                    let children = match self.node(id) {
                        Node::Document(doc) => {
                            visitor.visit_document(doc)?;
                            doc.children()
                        }
                        Node::ForLoop(for_loop) => {
                            visitor.visit_for_loop(for_loop)?;
                            for_loop.children()
                        }
                        Node::Text(text) => {
                            visitor.visit_text(text)?;
                            continue;
                        }
                        Node::Echo(echo) => {
                            visitor.visit_echo(echo)?;
                            continue;
                        }
                    };
                    // leave runs after the children, which pop first
                    pending.push(Step::Leave(id));
                    pending.extend(children.iter().rev().map(|&child| Step::Enter(child)));
                }
                Step::Leave(id) => match self.node(id) {
                    Node::Document(doc) => visitor.leave_document(doc)?,
                    Node::ForLoop(for_loop) => visitor.leave_for_loop(for_loop)?,
                    Node::Text(_) | Node::Echo(_) => {}
                },
            }
        }
        Ok(())
    }
}
