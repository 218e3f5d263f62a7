//! Generic traversal over IR trees
//!
//! [`walk`] is a lazy pre-order iterator; [`Visitor`] is the dispatch-with-fallback
//! protocol the formatter is built on.

use std::slice;

use crate::ir::{Field, Node, Value};

/// Result of a [`Visitor::handle`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The node (and whatever of its subtree the handler chose) was processed
    Handled,
    /// No handler for this kind; the visitor falls back to `generic_visit`
    Unhandled,
}

/// Per-kind dispatch over IR nodes
///
/// Implementors override [`handle`](Visitor::handle), typically with a `match` on
/// [`NodeKind`](crate::ir::NodeKind). A handler that does not call
/// [`generic_visit`](Visitor::generic_visit) prunes the node's subtree.
pub trait Visitor<'ast> {
    type Error;

    fn handle(&mut self, node: &'ast Node) -> Result<Dispatch, Self::Error> {
        let _ = node;
        Ok(Dispatch::Unhandled)
    }

    fn visit(&mut self, node: &'ast Node) -> Result<(), Self::Error> {
        match self.handle(node)? {
            Dispatch::Handled => Ok(()),
            Dispatch::Unhandled => self.generic_visit(node),
        }
    }

    fn generic_visit(&mut self, node: &'ast Node) -> Result<(), Self::Error> {
        generic_visit(self, node)
    }
}

/// Visit each direct child of `node`, in field order
pub fn generic_visit<'ast, V>(visitor: &mut V, node: &'ast Node) -> Result<(), V::Error>
where
    V: Visitor<'ast> + ?Sized,
{
    for (_, child) in node.children() {
        visitor.visit(child)?;
    }
    Ok(())
}

/// Pre-order traversal of `root`, yielding `(field_name, node)`; the root comes first
/// with an empty name
pub fn walk(root: &Node) -> Walk<'_> {
    Walk {
        stack: vec![("", root)],
    }
}

/// Iterator returned by [`walk`]
pub struct Walk<'a> {
    stack: Vec<(&'a str, &'a Node)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a str, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (name, node) = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(node.children());
        self.stack[start..].reverse();
        Some((name, node))
    }
}

/// Direct children of a node, see [`Node::children`]
pub struct Children<'a> {
    fields: slice::Iter<'a, Field>,
    current: Option<(&'a str, Slot<'a>)>,
}

enum Slot<'a> {
    One(Option<&'a Node>),
    Many(slice::Iter<'a, Option<Node>>),
}

impl<'a> Iterator for Slot<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Slot::One(node) => node.take(),
            Slot::Many(items) => items.find_map(Option::as_ref),
        }
    }
}

impl<'a> Children<'a> {
    pub(crate) fn new(node: &'a Node) -> Self {
        Self {
            fields: node.fields().iter(),
            current: None,
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = (&'a str, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((name, slot)) = self.current.as_mut() {
                if let Some(child) = slot.next() {
                    return Some((*name, child));
                }
            }
            let field = self.fields.next()?;
            self.current = match &field.value {
                Value::Node(child) => Some((field.name.as_str(), Slot::One(Some(child.as_ref())))),
                Value::List(items) => Some((field.name.as_str(), Slot::Many(items.iter()))),
                _ => None,
            };
        }
    }
}
