//! Defines `SyntaxNode`, the typed tree produced by the `TreeBuilder`.
//!
//! The tree mirrors the JSON grammar:
//!
//! ```text
//! json   -> array | object
//! array  -> value*
//! object -> prop*
//! prop   -> value
//! value  -> scalar | json
//! ```
//!
//! Leaves are `Terminal` nodes that own a copy of their token. Every
//! `NonTerminal` node records its own `NodeId` and the id of its parent; the
//! parent link is a plain identifier used for diagnostics, never a pointer.

use crate::token::{Position, TerminalKind, Token};
use std::fmt;

/// The kind of a structural (non-terminal) node. The set is closed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum NonTerminalKind {
    Json,
    Array,
    Object,
    Prop,
    Value,
}

impl NonTerminalKind {
    pub fn name(self) -> &'static str {
        match self {
            NonTerminalKind::Json => "json",
            NonTerminalKind::Array => "array",
            NonTerminalKind::Object => "object",
            NonTerminalKind::Prop => "prop",
            NonTerminalKind::Value => "value",
        }
    }
}

impl fmt::Display for NonTerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies a non-terminal node within one tree, in creation order.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Default)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the syntax tree.
#[derive(Debug, PartialEq, Clone)]
pub enum SyntaxNode {
    /// A scalar leaf (`null`, boolean, number or string).
    Terminal(TerminalNode),
    /// A structural node: json, array, object, prop or value.
    NonTerminal(NonTerminalNode),
}

/// A leaf holding exactly one owned token.
#[derive(Debug, PartialEq, Clone)]
pub struct TerminalNode {
    token: Token,
}

impl TerminalNode {
    pub fn new(token: Token) -> Self {
        TerminalNode { token }
    }

    pub fn kind(&self) -> TerminalKind {
        self.token.kind()
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn text(&self) -> &str {
        self.token.text()
    }
}

/// A structural node with ordered children.
///
/// `Prop` nodes also carry the property name (quotes stripped) and `Value`
/// nodes carry their payload: a scalar `Terminal` or a nested `Json` node.
#[derive(Debug, PartialEq, Clone)]
pub struct NonTerminalNode {
    id: NodeId,
    parent: Option<NodeId>,
    kind: NonTerminalKind,
    /// Position of the first token the node was built from.
    position: Position,
    children: Vec<SyntaxNode>,
    prop_name: Option<String>,
    payload: Option<Box<SyntaxNode>>,
}

impl NonTerminalNode {
    /// Creates a detached node with id `#0` and no parent.
    ///
    /// Use this to assemble trees by hand; the `TreeBuilder` assigns real
    /// ids and parent links.
    pub fn new(kind: NonTerminalKind) -> Self {
        NonTerminalNode::linked(kind, NodeId::default(), None, Position::default())
    }

    pub(crate) fn linked(
        kind: NonTerminalKind,
        id: NodeId,
        parent: Option<NodeId>,
        position: Position,
    ) -> Self {
        NonTerminalNode {
            id,
            parent,
            kind,
            position,
            children: Vec::new(),
            prop_name: None,
            payload: None,
        }
    }

    pub fn with_prop_name(mut self, name: impl Into<String>) -> Self {
        self.prop_name = Some(name.into());
        self
    }

    pub fn with_payload(mut self, payload: SyntaxNode) -> Self {
        self.payload = Some(Box::new(payload));
        self
    }

    pub fn with_child(mut self, child: SyntaxNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: SyntaxNode) {
        self.children.push(child);
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> NonTerminalKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn prop_name(&self) -> Option<&str> {
        self.prop_name.as_deref()
    }

    pub fn payload(&self) -> Option<&SyntaxNode> {
        self.payload.as_deref()
    }
}

impl From<TerminalNode> for SyntaxNode {
    fn from(node: TerminalNode) -> Self {
        SyntaxNode::Terminal(node)
    }
}

impl From<NonTerminalNode> for SyntaxNode {
    fn from(node: NonTerminalNode) -> Self {
        SyntaxNode::NonTerminal(node)
    }
}

impl SyntaxNode {
    /// The lowercase kind name, e.g. `"object"` or `"number"`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SyntaxNode::Terminal(node) => node.kind().name(),
            SyntaxNode::NonTerminal(node) => node.kind().name(),
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalNode> {
        match self {
            SyntaxNode::Terminal(node) => Some(node),
            SyntaxNode::NonTerminal(_) => None,
        }
    }

    pub fn as_non_terminal(&self) -> Option<&NonTerminalNode> {
        match self {
            SyntaxNode::Terminal(_) => None,
            SyntaxNode::NonTerminal(node) => Some(node),
        }
    }

    /// Returns true for a non-terminal node of the given kind.
    pub fn is(&self, kind: NonTerminalKind) -> bool {
        self.as_non_terminal().is_some_and(|node| node.kind() == kind)
    }

    /// Total number of nodes, this one included.
    pub fn node_count(&self) -> usize {
        match self {
            SyntaxNode::Terminal(_) => 1,
            SyntaxNode::NonTerminal(node) => {
                1 + node.children.iter().map(SyntaxNode::node_count).sum::<usize>()
                    + node.payload().map_or(0, SyntaxNode::node_count)
            }
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            SyntaxNode::Terminal(_) => 1,
            SyntaxNode::NonTerminal(node) => {
                let children = node.children.iter().map(SyntaxNode::depth).max();
                let payload = node.payload().map(SyntaxNode::depth);
                1 + children.max(payload).unwrap_or(0)
            }
        }
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:width$}", "", width = indent * 2)?;
        match self {
            SyntaxNode::Terminal(node) => writeln!(f, "{} {}", node.kind(), node.text()),
            SyntaxNode::NonTerminal(node) => {
                match node.prop_name() {
                    Some(name) => writeln!(f, "{} \"{}\"", node.kind(), name)?,
                    None => writeln!(f, "{}", node.kind())?,
                }
                if let Some(payload) = node.payload() {
                    payload.write_outline(f, indent + 1)?;
                }
                for child in &node.children {
                    child.write_outline(f, indent + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the tree as an indented outline, one node per line.
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(text: &str, kind: TerminalKind) -> SyntaxNode {
        TerminalNode::new(Token::synthetic(text, kind)).into()
    }

    // {"a": [1]}
    fn sample() -> SyntaxNode {
        let array = NonTerminalNode::new(NonTerminalKind::Array).with_child(
            NonTerminalNode::new(NonTerminalKind::Value)
                .with_payload(scalar("1", TerminalKind::Number))
                .into(),
        );
        let inner = NonTerminalNode::new(NonTerminalKind::Json).with_child(array.into());
        let prop = NonTerminalNode::new(NonTerminalKind::Prop)
            .with_prop_name("a")
            .with_child(
                NonTerminalNode::new(NonTerminalKind::Value)
                    .with_payload(inner.into())
                    .into(),
            );
        let object = NonTerminalNode::new(NonTerminalKind::Object).with_child(prop.into());
        NonTerminalNode::new(NonTerminalKind::Json)
            .with_child(object.into())
            .into()
    }

    #[test]
    fn test_node_count_and_depth() {
        let tree = sample();
        assert_eq!(tree.node_count(), 8);
        assert_eq!(tree.depth(), 8);
        assert_eq!(scalar("null", TerminalKind::Null).depth(), 1);
    }

    #[test]
    fn test_outline() {
        let expected = "\
json
  object
    prop \"a\"
      value
        json
          array
            value
              number 1
";
        assert_eq!(sample().to_string(), expected);
    }

    #[test]
    fn test_kind_helpers() {
        let tree = sample();
        assert!(tree.is(NonTerminalKind::Json));
        assert!(!tree.is(NonTerminalKind::Object));
        assert_eq!(tree.kind_name(), "json");
        assert!(tree.as_terminal().is_none());

        let leaf = scalar("\"x\"", TerminalKind::String);
        assert_eq!(leaf.kind_name(), "string");
        assert_eq!(leaf.as_terminal().map(TerminalNode::text), Some("\"x\""));
    }

    #[test]
    fn test_detached_node_defaults() {
        let node = NonTerminalNode::new(NonTerminalKind::Object);
        assert_eq!(node.id(), NodeId(0));
        assert_eq!(node.parent(), None);
        assert!(node.children().is_empty());
        assert!(node.payload().is_none());
        assert!(node.prop_name().is_none());
    }
}
