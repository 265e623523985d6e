//! Contains the `TreeBuilder`, which groups a token sequence into a
//! `SyntaxNode` tree.
//!
//! Each construct is handled by one method that receives exactly the tokens
//! the construct spans. Arrays and objects split their interior into
//! per-value buffers at separators that sit at the buffer's top level, as
//! reported by a `DepthTracker`, and recurse into each buffer.

use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::node::{NodeId, NonTerminalKind, NonTerminalNode, SyntaxNode, TerminalNode};
use crate::token::{unquote, Position, TerminalKind, Token};
use tracing::debug;

/// The default maximum container nesting accepted by the builder.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Brace and bracket balance of a token buffer.
///
/// A buffer is closed when both counters are zero; only then is a separator
/// seen next a real separator rather than part of a nested value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DepthTracker {
    braces: i32,
    brackets: i32,
}

impl DepthTracker {
    pub fn new() -> Self {
        DepthTracker::default()
    }

    /// Records a token entering the buffer.
    ///
    /// # Errors
    /// Fails when a closing delimiter has no matching opener in the buffer.
    pub fn track(&mut self, kind: TerminalKind) -> Result<(), SyntaxErrorKind> {
        match kind {
            TerminalKind::LeftBrace => self.braces += 1,
            TerminalKind::RightBrace => self.braces -= 1,
            TerminalKind::LeftBracket => self.brackets += 1,
            TerminalKind::RightBracket => self.brackets -= 1,
            _ => {}
        }

        if self.braces < 0 {
            Err(SyntaxErrorKind::UnmatchedBrace)
        } else if self.brackets < 0 {
            Err(SyntaxErrorKind::UnmatchedBracket)
        } else {
            Ok(())
        }
    }

    pub fn is_closed(&self) -> bool {
        self.braces == 0 && self.brackets == 0
    }
}

/// Which buffer the object scan is filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    /// Collecting a property name, or waiting for the `,` after a value.
    Prop,
    /// Collecting a value.
    Value,
}

/// Builds one syntax tree from one token sequence.
pub struct TreeBuilder {
    max_depth: usize,
    /// Kind and parent of every non-terminal created so far, indexed by `NodeId`.
    registry: Vec<(NonTerminalKind, Option<NodeId>)>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        TreeBuilder::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Creates a builder that rejects containers nested deeper than `max_depth`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        TreeBuilder {
            max_depth,
            registry: Vec::new(),
        }
    }

    /// Builds the tree; the root is always a `Json` node.
    ///
    /// # Errors
    /// Returns a `SyntaxError` naming the construct being built and the
    /// offending token on the first structural violation.
    pub fn build(mut self, tokens: &[Token]) -> Result<SyntaxNode, SyntaxError> {
        let root: SyntaxNode = self.json(tokens, None, 0)?.into();
        debug!(nodes = root.node_count(), "built syntax tree");
        Ok(root)
    }

    fn open(
        &mut self,
        kind: NonTerminalKind,
        parent: Option<NodeId>,
        tokens: &[Token],
    ) -> NonTerminalNode {
        let id = NodeId(self.registry.len());
        self.registry.push((kind, parent));
        let position = tokens.first().map_or_else(Position::default, Token::position);
        NonTerminalNode::linked(kind, id, parent, position)
    }

    /// The chain of construct names from the root down to `id`.
    fn context(&self, id: NodeId) -> String {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(NodeId(index)) = cursor {
            let Some(&(kind, parent)) = self.registry.get(index) else {
                break;
            };
            chain.push(kind.name());
            cursor = parent;
        }
        chain.reverse();
        chain.join(" > ")
    }

    fn error(&self, at: NodeId, reason: SyntaxErrorKind, token: Option<&Token>) -> SyntaxError {
        let construct = self
            .registry
            .get(at.0)
            .map_or(NonTerminalKind::Json, |&(kind, _)| kind);
        SyntaxError {
            construct,
            reason,
            token: token.cloned(),
            context: self.context(at),
        }
    }

    /// Checks the opening and closing delimiters and returns the tokens
    /// between them.
    fn interior<'t>(
        &self,
        node: &NonTerminalNode,
        tokens: &'t [Token],
        open: TerminalKind,
        close: TerminalKind,
        reason: SyntaxErrorKind,
    ) -> Result<&'t [Token], SyntaxError> {
        match tokens {
            [first, inner @ .., last] if first.kind() == open && last.kind() == close => Ok(inner),
            _ => {
                let offending = tokens
                    .first()
                    .filter(|token| token.kind() != open)
                    .or(tokens.last());
                Err(self.error(node.id(), reason, offending))
            }
        }
    }

    fn json(
        &mut self,
        tokens: &[Token],
        parent: Option<NodeId>,
        depth: usize,
    ) -> Result<NonTerminalNode, SyntaxError> {
        let mut node = self.open(NonTerminalKind::Json, parent, tokens);
        if depth >= self.max_depth {
            return Err(self.error(
                node.id(),
                SyntaxErrorKind::DepthLimitExceeded(self.max_depth),
                tokens.first(),
            ));
        }

        let child = match tokens.first().map(Token::kind) {
            Some(TerminalKind::LeftBracket) => self.array(tokens, node.id(), depth)?,
            Some(TerminalKind::LeftBrace) => self.object(tokens, node.id(), depth)?,
            Some(_) => {
                return Err(self.error(
                    node.id(),
                    SyntaxErrorKind::UnexpectedJsonToken,
                    tokens.first(),
                ))
            }
            None => return Err(self.error(node.id(), SyntaxErrorKind::EmptyTokens, None)),
        };
        node.push_child(child.into());
        Ok(node)
    }

    fn array(
        &mut self,
        tokens: &[Token],
        parent: NodeId,
        depth: usize,
    ) -> Result<NonTerminalNode, SyntaxError> {
        let mut node = self.open(NonTerminalKind::Array, Some(parent), tokens);
        let interior = self.interior(
            &node,
            tokens,
            TerminalKind::LeftBracket,
            TerminalKind::RightBracket,
            SyntaxErrorKind::WrongBracket,
        )?;
        if interior.is_empty() {
            return Ok(node);
        }

        let mut tracker = DepthTracker::new();
        let mut start = 0;
        for (i, token) in interior.iter().enumerate() {
            if token.kind() == TerminalKind::Comma && tracker.is_closed() {
                let value = self.value(&interior[start..i], node.id(), depth, Some(token))?;
                node.push_child(value.into());
                start = i + 1;
            } else {
                tracker
                    .track(token.kind())
                    .map_err(|reason| self.error(node.id(), reason, Some(token)))?;
            }
        }

        // The last value has no trailing comma.
        let value = self.value(&interior[start..], node.id(), depth, tokens.last())?;
        node.push_child(value.into());
        Ok(node)
    }

    fn object(
        &mut self,
        tokens: &[Token],
        parent: NodeId,
        depth: usize,
    ) -> Result<NonTerminalNode, SyntaxError> {
        let mut node = self.open(NonTerminalKind::Object, Some(parent), tokens);
        let interior = self.interior(
            &node,
            tokens,
            TerminalKind::LeftBrace,
            TerminalKind::RightBrace,
            SyntaxErrorKind::WrongBrace,
        )?;
        if interior.is_empty() {
            return Ok(node);
        }

        let mut state = ObjectState::Prop;
        let mut tracker = DepthTracker::new();
        // A prop that has seen its ':' and is waiting for its value.
        let mut pending: Option<NonTerminalNode> = None;
        let mut name_start = 0;
        let mut value_start = 0;

        for (i, token) in interior.iter().enumerate() {
            match (state, token.kind()) {
                (ObjectState::Prop, TerminalKind::Colon) if pending.is_none() => {
                    let prop = self.prop(&interior[name_start..i], node.id(), Some(token))?;
                    pending = Some(prop);
                    value_start = i + 1;
                    state = ObjectState::Value;
                }
                (ObjectState::Prop, TerminalKind::Comma) => match pending.take() {
                    Some(prop) => {
                        let value =
                            self.value(&interior[value_start..i], prop.id(), depth, Some(token))?;
                        node.push_child(prop.with_child(value.into()).into());
                        name_start = i + 1;
                    }
                    None => {
                        return Err(self.error(
                            node.id(),
                            SyntaxErrorKind::UnexpectedComma,
                            Some(token),
                        ))
                    }
                },
                (ObjectState::Prop, _) => {
                    // Only the single name token may sit in the prop buffer.
                    if pending.is_some() || i > name_start {
                        return Err(self.error(
                            node.id(),
                            SyntaxErrorKind::UnexpectedPropToken,
                            Some(token),
                        ));
                    }
                }
                (ObjectState::Value, TerminalKind::Comma) if tracker.is_closed() => {
                    let parent = pending.as_ref().map_or(node.id(), NonTerminalNode::id);
                    return Err(self.empty_value(parent, Some(token)));
                }
                (ObjectState::Value, kind) => {
                    tracker
                        .track(kind)
                        .map_err(|reason| self.error(node.id(), reason, Some(token)))?;
                    if tracker.is_closed() {
                        state = ObjectState::Prop;
                    }
                }
            }
        }

        match pending {
            Some(prop) => {
                // The last value has no trailing comma.
                let value = self.value(&interior[value_start..], prop.id(), depth, tokens.last())?;
                node.push_child(prop.with_child(value.into()).into());
                Ok(node)
            }
            None if name_start == interior.len() => Err(self.error(
                node.id(),
                SyntaxErrorKind::TrailingComma,
                interior.last(),
            )),
            None => Err(self.error(
                node.id(),
                SyntaxErrorKind::MissingColon,
                interior.get(name_start),
            )),
        }
    }

    fn prop(
        &mut self,
        tokens: &[Token],
        parent: NodeId,
        delimiter: Option<&Token>,
    ) -> Result<NonTerminalNode, SyntaxError> {
        let node = self.open(NonTerminalKind::Prop, Some(parent), tokens);
        match tokens {
            [token] if token.kind() == TerminalKind::String => {
                Ok(node.with_prop_name(unquote(token.text())))
            }
            [] => Err(self.error(node.id(), SyntaxErrorKind::InvalidPropTokens, delimiter)),
            [token, ..] => Err(self.error(
                node.id(),
                SyntaxErrorKind::InvalidPropTokens,
                Some(token),
            )),
        }
    }

    fn value(
        &mut self,
        tokens: &[Token],
        parent: NodeId,
        depth: usize,
        delimiter: Option<&Token>,
    ) -> Result<NonTerminalNode, SyntaxError> {
        if tokens.is_empty() {
            return Err(self.empty_value(parent, delimiter));
        }

        let node = self.open(NonTerminalKind::Value, Some(parent), tokens);
        let payload: SyntaxNode = match tokens {
            [token] if token.kind().is_scalar() => TerminalNode::new(token.clone()).into(),
            [token] => {
                return Err(self.error(
                    node.id(),
                    SyntaxErrorKind::InvalidScalarToken,
                    Some(token),
                ))
            }
            [first, ..]
                if matches!(first.kind(), TerminalKind::LeftBracket | TerminalKind::LeftBrace) =>
            {
                self.json(tokens, Some(node.id()), depth + 1)?.into()
            }
            _ => {
                return Err(self.error(
                    node.id(),
                    SyntaxErrorKind::InvalidValueTokens,
                    tokens.get(1),
                ))
            }
        };
        Ok(node.with_payload(payload))
    }

    fn empty_value(&mut self, parent: NodeId, delimiter: Option<&Token>) -> SyntaxError {
        let node = self.open(NonTerminalKind::Value, Some(parent), &[]);
        self.error(node.id(), SyntaxErrorKind::EmptyValue, delimiter)
    }
}

/// Builds the syntax tree for a token sequence with the default depth limit.
///
/// # Examples
/// ```
/// use yastjson::{build_tree, tokenize, NonTerminalKind};
///
/// let tokens = tokenize(r#"{"a": 1}"#).unwrap();
/// let root = build_tree(&tokens).unwrap();
/// assert!(root.is(NonTerminalKind::Json));
/// ```
pub fn build_tree(tokens: &[Token]) -> Result<SyntaxNode, SyntaxError> {
    TreeBuilder::new().build(tokens)
}
