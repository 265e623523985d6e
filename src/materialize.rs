//! Contains the `Materializer`, which walks a `SyntaxNode` tree and produces
//! the native `JsonValue`.
//!
//! Dispatch is by node kind only. The tree is expected to have the shape the
//! `TreeBuilder` produces; anything else (a hand-built tree, say) is rejected
//! with a `MaterializeError` naming what was found.

use crate::error::MaterializeError;
use crate::node::{NonTerminalKind, NonTerminalNode, SyntaxNode, TerminalNode};
use crate::token::{unquote, TerminalKind};
use crate::value::{JsonObject, JsonValue};
use tracing::debug;

/// Converts syntax trees into `JsonValue`s.
#[derive(Debug, Default)]
pub struct Materializer {
    /// Number of values produced so far, containers included.
    values: usize,
}

impl Materializer {
    pub fn new() -> Self {
        Materializer::default()
    }

    /// Materializes a whole document. `root` must be a `Json` node.
    pub fn materialize(&mut self, root: &SyntaxNode) -> Result<JsonValue, MaterializeError> {
        let json = match root {
            SyntaxNode::NonTerminal(node) if node.kind() == NonTerminalKind::Json => node,
            other => {
                return Err(MaterializeError::ExpectedJson {
                    found: other.kind_name().to_string(),
                })
            }
        };
        let value = self.json(json)?;
        debug!(values = self.values, "materialized value");
        Ok(value)
    }

    /// Materializes a `Value` node, a nested `Json` node or a bare scalar leaf.
    pub fn value(&mut self, node: &SyntaxNode) -> Result<JsonValue, MaterializeError> {
        match node {
            SyntaxNode::Terminal(leaf) => self.scalar(leaf),
            SyntaxNode::NonTerminal(node) => match node.kind() {
                NonTerminalKind::Value => match node.payload() {
                    Some(payload) => self.payload(payload),
                    None => Err(MaterializeError::ExpectedValue {
                        found: "empty value".to_string(),
                    }),
                },
                NonTerminalKind::Json => self.json(node),
                kind => Err(MaterializeError::ExpectedValue {
                    found: kind.name().to_string(),
                }),
            },
        }
    }

    // A value payload is either a scalar leaf or a nested document.
    fn payload(&mut self, node: &SyntaxNode) -> Result<JsonValue, MaterializeError> {
        match node {
            SyntaxNode::Terminal(leaf) => self.scalar(leaf),
            SyntaxNode::NonTerminal(node) if node.kind() == NonTerminalKind::Json => self.json(node),
            other => Err(MaterializeError::ExpectedValue {
                found: other.kind_name().to_string(),
            }),
        }
    }

    fn json(&mut self, node: &NonTerminalNode) -> Result<JsonValue, MaterializeError> {
        match node.children() {
            [SyntaxNode::NonTerminal(child)] => match child.kind() {
                NonTerminalKind::Array => self.array(child),
                NonTerminalKind::Object => self.object(child),
                kind => Err(MaterializeError::ExpectedContainer {
                    found: kind.name().to_string(),
                }),
            },
            [other] => Err(MaterializeError::ExpectedContainer {
                found: other.kind_name().to_string(),
            }),
            children => Err(MaterializeError::ExpectedContainer {
                found: format!("json with {} children", children.len()),
            }),
        }
    }

    fn array(&mut self, node: &NonTerminalNode) -> Result<JsonValue, MaterializeError> {
        let items = node
            .children()
            .iter()
            .map(|child| match child {
                SyntaxNode::NonTerminal(element) if element.kind() == NonTerminalKind::Value => {
                    self.value(child)
                }
                other => Err(MaterializeError::ExpectedValue {
                    found: other.kind_name().to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.values += 1;
        Ok(JsonValue::Array(items))
    }

    fn object(&mut self, node: &NonTerminalNode) -> Result<JsonValue, MaterializeError> {
        let mut map = JsonObject::with_capacity(node.children().len());
        for child in node.children() {
            let (name, value) = match child {
                SyntaxNode::NonTerminal(prop) if prop.kind() == NonTerminalKind::Prop => {
                    match (prop.prop_name(), prop.children()) {
                        (Some(name), [value]) if value.is(NonTerminalKind::Value) => (name, value),
                        _ => {
                            return Err(MaterializeError::ExpectedProp {
                                found: "malformed prop".to_string(),
                            })
                        }
                    }
                }
                other => {
                    return Err(MaterializeError::ExpectedProp {
                        found: other.kind_name().to_string(),
                    })
                }
            };
            let value = self.value(value)?;
            // Repeated keys keep their first slot and take the last value.
            map.insert(name.to_string(), value);
        }
        self.values += 1;
        Ok(JsonValue::Object(map))
    }

    fn scalar(&mut self, leaf: &TerminalNode) -> Result<JsonValue, MaterializeError> {
        let text = leaf.text();
        let value = match leaf.kind() {
            TerminalKind::Null if text == "null" => JsonValue::Null,
            TerminalKind::Null => {
                return Err(MaterializeError::UnexpectedNull {
                    text: text.to_string(),
                })
            }
            TerminalKind::Boolean => match text {
                "true" => JsonValue::Boolean(true),
                "false" => JsonValue::Boolean(false),
                _ => {
                    return Err(MaterializeError::UnexpectedBoolean {
                        text: text.to_string(),
                    })
                }
            },
            TerminalKind::Number => match text.parse::<f64>() {
                Ok(n) if n.is_finite() => JsonValue::Number(n),
                _ => {
                    return Err(MaterializeError::UnexpectedNumber {
                        text: text.to_string(),
                    })
                }
            },
            TerminalKind::String => JsonValue::String(unquote(text).to_string()),
            kind => {
                return Err(MaterializeError::ExpectedValue {
                    found: kind.name().to_string(),
                })
            }
        };
        self.values += 1;
        Ok(value)
    }
}

/// Materializes the tree rooted at `root`, which must be a `Json` node.
///
/// # Examples
/// ```
/// use yastjson::{build_tree, materialize, tokenize, JsonValue};
///
/// let tokens = tokenize(r#"[1, "two", null]"#).unwrap();
/// let value = materialize(&build_tree(&tokens).unwrap()).unwrap();
/// assert_eq!(value.get_index(1), Some(&JsonValue::String("two".to_string())));
/// ```
pub fn materialize(root: &SyntaxNode) -> Result<JsonValue, MaterializeError> {
    Materializer::new().materialize(root)
}

/// Materializes a single `Value` node, nested `Json` node or scalar leaf.
pub fn materialize_value(node: &SyntaxNode) -> Result<JsonValue, MaterializeError> {
    Materializer::new().value(node)
}
