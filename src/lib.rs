//! # yastjson
//!
//! `yastjson` is a from-scratch JSON parser that goes through a real syntax
//! tree. Parsing runs in three stages, each usable on its own:
//!
//! 1. [`tokenize`] turns text into [`Token`]s with a character-level state
//!    machine, recording the line and column of every token.
//! 2. [`build_tree`] groups the tokens into a [`SyntaxNode`] tree that
//!    mirrors the grammar (`json`, `array`, `object`, `prop`, `value`).
//! 3. [`materialize`] walks the tree and produces a [`JsonValue`].
//!
//! [`parse`] runs all three. Any failure aborts the whole parse.
//!
//! Two behaviours differ from a strict RFC 8259 parser:
//!
//! * String escapes are not decoded. `"a \"b\""` materializes to the text
//!   between the quotes exactly as written, backslashes included.
//! * The number lexer accepts more than one decimal point, so `1.2.3` is a
//!   single token that later fails in the materializer.
//!
//! ## Quick Start
//!
//! ```
//! use yastjson::{parse, JsonValue};
//!
//! let value = parse(r#"{ "name": "Babbage", "ids": [1815, -0.5] }"#).unwrap();
//! assert_eq!(value.get("name").and_then(JsonValue::as_str), Some("Babbage"));
//! assert_eq!(value.get("ids").and_then(|ids| ids.get_index(1)), Some(&JsonValue::Number(-0.5)));
//! assert_eq!(value.stringify().unwrap(), r#"{"name":"Babbage","ids":[1815,-0.5]}"#);
//! ```
//!
//! ## Inspecting the stages
//!
//! ```
//! use yastjson::{build_tree, tokenize, materialize};
//!
//! let tokens = tokenize("[1, 2]").unwrap();
//! assert_eq!(tokens.len(), 5);
//! let tree = build_tree(&tokens).unwrap();
//! assert_eq!(tree.node_count(), 6);
//! let value = materialize(&tree).unwrap();
//! assert_eq!(value.to_string(), "[1,2]");
//! ```

/// Contains the error types of every stage and the wrapping `ParseError`.
pub mod error;
/// Contains the `Materializer` (syntax tree to native value).
pub mod materialize;
/// Contains the syntax tree node types.
pub mod node;
/// Contains the `TreeBuilder` (tokens to syntax tree).
pub mod parser;
/// Contains the `Token` and `TerminalKind` types.
pub mod token;
/// Contains the character-level `Tokenizer` state machine.
pub mod tokenizer;
/// Contains the `JsonValue` enum and the serialization (stringify) logic.
pub mod value;

pub use error::{LexError, MaterializeError, ParseError, Stage, SyntaxError, SyntaxErrorKind};
pub use materialize::{materialize, materialize_value, Materializer};
pub use node::{NodeId, NonTerminalKind, NonTerminalNode, SyntaxNode, TerminalNode};
pub use parser::{build_tree, DepthTracker, TreeBuilder, DEFAULT_MAX_DEPTH};
pub use token::{Position, TerminalKind, Token};
pub use tokenizer::{tokenize, LexState, Tokenizer};
pub use value::{JsonObject, JsonValue};

use tracing::debug;

/// The default maximum size of an input (10 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Limits applied by [`parse_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum container nesting; deeper input is a `SyntaxError`.
    pub max_depth: usize,
    /// Maximum input size in bytes, checked before tokenizing.
    pub max_input_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ParseOptions {
    /// Checks `text` against `max_input_bytes`.
    ///
    /// # Errors
    /// Returns `ParseError::InputTooLarge` when the input is over the limit.
    pub fn check_size(&self, text: &str) -> Result<(), ParseError> {
        if text.len() > self.max_input_bytes {
            return Err(ParseError::InputTooLarge {
                size: text.len(),
                limit: self.max_input_bytes,
            });
        }
        Ok(())
    }
}

/// Parses a JSON document into a `JsonValue` with the default limits.
///
/// # Errors
/// Returns the error of the first stage that fails; see [`ParseError`].
///
/// # Examples
/// ```
/// use yastjson::{parse, Stage};
///
/// assert!(parse(r#"{"a": [true, null]}"#).is_ok());
///
/// let err = parse(r#"{"fake_false": falsx}"#).unwrap_err();
/// assert_eq!(err.stage(), Stage::Tokenize);
/// ```
pub fn parse(text: &str) -> Result<JsonValue, ParseError> {
    parse_with(text, ParseOptions::default())
}

/// Parses a JSON document into a `JsonValue` under the given limits.
///
/// # Errors
/// Returns `ParseError::InputTooLarge` if `text` is longer than
/// `options.max_input_bytes`, otherwise the error of the first stage that
/// fails.
pub fn parse_with(text: &str, options: ParseOptions) -> Result<JsonValue, ParseError> {
    options.check_size(text)?;
    let tokens = tokenize(text)?;
    let tree = TreeBuilder::with_max_depth(options.max_depth).build(&tokens)?;
    let value = materialize(&tree)?;
    debug!(bytes = text.len(), tokens = tokens.len(), "parsed document");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value as SerdeValue;

    #[test]
    fn test_parse_simple() {
        let value = parse("{ \"key\": [1, null, true, \"hello\"] }").unwrap();
        assert_eq!(
            value.get("key"),
            Some(&JsonValue::Array(vec![
                JsonValue::Number(1.0),
                JsonValue::Null,
                JsonValue::Boolean(true),
                JsonValue::String("hello".to_string()),
            ]))
        );
    }

    #[test]
    fn test_parse_stage_of_each_error() {
        assert_eq!(parse("[1, ?]").unwrap_err().stage(), Stage::Tokenize);
        assert_eq!(parse("[1, 2,]").unwrap_err().stage(), Stage::Build);
        assert_eq!(parse("[1.2.3]").unwrap_err().stage(), Stage::Materialize);
    }

    #[test]
    fn test_parse_rejects_top_level_scalars() {
        let err = parse("123").unwrap_err();
        match err {
            ParseError::Syntax(err) => {
                assert_eq!(err.reason, SyntaxErrorKind::UnexpectedJsonToken);
                assert_eq!(err.construct, NonTerminalKind::Json);
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_with_depth_limit() {
        let options = ParseOptions {
            max_depth: 100,
            ..ParseOptions::default()
        };
        let ok_input = "[".repeat(100) + &"]".repeat(100);
        assert!(parse_with(&ok_input, options).is_ok());

        let evil_input = "[".repeat(101) + &"]".repeat(101);
        match parse_with(&evil_input, options).unwrap_err() {
            ParseError::Syntax(err) => {
                assert_eq!(err.reason, SyntaxErrorKind::DepthLimitExceeded(100));
                assert_eq!(err.token.map(|t| t.column()), Some(100));
            }
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_with_size_limit() {
        let options = ParseOptions {
            max_input_bytes: 8,
            ..ParseOptions::default()
        };
        assert!(parse_with("[1, 2]", options).is_ok());
        let err = parse_with("[1, 2, 3, 4]", options).unwrap_err();
        assert_eq!(err, ParseError::InputTooLarge { size: 12, limit: 8 });
        assert_eq!(err.to_string(), "input of 12 bytes exceeds the 8 byte limit");
    }

    #[test]
    fn test_check_size_boundary() {
        let options = ParseOptions {
            max_input_bytes: 3,
            ..ParseOptions::default()
        };
        assert_eq!(options.check_size("[1]"), Ok(()));
        assert_eq!(
            options.check_size("[12]"),
            Err(ParseError::InputTooLarge { size: 4, limit: 3 })
        );
        assert_eq!(ParseOptions::default().check_size(&"x".repeat(1024)), Ok(()));
    }

    #[test]
    fn test_stringify_output_is_valid_json() {
        let value = parse(r#"{"key": "value", "items": [1, null, {"deep": [false]}]}"#).unwrap();

        // Parse the string output back with serde_json.
        let output_str = value.stringify().unwrap();
        let parsed: SerdeValue =
            serde_json::from_str(&output_str).expect("Stringify output should be valid JSON");
        let expected = serde_json::json!({
            "key": "value",
            "items": [1, null, {"deep": [false]}]
        });
        assert_eq!(parsed, expected);

        // And back through our own parser.
        assert_eq!(parse(&output_str).unwrap(), value);
        assert_eq!(parse(&value.stringify_pretty().unwrap()).unwrap(), value);
    }
}
