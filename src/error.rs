//! Contains the error types for the three parsing stages and the
//! `ParseError` that wraps them.
use crate::node::NonTerminalKind;
use crate::token::{Position, Token};
use crate::tokenizer::LexState;
use std::fmt;
use thiserror::Error;

/// An invalid character for the tokenizer's current state.
///
/// Lex errors are always fatal: tokenizing stops at the first one.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{state} state] {} at {position} near \"{fragment}\"", describe_found(.found))]
pub struct LexError {
    /// The state the tokenizer was in when it gave up.
    pub state: LexState,
    /// The offending character, or `None` if the input ended early.
    pub found: Option<char>,
    /// Where the offending character (or the end of input) is.
    pub position: Position,
    /// A short slice of the source around `position`.
    pub fragment: String,
}

fn describe_found(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("unexpected character '{}'", c.escape_debug()),
        None => "unexpected end of input".to_string(),
    }
}

/// Why the tree builder rejected a token sequence.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("unexpected token at json level")]
    UnexpectedJsonToken,
    #[error("empty token sequence")]
    EmptyTokens,
    #[error("wrong bracket token")]
    WrongBracket,
    #[error("wrong brace token")]
    WrongBrace,
    #[error("prop state got unexpected token")]
    UnexpectedPropToken,
    #[error("unexpected comma")]
    UnexpectedComma,
    #[error("property name is not followed by ':'")]
    MissingColon,
    #[error("trailing comma")]
    TrailingComma,
    #[error("invalid prop tokens, expected a single string")]
    InvalidPropTokens,
    #[error("empty value expression")]
    EmptyValue,
    #[error("unknown single token type")]
    InvalidScalarToken,
    #[error("invalid value tokens")]
    InvalidValueTokens,
    #[error("unmatched closing brace '}}'")]
    UnmatchedBrace,
    #[error("unmatched closing bracket ']'")]
    UnmatchedBracket,
    #[error("maximum nesting depth of {0} exceeded")]
    DepthLimitExceeded(usize),
}

/// A token sequence that violates the structural grammar.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("[{construct} expression error] {reason}{}", describe_token(.token))]
pub struct SyntaxError {
    /// The construct being built when the error was detected.
    pub construct: NonTerminalKind,
    pub reason: SyntaxErrorKind,
    /// The offending token, when there is one.
    pub token: Option<Token>,
    /// Chain of enclosing constructs, e.g. `json > object > prop > value`.
    pub context: String,
}

fn describe_token(token: &Option<Token>) -> String {
    match token {
        Some(token) => format!(", got {}", token),
        None => String::new(),
    }
}

/// A syntax node that cannot be turned into a native value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterializeError {
    #[error("[materialize error] unexpected node type {found}, expected Json node")]
    ExpectedJson { found: String },
    #[error("[materialize error] unexpected node type {found}, expected an Array or Object node")]
    ExpectedContainer { found: String },
    #[error("[materialize error] unexpected node type {found}, expected a Prop node with one Value")]
    ExpectedProp { found: String },
    #[error("[materialize error] unexpected node type {found}, expected a valid Value node")]
    ExpectedValue { found: String },
    #[error("[materialize error] unexpected null node value `{text}`")]
    UnexpectedNull { text: String },
    #[error("[materialize error] unexpected boolean node value `{text}`")]
    UnexpectedBoolean { text: String },
    #[error("[materialize error] unexpected number node value `{text}`")]
    UnexpectedNumber { text: String },
}

/// The primary error type returned by `parse`.
///
/// Each stage has its own error; whichever stage fails first aborts the
/// whole parse.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },
}

impl ParseError {
    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            ParseError::Lex(_) | ParseError::InputTooLarge { .. } => Stage::Tokenize,
            ParseError::Syntax(_) => Stage::Build,
            ParseError::Materialize(_) => Stage::Materialize,
        }
    }
}

/// The three stages of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Tokenize,
    Build,
    Materialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Tokenize => "tokenize",
            Stage::Build => "build",
            Stage::Materialize => "materialize",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TerminalKind;

    #[test]
    fn test_lex_error_display() {
        let error = LexError {
            state: LexState::InBooleanFalse,
            found: Some('x'),
            position: Position::new(1, 19),
            fragment: "false\": falsx, \"re".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "[boolean false state] unexpected character 'x' at line 1, column 19 near \"false\": falsx, \"re\""
        );
    }

    #[test]
    fn test_lex_error_display_end_of_input() {
        let error = LexError {
            state: LexState::InString,
            found: None,
            position: Position::new(2, 4),
            fragment: "\"abc".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "[string state] unexpected end of input at line 2, column 4 near \"\"abc\""
        );
    }

    #[test]
    fn test_syntax_error_display() {
        let error = SyntaxError {
            construct: NonTerminalKind::Array,
            reason: SyntaxErrorKind::WrongBracket,
            token: Some(Token::new("}", TerminalKind::RightBrace, 1, 1)),
            context: "json > array".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "[array expression error] wrong bracket token, got right brace `}` at line 1, column 1"
        );
    }

    #[test]
    fn test_parse_error_stage() {
        let error: ParseError = MaterializeError::UnexpectedNumber {
            text: "fake100".to_string(),
        }
        .into();
        assert_eq!(error.stage(), Stage::Materialize);
        assert_eq!(
            error.to_string(),
            "[materialize error] unexpected number node value `fake100`"
        );
    }
}
