//! Defines the `Token` and `TerminalKind` types.
//!
//! These are the intermediate representation between the `Tokenizer`
//! (lexer) and the `TreeBuilder` (parser).

use std::fmt;

/// The kind of a `Token`.
///
/// This represents the smallest meaningful units of JSON grammar. The set
/// is closed: every terminal the grammar knows about is listed here.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TerminalKind {
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// The `null` literal
    Null,
    /// `true` or `false`
    Boolean,
    /// A number, e.g., `-0.5`
    Number,
    /// A string including its quotes, e.g., `"hello"`
    String,
}

impl TerminalKind {
    /// Scalars are the kinds that can stand alone as a `Value` payload.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TerminalKind::Null | TerminalKind::Boolean | TerminalKind::Number | TerminalKind::String
        )
    }

    /// The lowercase name used in error messages and tree outlines.
    pub fn name(self) -> &'static str {
        match self {
            TerminalKind::LeftBrace => "left brace",
            TerminalKind::RightBrace => "right brace",
            TerminalKind::LeftBracket => "left bracket",
            TerminalKind::RightBracket => "right bracket",
            TerminalKind::Comma => "comma",
            TerminalKind::Colon => "colon",
            TerminalKind::Null => "null",
            TerminalKind::Boolean => "boolean",
            TerminalKind::Number => "number",
            TerminalKind::String => "string",
        }
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A location in the source text.
///
/// Lines are 1-indexed, columns are 0-indexed and count characters.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Position {
    /// The 1-indexed line number.
    pub line: usize,
    /// The 0-indexed column number.
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A single token produced by the `Tokenizer`.
///
/// It keeps the raw lexeme text (quotes and escapes included), its kind and
/// the position of its first character. Tokens are never mutated after
/// creation; tree nodes own clones of the tokens they were built from.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    text: String,
    kind: TerminalKind,
    position: Position,
}

impl Token {
    /// Creates a token at the given 1-indexed line and 0-indexed column.
    pub fn new(text: impl Into<String>, kind: TerminalKind, line: usize, column: usize) -> Self {
        Token {
            text: text.into(),
            kind,
            position: Position::new(line, column),
        }
    }

    /// Creates a token with no meaningful source position (line 0, column 0).
    ///
    /// Useful for handing synthetic token sequences to the tree builder.
    pub fn synthetic(text: impl Into<String>, kind: TerminalKind) -> Self {
        Token::new(text, kind, 0, 0)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TerminalKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

/// Drops the first and last character of a string token's text (its quotes).
///
/// Nothing in between is unescaped.
pub(crate) fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}` at {}", self.kind, self.text, self.position)
    }
}
