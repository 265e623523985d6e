//! The character-level tokenizer (lexer).
//!
//! The tokenizer is a finite state machine. `Init` is both the start state
//! and the state it returns to after every completed token; each other
//! state accumulates one kind of multi-character lexeme. Token text is kept
//! raw: quotes and escape sequences are not touched here.

use crate::error::LexError;
use crate::token::{Position, TerminalKind, Token};
use memchr::memchr;
use std::fmt;
use std::mem;
use tracing::{debug, trace};

/// How many characters of context a `LexError` fragment keeps on each side.
const FRAGMENT_RADIUS: usize = 12;

/// The states of the tokenizer's state machine.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LexState {
    /// Between tokens.
    Init,
    /// Inside the `null` literal.
    InNull,
    /// Inside the `true` literal.
    InBooleanTrue,
    /// Inside the `false` literal.
    InBooleanFalse,
    /// Inside a number.
    InNumber,
    /// Inside a string, after the opening quote.
    InString,
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexState::Init => "init",
            LexState::InNull => "null",
            LexState::InBooleanTrue => "boolean true",
            LexState::InBooleanFalse => "boolean false",
            LexState::InNumber => "number",
            LexState::InString => "string",
        })
    }
}

/// The tokenizer (lexer).
///
/// Walks the source one character at a time, except inside strings where
/// `memchr` jumps straight to the next candidate closing quote.
pub struct Tokenizer<'a> {
    /// The full source text.
    source: &'a str,
    /// Byte offset of the next unread character.
    cursor: usize,
    /// The 1-indexed line of the next unread character.
    line: usize,
    /// The 0-indexed column of the next unread character.
    column: usize,
    state: LexState,
    /// Text of the token being accumulated.
    lexeme: String,
    /// Where the token being accumulated started.
    start: Position,
    tokens: Vec<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Tokenizer {
            source,
            cursor: 0,
            line: 1,
            column: 0,
            state: LexState::Init,
            lexeme: String::new(),
            start: Position::new(1, 0),
            tokens: Vec::new(),
        }
    }

    /// Runs the state machine to the end of the input.
    ///
    /// # Errors
    /// Returns a `LexError` on the first character that is invalid for the
    /// current state, or if the input ends while a token is still open.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(c) = self.peek() {
            match self.state {
                LexState::Init => self.scan_init(c)?,
                LexState::InNull => self.scan_literal(c, "null", TerminalKind::Null)?,
                LexState::InBooleanTrue => self.scan_literal(c, "true", TerminalKind::Boolean)?,
                LexState::InBooleanFalse => self.scan_literal(c, "false", TerminalKind::Boolean)?,
                LexState::InNumber => self.scan_number(c)?,
                LexState::InString => self.scan_string()?,
            }
        }

        if self.state != LexState::Init {
            return Err(self.error(None));
        }

        debug!(tokens = self.tokens.len(), "tokenized input");
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.cursor..].chars().next()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Consumes one character, updating line/column.
    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.cursor += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    /// Consumes `len` bytes, which must end on a character boundary.
    fn bump_bytes(&mut self, len: usize) {
        let end = self.cursor + len;
        while self.cursor < end {
            self.bump();
        }
    }

    /// Enters a lexeme state. The triggering character is left unread so
    /// the state's own handler validates it.
    fn begin(&mut self, state: LexState) {
        self.state = state;
        self.start = self.position();
        self.lexeme.clear();
    }

    fn finish(&mut self, kind: TerminalKind) {
        let text = mem::take(&mut self.lexeme);
        self.emit(text, kind, self.start);
        self.state = LexState::Init;
    }

    fn emit(&mut self, text: String, kind: TerminalKind, at: Position) {
        trace!(%kind, text = %text, line = at.line, column = at.column, "token");
        self.tokens.push(Token::new(text, kind, at.line, at.column));
    }

    /// Builds an error for the character at the cursor (or end of input).
    fn error(&self, found: Option<char>) -> LexError {
        LexError {
            state: self.state,
            found,
            position: self.position(),
            fragment: self.fragment(),
        }
    }

    /// A slice of up to `FRAGMENT_RADIUS` characters on each side of the cursor.
    fn fragment(&self) -> String {
        let before = &self.source[..self.cursor];
        let start = before
            .char_indices()
            .rev()
            .take(FRAGMENT_RADIUS)
            .last()
            .map_or(self.cursor, |(i, _)| i);
        let after = &self.source[self.cursor..];
        let end = after
            .char_indices()
            .nth(FRAGMENT_RADIUS)
            .map_or(self.source.len(), |(i, _)| self.cursor + i);
        self.source[start..end].to_string()
    }

    fn scan_init(&mut self, c: char) -> Result<(), LexError> {
        let kind = match c {
            '[' => TerminalKind::LeftBracket,
            ']' => TerminalKind::RightBracket,
            '{' => TerminalKind::LeftBrace,
            '}' => TerminalKind::RightBrace,
            ':' => TerminalKind::Colon,
            ',' => TerminalKind::Comma,
            // Tab is accepted here as well as space, CR and LF.
            ' ' | '\n' | '\r' | '\t' => {
                self.bump();
                return Ok(());
            }
            'n' => {
                self.begin(LexState::InNull);
                return Ok(());
            }
            't' => {
                self.begin(LexState::InBooleanTrue);
                return Ok(());
            }
            'f' => {
                self.begin(LexState::InBooleanFalse);
                return Ok(());
            }
            '-' | '0'..='9' => {
                self.begin(LexState::InNumber);
                return Ok(());
            }
            '"' => {
                self.begin(LexState::InString);
                return Ok(());
            }
            _ => return Err(self.error(Some(c))),
        };

        let at = self.position();
        self.bump();
        self.emit(c.to_string(), kind, at);
        Ok(())
    }

    /// Matches `c` against the next expected character of `literal`.
    fn scan_literal(
        &mut self,
        c: char,
        literal: &'static str,
        kind: TerminalKind,
    ) -> Result<(), LexError> {
        let expected = literal[self.lexeme.len()..].chars().next();
        if expected != Some(c) {
            return Err(self.error(Some(c)));
        }

        self.bump();
        self.lexeme.push(c);
        if self.lexeme.len() == literal.len() {
            self.finish(kind);
        }
        Ok(())
    }

    /// Accepts `-?[0-9]+(\.[0-9]+)*`, deciding whether to go on by peeking
    /// one character ahead.
    fn scan_number(&mut self, c: char) -> Result<(), LexError> {
        match c {
            '0'..='9' => {
                self.bump();
                self.lexeme.push(c);
                if !matches!(self.peek(), Some('0'..='9' | '-' | '.')) {
                    self.finish(TerminalKind::Number);
                }
                Ok(())
            }
            '-' if self.lexeme.is_empty() => {
                self.bump();
                self.lexeme.push(c);
                self.expect_digit()
            }
            '.' if self.lexeme.ends_with(|p: char| p.is_ascii_digit()) => {
                self.bump();
                self.lexeme.push(c);
                self.expect_digit()
            }
            _ => Err(self.error(Some(c))),
        }
    }

    fn expect_digit(&self) -> Result<(), LexError> {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => Ok(()),
            found => Err(self.error(found)),
        }
    }

    /// Accumulates up to the next unescaped `"`.
    ///
    /// A quote is escaped when an odd number of backslashes directly
    /// precedes it. The escapes themselves stay in the token text.
    fn scan_string(&mut self) -> Result<(), LexError> {
        if self.lexeme.is_empty() {
            self.bump();
            self.lexeme.push('"');
        }

        let source = self.source;
        let rest = &source[self.cursor..];
        let Some(offset) = memchr(b'"', rest.as_bytes()) else {
            self.bump_bytes(rest.len());
            return Err(self.error(None));
        };

        let chunk = &rest[..=offset];
        self.lexeme.push_str(chunk);
        self.bump_bytes(chunk.len());

        let body = &self.lexeme[..self.lexeme.len() - 1];
        let backslashes = body.bytes().rev().take_while(|&b| b == b'\\').count();
        if backslashes % 2 == 0 {
            self.finish(TerminalKind::String);
        }
        Ok(())
    }
}

/// Converts `source` into its token sequence.
///
/// # Examples
/// ```
/// use yastjson::{tokenize, TerminalKind};
///
/// let tokens = tokenize(r#"{"arr": [1, 2, 3]}"#).unwrap();
/// assert_eq!(tokens.len(), 11);
/// assert_eq!(tokens[1].text(), "\"arr\"");
/// assert_eq!(tokens[10].kind(), TerminalKind::RightBrace);
/// assert_eq!((tokens[10].line(), tokens[10].column()), (1, 17));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(source).tokenize()
}
