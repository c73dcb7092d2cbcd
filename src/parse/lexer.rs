use std::error::Error;
use std::fmt::{self, Display};
use std::iter::FusedIterator;

use serde::Serialize;
use tracing::trace;

use crate::parse::cursor::Cursor;
use crate::position::{HasPosition, Position};

const COMMENT_START: char = '#';
const QUOTE: char = '"';

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValue<'buf> {
    LParen,
    RParen,
    /// A bare word or a string literal; string literals keep their quotes.
    Atom(&'buf str),
    Eof,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'buf> {
    pub pos: Position,
    pub value: TokenValue<'buf>,
}

impl HasPosition for Token<'_> {
    fn pos(&self) -> Position {
        self.pos
    }
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq)]
pub enum LexerErrorKind {
    UnterminatedString,
}

impl Display for LexerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => write!(f, "the string is not terminated"),
        }
    }
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct LexerError {
    pub pos: Position,
    pub kind: LexerErrorKind,
}

impl Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Error for LexerError {}

impl HasPosition for LexerError {
    fn pos(&self) -> Position {
        self.pos
    }
}

pub struct Lexer<'buf> {
    cursor: Cursor<'buf>,
    eof: bool,
}

impl<'buf> Lexer<'buf> {
    pub fn new(cursor: Cursor<'buf>) -> Self {
        Self { cursor, eof: false }
    }

    pub fn pos(&self) -> Position {
        self.cursor.pos()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.cursor.consume_while(char::is_whitespace);

            if self.cursor.peek() != Some(COMMENT_START) {
                break;
            }

            self.cursor.consume_while(|c| c != '\n');
        }
    }

    fn scan_string(&mut self, start: Position) -> Result<TokenValue<'buf>, LexerError> {
        let remaining = self.cursor.remaining();

        // the opening quote
        self.cursor.next();
        self.cursor.consume_while(|c| c != QUOTE && c != '\n');

        match self.cursor.next() {
            Some(QUOTE) => {
                let len = self.cursor.pos().byte - start.byte;

                Ok(TokenValue::Atom(&remaining[..len]))
            }

            _ => Err(LexerError {
                pos: start,
                kind: LexerErrorKind::UnterminatedString,
            }),
        }
    }

    fn scan(&mut self) -> Result<Token<'buf>, LexerError> {
        self.skip_whitespace_and_comments();
        let pos = self.cursor.pos();

        let value = match self.cursor.peek() {
            None => TokenValue::Eof,

            Some('(') => {
                self.cursor.next();

                TokenValue::LParen
            }

            Some(')') => {
                self.cursor.next();

                TokenValue::RParen
            }

            Some(QUOTE) => self.scan_string(pos)?,

            Some(_) => TokenValue::Atom(self.cursor.consume_while(|c| !is_delimiter(c))),
        };

        Ok(Token { pos, value })
    }
}

impl<'buf> Iterator for Lexer<'buf> {
    type Item = Result<Token<'buf>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.eof {
            return None;
        }

        let result = self.scan();
        trace!(token = ?result);

        if matches!(
            result,
            Ok(Token {
                value: TokenValue::Eof,
                ..
            })
        ) {
            self.eof = true;
        }

        Some(result)
    }
}

impl FusedIterator for Lexer<'_> {}
