use std::error::Error;
use std::fmt::{self, Display};

use tracing::{instrument, trace};

use crate::parse::lexer::{Lexer, LexerError, Token, TokenValue};
use crate::position::{HasPosition, Position};
use crate::syntax::Sexpr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    LexerError(LexerError),
    UnbalancedClose(Position),
    UnclosedList(Position),
    TooDeep(Position),
}

impl From<LexerError> for ParserError {
    fn from(err: LexerError) -> Self {
        Self::LexerError(err)
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LexerError(err) => write!(f, "{}", err),
            Self::UnbalancedClose(_) => write!(f, "encountered `)` without a matching `(`"),
            Self::UnclosedList(_) => write!(f, "the list opened here is never closed"),
            Self::TooDeep(_) => write!(
                f,
                "lists may be nested at most {} levels deep",
                MAX_NESTING_DEPTH
            ),
        }
    }
}

impl Error for ParserError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LexerError(err) => Some(err),
            _ => None,
        }
    }
}

impl HasPosition for ParserError {
    fn pos(&self) -> Position {
        match self {
            Self::LexerError(err) => err.pos(),
            Self::UnbalancedClose(pos) | Self::UnclosedList(pos) | Self::TooDeep(pos) => *pos,
        }
    }
}

/// The deepest list nesting the reader accepts.
///
/// Dropping, printing and rewriting a tree all recurse, so the depth is bounded here.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Reads a whole file into its top-level S-expressions.
pub struct Parser<'buf> {
    lexer: Lexer<'buf>,
}

impl<'buf> Parser<'buf> {
    pub fn new(lexer: Lexer<'buf>) -> Self {
        Self { lexer }
    }

    #[instrument(level = "trace", skip(self), ret)]
    pub fn parse(mut self) -> Result<Vec<Sexpr>, ParserError> {
        let mut top_level = vec![];
        // each open list: its opening position and the items read so far
        let mut open: Vec<(Position, Vec<Sexpr>)> = vec![];

        loop {
            let Token { pos, value } = match self.lexer.next() {
                Some(token) => token?,
                None => unreachable!("the lexer stops only after producing Eof"),
            };

            let completed = match value {
                TokenValue::LParen => {
                    if open.len() == MAX_NESTING_DEPTH {
                        return Err(ParserError::TooDeep(pos));
                    }

                    open.push((pos, vec![]));

                    continue;
                }

                TokenValue::RParen => match open.pop() {
                    Some((start, items)) => Sexpr::list(items, start),
                    None => return Err(ParserError::UnbalancedClose(pos)),
                },

                TokenValue::Atom(text) => Sexpr::atom(text, pos),

                TokenValue::Eof => {
                    return match open.pop() {
                        Some((start, _)) => Err(ParserError::UnclosedList(start)),
                        None => Ok(top_level),
                    };
                }
            };

            trace!(sexpr = %completed);

            match open.last_mut() {
                Some((_, items)) => items.push(completed),
                None => top_level.push(completed),
            }
        }
    }
}
