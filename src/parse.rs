mod cursor;
mod lexer;
mod parser;

pub use cursor::Cursor;
pub use lexer::{Lexer, LexerError, LexerErrorKind, Token, TokenValue};
pub use parser::{Parser, ParserError, MAX_NESTING_DEPTH};

use crate::source::SourceFile;
use crate::syntax::Sexpr;

/// Reads every top-level S-expression of `src_file`.
pub fn parse_file(src_file: &SourceFile<'_>) -> Result<Vec<Sexpr>, ParserError> {
    Parser::new(Lexer::new(Cursor::new(src_file))).parse()
}
