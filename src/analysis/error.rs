use std::error::Error;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::position::{HasPosition, Position};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Duplicate or unresolved names.
    Name,

    /// Invalid types, incompatible initializers, bad instantiations.
    Type,

    /// Declarations that don't have the expected shape.
    Syntax,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name error",
            Self::Type => "type error",
            Self::Syntax => "syntax error",
        })
    }
}

/// A definition-time failure.
///
/// None of these are recoverable: the first one stops the whole definition pass.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SemaError {
    pub kind: ErrorKind,
    pub message: String,
    pub pos: Option<Position>,
}

impl SemaError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            pos: None,
        }
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Name, message)
    }

    pub fn ty(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Type, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax, message)
    }

    pub fn at(self, pos: Position) -> Self {
        Self {
            pos: Some(pos),
            ..self
        }
    }

    /// Attaches `pos` unless the error already knows where it happened.
    pub fn or_at(self, pos: Position) -> Self {
        match self.pos {
            Some(_) => self,
            None => self.at(pos),
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.pos.map(|pos| pos.line)
    }
}

impl Display for SemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line() {
            Some(line) => write!(f, "{} on line {}: {}", self.kind, line, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl Error for SemaError {}

impl HasPosition for SemaError {
    fn pos(&self) -> Position {
        self.pos.unwrap_or_default()
    }
}

pub type SemaResult<T> = Result<T, SemaError>;
