use std::fmt::{self, Display};

use serde::Serialize;

use crate::source::{Source, SourceFile, SourceId};

#[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Position {
    pub src: Option<SourceId>,
    pub byte: usize,
    pub line: usize,
    pub col: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            src: None,
            byte: 0,
            line: 1,
            col: 1,
        }
    }
}

impl Position {
    pub fn with_source_file(src_file: &SourceFile<'_>) -> Self {
        Self::with_source_id(src_file.id())
    }

    pub fn with_source_id(src: SourceId) -> Self {
        Self {
            src: Some(src),
            ..Default::default()
        }
    }

    pub fn display<'a>(&'a self, source: &'a Source<'_>) -> PositionDisplay<'a> {
        PositionDisplay {
            pos: self,
            path: self
                .src
                .and_then(|id| source.get(id))
                .map(|file| file.path().display().to_string()),
        }
    }
}

pub struct PositionDisplay<'a> {
    pos: &'a Position,
    path: Option<String>,
}

impl Display for PositionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}:{}:{}", path, self.pos.line, self.pos.col),
            None => write!(f, "<unknown>:{}:{}", self.pos.line, self.pos.col),
        }
    }
}

pub trait HasPosition {
    fn pos(&self) -> Position;

    fn line(&self) -> usize {
        self.pos().line
    }
}
