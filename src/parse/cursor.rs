use std::str::Chars;

use crate::position::Position;
use crate::source::SourceFile;

#[derive(Debug, Clone)]
pub struct Cursor<'buf> {
    text: &'buf str,
    iter: Chars<'buf>,
    pos: Position,
}

impl<'buf> Cursor<'buf> {
    pub fn new(src_file: &SourceFile<'buf>) -> Self {
        let text = src_file.text();

        Self {
            text,
            iter: text.chars(),
            pos: Position::with_source_file(src_file),
        }
    }

    /// Returns the position of the immediately following character.
    pub fn pos(&self) -> Position {
        self.pos
    }

    pub fn peek(&self) -> Option<char> {
        self.iter.clone().next()
    }

    pub fn remaining(&self) -> &'buf str {
        &self.text[self.pos.byte..]
    }

    /// Consumes characters while `predicate` holds, returning the consumed slice.
    pub fn consume_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> &'buf str {
        let start = self.pos.byte;

        while self.peek().map_or(false, &mut predicate) {
            self.next();
        }

        &self.text[start..self.pos.byte]
    }
}

impl Iterator for Cursor<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let c = self.iter.next()?;
        self.pos.byte += c.len_utf8();

        if c == '\n' {
            self.pos.line += 1;
            self.pos.col = 1;
        } else {
            self.pos.col += 1;
        }

        Some(c)
    }
}
