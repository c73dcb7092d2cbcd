//! The untyped tree produced by the reader.
//!
//! Declarations, method bodies and template schemas are all kept in this form; the
//! analysis only ever interprets the parts it validates and hands the rest over
//! untouched.

pub mod keyword;
mod visit;

use std::fmt::{self, Display};

use itertools::Itertools;
use serde::Serialize;

use crate::position::{HasPosition, Position};
use crate::try_match;

pub use keyword::Keyword;
pub use visit::VisitorMut;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub text: String,
    pub pos: Position,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub items: Vec<Sexpr>,
    pub pos: Position,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Sexpr {
    Atom(Atom),
    List(List),
}

impl Sexpr {
    pub fn atom(text: impl Into<String>, pos: Position) -> Self {
        Self::Atom(Atom {
            text: text.into(),
            pos,
        })
    }

    pub fn list(items: Vec<Sexpr>, pos: Position) -> Self {
        Self::List(List { items, pos })
    }

    pub fn as_atom(&self) -> Option<&str> {
        try_match!(self, Self::Atom(atom) => atom.text.as_str())
    }

    pub fn as_list(&self) -> Option<&[Sexpr]> {
        try_match!(self, Self::List(list) => list.items.as_slice())
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Sexpr>> {
        try_match!(self, Self::List(list) => &mut list.items)
    }

    /// Returns the keyword this node is, if it's an atom spelling one.
    pub fn keyword(&self) -> Option<Keyword> {
        self.as_atom().and_then(Keyword::parse)
    }

    /// Returns the keyword at the head of a list node.
    pub fn head_keyword(&self) -> Option<Keyword> {
        self.as_list()?.first()?.keyword()
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }
}

impl HasPosition for Sexpr {
    fn pos(&self) -> Position {
        match self {
            Self::Atom(atom) => atom.pos,
            Self::List(list) => list.pos,
        }
    }
}

impl Display for Sexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(atom) => write!(f, "{}", atom.text),
            Self::List(list) => write!(f, "({})", list.items.iter().join(" ")),
        }
    }
}
