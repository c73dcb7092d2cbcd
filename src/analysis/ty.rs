use std::fmt::{self, Display};

use serde::Serialize;

use crate::syntax::Keyword;
use crate::util::is_compound;

pub const INT_TYPE: &str = "int";
pub const STRING_TYPE: &str = "string";
pub const BOOL_TYPE: &str = "bool";
pub const NULL_TYPE: &str = "null";

/// The type of "no value": the return type of `void` methods.
pub const NOTHING_TYPE: &str = "nothing";

pub const PRIMITIVE_TYPES: [&str; 3] = [INT_TYPE, STRING_TYPE, BOOL_TYPE];

pub fn is_primitive(type_name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&type_name)
}

/// A type name, its declared supertype and the number of type parameters it takes.
#[derive(Serialize, Debug, Clone, Eq)]
pub struct Type {
    name: String,
    supertype_name: Option<String>,
    arity: usize,
}

/// Two types are equal when their names and supertypes match.
///
/// The arity takes no part in the comparison: records of the same class that disagree on
/// the number of type parameters still compare equal, and the compatibility rules rely on
/// exactly this comparison.
impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.supertype_name == other.supertype_name
    }
}

impl Type {
    /// A type referenced by name only, such as the declared type of a field.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_supertype(name, None, 0)
    }

    pub fn with_supertype(
        name: impl Into<String>,
        supertype_name: Option<String>,
        arity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            supertype_name,
            arity,
        }
    }

    pub fn nothing() -> Self {
        Self::new(NOTHING_TYPE)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn supertype_name(&self) -> Option<&str> {
        self.supertype_name.as_deref()
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn is_primitive(&self) -> bool {
        is_primitive(&self.name)
    }

    pub fn is_compound(&self) -> bool {
        is_compound(&self.name)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Raw {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{}", value),
            Self::Int(value) => write!(f, "{}", value),
            Self::Str(value) => write!(f, "\"{}\"", value),
        }
    }
}

/// A typed value.
///
/// An absent `raw` tagged with a class type is a null reference to that class; tagged
/// with the `null` type it is the `null` literal.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Value {
    ty: Type,
    raw: Option<Raw>,
}

impl Value {
    pub fn new(ty: Type, raw: Option<Raw>) -> Self {
        Self { ty, raw }
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }

    pub fn raw(&self) -> Option<&Raw> {
        self.raw.as_ref()
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_none()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => write!(f, "{}", raw),
            None => write!(f, "null"),
        }
    }
}

fn is_int_literal(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);

    !digits.is_empty() && digits.bytes().all(|c| c.is_ascii_digit())
}

/// Classifies a literal token.
///
/// Returns `None` for a malformed literal; deciding whether that is an error is up to the
/// caller.
pub fn create_value(token: &str) -> Option<Value> {
    match Keyword::parse(token) {
        Some(Keyword::True) => return Some(Value::new(Type::new(BOOL_TYPE), Some(Raw::Bool(true)))),
        Some(Keyword::False) => {
            return Some(Value::new(Type::new(BOOL_TYPE), Some(Raw::Bool(false))))
        }
        _ => {}
    }

    if token.starts_with('"') {
        let text = token.trim_matches('"').to_owned();

        return Some(Value::new(Type::new(STRING_TYPE), Some(Raw::Str(text))));
    }

    if is_int_literal(token) {
        // out-of-range literals are malformed
        let value = token.parse::<i64>().ok()?;

        return Some(Value::new(Type::new(INT_TYPE), Some(Raw::Int(value))));
    }

    if Keyword::parse(token) == Some(Keyword::Null) {
        return Some(Value::new(Type::new(NULL_TYPE), None));
    }

    None
}

/// The value a field or local of type `ty` holds before anything is assigned to it.
pub fn create_default_value(ty: &Type) -> Value {
    let raw = if *ty == Type::new(BOOL_TYPE) {
        Some(Raw::Bool(false))
    } else if *ty == Type::new(STRING_TYPE) {
        Some(Raw::Str(String::new()))
    } else if *ty == Type::new(INT_TYPE) {
        Some(Raw::Int(0))
    } else {
        // `nothing` and every class type: an absent value tagged with the type itself
        None
    };

    Value::new(ty.clone(), raw)
}
