use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::analysis::ty::{is_primitive, Type, BOOL_TYPE, INT_TYPE, NULL_TYPE, STRING_TYPE};
use crate::util::{is_compound, split_compound};

/// Every type a program can name: the built-in ones and one per declared class.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: IndexMap<String, Type>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let types = [INT_TYPE, STRING_TYPE, BOOL_TYPE, NULL_TYPE]
            .into_iter()
            .map(|name| (name.to_owned(), Type::new(name)))
            .collect();

        Self { types }
    }

    /// Adds a class type, returning the type previously registered under the same name.
    ///
    /// Every class has to be registered before any class body is checked so that bodies
    /// may refer to classes declared later (or to their own class).
    pub fn register(
        &mut self,
        name: impl Into<String>,
        supertype_name: Option<String>,
        arity: usize,
    ) -> Option<Type> {
        let name = name.into();
        debug!(%name, ?supertype_name, arity, "registering a class type");

        self.types
            .insert(name.clone(), Type::with_supertype(name, supertype_name, arity))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }

    pub fn is_valid_type(&self, name: &str) -> bool {
        if is_compound(name) {
            let (base, args) = split_compound(name);

            // the head of an instantiation must be a class, never a primitive
            if is_primitive(base) {
                return false;
            }

            return match self.types.get(base) {
                Some(ty) if ty.arity() == args.len() => {
                    args.into_iter().all(|arg| self.is_valid_type(arg))
                }
                _ => false,
            };
        }

        // a template class is never valid without its type arguments
        matches!(self.types.get(name), Some(ty) if ty.arity() == 0)
    }

    /// Returns the registered type for a valid, non-compound `name`.
    pub fn get_type_info(&self, name: &str) -> Option<&Type> {
        if !self.is_valid_type(name) {
            return None;
        }

        self.types.get(name)
    }

    /// Checks whether `sub_candidate` is `super_candidate` or one of its descendants.
    ///
    /// Instantiations of templates are never related to anything by subtyping.
    pub fn is_a_subtype(&self, super_candidate: &str, sub_candidate: &str) -> bool {
        if !self.is_valid_type(super_candidate) || !self.is_valid_type(sub_candidate) {
            return false;
        }

        if is_compound(super_candidate) || is_compound(sub_candidate) {
            return false;
        }

        let mut visited = HashSet::new();
        let mut current = sub_candidate;

        loop {
            trace!(super_candidate, current, "walking the superclass chain");

            if current == super_candidate {
                return true;
            }

            if !visited.insert(current) {
                return false;
            }

            match self.get_type_info(current).and_then(Type::supertype_name) {
                Some(supertype_name) => current = supertype_name,
                None => return false,
            }
        }
    }

    /// Decides whether a value of type `b` may be used where `a` is expected.
    ///
    /// With `for_assignment` unset the check is symmetric with respect to subtyping, as
    /// needed by comparisons.
    pub fn check_type_compatibility(&self, a: &Type, b: &Type, for_assignment: bool) -> bool {
        if !self.is_valid_type(a.name()) || !self.is_valid_type(b.name()) {
            return false;
        }

        if self.is_a_subtype(a.name(), b.name()) {
            return true;
        }

        if !for_assignment && self.is_a_subtype(b.name(), a.name()) {
            return true;
        }

        if a == b {
            return true;
        }

        if a.is_primitive() || b.is_primitive() {
            return false;
        }

        // both are class types (or null) from here on
        a.name() == NULL_TYPE || b.name() == NULL_TYPE
    }
}
