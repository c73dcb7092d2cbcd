//! Instantiation of template classes.
//!
//! Templates are expanded syntactically: the unprocessed declaration is copied, every
//! occurrence of a type parameter is replaced by the corresponding type argument, and the
//! result goes through the same validation as a class written by hand. Any error in the
//! expanded class is therefore reported as an ordinary field, method or type error.

use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::analysis::catalog::{ClassBuilder, ClassDef};
use crate::analysis::error::{SemaError, SemaResult};
use crate::position::HasPosition;
use crate::syntax::{Atom, Keyword, Sexpr, VisitorMut};
use crate::util::{is_compound, join_compound, split_compound};

/// A table mapping type parameter names to the type names substituted for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    params: IndexMap<String, String>,
}

impl Substitution {
    /// Pairs up `params` with `args` positionally.
    ///
    /// Returns `None` if the counts differ.
    pub fn new<P, A>(params: &[P], args: &[A]) -> Option<Self>
    where
        P: AsRef<str>,
        A: AsRef<str>,
    {
        if params.len() != args.len() {
            return None;
        }

        let params = params
            .iter()
            .zip(args)
            .map(|(param, arg)| (param.as_ref().to_owned(), arg.as_ref().to_owned()))
            .collect();

        Some(Self { params })
    }

    /// Returns the replacement for a single token, or `None` if it stays as is.
    ///
    /// Compound type names like `node@T` are rewritten component-wise.
    pub fn substitute(&self, token: &str) -> Option<String> {
        if let Some(arg) = self.params.get(token) {
            return Some(arg.clone());
        }

        if !is_compound(token) {
            return None;
        }

        let (base, args) = split_compound(token);
        let parts = std::iter::once(base)
            .chain(args)
            .map(|part| self.params.get(part).map_or(part, String::as_str));

        Some(join_compound(parts))
    }

    /// Rewrites every leaf of `tree` in place.
    pub fn apply(&self, tree: &mut Sexpr) {
        Rewriter(self).visit_sexpr(tree);
    }
}

struct Rewriter<'a>(&'a Substitution);

impl VisitorMut for Rewriter<'_> {
    fn visit_atom(&mut self, atom: &mut Atom) {
        if let Some(replacement) = self.0.substitute(&atom.text) {
            trace!(from = %atom.text, to = %replacement, "substituting");
            atom.text = replacement;
        }
    }
}

/// Produces a fresh concrete class from `template` for the instantiation `type_sig`
/// (`base@arg1@...@argN`).
///
/// Nothing is cached: every call copies, rewrites and validates the declaration anew and
/// returns a distinct definition.
#[instrument(level = "debug", skip(template, builder), fields(template = template.name()))]
pub fn specialize(
    template: &ClassDef,
    type_sig: &str,
    builder: &ClassBuilder<'_>,
) -> SemaResult<ClassDef> {
    let params = template.template_params().ok_or_else(|| {
        SemaError::ty(format!("{} is not a template class", template.name())).at(template.pos())
    })?;

    let (_, args) = split_compound(type_sig);
    let substitution = Substitution::new(params, args.as_slice()).ok_or_else(|| {
        SemaError::ty(format!(
            "invalid class or templated class type {}: {} expects {} type argument(s), got {}",
            type_sig,
            template.name(),
            params.len(),
            args.len(),
        ))
    })?;

    // the template's own declaration is shared and never touched
    let mut decl = Sexpr::clone(template.source());
    let items = decl.as_list_mut().ok_or_else(|| {
        SemaError::syntax("a template declaration must be a list").at(template.pos())
    })?;

    // (tclass name (params...) members...) becomes (class name@args members...)
    let kind_pos = items[0].pos();
    let name_pos = items[1].pos();
    items[0] = Sexpr::atom(Keyword::Class.as_str(), kind_pos);
    items[1] = Sexpr::atom(type_sig, name_pos);
    items.remove(2);

    for member in &mut items[2..] {
        substitution.apply(member);
    }

    debug!(%decl, "expanded the template");

    builder.build(Rc::new(decl))
}
