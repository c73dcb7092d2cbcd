use std::rc::Rc;

use elsa::FrozenMap;
use tracing::{debug, info, instrument};

use crate::analysis::catalog::{parse_template_params, ClassBuilder, ClassDef, ClassIndex};
use crate::analysis::error::{SemaError, SemaResult};
use crate::analysis::registry::TypeRegistry;
use crate::analysis::specialize::specialize;
use crate::analysis::ty::{Type, NOTHING_TYPE};
use crate::position::{HasPosition, Position};
use crate::syntax::{Keyword, Sexpr};
use crate::util::{is_compound, split_compound};

/// Extracts `(name, superclass, arity)` from a top-level declaration without looking at
/// its members.
fn declared_type(decl: &Sexpr) -> SemaResult<(&str, Option<&str>, usize)> {
    let pos = decl.pos();

    let items = decl
        .as_list()
        .ok_or_else(|| SemaError::syntax(format!("expected a class declaration, found `{}`", decl)).at(pos))?;

    let name = match items.get(1).and_then(Sexpr::as_atom) {
        Some(name) => name,
        None => return Err(SemaError::syntax("expected a class name").at(pos)),
    };

    match items[0].keyword() {
        Some(Keyword::Class) => {
            let superclass = match items.get(2) {
                Some(inherits) if inherits.is_keyword(Keyword::Inherits) => {
                    match items.get(3).and_then(Sexpr::as_atom) {
                        Some(superclass) => Some(superclass),
                        None => return Err(SemaError::syntax("the superclass name is missing").at(pos)),
                    }
                }

                _ => None,
            };

            Ok((name, superclass, 0))
        }

        Some(Keyword::TemplateClass) => {
            let params = items.get(2).ok_or_else(|| {
                SemaError::syntax("a template class must list its type parameters").at(pos)
            })?;

            Ok((name, None, parse_template_params(params)?.len()))
        }

        _ => Err(
            SemaError::syntax(format!("expected a class declaration, found `{}`", items[0]))
                .at(items[0].pos()),
        ),
    }
}

/// Every class of a program, checked and ready to be instantiated.
///
/// Construction happens in two passes: the first registers the name, superclass and
/// arity of every class, the second builds class bodies in program order. Class bodies can
/// thus mention any class of the program in their types, while superclasses must be
/// declared before the classes inheriting from them.
#[derive(Debug, Clone)]
pub struct Definitions {
    registry: TypeRegistry,
    classes: ClassIndex,
}

impl Definitions {
    #[instrument(level = "debug", skip_all, fields(decls = program.len()))]
    pub fn from_program(program: Vec<Sexpr>) -> SemaResult<Self> {
        let program = program.into_iter().map(Rc::new).collect::<Vec<_>>();
        let registry = Self::register_types(&program)?;
        let classes = Self::build_classes(&registry, &program)?;

        info!(classes = classes.len(), "all classes defined");

        Ok(Self { registry, classes })
    }

    fn register_types(program: &[Rc<Sexpr>]) -> SemaResult<TypeRegistry> {
        let mut registry = TypeRegistry::new();

        for decl in program {
            let (name, superclass, arity) = declared_type(decl)?;

            if is_compound(name) {
                return Err(SemaError::name(format!(
                    "class name {} must not contain a type delimiter",
                    name
                ))
                .at(decl.pos()));
            }

            if name == NOTHING_TYPE || registry.contains(name) {
                return Err(SemaError::name(format!("duplicate class name {}", name)).at(decl.pos()));
            }

            registry.register(name, superclass.map(str::to_owned), arity);
        }

        Ok(registry)
    }

    fn build_classes(registry: &TypeRegistry, program: &[Rc<Sexpr>]) -> SemaResult<ClassIndex> {
        let mut classes = ClassIndex::new();

        for decl in program {
            let class = ClassBuilder::new(registry, &classes).build(decl.clone())?;
            debug!(class = class.name(), template = class.is_template(), "defined a class");

            classes.insert(class.name().to_owned(), Rc::new(class));
        }

        Ok(classes)
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn classes(&self) -> impl Iterator<Item = &Rc<ClassDef>> {
        self.classes.values()
    }

    /// Looks up a declared class (or template) by its plain name.
    pub fn get_class_def(&self, name: &str, pos: Position) -> SemaResult<&Rc<ClassDef>> {
        self.classes
            .get(name)
            .ok_or_else(|| SemaError::name(format!("no class named {} found", name)).at(pos))
    }

    /// Returns the class definition for a type name such as `person` or `list@int`.
    ///
    /// Instantiations of templates are specialized anew on every call.
    pub fn resolve_class(&self, type_name: &str, pos: Position) -> SemaResult<Rc<ClassDef>> {
        let invalid = || {
            SemaError::ty(format!("invalid class or templated class type {}", type_name)).at(pos)
        };

        if !self.registry.is_valid_type(type_name) {
            return Err(invalid());
        }

        let (base, _) = split_compound(type_name);
        let class = self.classes.get(base).ok_or_else(invalid)?;

        if !class.is_template() {
            return Ok(class.clone());
        }

        let builder = ClassBuilder::new(&self.registry, &self.classes);

        specialize(class, type_name, &builder)
            .map(Rc::new)
            .map_err(|e| e.or_at(pos))
    }

    pub fn is_valid_type(&self, name: &str) -> bool {
        self.registry.is_valid_type(name)
    }

    pub fn is_a_subtype(&self, super_candidate: &str, sub_candidate: &str) -> bool {
        self.registry.is_a_subtype(super_candidate, sub_candidate)
    }

    pub fn check_type_compatibility(&self, a: &Type, b: &Type, for_assignment: bool) -> bool {
        self.registry.check_type_compatibility(a, b, for_assignment)
    }
}

/// Remembers one class definition per fully-qualified type name.
///
/// [`Definitions::resolve_class`] never caches; callers that need a stable identity for
/// each instantiation resolve through this instead.
#[derive(Default)]
pub struct InstantiationCache {
    instances: FrozenMap<String, Rc<ClassDef>>,
}

impl InstantiationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, type_name: &str) -> Option<&ClassDef> {
        self.instances.get(type_name)
    }

    pub fn get_or_resolve(
        &self,
        definitions: &Definitions,
        type_name: &str,
        pos: Position,
    ) -> SemaResult<&ClassDef> {
        if let Some(class) = self.instances.get(type_name) {
            return Ok(class);
        }

        let class = definitions.resolve_class(type_name, pos)?;

        Ok(self.instances.insert(type_name.to_owned(), class))
    }
}
