use std::collections::HashSet;
use std::rc::Rc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{instrument, trace};

use crate::analysis::error::{SemaError, SemaResult};
use crate::analysis::registry::TypeRegistry;
use crate::analysis::ty::{create_default_value, create_value, Type, Value};
use crate::position::{HasPosition, Position};
use crate::syntax::{Keyword, Sexpr};

/// Class definitions that have been built so far, by name.
pub type ClassIndex = IndexMap<String, Rc<ClassDef>>;

/// A field or a formal parameter.
///
/// Fields always carry their initial value; parameters never do.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct VariableDef {
    pub ty: Type,
    pub name: String,
    pub value: Option<Value>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<VariableDef>,
    /// The statement the method runs, exactly as it was written.
    pub body: Sexpr,
    pub pos: Position,
}

impl HasPosition for MethodDef {
    fn pos(&self) -> Position {
        self.pos
    }
}

fn serialize_superclass<S>(superclass: &Option<Rc<ClassDef>>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    superclass.as_ref().map(|class| class.name()).serialize(ser)
}

#[derive(Serialize, Debug, Clone)]
pub struct ClassDef {
    name: String,
    fields: IndexMap<String, VariableDef>,
    methods: IndexMap<String, MethodDef>,
    #[serde(serialize_with = "serialize_superclass")]
    superclass: Option<Rc<ClassDef>>,
    template_params: Option<Vec<String>>,
    #[serde(skip)]
    source: Rc<Sexpr>,
    pos: Position,
}

impl ClassDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = &VariableDef> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&VariableDef> {
        self.fields.get(name)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDef> {
        self.methods.values()
    }

    /// Looks up a method defined by this very class.
    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.get(name)
    }

    /// Looks up a method, climbing the superclass chain if this class does not define it.
    ///
    /// Returns the class that defines the method along with the method itself.
    pub fn find_method(&self, name: &str) -> Option<(&ClassDef, &MethodDef)> {
        let mut class = self;

        loop {
            if let Some(method) = class.method(name) {
                return Some((class, method));
            }

            class = class.superclass.as_deref()?;
        }
    }

    pub fn superclass(&self) -> Option<&Rc<ClassDef>> {
        self.superclass.as_ref()
    }

    pub fn template_params(&self) -> Option<&[String]> {
        self.template_params.as_deref()
    }

    pub fn is_template(&self) -> bool {
        self.template_params.is_some()
    }

    /// The declaration this class was built from, before any processing.
    pub fn source(&self) -> &Rc<Sexpr> {
        &self.source
    }
}

impl HasPosition for ClassDef {
    fn pos(&self) -> Position {
        self.pos
    }
}

fn expect_atom<'a>(sexpr: &'a Sexpr, what: &str) -> SemaResult<&'a str> {
    sexpr
        .as_atom()
        .ok_or_else(|| SemaError::syntax(format!("expected {}, found `{}`", what, sexpr)).at(sexpr.pos()))
}

fn expect_list<'a>(sexpr: &'a Sexpr, what: &str) -> SemaResult<&'a [Sexpr]> {
    sexpr
        .as_list()
        .ok_or_else(|| SemaError::syntax(format!("expected {}, found `{}`", what, sexpr)).at(sexpr.pos()))
}

/// Parses the template parameter list of a `tclass` declaration.
pub(super) fn parse_template_params(sexpr: &Sexpr) -> SemaResult<Vec<String>> {
    let params = expect_list(sexpr, "a list of type parameters")?
        .iter()
        .map(|param| expect_atom(param, "a type parameter name").map(str::to_owned))
        .collect::<SemaResult<Vec<_>>>()?;

    if params.is_empty() {
        return Err(
            SemaError::syntax("a template class must declare at least one type parameter")
                .at(sexpr.pos()),
        );
    }

    let mut seen = HashSet::new();

    for param in &params {
        if !seen.insert(param.as_str()) {
            return Err(
                SemaError::name(format!("duplicate type parameter {}", param)).at(sexpr.pos()),
            );
        }
    }

    Ok(params)
}

/// Builds validated class definitions out of raw declarations.
///
/// The registry must already know every class of the program; `classes` holds the
/// definitions built so far, which is where superclasses are looked up.
pub struct ClassBuilder<'a> {
    registry: &'a TypeRegistry,
    classes: &'a ClassIndex,
}

impl<'a> ClassBuilder<'a> {
    pub fn new(registry: &'a TypeRegistry, classes: &'a ClassIndex) -> Self {
        Self { registry, classes }
    }

    /// Parses `(class name [inherits super] members...)` or
    /// `(tclass name (params...) members...)`.
    #[instrument(level = "debug", skip_all, fields(line = decl.line()))]
    pub fn build(&self, decl: Rc<Sexpr>) -> SemaResult<ClassDef> {
        let pos = decl.pos();
        let items = expect_list(&decl, "a class declaration")?;

        let (kind, name) = match items {
            [kind, name, ..] => (kind, expect_atom(name, "a class name")?.to_owned()),
            _ => return Err(SemaError::syntax("the class declaration is incomplete").at(pos)),
        };

        trace!(%name, "building a class");

        let mut class = ClassDef {
            name,
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            superclass: None,
            template_params: None,
            source: decl.clone(),
            pos,
        };

        match kind.keyword() {
            Some(Keyword::TemplateClass) => {
                let params = items.get(2).ok_or_else(|| {
                    SemaError::syntax("a template class must list its type parameters").at(pos)
                })?;

                // a template is a schema: its members are only checked once specialized
                class.template_params = Some(parse_template_params(params)?);

                return Ok(class);
            }

            Some(Keyword::Class) => {}

            _ => {
                return Err(
                    SemaError::syntax(format!("expected a class declaration, found `{}`", kind))
                        .at(kind.pos()),
                )
            }
        }

        let members_start = self.resolve_superclass(&mut class, items)?;
        let members = &items[members_start..];

        for member in members {
            match member.head_keyword() {
                Some(Keyword::Field | Keyword::Method) => {}

                _ => {
                    return Err(SemaError::syntax(format!(
                        "expected a field or a method definition, found `{}`",
                        member
                    ))
                    .at(member.pos()))
                }
            }
        }

        for member in members.iter().filter(|member| member.head_keyword() == Some(Keyword::Field)) {
            self.add_field(&mut class, member)?;
        }

        for member in members.iter().filter(|member| member.head_keyword() == Some(Keyword::Method)) {
            self.add_method(&mut class, member)?;
        }

        Ok(class)
    }

    /// Returns the index members begin at.
    fn resolve_superclass(&self, class: &mut ClassDef, items: &[Sexpr]) -> SemaResult<usize> {
        if !items.get(2).map_or(false, |item| item.is_keyword(Keyword::Inherits)) {
            return Ok(2);
        }

        let superclass_name = match items.get(3) {
            Some(name) => expect_atom(name, "a superclass name")?,
            None => {
                return Err(SemaError::syntax("the superclass name is missing").at(class.pos));
            }
        };

        let superclass = self.classes.get(superclass_name).ok_or_else(|| {
            SemaError::name(format!("no class named {} found", superclass_name)).at(class.pos)
        })?;

        if superclass.is_template() {
            return Err(SemaError::ty(format!(
                "class {} cannot inherit from the template class {}",
                class.name, superclass_name
            ))
            .at(class.pos));
        }

        class.superclass = Some(superclass.clone());

        Ok(4)
    }

    /// `(field type name [initializer])`
    fn add_field(&self, class: &mut ClassDef, member: &Sexpr) -> SemaResult<()> {
        let pos = member.pos();
        trace!(%member, "adding a field");

        let (ty, name, init) = match expect_list(member, "a field definition")? {
            [_, ty, name] => (ty, name, None),
            [_, ty, name, init] => (ty, name, Some(init)),
            _ => return Err(SemaError::syntax(format!("malformed field definition `{}`", member)).at(pos)),
        };

        let name = expect_atom(name, "a field name")?;

        let entry = match class.fields.entry(name.to_owned()) {
            Entry::Occupied(_) => {
                return Err(SemaError::name(format!("duplicate field {}", name)).at(pos));
            }

            Entry::Vacant(entry) => entry,
        };

        let ty = Type::new(expect_atom(ty, "a field type")?);
        let value = match init {
            None => Some(create_default_value(&ty)),
            Some(init) => create_value(expect_atom(init, "a literal initializer")?),
        };

        let value = match value {
            Some(value) if self.registry.check_type_compatibility(&ty, value.ty(), true) => value,

            _ => {
                return Err(
                    SemaError::ty(format!("invalid type/type mismatch with field {}", name)).at(pos),
                );
            }
        };

        entry.insert(VariableDef {
            ty,
            name: name.to_owned(),
            value: Some(value),
        });

        Ok(())
    }

    /// `(method return_type name ((type name)...) body)`
    fn add_method(&self, class: &mut ClassDef, member: &Sexpr) -> SemaResult<()> {
        let pos = member.pos();
        trace!(%member, "adding a method");

        let (return_type, name, params, body) = match expect_list(member, "a method definition")? {
            [_, return_type, name, params, body] => (return_type, name, params, body),
            _ => return Err(SemaError::syntax(format!("malformed method definition `{}`", member)).at(pos)),
        };

        let name = expect_atom(name, "a method name")?;

        if class.methods.contains_key(name) {
            return Err(SemaError::name(format!("duplicate method {}", name)).at(pos));
        }

        let return_type = match expect_atom(return_type, "a return type")? {
            void if Keyword::parse(void) == Some(Keyword::Void) => Type::nothing(),
            return_type => Type::new(return_type),
        };

        if !self.registry.is_valid_type(return_type.name()) && return_type != Type::nothing() {
            return Err(SemaError::ty(format!("invalid return type for method {}", name)).at(pos));
        }

        let mut param_names = HashSet::new();
        let mut formal_params = vec![];

        for param in expect_list(params, "a list of formal parameters")? {
            let (param_ty, param_name) = match expect_list(param, "a formal parameter")? {
                [ty, name] => (
                    expect_atom(ty, "a parameter type")?,
                    expect_atom(name, "a parameter name")?,
                ),
                _ => {
                    return Err(SemaError::syntax(format!(
                        "malformed formal parameter `{}`",
                        param
                    ))
                    .at(param.pos()))
                }
            };

            if !param_names.insert(param_name) {
                return Err(
                    SemaError::name(format!("duplicate formal parameter {}", param_name)).at(pos),
                );
            }

            if !self.registry.is_valid_type(param_ty) {
                return Err(
                    SemaError::ty(format!("invalid type for parameter {}", param_name)).at(pos),
                );
            }

            formal_params.push(VariableDef {
                ty: Type::new(param_ty),
                name: param_name.to_owned(),
                value: None,
            });
        }

        class.methods.insert(
            name.to_owned(),
            MethodDef {
                name: name.to_owned(),
                return_type,
                params: formal_params,
                body: body.clone(),
                pos,
            },
        );

        Ok(())
    }
}
