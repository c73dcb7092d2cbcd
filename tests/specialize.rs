mod common;

use std::ptr;
use std::rc::Rc;

use insta::assert_snapshot;
use pretty_assertions::assert_eq;

use classy::analysis::{
    specialize, ClassBuilder, ClassIndex, ErrorKind, InstantiationCache, Substitution, Type,
};
use classy::position::Position;
use classy::syntax::Keyword;

const NODE: &str = "
(tclass node (T)
  (field T value)
  (field node@T next null)
  (method T get () (return value))
  (method void set ((T v)) (set value v)))

(class main
  (method void main () (print 0)))
";

#[test]
fn test_substitution_arity() {
    assert!(Substitution::new(&["T"], &["int", "bool"]).is_none());
    assert!(Substitution::new(&["K", "V"], &["int", "bool"]).is_some());
}

#[test]
fn test_substitute_tokens() {
    let substitution = Substitution::new(&["K", "V"], &["string", "int"]).unwrap();

    assert_eq!(substitution.substitute("K"), Some("string".to_owned()));
    assert_eq!(substitution.substitute("V"), Some("int".to_owned()));
    assert_eq!(substitution.substitute("map@K@V"), Some("map@string@int".to_owned()));
    assert_eq!(substitution.substitute("x"), None);
    assert_eq!(substitution.substitute("Key"), None);
}

#[test]
fn test_apply_rewrites_nested_leaves() {
    let substitution = Substitution::new(&["T"], &["int"]).unwrap();
    let mut program = common::parse("test.cls", "(method T f ((T a) (node@T b)) (call (new T) T))").unwrap();

    substitution.apply(&mut program[0]);

    assert_eq!(
        program[0].to_string(),
        "(method int f ((int a) (node@int b)) (call (new int) int))",
    );
}

#[test]
fn test_resolve_instantiation() {
    let definitions = common::define_ok(NODE);
    let class = definitions.resolve_class("node@int", Position::default()).unwrap();

    assert_eq!(class.name(), "node@int");
    assert!(!class.is_template());
    assert_eq!(class.template_params(), None);
    assert_eq!(class.superclass().map(|class| class.name().to_owned()), None);

    assert_eq!(class.field("value").unwrap().ty, Type::new("int"));
    assert_eq!(class.field("next").unwrap().ty, Type::new("node@int"));
    assert_eq!(class.method("get").unwrap().return_type, Type::new("int"));
    assert_eq!(class.method("set").unwrap().params[0].ty, Type::new("int"));
    assert_eq!(class.method("set").unwrap().body.to_string(), "(set value v)");

    assert_eq!(common::describe_class(&class), "\
class node@int
  field int value = 0
  field node@int next = null
  method int get()
  method nothing set((int v))
");
}

#[test]
fn test_template_is_left_untouched() {
    let definitions = common::define_ok(NODE);
    definitions.resolve_class("node@string", Position::default()).unwrap();

    let template = definitions.get_class_def("node", Position::default()).unwrap();
    assert!(template.is_template());
    assert_eq!(template.source().head_keyword(), Some(Keyword::TemplateClass));
    assert!(template.fields().next().is_none());
}

#[test]
fn test_instantiation_with_class_argument() {
    let definitions = common::define_ok(&format!("{}\n(class animal)", NODE));
    let class = definitions.resolve_class("node@animal", Position::default()).unwrap();

    let value = class.field("value").unwrap();
    assert_eq!(value.ty, Type::new("animal"));
    assert!(value.value.as_ref().unwrap().is_null());
}

#[test]
fn test_wrong_arity() {
    let definitions = common::define_ok(NODE);
    let err = definitions
        .resolve_class("node@int@bool", Position::default())
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Type);
    assert_snapshot!(err.to_string(), @"type error on line 1: invalid class or templated class type node@int@bool");
}

#[test]
fn test_specialize_checks_arity() {
    let definitions = common::define_ok(NODE);
    let classes = definitions
        .classes()
        .map(|class| (class.name().to_owned(), class.clone()))
        .collect::<ClassIndex>();
    let builder = ClassBuilder::new(definitions.registry(), &classes);
    let template = definitions.get_class_def("node", Position::default()).unwrap();

    let err = specialize(template, "node@int@bool", &builder).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);

    let main = definitions.get_class_def("main", Position::default()).unwrap();
    let err = specialize(main, "main@int", &builder).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);

    let class = specialize(template, "node@bool", &builder).unwrap();
    assert_eq!(class.field("value").unwrap().ty, Type::new("bool"));
}

#[test]
fn test_errors_surface_from_the_expanded_class() {
    let definitions = common::define_ok(
        "(tclass box (T)
           (field T x 5))",
    );

    assert!(definitions.resolve_class("box@int", Position::default()).is_ok());

    let err = definitions
        .resolve_class("box@string", Position { line: 9, ..Default::default() })
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
    assert_snapshot!(err.to_string(), @"type error on line 2: invalid type/type mismatch with field x");
}

#[test]
fn test_resolve_non_class_types() {
    let definitions = common::define_ok(NODE);

    let err = definitions.resolve_class("int", Position::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);

    let err = definitions.resolve_class("node", Position::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);

    let err = definitions.resolve_class("widget@int", Position::default()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Type);
}

#[test]
fn test_resolve_plain_class_returns_the_definition() {
    let definitions = common::define_ok(NODE);

    let first = definitions.resolve_class("main", Position::default()).unwrap();
    let second = definitions.resolve_class("main", Position::default()).unwrap();

    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn test_every_resolution_is_fresh() {
    let definitions = common::define_ok(NODE);

    let first = definitions.resolve_class("node@int", Position::default()).unwrap();
    let second = definitions.resolve_class("node@int", Position::default()).unwrap();

    assert!(!Rc::ptr_eq(&first, &second));
    assert_eq!(common::describe_class(&first), common::describe_class(&second));
}

#[test]
fn test_cache_keeps_one_instance_per_name() {
    let definitions = common::define_ok(NODE);
    let cache = InstantiationCache::new();

    assert!(cache.get("node@int").is_none());

    let first = cache
        .get_or_resolve(&definitions, "node@int", Position::default())
        .unwrap();
    let second = cache
        .get_or_resolve(&definitions, "node@int", Position::default())
        .unwrap();
    let other = cache
        .get_or_resolve(&definitions, "node@bool", Position::default())
        .unwrap();

    assert!(ptr::eq(first, second));
    assert!(!ptr::eq(first, other));
    assert!(ptr::eq(cache.get("node@int").unwrap(), first));
}

#[test]
fn test_cache_does_not_remember_failures() {
    let definitions = common::define_ok(NODE);
    let cache = InstantiationCache::new();

    assert!(cache
        .get_or_resolve(&definitions, "node@widget", Position::default())
        .is_err());
    assert!(cache.get("node@widget").is_none());
}
