use paste::paste;
use pretty_assertions::assert_eq;

use classy::analysis::{create_default_value, create_value, Raw, Type, TypeRegistry, Value};

fn zoo() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.register("animal", None, 0);
    registry.register("dog", Some("animal".into()), 0);
    registry.register("puppy", Some("dog".into()), 0);
    registry.register("rock", None, 0);
    registry.register("list", None, 1);
    registry.register("map", None, 2);

    registry
}

#[test]
fn test_builtin_types() {
    let registry = TypeRegistry::new();

    for name in ["int", "string", "bool", "null"] {
        assert!(registry.is_valid_type(name), "{} must be valid", name);
    }

    assert!(!registry.is_valid_type("nothing"));
    assert!(!registry.is_valid_type("void"));
    for name in ["int", "string", "bool", "null"] {
        let instantiation = format!("{}@int", name);
        assert!(!registry.is_valid_type(&instantiation), "{} must be invalid", instantiation);
    }
}

#[test]
fn test_generic_arity() {
    let registry = zoo();

    assert!(!registry.is_valid_type("list"));
    assert!(registry.is_valid_type("list@int"));
    assert!(registry.is_valid_type("list@dog"));
    assert!(!registry.is_valid_type("list@int@int"));
    assert!(!registry.is_valid_type("list@widget"));
    assert!(!registry.is_valid_type("list@list"));
    assert!(registry.is_valid_type("map@string@animal"));
    assert!(!registry.is_valid_type("map@string"));
    assert!(!registry.is_valid_type("dog@int"));
}

#[test]
fn test_register_returns_previous() {
    let mut registry = TypeRegistry::new();

    assert_eq!(registry.register("a", None, 0), None);
    assert_eq!(registry.register("a", None, 0), Some(Type::new("a")));
    assert!(registry.contains("a"));
}

#[test]
fn test_get_type_info() {
    let registry = zoo();

    let dog = registry.get_type_info("dog").unwrap();
    assert_eq!(dog.name(), "dog");
    assert_eq!(dog.supertype_name(), Some("animal"));
    assert_eq!(dog.arity(), 0);

    assert_eq!(registry.get_type_info("list"), None);
    assert_eq!(registry.get_type_info("widget"), None);
}

#[test]
fn test_subtype_reflexive() {
    let registry = zoo();

    for name in ["int", "string", "bool", "null", "animal", "dog", "rock"] {
        assert!(registry.is_a_subtype(name, name), "{} must be a subtype of itself", name);
    }
}

#[test]
fn test_subtype_transitive() {
    let registry = zoo();

    assert!(registry.is_a_subtype("animal", "dog"));
    assert!(registry.is_a_subtype("dog", "puppy"));
    assert!(registry.is_a_subtype("animal", "puppy"));

    assert!(!registry.is_a_subtype("puppy", "animal"));
    assert!(!registry.is_a_subtype("rock", "dog"));
    assert!(!registry.is_a_subtype("animal", "widget"));
}

#[test]
fn test_subtype_never_relates_instantiations() {
    let registry = zoo();

    assert!(!registry.is_a_subtype("list@int", "list@int"));
    assert!(!registry.is_a_subtype("list@animal", "list@dog"));
}

#[test]
fn test_subtype_cycle_terminates() {
    let mut registry = TypeRegistry::new();
    registry.register("a", Some("b".into()), 0);
    registry.register("b", Some("a".into()), 0);
    registry.register("c", None, 0);

    assert!(registry.is_a_subtype("a", "b"));
    assert!(!registry.is_a_subtype("c", "a"));
}

#[test]
fn test_type_equality_ignores_arity() {
    assert_eq!(Type::with_supertype("list", None, 1), Type::new("list"));
    assert_ne!(
        Type::with_supertype("dog", Some("animal".into()), 0),
        Type::new("dog"),
    );
}

macro_rules! compatibility_tests {
    { $( $name:ident: ($a:literal, $b:literal, $for_assignment:literal) => $expected:literal ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< test_compatibility_ $name >]() {
                    let registry = zoo();

                    assert_eq!(
                        registry.check_type_compatibility(
                            &Type::new($a),
                            &Type::new($b),
                            $for_assignment,
                        ),
                        $expected,
                    );
                }
            }
        )+
    };
}

compatibility_tests! {
    same_primitive: ("int", "int", true) => true,
    different_primitives: ("int", "string", false) => false,
    widening: ("animal", "dog", true) => true,
    widening_twice: ("animal", "puppy", true) => true,
    narrowing_assignment: ("dog", "animal", true) => false,
    narrowing_comparison: ("dog", "animal", false) => true,
    unrelated_classes: ("dog", "rock", false) => false,
    null_to_class: ("animal", "null", true) => true,
    class_to_null: ("null", "animal", true) => true,
    null_to_int: ("int", "null", true) => false,
    int_to_null: ("null", "int", false) => false,
    null_to_null: ("null", "null", true) => true,
    same_instantiation: ("list@int", "list@int", true) => true,
    different_instantiations: ("list@int", "list@string", false) => false,
    null_to_instantiation: ("list@int", "null", true) => true,
    unknown_type: ("widget", "widget", true) => false,
    raw_template: ("list", "null", true) => false,
    nothing: ("nothing", "nothing", true) => false,
}

#[test]
fn test_create_value() {
    assert_eq!(
        create_value("true"),
        Some(Value::new(Type::new("bool"), Some(Raw::Bool(true)))),
    );
    assert_eq!(
        create_value("false"),
        Some(Value::new(Type::new("bool"), Some(Raw::Bool(false)))),
    );
    assert_eq!(
        create_value("\"hello world\""),
        Some(Value::new(Type::new("string"), Some(Raw::Str("hello world".into())))),
    );
    assert_eq!(
        create_value("42"),
        Some(Value::new(Type::new("int"), Some(Raw::Int(42)))),
    );
    assert_eq!(
        create_value("-42"),
        Some(Value::new(Type::new("int"), Some(Raw::Int(-42)))),
    );
    assert_eq!(create_value("null"), Some(Value::new(Type::new("null"), None)));
}

#[test]
fn test_create_value_malformed() {
    for token in ["", "-", "--1", "4a", "+1", "1.5", "True", "abc", "99999999999999999999"] {
        assert_eq!(create_value(token), None, "{:?} must not be a literal", token);
    }
}

#[test]
fn test_create_value_strips_every_quote() {
    let value = create_value("\"\"quoted\"\"").unwrap();

    assert_eq!(value.raw(), Some(&Raw::Str("quoted".into())));
}

#[test]
fn test_default_values() {
    assert_eq!(create_default_value(&Type::new("int")).raw(), Some(&Raw::Int(0)));
    assert_eq!(create_default_value(&Type::new("bool")).raw(), Some(&Raw::Bool(false)));
    assert_eq!(create_default_value(&Type::new("string")).raw(), Some(&Raw::Str(String::new())));

    let nothing = create_default_value(&Type::nothing());
    assert!(nothing.is_null());
    assert_eq!(nothing.ty().name(), "nothing");

    let dog = create_default_value(&Type::new("dog"));
    assert!(dog.is_null());
    assert_eq!(dog.ty(), &Type::new("dog"));
    assert_eq!(dog.to_string(), "null");
}

#[test]
fn test_default_value_of_class_named_like_primitive() {
    // equality includes the supertype, so this is a class rather than the primitive
    let ty = Type::with_supertype("bool", Some("object".into()), 0);

    assert!(create_default_value(&ty).is_null());
}
