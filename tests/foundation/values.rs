//! Integration tests for the value tree
//!
//! Tests scalar probing, coercion, arrays, and literal rendering.

use tessera_foundation::{Position, Scalar, Type, Value};

fn at(column: u32) -> Position {
    Position::new(1, column)
}

// =============================================================================
// Scalars
// =============================================================================

#[test]
fn bare_words_infer_kind() {
    assert_eq!(Value::scalar("42", at(1)).kind(), &Type::Int);
    assert_eq!(Value::scalar("-0.5", at(1)).kind(), &Type::Float);
    assert_eq!(Value::scalar("False", at(1)).kind(), &Type::Bool);
    assert_eq!(Value::scalar("torch", at(1)).kind(), &Type::String);
}

#[test]
fn quoted_text_is_always_string() {
    let v = Value::string("42", at(1));
    assert_eq!(v.kind(), &Type::String);
    assert!(v.is_valid_type(&Type::Int));
}

#[test]
fn integers_widen_to_float() {
    let v = Value::scalar("7", at(1));
    assert_eq!(v.as_float(), Some(7.0));
    assert!(v.is_valid_type(&Type::Float));
}

#[test]
fn probes_are_independent() {
    let s = Scalar::new("1e3");
    assert!(s.accepts(&Type::Float));
    assert!(!s.accepts(&Type::Bool));
    assert!(!s.accepts(&Type::Int));
    assert!(s.accepts(&Type::Float));
}

#[test]
fn overflowing_integer_is_still_a_float() {
    let v = Value::scalar("99999999999999999999", at(1));
    assert_eq!(v.kind(), &Type::Float);
    assert!(v.as_int().is_none());
}

// =============================================================================
// Coercion
// =============================================================================

#[test]
fn coercion_builds_new_value() {
    let original = Value::scalar("3", at(5)).with_name("x");
    let as_string = original.coerced(&Type::String).unwrap();
    assert_eq!(as_string.kind(), &Type::String);
    assert_eq!(as_string.name(), Some("x"));
    assert_eq!(original.kind(), &Type::Int);
}

#[test]
fn failed_coercion_is_none() {
    assert!(Value::scalar("abc", at(1)).coerced(&Type::Bool).is_none());
    assert!(Value::scalar("1", at(1)).coerced(&Type::Array).is_none());
}

// =============================================================================
// Arrays
// =============================================================================

#[test]
fn arrays_keep_order_and_positions() {
    let arr = Value::array(
        vec![Value::scalar("1", at(2)), Value::scalar("2", at(5))],
        at(1),
    );
    assert!(arr.is_array());
    assert_eq!(arr.kind(), &Type::Array);
    assert_eq!(arr.len(), 2);
    assert_eq!(arr.get(1).unwrap().position(), at(5));
    assert!(arr.get(2).is_none());
}

#[test]
fn nested_display() {
    let arr = Value::array(
        vec![
            Value::array(vec![Value::scalar("1", at(3)), Value::scalar("2", at(5))], at(2))
                .with_name("origin"),
            Value::string("hero", at(9)).with_name("name"),
        ],
        at(1),
    );
    assert_eq!(arr.to_string(), "(origin: (1, 2), name: \"hero\")");
    assert_eq!(arr.get(0).unwrap().literal(), "(1, 2)");
}

#[test]
fn into_children_consumes() {
    let arr = Value::array(vec![Value::scalar("a", at(1))], at(1));
    let children = arr.into_children().unwrap();
    assert_eq!(children.len(), 1);
    assert!(Value::scalar("a", at(1)).into_children().is_none());
}
