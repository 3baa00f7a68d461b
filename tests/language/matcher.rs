//! Integration tests for overload resolution
//!
//! Tests matching tokenized statements against compiled signatures.

use tessera_foundation::{Type, Value};
use tessera_language::{Signature, Tokenizer, TypeRegistry, resolve, resolve_first};

fn args(source: &str) -> Value {
    Tokenizer::tokenize(source).unwrap().remove(0).arguments
}

fn sigs(formats: &[&str]) -> Vec<Signature> {
    let mut types = TypeRegistry::new();
    types.register("Color", &["(int r, int g, int b)", "(string hex)"]).unwrap();
    formats.iter().flat_map(|f| types.parse(f).unwrap()).collect()
}

#[test]
fn tile_example() {
    let overloads = sigs(&["(int x, int y, string name = \"default\")"]);
    let tile = &overloads[0];
    assert_eq!(
        resolve(tile, &args("Tile 3, 5;")).unwrap().to_string(),
        "(x: 3, y: 5, name: \"default\")"
    );
    assert_eq!(
        resolve(tile, &args("Tile 3, 5, \"torch\";")).unwrap().to_string(),
        "(x: 3, y: 5, name: \"torch\")"
    );
    assert!(resolve(tile, &args("Tile 3;")).is_none());
}

#[test]
fn float_parameters_need_finite_numbers() {
    let overloads = sigs(&["(float v)"]);
    let scale = &overloads[0];
    assert!(resolve(scale, &args("Scale 2.5;")).is_some());
    assert!(resolve(scale, &args("Scale -3;")).is_some());
    for word in ["inf", "NaN", "infinity", "1e999"] {
        assert!(resolve(scale, &args(&format!("Scale {word};"))).is_none(), "{word}");
    }
}

#[test]
fn default_propagation() {
    let overloads = sigs(&["(int x, int y = 5)"]);
    let resolved = resolve(&overloads[0], &args("P 3;")).unwrap();
    assert_eq!(resolved.to_string(), "(x: 3, y: 5)");
    assert!(resolve(&overloads[0], &args("P;")).is_none());
    assert!(resolve(&overloads[0], &args("P 1 2 3;")).is_none());
}

#[test]
fn overload_order_matters() {
    let overloads = sigs(&["(int x)", "(string x)"]);
    let (index, resolved) = resolve_first(&overloads, &args("P \"5\";")).unwrap();
    assert_eq!(index, 0);
    assert_eq!(resolved.get(0).unwrap().kind(), &Type::Int);
}

#[test]
fn named_type_overloads_resolve_in_order() {
    let overloads = sigs(&["(Color c)"]);
    assert_eq!(overloads.len(), 2);
    let (index, _) = resolve_first(&overloads, &args("Fill (1 2 3);")).unwrap();
    assert_eq!(index, 0);
    let (index, resolved) = resolve_first(&overloads, &args("Fill (\"ff0000\");")).unwrap();
    assert_eq!(index, 1);
    assert_eq!(resolved.to_string(), "(c: (hex: \"ff0000\"))");
}

#[test]
fn named_arguments_in_any_order() {
    let overloads = sigs(&["(int x, int y, string name = \"default\")"]);
    let resolved = resolve(&overloads[0], &args("Tile name: \"lamp\" y: 2 x: 1;")).unwrap();
    assert_eq!(resolved.to_string(), "(x: 1, y: 2, name: \"lamp\")");
}

#[test]
fn resolving_twice_is_equal() {
    let overloads = sigs(&["((int x, int y) at, any tag = none)"]);
    let call = args("Mark (1 2);");
    assert_eq!(resolve(&overloads[0], &call), resolve(&overloads[0], &call));
}
