//! Integration tests for the resource table
//!
//! Tests typed storage through handlers and all-or-nothing top-level loads.

use std::rc::Rc;

use tessera_foundation::{ErrorKind, Value};
use tessera_runtime::{Interpreter, Resources};

use crate::ScriptDir;

#[derive(Debug, PartialEq)]
struct Tile {
    x: i64,
    y: i64,
    name: String,
}

fn tile_interpreter() -> Interpreter {
    let mut interp = Interpreter::default();
    interp
        .register_command(
            "Tile",
            &[],
            &["(string id, int x, int y, string name = \"default\")"],
            |ctx, args| {
                let text = |n: &str| args.get_named(n).and_then(Value::as_str).unwrap_or_default();
                let int = |n: &str| args.get_named(n).and_then(Value::as_int).unwrap_or_default();
                let id = text("id").to_string();
                let tile = Tile {
                    x: int("x"),
                    y: int("y"),
                    name: text("name").to_string(),
                };
                ctx.resources_mut().add(&id, tile)
            },
        )
        .unwrap();
    interp
}

// =============================================================================
// Typed Storage
// =============================================================================

#[test]
fn handlers_store_typed_resources() {
    let mut interp = tile_interpreter();
    interp
        .run_source("t.ts", "Tile grass 0 0; Tile torch 3 5 \"torch\";")
        .unwrap();
    let torch = interp.resources().get::<Tile>("torch").unwrap();
    assert_eq!(
        torch,
        &Tile {
            x: 3,
            y: 5,
            name: "torch".to_string()
        }
    );
    assert_eq!(interp.resources().names(), ["grass", "torch"]);
    let shared: Rc<Tile> = interp.resources().get_rc("grass").unwrap();
    assert_eq!(shared.name, "default");
}

#[test]
fn wrong_type_is_reported() {
    let mut interp = tile_interpreter();
    interp.run_source("t.ts", "Tile grass 0 0;").unwrap();
    let err = interp.resources().get::<String>("grass").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ResourceType { .. }));
}

#[test]
fn duplicate_resource_is_located() {
    let mut interp = tile_interpreter();
    let err = interp
        .run_source("t.ts", "Tile grass 0 0;\nTile grass 1 1;")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DuplicateResource { .. }));
    assert!(err.report().starts_with("t.ts:2:1\n"));
}

// =============================================================================
// Rollback
// =============================================================================

#[test]
fn failed_run_leaves_table_untouched() {
    let mut interp = tile_interpreter();
    interp.run_source("a.ts", "Tile grass 0 0;").unwrap();
    assert!(
        interp
            .run_source("b.ts", "Tile water 1 1;\nTile lava;")
            .is_err()
    );
    assert_eq!(interp.resources().names(), ["grass"]);
}

#[test]
fn failed_nested_load_rolls_back_parent_too() {
    let dir = ScriptDir::new("rollback-nested");
    let main = dir.write("main.ts", "Tile a 0 0;\nLOAD \"child.ts\";");
    dir.write("child.ts", "Tile b 1 1;\nTile a 2 2;");
    let mut interp = tile_interpreter();
    assert!(interp.read_script(&main, 0).is_err());
    assert!(interp.resources().is_empty());
}

#[test]
fn host_can_seed_resources() {
    let mut interp = tile_interpreter();
    interp.resources_mut().set("palette", vec![0x20_u8, 0x40]);
    interp.run_source("t.ts", "Tile grass 0 0;").unwrap();
    assert_eq!(interp.resources().len(), 2);
    assert!(!Resources::default().contains("palette"));
}
