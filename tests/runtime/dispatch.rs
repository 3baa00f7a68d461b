//! Integration tests for statement dispatch
//!
//! Tests overload resolution through the interpreter, modes, handler blocks,
//! and diagnostics.

use std::cell::RefCell;
use std::rc::Rc;

use tessera_foundation::{Error, ErrorKind, Value};
use tessera_runtime::{Interpreter, InterpreterOptions};

use crate::record;

const TILE: &str = "(int x, int y, string name = \"default\")";

// =============================================================================
// Overload Resolution
// =============================================================================

#[test]
fn tile_with_default_name() {
    let mut interp = Interpreter::default();
    let calls = record(&mut interp, "Tile", &[TILE]);
    interp.run_source("tiles.ts", "Tile 3, 5;").unwrap();
    assert_eq!(*calls.borrow(), ["(x: 3, y: 5, name: \"default\")"]);
}

#[test]
fn tile_with_explicit_name() {
    let mut interp = Interpreter::default();
    let calls = record(&mut interp, "Tile", &[TILE]);
    interp.run_source("tiles.ts", "Tile 3, 5, \"torch\";").unwrap();
    assert_eq!(*calls.borrow(), ["(x: 3, y: 5, name: \"torch\")"]);
}

#[test]
fn tile_with_too_few_arguments_reports_every_form() {
    let mut interp = Interpreter::default();
    let calls = record(&mut interp, "Tile", &[TILE, "(string name, (int x, int y) at)"]);
    let err = interp.run_source("tiles.ts", "Tile 3;").unwrap_err();
    assert!(calls.borrow().is_empty());
    let ErrorKind::NoMatchingOverload { signatures, .. } = &err.kind else {
        panic!("expected overload failure, got {err:?}");
    };
    assert_eq!(signatures.len(), 2);
    let report = err.report();
    assert!(report.contains("Tile (int x, int y, string name = \"default\")"));
    assert!(report.contains("Tile (string name, (int x, int y) at)"));
    assert!(report.starts_with("tiles.ts:1:1\nTile 3;\n^\n"));
}

#[test]
fn first_matching_overload_wins() {
    let mut interp = Interpreter::default();
    let hits: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let (a, b) = (Rc::clone(&hits), Rc::clone(&hits));
    interp
        .register_command("Set", &[], &["(int v)"], move |_, _| {
            a.borrow_mut().push("int");
            Ok(())
        })
        .unwrap();
    interp
        .register_command("Set", &[], &["(string v)"], move |_, _| {
            b.borrow_mut().push("string");
            Ok(())
        })
        .unwrap();
    interp
        .run_source("s.ts", "Set \"5\"; Set five; Set 6;")
        .unwrap();
    assert_eq!(*hits.borrow(), ["int", "string", "int"]);
}

#[test]
fn resolved_arguments_are_typed() {
    let mut interp = Interpreter::default();
    let seen: Rc<RefCell<Option<Value>>> = Rc::default();
    let sink = Rc::clone(&seen);
    interp
        .register_command("Sound", &[], &["(string file, float volume = 1, bool loop = false)"], move |_, args| {
            *sink.borrow_mut() = Some(args.clone());
            Ok(())
        })
        .unwrap();
    interp.run_source("s.ts", "sound \"step.wav\" loop: TRUE;").unwrap();
    let args = seen.borrow().clone().unwrap();
    assert_eq!(args.get_named("volume").and_then(Value::as_float), Some(1.0));
    assert_eq!(args.get_named("loop").and_then(Value::as_bool), Some(true));
}

#[test]
fn unknown_command() {
    let mut interp = Interpreter::default();
    let err = interp.run_source("x.ts", "Tiel 1 2;").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownCommand { .. }));
    assert!(err.report().contains("`Tiel` is not a valid command"));
}

#[test]
fn first_error_aborts_the_script() {
    let mut interp = Interpreter::default();
    let calls = record(&mut interp, "Tile", &[TILE]);
    assert!(interp.run_source("x.ts", "Tile 1 2;\nTile x;\nTile 3 4;").is_err());
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn syntax_errors_point_at_character() {
    let mut interp = Interpreter::default();
    record(&mut interp, "Tile", &[TILE]);
    let err = interp.run_source("x.ts", "Tile 1 2;\n\tTile 3 & 4;").unwrap_err();
    assert_eq!(err.report().lines().take(3).collect::<Vec<_>>(), [
        "x.ts:2:9",
        "\tTile 3 & 4;",
        "\t       ^",
    ]);
}

#[test]
fn runaway_nesting_is_a_syntax_error() {
    let mut interp = Interpreter::default();
    let calls = record(&mut interp, "Tile", &["(any v)"]);
    let script = format!("Tile {}1{};", "(".repeat(100_000), ")".repeat(100_000));
    let err = interp.run_source("deep.ts", &script).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Syntax { .. }));
    assert!(err.to_string().contains("nested deeper than"));
    assert!(calls.borrow().is_empty());
    assert!(interp.script_stack().is_empty());
}

// =============================================================================
// Modes
// =============================================================================

#[test]
fn commands_are_filtered_by_mode() {
    let mut interp = Interpreter::default();
    interp
        .register_command("Frame", &[1, 2], &["(int ms)"], |_, _| Ok(()))
        .unwrap();
    assert!(interp.run_source_in_mode("a.ts", "Frame 10;", 2).is_ok());
    let err = interp.run_source_in_mode("a.ts", "Frame 10;", 3).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::WrongMode { mode: 3, .. }));
}

#[test]
fn initial_mode_comes_from_options() {
    let mut interp = Interpreter::new(InterpreterOptions::new().with_initial_mode(7));
    interp
        .register_command("Only7", &[7], &[], |ctx, _| {
            assert_eq!(ctx.mode(), 7);
            Ok(())
        })
        .unwrap();
    interp.run_source("a.ts", "Only7;").unwrap();
}

// =============================================================================
// Handler Blocks
// =============================================================================

#[test]
fn handler_reads_block_until_end() {
    let mut interp = Interpreter::default();
    let grid: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&grid);
    interp
        .register_command("Collision", &[], &["(int width)"], move |ctx, _| {
            *sink.borrow_mut() = ctx.read_block()?;
            Ok(())
        })
        .unwrap();
    let calls = record(&mut interp, "Tile", &[TILE]);

    let script = "Collision 4; Tile 9 9;\n#..#\n#  #\nEnd;\nTile 1 1;\n";
    interp.run_source("c.ts", script).unwrap();
    assert_eq!(*grid.borrow(), ["#..#", "#  #"]);
    assert_eq!(*calls.borrow(), ["(x: 1, y: 1, name: \"default\")"]);
}

#[test]
fn block_without_end_is_an_error() {
    let mut interp = Interpreter::default();
    interp
        .register_command("Collision", &[], &[], |ctx, _| ctx.read_block().map(|_| ()))
        .unwrap();
    let err = interp.run_source("c.ts", "Collision;\n####\n").unwrap_err();
    assert!(err.to_string().contains("END;"));
    assert_eq!(err.context.unwrap().line, Some(1));
}

#[test]
fn custom_block_terminator() {
    let mut interp = Interpreter::new(InterpreterOptions::new().with_block_terminator("DONE"));
    interp
        .register_command("Text", &[], &[], |ctx, _| {
            let lines = ctx.read_block()?;
            ctx.resources_mut().set("text", lines.join("\n"));
            Ok(())
        })
        .unwrap();
    interp.run_source("t.ts", "Text;\nhello\nworld\n done \n").unwrap();
    assert_eq!(interp.resources().get::<String>("text").unwrap(), "hello\nworld");
}

#[test]
fn next_line_skips_rest_of_triggering_line() {
    let mut interp = Interpreter::default();
    interp
        .register_command("Header", &[], &[], |ctx, _| {
            let line = ctx.next_line().ok_or_else(|| Error::handler("missing header"))?;
            ctx.resources_mut().set("header", line);
            Ok(())
        })
        .unwrap();
    let calls = record(&mut interp, "Tile", &[TILE]);
    interp
        .run_source("h.ts", "Header; Tile 5 5;\nraw text; not parsed\nTile 1 2;")
        .unwrap();
    assert_eq!(
        interp.resources().get::<String>("header").unwrap(),
        "raw text; not parsed"
    );
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn handler_sees_its_location() {
    let mut interp = Interpreter::default();
    interp
        .register_command("Where", &[], &[], |ctx, _| {
            let place = format!(
                "{} {} {}",
                ctx.current_file().display(),
                ctx.position(),
                ctx.command()
            );
            ctx.resources_mut().set("where", place);
            Ok(())
        })
        .unwrap();
    interp.run_source("w.ts", "\n   where;").unwrap();
    assert_eq!(interp.resources().get::<String>("where").unwrap(), "w.ts 2:4 where");
}
