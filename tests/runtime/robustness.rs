//! Property tests for the interpreter
//!
//! Arbitrary script text must never panic, and every call must leave the
//! script stack empty and the mode unchanged.

use proptest::prelude::*;
use tessera_runtime::Interpreter;

use crate::record;

fn interpreter() -> Interpreter {
    let mut interp = Interpreter::default();
    record(&mut interp, "Tile", &["(int x, int y, string name = \"default\")"]);
    record(&mut interp, "Path", &["((int x, int y) from, (int x, int y) to)"]);
    interp
        .register_command("Grid", &[], &[], |ctx, _| ctx.read_block().map(|_| ()))
        .unwrap();
    interp
}

fn script_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Tile 1 2;".to_string()),
        Just("Tile 1, 2, \"torch\";".to_string()),
        Just("Path (0 0) (4 4);".to_string()),
        Just("Grid;".to_string()),
        Just("END;".to_string()),
        Just("Tile (1".to_string()),
        Just("2);".to_string()),
        "[a-zA-Z0-9 ,;:()\"]{0,30}",
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn arbitrary_text_never_panics(text in "\\PC{0,200}") {
        let mut interp = interpreter();
        let _ = interp.run_source("fuzz.ts", &text);
        prop_assert!(interp.script_stack().is_empty());
        prop_assert_eq!(interp.mode(), 0);
    }

    #[test]
    fn script_like_text_never_panics(lines in prop::collection::vec(script_line(), 0..20)) {
        let mut interp = interpreter();
        let result = interp.run_source("fuzz.ts", &lines.join("\n"));
        prop_assert!(interp.script_stack().is_empty());
        if let Err(err) = result {
            prop_assert!(!err.report().is_empty());
        }
    }
}
