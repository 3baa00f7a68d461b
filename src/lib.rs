//! Tessera - Command-script interpreter for game data
//!
//! This crate re-exports all layers of the Tessera system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: tessera_runtime    — Command registry, dispatcher, LOAD, resources
//! Layer 1: tessera_language   — Tokenizer, signature format parser, matcher
//! Layer 0: tessera_foundation — Core types (Value, Type, Position, Error)
//! ```
//!
//! # Example
//!
//! ```
//! use tessera::runtime::Interpreter;
//!
//! let mut interpreter = Interpreter::default();
//! interpreter
//!     .register_command("Tile", &[], &["(int x, int y, string name = \"default\")"], |ctx, args| {
//!         let name = args.get_named("name").and_then(|v| v.as_str()).unwrap_or_default();
//!         ctx.resources_mut().set(name, (args.get(0).and_then(|v| v.as_int()), args.get(1).and_then(|v| v.as_int())));
//!         Ok(())
//!     })
//!     .unwrap();
//! interpreter.run_source("tiles.ts", "Tile 3, 5;").unwrap();
//! assert!(interpreter.resources().contains("default"));
//! ```

pub use tessera_foundation as foundation;
pub use tessera_language as language;
pub use tessera_runtime as runtime;
