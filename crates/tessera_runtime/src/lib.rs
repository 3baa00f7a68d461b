//! Command registry, dispatcher, and script interpreter for Tessera.
//!
//! This crate provides:
//! - [`Interpreter`] - Reads scripts and dispatches statements to handlers
//! - [`CommandContext`] - What a handler can see and do while it runs
//! - [`Resources`] - The named resource table handlers populate
//! - [`ScriptStack`] - Cycle detection for `LOAD`
//! - [`InterpreterOptions`] - Interpreter configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod context;
pub mod interpreter;
pub mod options;
pub mod reader;
pub mod registry;
pub mod resources;
pub mod script_stack;

pub use context::CommandContext;
pub use interpreter::Interpreter;
pub use options::{InterpreterOptions, Mode};
pub use reader::LineReader;
pub use registry::{Command, CommandRegistry, Handler};
pub use resources::{Resources, TemporaryScope};
pub use script_stack::{ScriptSource, ScriptStack};
