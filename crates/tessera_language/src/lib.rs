//! Statement tokenizer, signature format parser, and overload matcher for
//! Tessera scripts.
//!
//! This crate provides:
//! - [`Tokenizer`] - Resumable line-by-line statement scanner
//! - [`parse_format`] - Compiles signature strings into [`Signature`]s
//! - [`TypeRegistry`] - Named, reusable signature fragments
//! - [`matcher`] - Structural overload resolution with coercion and defaults

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod format;
pub mod matcher;
pub mod signature;
pub mod tokenizer;
pub mod type_registry;


pub use format::parse_format;
pub use matcher::{resolve, resolve_first, resolve_param};
pub use signature::{Param, Shape, Signature};
pub use tokenizer::{MAX_NESTING_DEPTH, Scan, Statement, Tokenizer};
pub use type_registry::TypeRegistry;
