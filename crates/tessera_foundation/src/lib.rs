//! Core value tree, types, positions, and errors for Tessera.
//!
//! This crate provides:
//! - [`Value`] - A parsed argument: a typed scalar or an ordered array
//! - [`Type`] - Type descriptors used by both call sites and signatures
//! - [`Position`] - Source positions for diagnostics
//! - [`Error`] - Rich error types with source context and script stack

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod position;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use position::Position;
pub use types::Type;
pub use value::{Scalar, Value};
