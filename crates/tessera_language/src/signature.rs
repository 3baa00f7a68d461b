//! Reference trees: the expected shape of a command's arguments.
//!
//! A [`Signature`] is one compiled overload. It is built once at
//! registration time and only read afterwards.

use std::fmt;

use tessera_foundation::{Type, Value};

use crate::tokenizer::is_keyword_char;

/// One overload: an ordered list of parameters.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Signature {
    /// Parameters in positional order.
    pub params: Vec<Param>,
}

/// A declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Parameter name, used for named arguments and diagnostics.
    pub name: String,
    /// Expected shape.
    pub shape: Shape,
    /// Resolved value substituted when the argument is omitted.
    pub default: Option<Value>,
    /// Named type this parameter was declared with, if any.
    pub type_name: Option<String>,
}

/// Expected shape of a parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A scalar of the given type.
    Scalar(Type),
    /// An array with the given children.
    Array(Vec<Param>),
}

impl Signature {
    /// Creates a signature from parameters.
    #[must_use]
    pub fn new(params: Vec<Param>) -> Self {
        Self { params }
    }

    /// Number of leading parameters without a default.
    #[must_use]
    pub fn required(&self) -> usize {
        required(&self.params)
    }

    /// Total number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Number of leading parameters without a default.
#[must_use]
pub fn required(params: &[Param]) -> usize {
    params
        .iter()
        .position(|p| p.default.is_some())
        .unwrap_or(params.len())
}

impl Param {
    /// Creates a scalar parameter.
    #[must_use]
    pub fn scalar(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Scalar(ty),
            default: None,
            type_name: None,
        }
    }

    /// Creates an array parameter.
    #[must_use]
    pub fn array(name: impl Into<String>, children: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Array(children),
            default: None,
            type_name: None,
        }
    }

    /// Returns true if the parameter may be omitted.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    /// Returns the scalar type, or `Array` for array parameters.
    #[must_use]
    pub fn kind(&self) -> Type {
        match &self.shape {
            Shape::Scalar(ty) => ty.clone(),
            Shape::Array(_) => Type::Array,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_params(f, &self.params)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.type_name, &self.shape) {
            (Some(name), _) => f.write_str(name)?,
            (None, Shape::Scalar(ty)) => write!(f, "{ty}")?,
            (None, Shape::Array(children)) => write_params(f, children)?,
        }
        f.write_str(" ")?;
        write_name(f, &self.name)?;
        if let Some(default) = &self.default {
            f.write_str(" = ")?;
            write_default(f, default)?;
        }
        Ok(())
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    f.write_str("(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{param}")?;
    }
    f.write_str(")")
}

fn write_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if !name.is_empty() && name.chars().all(is_keyword_char) {
        f.write_str(name)
    } else {
        write!(f, "\"{name}\"")
    }
}

/// Defaults are stored in parameter order, so their children print
/// positionally.
fn write_default(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value.as_array() {
        Some(children) => {
            f.write_str("(")?;
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_default(f, child)?;
            }
            f.write_str(")")
        }
        None => value.fmt_literal(f),
    }
}
