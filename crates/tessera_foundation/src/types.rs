//! Type descriptors shared by call-site values and signatures.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Type descriptor for values and signature parameters.
///
/// Call-site values only ever carry `String`, `Int`, `Float`, `Bool`, or
/// `Array`. Signatures may additionally use `Any` (accepts every scalar) and
/// `Unknown` (a type name that was not registered; never accepts anything).
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    /// Text.
    String,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point.
    Float,
    /// Boolean (`true`/`false`, case-insensitive).
    Bool,
    /// Ordered list of child values.
    Array,
    /// Any scalar.
    Any,
    /// An unregistered type name, kept for diagnostics.
    Unknown(String),
}

impl Type {
    /// Looks up a primitive type by its signature spelling.
    ///
    /// Accepts `int`, `integer`, `float`, `bool`, `boolean`, `string`, `str`
    /// and `any`, ignoring ASCII case. Returns `None` for anything else so the
    /// caller can try named types.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        match lowered.as_str() {
            "int" | "integer" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" | "boolean" => Some(Self::Bool),
            "string" | "str" => Some(Self::String),
            "any" => Some(Self::Any),
            _ => None,
        }
    }

    /// Returns true for every type other than `Array`.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array)
    }

    /// Returns true if this type is `Any`.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns true if this is an unregistered type name.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    /// Returns the canonical spelling used when printing signatures.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Any => "any",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(name) => write!(f, "unknown<{name}>"),
            other => f.write_str(other.name()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
