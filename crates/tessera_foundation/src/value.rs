//! The value tree produced for every parsed argument.
//!
//! A [`Value`] is either a scalar (raw text plus every interpretation of it
//! that succeeded) or an ordered array of child values. Trees are built fresh
//! for each statement and are not mutated once the statement completes;
//! coercion always produces a new value.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::types::Type;

/// Scalar payload: the literal text and its successful interpretations.
///
/// All interpretations are probed once at construction. Probing never fails;
/// an interpretation that does not parse is simply absent. Only finite
/// numbers count as floats, so words such as `inf`, `infinity` or `NaN`
/// (and overflowing literals like `1e400`) stay plain strings.
///
/// Equality compares the text only; the interpretations are derived from it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scalar {
    text: String,
    int: Option<i64>,
    float: Option<f64>,
    boolean: Option<bool>,
}

impl Scalar {
    /// Creates a scalar from raw text, probing every interpretation.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let int = text.parse::<i64>().ok();
        let float = text.parse::<f64>().ok().filter(|f| f.is_finite());
        let boolean = parse_bool(&text);
        Self {
            text,
            int,
            float,
            boolean,
        }
    }

    /// Returns the literal text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the integer interpretation, if the text is an integer.
    #[must_use]
    pub const fn try_int(&self) -> Option<i64> {
        self.int
    }

    /// Returns the float interpretation, if the text is a finite number.
    #[must_use]
    pub const fn try_float(&self) -> Option<f64> {
        self.float
    }

    /// Returns the boolean interpretation, if the text is `true` or `false`.
    #[must_use]
    pub const fn try_bool(&self) -> Option<bool> {
        self.boolean
    }

    /// Checks whether this scalar can be read as the given type.
    ///
    /// `String` and `Any` accept every scalar; `Int`, `Float` and `Bool`
    /// accept only text that parses as that type. `Array` and unknown types
    /// accept nothing.
    #[must_use]
    pub fn accepts(&self, ty: &Type) -> bool {
        match ty {
            Type::String | Type::Any => true,
            Type::Int => self.int.is_some(),
            Type::Float => self.float.is_some(),
            Type::Bool => self.boolean.is_some(),
            Type::Array | Type::Unknown(_) => false,
        }
    }

    /// Returns the most specific type this text reads as.
    #[must_use]
    pub fn inferred_type(&self) -> Type {
        if self.int.is_some() {
            Type::Int
        } else if self.float.is_some() {
            Type::Float
        } else if self.boolean.is_some() {
            Type::Bool
        } else {
            Type::String
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum Payload {
    Scalar(Scalar),
    Array(Vec<Value>),
}

/// A parsed, typed unit of script data.
///
/// The `kind` of an array is always [`Type::Array`]. Scalars carry the kind
/// they were read as (inferred for bare words, `String` for quoted text) or,
/// after overload resolution, the kind declared by the matching parameter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Value {
    kind: Type,
    payload: Payload,
    name: Option<String>,
    position: Position,
}

impl Value {
    /// Creates a scalar whose kind is inferred from the text.
    #[must_use]
    pub fn scalar(text: impl Into<String>, position: Position) -> Self {
        let scalar = Scalar::new(text);
        Self {
            kind: scalar.inferred_type(),
            payload: Payload::Scalar(scalar),
            name: None,
            position,
        }
    }

    /// Creates a `String` scalar regardless of what the text looks like.
    #[must_use]
    pub fn string(text: impl Into<String>, position: Position) -> Self {
        Self {
            kind: Type::String,
            payload: Payload::Scalar(Scalar::new(text)),
            name: None,
            position,
        }
    }

    /// Creates an array from children, preserving their order.
    #[must_use]
    pub fn array(children: Vec<Value>, position: Position) -> Self {
        Self {
            kind: Type::Array,
            payload: Payload::Array(children),
            name: None,
            position,
        }
    }

    /// Sets the argument name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the argument name.
    #[must_use]
    pub fn renamed(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    /// Marks this tree as synthesized by clearing every position.
    #[must_use]
    pub fn detached(mut self) -> Self {
        self.position = Position::default();
        if let Payload::Array(children) = &mut self.payload {
            let owned = std::mem::take(children);
            *children = owned.into_iter().map(Value::detached).collect();
        }
        self
    }

    /// Builds a copy of this scalar read as `ty`, or `None` if it does not parse.
    ///
    /// `Any` keeps the inferred kind. Arrays never coerce here; array
    /// matching is structural and lives with the signature matcher.
    #[must_use]
    pub fn coerced(&self, ty: &Type) -> Option<Self> {
        let Payload::Scalar(scalar) = &self.payload else {
            return None;
        };
        if !scalar.accepts(ty) {
            return None;
        }
        let kind = if ty.is_any() { self.kind.clone() } else { ty.clone() };
        Some(Self {
            kind,
            payload: Payload::Scalar(scalar.clone()),
            name: self.name.clone(),
            position: self.position,
        })
    }

    /// Checks whether this value can stand where `ty` is expected.
    ///
    /// Arrays match only `Array`; scalars defer to [`Scalar::accepts`].
    #[must_use]
    pub fn is_valid_type(&self, ty: &Type) -> bool {
        match &self.payload {
            Payload::Array(_) => matches!(ty, Type::Array),
            Payload::Scalar(scalar) => scalar.accepts(ty),
        }
    }

    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> &Type {
        &self.kind
    }

    /// Returns the argument name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns where this value started in the script.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns true if this is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self.payload, Payload::Array(_))
    }

    /// Returns the scalar payload, if this is a scalar.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match &self.payload {
            Payload::Scalar(scalar) => Some(scalar),
            Payload::Array(_) => None,
        }
    }

    /// Returns the children, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match &self.payload {
            Payload::Array(children) => Some(children),
            Payload::Scalar(_) => None,
        }
    }

    /// Consumes the value and returns its children, if it is an array.
    #[must_use]
    pub fn into_children(self) -> Option<Vec<Value>> {
        match self.payload {
            Payload::Array(children) => Some(children),
            Payload::Scalar(_) => None,
        }
    }

    /// Returns the literal text of a scalar.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.as_scalar().map(Scalar::text)
    }

    /// Returns the text of a scalar. Alias of [`Value::text`] for handler code.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.text()
    }

    /// Returns the integer interpretation of a scalar.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        self.as_scalar().and_then(Scalar::try_int)
    }

    /// Returns the numeric interpretation of a scalar (integers widen).
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        self.as_scalar().and_then(Scalar::try_float)
    }

    /// Returns the boolean interpretation of a scalar.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_scalar().and_then(Scalar::try_bool)
    }

    /// Returns the number of children (zero for scalars).
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_array().map_or(0, <[Value]>::len)
    }

    /// Returns true if this is a scalar or an empty array.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the child at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.as_array().and_then(|children| children.get(index))
    }

    /// Returns the first child named `name`, ignoring ASCII case.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.as_array()?.iter().find(|child| {
            child
                .name
                .as_deref()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
    }

    /// Returns true if any child of this array carries a name.
    #[must_use]
    pub fn has_named_children(&self) -> bool {
        self.as_array()
            .is_some_and(|children| children.iter().any(|c| c.name.is_some()))
    }

    /// Writes the value as a script literal, without its name.
    ///
    /// # Errors
    /// Propagates formatter errors.
    pub fn fmt_literal(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Scalar(scalar) if self.kind == Type::String => {
                write!(f, "\"{}\"", scalar.text())
            }
            Payload::Scalar(scalar) => f.write_str(scalar.text()),
            Payload::Array(children) => {
                f.write_str("(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }

    /// Returns the literal rendering of this value, without its name.
    #[must_use]
    pub fn literal(&self) -> String {
        struct Literal<'a>(&'a Value);
        impl fmt::Display for Literal<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt_literal(f)
            }
        }
        Literal(self).to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{name}: ")?;
        }
        self.fmt_literal(f)
    }
}
