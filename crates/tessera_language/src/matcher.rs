//! Structural matching of call-site values against reference trees.
//!
//! Matching is pure: it never mutates the call-site tree and builds a fresh,
//! fully typed and fully defaulted tree on success. A failed match is simply
//! `None` so the caller can try the next overload.

use tessera_foundation::Value;

use crate::signature::{Param, Shape, Signature};

/// Resolves an argument array against one overload.
///
/// The result is an array in parameter order whose children carry their
/// parameter names and declared kinds.
#[must_use]
pub fn resolve(signature: &Signature, arguments: &Value) -> Option<Value> {
    let actual = arguments.as_array()?;
    let children = match_params(&signature.params, actual)?;
    Some(Value::array(children, arguments.position()))
}

/// Resolves an argument array against overloads in order; the first match wins.
///
/// Returns the index of the matching overload and the resolved arguments.
#[must_use]
pub fn resolve_first<'a, I>(signatures: I, arguments: &Value) -> Option<(usize, Value)>
where
    I: IntoIterator<Item = &'a Signature>,
{
    signatures
        .into_iter()
        .enumerate()
        .find_map(|(index, sig)| resolve(sig, arguments).map(|value| (index, value)))
}

/// Matches one value against one parameter, naming the result after it.
#[must_use]
pub fn resolve_param(param: &Param, value: &Value) -> Option<Value> {
    let resolved = match &param.shape {
        Shape::Scalar(ty) => value.coerced(ty)?,
        Shape::Array(children) => {
            let actual = value.as_array()?;
            Value::array(match_params(children, actual)?, value.position())
        }
    };
    Some(resolved.renamed(Some(param.name.clone())))
}

/// Binds the positional prefix, then named arguments, then defaults.
fn match_params(params: &[Param], actual: &[Value]) -> Option<Vec<Value>> {
    let mut slots: Vec<Option<Value>> = vec![None; params.len()];
    let mut next = 0;

    for arg in actual {
        let index = match arg.name() {
            None => {
                if slots.iter().skip(next).any(Option::is_some) {
                    return None;
                }
                let index = next;
                next += 1;
                index
            }
            Some(name) => params
                .iter()
                .position(|p| p.name.eq_ignore_ascii_case(name))?,
        };
        let param = params.get(index)?;
        if slots[index].is_some() {
            return None;
        }
        slots[index] = Some(resolve_param(param, arg)?);
    }

    slots
        .into_iter()
        .zip(params)
        .map(|(slot, param)| slot.or_else(|| param.default.clone()))
        .collect()
}
