//! Named types: reusable signature fragments such as `Color` or `Point`.

use std::collections::HashMap;

use log::debug;
use tessera_foundation::{Error, Result, Type};

use crate::format::parse_format;
use crate::signature::Signature;

/// Registry of named types.
///
/// Each name maps to one or more overloads. Lookups are case-sensitive.
/// A named type may reference types registered before it.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Vec<Signature>>,
    order: Vec<String>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named type from its overload signatures.
    ///
    /// # Errors
    /// Returns `DuplicateRegistration` if the name is taken or spells a
    /// primitive type, `EmptyRegistration` if `formats` is empty, or a
    /// format error if a signature does not parse.
    pub fn register(&mut self, name: &str, formats: &[&str]) -> Result<()> {
        if Type::from_name(name).is_some() || self.types.contains_key(name) {
            return Err(Error::duplicate_registration(name));
        }
        if formats.is_empty() {
            return Err(Error::empty_registration(name));
        }
        let mut overloads = Vec::new();
        for format in formats {
            overloads.extend(parse_format(format, self)?);
        }
        debug!("registered type {name} with {} overload(s)", overloads.len());
        self.types.insert(name.to_string(), overloads);
        self.order.push(name.to_string());
        Ok(())
    }

    /// Parses a signature against the types registered so far.
    ///
    /// # Errors
    /// See [`parse_format`].
    pub fn parse(&self, format: &str) -> Result<Vec<Signature>> {
        parse_format(format, self)
    }

    /// Returns the overloads of a named type.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Signature]> {
        self.types.get(name).map(Vec::as_slice)
    }

    /// Returns true if a type with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
