//! Named resource table populated by command handlers.
//!
//! Resources are stored in persistent maps so the whole table can be
//! snapshotted in O(1) before a load and restored if the load fails.

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

use im::HashMap;
use tessera_foundation::{Error, Result};

type Table = HashMap<String, Rc<dyn Any>>;

/// Resource table with a permanent and a temporary namespace.
///
/// Names beginning with the temporary prefix are routed to the temporary
/// namespace, which a nested load may replace with an empty one.
#[derive(Clone)]
pub struct Resources {
    permanent: Table,
    temporary: Table,
    prefix: String,
}

/// A detached temporary namespace, handed back by [`Resources::take_temporary`].
#[derive(Clone, Default)]
pub struct TemporaryScope(Table);

impl Default for Resources {
    fn default() -> Self {
        Self::new("temp_")
    }
}

impl Resources {
    /// Creates an empty table with the given temporary prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            permanent: HashMap::new(),
            temporary: HashMap::new(),
            prefix: prefix.into(),
        }
    }

    /// Returns true if `name` lives in the temporary namespace.
    #[must_use]
    pub fn is_temporary(&self, name: &str) -> bool {
        !self.prefix.is_empty() && name.starts_with(&self.prefix)
    }

    fn table(&self, name: &str) -> &Table {
        if self.is_temporary(name) {
            &self.temporary
        } else {
            &self.permanent
        }
    }

    fn table_mut(&mut self, name: &str) -> &mut Table {
        if self.is_temporary(name) {
            &mut self.temporary
        } else {
            &mut self.permanent
        }
    }

    /// Adds a new resource.
    ///
    /// # Errors
    /// Returns `DuplicateResource` if the name is taken.
    pub fn add<T: Any>(&mut self, name: &str, value: T) -> Result<()> {
        let table = self.table_mut(name);
        if table.contains_key(name) {
            return Err(Error::duplicate_resource(name));
        }
        table.insert(name.to_string(), Rc::new(value));
        Ok(())
    }

    /// Inserts or replaces a resource.
    pub fn set<T: Any>(&mut self, name: &str, value: T) {
        self.table_mut(name).insert(name.to_string(), Rc::new(value));
    }

    /// Returns a resource.
    ///
    /// # Errors
    /// Returns `MissingResource` if absent, `ResourceType` if it holds
    /// another type.
    pub fn get<T: Any>(&self, name: &str) -> Result<&T> {
        let entry = self
            .table(name)
            .get(name)
            .ok_or_else(|| Error::missing_resource(name))?;
        entry
            .downcast_ref::<T>()
            .ok_or_else(|| Error::resource_type(name, type_name::<T>()))
    }

    /// Returns a shared handle to a resource.
    ///
    /// # Errors
    /// Same as [`Resources::get`].
    pub fn get_rc<T: Any>(&self, name: &str) -> Result<Rc<T>> {
        let entry = self
            .table(name)
            .get(name)
            .ok_or_else(|| Error::missing_resource(name))?;
        Rc::clone(entry)
            .downcast::<T>()
            .map_err(|_| Error::resource_type(name, type_name::<T>()))
    }

    /// Returns true if the resource exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.table(name).contains_key(name)
    }

    /// Removes a resource, returning true if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.table_mut(name).remove(name).is_some()
    }

    /// Number of resources across both namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.permanent.len() + self.temporary.len()
    }

    /// Returns true if both namespaces are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted resource names in both namespaces.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .permanent
            .keys()
            .chain(self.temporary.keys())
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Detaches the temporary namespace, leaving an empty one.
    pub fn take_temporary(&mut self) -> TemporaryScope {
        TemporaryScope(std::mem::take(&mut self.temporary))
    }

    /// Reinstalls a previously detached temporary namespace.
    pub fn restore_temporary(&mut self, scope: TemporaryScope) {
        self.temporary = scope.0;
    }

    /// Drops every temporary resource.
    pub fn clear_temporary(&mut self) {
        self.temporary.clear();
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("prefix", &self.prefix)
            .field("names", &self.names())
            .finish()
    }
}
