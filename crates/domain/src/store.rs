//! The name-to-variable table.

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{StoreError, StoreResult};
use crate::variable::Variable;

/// Description every environment-imported variable is tagged with.
pub const ENV_DESCRIPTION: &str = "from environment";

/// A table of named configuration variables.
///
/// At most one [`Variable`] exists per name. Insertion order is preserved and
/// is the enumeration order of [`keys`](Self::keys) and [`iter`](Self::iter),
/// which keeps serialization deterministic within a process run.
///
/// Accessors that mutate a variable create it empty when absent; read-only
/// checks ([`contains`](Self::contains), [`defined`](Self::defined)) never
/// create.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    vars: IndexMap<String, Variable>,
}

impl VariableStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the variable, inserting a new empty one when absent.
    pub fn get_or_create(&mut self, name: &str) -> &mut Variable {
        self.vars
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(name))
    }

    /// Returns the variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    /// Returns the variable by name, failing with [`StoreError::NotFound`]
    /// when absent.
    pub fn get_strict(&self, name: &str) -> StoreResult<&Variable> {
        self.vars
            .get(name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// The canonical (re)define entry point.
    ///
    /// Clears the existing values (or creates the variable fresh), optionally
    /// replaces the description, and returns the variable so callers can
    /// chain value appends. Redefining a const variable fails with
    /// [`StoreError::Immutable`].
    pub fn set(&mut self, name: &str, description: Option<&str>) -> StoreResult<&mut Variable> {
        if self.vars.get(name).is_some_and(Variable::is_const) {
            return Err(StoreError::Immutable {
                name: name.to_string(),
            });
        }
        let var = self.get_or_create(name);
        var.clear_values();
        if let Some(description) = description {
            var.set_description(description);
        }
        Ok(var)
    }

    /// Defines the variable with a single value only when the name does not
    /// yet exist. Good for seeding defaults under values already read from
    /// configuration.
    pub fn set_if_absent(
        &mut self,
        name: &str,
        value: impl Into<String>,
        description: Option<&str>,
    ) {
        if self.vars.contains_key(name) {
            return;
        }
        let var = self.get_or_create(name);
        var.append(value);
        if let Some(description) = description {
            var.set_description(description);
        }
    }

    /// Registers an immutable variable.
    ///
    /// Re-registering an existing name with the same values is a silent
    /// no-op; different values fail with [`StoreError::ConstConflict`].
    pub fn add_const(
        &mut self,
        name: &str,
        description: &str,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> StoreResult<()> {
        let requested: Vec<String> = values.into_iter().map(Into::into).collect();
        if let Some(existing) = self.vars.get(name) {
            if existing.values() == requested.as_slice() {
                return Ok(());
            }
            return Err(StoreError::ConstConflict {
                name: name.to_string(),
                description: existing.description().to_string(),
                existing: existing.values().to_vec(),
                requested,
            });
        }
        self.vars.insert(
            name.to_string(),
            Variable::new_const(name, description, requested),
        );
        Ok(())
    }

    /// Copies description and values from `source` into `target`.
    ///
    /// The target is reset first through [`set`](Self::set), so a const
    /// target fails with [`StoreError::Immutable`]; a missing source fails
    /// with [`StoreError::NotFound`].
    pub fn duplicate(&mut self, source: &str, target: &str) -> StoreResult<()> {
        let src = self.get_strict(source)?;
        let description = src.description().to_string();
        let values = src.values().to_vec();
        self.set(target, Some(&description))?.extend(values);
        Ok(())
    }

    /// Removes the variable outright; no-op when absent.
    pub fn remove(&mut self, name: &str) {
        self.vars.shift_remove(name);
    }

    /// Returns true when a variable object exists under `name`, defined or
    /// not. Never creates.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Returns true when the variable exists and holds at least one
    /// non-empty value. Never creates.
    #[must_use]
    pub fn defined(&self, name: &str) -> bool {
        self.vars.get(name).is_some_and(Variable::is_defined)
    }

    /// Returns the description of the named variable, if present.
    #[must_use]
    pub fn description(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(Variable::description)
    }

    /// Enumerates variable names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Iterates over `(name, variable)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true when the store holds no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Bulk-imports name/value pairs as environment variables.
    ///
    /// Every imported variable gets the fixed [`ENV_DESCRIPTION`] description
    /// and the value is **appended** to anything already present under that
    /// name, so repeated imports and prior definitions accumulate instead of
    /// being clobbered. Empty names are skipped, as are names registered as
    /// const, whose values and description stay fixed. When a filter is
    /// supplied, only matching names are imported.
    pub fn import_environment<I, K, V>(&mut self, vars: I, filter: Option<&Regex>)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let key = key.into();
            if key.is_empty() {
                continue;
            }
            if let Some(filter) = filter
                && !filter.is_match(&key)
            {
                continue;
            }
            if self.vars.get(&key).is_some_and(Variable::is_const) {
                continue;
            }
            let var = self.get_or_create(&key);
            var.set_description(ENV_DESCRIPTION);
            var.append(value.into());
        }
    }

    /// Imports the process environment; see
    /// [`import_environment`](Self::import_environment).
    pub fn read_environment(&mut self, filter: Option<&Regex>) {
        self.import_environment(std::env::vars(), filter);
    }
}
