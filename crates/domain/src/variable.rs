//! The variable entity: a named, ordered sequence of string values.

use serde::{Deserialize, Serialize};

/// A single named configuration variable.
///
/// A variable holds zero or more string values in insertion order. A variable
/// with exactly one value reads as a scalar, one with more as a list; callers
/// decide how to interpret the length. Values are raw: they may contain
/// `$(NAME)` references that the resolution engine expands later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    values: Vec<String>,
    #[serde(default)]
    is_const: bool,
}

impl Variable {
    /// Creates a new empty variable.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            values: Vec::new(),
            is_const: false,
        }
    }

    /// Creates a const variable with its fixed value set.
    ///
    /// The store, not the variable, enforces that a const variable is never
    /// redefined through the normal mutation paths.
    #[must_use]
    pub fn new_const(
        name: impl Into<String>,
        description: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            values: values.into_iter().map(Into::into).collect(),
            is_const: true,
        }
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Returns true when the variable was created through the const path.
    #[must_use]
    pub const fn is_const(&self) -> bool {
        self.is_const
    }

    /// Appends one value; duplicates are kept.
    pub fn append(&mut self, value: impl Into<String>) -> &mut Self {
        self.values.push(value.into());
        self
    }

    /// Appends every value in order.
    pub fn extend(&mut self, values: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Truncates to an empty value sequence; identity and description stay.
    pub fn clear_values(&mut self) {
        self.values.clear();
    }

    /// Returns the raw (unresolved) values in insertion order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the raw value at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the variable holds no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the raw values in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.values.iter()
    }

    /// A variable is defined only when it holds at least one non-empty value.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.values.iter().any(|v| !v.is_empty())
    }

    /// Joins the raw values with `sep`, without resolving references.
    #[must_use]
    pub fn joined(&self, sep: &str) -> String {
        self.values.join(sep)
    }
}

impl<'a> IntoIterator for &'a Variable {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
