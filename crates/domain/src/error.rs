//! Domain error types

use thiserror::Error;

/// Errors raised by [`crate::VariableStore`] write and lookup operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A const variable was re-registered with different values.
    #[error(
        "const variable {name} ({description}) already defined: new values: {requested:?}, previous values: {existing:?}"
    )]
    ConstConflict {
        /// Name of the const variable.
        name: String,
        /// Description the variable was originally registered with.
        description: String,
        /// Values the variable currently holds.
        existing: Vec<String>,
        /// Values the rejected registration asked for.
        requested: Vec<String>,
    },

    /// A mutating operation targeted a const variable.
    #[error("variable {name} is const and cannot be redefined")]
    Immutable {
        /// Name of the const variable.
        name: String,
    },

    /// A strict lookup named a variable that is not in the store.
    #[error("unknown variable: {0}")]
    NotFound(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
