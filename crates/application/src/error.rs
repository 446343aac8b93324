//! Application error types

use stager_domain::StoreError;
use thiserror::Error;

/// Errors raised while resolving `$(NAME)` references.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A variable name was re-entered while already being expanded.
    #[error("circular reference to $({name}), resolution chain: {}", chain.join(" -> "))]
    CircularReference {
        /// The re-entered name.
        name: String,
        /// The full chain of names in expansion order, ending with the
        /// re-entered name.
        chain: Vec<String>,
    },

    /// Strict resolution left references behind.
    #[error("cannot fully resolve {original:?}, best effort: {partial:?}")]
    Unresolved {
        /// The original input text.
        original: String,
        /// The partially resolved text.
        partial: String,
    },

    /// A store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
