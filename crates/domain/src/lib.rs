//! Stager Domain - configuration-variable store
//!
//! This crate defines the named-variable table that every other part of the
//! script generator writes into and resolves against. Types here are pure
//! Rust with no I/O beyond the optional process-environment import.

pub mod error;
pub mod store;
pub mod variable;

pub use error::{StoreError, StoreResult};
pub use store::{ENV_DESCRIPTION, VariableStore};
pub use variable::Variable;
