//! Stager Application - reference resolution over the variable store
//!
//! Every path, URL, command fragment, and script line the generator emits is
//! first run through the [`resolver`] in this crate. The store itself lives
//! in `stager-domain`; resolution is read-only against it.

pub mod error;
pub mod resolver;

pub use error::{ResolveError, ResolveResult};
pub use resolver::{ResolveOptions, Resolver, SerializeOptions};
