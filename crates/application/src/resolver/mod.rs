//! Reference resolution
//!
//! Detection and recursive expansion of `$(NAME)` / `$(NAME[INDEX])`
//! references against a [`stager_domain::VariableStore`].
//!
//! # Usage
//!
//! ```
//! use stager_application::resolver::Resolver;
//! use stager_domain::VariableStore;
//!
//! let mut store = VariableStore::new();
//! store.set("TARGET_OS", None)?.append("Mac");
//!
//! let resolver = Resolver::new(&store);
//! assert_eq!(resolver.resolve("installing for $(TARGET_OS)")?, "installing for Mac");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod parser;
pub mod serialize;

pub use engine::{ResolveOptions, Resolver};
pub use parser::{
    Reference, find_reference, is_resolved, parse_bare_reference, parse_references, reference_for,
};
pub use serialize::{SerializeOptions, SerializedValue, SerializedVariable, UNKNOWN_VALUE};
