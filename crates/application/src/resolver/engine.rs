//! The recursive expansion engine.
//!
//! Resolution is a guarded recursive descent over the implicit reference
//! graph: scan left to right, substitute the first reference found, repeat.
//! The cycle guard is the visited-set of that traversal and lives for exactly
//! one top-level call, so concurrent or nested resolutions never share state.

use stager_domain::{Variable, VariableStore};
use tracing::{debug, trace};

use crate::error::{ResolveError, ResolveResult};
use crate::resolver::parser::{
    Reference, find_reference, is_resolved, parse_bare_reference, reference_for,
};

/// Knobs for one resolution call.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Separator used when a whole list-valued variable collapses into a
    /// scalar position.
    pub list_sep: String,

    /// Substituted for references whose name is unknown (or whose index is
    /// out of range). When unset such references are left in place.
    pub default: Option<String>,

    /// Fail with [`ResolveError::Unresolved`] when the final text still
    /// contains a reference. Lenient partial resolution is the default.
    pub strict: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            list_sep: " ".to_string(),
            default: None,
            strict: false,
        }
    }
}

impl ResolveOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the list separator.
    #[must_use]
    pub fn with_list_sep(mut self, sep: impl Into<String>) -> Self {
        self.list_sep = sep.into();
        self
    }

    /// Sets the not-found default.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Demands a fully resolved result.
    #[must_use]
    pub const fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// Stack of variable names currently being expanded.
///
/// Shared across the whole recursive call tree of one top-level resolution;
/// a name must be pushed before its values are walked and popped on every
/// exit path.
#[derive(Debug, Default)]
struct CycleGuard {
    stack: Vec<String>,
}

impl CycleGuard {
    fn enter(&mut self, name: &str) -> ResolveResult<()> {
        if self.stack.iter().any(|entered| entered == name) {
            let mut chain = self.stack.clone();
            chain.push(name.to_string());
            debug!(name, ?chain, "circular reference detected");
            return Err(ResolveError::CircularReference {
                name: name.to_string(),
                chain,
            });
        }
        self.stack.push(name.to_string());
        Ok(())
    }

    fn exit(&mut self) {
        self.stack.pop();
    }
}

/// Resolves `$(NAME)` references against a [`VariableStore`].
///
/// The resolver never mutates the store; every top-level call owns a fresh
/// cycle guard, so one resolver may serve concurrent callers.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    store: &'a VariableStore,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over the given store.
    #[must_use]
    pub const fn new(store: &'a VariableStore) -> Self {
        Self { store }
    }

    /// Returns the store this resolver reads from.
    #[must_use]
    pub const fn store(&self) -> &'a VariableStore {
        self.store
    }

    /// Resolves `text` with default options.
    pub fn resolve(&self, text: &str) -> ResolveResult<String> {
        self.resolve_with(text, &ResolveOptions::default())
    }

    /// Resolves `text`.
    ///
    /// References are rewritten in left-to-right, first-occurrence order.
    /// Unknown references are left untouched (or replaced by the configured
    /// default); with [`ResolveOptions::strict`] a final text that still
    /// contains a reference fails with [`ResolveError::Unresolved`].
    pub fn resolve_with(&self, text: &str, options: &ResolveOptions) -> ResolveResult<String> {
        let mut guard = CycleGuard::default();
        let resolved = self.resolve_inner(text, options, &mut guard)?;
        if options.strict && !is_resolved(&resolved) {
            return Err(ResolveError::Unresolved {
                original: text.to_string(),
                partial: resolved,
            });
        }
        Ok(resolved)
    }

    fn resolve_inner(
        &self,
        text: &str,
        options: &ResolveOptions,
        guard: &mut CycleGuard,
    ) -> ResolveResult<String> {
        let mut resolved = text.to_string();
        let mut cursor = 0;
        while let Some(reference) = find_reference(&resolved, cursor) {
            let expansion = match self.store.get(&reference.name) {
                Some(var) => {
                    guard.enter(&reference.name)?;
                    let expansion = self.expand(var, &reference, options, guard);
                    guard.exit();
                    expansion?
                }
                None => None,
            };

            if let Some(replacement) = expansion {
                if replacement.as_str() == &resolved[reference.span.clone()] {
                    // A self-referential indexed element reproduces its own
                    // token; rescanning it from the same cursor would never
                    // terminate. No progress is possible, move past it.
                    debug!(name = %reference.name, "reference expands to itself, left unresolved");
                    cursor = reference.span.end;
                    continue;
                }
                trace!(name = %reference.name, %replacement, "substituting reference");
                // The cursor stays put: the scan re-reads the substituted
                // text, so a replacement may expose or consume adjacent
                // reference text of its own.
                resolved.replace_range(reference.span.clone(), &replacement);
            } else if let Some(default) = &options.default {
                trace!(name = %reference.name, %default, "substituting default");
                // The default is inserted once and never rescanned as a new
                // reference site.
                resolved.replace_range(reference.span.clone(), default);
                cursor = reference.span.start + default.len();
            } else {
                debug!(name = %reference.name, "reference left unresolved");
                cursor = reference.span.end;
            }
        }
        Ok(resolved)
    }

    /// Expands one reference to an existing variable. `None` means the index
    /// was out of range, which falls under the not-found policy.
    fn expand(
        &self,
        var: &Variable,
        reference: &Reference,
        options: &ResolveOptions,
        guard: &mut CycleGuard,
    ) -> ResolveResult<Option<String>> {
        match reference.index {
            // The raw element is substituted as-is; references inside it are
            // picked up by the continuing scan.
            Some(index) => Ok(var.get(index).map(str::to_string)),
            None => {
                let joined = var
                    .iter()
                    .filter(|value| !value.is_empty())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(&options.list_sep);
                let inner = ResolveOptions {
                    list_sep: options.list_sep.clone(),
                    default: None,
                    strict: false,
                };
                self.resolve_inner(&joined, &inner, guard).map(Some)
            }
        }
    }

    /// Resolves `text` list-aware, with default options.
    pub fn resolve_to_list(&self, text: &str) -> ResolveResult<Vec<String>> {
        self.resolve_to_list_with(text, &ResolveOptions::default())
    }

    /// Resolves `text` list-aware.
    ///
    /// A bare reference to a list-valued variable survives as a genuine list,
    /// each value itself expanded list-aware and flattened in order. Any
    /// other text collapses through [`resolve_with`](Self::resolve_with) into
    /// a one-element list.
    pub fn resolve_to_list_with(
        &self,
        text: &str,
        options: &ResolveOptions,
    ) -> ResolveResult<Vec<String>> {
        let mut guard = CycleGuard::default();
        self.resolve_to_list_inner(text, options, &mut guard)
    }

    fn resolve_to_list_inner(
        &self,
        text: &str,
        options: &ResolveOptions,
        guard: &mut CycleGuard,
    ) -> ResolveResult<Vec<String>> {
        let Some(reference) = parse_bare_reference(text) else {
            let inner = ResolveOptions {
                list_sep: options.list_sep.clone(),
                default: None,
                strict: false,
            };
            return Ok(vec![self.resolve_inner(text, &inner, guard)?]);
        };

        guard.enter(&reference.name)?;
        let result = self.expand_bare(&reference, text, options, guard);
        guard.exit();
        result
    }

    /// Expands a bare reference into a flat value list. The whole variable is
    /// expanded even when the reference carries an index.
    fn expand_bare(
        &self,
        reference: &Reference,
        text: &str,
        options: &ResolveOptions,
        guard: &mut CycleGuard,
    ) -> ResolveResult<Vec<String>> {
        match self.store.get(&reference.name) {
            Some(var) => {
                let inner = ResolveOptions {
                    list_sep: options.list_sep.clone(),
                    default: None,
                    strict: false,
                };
                let mut list = Vec::with_capacity(var.len());
                for value in var.values() {
                    list.extend(self.resolve_to_list_inner(value, &inner, guard)?);
                }
                Ok(list)
            }
            None => {
                let fallback = options
                    .default
                    .clone()
                    .unwrap_or_else(|| text.to_string());
                Ok(vec![fallback])
            }
        }
    }

    /// Resolves the named variable to a string, as `$(name)`.
    pub fn resolve_var(&self, name: &str) -> ResolveResult<String> {
        self.resolve(&reference_for(name))
    }

    /// Resolves the named variable to a string with explicit options.
    pub fn resolve_var_with(&self, name: &str, options: &ResolveOptions) -> ResolveResult<String> {
        self.resolve_with(&reference_for(name), options)
    }

    /// Resolves the named variable list-aware, as `$(name)`.
    pub fn resolve_var_to_list(&self, name: &str) -> ResolveResult<Vec<String>> {
        self.resolve_to_list(&reference_for(name))
    }

    /// Resolves the named variable list-aware, returning an empty list when
    /// the name is not in the store.
    pub fn resolve_var_to_list_if_exists(&self, name: &str) -> ResolveResult<Vec<String>> {
        if self.store.contains(name) {
            self.resolve_var_to_list(name)
        } else {
            Ok(Vec::new())
        }
    }
}
