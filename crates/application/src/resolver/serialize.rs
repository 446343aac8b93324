//! The serialization surface: a name-to-resolved-value mapping that
//! round-trips into the declarative document format the generator consumes.
//! No file I/O happens here.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ResolveResult;
use crate::resolver::engine::Resolver;

/// Sentinel emitted for requested names missing from the store.
pub const UNKNOWN_VALUE: &str = "UNKNOWN VARIABLE";

/// A resolved value: a single value stays scalar, several stay a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SerializedValue {
    /// Exactly one resolved value.
    Scalar(String),
    /// Zero or several resolved values, order preserved.
    List(Vec<String>),
}

/// One serialized variable with its optional comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializedVariable {
    /// The resolved value(s).
    pub value: SerializedValue,

    /// Per-name comment, taken from the variable's description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Knobs for one serialization pass.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Names to serialize; None means every variable, in store order.
    pub names: Option<Vec<String>>,

    /// Emit variable descriptions as comments.
    pub include_comments: bool,

    /// Skip unknown requested names instead of emitting the
    /// [`UNKNOWN_VALUE`] sentinel.
    pub ignore_unknown: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            names: None,
            include_comments: true,
            ignore_unknown: false,
        }
    }
}

impl SerializeOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts serialization to the given names.
    #[must_use]
    pub fn with_names(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Drops descriptions from the output.
    #[must_use]
    pub const fn without_comments(mut self) -> Self {
        self.include_comments = false;
        self
    }

    /// Skips unknown requested names.
    #[must_use]
    pub const fn ignore_unknown(mut self) -> Self {
        self.ignore_unknown = true;
        self
    }
}

impl Resolver<'_> {
    /// Produces the name-to-resolved-value mapping for the store.
    ///
    /// Each variable resolves list-aware: one element unwraps to a scalar,
    /// several stay a sequence. Unknown requested names are skipped or
    /// emitted as the [`UNKNOWN_VALUE`] sentinel, per
    /// [`SerializeOptions::ignore_unknown`].
    pub fn serialize(
        &self,
        options: &SerializeOptions,
    ) -> ResolveResult<IndexMap<String, SerializedVariable>> {
        let names: Vec<String> = match &options.names {
            Some(names) => names.clone(),
            None => self.store().keys().map(str::to_string).collect(),
        };

        let mut out = IndexMap::with_capacity(names.len());
        for name in names {
            if let Some(var) = self.store().get(&name) {
                let comment = options
                    .include_comments
                    .then(|| var.description().to_string());
                let mut resolved = self.resolve_var_to_list(&name)?;
                let value = match resolved.len() {
                    // A variable holding no values reads as an empty scalar.
                    0 => SerializedValue::Scalar(String::new()),
                    1 => SerializedValue::Scalar(resolved.remove(0)),
                    _ => SerializedValue::List(resolved),
                };
                out.insert(name, SerializedVariable { value, comment });
            } else if !options.ignore_unknown {
                let comment = format!("{name} is not in variable list");
                out.insert(
                    name,
                    SerializedVariable {
                        value: SerializedValue::Scalar(UNKNOWN_VALUE.to_string()),
                        comment: Some(comment),
                    },
                );
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stager_domain::VariableStore;

    fn sample_store() -> VariableStore {
        let mut store = VariableStore::new();
        store
            .set("TARGET_OS", Some("platform to install for"))
            .unwrap()
            .append("Mac");
        store
            .set("SOURCES", Some("what to pull"))
            .unwrap()
            .extend(["$(REPO)/a", "$(REPO)/b"]);
        store.set("REPO", None).unwrap().append("svn://host");
        store
    }

    #[test]
    fn test_scalar_unwraps_and_list_stays() {
        let store = sample_store();
        let resolver = Resolver::new(&store);
        let map = resolver.serialize(&SerializeOptions::new()).unwrap();

        assert_eq!(
            map["TARGET_OS"].value,
            SerializedValue::Scalar("Mac".to_string())
        );
        assert_eq!(
            map["SOURCES"].value,
            SerializedValue::List(vec![
                "svn://host/a".to_string(),
                "svn://host/b".to_string()
            ])
        );
    }

    #[test]
    fn test_zero_value_variable_serializes_as_empty_scalar() {
        let mut store = VariableStore::new();
        store.set("EMPTY", Some("declared, not filled")).unwrap();
        let resolver = Resolver::new(&store);
        let map = resolver.serialize(&SerializeOptions::new()).unwrap();
        assert_eq!(map["EMPTY"].value, SerializedValue::Scalar(String::new()));
    }

    #[test]
    fn test_store_order_is_kept() {
        let store = sample_store();
        let resolver = Resolver::new(&store);
        let map = resolver.serialize(&SerializeOptions::new()).unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["TARGET_OS", "SOURCES", "REPO"]);
    }

    #[test]
    fn test_comments_follow_descriptions() {
        let store = sample_store();
        let resolver = Resolver::new(&store);

        let with = resolver.serialize(&SerializeOptions::new()).unwrap();
        assert_eq!(
            with["TARGET_OS"].comment.as_deref(),
            Some("platform to install for")
        );

        let without = resolver
            .serialize(&SerializeOptions::new().without_comments())
            .unwrap();
        assert_eq!(without["TARGET_OS"].comment, None);
    }

    #[test]
    fn test_unknown_name_gets_sentinel() {
        let store = sample_store();
        let resolver = Resolver::new(&store);
        let options = SerializeOptions::new().with_names(["TARGET_OS", "NOPE"]);
        let map = resolver.serialize(&options).unwrap();

        assert_eq!(
            map["NOPE"].value,
            SerializedValue::Scalar(UNKNOWN_VALUE.to_string())
        );
        assert_eq!(
            map["NOPE"].comment.as_deref(),
            Some("NOPE is not in variable list")
        );
    }

    #[test]
    fn test_unknown_name_skipped_when_ignored() {
        let store = sample_store();
        let resolver = Resolver::new(&store);
        let options = SerializeOptions::new()
            .with_names(["TARGET_OS", "NOPE"])
            .ignore_unknown();
        let map = resolver.serialize(&options).unwrap();

        assert!(map.contains_key("TARGET_OS"));
        assert!(!map.contains_key("NOPE"));
    }

    #[test]
    fn test_mapping_serializes_to_json() {
        let store = sample_store();
        let resolver = Resolver::new(&store);
        let options = SerializeOptions::new()
            .with_names(["TARGET_OS"])
            .without_comments();
        let map = resolver.serialize(&options).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"TARGET_OS":{"value":"Mac"}}"#);
    }
}
