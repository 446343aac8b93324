//! End-to-end scenarios across the store and the resolver, the way the
//! script generator drives them: populate in a write phase, then resolve.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use pretty_assertions::assert_eq;
use stager_application::resolver::{Resolver, SerializeOptions, SerializedValue};
use stager_application::{ResolveError, ResolveOptions};
use stager_domain::{StoreError, VariableStore};

#[test]
fn test_install_path_construction() {
    let mut store = VariableStore::new();
    store
        .set("BASE_INSTALL_DIR", Some("install root"))
        .unwrap()
        .append("/Applications");
    store
        .set("PRODUCT_NAME", None)
        .unwrap()
        .append("Waves");
    store
        .set("TARGET_DIR", None)
        .unwrap()
        .append("$(BASE_INSTALL_DIR)/$(PRODUCT_NAME)");

    let resolver = Resolver::new(&store);
    assert_eq!(
        resolver.resolve("mkdir -p \"$(TARGET_DIR)\"").unwrap(),
        "mkdir -p \"/Applications/Waves\""
    );
}

#[test]
fn test_environment_seeds_and_config_overrides() {
    let mut store = VariableStore::new();

    // Defaults first, then environment, then explicit configuration.
    store.set_if_absent("REPO_URL", "svn://default-host/repo", Some("default"));
    store.import_environment(
        [("REPO_REV".to_string(), "1234".to_string())],
        None,
    );
    store
        .set("REPO_URL", Some("from config"))
        .unwrap()
        .append("svn://real-host/repo");

    let resolver = Resolver::new(&store);
    assert_eq!(
        resolver.resolve("checkout $(REPO_URL)@$(REPO_REV)").unwrap(),
        "checkout svn://real-host/repo@1234"
    );
}

#[test]
fn test_environment_import_accumulates_on_existing_definition() {
    let mut store = VariableStore::new();
    store.set("X", None).unwrap().append("a");
    store.import_environment([("X".to_string(), "b".to_string())], None);

    let resolver = Resolver::new(&store);
    assert_eq!(resolver.resolve_var_to_list("X").unwrap(), ["a", "b"]);
}

#[test]
fn test_const_variables_resolve_and_stay_fixed() {
    let mut store = VariableStore::new();
    store
        .add_const("__INSTL_VERSION__", "tool version", ["1", "2", "3"])
        .unwrap();
    store.add_const("__INSTL_VERSION__", "tool version", ["1", "2", "3"]).unwrap();

    let err = store
        .add_const("__INSTL_VERSION__", "tool version", ["9"])
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstConflict { .. }));

    let resolver = Resolver::new(&store);
    assert_eq!(resolver.resolve("v$(__INSTL_VERSION__)").unwrap(), "v1 2 3");
}

#[test]
fn test_progressive_multi_pass_resolution() {
    let mut store = VariableStore::new();
    store
        .set("SYNC_URL", None)
        .unwrap()
        .append("$(BASE_URL)/$(CHANNEL)");
    store.set("CHANNEL", None).unwrap().append("beta");

    // First pass: BASE_URL is not known yet; lenient resolution keeps it.
    let resolver = Resolver::new(&store);
    let partial = resolver.resolve("$(SYNC_URL)").unwrap();
    assert_eq!(partial, "$(BASE_URL)/beta");

    // A later pass, after the missing variable arrives, finishes the job.
    store.set("BASE_URL", None).unwrap().append("http://cdn");
    let resolver = Resolver::new(&store);
    assert_eq!(resolver.resolve(&partial).unwrap(), "http://cdn/beta");

    // Final-output validation is strict.
    let strict = ResolveOptions::new().strict();
    assert!(resolver.resolve_with("$(SYNC_URL)", &strict).is_ok());
}

#[test]
fn test_command_lines_from_list_variable() {
    let mut store = VariableStore::new();
    store
        .set("EXCLUDES", None)
        .unwrap()
        .extend([".svn", ".DS_Store", "*.pyc"]);

    let resolver = Resolver::new(&store);

    // Embedded in a command line the list collapses with the separator.
    let options = ResolveOptions::new().with_list_sep(" --exclude ");
    assert_eq!(
        resolver
            .resolve_with("rsync --exclude $(EXCLUDES) src dst", &options)
            .unwrap(),
        "rsync --exclude .svn --exclude .DS_Store --exclude *.pyc src dst"
    );

    // Used alone it stays a list, one argument per value.
    assert_eq!(
        resolver.resolve_to_list("$(EXCLUDES)").unwrap(),
        [".svn", ".DS_Store", "*.pyc"]
    );
}

#[test]
fn test_duplicate_then_specialize() {
    let mut store = VariableStore::new();
    store
        .set("COMMON_SOURCES", Some("shared file list"))
        .unwrap()
        .extend(["a.dmg", "b.dmg"]);
    store.duplicate("COMMON_SOURCES", "MAC_SOURCES").unwrap();
    store.get_or_create("MAC_SOURCES").append("mac-only.dmg");

    let resolver = Resolver::new(&store);
    assert_eq!(
        resolver.resolve_var_to_list("MAC_SOURCES").unwrap(),
        ["a.dmg", "b.dmg", "mac-only.dmg"]
    );
    // The source is untouched.
    assert_eq!(
        resolver.resolve_var_to_list("COMMON_SOURCES").unwrap(),
        ["a.dmg", "b.dmg"]
    );
}

#[test]
fn test_cycle_reported_with_full_chain() {
    let mut store = VariableStore::new();
    store.set("A", None).unwrap().append("$(B)");
    store.set("B", None).unwrap().append("$(C)");
    store.set("C", None).unwrap().append("$(A)");

    let resolver = Resolver::new(&store);
    match resolver.resolve("$(A)").unwrap_err() {
        ResolveError::CircularReference { name, chain } => {
            assert_eq!(name, "A");
            assert_eq!(chain, ["A", "B", "C", "A"]);
        }
        other => panic!("expected CircularReference, got {other:?}"),
    }

    // The failure leaves no state behind; unrelated resolution still works.
    assert_eq!(resolver.resolve("$(NOPE)").unwrap(), "$(NOPE)");
}

#[test]
fn test_serialize_round_trip_shape() {
    let mut store = VariableStore::new();
    store
        .set("TARGET_OS", Some("platform"))
        .unwrap()
        .append("Mac");
    store
        .set("SOURCES", None)
        .unwrap()
        .extend(["$(REPO)/a", "$(REPO)/b"]);
    store.set("REPO", None).unwrap().append("http://host");

    let resolver = Resolver::new(&store);
    let map = resolver.serialize(&SerializeOptions::new()).unwrap();

    assert_eq!(
        map["TARGET_OS"].value,
        SerializedValue::Scalar("Mac".to_string())
    );
    assert_eq!(
        map["SOURCES"].value,
        SerializedValue::List(vec![
            "http://host/a".to_string(),
            "http://host/b".to_string()
        ])
    );

    let json = serde_json::to_value(&map).unwrap();
    assert_eq!(json["TARGET_OS"]["value"], "Mac");
    assert_eq!(json["SOURCES"]["value"][1], "http://host/b");
}

#[test]
fn test_deleted_variable_resolves_as_unknown() {
    let mut store = VariableStore::new();
    store.set("TEMP", None).unwrap().append("x");
    store.remove("TEMP");

    let resolver = Resolver::new(&store);
    assert_eq!(resolver.resolve("$(TEMP)").unwrap(), "$(TEMP)");
    assert!(!store.contains("TEMP"));
}
