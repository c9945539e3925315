use coral_core_lang::{BlockComment, LanguageError, LanguageRegistry};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_load_lua_definition_from_str() {
    let mut registry = LanguageRegistry::with_builtins();
    let name = registry
        .load_yaml_str(include_str!("fixtures/lua.yaml"))
        .expect("load lua");
    assert_eq!(name, "Lua");

    let lua = registry.by_extension("lua").expect("lua registered");
    assert!(lua.is_keyword("local"));
    assert!(!lua.is_keyword("fn"));
    assert_eq!(lua.line_comments, vec!["--".to_string()]);
    assert_eq!(lua.block_comments, vec![BlockComment::new("--[[", "]]")]);
    assert!(lua.case_sensitive);
}

#[test]
fn test_load_definition_from_file() {
    let mut registry = LanguageRegistry::new();
    registry.load_yaml_file(fixture("lua.yaml")).expect("load file");
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Lua"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let mut registry = LanguageRegistry::new();
    let err = registry
        .load_yaml_file(fixture("does-not-exist.yaml"))
        .unwrap_err();
    assert!(matches!(err, LanguageError::Io(_)));
}

#[test]
fn test_malformed_yaml_is_reported() {
    let mut registry = LanguageRegistry::new();
    let err = registry.load_yaml_str("keywords: [a, b").unwrap_err();
    assert!(matches!(err, LanguageError::Yaml(_)));
}

#[test]
fn test_builtin_names_in_order() {
    let registry = LanguageRegistry::with_builtins();
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec![
            "Plain Text",
            "C",
            "C++",
            "Rust",
            "Python",
            "JavaScript",
            "Java",
            "C#"
        ]
    );
}
