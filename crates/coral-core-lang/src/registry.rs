use crate::builtin::BuiltinLanguage;
use crate::definition::LanguageDefinition;
use crate::error::LanguageError;
use std::path::Path;

/// A lookup table of language definitions.
///
/// Names are matched case-insensitively. Registering a definition whose name is already present
/// replaces the earlier one, so user YAML can override a built-in.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: Vec<LanguageDefinition>,
}

impl LanguageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with every [`BuiltinLanguage`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for lang in BuiltinLanguage::ALL {
            registry.languages.push(lang.definition());
        }
        registry
    }

    /// Add or replace a definition.
    pub fn register(&mut self, definition: LanguageDefinition) -> Result<(), LanguageError> {
        if definition.name.trim().is_empty() {
            return Err(LanguageError::MissingField("name"));
        }

        if let Some(existing) = self
            .languages
            .iter_mut()
            .find(|l| l.name.eq_ignore_ascii_case(&definition.name))
        {
            tracing::debug!(language = %definition.name, "replacing language definition");
            *existing = definition;
        } else {
            tracing::debug!(language = %definition.name, "registering language definition");
            self.languages.push(definition);
        }
        Ok(())
    }

    /// Parse a YAML document holding a single definition and register it.
    ///
    /// Returns the registered language name.
    pub fn load_yaml_str(&mut self, yaml: &str) -> Result<String, LanguageError> {
        let definition: LanguageDefinition = serde_yaml::from_str(yaml)?;
        let name = definition.name.clone();
        self.register(definition)?;
        tracing::info!(language = %name, "loaded language definition");
        Ok(name)
    }

    /// Read and register a YAML definition file.
    pub fn load_yaml_file(&mut self, path: impl AsRef<Path>) -> Result<String, LanguageError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        self.load_yaml_str(&content)
    }

    /// Look up by display name (case-insensitive).
    pub fn by_name(&self, name: &str) -> Option<&LanguageDefinition> {
        self.languages
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    /// Look up by file extension (`"rs"`, `".py"`, ...).
    pub fn by_extension(&self, ext: &str) -> Option<&LanguageDefinition> {
        self.languages.iter().find(|l| l.matches_extension(ext))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.name.as_str())
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_is_case_insensitive() {
        let registry = LanguageRegistry::with_builtins();
        assert_eq!(registry.by_name("python").unwrap().name, "Python");
        assert_eq!(registry.by_name("C++").unwrap().name, "C++");
        assert!(registry.by_name("cobol").is_none());
    }

    #[test]
    fn test_lookup_by_extension() {
        let registry = LanguageRegistry::with_builtins();
        assert_eq!(registry.by_extension("hpp").unwrap().name, "C++");
        assert_eq!(registry.by_extension(".h").unwrap().name, "C");
        assert_eq!(registry.by_extension("txt").unwrap().name, "Plain Text");
        assert!(registry.by_extension("xyz").is_none());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = LanguageRegistry::with_builtins();
        let before = registry.len();
        registry
            .register(LanguageDefinition::new("rust").with_keywords(["only"]))
            .unwrap();
        assert_eq!(registry.len(), before);
        let rust = registry.by_name("Rust").unwrap();
        assert!(rust.is_keyword("only"));
        assert!(!rust.is_keyword("fn"));
    }

    #[test]
    fn test_register_rejects_empty_name() {
        let mut registry = LanguageRegistry::new();
        let err = registry.register(LanguageDefinition::new("  ")).unwrap_err();
        assert!(matches!(err, LanguageError::MissingField("name")));
        assert!(registry.is_empty());
    }
}
