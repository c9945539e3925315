use crate::definition::LanguageDefinition;

/// The closed set of languages shipped with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinLanguage {
    /// No keywords, comments or strings; words and punctuation only.
    PlainText,
    /// C.
    C,
    /// C++.
    Cpp,
    /// Rust.
    Rust,
    /// Python.
    Python,
    /// JavaScript.
    JavaScript,
    /// Java.
    Java,
    /// C#.
    CSharp,
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
    "unsigned", "void", "volatile", "while",
];

const CPP_EXTRA_KEYWORDS: &[&str] = &[
    "bool", "catch", "class", "constexpr", "delete", "explicit", "false", "final", "friend",
    "mutable", "namespace", "new", "noexcept", "nullptr", "operator", "override", "private",
    "protected", "public", "template", "this", "throw", "true", "try", "typename", "using",
    "virtual",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "self",
    "try", "while", "with", "yield",
];

const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "let", "new", "null", "return", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
];

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final",
    "finally", "float", "for", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "null", "package", "private", "protected", "public", "return",
    "short", "static", "super", "switch", "synchronized", "this", "throw", "throws", "true",
    "try", "void", "volatile", "while",
];

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum",
    "event", "explicit", "extern", "false", "finally", "float", "for", "foreach", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "partial", "private",
    "protected", "public", "readonly", "ref", "return", "sealed", "short", "sizeof", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "using", "var", "virtual", "void", "while",
];

impl BuiltinLanguage {
    /// Every built-in language, in registration order.
    pub const ALL: [BuiltinLanguage; 8] = [
        BuiltinLanguage::PlainText,
        BuiltinLanguage::C,
        BuiltinLanguage::Cpp,
        BuiltinLanguage::Rust,
        BuiltinLanguage::Python,
        BuiltinLanguage::JavaScript,
        BuiltinLanguage::Java,
        BuiltinLanguage::CSharp,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::PlainText => "Plain Text",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Rust => "Rust",
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::Java => "Java",
            Self::CSharp => "C#",
        }
    }

    /// Build the definition record for this language.
    pub fn definition(self) -> LanguageDefinition {
        let c_family = |name: &str, keywords: Vec<&str>, extensions: &[&str]| {
            LanguageDefinition::new(name)
                .with_keywords(keywords)
                .with_extensions(extensions.iter().copied())
                .with_line_comment("//")
                .with_block_comment("/*", "*/")
                .with_string_delimiters(&['"', '\''])
        };

        match self {
            Self::PlainText => LanguageDefinition::new(self.name()).with_extensions(["txt"]),
            Self::C => c_family(self.name(), C_KEYWORDS.to_vec(), &["c", "h"]),
            Self::Cpp => {
                let keywords = C_KEYWORDS
                    .iter()
                    .chain(CPP_EXTRA_KEYWORDS)
                    .copied()
                    .collect();
                c_family(
                    self.name(),
                    keywords,
                    &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
                )
            }
            // `'` starts lifetimes and labels, so only `"` delimits strings.
            Self::Rust => c_family(self.name(), RUST_KEYWORDS.to_vec(), &["rs"])
                .with_string_delimiters(&['"']),
            Self::Python => LanguageDefinition::new(self.name())
                .with_keywords(PYTHON_KEYWORDS.iter().copied())
                .with_extensions(["py", "pyw"])
                .with_line_comment("#")
                .with_string_delimiters(&['"', '\'']),
            Self::JavaScript => c_family(
                self.name(),
                JAVASCRIPT_KEYWORDS.to_vec(),
                &["js", "mjs", "cjs", "jsx"],
            )
            .with_string_delimiters(&['"', '\'', '`']),
            Self::Java => c_family(self.name(), JAVA_KEYWORDS.to_vec(), &["java"]),
            Self::CSharp => c_family(self.name(), CSHARP_KEYWORDS.to_vec(), &["cs"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_has_unique_name() {
        let mut names: Vec<&str> = BuiltinLanguage::ALL.iter().map(|l| l.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BuiltinLanguage::ALL.len());
    }

    #[test]
    fn test_cpp_extends_c_keywords() {
        let cpp = BuiltinLanguage::Cpp.definition();
        assert!(cpp.is_keyword("while"));
        assert!(cpp.is_keyword("class"));
        assert!(!BuiltinLanguage::C.definition().is_keyword("class"));
    }

    #[test]
    fn test_python_uses_hash_comments() {
        let py = BuiltinLanguage::Python.definition();
        assert_eq!(py.line_comments, vec!["#".to_string()]);
        assert!(py.block_comments.is_empty());
        assert!(py.is_keyword("def"));
    }

    #[test]
    fn test_plain_text_has_no_strings_or_comments() {
        let plain = BuiltinLanguage::PlainText.definition();
        assert!(plain.string_delimiters.is_empty());
        assert_eq!(plain.line_comment_markers().count(), 0);
        assert!(plain.keywords.is_empty());
    }
}
