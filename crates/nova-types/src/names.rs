//! Java identifier rules, as far as generated code cares about them.

/// Reserved words and literals that can never be used as identifiers.
pub const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while", "_",
];

pub fn is_java_keyword(word: &str) -> bool {
    JAVA_KEYWORDS.contains(&word)
}

/// A single identifier segment: starts with a letter, `_` or `$` and
/// continues with letters, digits, `_` or `$`. Keywords are not rejected here.
pub fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Dot-separated identifiers, e.g. `com.example.Foo$Bar`.
pub fn is_qualified_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_java_identifier)
}
