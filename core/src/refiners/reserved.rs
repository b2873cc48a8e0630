//! # Reserved Names
//!
//! Keyword sets per target language and the rename strategies applied to
//! identifiers colliding with them. Lookups ignore ASCII case.

use crate::codedom::upper_first;

/// A keyword set.
#[derive(Debug, Clone, Copy)]
pub struct ReservedNames {
    words: &'static [&'static str],
}

impl ReservedNames {
    /// Whether `name` collides with a keyword.
    pub fn contains(&self, name: &str) -> bool {
        self.words.iter().any(|w| w.eq_ignore_ascii_case(name))
    }
}

/// Rewrites a reserved identifier.
pub type RenameFn = fn(&str) -> String;

/// `@` + first letter uppercased (`@Event`).
pub fn verbatim_upper_first(name: &str) -> String {
    format!("@{}", upper_first(name))
}

/// `{name}_escaped`
pub fn underscore_escaped(name: &str) -> String {
    format!("{}_escaped", name)
}

/// `{name}Escaped`
pub fn escaped_suffix(name: &str) -> String {
    format!("{}Escaped", name)
}

/// C# keywords.
pub const CSHARP: ReservedNames = ReservedNames {
    words: &[
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
        "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw",
        "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using",
        "virtual", "void", "volatile", "while",
    ],
};

/// Go keywords and predeclared identifiers.
pub const GO: ReservedNames = ReservedNames {
    words: &[
        "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
        "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
        "return", "select", "struct", "switch", "type", "var", "bool", "byte", "error", "float32",
        "float64", "int", "int32", "int64", "rune", "string", "uint", "uintptr", "nil", "iota",
        "append", "cap", "close", "copy", "delete", "len", "make", "new", "panic", "recover",
    ],
};

/// TypeScript reserved words.
pub const TYPESCRIPT: ReservedNames = ReservedNames {
    words: &[
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "implements", "import", "in", "instanceof", "interface", "let", "new", "null", "package",
        "private", "protected", "public", "return", "static", "super", "switch", "this", "throw",
        "true", "try", "typeof", "var", "void", "while", "with", "yield", "await",
    ],
};

/// PHP keywords and reserved type names.
pub const PHP: ReservedNames = ReservedNames {
    words: &[
        "abstract", "and", "array", "as", "break", "callable", "case", "catch", "class", "clone",
        "const", "continue", "declare", "default", "do", "echo", "else", "elseif", "empty",
        "enddeclare", "endfor", "endforeach", "endif", "endswitch", "endwhile", "eval", "exit",
        "extends", "final", "finally", "fn", "for", "foreach", "function", "global", "goto", "if",
        "implements", "include", "instanceof", "insteadof", "interface", "isset", "list",
        "match", "namespace", "new", "or", "print", "private", "protected", "public", "readonly",
        "require", "return", "static", "switch", "throw", "trait", "try", "unset", "use", "var",
        "while", "xor", "yield", "bool", "float", "int", "string", "object", "void", "iterable",
        "mixed", "never", "null", "false", "true",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        assert!(CSHARP.contains("Event"));
        assert!(GO.contains("type"));
        assert!(!TYPESCRIPT.contains("users"));
        assert!(PHP.contains("List"));
    }

    #[test]
    fn test_rename_strategies() {
        assert_eq!(verbatim_upper_first("event"), "@Event");
        assert_eq!(underscore_escaped("type"), "type_escaped");
        assert_eq!(escaped_suffix("class"), "classEscaped");
    }
}
