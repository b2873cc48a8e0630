#![deny(missing_docs)]

//! # Enums

use crate::codedom::class::CodeUsing;
use std::collections::BTreeSet;

/// Wire value standing for "no value"; never becomes an option.
pub const NULL_SENTINEL: &str = "null";

/// A named set of string options.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeEnum {
    /// Identifier.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
    /// Deduplicated options, in declaration order.
    pub options: Vec<String>,
    /// Imports.
    pub usings: BTreeSet<CodeUsing>,
}

impl CodeEnum {
    /// Builds an enum, dropping duplicates, empty values and the `"null"` sentinel.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        values: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut options: Vec<String> = Vec::new();
        for value in values {
            if value.is_empty() || value == NULL_SENTINEL || options.contains(&value) {
                continue;
            }
            options.push(value);
        }
        Self {
            name: name.into(),
            description,
            options,
            usings: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_duplicates_are_dropped() {
        let values = ["red", "null", "green", "red", "blue"].map(String::from);
        let e = CodeEnum::new("Color", None, values);
        assert_eq!(e.options, vec!["red", "green", "blue"]);
    }
}
