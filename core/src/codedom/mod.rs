#![deny(missing_docs)]

//! # Code Model
//!
//! The language-neutral tree produced by the model builder, bound by the
//! binding pass, rewritten by refiners and rendered by writers.
//!
//! Ownership is strictly parent to child. Type references between elements are
//! `DeclarationRef` lookups, never ownership edges.

pub mod class;
pub mod enums;
pub mod members;
pub mod namespace;
pub mod types;

pub use class::{ClassKind, CodeClass, CodeUsing};
pub use enums::CodeEnum;
pub use members::{
    CodeIndexer, CodeMethod, CodeParameter, CodeProperty, MethodKind, ParameterKind, PropertyKind,
    Visibility,
};
pub use namespace::{namespace_depth, parent_namespace_name, CodeNamespace};
pub use types::{
    CodeType, CollectionKind, DeclarationKind, DeclarationRef, SimpleType, TypeDefinition,
    UnionType,
};

/// Suffix of request builder class names.
pub const REQUEST_BUILDER_SUFFIX: &str = "RequestBuilder";

/// `value` with its first character lowercased.
pub fn lower_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `value` with its first character uppercased.
pub fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_letter_casing() {
        assert_eq!(lower_first("UsersItem"), "usersItem");
        assert_eq!(upper_first("users"), "Users");
        assert_eq!(lower_first(""), "");
        assert_eq!(upper_first(""), "");
    }
}
