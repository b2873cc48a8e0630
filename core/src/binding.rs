#![deny(missing_docs)]

//! # Deferred Type Binding
//!
//! Second walk over the built tree. Every pending type reference is resolved by
//! name, using a fixed search order from the namespace of the class owning it:
//!
//! 1. downward: that namespace and its descendants, shallowest match first
//! 2. sideways: `{grandparent}.{name without "RequestBuilder", first letter lowered}`
//! 3. anywhere in the tree, flagged as an ambiguous resolution
//!
//! References are grouped by name and resolved in parallel against a
//! read-only view of the tree; the results are applied sequentially.

use crate::codedom::{
    lower_first, parent_namespace_name, CodeNamespace, DeclarationRef, REQUEST_BUILDER_SUFFIX,
};
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::UnboundReference;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of the search for one (namespace, name) pair.
#[derive(Debug, Clone, PartialEq)]
enum Resolution {
    Found(DeclarationRef),
    Ambiguous(DeclarationRef),
    Missing,
}

fn search_in(root: &CodeNamespace, namespace: &str, name: &str) -> Option<DeclarationRef> {
    root.find_namespace(namespace)?
        .find_children_by_name(name)
        .into_iter()
        .next()
}

fn resolve(root: &CodeNamespace, namespace: &str, name: &str) -> Resolution {
    if let Some(found) = search_in(root, namespace, name) {
        return Resolution::Found(found);
    }
    let stem = name.strip_suffix(REQUEST_BUILDER_SUFFIX).unwrap_or(name);
    let grandparent = parent_namespace_name(namespace);
    let sideways = if grandparent.is_empty() {
        lower_first(stem)
    } else {
        format!("{}.{}", grandparent, lower_first(stem))
    };
    if let Some(found) = search_in(root, &sideways, name) {
        return Resolution::Found(found);
    }
    match root.find_children_by_name(name).into_iter().next() {
        Some(found) => Resolution::Ambiguous(found),
        None => Resolution::Missing,
    }
}

/// Pending type names grouped by name, each with the namespaces they are used from.
fn collect_pending(root: &CodeNamespace) -> BTreeMap<String, BTreeSet<String>> {
    let mut groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for namespace in root.all_namespaces() {
        for class in &namespace.classes {
            class.for_each_type(&mut |ty| {
                if ty.is_pending() {
                    groups
                        .entry(ty.name.clone())
                        .or_default()
                        .insert(namespace.name.clone());
                }
            });
        }
    }
    groups
}

/// Binds every pending type reference of `root`.
///
/// # Arguments
///
/// * `root` - The tree produced by the model builder.
/// * `diagnostics` - Receives a warning for every whole-tree fallback.
///
/// # Returns
///
/// * The references that stayed unbound. They are left pending in the tree.
pub fn bind_types(root: &mut CodeNamespace, diagnostics: &Diagnostics) -> Vec<UnboundReference> {
    let groups = collect_pending(root);
    tracing::debug!(groups = groups.len(), "Binding pending type references");

    let view: &CodeNamespace = root;
    let resolutions: BTreeMap<(String, String), Resolution> = groups
        .par_iter()
        .flat_map_iter(|(name, namespaces)| {
            namespaces.iter().map(move |namespace| {
                (
                    (namespace.clone(), name.clone()),
                    resolve(view, namespace, name),
                )
            })
        })
        .collect();

    for ((namespace, name), resolution) in &resolutions {
        if let Resolution::Ambiguous(found) = resolution {
            diagnostics.warn(
                WarningKind::AmbiguousTypeResolution,
                format!(
                    "'{}' used from {} only resolved through a whole-tree search, bound to {}",
                    name, namespace, found
                ),
            );
        }
    }

    let mut unbound = Vec::new();
    root.for_each_top_level_class_mut(&mut |namespace, class| {
        let owner = format!("{}.{}", namespace, class.name);
        class.for_each_type_mut(&mut |ty| {
            if !ty.is_pending() {
                return;
            }
            match resolutions.get(&(namespace.to_string(), ty.name.clone())) {
                Some(Resolution::Found(found)) | Some(Resolution::Ambiguous(found)) => {
                    ty.bind(found.clone())
                }
                _ => unbound.push(UnboundReference {
                    type_name: ty.name.clone(),
                    owner: owner.clone(),
                }),
            }
        });
    });
    unbound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::{ClassKind, CodeClass, CodeEnum, CodeProperty, CodeType, PropertyKind};

    fn builder(name: &str, navigation: &[&str]) -> CodeClass {
        let mut class = CodeClass::new(name, ClassKind::RequestBuilder);
        for target in navigation {
            class
                .add_property(CodeProperty::new(
                    target.to_lowercase(),
                    PropertyKind::RequestBuilder,
                    CodeType::pending(*target),
                ))
                .unwrap();
        }
        class
    }

    fn bound_target(root: &CodeNamespace, namespace: &str, class: &str) -> Option<DeclarationRef> {
        root.find_class(&DeclarationRef::class(namespace, class))
            .and_then(|c| c.properties.first())
            .and_then(|p| p.ty.declaration().cloned())
    }

    #[test]
    fn test_downward_search_prefers_shallowest() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.users")
            .add_class(builder("UsersRequestBuilder", &["MessagesRequestBuilder"]));
        root.ensure_namespace("ApiSdk.users.item.messages")
            .add_class(builder("MessagesRequestBuilder", &[]));
        root.ensure_namespace("ApiSdk.users.messages")
            .add_class(builder("MessagesRequestBuilder", &[]));
        let diagnostics = Diagnostics::new();
        let unbound = bind_types(&mut root, &diagnostics);
        assert!(unbound.is_empty());
        assert!(diagnostics.is_empty());
        assert_eq!(
            bound_target(&root, "ApiSdk.users", "UsersRequestBuilder"),
            Some(DeclarationRef::class("ApiSdk.users.messages", "MessagesRequestBuilder"))
        );
    }

    #[test]
    fn test_sideways_search_uses_name_convention() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.users")
            .add_class(builder("UsersRequestBuilder", &["PostsRequestBuilder"]));
        root.ensure_namespace("ApiSdk.posts")
            .add_class(builder("PostsRequestBuilder", &[]));
        root.ensure_namespace("Other.posts")
            .add_class(builder("PostsRequestBuilder", &[]));
        let diagnostics = Diagnostics::new();
        assert!(bind_types(&mut root, &diagnostics).is_empty());
        assert!(!diagnostics.contains(WarningKind::AmbiguousTypeResolution));
        assert_eq!(
            bound_target(&root, "ApiSdk.users", "UsersRequestBuilder"),
            Some(DeclarationRef::class("ApiSdk.posts", "PostsRequestBuilder"))
        );
    }

    #[test]
    fn test_whole_tree_fallback_warns() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.users")
            .add_class(builder("UsersRequestBuilder", &["ReportsRequestBuilder"]));
        root.ensure_namespace("ApiSdk.admin.deep")
            .add_class(builder("ReportsRequestBuilder", &[]));
        let diagnostics = Diagnostics::new();
        assert!(bind_types(&mut root, &diagnostics).is_empty());
        assert!(diagnostics.contains(WarningKind::AmbiguousTypeResolution));
        assert_eq!(
            bound_target(&root, "ApiSdk.users", "UsersRequestBuilder"),
            Some(DeclarationRef::class("ApiSdk.admin.deep", "ReportsRequestBuilder"))
        );
    }

    #[test]
    fn test_enums_with_a_builder_name_are_skipped() {
        let mut root = CodeNamespace::root();
        let users = root.ensure_namespace("ApiSdk.users");
        users.add_class(builder("UsersRequestBuilder", &["ReportsRequestBuilder"]));
        users.add_enum(CodeEnum::new("ReportsRequestBuilder", None, ["daily".to_string()]));
        root.ensure_namespace("ApiSdk.admin")
            .add_class(builder("ReportsRequestBuilder", &[]));
        let diagnostics = Diagnostics::new();
        assert!(bind_types(&mut root, &diagnostics).is_empty());
        assert_eq!(
            bound_target(&root, "ApiSdk.users", "UsersRequestBuilder"),
            Some(DeclarationRef::class("ApiSdk.admin", "ReportsRequestBuilder"))
        );
    }

    #[test]
    fn test_unresolvable_references_are_reported() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.users")
            .add_class(builder("UsersRequestBuilder", &["GhostRequestBuilder"]));
        let diagnostics = Diagnostics::new();
        let unbound = bind_types(&mut root, &diagnostics);
        assert_eq!(
            unbound,
            vec![UnboundReference {
                type_name: "GhostRequestBuilder".into(),
                owner: "ApiSdk.users.UsersRequestBuilder".into(),
            }]
        );
        let class = root
            .find_class(&DeclarationRef::class("ApiSdk.users", "UsersRequestBuilder"))
            .unwrap();
        assert!(class.properties[0].ty.as_simple().unwrap().is_pending());
    }
}
