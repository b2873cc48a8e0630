#![deny(missing_docs)]

//! # Namespaces
//!
//! The root of the owned code tree. Child namespaces carry their full dotted
//! name (`ApiSdk.users.item`), and every list is kept sorted by name so the tree
//! is identical however it was assembled.

use crate::codedom::class::CodeClass;
use crate::codedom::enums::CodeEnum;
use crate::codedom::types::{DeclarationKind, DeclarationRef, SimpleType};
use std::collections::HashMap;

/// Name of the parent of a dotted namespace name (`""` for a first-level name).
pub fn parent_namespace_name(name: &str) -> &str {
    name.rsplit_once('.').map(|(parent, _)| parent).unwrap_or("")
}

/// Number of dotted segments in a namespace name.
pub fn namespace_depth(name: &str) -> usize {
    if name.is_empty() {
        0
    } else {
        name.split('.').count()
    }
}

/// A named container of namespaces, classes and enums.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeNamespace {
    /// Full dotted name; empty for the tree root.
    pub name: String,
    /// Child namespaces.
    pub namespaces: Vec<CodeNamespace>,
    /// Classes.
    pub classes: Vec<CodeClass>,
    /// Enums.
    pub enums: Vec<CodeEnum>,
}

impl CodeNamespace {
    /// The unnamed tree root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Empty namespace named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Last segment of the name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Returns the namespace named `name`, creating it and any missing ancestor.
    pub fn ensure_namespace(&mut self, name: &str) -> &mut CodeNamespace {
        if name == self.name || name.is_empty() {
            return self;
        }
        let prefix_len = if self.name.is_empty() {
            0
        } else {
            self.name.len() + 1
        };
        let rest = name.get(prefix_len..).unwrap_or(name);
        let next_segment = rest.split('.').next().unwrap_or(rest);
        let child_name = if self.name.is_empty() {
            next_segment.to_string()
        } else {
            format!("{}.{}", self.name, next_segment)
        };
        let index = match self
            .namespaces
            .binary_search_by(|ns| ns.name.as_str().cmp(child_name.as_str()))
        {
            Ok(index) => index,
            Err(index) => {
                self.namespaces.insert(index, CodeNamespace::new(child_name));
                index
            }
        };
        self.namespaces[index].ensure_namespace(name)
    }

    /// Finds a namespace by full name in this subtree.
    pub fn find_namespace(&self, name: &str) -> Option<&CodeNamespace> {
        if self.name == name {
            return Some(self);
        }
        self.namespaces
            .iter()
            .filter(|ns| name == ns.name || name.starts_with(&format!("{}.", ns.name)))
            .find_map(|ns| ns.find_namespace(name))
    }

    /// Mutable variant of [`CodeNamespace::find_namespace`].
    pub fn find_namespace_mut(&mut self, name: &str) -> Option<&mut CodeNamespace> {
        if self.name == name {
            return Some(self);
        }
        self.namespaces
            .iter_mut()
            .filter(|ns| name == ns.name || name.starts_with(&format!("{}.", ns.name)))
            .find_map(|ns| ns.find_namespace_mut(name))
    }

    /// Adds a class, keeping the list sorted. Returns false if the name is taken.
    pub fn add_class(&mut self, class: CodeClass) -> bool {
        match self
            .classes
            .binary_search_by(|c| c.name.as_str().cmp(class.name.as_str()))
        {
            Ok(_) => false,
            Err(index) => {
                self.classes.insert(index, class);
                true
            }
        }
    }

    /// Adds an enum, keeping the list sorted. Returns false if the name is taken.
    pub fn add_enum(&mut self, enumeration: CodeEnum) -> bool {
        match self
            .enums
            .binary_search_by(|e| e.name.as_str().cmp(enumeration.name.as_str()))
        {
            Ok(_) => false,
            Err(index) => {
                self.enums.insert(index, enumeration);
                true
            }
        }
    }

    /// Removes and returns the class named `name`.
    pub fn remove_class(&mut self, name: &str) -> Option<CodeClass> {
        let index = self.classes.iter().position(|c| c.name == name)?;
        Some(self.classes.remove(index))
    }

    /// Class named `name` directly in this namespace.
    pub fn class(&self, name: &str) -> Option<&CodeClass> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Mutable class named `name` directly in this namespace.
    pub fn class_mut(&mut self, name: &str) -> Option<&mut CodeClass> {
        self.classes.iter_mut().find(|c| c.name == name)
    }

    /// Enum named `name` directly in this namespace.
    pub fn enumeration(&self, name: &str) -> Option<&CodeEnum> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Resolves a class reference, including `Outer.Inner` paths.
    pub fn find_class(&self, declaration: &DeclarationRef) -> Option<&CodeClass> {
        let ns = self.find_namespace(&declaration.namespace)?;
        let mut parts = declaration.name.split('.');
        let mut current = ns.class(parts.next()?)?;
        for part in parts {
            current = current.inner_class(part)?;
        }
        Some(current)
    }

    /// Mutable variant of [`CodeNamespace::find_class`].
    pub fn find_class_mut(&mut self, declaration: &DeclarationRef) -> Option<&mut CodeClass> {
        let ns = self.find_namespace_mut(&declaration.namespace)?;
        let mut parts = declaration.name.split('.');
        let mut current = ns.class_mut(parts.next()?)?;
        for part in parts {
            current = current.inner_classes.iter_mut().find(|c| c.name == part)?;
        }
        Some(current)
    }

    /// Resolves an enum reference.
    pub fn find_enum(&self, declaration: &DeclarationRef) -> Option<&CodeEnum> {
        self.find_namespace(&declaration.namespace)?
            .enumeration(&declaration.name)
    }

    /// Whether the reference points at an existing declaration.
    pub fn contains_declaration(&self, declaration: &DeclarationRef) -> bool {
        match declaration.kind {
            DeclarationKind::Class => self.find_class(declaration).is_some(),
            DeclarationKind::Enum => self.find_enum(declaration).is_some(),
        }
    }

    /// Top-level classes named `name` in this namespace and below,
    /// shallowest namespace first, then by namespace name. Enums never match.
    pub fn find_children_by_name(&self, name: &str) -> Vec<DeclarationRef> {
        let mut found = Vec::new();
        self.collect_children_by_name(name, &mut found);
        found.sort_by(|a, b| {
            namespace_depth(&a.namespace)
                .cmp(&namespace_depth(&b.namespace))
                .then_with(|| a.namespace.cmp(&b.namespace))
        });
        found
    }

    fn collect_children_by_name(&self, name: &str, found: &mut Vec<DeclarationRef>) {
        if self.class(name).is_some() {
            found.push(DeclarationRef::class(&self.name, name));
        }
        for ns in &self.namespaces {
            ns.collect_children_by_name(name, found);
        }
    }

    /// Every namespace of the subtree, this one included, in pre-order.
    pub fn all_namespaces(&self) -> Vec<&CodeNamespace> {
        let mut out = vec![self];
        for ns in &self.namespaces {
            out.extend(ns.all_namespaces());
        }
        out
    }

    /// Calls `f` with every class of the subtree (inner classes included) and
    /// the name of the namespace holding its top-level class.
    pub fn for_each_class_mut(&mut self, f: &mut dyn FnMut(&str, &mut CodeClass)) {
        let CodeNamespace {
            name,
            namespaces,
            classes,
            ..
        } = self;
        for class in classes.iter_mut() {
            visit_class_mut(name.as_str(), class, f);
        }
        for ns in namespaces.iter_mut() {
            ns.for_each_class_mut(f);
        }
    }

    /// Calls `f` with every top-level class of the subtree and its namespace name.
    pub fn for_each_top_level_class_mut(&mut self, f: &mut dyn FnMut(&str, &mut CodeClass)) {
        let CodeNamespace {
            name,
            namespaces,
            classes,
            ..
        } = self;
        for class in classes.iter_mut() {
            f(name.as_str(), class);
        }
        for ns in namespaces.iter_mut() {
            ns.for_each_top_level_class_mut(f);
        }
    }

    /// Calls `f` with every enum of the subtree.
    pub fn for_each_enum_mut(&mut self, f: &mut dyn FnMut(&str, &mut CodeEnum)) {
        let CodeNamespace {
            name,
            namespaces,
            enums,
            ..
        } = self;
        for e in enums.iter_mut() {
            f(name.as_str(), e);
        }
        for ns in namespaces.iter_mut() {
            ns.for_each_enum_mut(f);
        }
    }

    /// Calls `f` with every namespace of the subtree, children before parents.
    pub fn for_each_namespace_mut(&mut self, f: &mut dyn FnMut(&mut CodeNamespace)) {
        for ns in self.namespaces.iter_mut() {
            ns.for_each_namespace_mut(f);
        }
        f(self);
    }

    /// Visits every simple type of the subtree.
    pub fn for_each_type_mut(&mut self, f: &mut dyn FnMut(&mut SimpleType)) {
        self.for_each_top_level_class_mut(&mut |_, class| class.for_each_type_mut(&mut *f));
    }

    /// Points every bound reference in `moves` at its new declaration, adopting
    /// the new name. Used after declarations are renamed or relocated.
    pub fn retarget_references(&mut self, moves: &HashMap<DeclarationRef, DeclarationRef>) {
        if moves.is_empty() {
            return;
        }
        self.for_each_type_mut(&mut |ty| {
            let target = ty.declaration().and_then(|d| moves.get(d)).cloned();
            if let Some(target) = target {
                ty.bind(target);
            }
        });
    }

    /// Whether the subtree holds no declaration at all.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.enums.is_empty()
            && self.namespaces.iter().all(CodeNamespace::is_empty)
    }
}

fn visit_class_mut(namespace: &str, class: &mut CodeClass, f: &mut dyn FnMut(&str, &mut CodeClass)) {
    f(namespace, class);
    for inner in class.inner_classes.iter_mut() {
        visit_class_mut(namespace, inner, f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::class::ClassKind;

    fn tree() -> CodeNamespace {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.users.item.messages")
            .add_class(CodeClass::new("MessagesRequestBuilder", ClassKind::RequestBuilder));
        root.ensure_namespace("ApiSdk.users")
            .add_class(CodeClass::new("UsersRequestBuilder", ClassKind::RequestBuilder));
        root.ensure_namespace("ApiSdk.groups.item.messages")
            .add_class(CodeClass::new("MessagesRequestBuilder", ClassKind::RequestBuilder));
        root
    }

    #[test]
    fn test_ensure_namespace_creates_ancestors_once() {
        let mut root = tree();
        root.ensure_namespace("ApiSdk.users");
        let names: Vec<_> = root.all_namespaces().iter().map(|ns| ns.name.clone()).collect();
        assert_eq!(
            names,
            vec![
                "",
                "ApiSdk",
                "ApiSdk.groups",
                "ApiSdk.groups.item",
                "ApiSdk.groups.item.messages",
                "ApiSdk.users",
                "ApiSdk.users.item",
                "ApiSdk.users.item.messages",
            ]
        );
    }

    #[test]
    fn test_find_children_prefers_shallow_then_name() {
        let root = tree();
        let found = root.find_children_by_name("MessagesRequestBuilder");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].namespace, "ApiSdk.groups.item.messages");

        let users = root.find_namespace("ApiSdk.users").unwrap();
        let scoped = users.find_children_by_name("MessagesRequestBuilder");
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].namespace, "ApiSdk.users.item.messages");
    }

    #[test]
    fn test_find_namespace_does_not_match_prefixes() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.user");
        root.ensure_namespace("ApiSdk.users");
        assert_eq!(root.find_namespace("ApiSdk.users").unwrap().name, "ApiSdk.users");
        assert!(root.find_namespace("ApiSdk.use").is_none());
    }

    #[test]
    fn test_retarget_references_follows_moves() {
        let mut root = CodeNamespace::root();
        let mut builder = CodeClass::new("UsersRequestBuilder", ClassKind::RequestBuilder);
        builder.parent_class = Some(SimpleType::bound(DeclarationRef::class("ApiSdk.models", "Base")));
        root.ensure_namespace("ApiSdk.users").add_class(builder);

        let mut moves = HashMap::new();
        moves.insert(
            DeclarationRef::class("ApiSdk.models", "Base"),
            DeclarationRef::class("ApiSdk.models", "BaseEscaped"),
        );
        root.retarget_references(&moves);
        let class = root
            .find_class(&DeclarationRef::class("ApiSdk.users", "UsersRequestBuilder"))
            .unwrap();
        assert_eq!(class.parent_class.as_ref().unwrap().name, "BaseEscaped");
    }

    #[test]
    fn test_parent_namespace_name() {
        assert_eq!(parent_namespace_name("ApiSdk.users.item"), "ApiSdk.users");
        assert_eq!(parent_namespace_name("ApiSdk"), "");
        assert_eq!(namespace_depth("ApiSdk.users"), 2);
        assert_eq!(namespace_depth(""), 0);
    }
}
