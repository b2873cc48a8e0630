#![deny(missing_docs)]

//! # Classes
//!
//! A class owns its members and inner classes. The member kinds a class accepts
//! depend on its `ClassKind`; adding any other kind is rejected.

use crate::codedom::members::{CodeIndexer, CodeMethod, CodeProperty, MethodKind, PropertyKind};
use crate::codedom::types::{CodeType, SimpleType};
use crate::error::{AppError, AppResult};
use std::collections::BTreeSet;

/// Role of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// One node of the path tree.
    RequestBuilder,
    /// A schema-backed model.
    Model,
    /// Query parameters of one operation.
    QueryParameters,
    /// Bundled parameters of one operation.
    ParameterSet,
    /// Wrapper standing in for a union type.
    UnionWrapper,
}

impl ClassKind {
    /// Whether a class of this kind may own a property of `kind`.
    pub fn allows_property(&self, kind: PropertyKind) -> bool {
        use PropertyKind as P;
        match self {
            ClassKind::RequestBuilder => matches!(
                kind,
                P::RequestBuilder | P::UrlTemplate | P::PathParameters | P::RequestAdapter
            ),
            ClassKind::Model | ClassKind::UnionWrapper => {
                matches!(kind, P::Custom | P::AdditionalData | P::BackingStore)
            }
            ClassKind::QueryParameters => matches!(kind, P::QueryParameter | P::Custom),
            ClassKind::ParameterSet => matches!(
                kind,
                P::RequestBody
                    | P::QueryParameter
                    | P::Headers
                    | P::Options
                    | P::ResponseHandler
                    | P::Custom
            ),
        }
    }

    /// Whether a class of this kind may own a method of `kind`.
    pub fn allows_method(&self, kind: MethodKind) -> bool {
        use MethodKind as M;
        match self {
            ClassKind::RequestBuilder => matches!(
                kind,
                M::Constructor
                    | M::ClientConstructor
                    | M::RawUrlConstructor
                    | M::RequestExecutor
                    | M::RequestGenerator
                    | M::RequestBuilderWithParameters
                    | M::RequestBuilderBackwardCompatibility
                    | M::IndexerBackwardCompatibility
            ),
            ClassKind::Model | ClassKind::UnionWrapper => matches!(
                kind,
                M::Constructor
                    | M::Serializer
                    | M::Deserializer
                    | M::Getter
                    | M::Setter
                    | M::NullCheck
                    | M::Custom
            ),
            ClassKind::QueryParameters | ClassKind::ParameterSet => {
                matches!(kind, M::Constructor | M::Custom)
            }
        }
    }
}

/// An import attached to a top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeUsing {
    /// Module, package or namespace providing the symbol.
    pub module: String,
    /// Imported symbol; empty when the whole module is imported.
    pub symbol: String,
    /// Whether the module is outside the generated code.
    pub is_external: bool,
}

impl CodeUsing {
    /// Import of a runtime symbol.
    pub fn external(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
            is_external: true,
        }
    }

    /// Import of a generated declaration.
    pub fn internal(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbol: symbol.into(),
            is_external: false,
        }
    }
}

/// A generated class.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeClass {
    /// Identifier.
    pub name: String,
    /// Role.
    pub kind: ClassKind,
    /// Documentation.
    pub description: Option<String>,
    /// Single base class.
    pub parent_class: Option<SimpleType>,
    /// Implemented interfaces.
    pub implements: Vec<SimpleType>,
    /// Imports, keyed by (module, symbol).
    pub usings: BTreeSet<CodeUsing>,
    /// Properties, in insertion order.
    pub properties: Vec<CodeProperty>,
    /// Methods, in insertion order.
    pub methods: Vec<CodeMethod>,
    /// Indexer for a templated child segment.
    pub indexer: Option<CodeIndexer>,
    /// Nested classes.
    pub inner_classes: Vec<CodeClass>,
}

impl CodeClass {
    /// Empty class.
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            parent_class: None,
            implements: Vec::new(),
            usings: BTreeSet::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            indexer: None,
            inner_classes: Vec::new(),
        }
    }

    /// Whether the class plays one of `kinds`.
    pub fn is_of_kind(&self, kinds: &[ClassKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Adds a property. A second property with the same name is ignored.
    pub fn add_property(&mut self, property: CodeProperty) -> AppResult<()> {
        if !self.kind.allows_property(property.kind) {
            return Err(AppError::General(format!(
                "{:?} property '{}' is not allowed on {:?} class '{}'",
                property.kind, property.name, self.kind, self.name
            )));
        }
        if !self.properties.iter().any(|p| p.name == property.name) {
            self.properties.push(property);
        }
        Ok(())
    }

    /// Adds a method. A second method with the same name and kind is ignored.
    pub fn add_method(&mut self, method: CodeMethod) -> AppResult<()> {
        if !self.kind.allows_method(method.kind) {
            return Err(AppError::General(format!(
                "{:?} method '{}' is not allowed on {:?} class '{}'",
                method.kind, method.name, self.kind, self.name
            )));
        }
        if !self
            .methods
            .iter()
            .any(|m| m.name == method.name && m.kind == method.kind)
        {
            self.methods.push(method);
        }
        Ok(())
    }

    /// Adds a nested class unless one with the same name exists.
    pub fn add_inner_class(&mut self, class: CodeClass) {
        if !self.inner_classes.iter().any(|c| c.name == class.name) {
            self.inner_classes.push(class);
        }
    }

    /// Property named `name`.
    pub fn property(&self, name: &str) -> Option<&CodeProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// First property of `kind`.
    pub fn property_of_kind(&self, kind: PropertyKind) -> Option<&CodeProperty> {
        self.properties.iter().find(|p| p.kind == kind)
    }

    /// Methods playing `kind`.
    pub fn methods_of_kind(&self, kind: MethodKind) -> impl Iterator<Item = &CodeMethod> {
        self.methods.iter().filter(move |m| m.kind == kind)
    }

    /// Method named `name`.
    pub fn method(&self, name: &str) -> Option<&CodeMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Inner class named `name`.
    pub fn inner_class(&self, name: &str) -> Option<&CodeClass> {
        self.inner_classes.iter().find(|c| c.name == name)
    }

    /// Visits every type reference owned by the class, inner classes included.
    pub fn for_each_type_mut(&mut self, f: &mut dyn FnMut(&mut SimpleType)) {
        if let Some(parent) = self.parent_class.as_mut() {
            f(parent);
        }
        for ty in self.implements.iter_mut() {
            f(ty);
        }
        self.for_each_member_type_mut(&mut |ty| visit_code_type(ty, &mut *f));
        for inner in self.inner_classes.iter_mut() {
            inner.for_each_type_mut(f);
        }
    }

    /// Visits the member types (properties, method signatures, indexer) of this
    /// class only, unions left whole.
    pub fn for_each_member_type_mut(&mut self, f: &mut dyn FnMut(&mut CodeType)) {
        for prop in self.properties.iter_mut() {
            f(&mut prop.ty);
        }
        for method in self.methods.iter_mut() {
            f(&mut method.return_type);
            for param in method.parameters.iter_mut() {
                f(&mut param.ty);
            }
        }
        if let Some(indexer) = self.indexer.as_mut() {
            f(&mut indexer.index_type);
            f(&mut indexer.return_type);
        }
    }

    /// Read-only variant of [`CodeClass::for_each_type_mut`].
    pub fn for_each_type(&self, f: &mut dyn FnMut(&SimpleType)) {
        if let Some(parent) = self.parent_class.as_ref() {
            f(parent);
        }
        for ty in &self.implements {
            f(ty);
        }
        let member_types = self
            .properties
            .iter()
            .map(|p| &p.ty)
            .chain(self.methods.iter().flat_map(|m| {
                std::iter::once(&m.return_type).chain(m.parameters.iter().map(|p| &p.ty))
            }))
            .chain(
                self.indexer
                    .iter()
                    .flat_map(|i| [&i.index_type, &i.return_type]),
            );
        for ty in member_types {
            for simple in ty.simple_types() {
                f(simple);
            }
        }
        for inner in &self.inner_classes {
            inner.for_each_type(f);
        }
    }
}

fn visit_code_type(ty: &mut CodeType, f: &mut dyn FnMut(&mut SimpleType)) {
    for simple in ty.simple_types_mut() {
        f(simple);
    }
}
