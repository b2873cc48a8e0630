#![deny(missing_docs)]

//! # Type References
//!
//! A type reference never owns the declaration it points at. Bound references
//! carry a `DeclarationRef` (namespace + name) that is looked up in the tree when
//! needed; references still waiting for the binding pass are `Pending`.

use std::fmt;

/// Collection shape wrapping a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectionKind {
    /// A single value.
    #[default]
    None,
    /// A list of primitives.
    Array,
    /// A list of declarations.
    Complex,
}

/// What a `DeclarationRef` points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    /// A top-level or inner class.
    Class,
    /// An enum.
    Enum,
}

/// Non-owning reference to a declaration, by qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclarationRef {
    /// Namespace holding the declaration.
    pub namespace: String,
    /// Declaration name. Inner classes use `Outer.Inner`.
    pub name: String,
    /// Declaration kind.
    pub kind: DeclarationKind,
}

impl DeclarationRef {
    /// Reference to a class.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind: DeclarationKind::Class,
        }
    }

    /// Reference to an enum.
    pub fn enumeration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind: DeclarationKind::Enum,
        }
    }

    /// `namespace.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    /// Simple name of the declaration (last component of an inner class path).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

impl fmt::Display for DeclarationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Binding state of a `SimpleType`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDefinition {
    /// Built-in or runtime type; needs no generated declaration.
    External,
    /// Generated type whose declaration has not been bound yet.
    Pending,
    /// Generated type bound to its declaration.
    Bound(DeclarationRef),
}

/// A single named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleType {
    /// Rendered name.
    pub name: String,
    /// Whether the value may be absent.
    pub is_nullable: bool,
    /// Collection wrapping.
    pub collection: CollectionKind,
    /// Whether the value is passed as a configuration callback.
    pub action_of: bool,
    /// Binding state.
    pub definition: TypeDefinition,
}

impl SimpleType {
    fn with(name: impl Into<String>, definition: TypeDefinition) -> Self {
        Self {
            name: name.into(),
            is_nullable: true,
            collection: CollectionKind::None,
            action_of: false,
            definition,
        }
    }

    /// A built-in type.
    pub fn external(name: impl Into<String>) -> Self {
        Self::with(name, TypeDefinition::External)
    }

    /// A generated type waiting for the binding pass.
    pub fn pending(name: impl Into<String>) -> Self {
        Self::with(name, TypeDefinition::Pending)
    }

    /// A generated type bound to `declaration`.
    pub fn bound(declaration: DeclarationRef) -> Self {
        let name = declaration.simple_name().to_string();
        Self::with(name, TypeDefinition::Bound(declaration))
    }

    /// Builder-style nullability.
    pub fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// Builder-style collection kind.
    pub fn collection(mut self, collection: CollectionKind) -> Self {
        self.collection = collection;
        self
    }

    /// True if the type resolves to a built-in/runtime type.
    pub fn is_external(&self) -> bool {
        matches!(self.definition, TypeDefinition::External)
    }

    /// True while the binding pass has not resolved the type.
    pub fn is_pending(&self) -> bool {
        matches!(self.definition, TypeDefinition::Pending)
    }

    /// Declaration the type is bound to.
    pub fn declaration(&self) -> Option<&DeclarationRef> {
        match &self.definition {
            TypeDefinition::Bound(d) => Some(d),
            _ => None,
        }
    }

    /// Binds the type, adopting the declaration's name.
    pub fn bind(&mut self, declaration: DeclarationRef) {
        self.name = declaration.simple_name().to_string();
        self.definition = TypeDefinition::Bound(declaration);
    }
}

/// "Exactly one of" a list of alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionType {
    /// Name used when the union needs a wrapper declaration.
    pub name: String,
    /// Whether the value may be absent.
    pub is_nullable: bool,
    /// Collection wrapping.
    pub collection: CollectionKind,
    /// Alternatives, in declaration order.
    pub members: Vec<SimpleType>,
}

impl UnionType {
    /// Creates an empty union.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_nullable: true,
            collection: CollectionKind::None,
            members: Vec::new(),
        }
    }

    /// Adds `member` unless an equal alternative is already present.
    pub fn add_member(&mut self, member: SimpleType) {
        let exists = self
            .members
            .iter()
            .any(|m| m.name == member.name && m.definition == member.definition);
        if !exists {
            self.members.push(member);
        }
    }
}

/// A type reference: simple or union.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeType {
    /// Single type.
    Simple(SimpleType),
    /// Alternatives.
    Union(UnionType),
}

impl CodeType {
    /// Shorthand for an external simple type.
    pub fn external(name: impl Into<String>) -> Self {
        CodeType::Simple(SimpleType::external(name))
    }

    /// Shorthand for a pending simple type.
    pub fn pending(name: impl Into<String>) -> Self {
        CodeType::Simple(SimpleType::pending(name))
    }

    /// Shorthand for a bound simple type.
    pub fn bound(declaration: DeclarationRef) -> Self {
        CodeType::Simple(SimpleType::bound(declaration))
    }

    /// The `void` return type.
    pub fn void() -> Self {
        CodeType::Simple(SimpleType::external("void").nullable(false))
    }

    /// Rendered name of the type (the union name for unions).
    pub fn name(&self) -> &str {
        match self {
            CodeType::Simple(s) => &s.name,
            CodeType::Union(u) => &u.name,
        }
    }

    /// Renames the type.
    pub fn set_name(&mut self, name: impl Into<String>) {
        match self {
            CodeType::Simple(s) => s.name = name.into(),
            CodeType::Union(u) => u.name = name.into(),
        }
    }

    /// Collection wrapping.
    pub fn collection(&self) -> CollectionKind {
        match self {
            CodeType::Simple(s) => s.collection,
            CodeType::Union(u) => u.collection,
        }
    }

    /// Sets the collection wrapping.
    pub fn set_collection(&mut self, collection: CollectionKind) {
        match self {
            CodeType::Simple(s) => s.collection = collection,
            CodeType::Union(u) => u.collection = collection,
        }
    }

    /// Whether the value may be absent.
    pub fn is_nullable(&self) -> bool {
        match self {
            CodeType::Simple(s) => s.is_nullable,
            CodeType::Union(u) => u.is_nullable,
        }
    }

    /// Sets nullability.
    pub fn set_nullable(&mut self, is_nullable: bool) {
        match self {
            CodeType::Simple(s) => s.is_nullable = is_nullable,
            CodeType::Union(u) => u.is_nullable = is_nullable,
        }
    }

    /// Whether the type is a simple external type.
    pub fn is_external(&self) -> bool {
        matches!(self, CodeType::Simple(s) if s.is_external())
    }

    /// The simple type, when not a union.
    pub fn as_simple(&self) -> Option<&SimpleType> {
        match self {
            CodeType::Simple(s) => Some(s),
            CodeType::Union(_) => None,
        }
    }

    /// Declaration of a bound simple type.
    pub fn declaration(&self) -> Option<&DeclarationRef> {
        self.as_simple().and_then(SimpleType::declaration)
    }

    /// Every simple type carried by this reference (the members for a union).
    pub fn simple_types(&self) -> Vec<&SimpleType> {
        match self {
            CodeType::Simple(s) => vec![s],
            CodeType::Union(u) => u.members.iter().collect(),
        }
    }

    /// Mutable variant of [`CodeType::simple_types`].
    pub fn simple_types_mut(&mut self) -> Vec<&mut SimpleType> {
        match self {
            CodeType::Simple(s) => vec![s],
            CodeType::Union(u) => u.members.iter_mut().collect(),
        }
    }
}

impl From<SimpleType> for CodeType {
    fn from(value: SimpleType) -> Self {
        CodeType::Simple(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_adopts_declaration_name() {
        let mut ty = SimpleType::pending("usersRequestBuilder");
        assert!(ty.is_pending());
        ty.bind(DeclarationRef::class("ApiSdk.users", "UsersRequestBuilder"));
        assert!(!ty.is_pending());
        assert_eq!(ty.name, "UsersRequestBuilder");
        assert_eq!(
            ty.declaration().map(DeclarationRef::qualified_name).as_deref(),
            Some("ApiSdk.users.UsersRequestBuilder")
        );
    }

    #[test]
    fn test_union_members_are_deduplicated() {
        let mut union = UnionType::new("PetOrString");
        union.add_member(SimpleType::external("string"));
        union.add_member(SimpleType::bound(DeclarationRef::class("ApiSdk.models", "Pet")));
        union.add_member(SimpleType::external("string"));
        assert_eq!(union.members.len(), 2);
    }

    #[test]
    fn test_inner_class_simple_name() {
        let decl = DeclarationRef::class("ApiSdk.users", "UsersRequestBuilder.GetQueryParameters");
        assert_eq!(decl.simple_name(), "GetQueryParameters");
        assert_eq!(SimpleType::bound(decl).name, "GetQueryParameters");
    }
}
