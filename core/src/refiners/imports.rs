#![deny(missing_docs)]

//! # Import Computation
//!
//! Imports are declared as tables of [`ImportEvaluator`]s: a predicate over one
//! code element plus the module and symbols it needs. Evaluating a table walks
//! every element of a top-level declaration (members and inner classes
//! included) and attaches the matching imports to that declaration.
//!
//! The other passes here derive imports from the tree itself: generated types
//! referenced across namespaces, inner-class imports and the serialization
//! modules of the client constructor.

use crate::codedom::{
    ClassKind, CodeClass, CodeEnum, CodeMethod, CodeNamespace, CodeProperty, CodeUsing, MethodKind,
    ParameterKind, PropertyKind,
};
use std::collections::BTreeSet;

/// One element an evaluator predicate is applied to.
#[derive(Debug, Clone, Copy)]
pub enum CodeElementRef<'e> {
    /// A class (top-level or inner).
    Class(&'e CodeClass),
    /// An enum.
    Enum(&'e CodeEnum),
    /// A property.
    Property(&'e CodeProperty),
    /// A method.
    Method(&'e CodeMethod),
}

/// Imports needed by every element matching `predicate`.
#[derive(Debug, Clone, Copy)]
pub struct ImportEvaluator {
    /// Selects the elements needing the imports.
    pub predicate: fn(&CodeElementRef<'_>) -> bool,
    /// Providing module, package or namespace.
    pub module: &'static str,
    /// Imported symbols; an empty list imports the module itself.
    pub symbols: &'static [&'static str],
}

impl ImportEvaluator {
    /// Creates an evaluator.
    pub fn new(
        module: &'static str,
        symbols: &'static [&'static str],
        predicate: fn(&CodeElementRef<'_>) -> bool,
    ) -> Self {
        Self {
            predicate,
            module,
            symbols,
        }
    }

    fn usings(&self) -> Vec<CodeUsing> {
        if self.symbols.is_empty() {
            vec![CodeUsing::external(self.module, "")]
        } else {
            self.symbols
                .iter()
                .map(|symbol| CodeUsing::external(self.module, *symbol))
                .collect()
        }
    }
}

// --- Predicate helpers ---

/// The element is a property of one of `kinds`.
pub fn is_property(element: &CodeElementRef<'_>, kinds: &[PropertyKind]) -> bool {
    matches!(element, CodeElementRef::Property(p) if p.is_of_kind(kinds))
}

/// The element is a method of one of `kinds`.
pub fn is_method(element: &CodeElementRef<'_>, kinds: &[MethodKind]) -> bool {
    matches!(element, CodeElementRef::Method(m) if m.is_of_kind(kinds))
}

/// The element is a method with a parameter of one of `kinds`.
pub fn has_parameter(element: &CodeElementRef<'_>, kinds: &[ParameterKind]) -> bool {
    matches!(element, CodeElementRef::Method(m) if m.parameters.iter().any(|p| p.is_of_kind(kinds)))
}

/// The element is a class of one of `kinds`.
pub fn is_class(element: &CodeElementRef<'_>, kinds: &[ClassKind]) -> bool {
    matches!(element, CodeElementRef::Class(c) if c.is_of_kind(kinds))
}

/// The element is a property or method whose type (or a parameter type) is named `name`.
pub fn uses_type(element: &CodeElementRef<'_>, name: &str) -> bool {
    match element {
        CodeElementRef::Property(p) => p.ty.simple_types().iter().any(|t| t.name == name),
        CodeElementRef::Method(m) => std::iter::once(&m.return_type)
            .chain(m.parameters.iter().map(|p| &p.ty))
            .flat_map(|ty| ty.simple_types())
            .any(|t| t.name == name),
        _ => false,
    }
}

// --- Passes ---

fn collect_class_usings(class: &CodeClass, evaluators: &[ImportEvaluator], out: &mut BTreeSet<CodeUsing>) {
    let mut apply = |element: CodeElementRef<'_>| {
        for evaluator in evaluators {
            if (evaluator.predicate)(&element) {
                out.extend(evaluator.usings());
            }
        }
    };
    apply(CodeElementRef::Class(class));
    for property in &class.properties {
        apply(CodeElementRef::Property(property));
    }
    for method in &class.methods {
        apply(CodeElementRef::Method(method));
    }
    for inner in &class.inner_classes {
        collect_class_usings(inner, evaluators, out);
    }
}

/// Evaluates `evaluators` against every element and attaches the matches to the
/// top-level declaration owning the element.
pub fn add_default_imports(root: &mut CodeNamespace, evaluators: &[ImportEvaluator]) {
    root.for_each_top_level_class_mut(&mut |_, class| {
        let mut usings = BTreeSet::new();
        collect_class_usings(class, evaluators, &mut usings);
        class.usings.extend(usings);
    });
    root.for_each_enum_mut(&mut |_, enumeration| {
        let element = CodeElementRef::Enum(enumeration);
        let usings: Vec<CodeUsing> = evaluators
            .iter()
            .filter(|e| (e.predicate)(&element))
            .flat_map(ImportEvaluator::usings)
            .collect();
        enumeration.usings.extend(usings);
    });
}

/// Imports every generated declaration a top-level class references.
///
/// # Arguments
///
/// * `root` - The tree.
/// * `include_same_namespace` - Also import declarations of the class's own
///   namespace, for languages importing per file rather than per namespace.
pub fn add_properties_and_method_types_imports(root: &mut CodeNamespace, include_same_namespace: bool) {
    root.for_each_top_level_class_mut(&mut |namespace, class| {
        let mut usings = BTreeSet::new();
        class.for_each_type(&mut |ty| {
            let Some(declaration) = ty.declaration() else {
                return;
            };
            let top_level = declaration
                .name
                .split('.')
                .next()
                .unwrap_or(&declaration.name);
            let same_namespace = declaration.namespace == namespace;
            if (same_namespace && top_level == class.name) || (same_namespace && !include_same_namespace) {
                return;
            }
            usings.insert(CodeUsing::internal(&declaration.namespace, top_level));
        });
        class.usings.extend(usings);
    });
}

/// Hoists the imports of inner classes onto their top-level class.
pub fn add_inner_classes_imports(root: &mut CodeNamespace) {
    fn drain(class: &mut CodeClass, out: &mut BTreeSet<CodeUsing>) {
        for inner in class.inner_classes.iter_mut() {
            out.append(&mut inner.usings);
            drain(inner, out);
        }
    }
    root.for_each_top_level_class_mut(&mut |_, class| {
        let mut usings = BTreeSet::new();
        drain(class, &mut usings);
        class.usings.extend(usings);
    });
}

/// Splits `module.Symbol` (or `Module\Symbol`) at its last separator.
pub fn split_qualified_symbol(qualified: &str) -> CodeUsing {
    match qualified.rfind(|c| c == '.' || c == '\\') {
        Some(index) => CodeUsing::external(&qualified[..index], &qualified[index + 1..]),
        None => CodeUsing::external(qualified, ""),
    }
}

/// Imports the serialization factories registered by the client constructor,
/// plus `extra` qualified symbols on the same class.
pub fn add_serialization_modules_import(root: &mut CodeNamespace, extra: &[&str]) {
    root.for_each_top_level_class_mut(&mut |_, class| {
        let usings: Vec<CodeUsing> = class
            .methods_of_kind(MethodKind::ClientConstructor)
            .flat_map(|m| m.serializer_modules.iter().chain(m.deserializer_modules.iter()))
            .map(|module| split_qualified_symbol(module))
            .collect();
        if usings.is_empty() {
            return;
        }
        class.usings.extend(usings);
        class
            .usings
            .extend(extra.iter().map(|qualified| split_qualified_symbol(qualified)));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::{CodeParameter, CodeType, DeclarationRef, SimpleType};
    use pretty_assertions::assert_eq;

    fn tree() -> CodeNamespace {
        let mut root = CodeNamespace::root();
        let mut builder = CodeClass::new("UsersRequestBuilder", ClassKind::RequestBuilder);
        builder
            .add_property(CodeProperty::new(
                "requestAdapter",
                PropertyKind::RequestAdapter,
                CodeType::external("IRequestAdapter"),
            ))
            .unwrap();
        let mut get = CodeMethod::new("get", MethodKind::RequestExecutor)
            .returning(CodeType::bound(DeclarationRef::class("ApiSdk.models", "User")));
        get.add_parameter(CodeParameter::new(
            "q",
            ParameterKind::QueryParameter,
            CodeType::bound(DeclarationRef::class(
                "ApiSdk.users",
                "UsersRequestBuilder.GetQueryParameters",
            )),
        ));
        builder.add_method(get).unwrap();
        builder.add_inner_class(CodeClass::new("GetQueryParameters", ClassKind::QueryParameters));
        root.ensure_namespace("ApiSdk.users").add_class(builder);

        let mut user = CodeClass::new("User", ClassKind::Model);
        user.add_property(CodeProperty::new(
            "manager",
            PropertyKind::Custom,
            CodeType::bound(DeclarationRef::class("ApiSdk.models", "Manager")),
        ))
        .unwrap();
        root.ensure_namespace("ApiSdk.models").add_class(user);
        root.ensure_namespace("ApiSdk.models")
            .add_enum(CodeEnum::new("Color", None, ["red".to_string()]));
        root
    }

    fn usings(root: &CodeNamespace, namespace: &str, class: &str) -> Vec<CodeUsing> {
        root.find_class(&DeclarationRef::class(namespace, class))
            .unwrap()
            .usings
            .iter()
            .cloned()
            .collect()
    }

    #[test]
    fn test_evaluators_attach_to_top_level_declaration() {
        let evaluators = [
            ImportEvaluator::new("Kiota.Abstractions", &["IRequestAdapter"], |e| {
                is_property(e, &[PropertyKind::RequestAdapter])
            }),
            ImportEvaluator::new("Kiota.Abstractions", &["IRequestOption"], |e| {
                has_parameter(e, &[ParameterKind::QueryParameter])
            }),
            ImportEvaluator::new("Kiota.Query", &["QueryParametersBase"], |e| {
                is_class(e, &[ClassKind::QueryParameters])
            }),
            ImportEvaluator::new("errors", &[], |e| matches!(e, CodeElementRef::Enum(_))),
        ];
        let mut root = tree();
        add_default_imports(&mut root, &evaluators);
        assert_eq!(
            usings(&root, "ApiSdk.users", "UsersRequestBuilder"),
            vec![
                CodeUsing::external("Kiota.Abstractions", "IRequestAdapter"),
                CodeUsing::external("Kiota.Abstractions", "IRequestOption"),
                CodeUsing::external("Kiota.Query", "QueryParametersBase"),
            ]
        );
        assert!(usings(&root, "ApiSdk.models", "User").is_empty());
        let color = root.find_namespace("ApiSdk.models").unwrap().enumeration("Color").unwrap();
        assert!(color.usings.contains(&CodeUsing::external("errors", "")));
    }

    #[test]
    fn test_type_imports_skip_own_namespace_unless_asked() {
        let mut root = tree();
        add_properties_and_method_types_imports(&mut root, false);
        assert_eq!(
            usings(&root, "ApiSdk.users", "UsersRequestBuilder"),
            vec![CodeUsing::internal("ApiSdk.models", "User")]
        );
        assert!(usings(&root, "ApiSdk.models", "User").is_empty());

        let mut root = tree();
        add_properties_and_method_types_imports(&mut root, true);
        assert_eq!(
            usings(&root, "ApiSdk.models", "User"),
            vec![CodeUsing::internal("ApiSdk.models", "Manager")]
        );
        assert_eq!(usings(&root, "ApiSdk.users", "UsersRequestBuilder").len(), 1);
    }

    #[test]
    fn test_inner_class_imports_are_hoisted() {
        let mut root = tree();
        let inner = root
            .find_class_mut(&DeclarationRef::class(
                "ApiSdk.users",
                "UsersRequestBuilder.GetQueryParameters",
            ))
            .unwrap();
        inner.usings.insert(CodeUsing::external("System", "String"));
        add_inner_classes_imports(&mut root);
        assert_eq!(
            usings(&root, "ApiSdk.users", "UsersRequestBuilder"),
            vec![CodeUsing::external("System", "String")]
        );
    }

    #[test]
    fn test_serialization_modules_are_imported_on_client() {
        let mut root = CodeNamespace::root();
        let mut client = CodeClass::new("ApiClient", ClassKind::RequestBuilder);
        let mut constructor = CodeMethod::new("constructor", MethodKind::ClientConstructor);
        constructor.serializer_modules = vec!["Kiota.Json.JsonSerializationWriterFactory".into()];
        constructor.deserializer_modules = vec!["Kiota\\Json\\JsonParseNodeFactory".into()];
        client.add_method(constructor).unwrap();
        client.implements.push(SimpleType::external("IClient"));
        root.ensure_namespace("ApiSdk").add_class(client);
        add_serialization_modules_import(&mut root, &["Kiota.ApiClientBuilder"]);
        assert_eq!(
            usings(&root, "ApiSdk", "ApiClient"),
            vec![
                CodeUsing::external("Kiota", "ApiClientBuilder"),
                CodeUsing::external("Kiota.Json", "JsonSerializationWriterFactory"),
                CodeUsing::external("Kiota\\Json", "JsonParseNodeFactory"),
            ]
        );
    }

    #[test]
    fn test_uses_type_matches_parameters() {
        let mut method = CodeMethod::new("post", MethodKind::RequestExecutor);
        method.add_parameter(CodeParameter::new(
            "body",
            ParameterKind::RequestBody,
            CodeType::external("binary"),
        ));
        assert!(uses_type(&CodeElementRef::Method(&method), "binary"));
        assert!(!uses_type(&CodeElementRef::Method(&method), "string"));
    }
}
