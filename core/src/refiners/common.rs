#![deny(missing_docs)]

//! # Shared Refiner Passes
//!
//! Tree rewrites used by more than one language strategy. Each pass takes the
//! whole tree and leaves it consistent: when a declaration is renamed or moved,
//! every bound reference and internal import pointing at it follows.

use crate::codedom::{
    lower_first, upper_first, ClassKind, CodeClass, CodeIndexer, CodeMethod, CodeNamespace,
    CodeParameter, CodeProperty, CodeType, CodeUsing, DeclarationKind, DeclarationRef, MethodKind,
    ParameterKind, PropertyKind, SimpleType, TypeDefinition, UnionType, Visibility,
};
use crate::error::AppResult;
use crate::oas::tree::sanitize;
use crate::refiners::reserved::{RenameFn, ReservedNames};
use heck::ToLowerCamelCase;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// --- Traversal helpers ---

/// Runs `f` on every class (inner ones included), stopping at the first error.
fn try_for_each_class(
    root: &mut CodeNamespace,
    mut f: impl FnMut(&str, &mut CodeClass) -> AppResult<()>,
) -> AppResult<()> {
    let mut outcome = Ok(());
    root.for_each_class_mut(&mut |namespace, class| {
        if outcome.is_ok() {
            outcome = f(namespace, class);
        }
    });
    outcome
}

/// Points references and internal imports at moved declarations.
fn retarget(root: &mut CodeNamespace, moves: &HashMap<DeclarationRef, DeclarationRef>) {
    if moves.is_empty() {
        return;
    }
    root.retarget_references(moves);
    let imports: HashMap<(String, String), (String, String)> = moves
        .iter()
        .filter(|(from, _)| !from.name.contains('.'))
        .map(|(from, to)| {
            (
                (from.namespace.clone(), from.name.clone()),
                (to.namespace.clone(), to.name.clone()),
            )
        })
        .collect();
    root.for_each_top_level_class_mut(&mut |_, class| {
        let usings = std::mem::take(&mut class.usings);
        class.usings = usings
            .into_iter()
            .map(|using| {
                if using.is_external {
                    return using;
                }
                match imports.get(&(using.module.clone(), using.symbol.clone())) {
                    Some((module, symbol)) => CodeUsing::internal(module, symbol),
                    None => using,
                }
            })
            .collect();
    });
}

/// Declaration paths of `class` and its inner classes, rooted at `prefix`.
fn class_paths(class: &CodeClass, prefix: &str, out: &mut Vec<String>) {
    let path = if prefix.is_empty() {
        class.name.clone()
    } else {
        format!("{}.{}", prefix, class.name)
    };
    for inner in &class.inner_classes {
        class_paths(inner, &path, out);
    }
    out.push(path);
}

/// Records the moves for a top-level class (and its inner classes) going from
/// `from_namespace.from_name` to `to_namespace.to_name`.
fn record_class_move(
    class: &CodeClass,
    from_namespace: &str,
    to_namespace: &str,
    to_name: &str,
    moves: &mut HashMap<DeclarationRef, DeclarationRef>,
) {
    let mut paths = Vec::new();
    class_paths(class, "", &mut paths);
    for path in paths {
        let suffix = path.strip_prefix(class.name.as_str()).unwrap_or("");
        moves.insert(
            DeclarationRef::class(from_namespace, path.as_str()),
            DeclarationRef::class(to_namespace, format!("{}{}", to_name, suffix)),
        );
    }
}

/// Renames every namespace segment through `f`, keeping references and
/// internal imports in step.
fn map_namespace_segments(root: &mut CodeNamespace, f: &dyn Fn(&str) -> String) {
    let map_name = |name: &str| -> String {
        if name.is_empty() {
            String::new()
        } else {
            name.split('.').map(f).collect::<Vec<_>>().join(".")
        }
    };
    root.for_each_namespace_mut(&mut |namespace| {
        namespace.name = map_name(&namespace.name);
        namespace.namespaces.sort_by(|a, b| a.name.cmp(&b.name));
    });
    root.for_each_type_mut(&mut |ty| {
        if let TypeDefinition::Bound(declaration) = &mut ty.definition {
            declaration.namespace = map_name(&declaration.namespace);
        }
    });
    root.for_each_top_level_class_mut(&mut |_, class| {
        let usings = std::mem::take(&mut class.usings);
        class.usings = usings
            .into_iter()
            .map(|mut using| {
                if !using.is_external {
                    using.module = map_name(&using.module);
                }
                using
            })
            .collect();
    });
}

// --- Naming ---

/// Which properties a reserved-name rename applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyScope {
    /// None.
    #[default]
    None,
    /// Every property.
    All,
    /// Properties that are not public.
    NonPublic,
}

/// Element kinds a reserved-name rename applies to.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameScope {
    /// Top-level class names.
    pub classes: bool,
    /// Enum names.
    pub enums: bool,
    /// Property names.
    pub properties: PropertyScope,
    /// Method names.
    pub methods: bool,
    /// Parameter names.
    pub parameters: bool,
    /// Namespace segments.
    pub namespaces: bool,
}

/// Renames identifiers colliding with `reserved` through `rename`.
///
/// Renamed properties and parameters keep their previous name as
/// serialization name, so the wire format is unchanged.
pub fn replace_reserved_names(
    root: &mut CodeNamespace,
    reserved: &ReservedNames,
    rename: RenameFn,
    scope: RenameScope,
) {
    let mut moves = HashMap::new();
    root.for_each_namespace_mut(&mut |namespace| {
        let namespace_name = namespace.name.clone();
        if scope.classes {
            for class in namespace.classes.iter_mut() {
                if reserved.contains(&class.name) {
                    let renamed = rename(&class.name);
                    record_class_move(class, &namespace_name, &namespace_name, &renamed, &mut moves);
                    class.name = renamed;
                }
            }
            namespace.classes.sort_by(|a, b| a.name.cmp(&b.name));
        }
        if scope.enums {
            for enumeration in namespace.enums.iter_mut() {
                if reserved.contains(&enumeration.name) {
                    let renamed = rename(&enumeration.name);
                    moves.insert(
                        DeclarationRef::enumeration(&namespace_name, enumeration.name.as_str()),
                        DeclarationRef::enumeration(&namespace_name, renamed.as_str()),
                    );
                    enumeration.name = renamed;
                }
            }
            namespace.enums.sort_by(|a, b| a.name.cmp(&b.name));
        }
    });

    root.for_each_class_mut(&mut |_, class| {
        for property in class.properties.iter_mut() {
            let in_scope = match scope.properties {
                PropertyScope::None => false,
                PropertyScope::All => true,
                PropertyScope::NonPublic => property.visibility != Visibility::Public,
            };
            if in_scope && reserved.contains(&property.name) {
                property
                    .serialization_name
                    .get_or_insert_with(|| property.name.clone());
                property.name = rename(&property.name);
            }
        }
        for method in class.methods.iter_mut() {
            if scope.methods && reserved.contains(&method.name) {
                method.name = rename(&method.name);
            }
            if scope.parameters {
                for parameter in method.parameters.iter_mut() {
                    if reserved.contains(&parameter.name) {
                        parameter
                            .serialization_name
                            .get_or_insert_with(|| parameter.name.clone());
                        parameter.name = rename(&parameter.name);
                    }
                }
            }
        }
    });
    retarget(root, &moves);

    if scope.namespaces {
        map_namespace_segments(root, &|segment| {
            if reserved.contains(segment) {
                rename(segment)
            } else {
                segment.to_string()
            }
        });
    }
}

/// Uppercases the first letter of every namespace segment.
pub fn capitalize_namespaces_first_letters(root: &mut CodeNamespace) {
    map_namespace_segments(root, &upper_first);
}

/// Appends `Async` to asynchronous methods.
pub fn add_async_suffix(root: &mut CodeNamespace) {
    root.for_each_class_mut(&mut |_, class| {
        for method in class.methods.iter_mut() {
            if method.is_async && !method.name.ends_with("Async") {
                method.name.push_str("Async");
            }
        }
    });
}

/// Renames properties named like their class (`_prop` suffix), which C# rejects.
pub fn disambiguate_properties_with_class_names(root: &mut CodeNamespace) {
    root.for_each_class_mut(&mut |_, class| {
        let class_name = class.name.clone();
        for property in class.properties.iter_mut() {
            if property.name.eq_ignore_ascii_case(&class_name) {
                property
                    .serialization_name
                    .get_or_insert_with(|| property.name.clone());
                property.name.push_str("_prop");
            }
        }
    });
}

// --- Shape changes ---

/// Replaces navigation properties with parameterless methods returning the same builder.
pub fn replace_request_builder_properties_by_methods(root: &mut CodeNamespace) -> AppResult<()> {
    try_for_each_class(root, |_, class| {
        if class.kind != ClassKind::RequestBuilder {
            return Ok(());
        }
        let (navigation, others): (Vec<_>, Vec<_>) = std::mem::take(&mut class.properties)
            .into_iter()
            .partition(|p| p.kind == PropertyKind::RequestBuilder);
        class.properties = others;
        for property in navigation {
            let mut return_type = property.ty;
            return_type.set_nullable(false);
            let mut method = CodeMethod::new(property.name, MethodKind::RequestBuilderBackwardCompatibility)
                .returning(return_type);
            method.description = property.description;
            class.add_method(method)?;
        }
        Ok(())
    })
}

/// Replaces indexers with `{navigation}{suffix}(id)` methods on the builders
/// navigating to the indexer's class.
pub fn replace_indexers_by_methods_with_parameter(root: &mut CodeNamespace, suffix: &str) -> AppResult<()> {
    let mut indexers = Vec::new();
    root.for_each_top_level_class_mut(&mut |namespace, class| {
        if let Some(indexer) = class.indexer.take() {
            indexers.push((DeclarationRef::class(namespace, class.name.as_str()), indexer));
        }
    });
    if indexers.is_empty() {
        return Ok(());
    }

    let by_owner: HashMap<_, _> = indexers.iter().map(|(owner, i)| (owner.clone(), i)).collect();
    let mut attached: BTreeSet<DeclarationRef> = BTreeSet::new();
    let build = |name: String, indexer: &CodeIndexer| {
        let mut method = CodeMethod::new(name, MethodKind::IndexerBackwardCompatibility)
            .returning(indexer.return_type.clone());
        method.return_type.set_nullable(false);
        method.description = indexer.description.clone();
        method.accessed_member = Some(indexer.parameter_name.clone());
        let mut parameter = CodeParameter::new(
            sanitize(&indexer.parameter_name).to_lower_camel_case(),
            ParameterKind::Path,
            indexer.index_type.clone(),
        )
        .with_description("Unique identifier of the item");
        parameter.serialization_name = Some(indexer.parameter_name.clone());
        method.add_parameter(parameter);
        method
    };

    try_for_each_class(root, |_, class| {
        if class.kind != ClassKind::RequestBuilder {
            return Ok(());
        }
        let navigation: Vec<(String, DeclarationRef)> = class
            .properties
            .iter()
            .filter(|p| p.kind == PropertyKind::RequestBuilder)
            .filter_map(|p| p.ty.declaration().map(|d| (p.name.clone(), d.clone())))
            .chain(
                class
                    .methods_of_kind(MethodKind::RequestBuilderBackwardCompatibility)
                    .filter_map(|m| m.return_type.declaration().map(|d| (m.name.clone(), d.clone()))),
            )
            .collect();
        for (name, target) in navigation {
            if let Some(indexer) = by_owner.get(&target) {
                class.add_method(build(format!("{}{}", name, suffix), *indexer))?;
                attached.insert(target);
            }
        }
        Ok(())
    })?;

    for (owner, indexer) in &indexers {
        if attached.contains(owner) {
            continue;
        }
        if let Some(class) = root.find_class_mut(owner) {
            class.add_method(build(format!("item{}", suffix), indexer))?;
        }
    }
    Ok(())
}

/// Creates the wrapper class standing in for `union`.
fn union_wrapper(name: &str, union: &UnionType, uses_backing_store: bool) -> AppResult<CodeClass> {
    let mut wrapper = CodeClass::new(name, ClassKind::UnionWrapper);
    let names: Vec<&str> = union.members.iter().map(|m| m.name.as_str()).collect();
    wrapper.description = Some(format!(
        "Composed type wrapper for classes {}",
        names.join(", ")
    ));
    for member in &union.members {
        let mut ty = member.clone().nullable(true);
        ty.action_of = false;
        let property_name = lower_first(&sanitize(&member.name));
        wrapper.add_property(
            CodeProperty::new(property_name, PropertyKind::Custom, CodeType::Simple(ty))
                .with_description(format!("Composed type representation for type {}", member.name)),
        )?;
    }
    if uses_backing_store {
        let mut backing_store = CodeProperty::new(
            "backingStore",
            PropertyKind::BackingStore,
            CodeType::Simple(SimpleType::external("IBackingStore").nullable(false)),
        )
        .with_description("Stores model information.");
        backing_store.read_only = true;
        wrapper.add_property(backing_store)?;
        wrapper.implements.push(SimpleType::external("IBackedModel"));
    }
    wrapper.add_method(CodeMethod::field_deserializers())?;
    wrapper.add_method(CodeMethod::serializer())?;
    Ok(wrapper)
}

/// Replaces every union type by a reference to a generated wrapper class,
/// declared next to the top-level class using it.
///
/// A wrapper reuses the union's name, suffixed with `Wrapper` when a
/// non-wrapper declaration already has that name.
pub fn convert_union_types_to_wrapper(root: &mut CodeNamespace, uses_backing_store: bool) -> AppResult<()> {
    let mut unions: BTreeMap<(String, String), UnionType> = BTreeMap::new();
    root.for_each_class_mut(&mut |namespace, class| {
        class.for_each_member_type_mut(&mut |ty| {
            if let CodeType::Union(union) = ty {
                unions
                    .entry((namespace.to_string(), union.name.clone()))
                    .or_insert_with(|| union.clone());
            }
        });
    });
    if unions.is_empty() {
        return Ok(());
    }

    let mut targets: HashMap<(String, String), DeclarationRef> = HashMap::new();
    let mut wrappers = Vec::new();
    for ((namespace, union_name), union) in &unions {
        let taken = root
            .find_namespace(namespace)
            .and_then(|ns| ns.class(union_name))
            .is_some_and(|c| c.kind != ClassKind::UnionWrapper)
            || root
                .find_namespace(namespace)
                .and_then(|ns| ns.enumeration(union_name))
                .is_some();
        let name = if taken {
            format!("{}Wrapper", union_name)
        } else {
            union_name.clone()
        };
        wrappers.push((namespace.clone(), union_wrapper(&name, union, uses_backing_store)?));
        targets.insert(
            (namespace.clone(), union_name.clone()),
            DeclarationRef::class(namespace.as_str(), name),
        );
    }
    for (namespace, wrapper) in wrappers {
        root.ensure_namespace(&namespace).add_class(wrapper);
    }

    root.for_each_class_mut(&mut |namespace, class| {
        class.for_each_member_type_mut(&mut |ty| {
            let replacement = match &*ty {
                CodeType::Union(union) => targets
                    .get(&(namespace.to_string(), union.name.clone()))
                    .map(|target| {
                        SimpleType::bound(target.clone())
                            .nullable(union.is_nullable)
                            .collection(union.collection)
                    }),
                CodeType::Simple(_) => None,
            };
            if let Some(simple) = replacement {
                *ty = CodeType::Simple(simple);
            }
        });
    });
    Ok(())
}

fn property_kind_for(kind: ParameterKind) -> Option<PropertyKind> {
    match kind {
        ParameterKind::RequestBody => Some(PropertyKind::RequestBody),
        ParameterKind::QueryParameter => Some(PropertyKind::QueryParameter),
        ParameterKind::Headers => Some(PropertyKind::Headers),
        ParameterKind::Options => Some(PropertyKind::Options),
        ParameterKind::ResponseHandler => Some(PropertyKind::ResponseHandler),
        _ => None,
    }
}

const BUNDLED_PARAMETERS: [ParameterKind; 5] = [
    ParameterKind::RequestBody,
    ParameterKind::QueryParameter,
    ParameterKind::Headers,
    ParameterKind::Options,
    ParameterKind::ResponseHandler,
];

/// Bundles the body, query, headers, options and response handler parameters
/// of executors and generators into one `{Class}{Method}Options` parameter set.
pub fn replace_executor_and_generator_parameters_by_parameter_sets(root: &mut CodeNamespace) -> AppResult<()> {
    let mut outcome = Ok(());
    root.for_each_top_level_class_mut(&mut |namespace, class| {
        if outcome.is_err() || class.kind != ClassKind::RequestBuilder {
            return;
        }
        outcome = bundle_parameters(namespace, class);
    });
    outcome
}

fn bundle_parameters(namespace: &str, class: &mut CodeClass) -> AppResult<()> {
    let executors: Vec<usize> = class
        .methods
        .iter()
        .enumerate()
        .filter(|(_, m)| m.kind == MethodKind::RequestExecutor)
        .filter(|(_, m)| m.parameters.iter().any(|p| p.is_of_kind(&BUNDLED_PARAMETERS)))
        .map(|(index, _)| index)
        .collect();
    for index in executors {
        let executor = &class.methods[index];
        let Some(http_method) = executor.http_method else {
            continue;
        };
        let set_name = format!("{}{}Options", class.name, http_method.pascal_name());
        let mut set = CodeClass::new(set_name.as_str(), ClassKind::ParameterSet);
        set.description = Some(format!("Options for {}", executor.name));
        for parameter in &executor.parameters {
            let Some(kind) = property_kind_for(parameter.kind) else {
                continue;
            };
            let mut property = CodeProperty::new(upper_first(&parameter.name), kind, parameter.ty.clone());
            property.description = parameter.description.clone();
            set.add_property(property)?;
        }
        let set_type = CodeType::bound(DeclarationRef::class(
            namespace,
            format!("{}.{}", class.name, set_name),
        ));
        let options = CodeParameter::new("options", ParameterKind::ParameterSet, set_type)
            .with_description("Options for the request")
            .optional(true);
        for method in class.methods.iter_mut() {
            let bundles = matches!(
                method.kind,
                MethodKind::RequestExecutor | MethodKind::RequestGenerator
            );
            if !bundles || method.http_method != Some(http_method) {
                continue;
            }
            method.remove_parameters_by_kind(&BUNDLED_PARAMETERS);
            method.add_parameter(options.clone());
        }
        class.add_inner_class(set);
    }
    Ok(())
}

/// Adds an `IsNil` method to models and union wrappers.
pub fn add_null_check_methods(root: &mut CodeNamespace) -> AppResult<()> {
    try_for_each_class(root, |_, class| {
        if !class.is_of_kind(&[ClassKind::Model, ClassKind::UnionWrapper]) {
            return Ok(());
        }
        class.add_method(
            CodeMethod::new("IsNil", MethodKind::NullCheck)
                .returning(CodeType::Simple(SimpleType::external("boolean").nullable(false))),
        )
    })
}

/// Adds a constructor taking a raw URL next to every non-root builder constructor.
pub fn add_raw_url_constructor_overload(root: &mut CodeNamespace) -> AppResult<()> {
    try_for_each_class(root, |_, class| {
        if class.kind != ClassKind::RequestBuilder {
            return Ok(());
        }
        let Some(constructor) = class.methods_of_kind(MethodKind::Constructor).next() else {
            return Ok(());
        };
        let mut overload = CodeMethod::new(constructor.name.as_str(), MethodKind::RawUrlConstructor);
        overload.description = constructor.description.clone();
        overload.add_parameter(
            CodeParameter::new(
                "rawUrl",
                ParameterKind::RawUrl,
                CodeType::Simple(SimpleType::external("string").nullable(false)),
            )
            .with_description("The raw URL to use for the request builder."),
        );
        if let Some(adapter) = constructor.parameter_of_kind(ParameterKind::RequestAdapter) {
            overload.add_parameter(adapter.clone());
        }
        class.add_method(overload)
    })
}

/// Adds a constructor to classes carrying properties with default values.
///
/// # Arguments
///
/// * `root` - The tree.
/// * `add_if_inherited` - Also add one to derived models without defaults, so
///   the base initialization runs.
pub fn add_constructors_for_default_values(root: &mut CodeNamespace, add_if_inherited: bool) -> AppResult<()> {
    try_for_each_class(root, |_, class| {
        let has_constructor = class
            .methods
            .iter()
            .any(|m| m.is_of_kind(&[MethodKind::Constructor, MethodKind::ClientConstructor]));
        if has_constructor || !class.kind.allows_method(MethodKind::Constructor) {
            return Ok(());
        }
        let has_defaults = class.properties.iter().any(|p| p.default_value.is_some());
        let inherits = add_if_inherited && class.parent_class.is_some();
        if !has_defaults && !inherits {
            return Ok(());
        }
        let description = format!("Instantiates a new {} and sets the default values.", class.name);
        class.add_method(CodeMethod::new("constructor", MethodKind::Constructor).with_description(description))
    })
}

/// Adds get/set accessors for model properties of `kinds`, then makes the
/// properties private.
pub fn add_getter_and_setter_methods(root: &mut CodeNamespace, kinds: &[PropertyKind]) -> AppResult<()> {
    try_for_each_class(root, |_, class| {
        if !class.is_of_kind(&[ClassKind::Model, ClassKind::UnionWrapper]) {
            return Ok(());
        }
        let mut accessors = Vec::new();
        for property in class.properties.iter_mut() {
            if !property.is_of_kind(kinds) {
                continue;
            }
            property.visibility = Visibility::Private;
            let accessor = upper_first(&property.name);
            let mut getter = CodeMethod::new(format!("get{}", accessor), MethodKind::Getter)
                .returning(property.ty.clone());
            getter.description = property.description.clone();
            getter.accessed_member = Some(property.name.clone());
            accessors.push(getter);
            if property.read_only {
                continue;
            }
            let mut setter = CodeMethod::new(format!("set{}", accessor), MethodKind::Setter);
            setter.description = property.description.clone();
            setter.accessed_member = Some(property.name.clone());
            setter.add_parameter(
                CodeParameter::new("value", ParameterKind::SetterValue, property.ty.clone())
                    .with_description(format!("Value to set for the {} property.", property.name)),
            );
            accessors.push(setter);
        }
        for accessor in accessors {
            class.add_method(accessor)?;
        }
        Ok(())
    })
}

/// Removes the cancellation token parameter from executors.
pub fn remove_cancellation_parameter(root: &mut CodeNamespace) {
    root.for_each_class_mut(&mut |_, class| {
        for method in class.methods.iter_mut() {
            if method.kind == MethodKind::RequestExecutor {
                method.remove_parameters_by_kind(&[ParameterKind::Cancellation]);
            }
        }
    });
}

/// Retypes the headers parameter of executors and generators.
pub fn patch_header_parameters_type(root: &mut CodeNamespace, type_name: &str) {
    root.for_each_class_mut(&mut |_, class| {
        for method in class.methods.iter_mut() {
            for parameter in method.parameters.iter_mut() {
                if parameter.kind == ParameterKind::Headers {
                    parameter.ty = CodeType::external(type_name);
                }
            }
        }
    });
}

/// Renames external types found in `table` (`(from, to)` pairs).
pub fn rename_external_types(ty: &mut CodeType, table: &[(&str, &str)]) {
    for simple in ty.simple_types_mut() {
        if !simple.is_external() {
            continue;
        }
        if let Some((_, to)) = table.iter().find(|(from, _)| *from == simple.name) {
            simple.name = to.to_string();
        }
    }
}

/// Per-member corrections of runtime type names for one language.
pub struct CoreTypeCorrections {
    /// Applied to every method, with the owning class name.
    pub method: fn(&str, &mut CodeMethod),
    /// Applied to every property.
    pub property: fn(&mut CodeProperty),
}

/// Renames runtime types to the names of the target language's runtime.
pub fn correct_core_type(root: &mut CodeNamespace, corrections: &CoreTypeCorrections) {
    root.for_each_class_mut(&mut |_, class| {
        let class_name = class.name.clone();
        for method in class.methods.iter_mut() {
            (corrections.method)(&class_name, method);
        }
        for property in class.properties.iter_mut() {
            (corrections.property)(property);
        }
    });
}

/// Renames `binary` to the native stream type and imports it from `module`
/// (no import when `module` is empty).
pub fn replace_binary_by_native_type(root: &mut CodeNamespace, symbol: &str, module: &str) {
    root.for_each_top_level_class_mut(&mut |_, class| {
        let mut replaced = false;
        class.for_each_type_mut(&mut |ty| {
            if ty.is_external() && ty.name == "binary" {
                ty.name = symbol.to_string();
                replaced = true;
            }
        });
        if replaced && !module.is_empty() {
            class.usings.insert(CodeUsing::external(module, symbol));
        }
    });
}

/// Makes root models and wrappers implement the runtime's parsable interface.
pub fn add_parsable_implements(root: &mut CodeNamespace, interface: &str, module: &str) {
    root.for_each_class_mut(&mut |_, class| {
        if !class.is_of_kind(&[ClassKind::Model, ClassKind::UnionWrapper]) || class.parent_class.is_some() {
            return;
        }
        if !class.implements.iter().any(|i| i.name == interface) {
            class.implements.insert(0, SimpleType::external(interface));
        }
    });
    root.for_each_top_level_class_mut(&mut |_, class| {
        let mut implements_interface = false;
        class.for_each_type(&mut |ty| implements_interface |= ty.is_external() && ty.name == interface);
        if implements_interface && !module.is_empty() {
            class.usings.insert(CodeUsing::external(module, interface));
        }
    });
}

fn is_enum_reference(ty: &CodeType) -> bool {
    ty.declaration().is_some_and(|d| d.kind == DeclarationKind::Enum)
}

/// Makes model properties typed by an enum nullable.
pub fn make_enum_properties_nullable(root: &mut CodeNamespace) {
    root.for_each_class_mut(&mut |_, class| {
        if class.kind != ClassKind::Model {
            return;
        }
        for property in class.properties.iter_mut() {
            if is_enum_reference(&property.ty) {
                property.ty.set_nullable(true);
            }
        }
    });
}

/// Makes every model field nullable.
pub fn make_model_properties_nullable(root: &mut CodeNamespace) {
    root.for_each_class_mut(&mut |_, class| {
        if class.kind != ClassKind::Model {
            return;
        }
        for property in class.properties.iter_mut() {
            if property.kind == PropertyKind::Custom {
                property.ty.set_nullable(true);
            }
        }
    });
}

/// Imports `module` into every enum file.
pub fn add_error_import_for_enums(root: &mut CodeNamespace, module: &str) {
    root.for_each_enum_mut(&mut |_, enumeration| {
        enumeration.usings.insert(CodeUsing::external(module, ""));
    });
}

/// Replaces the configured serialization factories of the client constructor
/// when they are still the defaults, which name another language's runtime.
pub fn replace_default_serialization_modules(root: &mut CodeNamespace, defaults: &[String], modules: &[&str]) {
    root.for_each_class_mut(&mut |_, class| {
        for method in class.methods.iter_mut() {
            if method.kind == MethodKind::ClientConstructor && method.serializer_modules == defaults {
                method.serializer_modules = modules.iter().map(|m| m.to_string()).collect();
            }
        }
    });
}

/// Parse node counterpart of [`replace_default_serialization_modules`].
pub fn replace_default_deserialization_modules(root: &mut CodeNamespace, defaults: &[String], modules: &[&str]) {
    root.for_each_class_mut(&mut |_, class| {
        for method in class.methods.iter_mut() {
            if method.kind == MethodKind::ClientConstructor && method.deserializer_modules == defaults {
                method.deserializer_modules = modules.iter().map(|m| m.to_string()).collect();
            }
        }
    });
}

// --- Relocations ---

/// Moves every model declaration found under `models_namespace` into it, for
/// languages where a package cannot import its parent.
///
/// A declaration whose name is already taken in the target stays in place.
pub fn move_all_models_to_top_level(root: &mut CodeNamespace, models_namespace: &str) {
    let prefix = format!("{}.", models_namespace);
    let mut moved_classes = Vec::new();
    let mut moved_enums = Vec::new();
    root.for_each_namespace_mut(&mut |namespace| {
        if !namespace.name.starts_with(&prefix) {
            return;
        }
        let name = namespace.name.clone();
        moved_classes.extend(namespace.classes.drain(..).map(|c| (name.clone(), c)));
        moved_enums.extend(namespace.enums.drain(..).map(|e| (name.clone(), e)));
    });
    if moved_classes.is_empty() && moved_enums.is_empty() {
        return;
    }

    let mut moves = HashMap::new();
    for (from, class) in moved_classes {
        let target = root.ensure_namespace(models_namespace);
        if target.class(&class.name).is_some() {
            root.ensure_namespace(&from).add_class(class);
            continue;
        }
        record_class_move(&class, &from, models_namespace, &class.name, &mut moves);
        target.add_class(class);
    }
    for (from, enumeration) in moved_enums {
        let target = root.ensure_namespace(models_namespace);
        if target.enumeration(&enumeration.name).is_some() {
            root.ensure_namespace(&from).add_enum(enumeration);
            continue;
        }
        moves.insert(
            DeclarationRef::enumeration(from.as_str(), enumeration.name.as_str()),
            DeclarationRef::enumeration(models_namespace, enumeration.name.as_str()),
        );
        target.add_enum(enumeration);
    }
    retarget(root, &moves);
    prune_empty_namespaces(root, models_namespace);
}

fn prune_empty_namespaces(root: &mut CodeNamespace, keep: &str) {
    root.for_each_namespace_mut(&mut |namespace| {
        namespace
            .namespaces
            .retain(|child| !child.is_empty() || keep.starts_with(child.name.as_str()));
    });
}

/// Moves a class into the sibling namespace carrying its name (`models.Message`
/// next to `models.message`), where the two would otherwise collide.
pub fn move_classes_with_namespace_names_under_namespace(root: &mut CodeNamespace) {
    let mut relocations = Vec::new();
    for namespace in root.all_namespaces() {
        for class in &namespace.classes {
            if let Some(child) = namespace
                .namespaces
                .iter()
                .find(|child| child.short_name().eq_ignore_ascii_case(&class.name))
            {
                if child.class(&class.name).is_none() {
                    relocations.push((namespace.name.clone(), class.name.clone(), child.name.clone()));
                }
            }
        }
    }
    let mut moves = HashMap::new();
    for (from, name, to) in relocations {
        let Some(class) = root.find_namespace_mut(&from).and_then(|ns| ns.remove_class(&name)) else {
            continue;
        };
        record_class_move(&class, &from, &to, &name, &mut moves);
        root.ensure_namespace(&to).add_class(class);
    }
    retarget(root, &moves);
}

/// Lifts inner classes to their namespace, named `{Outer}{Inner}` when
/// `prefix_with_parent` is set.
pub fn move_inner_classes_to_top_level(root: &mut CodeNamespace, prefix_with_parent: bool) {
    let mut moves = HashMap::new();
    root.for_each_namespace_mut(&mut |namespace| {
        let namespace_name = namespace.name.clone();
        let mut lifted = Vec::new();
        for class in namespace.classes.iter_mut() {
            let path = class.name.clone();
            lift_inner_classes(class, &path, prefix_with_parent, &namespace_name, &mut lifted, &mut moves);
        }
        for class in lifted {
            namespace.add_class(class);
        }
    });
    retarget(root, &moves);
}

fn lift_inner_classes(
    class: &mut CodeClass,
    path: &str,
    prefix_with_parent: bool,
    namespace: &str,
    lifted: &mut Vec<CodeClass>,
    moves: &mut HashMap<DeclarationRef, DeclarationRef>,
) {
    for mut inner in std::mem::take(&mut class.inner_classes) {
        let inner_path = format!("{}.{}", path, inner.name);
        lift_inner_classes(&mut inner, &inner_path, prefix_with_parent, namespace, lifted, moves);
        let lifted_name = if prefix_with_parent && !inner.name.starts_with(&class.name) {
            format!("{}{}", class.name, inner.name)
        } else {
            inner.name.clone()
        };
        moves.insert(
            DeclarationRef::class(namespace, inner_path.as_str()),
            DeclarationRef::class(namespace, lifted_name.as_str()),
        );
        inner.name = lifted_name;
        lifted.push(inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::CodeEnum;
    use crate::oas::HttpMethod;
    use crate::refiners::reserved;
    use pretty_assertions::assert_eq;

    fn request_builder(name: &str) -> CodeClass {
        let mut class = CodeClass::new(name, ClassKind::RequestBuilder);
        let mut constructor = CodeMethod::new("constructor", MethodKind::Constructor);
        constructor.add_parameter(CodeParameter::new(
            "requestAdapter",
            ParameterKind::RequestAdapter,
            CodeType::external("IRequestAdapter"),
        ));
        class.add_method(constructor).unwrap();
        class
    }

    fn executor(method: HttpMethod, return_type: CodeType) -> CodeMethod {
        let mut executor = CodeMethod::new(method.as_str(), MethodKind::RequestExecutor).returning(return_type);
        executor.http_method = Some(method);
        executor.is_async = true;
        for (name, kind) in [
            ("body", ParameterKind::RequestBody),
            ("h", ParameterKind::Headers),
            ("o", ParameterKind::Options),
            ("cancellationToken", ParameterKind::Cancellation),
        ] {
            executor.add_parameter(CodeParameter::new(name, kind, CodeType::external("object")));
        }
        executor
    }

    fn class<'r>(root: &'r CodeNamespace, namespace: &str, name: &str) -> &'r CodeClass {
        root.find_class(&DeclarationRef::class(namespace, name))
            .unwrap_or_else(|| panic!("missing {}.{}", namespace, name))
    }

    fn model(name: &str) -> CodeClass {
        let mut class = CodeClass::new(name, ClassKind::Model);
        class.add_method(CodeMethod::serializer()).unwrap();
        class
    }

    #[test]
    fn test_reserved_class_rename_retargets_references() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.models").add_class(model("Event"));
        let mut user = model("User");
        user.add_property(CodeProperty::new(
            "event",
            PropertyKind::Custom,
            CodeType::bound(DeclarationRef::class("ApiSdk.models", "Event")),
        ))
        .unwrap();
        user.usings.insert(CodeUsing::internal("ApiSdk.models", "Event"));
        root.ensure_namespace("ApiSdk.models").add_class(user);

        let scope = RenameScope {
            classes: true,
            properties: PropertyScope::All,
            ..RenameScope::default()
        };
        replace_reserved_names(&mut root, &reserved::CSHARP, reserved::escaped_suffix, scope);

        let user = class(&root, "ApiSdk.models", "User");
        let property = &user.properties[0];
        assert_eq!(property.name, "eventEscaped");
        assert_eq!(property.serialization_name.as_deref(), Some("event"));
        assert_eq!(
            property.ty.declaration(),
            Some(&DeclarationRef::class("ApiSdk.models", "EventEscaped"))
        );
        assert!(user.usings.contains(&CodeUsing::internal("ApiSdk.models", "EventEscaped")));
        assert!(root.find_namespace("ApiSdk.models").unwrap().class("EventEscaped").is_some());
    }

    #[test]
    fn test_non_public_property_scope() {
        let mut root = CodeNamespace::root();
        let mut builder = request_builder("UsersRequestBuilder");
        builder
            .add_property(
                CodeProperty::new("type", PropertyKind::UrlTemplate, CodeType::external("string"))
                    .with_visibility(Visibility::Private),
            )
            .unwrap();
        builder
            .add_property(CodeProperty::new(
                "range",
                PropertyKind::RequestBuilder,
                CodeType::external("string"),
            ))
            .unwrap();
        root.ensure_namespace("ApiSdk.users").add_class(builder);
        let scope = RenameScope {
            properties: PropertyScope::NonPublic,
            ..RenameScope::default()
        };
        replace_reserved_names(&mut root, &reserved::GO, reserved::underscore_escaped, scope);
        let names: Vec<_> = class(&root, "ApiSdk.users", "UsersRequestBuilder")
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["type_escaped", "range"]);
    }

    #[test]
    fn test_namespace_segments_are_renamed_everywhere() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.type").add_class(request_builder("TypeRequestBuilder"));
        let mut client = request_builder("ApiClient");
        client
            .add_property(CodeProperty::new(
                "type",
                PropertyKind::RequestBuilder,
                CodeType::bound(DeclarationRef::class("ApiSdk.type", "TypeRequestBuilder")),
            ))
            .unwrap();
        client.usings.insert(CodeUsing::internal("ApiSdk.type", "TypeRequestBuilder"));
        root.ensure_namespace("ApiSdk").add_class(client);

        let scope = RenameScope {
            namespaces: true,
            ..RenameScope::default()
        };
        replace_reserved_names(&mut root, &reserved::GO, reserved::underscore_escaped, scope);
        assert!(root.find_namespace("ApiSdk.type_escaped").is_some());
        let client = class(&root, "ApiSdk", "ApiClient");
        assert_eq!(
            client.properties[0].ty.declaration().map(|d| d.namespace.as_str()),
            Some("ApiSdk.type_escaped")
        );
        assert!(client
            .usings
            .contains(&CodeUsing::internal("ApiSdk.type_escaped", "TypeRequestBuilder")));
    }

    #[test]
    fn test_capitalize_namespaces() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.users.item").add_class(request_builder("UsersItemRequestBuilder"));
        capitalize_namespaces_first_letters(&mut root);
        let names: Vec<_> = root.all_namespaces().iter().map(|ns| ns.name.clone()).collect();
        assert_eq!(names, vec!["", "ApiSdk", "ApiSdk.Users", "ApiSdk.Users.Item"]);
    }

    #[test]
    fn test_async_suffix_and_disambiguation() {
        let mut root = CodeNamespace::root();
        let mut builder = request_builder("UsersRequestBuilder");
        builder.add_method(executor(HttpMethod::Get, CodeType::void())).unwrap();
        root.ensure_namespace("ApiSdk.users").add_class(builder);
        let mut message = model("Message");
        message
            .add_property(CodeProperty::new("message", PropertyKind::Custom, CodeType::external("string")))
            .unwrap();
        root.ensure_namespace("ApiSdk.models").add_class(message);

        add_async_suffix(&mut root);
        disambiguate_properties_with_class_names(&mut root);
        assert!(class(&root, "ApiSdk.users", "UsersRequestBuilder").method("getAsync").is_some());
        let property = &class(&root, "ApiSdk.models", "Message").properties[0];
        assert_eq!(property.name, "message_prop");
        assert_eq!(property.wire_name(), "message");
    }

    #[test]
    fn test_navigation_properties_become_methods() {
        let mut root = CodeNamespace::root();
        let mut client = request_builder("ApiClient");
        client
            .add_property(CodeProperty::new(
                "users",
                PropertyKind::RequestBuilder,
                CodeType::bound(DeclarationRef::class("ApiSdk.users", "UsersRequestBuilder")),
            ))
            .unwrap();
        root.ensure_namespace("ApiSdk").add_class(client);
        replace_request_builder_properties_by_methods(&mut root).unwrap();
        let client = class(&root, "ApiSdk", "ApiClient");
        assert!(client.properties.is_empty());
        let method = client.method("users").unwrap();
        assert_eq!(method.kind, MethodKind::RequestBuilderBackwardCompatibility);
        assert!(!method.return_type.is_nullable());
    }

    #[test]
    fn test_indexers_become_by_id_methods_on_navigating_class() {
        let mut root = CodeNamespace::root();
        let users = DeclarationRef::class("ApiSdk.users", "UsersRequestBuilder");
        let mut client = request_builder("ApiClient");
        client
            .add_property(CodeProperty::new("users", PropertyKind::RequestBuilder, CodeType::bound(users.clone())))
            .unwrap();
        root.ensure_namespace("ApiSdk").add_class(client);
        let mut builder = request_builder("UsersRequestBuilder");
        builder.indexer = Some(CodeIndexer {
            name: "userId-indexer".into(),
            description: Some("Gets an item from the users collection".into()),
            parameter_name: "user-id".into(),
            path_segment: "users".into(),
            index_type: CodeType::Simple(SimpleType::external("string").nullable(false)),
            return_type: CodeType::bound(DeclarationRef::class("ApiSdk.users.item", "UsersItemRequestBuilder")),
        });
        root.ensure_namespace("ApiSdk.users").add_class(builder);

        replace_indexers_by_methods_with_parameter(&mut root, "ById").unwrap();
        assert!(class(&root, "ApiSdk.users", "UsersRequestBuilder").indexer.is_none());
        let method = class(&root, "ApiSdk", "ApiClient").method("usersById").unwrap();
        assert_eq!(method.kind, MethodKind::IndexerBackwardCompatibility);
        assert_eq!(method.accessed_member.as_deref(), Some("user-id"));
        assert_eq!(method.parameters[0].name, "userId");
        assert_eq!(method.return_type.name(), "UsersItemRequestBuilder");
    }

    #[test]
    fn test_union_types_get_wrappers() {
        let mut root = CodeNamespace::root();
        let mut union = UnionType::new("PetsGetResponse");
        union.add_member(SimpleType::external("string"));
        union.add_member(SimpleType::bound(DeclarationRef::class("ApiSdk.models", "Pet")));
        let mut builder = request_builder("PetsRequestBuilder");
        builder
            .add_method(executor(HttpMethod::Get, CodeType::Union(union.clone())))
            .unwrap();
        root.ensure_namespace("ApiSdk.pets").add_class(builder);

        convert_union_types_to_wrapper(&mut root, false).unwrap();
        let builder = class(&root, "ApiSdk.pets", "PetsRequestBuilder");
        assert_eq!(
            builder.method("get").unwrap().return_type.declaration(),
            Some(&DeclarationRef::class("ApiSdk.pets", "PetsGetResponse"))
        );
        let wrapper = class(&root, "ApiSdk.pets", "PetsGetResponse");
        assert_eq!(wrapper.kind, ClassKind::UnionWrapper);
        let names: Vec<_> = wrapper.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["string", "pet"]);
        assert!(wrapper.methods_of_kind(MethodKind::Serializer).next().is_some());
    }

    #[test]
    fn test_union_wrapper_avoids_taken_name() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.pets").add_class(model("PetsGetResponse"));
        let mut union = UnionType::new("PetsGetResponse");
        union.add_member(SimpleType::external("string"));
        union.add_member(SimpleType::external("integer"));
        let mut builder = request_builder("PetsRequestBuilder");
        builder.add_method(executor(HttpMethod::Get, CodeType::Union(union))).unwrap();
        root.ensure_namespace("ApiSdk.pets").add_class(builder);
        convert_union_types_to_wrapper(&mut root, true).unwrap();
        let wrapper = class(&root, "ApiSdk.pets", "PetsGetResponseWrapper");
        assert!(wrapper.property_of_kind(PropertyKind::BackingStore).is_some());
    }

    #[test]
    fn test_parameter_sets_bundle_request_parameters() {
        let mut root = CodeNamespace::root();
        let mut builder = request_builder("UsersRequestBuilder");
        builder.add_method(executor(HttpMethod::Post, CodeType::void())).unwrap();
        let mut generator = CodeMethod::new("CreatePostRequestInformation", MethodKind::RequestGenerator);
        generator.http_method = Some(HttpMethod::Post);
        generator.add_parameter(CodeParameter::new("h", ParameterKind::Headers, CodeType::external("object")));
        builder.add_method(generator).unwrap();
        root.ensure_namespace("ApiSdk.users").add_class(builder);

        replace_executor_and_generator_parameters_by_parameter_sets(&mut root).unwrap();
        let builder = class(&root, "ApiSdk.users", "UsersRequestBuilder");
        let set = builder.inner_class("UsersRequestBuilderPostOptions").unwrap();
        let properties: Vec<_> = set.properties.iter().map(|p| (p.name.as_str(), p.kind)).collect();
        assert_eq!(
            properties,
            vec![
                ("Body", PropertyKind::RequestBody),
                ("H", PropertyKind::Headers),
                ("O", PropertyKind::Options),
            ]
        );
        let post = builder.method("post").unwrap();
        let params: Vec<_> = post.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["cancellationToken", "options"]);
        let generator = builder.method("CreatePostRequestInformation").unwrap();
        assert_eq!(generator.parameters.len(), 1);
        assert_eq!(
            generator.parameters[0].ty.declaration(),
            Some(&DeclarationRef::class(
                "ApiSdk.users",
                "UsersRequestBuilder.UsersRequestBuilderPostOptions"
            ))
        );
    }

    #[test]
    fn test_raw_url_ctor_and_default_value_ctor() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.users").add_class(request_builder("UsersRequestBuilder"));
        let mut user = model("User");
        user.add_property(
            CodeProperty::new("additionalData", PropertyKind::AdditionalData, CodeType::external("object"))
                .with_default("new Dictionary<string, object>()"),
        )
        .unwrap();
        root.ensure_namespace("ApiSdk.models").add_class(user);
        let mut derived = model("Admin");
        derived.parent_class = Some(SimpleType::bound(DeclarationRef::class("ApiSdk.models", "User")));
        root.ensure_namespace("ApiSdk.models").add_class(derived);

        add_raw_url_constructor_overload(&mut root).unwrap();
        add_constructors_for_default_values(&mut root, false).unwrap();
        let overload = class(&root, "ApiSdk.users", "UsersRequestBuilder")
            .methods_of_kind(MethodKind::RawUrlConstructor)
            .next()
            .unwrap();
        let params: Vec<_> = overload.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["rawUrl", "requestAdapter"]);
        assert!(class(&root, "ApiSdk.models", "User").methods_of_kind(MethodKind::Constructor).next().is_some());
        assert!(class(&root, "ApiSdk.models", "Admin").methods_of_kind(MethodKind::Constructor).next().is_none());

        add_constructors_for_default_values(&mut root, true).unwrap();
        assert!(class(&root, "ApiSdk.models", "Admin").methods_of_kind(MethodKind::Constructor).next().is_some());
    }

    #[test]
    fn test_getters_and_setters_privatize_properties() {
        let mut root = CodeNamespace::root();
        let mut user = model("User");
        user.add_property(CodeProperty::new("displayName", PropertyKind::Custom, CodeType::external("string")))
            .unwrap();
        let mut id = CodeProperty::new("id", PropertyKind::Custom, CodeType::external("string"));
        id.read_only = true;
        user.add_property(id).unwrap();
        root.ensure_namespace("ApiSdk.models").add_class(user);
        add_getter_and_setter_methods(&mut root, &[PropertyKind::Custom]).unwrap();
        let user = class(&root, "ApiSdk.models", "User");
        assert!(user.properties.iter().all(|p| p.visibility == Visibility::Private));
        let accessors: Vec<_> = user
            .methods
            .iter()
            .filter(|m| m.is_of_kind(&[MethodKind::Getter, MethodKind::Setter]))
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(accessors, vec!["getDisplayName", "setDisplayName", "getId"]);
    }

    #[test]
    fn test_type_patches() {
        let mut root = CodeNamespace::root();
        let mut builder = request_builder("FilesRequestBuilder");
        let mut put = executor(HttpMethod::Put, CodeType::external("binary"));
        put.parameters[0].ty = CodeType::external("binary");
        builder.add_method(put).unwrap();
        root.ensure_namespace("ApiSdk.files").add_class(builder);
        let mut pet = model("Pet");
        pet.add_property(CodeProperty::new(
            "status",
            PropertyKind::Custom,
            CodeType::Simple(
                SimpleType::bound(DeclarationRef::enumeration("ApiSdk.models", "Status")).nullable(false),
            ),
        ))
        .unwrap();
        root.ensure_namespace("ApiSdk.models").add_class(pet);
        root.ensure_namespace("ApiSdk.models")
            .add_enum(CodeEnum::new("Status", None, ["alive".to_string()]));

        remove_cancellation_parameter(&mut root);
        patch_header_parameters_type(&mut root, "map[string]string");
        replace_binary_by_native_type(&mut root, "Stream", "System.IO");
        make_enum_properties_nullable(&mut root);
        add_parsable_implements(&mut root, "IParsable", "Kiota.Serialization");
        add_null_check_methods(&mut root).unwrap();
        add_error_import_for_enums(&mut root, "errors");

        let builder = class(&root, "ApiSdk.files", "FilesRequestBuilder");
        let put = builder.method("put").unwrap();
        assert_eq!(put.return_type.name(), "Stream");
        assert_eq!(put.parameters[0].ty.name(), "Stream");
        assert!(put.parameter_of_kind(ParameterKind::Cancellation).is_none());
        assert_eq!(put.parameter_of_kind(ParameterKind::Headers).unwrap().ty.name(), "map[string]string");
        assert!(builder.usings.contains(&CodeUsing::external("System.IO", "Stream")));

        let pet = class(&root, "ApiSdk.models", "Pet");
        assert!(pet.properties[0].ty.is_nullable());
        assert_eq!(pet.implements[0].name, "IParsable");
        assert!(pet.usings.contains(&CodeUsing::external("Kiota.Serialization", "IParsable")));
        assert!(pet.method("IsNil").is_some());
        let status = root.find_namespace("ApiSdk.models").unwrap().enumeration("Status").unwrap();
        assert!(status.usings.contains(&CodeUsing::external("errors", "")));
    }

    #[test]
    fn test_rename_external_types_leaves_generated_types() {
        let mut union = UnionType::new("Mixed");
        union.add_member(SimpleType::external("IParseNode"));
        union.add_member(SimpleType::bound(DeclarationRef::class("ApiSdk.models", "IParseNode")));
        let mut ty = CodeType::Union(union);
        rename_external_types(&mut ty, &[("IParseNode", "ParseNode")]);
        let names: Vec<_> = ty.simple_types().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, vec!["ParseNode", "IParseNode"]);
    }

    #[test]
    fn test_default_serialization_modules_are_replaced() {
        let mut root = CodeNamespace::root();
        let mut client = request_builder("ApiClient");
        let mut constructor = CodeMethod::new("constructor", MethodKind::ClientConstructor);
        constructor.serializer_modules = vec!["Default.Writer".into()];
        constructor.deserializer_modules = vec!["Custom.Parser".into()];
        client.add_method(constructor).unwrap();
        root.ensure_namespace("ApiSdk").add_class(client);
        replace_default_serialization_modules(&mut root, &["Default.Writer".to_string()], &["go.Writer"]);
        replace_default_deserialization_modules(&mut root, &["Default.Parser".to_string()], &["go.Parser"]);
        let constructor = class(&root, "ApiSdk", "ApiClient")
            .methods_of_kind(MethodKind::ClientConstructor)
            .next()
            .unwrap();
        assert_eq!(constructor.serializer_modules, vec!["go.Writer"]);
        assert_eq!(constructor.deserializer_modules, vec!["Custom.Parser"]);
    }

    #[test]
    fn test_models_move_to_top_level_namespace() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.models.microsoft.graph").add_class(model("User"));
        root.ensure_namespace("ApiSdk.models.microsoft.graph")
            .add_enum(CodeEnum::new("Kind", None, ["a".to_string()]));
        root.ensure_namespace("ApiSdk.models").add_class(model("Thing"));
        let mut builder = request_builder("UsersRequestBuilder");
        builder
            .add_method(executor(
                HttpMethod::Get,
                CodeType::bound(DeclarationRef::class("ApiSdk.models.microsoft.graph", "User")),
            ))
            .unwrap();
        root.ensure_namespace("ApiSdk.users").add_class(builder);

        move_all_models_to_top_level(&mut root, "ApiSdk.models");
        let models = root.find_namespace("ApiSdk.models").unwrap();
        let names: Vec<_> = models.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Thing", "User"]);
        assert!(models.enumeration("Kind").is_some());
        assert!(models.namespaces.is_empty());
        assert_eq!(
            class(&root, "ApiSdk.users", "UsersRequestBuilder")
                .method("get")
                .unwrap()
                .return_type
                .declaration(),
            Some(&DeclarationRef::class("ApiSdk.models", "User"))
        );
    }

    #[test]
    fn test_class_moves_under_namespace_of_same_name() {
        let mut root = CodeNamespace::root();
        root.ensure_namespace("ApiSdk.models").add_class(model("Message"));
        root.ensure_namespace("ApiSdk.models.message").add_class(model("Attachment"));
        move_classes_with_namespace_names_under_namespace(&mut root);
        assert!(root.find_namespace("ApiSdk.models").unwrap().class("Message").is_none());
        assert!(root.find_namespace("ApiSdk.models.message").unwrap().class("Message").is_some());
    }

    #[test]
    fn test_inner_classes_are_lifted_with_prefix() {
        let mut root = CodeNamespace::root();
        let mut builder = request_builder("UsersRequestBuilder");
        builder.add_inner_class(CodeClass::new("GetQueryParameters", ClassKind::QueryParameters));
        let mut get = executor(HttpMethod::Get, CodeType::void());
        get.add_parameter(CodeParameter::new(
            "q",
            ParameterKind::QueryParameter,
            CodeType::bound(DeclarationRef::class("ApiSdk.users", "UsersRequestBuilder.GetQueryParameters")),
        ));
        builder.add_method(get).unwrap();
        root.ensure_namespace("ApiSdk.users").add_class(builder);

        move_inner_classes_to_top_level(&mut root, true);
        let users = root.find_namespace("ApiSdk.users").unwrap();
        assert!(users.class("UsersRequestBuilderGetQueryParameters").is_some());
        let builder = users.class("UsersRequestBuilder").unwrap();
        assert!(builder.inner_classes.is_empty());
        assert_eq!(
            builder.method("get").unwrap().parameter_of_kind(ParameterKind::QueryParameter).unwrap().ty.declaration(),
            Some(&DeclarationRef::class("ApiSdk.users", "UsersRequestBuilderGetQueryParameters"))
        );
    }
}
