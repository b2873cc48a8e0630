//! # PHP Refiner
//!
//! PSR-4 style output: capitalized namespaces, private model fields behind
//! getters and setters, wrapper classes for unions.

use crate::codedom::{ClassKind, CodeMethod, CodeProperty, CodeType, MethodKind, ParameterKind, PropertyKind};
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::refiners::common::{self, CoreTypeCorrections, RenameScope};
use crate::refiners::imports::{self, has_parameter, is_class, is_method, is_property, ImportEvaluator};
use crate::refiners::reserved;
use crate::refiners::{LanguageRefiner, RefinerPass};

const ABSTRACTIONS: &str = "Microsoft\\Kiota\\Abstractions";
const SERIALIZATION: &str = "Microsoft\\Kiota\\Abstractions\\Serialization";
const STORE: &str = "Microsoft\\Kiota\\Abstractions\\Store";

const CORE_TYPES: &[(&str, &str)] = &[
    ("IRequestAdapter", "RequestAdapter"),
    ("IResponseHandler", "ResponseHandler"),
    ("ISerializationWriter", "SerializationWriter"),
    ("IParseNode", "ParseNode"),
    ("IBackingStoreFactory", "BackingStoreFactory"),
    ("IBackingStore", "BackingStore"),
    ("IBackedModel", "BackedModel"),
    ("IDictionary<string, string>", "array"),
    ("Dictionary<string, object>", "array"),
    ("IDictionary<string, object>", "array"),
    ("IEnumerable<IRequestOption>", "array"),
    ("RequestInformation", "RequestInformation"),
];

fn correct_method(_class_name: &str, method: &mut CodeMethod) {
    common::rename_external_types(&mut method.return_type, CORE_TYPES);
    for parameter in method.parameters.iter_mut() {
        common::rename_external_types(&mut parameter.ty, CORE_TYPES);
    }
    match method.kind {
        MethodKind::Deserializer => {
            method.name = "getFieldDeserializers".to_string();
            method.return_type = CodeType::external("array");
            method.return_type.set_nullable(false);
        }
        MethodKind::Serializer => method.name = "serialize".to_string(),
        _ => {}
    }
}

fn correct_property(property: &mut CodeProperty) {
    common::rename_external_types(&mut property.ty, CORE_TYPES);
    if property.kind == PropertyKind::AdditionalData {
        property.default_value = Some("[]".to_string());
    }
}

fn default_imports() -> Vec<ImportEvaluator> {
    vec![
        ImportEvaluator::new(ABSTRACTIONS, &["RequestAdapter"], |e| {
            is_property(e, &[PropertyKind::RequestAdapter])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["HttpMethod", "RequestInformation", "RequestOption"], |e| {
            is_method(e, &[MethodKind::RequestGenerator])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["ResponseHandler"], |e| {
            is_method(e, &[MethodKind::RequestExecutor])
        }),
        ImportEvaluator::new("Http\\Promise", &["Promise", "RejectedPromise"], |e| {
            is_method(e, &[MethodKind::RequestExecutor])
        }),
        ImportEvaluator::new("", &["Exception"], |e| is_method(e, &[MethodKind::RequestExecutor])),
        ImportEvaluator::new(SERIALIZATION, &["SerializationWriter"], |e| {
            is_method(e, &[MethodKind::Serializer])
        }),
        ImportEvaluator::new(SERIALIZATION, &["ParseNode"], |e| {
            is_method(e, &[MethodKind::Deserializer])
        }),
        ImportEvaluator::new(SERIALIZATION, &["Parsable"], |e| {
            is_class(e, &[ClassKind::Model, ClassKind::UnionWrapper])
                || is_method(e, &[MethodKind::RequestExecutor])
        }),
        ImportEvaluator::new(STORE, &["BackingStoreFactory", "BackingStoreFactorySingleton"], |e| {
            has_parameter(e, &[ParameterKind::BackingStore])
        }),
        ImportEvaluator::new(STORE, &["BackingStore", "BackedModel", "BackingStoreFactorySingleton"], |e| {
            is_property(e, &[PropertyKind::BackingStore])
        }),
    ]
}

/// Strategy for `GenerationLanguage::Php`.
pub struct PhpRefiner;

impl LanguageRefiner for PhpRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::Php
    }

    fn passes(&self, _config: &GenerationConfiguration) -> Vec<RefinerPass> {
        vec![
            RefinerPass::infallible("add_default_imports", |root| {
                imports::add_default_imports(root, &default_imports())
            }),
            RefinerPass::new("replace_indexers_by_methods_with_parameter", |root, _| {
                common::replace_indexers_by_methods_with_parameter(root, "ById")
            }),
            RefinerPass::infallible("remove_cancellation_parameter", common::remove_cancellation_parameter),
            RefinerPass::new("convert_union_types_to_wrapper", |root, config| {
                common::convert_union_types_to_wrapper(root, config.uses_backing_store)
            }),
            RefinerPass::infallible("move_inner_classes_to_top_level", |root| {
                common::move_inner_classes_to_top_level(root, true)
            }),
            RefinerPass::infallible("replace_reserved_names", |root| {
                let scope = RenameScope {
                    classes: true,
                    enums: true,
                    methods: true,
                    namespaces: true,
                    ..RenameScope::default()
                };
                common::replace_reserved_names(root, &reserved::PHP, reserved::escaped_suffix, scope)
            }),
            RefinerPass::infallible("replace_binary_by_native_type", |root| {
                common::replace_binary_by_native_type(root, "StreamInterface", "Psr\\Http\\Message")
            }),
            RefinerPass::infallible("add_parsable_implements", |root| {
                common::add_parsable_implements(root, "Parsable", SERIALIZATION)
            }),
            RefinerPass::infallible(
                "capitalize_namespaces_first_letters",
                common::capitalize_namespaces_first_letters,
            ),
            RefinerPass::infallible("correct_core_type", |root| {
                common::correct_core_type(
                    root,
                    &CoreTypeCorrections {
                        method: correct_method,
                        property: correct_property,
                    },
                )
            }),
            RefinerPass::new("add_getter_and_setter_methods", |root, _| {
                common::add_getter_and_setter_methods(
                    root,
                    &[PropertyKind::Custom, PropertyKind::AdditionalData, PropertyKind::BackingStore],
                )
            }),
            RefinerPass::infallible("add_properties_and_method_types_imports", |root| {
                imports::add_properties_and_method_types_imports(root, false)
            }),
            RefinerPass::new("add_constructors_for_default_values", |root, _| {
                common::add_constructors_for_default_values(root, true)
            }),
            RefinerPass::infallible("replace_default_serialization_modules", |root| {
                common::replace_default_serialization_modules(
                    root,
                    &GenerationConfiguration::default().serializers,
                    &["Microsoft\\Kiota\\Serialization\\Json\\JsonSerializationWriterFactory"],
                )
            }),
            RefinerPass::infallible("replace_default_deserialization_modules", |root| {
                common::replace_default_deserialization_modules(
                    root,
                    &GenerationConfiguration::default().deserializers,
                    &["Microsoft\\Kiota\\Serialization\\Json\\JsonParseNodeFactory"],
                )
            }),
            RefinerPass::infallible("add_serialization_modules_import", |root| {
                imports::add_serialization_modules_import(root, &["Microsoft\\Kiota\\Abstractions\\ApiClientBuilder"])
            }),
        ]
    }
}
