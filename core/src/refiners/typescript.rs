//! # TypeScript Refiner
//!
//! Unions stay native (`A | B`). Every file imports what it uses, own
//! namespace included, and inner classes become sibling files.

use crate::codedom::{
    ClassKind, CodeMethod, CodeProperty, CodeType, CollectionKind, MethodKind, ParameterKind,
    PropertyKind, SimpleType,
};
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::refiners::common::{self, CoreTypeCorrections, RenameScope};
use crate::refiners::imports::{
    self, has_parameter, is_class, is_method, is_property, uses_type, ImportEvaluator,
};
use crate::refiners::reserved;
use crate::refiners::{LanguageRefiner, RefinerPass};

/// Kiota abstractions package.
pub const ABSTRACTIONS: &str = "@microsoft/kiota-abstractions";

const CORE_TYPES: &[(&str, &str)] = &[
    ("IRequestAdapter", "RequestAdapter"),
    ("IResponseHandler", "ResponseHandler"),
    ("ISerializationWriter", "SerializationWriter"),
    ("IParseNode", "ParseNode"),
    ("IBackingStoreFactory", "BackingStoreFactory"),
    ("IBackingStore", "BackingStore"),
    ("IBackedModel", "BackedModel"),
    ("IDictionary<string, string>", "Record<string, string>"),
    ("Dictionary<string, object>", "Record<string, unknown>"),
    ("IDictionary<string, object>", "Record<string, unknown>"),
    ("TimeSpan", "Duration"),
];

fn correct_method(_class_name: &str, method: &mut CodeMethod) {
    common::rename_external_types(&mut method.return_type, CORE_TYPES);
    for parameter in method.parameters.iter_mut() {
        if parameter.kind == ParameterKind::Options {
            parameter.ty = CodeType::Simple(
                SimpleType::external("RequestOption").collection(CollectionKind::Array),
            );
            continue;
        }
        common::rename_external_types(&mut parameter.ty, CORE_TYPES);
    }
    if method.kind == MethodKind::Deserializer {
        method.name = "getFieldDeserializers".to_string();
        method.return_type = CodeType::Simple(
            SimpleType::external("Record<string, (node: ParseNode) => void>").nullable(false),
        );
    }
    if method.kind == MethodKind::Serializer {
        method.name = "serialize".to_string();
    }
}

fn correct_property(property: &mut CodeProperty) {
    common::rename_external_types(&mut property.ty, CORE_TYPES);
    if property.kind == PropertyKind::AdditionalData {
        property.default_value = Some("{}".to_string());
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
        ImportEvaluator::new(ABSTRACTIONS, &["SerializationWriter"], |e| {
            is_method(e, &[MethodKind::Serializer])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["ParseNode"], |e| {
            is_method(e, &[MethodKind::Deserializer])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["Parsable"], |e| {
            is_class(e, &[ClassKind::Model])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["BackingStoreFactory", "BackingStoreFactorySingleton"], |e| {
            has_parameter(e, &[ParameterKind::BackingStore])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["BackingStore", "BackedModel", "BackingStoreFactorySingleton"], |e| {
            is_property(e, &[PropertyKind::BackingStore])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["DateOnly"], |e| uses_type(e, "DateOnly")),
        ImportEvaluator::new(ABSTRACTIONS, &["TimeOnly"], |e| uses_type(e, "TimeOnly")),
        ImportEvaluator::new(ABSTRACTIONS, &["Duration"], |e| uses_type(e, "TimeSpan")),
    ]
}

/// Strategy for `GenerationLanguage::TypeScript`.
pub struct TypeScriptRefiner;

impl LanguageRefiner for TypeScriptRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::TypeScript
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
            RefinerPass::infallible("move_inner_classes_to_top_level", |root| {
                common::move_inner_classes_to_top_level(root, true)
            }),
            RefinerPass::infallible("replace_reserved_names", |root| {
                let scope = RenameScope {
                    classes: true,
                    enums: true,
                    methods: true,
                    parameters: true,
                    namespaces: true,
                    ..RenameScope::default()
                };
                common::replace_reserved_names(root, &reserved::TYPESCRIPT, reserved::escaped_suffix, scope)
            }),
            RefinerPass::infallible("replace_binary_by_native_type", |root| {
                common::replace_binary_by_native_type(root, "ArrayBuffer", "")
            }),
            RefinerPass::infallible("add_parsable_implements", |root| {
                common::add_parsable_implements(root, "Parsable", ABSTRACTIONS)
            }),
            RefinerPass::infallible("correct_core_type", |root| {
                common::correct_core_type(
                    root,
                    &CoreTypeCorrections {
                        method: correct_method,
                        property: correct_property,
                    },
                )
            }),
            RefinerPass::infallible("add_properties_and_method_types_imports", |root| {
                imports::add_properties_and_method_types_imports(root, true)
            }),
            RefinerPass::new("add_constructors_for_default_values", |root, _| {
                common::add_constructors_for_default_values(root, true)
            }),
            RefinerPass::infallible("replace_default_serialization_modules", |root| {
                common::replace_default_serialization_modules(
                    root,
                    &GenerationConfiguration::default().serializers,
                    &["@microsoft/kiota-serialization-json.JsonSerializationWriterFactory"],
                )
            }),
            RefinerPass::infallible("replace_default_deserialization_modules", |root| {
                common::replace_default_deserialization_modules(
                    root,
                    &GenerationConfiguration::default().deserializers,
                    &["@microsoft/kiota-serialization-json.JsonParseNodeFactory"],
                )
            }),
            RefinerPass::infallible("add_serialization_modules_import", |root| {
                imports::add_serialization_modules_import(
                    root,
                    &[
                        "@microsoft/kiota-abstractions.registerDefaultSerializer",
                        "@microsoft/kiota-abstractions.registerDefaultDeserializer",
                    ],
                )
            }),
        ]
    }
}
