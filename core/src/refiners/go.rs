//! # Go Refiner
//!
//! Go has no nested types, overloads or optional parameters: inner classes are
//! lifted, navigation properties become methods, indexers become `ById`
//! methods and request parameters are bundled into option structs. Models move
//! to a single package, since Go packages cannot import their parents.

use crate::codedom::{
    ClassKind, CodeMethod, CodeProperty, CodeType, CollectionKind, MethodKind, ParameterKind,
    PropertyKind, SimpleType,
};
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::refiners::common::{self, CoreTypeCorrections, PropertyScope, RenameScope};
use crate::refiners::imports::{
    self, has_parameter, is_class, is_method, is_property, uses_type, ImportEvaluator,
};
use crate::refiners::reserved;
use crate::refiners::{LanguageRefiner, RefinerPass};

/// Kiota abstractions module.
pub const ABSTRACTIONS: &str = "github.com/microsoft/kiota-abstractions-go";
/// Serialization package of the abstractions.
pub const SERIALIZATION: &str = "github.com/microsoft/kiota-abstractions-go/serialization";
/// Backing store package of the abstractions.
pub const STORE: &str = "github.com/microsoft/kiota-abstractions-go/store";

const JSON_WRITER: &str = "github.com/microsoft/kiota-serialization-json-go.NewJsonSerializationWriterFactory";
const JSON_PARSER: &str = "github.com/microsoft/kiota-serialization-json-go.NewJsonParseNodeFactory";

const CORE_TYPES: &[(&str, &str)] = &[
    ("IRequestAdapter", "RequestAdapter"),
    ("IResponseHandler", "ResponseHandler"),
    ("ISerializationWriter", "SerializationWriter"),
    ("IParseNode", "ParseNode"),
    ("IBackingStoreFactory", "BackingStoreFactory"),
    ("IBackingStore", "BackingStore"),
    ("IBackedModel", "BackedModel"),
    ("IDictionary<string, string>", "map[string]string"),
    ("Dictionary<string, object>", "map[string]string"),
    ("IDictionary<string, object>", "map[string]interface{}"),
    ("DateTimeOffset", "Time"),
    ("TimeSpan", "ISODuration"),
    ("Guid", "UUID"),
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
        method.return_type = CodeType::Simple(
            SimpleType::external("map[string]func(serialization.ParseNode)(error)").nullable(false),
        );
    }
}

fn correct_property(property: &mut CodeProperty) {
    common::rename_external_types(&mut property.ty, CORE_TYPES);
    if property.kind == PropertyKind::AdditionalData {
        property.default_value = Some("make(map[string]interface{})".to_string());
    }
}

fn default_imports() -> Vec<ImportEvaluator> {
    vec![
        ImportEvaluator::new(ABSTRACTIONS, &["RequestAdapter"], |e| {
            is_property(e, &[PropertyKind::RequestAdapter])
                || has_parameter(e, &[ParameterKind::RequestAdapter])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["RequestInformation", "HttpMethod", "RequestOption"], |e| {
            is_method(e, &[MethodKind::RequestGenerator])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["ResponseHandler", "RequestOption"], |e| {
            is_class(e, &[ClassKind::ParameterSet]) || is_method(e, &[MethodKind::RequestExecutor])
        }),
        ImportEvaluator::new(SERIALIZATION, &["SerializationWriter"], |e| {
            is_method(e, &[MethodKind::Serializer])
        }),
        ImportEvaluator::new(SERIALIZATION, &["ParseNode", "Parsable"], |e| {
            is_method(e, &[MethodKind::Deserializer])
                || is_class(e, &[ClassKind::Model, ClassKind::UnionWrapper])
        }),
        ImportEvaluator::new(SERIALIZATION, &["Parsable"], |e| {
            is_method(e, &[MethodKind::RequestExecutor])
        }),
        ImportEvaluator::new(STORE, &["BackingStoreFactory"], |e| {
            has_parameter(e, &[ParameterKind::BackingStore])
        }),
        ImportEvaluator::new(STORE, &["BackingStore", "BackedModel"], |e| {
            is_property(e, &[PropertyKind::BackingStore])
        }),
        ImportEvaluator::new("time", &["Time"], |e| uses_type(e, "Time")),
        ImportEvaluator::new("github.com/google/uuid", &["UUID"], |e| uses_type(e, "UUID")),
        ImportEvaluator::new(SERIALIZATION, &["DateOnly"], |e| uses_type(e, "DateOnly")),
        ImportEvaluator::new(SERIALIZATION, &["TimeOnly"], |e| uses_type(e, "TimeOnly")),
        ImportEvaluator::new(SERIALIZATION, &["ISODuration"], |e| uses_type(e, "ISODuration")),
    ]
}

/// Strategy for `GenerationLanguage::Go`.
pub struct GoRefiner;

impl LanguageRefiner for GoRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::Go
    }

    fn passes(&self, _config: &GenerationConfiguration) -> Vec<RefinerPass> {
        vec![
            RefinerPass::infallible("move_inner_classes_to_top_level", |root| {
                common::move_inner_classes_to_top_level(root, true)
            }),
            RefinerPass::new("replace_indexers_by_methods_with_parameter", |root, _| {
                common::replace_indexers_by_methods_with_parameter(root, "ById")
            }),
            RefinerPass::infallible("remove_cancellation_parameter", common::remove_cancellation_parameter),
            RefinerPass::new("replace_request_builder_properties_by_methods", |root, _| {
                common::replace_request_builder_properties_by_methods(root)
            }),
            RefinerPass::new("convert_union_types_to_wrapper", |root, config| {
                common::convert_union_types_to_wrapper(root, config.uses_backing_store)
            }),
            RefinerPass::new("add_null_check_methods", |root, _| common::add_null_check_methods(root)),
            RefinerPass::new("add_raw_url_constructor_overload", |root, _| {
                common::add_raw_url_constructor_overload(root)
            }),
            RefinerPass::new("move_all_models_to_top_level", |root, config| {
                common::move_all_models_to_top_level(root, &config.models_namespace_name());
                Ok(())
            }),
            RefinerPass::infallible("replace_reserved_names", |root| {
                let scope = RenameScope {
                    classes: true,
                    enums: true,
                    properties: PropertyScope::NonPublic,
                    methods: true,
                    parameters: true,
                    namespaces: true,
                };
                common::replace_reserved_names(root, &reserved::GO, reserved::underscore_escaped, scope)
            }),
            RefinerPass::infallible("add_properties_and_method_types_imports", |root| {
                imports::add_properties_and_method_types_imports(root, false)
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
            RefinerPass::infallible("add_default_imports", |root| {
                imports::add_default_imports(root, &default_imports())
            }),
            RefinerPass::infallible("patch_header_parameters_type", |root| {
                common::patch_header_parameters_type(root, "map[string]string")
            }),
            RefinerPass::infallible("make_model_properties_nullable", common::make_model_properties_nullable),
            RefinerPass::new("add_getter_and_setter_methods", |root, _| {
                common::add_getter_and_setter_methods(
                    root,
                    &[PropertyKind::AdditionalData, PropertyKind::Custom, PropertyKind::BackingStore],
                )
            }),
            RefinerPass::new("add_constructors_for_default_values", |root, _| {
                common::add_constructors_for_default_values(root, true)
            }),
            RefinerPass::infallible("add_error_import_for_enums", |root| {
                common::add_error_import_for_enums(root, "errors")
            }),
            RefinerPass::infallible("replace_default_serialization_modules", |root| {
                common::replace_default_serialization_modules(
                    root,
                    &GenerationConfiguration::default().serializers,
                    &[JSON_WRITER],
                )
            }),
            RefinerPass::infallible("replace_default_deserialization_modules", |root| {
                common::replace_default_deserialization_modules(
                    root,
                    &GenerationConfiguration::default().deserializers,
                    &[JSON_PARSER],
                )
            }),
            RefinerPass::infallible("add_serialization_modules_import", |root| {
                imports::add_serialization_modules_import(
                    root,
                    &[
                        "github.com/microsoft/kiota-abstractions-go.RegisterDefaultSerializer",
                        "github.com/microsoft/kiota-abstractions-go.RegisterDefaultDeserializer",
                    ],
                )
            }),
            RefinerPass::new("replace_executor_and_generator_parameters_by_parameter_sets", |root, _| {
                common::replace_executor_and_generator_parameters_by_parameter_sets(root)
            }),
        ]
    }
}
