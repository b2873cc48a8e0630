//! # C# Refiner
//!
//! Keeps inner classes and native optional parameters; wraps unions, suffixes
//! async executors, capitalizes namespaces and imports the Kiota abstractions.

use crate::codedom::{ClassKind, MethodKind, ParameterKind, PropertyKind};
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::refiners::common::{self, RenameScope};
use crate::refiners::imports::{self, has_parameter, is_class, is_method, is_property, ImportEvaluator};
use crate::refiners::reserved;
use crate::refiners::{LanguageRefiner, RefinerPass};

const ABSTRACTIONS: &str = "Microsoft.Kiota.Abstractions";
const SERIALIZATION: &str = "Microsoft.Kiota.Abstractions.Serialization";
const STORE: &str = "Microsoft.Kiota.Abstractions.Store";

fn default_imports() -> Vec<ImportEvaluator> {
    vec![
        ImportEvaluator::new(ABSTRACTIONS, &["IRequestAdapter"], |e| {
            is_property(e, &[PropertyKind::RequestAdapter])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["HttpMethod", "RequestInformation", "IRequestOption"], |e| {
            is_method(e, &[MethodKind::RequestGenerator])
        }),
        ImportEvaluator::new(ABSTRACTIONS, &["IResponseHandler"], |e| {
            is_method(e, &[MethodKind::RequestExecutor])
        }),
        ImportEvaluator::new(SERIALIZATION, &["ISerializationWriter"], |e| {
            is_method(e, &[MethodKind::Serializer])
        }),
        ImportEvaluator::new(SERIALIZATION, &["IParseNode"], |e| {
            is_method(e, &[MethodKind::Deserializer])
        }),
        ImportEvaluator::new(SERIALIZATION, &["IParsable"], |e| {
            is_class(e, &[ClassKind::Model, ClassKind::UnionWrapper])
        }),
        ImportEvaluator::new(STORE, &["IBackingStoreFactory", "IBackingStoreFactorySingleton"], |e| {
            has_parameter(e, &[ParameterKind::BackingStore])
        }),
        ImportEvaluator::new(STORE, &["IBackingStore", "IBackedModel", "BackingStoreFactorySingleton"], |e| {
            is_property(e, &[PropertyKind::BackingStore])
        }),
        ImportEvaluator::new("System", &["String"], |e| {
            is_class(e, &[ClassKind::RequestBuilder, ClassKind::Model, ClassKind::UnionWrapper])
        }),
        ImportEvaluator::new("System.Collections.Generic", &["List", "Dictionary"], |e| {
            is_class(e, &[ClassKind::RequestBuilder, ClassKind::Model, ClassKind::UnionWrapper])
        }),
        ImportEvaluator::new("System.IO", &["Stream"], |e| {
            is_class(e, &[ClassKind::RequestBuilder])
        }),
        ImportEvaluator::new("System.Threading", &["CancellationToken"], |e| {
            has_parameter(e, &[ParameterKind::Cancellation])
        }),
        ImportEvaluator::new("System.Threading.Tasks", &["Task"], |e| {
            is_method(e, &[MethodKind::RequestExecutor])
        }),
        ImportEvaluator::new("System.Linq", &["Enumerable"], |e| {
            is_class(e, &[ClassKind::RequestBuilder])
        }),
    ]
}

/// Strategy for `GenerationLanguage::CSharp`.
pub struct CSharpRefiner;

impl LanguageRefiner for CSharpRefiner {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::CSharp
    }

    fn passes(&self, _config: &GenerationConfiguration) -> Vec<RefinerPass> {
        vec![
            RefinerPass::infallible("add_default_imports", |root| {
                imports::add_default_imports(root, &default_imports())
            }),
            RefinerPass::infallible(
                "move_classes_with_namespace_names_under_namespace",
                common::move_classes_with_namespace_names_under_namespace,
            ),
            RefinerPass::new("convert_union_types_to_wrapper", |root, config| {
                common::convert_union_types_to_wrapper(root, config.uses_backing_store)
            }),
            RefinerPass::new("add_raw_url_constructor_overload", |root, _| {
                common::add_raw_url_constructor_overload(root)
            }),
            RefinerPass::infallible("add_properties_and_method_types_imports", |root| {
                imports::add_properties_and_method_types_imports(root, false)
            }),
            RefinerPass::infallible("add_async_suffix", common::add_async_suffix),
            RefinerPass::infallible("add_inner_classes_imports", imports::add_inner_classes_imports),
            RefinerPass::infallible("add_parsable_implements", |root| {
                common::add_parsable_implements(root, "IParsable", SERIALIZATION)
            }),
            RefinerPass::infallible(
                "capitalize_namespaces_first_letters",
                common::capitalize_namespaces_first_letters,
            ),
            RefinerPass::infallible("replace_binary_by_native_type", |root| {
                common::replace_binary_by_native_type(root, "Stream", "System.IO")
            }),
            RefinerPass::infallible("make_enum_properties_nullable", common::make_enum_properties_nullable),
            RefinerPass::infallible("replace_reserved_names", |root| {
                let scope = RenameScope {
                    enums: true,
                    parameters: true,
                    ..RenameScope::default()
                };
                common::replace_reserved_names(root, &reserved::CSHARP, reserved::verbatim_upper_first, scope)
            }),
            RefinerPass::infallible(
                "disambiguate_properties_with_class_names",
                common::disambiguate_properties_with_class_names,
            ),
            RefinerPass::new("add_constructors_for_default_values", |root, _| {
                common::add_constructors_for_default_values(root, false)
            }),
            RefinerPass::infallible("add_serialization_modules_import", |root| {
                imports::add_serialization_modules_import(root, &["Microsoft.Kiota.Abstractions.ApiClientBuilder"])
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::{CodeClass, CodeMethod, CodeNamespace, CodeParameter, CodeType, CodeUsing, DeclarationRef};
    use crate::refiners::refine;

    #[test]
    fn test_csharp_refinement() {
        let mut root = CodeNamespace::root();
        let mut builder = CodeClass::new("EventsRequestBuilder", ClassKind::RequestBuilder);
        let mut get = CodeMethod::new("get", MethodKind::RequestExecutor).returning(CodeType::external("binary"));
        get.is_async = true;
        get.add_parameter(CodeParameter::new(
            "cancellationToken",
            ParameterKind::Cancellation,
            CodeType::external("CancellationToken"),
        ));
        get.add_parameter(CodeParameter::new("event", ParameterKind::Custom, CodeType::external("string")));
        builder.add_method(get).unwrap();
        root.ensure_namespace("ApiSdk.events").add_class(builder);

        let config = GenerationConfiguration::default();
        refine(&mut root, &config).unwrap();

        let builder = root
            .find_class(&DeclarationRef::class("ApiSdk.Events", "EventsRequestBuilder"))
            .unwrap();
        let get = builder.method("getAsync").unwrap();
        assert_eq!(get.return_type.name(), "Stream");
        assert_eq!(get.parameters[1].name, "@Event");
        assert!(builder.usings.contains(&CodeUsing::external("System.Threading.Tasks", "Task")));
        assert!(builder.usings.contains(&CodeUsing::external("System.IO", "Stream")));
        assert!(builder.usings.contains(&CodeUsing::external(ABSTRACTIONS, "IResponseHandler")));
    }
}
