//! # Request Builders
//!
//! One request builder class per URI node: navigation members for the child
//! segments, an executor and a generator per operation, the private plumbing
//! properties and a constructor.

use super::schemas::NamingContext;
use super::ModelBuilder;
use crate::codedom::{
    ClassKind, CodeClass, CodeIndexer, CodeMethod, CodeParameter, CodeProperty, CodeType,
    DeclarationRef, MethodKind, ParameterKind, PropertyKind, SimpleType, Visibility,
    REQUEST_BUILDER_SUFFIX,
};
use crate::diagnostics::WarningKind;
use crate::error::AppResult;
use crate::oas::refs::resolve_response;
use crate::oas::tree::sanitize;
use crate::oas::{HttpMethod, UrlTreeNode};
use heck::ToLowerCamelCase;
use indexmap::IndexSet;
use rayon::prelude::*;
use utoipa::openapi::path::{Operation, Parameter, ParameterIn};

const OCTET_STREAM: &str = "application/octet-stream";
const NO_CONTENT_STATUS_CODES: [&str; 3] = ["201", "202", "204"];

fn is_binary_content(content_type: &str) -> bool {
    content_type.eq_ignore_ascii_case(OCTET_STREAM)
}

fn external(name: &str, nullable: bool) -> CodeType {
    CodeType::Simple(SimpleType::external(name).nullable(nullable))
}

impl<'a> ModelBuilder<'a> {
    /// Builds the class of `node`, then its children in parallel.
    pub(super) fn build_node(&self, node: &UrlTreeNode<'a>) -> AppResult<()> {
        self.build_class(node).map_err(|e| e.at_node(&node.path))?;
        node.children
            .par_iter()
            .try_for_each(|(_, child)| self.build_node(child))
    }

    fn build_class(&self, node: &UrlTreeNode<'a>) -> AppResult<()> {
        let namespace = node.namespace_name(&self.config.client_namespace_name);
        let class_name = if node.is_root() {
            self.config.client_class_name.clone()
        } else {
            node.class_name(&self.config.client_class_name, REQUEST_BUILDER_SUFFIX)
        };
        tracing::trace!(path = %node.path, class = %class_name, "Building request builder");

        let mut class = CodeClass::new(class_name, ClassKind::RequestBuilder);
        class.description = Some(if node.is_root() {
            "The main entry point of the SDK, exposes the configuration and the fluent API.".to_string()
        } else {
            format!("Builds and executes requests for operations under {}", node.path)
        });

        for child in node.children.values() {
            self.add_navigation_member(node, child, &mut class)?;
        }
        for (method, operation) in node.operations() {
            self.add_operation(node, &namespace, &mut class, method, operation)?;
        }
        self.add_plumbing_properties(node, &mut class)?;
        self.add_constructor(node, &mut class)?;

        self.registry.insert_class_if_absent(&namespace, class);
        Ok(())
    }

    fn add_navigation_member(
        &self,
        node: &UrlTreeNode<'a>,
        child: &UrlTreeNode<'a>,
        class: &mut CodeClass,
    ) -> AppResult<()> {
        let child_class = child.class_name(&self.config.client_class_name, REQUEST_BUILDER_SUFFIX);
        if child.is_path_segment_with_single_simple_parameter() {
            if class.indexer.is_some() {
                tracing::debug!(path = %child.path, "Ignoring additional indexer");
                return Ok(());
            }
            let parameter_name = child
                .segment_parameter_names()
                .into_iter()
                .next()
                .unwrap_or_default();
            class.indexer = Some(CodeIndexer {
                name: format!("{}-indexer", sanitize(&parameter_name).to_lower_camel_case()),
                description: Some(format!("Gets an item from the {} collection", child.path)),
                parameter_name,
                path_segment: node.segment.clone(),
                index_type: external("string", false),
                return_type: CodeType::pending(child_class),
            });
        } else if child.is_complex_path_with_any_number_of_parameters() {
            let name = child
                .identifier(&self.config.client_class_name)
                .to_lower_camel_case();
            let mut method = CodeMethod::new(name, MethodKind::RequestBuilderWithParameters)
                .returning(CodeType::Simple(SimpleType::pending(child_class).nullable(false)))
                .with_description(format!("Provides operations to call the {} path", child.path));
            for parameter in self.segment_parameters(child)? {
                method.add_parameter(parameter.optional(false));
            }
            class.add_method(method)?;
        } else {
            let mut property = CodeProperty::new(
                child.navigation_name(),
                PropertyKind::RequestBuilder,
                CodeType::Simple(SimpleType::pending(child_class).nullable(false)),
            )
            .with_description(format!("The {} property", child.segment));
            property.read_only = true;
            class.add_property(property)?;
        }
        Ok(())
    }

    /// Path parameters named by `node`'s segment, declared or not.
    fn segment_parameters(&self, node: &UrlTreeNode<'a>) -> AppResult<Vec<CodeParameter>> {
        let declared = node.path_parameters();
        let mut parameters = Vec::new();
        for name in node.segment_parameter_names() {
            let declaration = declared.iter().find(|p| p.name == name);
            let ty = self.parameter_type(declaration.and_then(|p| p.schema.as_ref()))?;
            let identifier = sanitize(&name).to_lower_camel_case();
            if identifier.is_empty() {
                self.diagnostics.warn(
                    WarningKind::MissingName,
                    format!("Skipping path parameter without a usable name under {}", node.path),
                );
                continue;
            }
            let mut parameter = CodeParameter::new(identifier, ParameterKind::Path, ty.into())
                .optional(true);
            parameter.description = declaration.and_then(|p| p.description.clone());
            if parameter.name != name {
                parameter.serialization_name = Some(name);
            }
            parameters.push(parameter);
        }
        Ok(parameters)
    }

    fn add_operation(
        &self,
        node: &UrlTreeNode<'a>,
        namespace: &str,
        class: &mut CodeClass,
        method: HttpMethod,
        operation: &'a Operation,
    ) -> AppResult<()> {
        if let Some(body) = &operation.request_body {
            if !body.content.is_empty()
                && self.config.ignores_all_content_types(body.content.keys())
            {
                tracing::debug!(
                    path = %node.path,
                    method = %method,
                    "Skipping operation: every request content type is ignored"
                );
                return Ok(());
            }
        }

        let identifier = node.identifier(&self.config.client_class_name);
        let location = format!("{} {}", method, node.path);
        let description = operation
            .description
            .clone()
            .or_else(|| operation.summary.clone());

        let query_class = self.query_parameters_class(node, method, operation)?;
        let query_type = query_class.as_ref().map(|query| {
            let mut ty = SimpleType::bound(DeclarationRef::class(
                namespace,
                format!("{}.{}", class.name, query.name),
            ));
            ty.action_of = true;
            ty
        });
        if let Some(query) = query_class {
            class.add_inner_class(query);
        }

        let body = match &operation.request_body {
            Some(body) => {
                let chosen = body
                    .content
                    .iter()
                    .filter(|(ct, _)| !self.config.ignores_all_content_types(std::iter::once(*ct)))
                    .find(|(ct, content)| !is_binary_content(ct) && content.schema.is_some());
                match chosen {
                    Some((content_type, content)) => {
                        let ctx = NamingContext::new(
                            namespace,
                            format!("{}{}RequestBody", identifier, method.pascal_name()),
                            format!("{} request body", location),
                        );
                        let schema = content.schema.as_ref();
                        let ty = match schema {
                            Some(schema) => self.resolve_schema_type(schema, &ctx)?,
                            None => external("binary", false),
                        };
                        Some((content_type.clone(), ty))
                    }
                    None => body
                        .content
                        .keys()
                        .next()
                        .map(|ct| (ct.clone(), external("binary", false))),
                }
            }
            None => None,
        };

        let return_type = self.response_type(node, namespace, &identifier, method, operation)?;

        let mut common = Vec::new();
        if let Some((_, ty)) = &body {
            common.push(
                CodeParameter::new("body", ParameterKind::RequestBody, ty.clone())
                    .with_description("The request body"),
            );
        }
        if let Some(ty) = query_type {
            common.push(
                CodeParameter::new("q", ParameterKind::QueryParameter, ty.into())
                    .with_description("Request query parameters")
                    .optional(true),
            );
        }
        common.push(
            CodeParameter::new("h", ParameterKind::Headers, external("IDictionary<string, string>", true))
                .with_description("Request headers")
                .optional(true),
        );
        common.push(
            CodeParameter::new("o", ParameterKind::Options, external("IEnumerable<IRequestOption>", true))
                .with_description("Request options")
                .optional(true),
        );

        let content_type = body.as_ref().map(|(ct, _)| ct.clone());

        let mut executor = CodeMethod::new(method.as_str(), MethodKind::RequestExecutor)
            .returning(return_type);
        executor.is_async = true;
        executor.http_method = Some(method);
        executor.request_body_content_type = content_type.clone();
        executor.description = description.clone();
        for parameter in common.iter().cloned() {
            executor.add_parameter(parameter);
        }
        executor.add_parameter(
            CodeParameter::new("responseHandler", ParameterKind::ResponseHandler, external("IResponseHandler", true))
                .with_description("Response handler to use in place of the default response handling provided by the core service")
                .optional(true),
        );
        executor.add_parameter(
            CodeParameter::new("cancellationToken", ParameterKind::Cancellation, external("CancellationToken", true))
                .with_description("Cancellation token to use when cancelling requests")
                .optional(true),
        );

        let mut generator = CodeMethod::new(
            format!("Create{}RequestInformation", method.pascal_name()),
            MethodKind::RequestGenerator,
        )
        .returning(external("RequestInformation", false));
        generator.http_method = Some(method);
        generator.request_body_content_type = content_type;
        generator.description = description;
        for parameter in common {
            generator.add_parameter(parameter);
        }

        class.add_method(executor)?;
        class.add_method(generator)?;
        Ok(())
    }

    /// The `{Method}QueryParameters` inner class, when the operation has query parameters.
    fn query_parameters_class(
        &self,
        node: &UrlTreeNode<'a>,
        method: HttpMethod,
        operation: &'a Operation,
    ) -> AppResult<Option<CodeClass>> {
        let item_parameters = node
            .path_item
            .and_then(|item| item.parameters.as_ref())
            .into_iter()
            .flatten();
        let query: Vec<&'a Parameter> = item_parameters
            .chain(operation.parameters.iter().flatten())
            .filter(|p| p.parameter_in == ParameterIn::Query)
            .collect();
        if query.is_empty() {
            return Ok(None);
        }

        let mut class = CodeClass::new(
            format!("{}QueryParameters", method.pascal_name()),
            ClassKind::QueryParameters,
        );
        class.description = Some(match &operation.summary {
            Some(summary) => summary.clone(),
            None => format!("Query parameters for the {} {} operation", method, node.path),
        });
        let mut seen = IndexSet::new();
        for parameter in query {
            let identifier = sanitize(&parameter.name.replace('$', "")).to_lower_camel_case();
            if identifier.is_empty() {
                self.diagnostics.warn(
                    WarningKind::MissingName,
                    format!("Skipping query parameter without a name on {} {}", method, node.path),
                );
                continue;
            }
            if !seen.insert(parameter.name.clone()) {
                self.diagnostics.warn(
                    WarningKind::DuplicateQueryParameter,
                    format!(
                        "Dropping duplicate query parameter '{}' on {} {}",
                        parameter.name, method, node.path
                    ),
                );
                continue;
            }
            let ty = self.parameter_type(parameter.schema.as_ref())?;
            let mut property = CodeProperty::new(identifier, PropertyKind::QueryParameter, ty.into());
            property.description = parameter.description.clone();
            if property.name != parameter.name {
                property.serialization_name = Some(parameter.name.clone());
            }
            class.add_property(property)?;
        }
        Ok(Some(class))
    }

    fn response_type(
        &self,
        node: &UrlTreeNode<'a>,
        namespace: &str,
        identifier: &str,
        method: HttpMethod,
        operation: &'a Operation,
    ) -> AppResult<CodeType> {
        let mut has_binary = false;
        for (status, response) in &operation.responses.responses {
            if !status.starts_with('2') {
                continue;
            }
            let response = resolve_response(self.document, response)?;
            for (content_type, content) in &response.content {
                if is_binary_content(content_type) {
                    has_binary = true;
                    continue;
                }
                if let Some(schema) = &content.schema {
                    let ctx = NamingContext::new(
                        namespace,
                        format!("{}{}Response", identifier, method.pascal_name()),
                        format!("{} {} response", method, node.path),
                    );
                    return self.resolve_schema_type(schema, &ctx);
                }
            }
        }
        if has_binary {
            return Ok(external("binary", true));
        }
        let no_content = operation
            .responses
            .responses
            .keys()
            .any(|status| NO_CONTENT_STATUS_CODES.contains(&status.as_str()));
        if !no_content {
            self.diagnostics.warn(
                WarningKind::MissingResponseSchema,
                format!(
                    "No response schema found for {} {}, falling back to void",
                    method, node.path
                ),
            );
        }
        Ok(CodeType::void())
    }

    fn add_plumbing_properties(&self, node: &UrlTreeNode<'a>, class: &mut CodeClass) -> AppResult<()> {
        class.add_property(
            CodeProperty::new("pathParameters", PropertyKind::PathParameters, external("Dictionary<string, object>", false))
                .with_visibility(Visibility::Private)
                .with_description("Path parameters for the request"),
        )?;
        class.add_property(
            CodeProperty::new("requestAdapter", PropertyKind::RequestAdapter, external("IRequestAdapter", false))
                .with_visibility(Visibility::Private)
                .with_description("The request adapter to use to execute the requests."),
        )?;
        class.add_property(
            CodeProperty::new("urlTemplate", PropertyKind::UrlTemplate, external("string", false))
                .with_visibility(Visibility::Private)
                .with_default(format!("\"{}\"", node.url_template()))
                .with_description("Url template to use to build the URL for the current request builder"),
        )
    }

    fn add_constructor(&self, node: &UrlTreeNode<'a>, class: &mut CodeClass) -> AppResult<()> {
        let request_adapter = CodeParameter::new(
            "requestAdapter",
            ParameterKind::RequestAdapter,
            external("IRequestAdapter", false),
        )
        .with_description("The request adapter to use to execute the requests.");

        if node.is_root() {
            let mut constructor = CodeMethod::new("constructor", MethodKind::ClientConstructor)
                .with_description(format!(
                    "Instantiates a new {} and sets the default values.",
                    class.name
                ));
            constructor.add_parameter(request_adapter);
            if self.config.uses_backing_store {
                constructor.add_parameter(
                    CodeParameter::new(
                        "backingStore",
                        ParameterKind::BackingStore,
                        external("IBackingStoreFactory", true),
                    )
                    .with_description("The backing store to use for the models.")
                    .optional(true),
                );
            }
            constructor.base_url = self.config.api_root_url.clone();
            constructor.serializer_modules = self.config.serializers.clone();
            constructor.deserializer_modules = self.config.deserializers.clone();
            return class.add_method(constructor);
        }

        let mut constructor = CodeMethod::new("constructor", MethodKind::Constructor)
            .with_description(format!(
                "Instantiates a new {} and sets the default values.",
                class.name
            ));
        constructor.add_parameter(
            CodeParameter::new(
                "pathParameters",
                ParameterKind::PathParameters,
                external("Dictionary<string, object>", false),
            )
            .with_description("Path parameters for the request"),
        );
        constructor.add_parameter(request_adapter);
        for parameter in self.segment_parameters(node)? {
            constructor.add_parameter(parameter);
        }
        class.add_method(constructor)
    }
}
