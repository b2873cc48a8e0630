#![deny(missing_docs)]

//! # Class Members
//!
//! Properties, methods, parameters and indexers.

use crate::codedom::types::{CodeType, SimpleType};
use crate::oas::HttpMethod;

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    /// Visible to consumers.
    #[default]
    Public,
    /// Visible to derived classes.
    Protected,
    /// Internal to the declaring class.
    Private,
}

/// Role of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A model field.
    Custom,
    /// Navigation to a child request builder.
    RequestBuilder,
    /// Bag of undeclared fields.
    AdditionalData,
    /// Backing store of a model.
    BackingStore,
    /// URL template of a request builder.
    UrlTemplate,
    /// Path parameters collected so far.
    PathParameters,
    /// Request adapter executing requests.
    RequestAdapter,
    /// Request body (parameter sets).
    RequestBody,
    /// A query parameter.
    QueryParameter,
    /// Request headers (parameter sets).
    Headers,
    /// Request options (parameter sets).
    Options,
    /// Response handler (parameter sets).
    ResponseHandler,
}

/// A typed field of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeProperty {
    /// Identifier.
    pub name: String,
    /// Role.
    pub kind: PropertyKind,
    /// Type reference.
    pub ty: CodeType,
    /// Documentation.
    pub description: Option<String>,
    /// Initial value expression.
    pub default_value: Option<String>,
    /// Whether the property has no setter.
    pub read_only: bool,
    /// Visibility.
    pub visibility: Visibility,
    /// Wire name when it differs from the identifier.
    pub serialization_name: Option<String>,
}

impl CodeProperty {
    /// Public, writable property without documentation.
    pub fn new(name: impl Into<String>, kind: PropertyKind, ty: CodeType) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            description: None,
            default_value: None,
            read_only: false,
            visibility: Visibility::Public,
            serialization_name: None,
        }
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Builder-style default value.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Whether the property plays one of `kinds`.
    pub fn is_of_kind(&self, kinds: &[PropertyKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Name used on the wire.
    pub fn wire_name(&self) -> &str {
        self.serialization_name.as_deref().unwrap_or(&self.name)
    }
}

/// Role of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Plain method.
    Custom,
    /// Non-root request builder or model constructor.
    Constructor,
    /// Root client constructor.
    ClientConstructor,
    /// Constructor taking a raw URL.
    RawUrlConstructor,
    /// Sends the request and returns the response.
    RequestExecutor,
    /// Builds the request information.
    RequestGenerator,
    /// Writes a model.
    Serializer,
    /// Returns the field deserializers of a model.
    Deserializer,
    /// Navigation taking extra path parameters.
    RequestBuilderWithParameters,
    /// Navigation property rewritten as a method.
    RequestBuilderBackwardCompatibility,
    /// Indexer rewritten as a method.
    IndexerBackwardCompatibility,
    /// Property getter.
    Getter,
    /// Property setter.
    Setter,
    /// Nil check for languages with nullable pointers.
    NullCheck,
}

/// Role of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Plain parameter.
    Custom,
    /// A path parameter value.
    Path,
    /// Request body.
    RequestBody,
    /// Query parameters configuration.
    QueryParameter,
    /// Request headers.
    Headers,
    /// Request options.
    Options,
    /// Response handler.
    ResponseHandler,
    /// Cancellation token.
    Cancellation,
    /// Request adapter.
    RequestAdapter,
    /// Path parameters collected so far.
    PathParameters,
    /// Backing store factory.
    BackingStore,
    /// Bundled request parameters.
    ParameterSet,
    /// Raw URL.
    RawUrl,
    /// Serialization writer.
    Serializer,
    /// Value passed to a setter.
    SetterValue,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeParameter {
    /// Identifier.
    pub name: String,
    /// Role.
    pub kind: ParameterKind,
    /// Type reference.
    pub ty: CodeType,
    /// Documentation.
    pub description: Option<String>,
    /// Whether callers may omit the argument.
    pub optional: bool,
    /// Default argument expression.
    pub default_value: Option<String>,
    /// Wire name when it differs from the identifier (path parameters).
    pub serialization_name: Option<String>,
}

impl CodeParameter {
    /// Required parameter without documentation.
    pub fn new(name: impl Into<String>, kind: ParameterKind, ty: CodeType) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            description: None,
            optional: false,
            default_value: None,
            serialization_name: None,
        }
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder-style optional flag.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Whether the parameter plays one of `kinds`.
    pub fn is_of_kind(&self, kinds: &[ParameterKind]) -> bool {
        kinds.contains(&self.kind)
    }
}

/// A class method.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeMethod {
    /// Identifier.
    pub name: String,
    /// Role.
    pub kind: MethodKind,
    /// Documentation.
    pub description: Option<String>,
    /// Visibility.
    pub visibility: Visibility,
    /// Whether the method is asynchronous.
    pub is_async: bool,
    /// Return type.
    pub return_type: CodeType,
    /// Ordered parameters.
    pub parameters: Vec<CodeParameter>,
    /// HTTP method of executors and generators.
    pub http_method: Option<HttpMethod>,
    /// Request body content type of executors and generators.
    pub request_body_content_type: Option<String>,
    /// Base URL recorded by the client constructor.
    pub base_url: Option<String>,
    /// Serialization writer factories registered by the client constructor.
    pub serializer_modules: Vec<String>,
    /// Parse node factories registered by the client constructor.
    pub deserializer_modules: Vec<String>,
    /// Property accessed by getters and setters, or the path segment of indexer methods.
    pub accessed_member: Option<String>,
}

impl CodeMethod {
    /// Public synchronous method returning `void`.
    pub fn new(name: impl Into<String>, kind: MethodKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            visibility: Visibility::Public,
            is_async: false,
            return_type: CodeType::void(),
            parameters: Vec::new(),
            http_method: None,
            request_body_content_type: None,
            base_url: None,
            serializer_modules: Vec::new(),
            deserializer_modules: Vec::new(),
            accessed_member: None,
        }
    }

    /// Deserializer of a model: the map of field name to field parser.
    pub fn field_deserializers() -> Self {
        Self::new("GetFieldDeserializers", MethodKind::Deserializer)
            .returning(CodeType::Simple(
                SimpleType::external("IDictionary<string, Action<T, IParseNode>>").nullable(false),
            ))
            .with_description("The deserialization information for the current model")
    }

    /// Serializer of a model, writing into a serialization writer.
    pub fn serializer() -> Self {
        let mut method = Self::new("Serialize", MethodKind::Serializer)
            .with_description("Serializes information the current object");
        method.add_parameter(
            CodeParameter::new(
                "writer",
                ParameterKind::Serializer,
                CodeType::Simple(SimpleType::external("ISerializationWriter").nullable(false)),
            )
            .with_description("Serialization writer to use to serialize this model"),
        );
        method
    }

    /// Builder-style return type.
    pub fn returning(mut self, return_type: CodeType) -> Self {
        self.return_type = return_type;
        self
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the method plays one of `kinds`.
    pub fn is_of_kind(&self, kinds: &[MethodKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Appends a parameter, ignoring a second parameter with the same name.
    pub fn add_parameter(&mut self, parameter: CodeParameter) {
        if !self.parameters.iter().any(|p| p.name == parameter.name) {
            self.parameters.push(parameter);
        }
    }

    /// First parameter of `kind`.
    pub fn parameter_of_kind(&self, kind: ParameterKind) -> Option<&CodeParameter> {
        self.parameters.iter().find(|p| p.kind == kind)
    }

    /// Removes every parameter playing one of `kinds`.
    pub fn remove_parameters_by_kind(&mut self, kinds: &[ParameterKind]) {
        self.parameters.retain(|p| !p.is_of_kind(kinds));
    }
}

/// Access to a child builder through a templated segment (`users[id]`).
#[derive(Debug, Clone, PartialEq)]
pub struct CodeIndexer {
    /// Identifier, `{segment}-indexer`.
    pub name: String,
    /// Documentation.
    pub description: Option<String>,
    /// Path parameter the index value is stored under.
    pub parameter_name: String,
    /// Segment of the class owning the indexer.
    pub path_segment: String,
    /// Type of the index value.
    pub index_type: CodeType,
    /// Child request builder type.
    pub return_type: CodeType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_are_unique_by_name() {
        let mut method = CodeMethod::new("get", MethodKind::RequestExecutor);
        method.add_parameter(CodeParameter::new(
            "h",
            ParameterKind::Headers,
            CodeType::external("IDictionary<string, string>"),
        ));
        method.add_parameter(CodeParameter::new(
            "h",
            ParameterKind::Headers,
            CodeType::external("IDictionary<string, string>"),
        ));
        assert_eq!(method.parameters.len(), 1);
        method.remove_parameters_by_kind(&[ParameterKind::Headers]);
        assert!(method.parameters.is_empty());
    }

    #[test]
    fn test_property_kind_checks() {
        let prop = CodeProperty::new("urlTemplate", PropertyKind::UrlTemplate, CodeType::external("string"));
        assert!(prop.is_of_kind(&[PropertyKind::UrlTemplate, PropertyKind::RequestAdapter]));
        assert!(!prop.is_of_kind(&[PropertyKind::Custom]));
        assert_eq!(prop.wire_name(), "urlTemplate");
    }
}
