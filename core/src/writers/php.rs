//! # PHP Writer
//!
//! PSR-4 layout: one class per file, file named after the class, directory
//! tree mirroring the (capitalized) namespace.

use crate::codedom::{
    lower_first, ClassKind, CodeClass, CodeEnum, CodeMethod, CodeParameter, CodeProperty,
    CodeType, CodeUsing, CollectionKind, MethodKind, ParameterKind, PropertyKind, SimpleType,
    Visibility,
};
use crate::config::GenerationLanguage;
use crate::refiners::imports::split_qualified_symbol;
use crate::writers::{doc_lines, value_shape, CodeWriter, LanguageWriter, ValueShape};
use heck::ToShoutySnakeCase;
use std::collections::BTreeSet;

/// Writer for `GenerationLanguage::Php`.
pub struct PhpWriter;

const ENUM_BASE: &str = "Microsoft\\Kiota\\Abstractions\\Enum";

fn primitive(name: &str) -> Option<&'static str> {
    let mapped = match name {
        "string" | "Guid" => "string",
        "integer" | "int64" => "int",
        "number" | "double" | "float" | "decimal" => "float",
        "boolean" => "bool",
        "DateTimeOffset" => "\\DateTime",
        "DateOnly" => "\\Microsoft\\Kiota\\Abstractions\\Types\\Date",
        "TimeOnly" => "\\Microsoft\\Kiota\\Abstractions\\Types\\Time",
        "TimeSpan" => "\\DateInterval",
        "object" => "mixed",
        "void" => "void",
        _ => return None,
    };
    Some(mapped)
}

fn element_type(ty: &SimpleType) -> String {
    primitive(&ty.name).map(str::to_string).unwrap_or_else(|| ty.name.clone())
}

/// PHP type declaration for `ty`.
pub fn translate_type(ty: &CodeType) -> String {
    let name = match ty {
        CodeType::Simple(s) if s.collection != CollectionKind::None => "array".to_string(),
        CodeType::Simple(s) => element_type(s),
        CodeType::Union(u) => u.name.clone(),
    };
    if ty.is_nullable() && !matches!(name.as_str(), "mixed" | "void") {
        format!("?{}", name)
    } else {
        name
    }
}

/// Docblock type, with the element type of collections.
fn doc_type(ty: &CodeType) -> String {
    let name = match ty {
        CodeType::Simple(s) if s.collection != CollectionKind::None => format!("array<{}>", element_type(s)),
        CodeType::Simple(s) => element_type(s),
        CodeType::Union(u) => u.name.clone(),
    };
    if ty.is_nullable() {
        format!("{}|null", name)
    } else {
        name
    }
}

fn value_method_suffix(name: &str) -> &'static str {
    match name {
        "integer" | "int64" => "Integer",
        "number" | "double" | "float" | "decimal" => "Float",
        "boolean" => "Boolean",
        "DateTimeOffset" => "DateTime",
        "DateOnly" => "Date",
        "TimeOnly" => "Time",
        "TimeSpan" => "DateInterval",
        "StreamInterface" => "BinaryContent",
        "object" => "Any",
        _ => "String",
    }
}

fn visibility(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public",
        Visibility::Protected => "protected",
        Visibility::Private => "private",
    }
}

fn php_namespace(namespace: &str) -> String {
    namespace.replace('.', "\\")
}

fn write_docblock(out: &mut CodeWriter, description: Option<&str>, tags: &[String]) {
    let lines = doc_lines(description);
    if lines.is_empty() && tags.is_empty() {
        return;
    }
    out.line("/**");
    for line in lines {
        out.line(format!(" * {}", line));
    }
    for tag in tags {
        out.line(format!(" * {}", tag));
    }
    out.line("*/");
}

fn write_header(out: &mut CodeWriter, namespace: &str, usings: &BTreeSet<CodeUsing>, extra: &[&str]) {
    out.line("<?php");
    out.blank();
    out.line(format!("namespace {};", php_namespace(namespace)));
    out.blank();
    let mut lines: BTreeSet<String> = extra.iter().map(|e| e.to_string()).collect();
    for using in usings {
        if using.symbol.is_empty() || (!using.is_external && using.module == namespace) {
            continue;
        }
        let line = match (using.is_external, using.module.is_empty()) {
            (_, true) => using.symbol.clone(),
            (true, false) => format!("{}\\{}", using.module, using.symbol),
            (false, false) => format!("{}\\{}", php_namespace(&using.module), using.symbol),
        };
        lines.insert(line);
    }
    if lines.is_empty() {
        return;
    }
    for line in &lines {
        out.line(format!("use {};", line));
    }
    out.blank();
}

fn parameter_declaration(parameter: &CodeParameter) -> String {
    let declaration = format!("{} ${}", translate_type(&parameter.ty), parameter.name);
    if parameter.optional {
        format!("{} = null", declaration)
    } else {
        declaration
    }
}

fn parameter_tags(method: &CodeMethod) -> Vec<String> {
    method
        .parameters
        .iter()
        .map(|p| {
            let description = p.description.as_deref().unwrap_or_default();
            format!("@param {} ${} {}", doc_type(&p.ty), p.name, description).trim_end().to_string()
        })
        .collect()
}

fn write_property(out: &mut CodeWriter, property: &CodeProperty) {
    let mut tags = Vec::new();
    if property.kind == PropertyKind::QueryParameter {
        if let Some(wire) = &property.serialization_name {
            tags.push(format!("@QueryParameter(\"{}\")", wire.replace('$', "%24")));
        }
    }
    tags.push(format!("@var {} ${}", doc_type(&property.ty), property.name));
    write_docblock(out, property.description.as_deref(), &tags);
    let ty = translate_type(&property.ty);
    let initializer = if ty.starts_with('?') && property.default_value.is_none() {
        " = null"
    } else {
        ""
    };
    out.line(format!(
        "{} {} ${}{};",
        visibility(property.visibility),
        ty,
        property.name,
        initializer
    ));
    out.blank();
}

fn write_navigation_property(out: &mut CodeWriter, property: &CodeProperty) {
    let ty = translate_type(&property.ty);
    let ty = ty.trim_start_matches('?');
    write_docblock(out, property.description.as_deref(), &[]);
    out.block(format!("public function {}(): {} {{", property.name, ty), "}", |out| {
        out.line(format!("return new {}($this->pathParameters, $this->requestAdapter);", ty));
    });
    out.blank();
}

fn write_default_assignments(out: &mut CodeWriter, class: &CodeClass) {
    for property in &class.properties {
        if let Some(default) = &property.default_value {
            out.line(format!("$this->{} = {};", property.name, default.replace('"', "'")));
        }
    }
}

fn factory_callable(ty: &SimpleType) -> String {
    format!("[{}::class, 'createFromDiscriminatorValue']", element_type(ty))
}

fn write_executor_body(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    let generator = class
        .methods_of_kind(MethodKind::RequestGenerator)
        .find(|g| g.http_method == method.http_method);
    let arguments: Vec<String> = generator
        .map(|g| g.parameters.iter().map(|p| format!("${}", p.name)).collect())
        .unwrap_or_default();
    out.line(format!(
        "$requestInfo = $this->{}({});",
        generator.map(|g| lower_first(&g.name)).unwrap_or_default(),
        arguments.join(", ")
    ));
    let handler = method
        .parameter_of_kind(ParameterKind::ResponseHandler)
        .map(|p| format!("${}", p.name))
        .unwrap_or_else(|| "null".to_string());
    let call = match &method.return_type {
        CodeType::Simple(s) if s.name == "void" => format!("sendNoContentAsync($requestInfo, {})", handler),
        CodeType::Simple(s) => match (s.collection, value_shape(s)) {
            (CollectionKind::None, ValueShape::Object) => {
                format!("sendAsync($requestInfo, {}, {})", factory_callable(s), handler)
            }
            (CollectionKind::None, _) => {
                format!("sendPrimitiveAsync($requestInfo, '{}', {})", element_type(s), handler)
            }
            (_, ValueShape::Object) => {
                format!("sendCollectionAsync($requestInfo, {}, {})", factory_callable(s), handler)
            }
            (_, _) => format!(
                "sendPrimitiveCollectionAsync($requestInfo, '{}', {})",
                element_type(s),
                handler
            ),
        },
        CodeType::Union(u) => format!(
            "sendAsync($requestInfo, [{}::class, 'createFromDiscriminatorValue'], {})",
            u.name, handler
        ),
    };
    out.block("try {", "}", |out| {
        out.line(format!("return $this->requestAdapter->{};", call));
    });
    out.block("catch(Exception $ex) {", "}", |out| {
        out.line("return new RejectedPromise($ex);");
    });
}

fn write_generator_body(out: &mut CodeWriter, method: &CodeMethod) {
    out.line("$requestInfo = new RequestInformation();");
    out.line("$requestInfo->urlTemplate = $this->urlTemplate;");
    out.line("$requestInfo->pathParameters = $this->pathParameters;");
    if let Some(http) = method.http_method {
        out.line(format!("$requestInfo->httpMethod = HttpMethod::{};", http.as_str().to_ascii_uppercase()));
    }
    if let Some(headers) = method.parameter_of_kind(ParameterKind::Headers) {
        out.block(format!("if (${} !== null) {{", headers.name), "}", |out| {
            out.line(format!("$requestInfo->headers = array_merge($requestInfo->headers, ${});", headers.name));
        });
    }
    if let Some(query) = method.parameter_of_kind(ParameterKind::QueryParameter) {
        out.block(format!("if (${} !== null) {{", query.name), "}", |out| {
            out.line(format!("$requestInfo->setQueryParameters(${});", query.name));
        });
    }
    if let Some(body) = method.parameter_of_kind(ParameterKind::RequestBody) {
        let content_type = method.request_body_content_type.as_deref().unwrap_or("application/json");
        out.block(format!("if (${} !== null) {{", body.name), "}", |out| {
            let line = match body.ty.as_simple() {
                Some(s) if s.name == "StreamInterface" => format!("$requestInfo->setStreamContent(${});", body.name),
                Some(s) if value_shape(s) == ValueShape::Object => format!(
                    "$requestInfo->setContentFromParsable($this->requestAdapter, \"{}\", ${});",
                    content_type, body.name
                ),
                _ => format!(
                    "$requestInfo->setContentFromScalar($this->requestAdapter, \"{}\", ${});",
                    content_type, body.name
                ),
            };
            out.line(line);
        });
    }
    if let Some(options) = method.parameter_of_kind(ParameterKind::Options) {
        out.block(format!("if (${} !== null) {{", options.name), "}", |out| {
            out.line(format!("$requestInfo->addRequestOptions(...${});", options.name));
        });
    }
    out.line("return $requestInfo;");
}

fn write_serializer_body(out: &mut CodeWriter, class: &CodeClass) {
    if class.parent_class.is_some() {
        out.line("parent::serialize($writer);");
    }
    for property in class.properties.iter().filter(|p| p.kind == PropertyKind::Custom) {
        let Some(s) = property.ty.as_simple() else {
            continue;
        };
        let wire = property.wire_name();
        let value = format!("$this->{}", property.name);
        let line = match (s.collection, value_shape(s)) {
            (CollectionKind::None, ValueShape::Primitive) => {
                format!("$writer->write{}Value('{}', {});", value_method_suffix(&s.name), wire, value)
            }
            (CollectionKind::None, ValueShape::Enum) => format!("$writer->writeEnumValue('{}', {});", wire, value),
            (CollectionKind::None, ValueShape::Object) => format!("$writer->writeObjectValue('{}', {});", wire, value),
            (_, ValueShape::Object) => format!("$writer->writeCollectionOfObjectValues('{}', {});", wire, value),
            (_, _) => format!("$writer->writeCollectionOfPrimitiveValues('{}', {});", wire, value),
        };
        out.line(line);
    }
    if let Some(additional) = class.property_of_kind(PropertyKind::AdditionalData) {
        out.line(format!("$writer->writeAdditionalData($this->{});", additional.name));
    }
}

fn parse_call(ty: &SimpleType) -> String {
    match (ty.collection, value_shape(ty)) {
        (CollectionKind::None, ValueShape::Primitive) => {
            format!("$n->get{}Value()", value_method_suffix(&ty.name))
        }
        (CollectionKind::None, ValueShape::Enum) => format!("$n->getEnumValue({}::class)", ty.name),
        (CollectionKind::None, ValueShape::Object) => format!("$n->getObjectValue({})", factory_callable(ty)),
        (_, ValueShape::Object) => format!("$n->getCollectionOfObjectValues({})", factory_callable(ty)),
        (_, ValueShape::Enum) => format!("$n->getCollectionOfEnumValues({}::class)", ty.name),
        (_, ValueShape::Primitive) => "$n->getCollectionOfPrimitiveValues()".to_string(),
    }
}

fn write_deserializer_body(out: &mut CodeWriter, class: &CodeClass) {
    out.line("$o = $this;");
    let (open, close) = if class.parent_class.is_some() {
        ("return array_merge(parent::getFieldDeserializers(), [", "]);")
    } else {
        ("return [", "];")
    };
    out.block(open, close, |out| {
        for property in class.properties.iter().filter(|p| p.kind == PropertyKind::Custom) {
            let Some(s) = property.ty.as_simple() else {
                continue;
            };
            let setter = class
                .methods_of_kind(MethodKind::Setter)
                .find(|m| m.accessed_member.as_deref() == Some(property.name.as_str()));
            let assignment = match setter {
                Some(setter) => format!("$o->{}({})", setter.name, parse_call(s)),
                None => format!("$o->{} = {}", property.name, parse_call(s)),
            };
            out.line(format!("'{}' => fn(ParseNode $n) => {},", property.wire_name(), assignment));
        }
    });
}

fn write_method_body(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    match method.kind {
        MethodKind::ClientConstructor => {
            write_default_assignments(out, class);
            out.line("$this->pathParameters = [];");
            out.line("$this->requestAdapter = $requestAdapter;");
            for module in &method.serializer_modules {
                out.line(format!(
                    "ApiClientBuilder::registerDefaultSerializer({}::class);",
                    split_qualified_symbol(module).symbol
                ));
            }
            for module in &method.deserializer_modules {
                out.line(format!(
                    "ApiClientBuilder::registerDefaultDeserializer({}::class);",
                    split_qualified_symbol(module).symbol
                ));
            }
            if let Some(base_url) = &method.base_url {
                out.block("if (empty($this->requestAdapter->getBaseUrl())) {", "}", |out| {
                    out.line(format!("$this->requestAdapter->setBaseUrl('{}');", base_url));
                });
            }
            if let Some(store) = method.parameter_of_kind(ParameterKind::BackingStore) {
                out.line(format!("$this->requestAdapter->enableBackingStore(${} ?? BackingStoreFactorySingleton::getInstance());", store.name));
            }
        }
        MethodKind::Constructor if class.kind == ClassKind::RequestBuilder => {
            write_default_assignments(out, class);
            out.line("$urlTplParams = $pathParameters;");
            for parameter in method.parameters.iter().filter(|p| p.kind == ParameterKind::Path) {
                let wire = parameter.serialization_name.as_deref().unwrap_or(&parameter.name);
                out.block(format!("if (${} !== null) {{", parameter.name), "}", |out| {
                    out.line(format!("$urlTplParams['{}'] = ${};", wire, parameter.name));
                });
            }
            out.line("$this->pathParameters = $urlTplParams;");
            out.line("$this->requestAdapter = $requestAdapter;");
        }
        MethodKind::Constructor => {
            if class.parent_class.is_some() {
                out.line("parent::__construct();");
            }
            write_default_assignments(out, class);
        }
        MethodKind::RawUrlConstructor => {
            write_default_assignments(out, class);
            out.line("$this->pathParameters = ['request-raw-url' => $rawUrl];");
            out.line("$this->requestAdapter = $requestAdapter;");
        }
        MethodKind::RequestExecutor => write_executor_body(out, class, method),
        MethodKind::RequestGenerator => write_generator_body(out, method),
        MethodKind::Serializer => write_serializer_body(out, class),
        MethodKind::Deserializer => write_deserializer_body(out, class),
        MethodKind::RequestBuilderWithParameters => {
            let arguments: Vec<String> = method.parameters.iter().map(|p| format!("${}", p.name)).collect();
            out.line(format!(
                "return new {}($this->pathParameters, $this->requestAdapter, {});",
                method.return_type.name(),
                arguments.join(", ")
            ));
        }
        MethodKind::RequestBuilderBackwardCompatibility => out.line(format!(
            "return new {}($this->pathParameters, $this->requestAdapter);",
            method.return_type.name()
        )),
        MethodKind::IndexerBackwardCompatibility => {
            let argument = method.parameters.first().map(|p| p.name.as_str()).unwrap_or("id");
            out.line("$urlTplParams = $this->pathParameters;");
            out.line(format!(
                "$urlTplParams['{}'] = ${};",
                method.accessed_member.as_deref().unwrap_or(argument),
                argument
            ));
            out.line(format!(
                "return new {}($urlTplParams, $this->requestAdapter);",
                method.return_type.name()
            ));
        }
        MethodKind::Getter => out.line(format!(
            "return $this->{};",
            method.accessed_member.as_deref().unwrap_or_default()
        )),
        MethodKind::Setter => out.line(format!(
            "$this->{} = $value;",
            method.accessed_member.as_deref().unwrap_or_default()
        )),
        MethodKind::NullCheck => out.line("return false;"),
        MethodKind::Custom => out.line("throw new Exception('Method not implemented.');"),
    }
}

fn return_type(method: &CodeMethod) -> Option<String> {
    match method.kind {
        MethodKind::Constructor | MethodKind::ClientConstructor | MethodKind::RawUrlConstructor => None,
        MethodKind::RequestExecutor => Some("Promise".to_string()),
        MethodKind::Serializer | MethodKind::Setter => Some("void".to_string()),
        _ => Some(translate_type(&method.return_type)),
    }
}

fn write_method(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    let mut tags = parameter_tags(method);
    let returns = return_type(method);
    if let Some(returns) = &returns {
        if returns != "void" {
            tags.push(format!("@return {}", doc_type(&method.return_type)));
        }
    }
    write_docblock(out, method.description.as_deref(), &tags);
    let parameters: Vec<String> = method.parameters.iter().map(parameter_declaration).collect();
    let open = match &returns {
        Some(returns) => format!(
            "{} function {}({}): {} {{",
            visibility(method.visibility),
            lower_first(&method.name),
            parameters.join(", "),
            returns
        ),
        None => format!("{} function __construct({}) {{", visibility(method.visibility), parameters.join(", ")),
    };
    out.block(open, "}", |out| write_method_body(out, class, method));
    out.blank();
}

fn write_discriminator_factory(out: &mut CodeWriter, class: &CodeClass) {
    write_docblock(
        out,
        Some("Creates a new instance of the appropriate class based on discriminator value"),
        &[
            "@param ParseNode $parseNode The parse node to use to read the discriminator value and create the object".to_string(),
            format!("@return {}", class.name),
        ],
    );
    out.block(
        format!("public static function createFromDiscriminatorValue(ParseNode $parseNode): {} {{", class.name),
        "}",
        |out| out.line(format!("return new {}();", class.name)),
    );
    out.blank();
}

fn heritage(class: &CodeClass) -> String {
    let mut heritage = String::new();
    if let Some(parent) = &class.parent_class {
        heritage.push_str(&format!(" extends {}", parent.name));
    }
    if !class.implements.is_empty() {
        let names: Vec<&str> = class.implements.iter().map(|i| i.name.as_str()).collect();
        heritage.push_str(&format!(" implements {}", names.join(", ")));
    }
    heritage
}

impl LanguageWriter for PhpWriter {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::Php
    }

    fn extension(&self) -> &'static str {
        "php"
    }

    fn file_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn write_class(&self, namespace: &str, class: &CodeClass, out: &mut CodeWriter) {
        let is_model = class.is_of_kind(&[ClassKind::Model, ClassKind::UnionWrapper]);
        let extra: &[&str] = if is_model {
            &["Microsoft\\Kiota\\Abstractions\\Serialization\\ParseNode"]
        } else {
            &[]
        };
        write_header(out, namespace, &class.usings, extra);
        write_docblock(out, class.description.as_deref(), &[]);
        out.line(format!("class {}{}", class.name, heritage(class)));
        out.block("{", "}", |out| {
            for property in &class.properties {
                if property.kind == PropertyKind::RequestBuilder {
                    continue;
                }
                write_property(out, property);
            }
            for method in class.methods.iter().filter(|m| {
                m.is_of_kind(&[MethodKind::Constructor, MethodKind::ClientConstructor, MethodKind::RawUrlConstructor])
            }) {
                write_method(out, class, method);
            }
            if is_model {
                write_discriminator_factory(out, class);
            }
            for property in class.properties.iter().filter(|p| p.kind == PropertyKind::RequestBuilder) {
                write_navigation_property(out, property);
            }
            for method in class.methods.iter().filter(|m| {
                !m.is_of_kind(&[MethodKind::Constructor, MethodKind::ClientConstructor, MethodKind::RawUrlConstructor])
            }) {
                write_method(out, class, method);
            }
        });
    }

    fn write_enum(&self, namespace: &str, enumeration: &CodeEnum, out: &mut CodeWriter) {
        write_header(out, namespace, &enumeration.usings, &[ENUM_BASE]);
        write_docblock(out, enumeration.description.as_deref(), &[]);
        out.line(format!("class {} extends Enum", enumeration.name));
        out.block("{", "}", |out| {
            for option in &enumeration.options {
                out.line(format!("public const {} = '{}';", option.to_shouty_snake_case(), option));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::DeclarationRef;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_translation() {
        assert_eq!(translate_type(&CodeType::external("int64")), "?int");
        assert_eq!(translate_type(&CodeType::external("DateTimeOffset")), "?\\DateTime");
        let tags = CodeType::Simple(SimpleType::external("string").collection(CollectionKind::Array));
        assert_eq!(translate_type(&tags), "?array");
        assert_eq!(doc_type(&tags), "array<string>|null");
    }

    #[test]
    fn test_model_rendering() {
        let mut pet = CodeClass::new("Pet", ClassKind::Model);
        pet.usings.insert(CodeUsing::external("Microsoft\\Kiota\\Abstractions\\Serialization", "Parsable"));
        pet.usings.insert(CodeUsing::internal("ApiSdk.Models", "Owner"));
        pet.implements.push(SimpleType::external("Parsable"));
        pet.add_property(
            CodeProperty::new("name", PropertyKind::Custom, CodeType::external("string"))
                .with_visibility(Visibility::Private),
        )
        .unwrap();
        pet.add_property(CodeProperty::new(
            "owner",
            PropertyKind::Custom,
            CodeType::bound(DeclarationRef::class("ApiSdk.Models", "Owner")),
        ))
        .unwrap();
        let mut setter = CodeMethod::new("setName", MethodKind::Setter);
        setter.accessed_member = Some("name".into());
        setter.add_parameter(CodeParameter::new("value", ParameterKind::SetterValue, CodeType::external("string")));
        pet.add_method(setter).unwrap();
        let mut deserializer = CodeMethod::field_deserializers().returning(CodeType::external("array"));
        deserializer.name = "getFieldDeserializers".into();
        pet.add_method(deserializer).unwrap();

        let mut out = CodeWriter::new("    ");
        PhpWriter.write_class("ApiSdk.Models", &pet, &mut out);
        let code = out.finish();
        assert!(code.starts_with("<?php\n\nnamespace ApiSdk\\Models;\n\n"));
        assert!(code.contains("use Microsoft\\Kiota\\Abstractions\\Serialization\\Parsable;\n"));
        assert!(!code.contains("use ApiSdk\\Models\\Owner;"));
        assert!(code.contains("class Pet implements Parsable\n{"));
        assert!(code.contains("private ?string $name = null;"));
        assert!(code.contains("public function setName(?string $value): void {"));
        assert!(code.contains("'name' => fn(ParseNode $n) => $o->setName($n->getStringValue()),"));
        assert!(code.contains(
            "'owner' => fn(ParseNode $n) => $o->owner = $n->getObjectValue([Owner::class, 'createFromDiscriminatorValue']),"
        ));
    }

    #[test]
    fn test_enum_rendering() {
        let e = CodeEnum::new("Color", None, ["dark-blue".to_string()]);
        let mut out = CodeWriter::new("    ");
        PhpWriter.write_enum("ApiSdk.Models", &e, &mut out);
        let code = out.finish();
        assert!(code.contains("use Microsoft\\Kiota\\Abstractions\\Enum;"));
        assert!(code.contains("class Color extends Enum\n{\n    public const DARK_BLUE = 'dark-blue';\n}"));
    }
}
