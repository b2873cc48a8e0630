//! # C# Writer
//!
//! One `.cs` file per top-level class, inner classes nested. Members are
//! PascalCase, parameters keep their camelCase names.

use crate::codedom::{
    upper_first, ClassKind, CodeClass, CodeEnum, CodeIndexer, CodeMethod, CodeParameter,
    CodeProperty, CodeType, CollectionKind, MethodKind, ParameterKind, PropertyKind, SimpleType,
    Visibility,
};
use crate::config::GenerationLanguage;
use crate::writers::{doc_lines, value_shape, CodeWriter, LanguageWriter, ValueShape};
use heck::ToUpperCamelCase;
use std::collections::BTreeSet;

/// Writer for `GenerationLanguage::CSharp`.
pub struct CSharpWriter;

/// C# name of a primitive, and whether it is a value type.
fn primitive(name: &str) -> Option<(&'static str, bool)> {
    let mapped = match name {
        "string" => ("string", false),
        "integer" => ("int", true),
        "int64" => ("long", true),
        "boolean" => ("bool", true),
        "number" | "double" => ("double", true),
        "float" => ("float", true),
        "decimal" => ("decimal", true),
        "DateTimeOffset" => ("DateTimeOffset", true),
        "DateOnly" => ("Date", true),
        "TimeOnly" => ("Time", true),
        "TimeSpan" => ("TimeSpan", true),
        "Guid" => ("Guid", true),
        "binary" => ("byte[]", false),
        "object" => ("object", false),
        "void" => ("void", false),
        _ => return None,
    };
    Some(mapped)
}

fn simple_type_name(ty: &SimpleType) -> String {
    let (base, value_type) = match primitive(&ty.name) {
        Some((name, value_type)) if ty.is_external() => (name.to_string(), value_type),
        _ => (ty.name.clone(), false),
    };
    let rendered = match ty.collection {
        CollectionKind::None if value_type && ty.is_nullable => format!("{}?", base),
        CollectionKind::None => base,
        CollectionKind::Array | CollectionKind::Complex => format!("List<{}>", base),
    };
    if ty.action_of {
        format!("Action<{}>", rendered)
    } else {
        rendered
    }
}

/// Renders a type reference.
pub fn translate_type(ty: &CodeType) -> String {
    match ty {
        CodeType::Simple(s) => simple_type_name(s),
        CodeType::Union(u) => u.name.clone(),
    }
}

/// Serialization method suffix (`String` in `WriteStringValue`).
fn value_method_suffix(ty: &SimpleType) -> String {
    match ty.name.as_str() {
        "integer" => "Int".into(),
        "int64" => "Long".into(),
        "boolean" => "Bool".into(),
        "number" | "double" => "Double".into(),
        "binary" => "ByteArray".into(),
        "DateOnly" => "Date".into(),
        "TimeOnly" => "Time".into(),
        other => upper_first(other),
    }
}

fn member_name(name: &str) -> String {
    if name.starts_with('@') {
        name.to_string()
    } else {
        upper_first(name)
    }
}

fn visibility(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public",
        Visibility::Protected => "protected",
        Visibility::Private => "private",
    }
}

fn write_summary(out: &mut CodeWriter, description: Option<&str>) {
    let lines = doc_lines(description);
    if lines.is_empty() {
        return;
    }
    out.line("/// <summary>");
    for line in lines {
        out.line(format!("/// {}", line));
    }
    out.line("/// </summary>");
}

fn parameter_declaration(parameter: &CodeParameter) -> String {
    let ty = translate_type(&parameter.ty);
    match (&parameter.default_value, parameter.optional) {
        (Some(default), _) => format!("{} {} = {}", ty, parameter.name, default),
        (None, true) => format!("{} {} = default", ty, parameter.name),
        (None, false) => format!("{} {}", ty, parameter.name),
    }
}

fn write_property(out: &mut CodeWriter, class: &CodeClass, property: &CodeProperty) {
    write_summary(out, property.description.as_deref());
    let ty = translate_type(&property.ty);
    let name = member_name(&property.name);
    match property.kind {
        PropertyKind::RequestBuilder => out.line(format!(
            "{} {} {} {{ get => new {}(PathParameters, RequestAdapter); }}",
            visibility(property.visibility),
            ty,
            name,
            ty
        )),
        _ => {
            if property.kind == PropertyKind::QueryParameter {
                if let Some(wire) = &property.serialization_name {
                    out.line(format!("[QueryParameter(\"{}\")]", wire.replace('$', "%24")));
                }
            }
            let accessors = if property.read_only && class.kind == ClassKind::Model {
                "{ get; private set; }"
            } else {
                "{ get; set; }"
            };
            out.line(format!(
                "{} {} {} {}",
                visibility(property.visibility),
                ty,
                name,
                accessors
            ));
        }
    }
}

fn write_indexer(out: &mut CodeWriter, indexer: &CodeIndexer) {
    write_summary(out, indexer.description.as_deref());
    let ty = translate_type(&indexer.return_type);
    out.block(
        format!("public {} this[{} position] {{ get {{", ty, translate_type(&indexer.index_type)),
        "} }",
        |out| {
            out.line("var urlTplParams = new Dictionary<string, object>(PathParameters);");
            out.line(format!(
                "urlTplParams.Add(\"{}\", position);",
                indexer.parameter_name
            ));
            out.line(format!("return new {}(urlTplParams, RequestAdapter);", ty));
        },
    );
}

fn module_symbol(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

fn write_default_assignments(out: &mut CodeWriter, class: &CodeClass) {
    for property in class.properties.iter().filter(|p| p.default_value.is_some()) {
        if let Some(default) = &property.default_value {
            out.line(format!("{} = {};", member_name(&property.name), default));
        }
    }
}

fn write_null_guards(out: &mut CodeWriter, method: &CodeMethod) {
    for parameter in method.parameters.iter().filter(|p| !p.optional && !p.ty.is_nullable()) {
        if let CodeType::Simple(s) = &parameter.ty {
            if s.is_external() && primitive(&s.name).is_some_and(|(_, value)| value) {
                continue;
            }
        }
        out.line(format!(
            "_ = {} ?? throw new ArgumentNullException(nameof({}));",
            parameter.name, parameter.name
        ));
    }
}

fn write_method_body(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    match method.kind {
        MethodKind::ClientConstructor => {
            write_null_guards(out, method);
            write_default_assignments(out, class);
            out.line("PathParameters = new Dictionary<string, object>();");
            out.line("RequestAdapter = requestAdapter;");
            for module in &method.serializer_modules {
                out.line(format!(
                    "ApiClientBuilder.RegisterDefaultSerializer<{}>();",
                    module_symbol(module)
                ));
            }
            for module in &method.deserializer_modules {
                out.line(format!(
                    "ApiClientBuilder.RegisterDefaultDeserializer<{}>();",
                    module_symbol(module)
                ));
            }
            if let Some(base_url) = &method.base_url {
                out.block("if (string.IsNullOrEmpty(RequestAdapter.BaseUrl)) {", "}", |out| {
                    out.line(format!("RequestAdapter.BaseUrl = \"{}\";", base_url));
                });
            }
            if let Some(store) = method.parameter_of_kind(ParameterKind::BackingStore) {
                out.line(format!("RequestAdapter.EnableBackingStore({});", store.name));
            }
        }
        MethodKind::Constructor if class.kind == ClassKind::RequestBuilder => {
            write_null_guards(out, method);
            write_default_assignments(out, class);
            out.line("var urlTplParams = new Dictionary<string, object>(pathParameters);");
            for parameter in method.parameters.iter().filter(|p| p.kind == ParameterKind::Path) {
                let wire = parameter.serialization_name.as_deref().unwrap_or(&parameter.name);
                out.line(format!(
                    "if (!string.IsNullOrWhiteSpace({})) urlTplParams.Add(\"{}\", {});",
                    parameter.name, wire, parameter.name
                ));
            }
            out.line("PathParameters = urlTplParams;");
            out.line("RequestAdapter = requestAdapter;");
        }
        MethodKind::Constructor => write_default_assignments(out, class),
        MethodKind::RawUrlConstructor => {
            write_null_guards(out, method);
            write_default_assignments(out, class);
            out.line("var urlTplParams = new Dictionary<string, object>();");
            out.line("urlTplParams.Add(\"request-raw-url\", rawUrl);");
            out.line("PathParameters = urlTplParams;");
            out.line("RequestAdapter = requestAdapter;");
        }
        MethodKind::RequestExecutor => write_executor_body(out, class, method),
        MethodKind::RequestGenerator => write_generator_body(out, method),
        MethodKind::Serializer => write_serializer_body(out, class),
        MethodKind::Deserializer => write_deserializer_body(out, class),
        MethodKind::RequestBuilderWithParameters => {
            let arguments: Vec<&str> = method.parameters.iter().map(|p| p.name.as_str()).collect();
            out.line(format!(
                "return new {}(PathParameters, RequestAdapter, {});",
                translate_type(&method.return_type),
                arguments.join(", ")
            ));
        }
        MethodKind::RequestBuilderBackwardCompatibility => out.line(format!(
            "return new {}(PathParameters, RequestAdapter);",
            translate_type(&method.return_type)
        )),
        MethodKind::IndexerBackwardCompatibility => {
            let argument = method.parameters.first().map(|p| p.name.as_str()).unwrap_or("id");
            out.line("var urlTplParams = new Dictionary<string, object>(PathParameters);");
            out.line(format!(
                "urlTplParams.Add(\"{}\", {});",
                method.accessed_member.as_deref().unwrap_or(argument),
                argument
            ));
            out.line(format!(
                "return new {}(urlTplParams, RequestAdapter);",
                translate_type(&method.return_type)
            ));
        }
        MethodKind::Getter => out.line(format!(
            "return {};",
            member_name(method.accessed_member.as_deref().unwrap_or_default())
        )),
        MethodKind::Setter => out.line(format!(
            "{} = value;",
            member_name(method.accessed_member.as_deref().unwrap_or_default())
        )),
        MethodKind::NullCheck => out.line("return false;"),
        MethodKind::Custom => out.line("throw new NotImplementedException();"),
    }
}

fn generator_for<'c>(class: &'c CodeClass, executor: &CodeMethod) -> Option<&'c CodeMethod> {
    class
        .methods_of_kind(MethodKind::RequestGenerator)
        .find(|g| g.http_method == executor.http_method)
}

fn write_executor_body(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    let Some(generator) = generator_for(class, method) else {
        out.line("throw new InvalidOperationException(\"No request generator\");");
        return;
    };
    let arguments: Vec<&str> = generator.parameters.iter().map(|p| p.name.as_str()).collect();
    out.line(format!(
        "var requestInfo = {}({});",
        member_name(&generator.name),
        arguments.join(", ")
    ));
    let handler = method
        .parameter_of_kind(ParameterKind::ResponseHandler)
        .map(|p| p.name.as_str())
        .unwrap_or("default");
    let cancellation = method
        .parameter_of_kind(ParameterKind::Cancellation)
        .map(|p| p.name.as_str())
        .unwrap_or("default");
    let tail = format!("requestInfo, {}, {}", handler, cancellation);
    match &method.return_type {
        CodeType::Simple(s) if s.name == "void" => {
            out.line(format!("await RequestAdapter.SendNoContentAsync({});", tail));
        }
        CodeType::Simple(s) => {
            let element = simple_type_name(&SimpleType {
                collection: CollectionKind::None,
                ..s.clone()
            });
            let call = match (s.collection, value_shape(s)) {
                (CollectionKind::None, ValueShape::Object) => format!("SendAsync<{}>", element),
                (CollectionKind::None, _) => format!("SendPrimitiveAsync<{}>", element),
                (_, ValueShape::Object) => format!("SendCollectionAsync<{}>", element),
                (_, _) => format!("SendPrimitiveCollectionAsync<{}>", element),
            };
            if s.collection == CollectionKind::None {
                out.line(format!("return await RequestAdapter.{}({});", call, tail));
            } else {
                out.line(format!("var collectionResult = await RequestAdapter.{}({});", call, tail));
                out.line("return collectionResult.ToList();");
            }
        }
        CodeType::Union(u) => out.line(format!(
            "return await RequestAdapter.SendAsync<{}>({});",
            u.name, tail
        )),
    }
}

fn write_generator_body(out: &mut CodeWriter, method: &CodeMethod) {
    write_null_guards(out, method);
    let http = method.http_method.map(|m| m.as_str().to_ascii_uppercase()).unwrap_or_default();
    out.block("var requestInfo = new RequestInformation {", "};", |out| {
        out.line(format!("HttpMethod = Method.{},", http));
        out.line("UrlTemplate = UrlTemplate,");
        out.line("PathParameters = PathParameters,");
    });
    if let Some(body) = method.parameter_of_kind(ParameterKind::RequestBody) {
        let content_type = method.request_body_content_type.as_deref().unwrap_or("application/json");
        match body.ty.as_simple() {
            Some(s) if s.name == "Stream" || s.name == "binary" => {
                out.line(format!("requestInfo.SetStreamContent({});", body.name));
            }
            Some(s) if value_shape(s) == ValueShape::Primitive => out.line(format!(
                "requestInfo.SetContentFromScalar(RequestAdapter, \"{}\", {});",
                content_type, body.name
            )),
            _ => out.line(format!(
                "requestInfo.SetContentFromParsable(RequestAdapter, \"{}\", {});",
                content_type, body.name
            )),
        }
    }
    if let Some(query) = method.parameter_of_kind(ParameterKind::QueryParameter) {
        let query_class = query.ty.name().to_string();
        out.block(format!("if ({} != null) {{", query.name), "}", |out| {
            out.line(format!("var qParams = new {}();", query_class));
            out.line(format!("{}.Invoke(qParams);", query.name));
            out.line("qParams.AddQueryParameters(requestInfo.QueryParameters);");
        });
    }
    if let Some(headers) = method.parameter_of_kind(ParameterKind::Headers) {
        out.block(format!("if ({} != null) {{", headers.name), "}", |out| {
            out.line(format!(
                "foreach (var header in {}) requestInfo.Headers.Add(header.Key, header.Value);",
                headers.name
            ));
        });
    }
    if let Some(options) = method.parameter_of_kind(ParameterKind::Options) {
        out.line(format!("requestInfo.AddRequestOptions({}?.ToArray());", options.name));
    }
    out.line("return requestInfo;");
}

fn serializable_properties(class: &CodeClass) -> impl Iterator<Item = &CodeProperty> {
    class
        .properties
        .iter()
        .filter(|p| p.kind == PropertyKind::Custom)
}

fn write_serializer_body(out: &mut CodeWriter, class: &CodeClass) {
    out.line("_ = writer ?? throw new ArgumentNullException(nameof(writer));");
    if class.parent_class.is_some() {
        out.line("base.Serialize(writer);");
    }
    for property in serializable_properties(class) {
        let Some(s) = property.ty.as_simple() else {
            continue;
        };
        let element = simple_type_name(&SimpleType {
            collection: CollectionKind::None,
            is_nullable: false,
            ..s.clone()
        });
        let writer_method = match (s.collection, value_shape(s)) {
            (CollectionKind::None, ValueShape::Primitive) => {
                format!("Write{}Value", value_method_suffix(s))
            }
            (CollectionKind::None, ValueShape::Enum) => format!("WriteEnumValue<{}>", element),
            (CollectionKind::None, ValueShape::Object) => format!("WriteObjectValue<{}>", element),
            (_, ValueShape::Object) => format!("WriteCollectionOfObjectValues<{}>", element),
            (_, ValueShape::Enum) => format!("WriteCollectionOfEnumValues<{}>", element),
            (_, ValueShape::Primitive) => format!("WriteCollectionOfPrimitiveValues<{}>", element),
        };
        out.line(format!(
            "writer.{}(\"{}\", {});",
            writer_method,
            property.wire_name(),
            member_name(&property.name)
        ));
    }
    if let Some(additional) = class.property_of_kind(PropertyKind::AdditionalData) {
        out.line(format!("writer.WriteAdditionalData({});", member_name(&additional.name)));
    }
}

fn write_deserializer_body(out: &mut CodeWriter, class: &CodeClass) {
    let open = if class.parent_class.is_some() {
        "return new Dictionary<string, Action<T, IParseNode>>(base.GetFieldDeserializers<T>()) {"
    } else {
        "return new Dictionary<string, Action<T, IParseNode>> {"
    };
    out.block(open, "};", |out| {
        for property in serializable_properties(class) {
            let Some(s) = property.ty.as_simple() else {
                continue;
            };
            let element = simple_type_name(&SimpleType {
                collection: CollectionKind::None,
                is_nullable: false,
                ..s.clone()
            });
            let getter = match (s.collection, value_shape(s)) {
                (CollectionKind::None, ValueShape::Primitive) => {
                    format!("Get{}Value()", value_method_suffix(s))
                }
                (CollectionKind::None, ValueShape::Enum) => format!("GetEnumValue<{}>()", element),
                (CollectionKind::None, ValueShape::Object) => format!("GetObjectValue<{}>()", element),
                (_, ValueShape::Object) => format!("GetCollectionOfObjectValues<{}>().ToList()", element),
                (_, ValueShape::Enum) => format!("GetCollectionOfEnumValues<{}>().ToList()", element),
                (_, ValueShape::Primitive) => {
                    format!("GetCollectionOfPrimitiveValues<{}>().ToList()", element)
                }
            };
            out.line(format!(
                "{{\"{}\", (o,n) => {{ (o as {}).{} = n.{}; }} }},",
                property.wire_name(),
                class.name,
                member_name(&property.name),
                getter
            ));
        }
    });
}

fn method_signature(class: &CodeClass, method: &CodeMethod) -> String {
    let parameters: Vec<String> = method.parameters.iter().map(parameter_declaration).collect();
    let parameters = parameters.join(", ");
    let vis = visibility(method.visibility);
    match method.kind {
        MethodKind::Constructor | MethodKind::ClientConstructor | MethodKind::RawUrlConstructor => {
            format!("{} {}({}) {{", vis, class.name, parameters)
        }
        MethodKind::Serializer | MethodKind::Deserializer => {
            let modifier = if class.parent_class.is_some() { " new" } else { "" };
            let generic = if method.kind == MethodKind::Deserializer { "<T>" } else { "" };
            format!(
                "{}{} {} {}{}({}) {{",
                vis,
                modifier,
                translate_type(&method.return_type),
                member_name(&method.name),
                generic,
                parameters
            )
        }
        _ => {
            let return_type = translate_type(&method.return_type);
            let return_type = match (method.is_async, return_type.as_str()) {
                (true, "void") => "async Task".to_string(),
                (true, _) => format!("async Task<{}>", return_type),
                (false, _) => return_type,
            };
            format!("{} {} {}({}) {{", vis, return_type, member_name(&method.name), parameters)
        }
    }
}

fn write_method(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    write_summary(out, method.description.as_deref());
    for parameter in &method.parameters {
        if let Some(description) = &parameter.description {
            out.line(format!(
                "/// <param name=\"{}\">{}</param>",
                parameter.name.trim_start_matches('@'),
                description
            ));
        }
    }
    out.block(method_signature(class, method), "}", |out| {
        write_method_body(out, class, method);
    });
}

fn class_declaration(class: &CodeClass) -> String {
    let derivation: Vec<&str> = class
        .parent_class
        .iter()
        .chain(class.implements.iter())
        .map(|t| t.name.as_str())
        .collect();
    if derivation.is_empty() {
        format!("public class {} {{", class.name)
    } else {
        format!("public class {} : {} {{", class.name, derivation.join(", "))
    }
}

fn write_class_body(out: &mut CodeWriter, class: &CodeClass) {
    write_summary(out, class.description.as_deref());
    out.block(class_declaration(class), "}", |out| {
        for property in &class.properties {
            write_property(out, class, property);
        }
        if let Some(indexer) = &class.indexer {
            write_indexer(out, indexer);
        }
        for method in &class.methods {
            write_method(out, class, method);
        }
        for inner in &class.inner_classes {
            write_class_body(out, inner);
        }
    });
}

fn namespace_modules(namespace: &str, class: &CodeClass) -> BTreeSet<String> {
    class
        .usings
        .iter()
        .map(|u| u.module.clone())
        .filter(|m| !m.is_empty() && m != namespace)
        .collect()
}

impl LanguageWriter for CSharpWriter {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::CSharp
    }

    fn extension(&self) -> &'static str {
        "cs"
    }

    fn file_name(&self, name: &str) -> String {
        name.trim_start_matches('@').to_upper_camel_case()
    }

    fn write_class(&self, namespace: &str, class: &CodeClass, out: &mut CodeWriter) {
        for module in namespace_modules(namespace, class) {
            out.line(format!("using {};", module));
        }
        out.block(format!("namespace {} {{", namespace), "}", |out| {
            write_class_body(out, class);
        });
    }

    fn write_enum(&self, namespace: &str, enumeration: &CodeEnum, out: &mut CodeWriter) {
        out.line("using System;");
        out.block(format!("namespace {} {{", namespace), "}", |out| {
            write_summary(out, enumeration.description.as_deref());
            out.block(format!("public enum {} {{", enumeration.name), "}", |out| {
                for option in &enumeration.options {
                    let identifier = option.to_upper_camel_case();
                    if identifier != *option {
                        out.line(format!("[EnumMember(Value = \"{}\")]", option));
                    }
                    out.line(format!("{},", identifier));
                }
            });
        });
    }
}
