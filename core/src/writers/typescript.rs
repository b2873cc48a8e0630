//! # TypeScript Writer
//!
//! One ES module per declaration. File names are camel-cased, internal imports
//! are relative to the importing file.

use crate::codedom::{
    lower_first, ClassKind, CodeClass, CodeEnum, CodeMethod, CodeParameter, CodeProperty,
    CodeType, CodeUsing, CollectionKind, MethodKind, ParameterKind, PropertyKind, SimpleType,
    Visibility,
};
use crate::config::GenerationLanguage;
use crate::refiners::imports::split_qualified_symbol;
use crate::writers::{doc_lines, value_shape, CodeWriter, LanguageWriter, ValueShape};
use heck::ToUpperCamelCase;
use std::collections::BTreeMap;

/// Writer for `GenerationLanguage::TypeScript`.
pub struct TypeScriptWriter;

fn primitive(name: &str) -> Option<&'static str> {
    let mapped = match name {
        "string" | "Guid" => "string",
        "integer" | "int64" | "number" | "double" | "float" | "decimal" => "number",
        "boolean" => "boolean",
        "DateTimeOffset" => "Date",
        "object" => "unknown",
        _ => return None,
    };
    Some(mapped)
}

fn element_type(ty: &SimpleType) -> String {
    primitive(&ty.name).map(str::to_string).unwrap_or_else(|| ty.name.clone())
}

fn simple_type_name(ty: &SimpleType) -> String {
    let element = element_type(ty);
    match ty.collection {
        CollectionKind::None => element,
        _ => format!("{}[]", element),
    }
}

/// TypeScript spelling of `ty`; `undefined` is appended for optional slots.
pub fn translate_type(ty: &CodeType, optional: bool) -> String {
    let name = match ty {
        CodeType::Simple(s) => simple_type_name(s),
        CodeType::Union(u) => {
            let members: Vec<String> = u.members.iter().map(simple_type_name).collect();
            members.join(" | ")
        }
    };
    if optional && ty.is_nullable() && name != "void" {
        format!("{} | undefined", name)
    } else {
        name
    }
}

/// Suffix of the typed serialization writer and parse node methods.
fn value_method_suffix(name: &str) -> &'static str {
    match primitive(name) {
        Some("string") => "String",
        Some("number") => "Number",
        Some("boolean") => "Boolean",
        Some("Date") => "Date",
        _ => match name {
            "DateOnly" => "DateOnly",
            "TimeOnly" => "TimeOnly",
            "Duration" => "Duration",
            "ArrayBuffer" => "ByteArray",
            _ => "Object",
        },
    }
}

fn visibility(visibility: Visibility) -> &'static str {
    match visibility {
        Visibility::Public => "public",
        Visibility::Protected => "protected",
        Visibility::Private => "private",
    }
}

fn write_doc(out: &mut CodeWriter, description: Option<&str>, params: &[&CodeParameter], returns: Option<&str>) {
    let lines = doc_lines(description);
    if lines.is_empty() && params.iter().all(|p| p.description.is_none()) {
        return;
    }
    out.line("/**");
    for line in lines {
        out.line(format!(" * {}", line));
    }
    for parameter in params {
        if let Some(description) = &parameter.description {
            out.line(format!(" * @param {} {}", parameter.name, description));
        }
    }
    if let Some(returns) = returns {
        out.line(format!(" * @returns a {}", returns));
    }
    out.line(" */");
}

/// Import path from `from` to the module declaring `symbol` in `to`.
fn relative_import(from: &str, to: &str, symbol: &str) -> String {
    let from: Vec<&str> = from.split('.').collect();
    let to: Vec<&str> = to.split('.').collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut path = if from.len() == common {
        "./".to_string()
    } else {
        "../".repeat(from.len() - common)
    };
    for segment in &to[common..] {
        path.push_str(segment);
        path.push('/');
    }
    path.push_str(&lower_first(symbol));
    path
}

fn write_imports(out: &mut CodeWriter, namespace: &str, own: &str, usings: &[&CodeUsing]) {
    // Package imports sort ahead of relative ones.
    let mut modules: BTreeMap<(bool, String), Vec<&str>> = BTreeMap::new();
    for using in usings {
        if using.symbol.is_empty() || using.module.is_empty() {
            continue;
        }
        if using.is_external {
            modules.entry((false, using.module.clone())).or_default().push(&using.symbol);
        } else if !(using.module == namespace && using.symbol == own) {
            modules
                .entry((true, relative_import(namespace, &using.module, &using.symbol)))
                .or_default()
                .push(&using.symbol);
        }
    }
    if modules.is_empty() {
        return;
    }
    for ((_, module), mut symbols) in modules {
        symbols.sort_unstable();
        symbols.dedup();
        out.line(format!("import {{{}}} from '{}';", symbols.join(", "), module));
    }
    out.blank();
}

/// Optional slots end with `?` and admit `undefined`.
fn is_optional_property(property: &CodeProperty) -> bool {
    property.default_value.is_none()
        && property.ty.is_nullable()
        && property.is_of_kind(&[PropertyKind::Custom, PropertyKind::QueryParameter, PropertyKind::BackingStore])
}

fn write_property(out: &mut CodeWriter, property: &CodeProperty) {
    write_doc(out, property.description.as_deref(), &[], None);
    let ty = translate_type(&property.ty, false);
    match property.kind {
        PropertyKind::RequestBuilder => out.block(
            format!("{} get {}(): {} {{", visibility(property.visibility), property.name, ty),
            "}",
            |out| out.line(format!("return new {}(this.pathParameters, this.requestAdapter);", ty)),
        ),
        _ => {
            let optional = is_optional_property(property);
            out.line(format!(
                "{} {}{}: {};",
                visibility(property.visibility),
                property.name,
                if optional { "?" } else { "" },
                translate_type(&property.ty, optional)
            ));
        }
    }
}

fn parameter_declaration(parameter: &CodeParameter) -> String {
    format!(
        "{}{}: {}",
        parameter.name,
        if parameter.optional { "?" } else { "" },
        translate_type(&parameter.ty, parameter.optional)
    )
}

fn return_type(method: &CodeMethod) -> Option<String> {
    match method.kind {
        MethodKind::Constructor | MethodKind::ClientConstructor | MethodKind::RawUrlConstructor => None,
        MethodKind::RequestExecutor => Some(format!("Promise<{}>", translate_type(&method.return_type, true))),
        _ => Some(translate_type(&method.return_type, false)),
    }
}

fn write_null_guards(out: &mut CodeWriter, method: &CodeMethod) {
    for parameter in method.parameters.iter().filter(|p| !p.optional) {
        out.line(format!(
            "if(!{}) throw new Error(\"{} cannot be undefined\");",
            parameter.name, parameter.name
        ));
    }
}

fn write_default_assignments(out: &mut CodeWriter, class: &CodeClass) {
    for property in &class.properties {
        if let Some(default) = &property.default_value {
            out.line(format!("this.{} = {};", property.name, default));
        }
    }
}

fn symbol_of(qualified: &str) -> String {
    split_qualified_symbol(qualified).symbol
}

fn write_executor_body(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    let generator = class
        .methods_of_kind(MethodKind::RequestGenerator)
        .find(|g| g.http_method == method.http_method);
    let arguments: Vec<&str> = generator
        .map(|g| g.parameters.iter().map(|p| p.name.as_str()).collect())
        .unwrap_or_default();
    out.line(format!(
        "const requestInfo = this.{}({});",
        generator.map(|g| lower_first(&g.name)).unwrap_or_default(),
        arguments.join(", ")
    ));
    let handler = method
        .parameter_of_kind(ParameterKind::ResponseHandler)
        .map(|p| p.name.as_str())
        .unwrap_or("undefined");
    let call = match &method.return_type {
        CodeType::Simple(s) if s.name == "void" => {
            format!("sendNoResponseContentAsync(requestInfo, {})", handler)
        }
        CodeType::Simple(s) => {
            let element = element_type(s);
            match (s.collection, value_shape(s)) {
                (CollectionKind::None, ValueShape::Object) => {
                    format!("sendAsync<{}>(requestInfo, {}, {})", element, element, handler)
                }
                (CollectionKind::None, _) => {
                    format!("sendPrimitiveAsync<{}>(requestInfo, \"{}\", {})", element, element, handler)
                }
                (_, ValueShape::Object) => {
                    format!("sendCollectionAsync<{}>(requestInfo, {}, {})", element, element, handler)
                }
                (_, _) => format!(
                    "sendCollectionOfPrimitiveAsync<{}>(requestInfo, \"{}\", {})",
                    element, element, handler
                ),
            }
        }
        CodeType::Union(u) => format!("sendAsync<{}>(requestInfo, {}, {})", u.name, u.name, handler),
    };
    out.line(format!(
        "return this.requestAdapter?.{} ?? Promise.reject(new Error('http core is null'));",
        call
    ));
}

fn write_generator_body(out: &mut CodeWriter, method: &CodeMethod) {
    out.line("const requestInfo = new RequestInformation();");
    out.line("requestInfo.urlTemplate = this.urlTemplate;");
    out.line("requestInfo.pathParameters = this.pathParameters;");
    if let Some(http) = method.http_method {
        out.line(format!("requestInfo.httpMethod = HttpMethod.{};", http.as_str().to_ascii_uppercase()));
    }
    if let Some(headers) = method.parameter_of_kind(ParameterKind::Headers) {
        out.line(format!("if ({h}) requestInfo.headers = {h};", h = headers.name));
    }
    if let Some(query) = method.parameter_of_kind(ParameterKind::QueryParameter) {
        out.line(format!(
            "{q} && requestInfo.setQueryStringParametersFromRawObject({q});",
            q = query.name
        ));
    }
    if let Some(body) = method.parameter_of_kind(ParameterKind::RequestBody) {
        let content_type = method.request_body_content_type.as_deref().unwrap_or("application/json");
        let call = match body.ty.as_simple() {
            Some(s) if s.name == "ArrayBuffer" => {
                format!("requestInfo.setStreamContent({});", body.name)
            }
            Some(s) if value_shape(s) == ValueShape::Object => format!(
                "requestInfo.setContentFromParsable(this.requestAdapter, \"{}\", {});",
                content_type, body.name
            ),
            _ => format!(
                "requestInfo.setContentFromScalar(this.requestAdapter, \"{}\", {});",
                content_type, body.name
            ),
        };
        out.line(call);
    }
    if let Some(options) = method.parameter_of_kind(ParameterKind::Options) {
        out.line(format!("{o} && requestInfo.addRequestOptions(...{o});", o = options.name));
    }
    out.line("return requestInfo;");
}

fn write_serialize_value(out: &mut CodeWriter, wire: &str, value: &str, ty: &SimpleType) {
    let element = element_type(ty);
    let line = match (ty.collection, value_shape(ty)) {
        (CollectionKind::None, ValueShape::Primitive) => format!(
            "writer.write{}Value(\"{}\", {});",
            value_method_suffix(&ty.name),
            wire,
            value
        ),
        (CollectionKind::None, ValueShape::Enum) => {
            format!("writer.writeEnumValue<{}>(\"{}\", {});", element, wire, value)
        }
        (CollectionKind::None, ValueShape::Object) => {
            format!("writer.writeObjectValue<{}>(\"{}\", {});", element, wire, value)
        }
        (_, ValueShape::Object) => {
            format!("writer.writeCollectionOfObjectValues<{}>(\"{}\", {});", element, wire, value)
        }
        (_, ValueShape::Enum) => format!(
            "{v} && writer.writeEnumValue<{}>(\"{}\", ...{v});",
            element,
            wire,
            v = value
        ),
        (_, ValueShape::Primitive) => format!(
            "writer.writeCollectionOfPrimitiveValues<{}>(\"{}\", {});",
            element, wire, value
        ),
    };
    out.line(line);
}

fn write_serializer_body(out: &mut CodeWriter, class: &CodeClass) {
    if class.parent_class.is_some() {
        out.line("super.serialize(writer);");
    }
    for property in class.properties.iter().filter(|p| p.kind == PropertyKind::Custom) {
        let value = format!("this.{}", property.name);
        let wire = property.wire_name();
        match &property.ty {
            CodeType::Simple(s) => write_serialize_value(out, wire, &value, s),
            CodeType::Union(u) => {
                let (primitives, objects): (Vec<&SimpleType>, Vec<&SimpleType>) = u
                    .members
                    .iter()
                    .partition(|m| value_shape(m) == ValueShape::Primitive && m.collection == CollectionKind::None);
                for member in primitives {
                    out.block(
                        format!("if (typeof {} === \"{}\") {{", value, element_type(member)),
                        "}",
                        |out| write_serialize_value(out, wire, &value, member),
                    );
                }
                if !objects.is_empty() {
                    out.block(format!("if (typeof {} === \"object\") {{", value), "}", |out| {
                        out.line(format!("writer.writeObjectValue(\"{}\", {});", wire, value));
                    });
                }
            }
        }
    }
    if let Some(additional) = class.property_of_kind(PropertyKind::AdditionalData) {
        out.line(format!("writer.writeAdditionalData(this.{});", additional.name));
    }
}

fn parse_call(ty: &SimpleType) -> String {
    let element = element_type(ty);
    match (ty.collection, value_shape(ty)) {
        (CollectionKind::None, ValueShape::Primitive) => {
            format!("n.get{}Value()", value_method_suffix(&ty.name))
        }
        (CollectionKind::None, ValueShape::Enum) => format!("n.getEnumValue<{}>({})", element, element),
        (CollectionKind::None, ValueShape::Object) => format!("n.getObjectValue<{}>({})", element, element),
        (_, ValueShape::Object) => format!("n.getCollectionOfObjectValues<{}>({})", element, element),
        (_, ValueShape::Enum) => format!("n.getEnumValues<{}>({})", element, element),
        (_, ValueShape::Primitive) => format!("n.getCollectionOfPrimitiveValues<{}>()", element),
    }
}

fn write_deserializer_body(out: &mut CodeWriter, class: &CodeClass) {
    out.block("return {", "};", |out| {
        if class.parent_class.is_some() {
            out.line("...super.getFieldDeserializers(),");
        }
        for property in class.properties.iter().filter(|p| p.kind == PropertyKind::Custom) {
            let value = match &property.ty {
                CodeType::Simple(s) => parse_call(s),
                CodeType::Union(u) => u.members.iter().map(parse_call).collect::<Vec<_>>().join(" ?? "),
            };
            out.line(format!(
                "\"{}\": n => {{ this.{} = {}; }},",
                property.wire_name(),
                property.name,
                value
            ));
        }
    });
}

fn write_method_body(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    match method.kind {
        MethodKind::ClientConstructor => {
            write_null_guards(out, method);
            write_default_assignments(out, class);
            out.line("this.pathParameters = {};");
            out.line("this.requestAdapter = requestAdapter;");
            for module in &method.serializer_modules {
                out.line(format!("registerDefaultSerializer({});", symbol_of(module)));
            }
            for module in &method.deserializer_modules {
                out.line(format!("registerDefaultDeserializer({});", symbol_of(module)));
            }
            if let Some(base_url) = &method.base_url {
                out.block(
                    "if (requestAdapter.baseUrl === undefined || requestAdapter.baseUrl === \"\") {",
                    "}",
                    |out| out.line(format!("requestAdapter.baseUrl = \"{}\";", base_url)),
                );
            }
            if let Some(store) = method.parameter_of_kind(ParameterKind::BackingStore) {
                out.line(format!("this.requestAdapter.enableBackingStore({});", store.name));
            }
        }
        MethodKind::Constructor if class.kind == ClassKind::RequestBuilder => {
            write_null_guards(out, method);
            write_default_assignments(out, class);
            out.line("const urlTplParams = {...pathParameters};");
            for parameter in method.parameters.iter().filter(|p| p.kind == ParameterKind::Path) {
                let wire = parameter.serialization_name.as_deref().unwrap_or(&parameter.name);
                out.line(format!(
                    "{p} && (urlTplParams[\"{}\"] = {p});",
                    wire,
                    p = parameter.name
                ));
            }
            out.line("this.pathParameters = urlTplParams;");
            out.line("this.requestAdapter = requestAdapter;");
        }
        MethodKind::Constructor => {
            if class.parent_class.is_some() {
                out.line("super();");
            }
            write_default_assignments(out, class);
        }
        MethodKind::RawUrlConstructor => {
            write_null_guards(out, method);
            write_default_assignments(out, class);
            out.line("this.pathParameters = {\"request-raw-url\": rawUrl};");
            out.line("this.requestAdapter = requestAdapter;");
        }
        MethodKind::RequestExecutor => write_executor_body(out, class, method),
        MethodKind::RequestGenerator => write_generator_body(out, method),
        MethodKind::Serializer => {
            out.line("if (!writer) throw new Error(\"writer cannot be undefined\");");
            write_serializer_body(out, class);
        }
        MethodKind::Deserializer => write_deserializer_body(out, class),
        MethodKind::RequestBuilderWithParameters => {
            let arguments: Vec<&str> = method.parameters.iter().map(|p| p.name.as_str()).collect();
            out.line(format!(
                "return new {}(this.pathParameters, this.requestAdapter, {});",
                translate_type(&method.return_type, false),
                arguments.join(", ")
            ));
        }
        MethodKind::RequestBuilderBackwardCompatibility => out.line(format!(
            "return new {}(this.pathParameters, this.requestAdapter);",
            translate_type(&method.return_type, false)
        )),
        MethodKind::IndexerBackwardCompatibility => {
            let argument = method.parameters.first().map(|p| p.name.as_str()).unwrap_or("id");
            write_null_guards(out, method);
            out.line("const urlTplParams = {...this.pathParameters};");
            out.line(format!(
                "urlTplParams[\"{}\"] = {};",
                method.accessed_member.as_deref().unwrap_or(argument),
                argument
            ));
            out.line(format!(
                "return new {}(urlTplParams, this.requestAdapter);",
                translate_type(&method.return_type, false)
            ));
        }
        MethodKind::Getter => out.line(format!(
            "return this.{};",
            method.accessed_member.as_deref().unwrap_or_default()
        )),
        MethodKind::Setter => out.line(format!(
            "this.{} = value;",
            method.accessed_member.as_deref().unwrap_or_default()
        )),
        MethodKind::NullCheck => out.line("return this === undefined;"),
        MethodKind::Custom => out.line("throw new Error(\"Method not implemented.\");"),
    }
}

fn write_method(out: &mut CodeWriter, class: &CodeClass, method: &CodeMethod) {
    let parameters: Vec<&CodeParameter> = method.parameters.iter().collect();
    let returns = return_type(method);
    write_doc(
        out,
        method.description.as_deref(),
        &parameters,
        returns.as_deref().filter(|r| *r != "void"),
    );
    let signature = parameters.iter().map(|p| parameter_declaration(p)).collect::<Vec<_>>().join(", ");
    let open = match &returns {
        Some(returns) => format!(
            "{} {}({}) : {} {{",
            visibility(method.visibility),
            lower_first(&method.name),
            signature,
            returns
        ),
        None => format!("{} constructor({}) {{", visibility(method.visibility), signature),
    };
    out.block(open, "};", |out| write_method_body(out, class, method));
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

impl LanguageWriter for TypeScriptWriter {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::TypeScript
    }

    fn extension(&self) -> &'static str {
        "ts"
    }

    fn file_name(&self, name: &str) -> String {
        lower_first(name)
    }

    fn write_class(&self, namespace: &str, class: &CodeClass, out: &mut CodeWriter) {
        let usings: Vec<&CodeUsing> = class.usings.iter().collect();
        write_imports(out, namespace, &class.name, &usings);
        write_doc(out, class.description.as_deref(), &[], None);
        out.block(format!("export class {}{} {{", class.name, heritage(class)), "}", |out| {
            for property in &class.properties {
                write_property(out, property);
            }
            for method in &class.methods {
                write_method(out, class, method);
            }
        });
    }

    fn write_enum(&self, namespace: &str, enumeration: &CodeEnum, out: &mut CodeWriter) {
        let usings: Vec<&CodeUsing> = enumeration.usings.iter().collect();
        write_imports(out, namespace, &enumeration.name, &usings);
        write_doc(out, enumeration.description.as_deref(), &[], None);
        out.block(format!("export enum {} {{", enumeration.name), "}", |out| {
            for option in &enumeration.options {
                out.line(format!("{} = \"{}\",", option.to_upper_camel_case(), option));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::{DeclarationRef, UnionType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_translation() {
        assert_eq!(translate_type(&CodeType::external("int64"), true), "number | undefined");
        let tags = CodeType::Simple(SimpleType::external("string").collection(CollectionKind::Array));
        assert_eq!(translate_type(&tags, false), "string[]");
        let mut union = UnionType::new("PetOrName");
        union.add_member(SimpleType::bound(DeclarationRef::class("ApiSdk.models", "Pet")));
        union.add_member(SimpleType::external("string"));
        assert_eq!(translate_type(&CodeType::Union(union), false), "Pet | string");
    }

    #[test]
    fn test_relative_imports() {
        assert_eq!(relative_import("ApiSdk.users", "ApiSdk.models", "User"), "../models/user");
        assert_eq!(relative_import("ApiSdk.models", "ApiSdk.models", "Pet"), "./pet");
        assert_eq!(relative_import("ApiSdk", "ApiSdk.users", "UsersRequestBuilder"), "./users/usersRequestBuilder");
    }

    #[test]
    fn test_model_rendering() {
        let mut pet = CodeClass::new("Pet", ClassKind::Model);
        pet.usings.insert(CodeUsing::external("@microsoft/kiota-abstractions", "Parsable"));
        pet.usings.insert(CodeUsing::internal("ApiSdk.models", "Pet"));
        pet.usings.insert(CodeUsing::internal("ApiSdk.models", "Color"));
        pet.implements.push(SimpleType::external("Parsable"));
        pet.add_property(CodeProperty::new("name", PropertyKind::Custom, CodeType::external("string")))
            .unwrap();
        pet.add_property(CodeProperty::new(
            "color",
            PropertyKind::Custom,
            CodeType::bound(DeclarationRef::enumeration("ApiSdk.models", "Color")),
        ))
        .unwrap();
        let mut deserializer = CodeMethod::field_deserializers();
        deserializer.name = "getFieldDeserializers".into();
        pet.add_method(deserializer).unwrap();
        let mut out = CodeWriter::new("    ");
        TypeScriptWriter.write_class("ApiSdk.models", &pet, &mut out);
        let code = out.finish();
        assert!(code.starts_with(
            "import {Parsable} from '@microsoft/kiota-abstractions';\nimport {Color} from './color';\n"
        ));
        assert!(code.contains("export class Pet implements Parsable {"));
        assert!(code.contains("public name?: string | undefined;"));
        assert!(code.contains("\"name\": n => { this.name = n.getStringValue(); },"));
        assert!(code.contains("\"color\": n => { this.color = n.getEnumValue<Color>(Color); },"));
    }

    #[test]
    fn test_enum_rendering() {
        let e = CodeEnum::new("Color", None, ["dark-blue".to_string()]);
        let mut out = CodeWriter::new("    ");
        TypeScriptWriter.write_enum("ApiSdk.models", &e, &mut out);
        assert_eq!(out.finish(), "export enum Color {\n    DarkBlue = \"dark-blue\",\n}\n");
    }
}
