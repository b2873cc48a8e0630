//! # Go Writer
//!
//! One package per namespace and one `.go` file per top-level declaration.
//! Parameter sets stay in the file of their request builder. Types imported
//! from another package are qualified with the package alias.

use crate::codedom::{
    lower_first, upper_first, ClassKind, CodeClass, CodeEnum, CodeMethod, CodeParameter,
    CodeProperty, CodeType, CodeUsing, CollectionKind, MethodKind, ParameterKind, PropertyKind,
    SimpleType, Visibility,
};
use crate::config::GenerationLanguage;
use crate::refiners::imports::split_qualified_symbol;
use crate::writers::{doc_lines, value_shape, CodeWriter, LanguageWriter, ValueShape};
use heck::{ToShoutySnakeCase, ToSnakeCase};
use std::collections::{BTreeMap, HashMap};

/// Writer for `GenerationLanguage::Go`.
pub struct GoWriter;

/// Runtime types that are interfaces and never taken by pointer.
const INTERFACE_TYPES: &[&str] = &[
    "RequestAdapter",
    "ResponseHandler",
    "ParseNode",
    "SerializationWriter",
    "SerializationWriterFactory",
    "ParseNodeFactory",
    "BackingStore",
    "BackingStoreFactory",
    "Parsable",
    "RequestOption",
];

fn primitive(name: &str) -> Option<&'static str> {
    let mapped = match name {
        "string" => "string",
        "integer" => "int32",
        "int64" => "int64",
        "boolean" => "bool",
        "number" | "double" | "decimal" => "float64",
        "float" => "float32",
        "binary" => "[]byte",
        "object" => "interface{}",
        _ => return None,
    };
    Some(mapped)
}

/// Suffix of the typed serialization writer and parse node methods.
fn value_method_suffix(name: &str) -> String {
    match name {
        "integer" => "Int32".into(),
        "int64" => "Int64".into(),
        "number" | "double" | "decimal" => "Float64".into(),
        "float" => "Float32".into(),
        "boolean" => "Bool".into(),
        "binary" => "ByteArray".into(),
        "object" => "Object".into(),
        other => upper_first(other),
    }
}

/// Alias of an external Go module path.
pub fn package_alias(module: &str) -> String {
    let last = module.rsplit('/').next().unwrap_or(module);
    let trimmed = last.strip_prefix("kiota-").unwrap_or(last);
    let trimmed = trimmed.strip_suffix("-go").unwrap_or(trimmed);
    trimmed
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Import path of a generated namespace.
fn namespace_path(namespace: &str) -> String {
    namespace.split('.').map(str::to_ascii_lowercase).collect::<Vec<_>>().join("/")
}

/// Alias of a generated namespace: its segments below the client namespace.
fn namespace_alias(namespace: &str) -> String {
    let segments: Vec<&str> = namespace.split('.').collect();
    let tail = if segments.len() > 1 { &segments[1..] } else { &segments[..] };
    tail.concat().to_ascii_lowercase()
}

fn package_name(namespace: &str) -> String {
    namespace
        .rsplit('.')
        .next()
        .unwrap_or(namespace)
        .to_ascii_lowercase()
}

/// Per-file rendering state: the package and the aliases of its imports.
struct GoFile<'a> {
    namespace: &'a str,
    symbols: HashMap<String, String>,
}

impl<'a> GoFile<'a> {
    fn new(namespace: &'a str, usings: impl Iterator<Item = &'a CodeUsing>) -> Self {
        let symbols = usings
            .filter(|u| u.is_external && !u.symbol.is_empty())
            .map(|u| (u.symbol.clone(), package_alias(&u.module)))
            .collect();
        Self { namespace, symbols }
    }

    fn qualify(&self, symbol: &str) -> String {
        match self.symbols.get(symbol) {
            Some(alias) => format!("{}.{}", alias, symbol),
            None => symbol.to_string(),
        }
    }

    /// Package prefix (`abstractions.`) of an imported symbol.
    fn symbol_prefix(&self, symbol: &str) -> String {
        self.symbols
            .get(symbol)
            .map(|alias| format!("{}.", alias))
            .unwrap_or_default()
    }

    /// Qualifier prefix (`models.`) for a declaration of `namespace`.
    fn package_prefix(&self, namespace: &str) -> String {
        if namespace == self.namespace {
            String::new()
        } else {
            format!("{}.", namespace_alias(namespace))
        }
    }

    /// Element type without pointer or slice.
    fn base_type(&self, ty: &SimpleType) -> String {
        if let Some(declaration) = ty.declaration() {
            return format!("{}{}", self.package_prefix(&declaration.namespace), ty.name);
        }
        match primitive(&ty.name) {
            Some(mapped) => mapped.to_string(),
            None => self.qualify(&ty.name),
        }
    }

    fn is_pointer(&self, ty: &SimpleType) -> bool {
        ty.is_nullable
            && ty.collection == CollectionKind::None
            && !INTERFACE_TYPES.contains(&ty.name.as_str())
            && !ty.name.starts_with("map[")
            && !matches!(ty.name.as_str(), "binary" | "object" | "void")
    }

    fn simple_type(&self, ty: &SimpleType) -> String {
        let base = self.base_type(ty);
        match ty.collection {
            CollectionKind::None if self.is_pointer(ty) => format!("*{}", base),
            CollectionKind::None => base,
            CollectionKind::Array | CollectionKind::Complex => format!("[]{}", base),
        }
    }

    fn type_name(&self, ty: &CodeType) -> String {
        match ty {
            CodeType::Simple(s) => self.simple_type(s),
            CodeType::Union(u) => u.name.clone(),
        }
    }

    /// `models.NewPet` for a bound class type.
    fn constructor_function(&self, ty: &SimpleType, suffix: &str) -> String {
        match ty.declaration() {
            Some(d) => format!("{}New{}{}", self.package_prefix(&d.namespace), ty.name, suffix),
            None => format!("New{}{}", ty.name, suffix),
        }
    }

    fn parsable_factory(&self, ty: &SimpleType) -> String {
        format!(
            "func () {} {{ return {}() }}",
            self.qualify("Parsable"),
            self.constructor_function(ty, "")
        )
    }
}

fn field_name(property: &CodeProperty) -> String {
    match property.visibility {
        Visibility::Public => upper_first(&property.name),
        _ => lower_first(&property.name),
    }
}

fn exported(name: &str) -> String {
    upper_first(name)
}

fn write_comment(out: &mut CodeWriter, name: &str, description: Option<&str>) {
    let lines = doc_lines(description);
    let Some((first, rest)) = lines.split_first() else {
        return;
    };
    out.line(format!("// {} {}", name, lower_first(first)));
    for line in rest {
        out.line(format!("// {}", line));
    }
}

fn write_imports(out: &mut CodeWriter, namespace: &str, usings: &[&CodeUsing]) {
    let mut imports: BTreeMap<String, String> = BTreeMap::new();
    for using in usings {
        if using.module.is_empty() {
            continue;
        }
        if using.is_external {
            imports.insert(using.module.clone(), package_alias(&using.module));
        } else if using.module != namespace {
            imports.insert(namespace_path(&using.module), namespace_alias(&using.module));
        }
    }
    if imports.is_empty() {
        return;
    }
    out.block("import (", ")", |out| {
        for (path, alias) in &imports {
            let last = path.rsplit('/').next().unwrap_or(path);
            if last == alias {
                out.line(format!("\"{}\"", path));
            } else {
                out.line(format!("{} \"{}\"", alias, path));
            }
        }
    });
    out.blank();
}

fn write_struct(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass) {
    write_comment(out, &class.name, class.description.as_deref());
    out.block(format!("type {} struct {{", class.name), "}", |out| {
        if let Some(parent) = &class.parent_class {
            out.line(file.base_type(parent));
        }
        for property in &class.properties {
            write_comment(out, &field_name(property), property.description.as_deref());
            let mut line = format!("{} {}", field_name(property), file.type_name(&property.ty));
            if property.kind == PropertyKind::QueryParameter {
                let wire = property.wire_name().replace('$', "%24");
                line.push_str(&format!(" `uriparametername:\"{}\"`", wire));
            }
            out.line(line);
        }
    });
    out.blank();
}

fn parameter_declaration(file: &GoFile<'_>, parameter: &CodeParameter) -> String {
    format!("{} {}", parameter.name, file.type_name(&parameter.ty))
}

fn parameter_list(file: &GoFile<'_>, parameters: &[&CodeParameter]) -> String {
    parameters
        .iter()
        .map(|p| parameter_declaration(file, p))
        .collect::<Vec<_>>()
        .join(", ")
}

fn has_raw_url_constructor(class: &CodeClass) -> bool {
    class.methods_of_kind(MethodKind::RawUrlConstructor).next().is_some()
}

fn write_default_assignments(out: &mut CodeWriter, class: &CodeClass) {
    for property in &class.properties {
        if let Some(default) = &property.default_value {
            out.line(format!("m.{} = {}", field_name(property), default));
        }
    }
}

fn copy_path_parameters(out: &mut CodeWriter, source: &str) {
    out.line("urlTplParams := make(map[string]string)");
    out.block(format!("for idx, item := range {} {{", source), "}", |out| {
        out.line("urlTplParams[idx] = item");
    });
}

fn write_constructor(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass, method: &CodeMethod) {
    let function = match method.kind {
        MethodKind::Constructor if has_raw_url_constructor(class) => format!("New{}Internal", class.name),
        _ => format!("New{}", class.name),
    };
    let parameters: Vec<&CodeParameter> = method
        .parameters
        .iter()
        .filter(|p| p.kind != ParameterKind::Path)
        .collect();
    write_comment(out, &function, method.description.as_deref());
    out.block(
        format!("func {}({})(*{}) {{", function, parameter_list(file, &parameters), class.name),
        "}",
        |out| {
            match &class.parent_class {
                Some(parent) => out.block(format!("m := &{}{{", class.name), "}", |out| {
                    out.line(format!("{}: *{}(),", parent.name, file.constructor_function(parent, "")));
                }),
                None => out.line(format!("m := &{}{{}}", class.name)),
            }
            write_default_assignments(out, class);
            match method.kind {
                MethodKind::ClientConstructor => write_client_constructor_body(out, file, method),
                MethodKind::RawUrlConstructor => {
                    out.line("urlParams := make(map[string]string)");
                    out.line("urlParams[\"request-raw-url\"] = rawUrl");
                    out.line("m.pathParameters = urlParams");
                    out.line("m.requestAdapter = requestAdapter");
                }
                MethodKind::Constructor if class.kind == ClassKind::RequestBuilder => {
                    copy_path_parameters(out, "pathParameters");
                    out.line("m.pathParameters = urlTplParams");
                    out.line("m.requestAdapter = requestAdapter");
                }
                _ => {}
            }
            out.line("return m");
        },
    );
    out.blank();
}

fn write_client_constructor_body(out: &mut CodeWriter, file: &GoFile<'_>, method: &CodeMethod) {
    out.line("m.pathParameters = make(map[string]string)");
    out.line("m.requestAdapter = requestAdapter");
    let register = |out: &mut CodeWriter, registrar: &str, factory: &str, module: &str| {
        let using = split_qualified_symbol(module);
        out.line(format!(
            "{}(func() {} {{ return {}.{}() }})",
            file.qualify(registrar),
            file.qualify(factory),
            package_alias(&using.module),
            using.symbol
        ));
    };
    for module in &method.serializer_modules {
        register(out, "RegisterDefaultSerializer", "SerializationWriterFactory", module);
    }
    for module in &method.deserializer_modules {
        register(out, "RegisterDefaultDeserializer", "ParseNodeFactory", module);
    }
    if let Some(base_url) = &method.base_url {
        out.block("if m.requestAdapter.GetBaseUrl() == \"\" {", "}", |out| {
            out.line(format!("m.requestAdapter.SetBaseUrl(\"{}\")", base_url));
        });
    }
    if let Some(store) = method.parameter_of_kind(ParameterKind::BackingStore) {
        out.line(format!("m.requestAdapter.EnableBackingStore({})", store.name));
    }
}

fn receiver(class: &CodeClass) -> String {
    format!("func (m *{})", class.name)
}

/// Property of the parameter set bundling `kind` for `method`.
fn parameter_set_field<'c>(class: &'c CodeClass, method: &CodeMethod, kind: PropertyKind) -> Option<&'c CodeProperty> {
    let set = method.parameter_of_kind(ParameterKind::ParameterSet)?;
    class
        .inner_class(set.ty.name())
        .and_then(|set| set.property_of_kind(kind))
}

fn write_generator(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass, method: &CodeMethod) {
    let parameters: Vec<&CodeParameter> = method.parameters.iter().collect();
    let request_information = file.qualify("RequestInformation");
    write_comment(out, &exported(&method.name), method.description.as_deref());
    out.block(
        format!(
            "{} {}({})(*{}, error) {{",
            receiver(class),
            exported(&method.name),
            parameter_list(file, &parameters),
            request_information
        ),
        "}",
        |out| {
            out.line(format!("requestInfo := {}()", file.qualify("NewRequestInformation")));
            out.line("requestInfo.UrlTemplate = m.urlTemplate");
            out.line("requestInfo.PathParameters = m.pathParameters");
            let http = method.http_method.map(|h| h.as_str().to_ascii_uppercase()).unwrap_or_default();
            out.line(format!("requestInfo.Method = {}{}", file.symbol_prefix("HttpMethod"), http));
            let Some(options) = method.parameter_of_kind(ParameterKind::ParameterSet) else {
                out.line("return requestInfo, nil");
                return;
            };
            let guard = |field: &CodeProperty| format!("if {0} != nil && {0}.{1} != nil {{", options.name, field.name);
            if let Some(body) = parameter_set_field(class, method, PropertyKind::RequestBody) {
                let content_type = method.request_body_content_type.as_deref().unwrap_or("application/json");
                out.block(guard(body), "}", |out| {
                    let call = match body.ty.as_simple().map(value_shape) {
                        Some(ValueShape::Object) => "SetContentFromParsable",
                        _ => "SetContentFromScalar",
                    };
                    out.line(format!(
                        "requestInfo.{}(m.requestAdapter, \"{}\", {}.{})",
                        call, content_type, options.name, body.name
                    ));
                });
            }
            if let Some(query) = parameter_set_field(class, method, PropertyKind::QueryParameter) {
                out.block(guard(query), "}", |out| {
                    out.line(format!("requestInfo.AddQueryParameters(*({}.{}))", options.name, query.name));
                });
            }
            if let Some(headers) = parameter_set_field(class, method, PropertyKind::Headers) {
                out.block(guard(headers), "}", |out| {
                    out.block(format!("for key, value := range {}.{} {{", options.name, headers.name), "}", |out| {
                        out.line("requestInfo.Headers[key] = value");
                    });
                });
            }
            if let Some(request_options) = parameter_set_field(class, method, PropertyKind::Options) {
                out.block(
                    format!("if {} != nil && len({}.{}) != 0 {{", options.name, options.name, request_options.name),
                    "}",
                    |out| {
                        out.line(format!("err := requestInfo.AddRequestOptions({}.{}...)", options.name, request_options.name));
                        out.block("if err != nil {", "}", |out| out.line("return nil, err"));
                    },
                );
            }
            out.line("return requestInfo, nil");
        },
    );
    out.blank();
}

fn write_executor(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass, method: &CodeMethod) {
    let parameters: Vec<&CodeParameter> = method.parameters.iter().collect();
    let generator = class
        .methods_of_kind(MethodKind::RequestGenerator)
        .find(|g| g.http_method == method.http_method);
    let is_void = method.return_type.name() == "void";
    let result = if is_void {
        "(error)".to_string()
    } else {
        format!("({}, error)", file.type_name(&method.return_type))
    };
    let failure = if is_void { "return err" } else { "return nil, err" };
    write_comment(out, &exported(&method.name), method.description.as_deref());
    out.block(
        format!("{} {}({}){} {{", receiver(class), exported(&method.name), parameter_list(file, &parameters), result),
        "}",
        |out| {
            let arguments: Vec<&str> = generator
                .map(|g| g.parameters.iter().map(|p| p.name.as_str()).collect())
                .unwrap_or_default();
            let generator_name = generator.map(|g| exported(&g.name)).unwrap_or_default();
            out.line(format!("requestInfo, err := m.{}({})", generator_name, arguments.join(", ")));
            out.block("if err != nil {", "}", |out| out.line(failure));
            let handler = match (
                method.parameter_of_kind(ParameterKind::ParameterSet),
                parameter_set_field(class, method, PropertyKind::ResponseHandler),
            ) {
                (Some(options), Some(field)) => {
                    out.line(format!("var responseHandler {} = nil", file.qualify("ResponseHandler")));
                    out.block(format!("if {} != nil && {}.{} != nil {{", options.name, options.name, field.name), "}", |out| {
                        out.line(format!("responseHandler = {}.{}", options.name, field.name));
                    });
                    "responseHandler".to_string()
                }
                _ => "nil".to_string(),
            };
            match &method.return_type {
                CodeType::Simple(s) if s.name == "void" => {
                    out.line(format!("err = m.requestAdapter.SendNoContentAsync(requestInfo, {})", handler));
                    out.block("if err != nil {", "}", |out| out.line("return err"));
                    out.line("return nil");
                }
                CodeType::Simple(s) => {
                    let element = file.base_type(s);
                    let call = match (s.collection, value_shape(s)) {
                        (CollectionKind::None, ValueShape::Object) => {
                            format!("SendAsync(requestInfo, {}, {})", file.parsable_factory(s), handler)
                        }
                        (CollectionKind::None, _) => format!("SendPrimitiveAsync(requestInfo, \"{}\", {})", element, handler),
                        (_, ValueShape::Object) => {
                            format!("SendCollectionAsync(requestInfo, {}, {})", file.parsable_factory(s), handler)
                        }
                        (_, _) => format!("SendPrimitiveCollectionAsync(requestInfo, \"{}\", {})", element, handler),
                    };
                    out.line(format!("res, err := m.requestAdapter.{}", call));
                    out.block("if err != nil {", "}", |out| out.line("return nil, err"));
                    if s.collection == CollectionKind::None {
                        out.line(format!("return res.({}), nil", file.simple_type(s)));
                    } else {
                        out.line(format!("val := make([]{}, len(res))", element));
                        out.block("for i, v := range res {", "}", |out| {
                            out.line(format!("val[i] = *(v.(*{}))", element));
                        });
                        out.line("return val, nil");
                    }
                }
                CodeType::Union(_) => out.line("return nil, nil"),
            }
        },
    );
    out.blank();
}

fn write_serializer(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass, method: &CodeMethod) {
    let parameters: Vec<&CodeParameter> = method.parameters.iter().collect();
    write_comment(out, "Serialize", Some("serializes information the current object"));
    out.block(
        format!("{} Serialize({})(error) {{", receiver(class), parameter_list(file, &parameters)),
        "}",
        |out| {
            if let Some(parent) = &class.parent_class {
                out.line(format!("err := m.{}.Serialize(writer)", parent.name));
                out.block("if err != nil {", "}", |out| out.line("return err"));
            }
            for property in class.properties.iter().filter(|p| p.kind == PropertyKind::Custom) {
                let Some(s) = property.ty.as_simple() else {
                    continue;
                };
                let field = format!("m.{}", field_name(property));
                let wire = property.wire_name();
                out.block("{", "}", |out| match (s.collection, value_shape(s)) {
                    (CollectionKind::None, ValueShape::Primitive) => {
                        out.line(format!("err := writer.Write{}Value(\"{}\", {})", value_method_suffix(&s.name), wire, field));
                        out.block("if err != nil {", "}", |out| out.line("return err"));
                    }
                    (CollectionKind::None, ValueShape::Enum) => {
                        out.block(format!("if {} != nil {{", field), "}", |out| {
                            out.line(format!("cast := (*{}).String()", field));
                            out.line(format!("err := writer.WriteStringValue(\"{}\", &cast)", wire));
                            out.block("if err != nil {", "}", |out| out.line("return err"));
                        });
                    }
                    (CollectionKind::None, ValueShape::Object) => {
                        out.line(format!("err := writer.WriteObjectValue(\"{}\", {})", wire, field));
                        out.block("if err != nil {", "}", |out| out.line("return err"));
                    }
                    (_, ValueShape::Object) => {
                        out.block(format!("if {} != nil {{", field), "}", |out| {
                            out.line(format!("cast := make([]{}, len({}))", file.qualify("Parsable"), field));
                            out.block(format!("for i, v := range {} {{", field), "}", |out| {
                                out.line("temp := v");
                                out.line(format!("cast[i] = {}(&temp)", file.qualify("Parsable")));
                            });
                            out.line(format!("err := writer.WriteCollectionOfObjectValues(\"{}\", cast)", wire));
                            out.block("if err != nil {", "}", |out| out.line("return err"));
                        });
                    }
                    (_, ValueShape::Enum) => {
                        out.block(format!("if {} != nil {{", field), "}", |out| {
                            out.line(format!("cast := make([]string, len({}))", field));
                            out.block(format!("for i, v := range {} {{", field), "}", |out| {
                                out.line("cast[i] = v.String()");
                            });
                            out.line(format!("err := writer.WriteCollectionOfStringValues(\"{}\", cast)", wire));
                            out.block("if err != nil {", "}", |out| out.line("return err"));
                        });
                    }
                    (_, ValueShape::Primitive) => {
                        out.line(format!(
                            "err := writer.WriteCollectionOf{}Values(\"{}\", {})",
                            value_method_suffix(&s.name),
                            wire,
                            field
                        ));
                        out.block("if err != nil {", "}", |out| out.line("return err"));
                    }
                });
            }
            if let Some(additional) = class.property_of_kind(PropertyKind::AdditionalData) {
                out.block("{", "}", |out| {
                    out.line(format!("err := writer.WriteAdditionalData(m.{})", field_name(additional)));
                    out.block("if err != nil {", "}", |out| out.line("return err"));
                });
            }
            out.line("return nil");
        },
    );
    out.blank();
}

fn write_deserializer(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass, method: &CodeMethod) {
    let return_type = method.return_type.name();
    let parse_node = file.qualify("ParseNode");
    write_comment(out, "GetFieldDeserializers", Some("the deserialization information for the current model"));
    out.block(
        format!("{} GetFieldDeserializers()({}) {{", receiver(class), return_type),
        "}",
        |out| {
            match &class.parent_class {
                Some(parent) => out.line(format!("res := m.{}.GetFieldDeserializers()", parent.name)),
                None => out.line(format!("res := make({})", return_type)),
            }
            for property in class.properties.iter().filter(|p| p.kind == PropertyKind::Custom) {
                let Some(s) = property.ty.as_simple() else {
                    continue;
                };
                let field = format!("m.{}", field_name(property));
                let element = file.base_type(s);
                out.block(
                    format!("res[\"{}\"] = func (n {}) error {{", property.wire_name(), parse_node),
                    "}",
                    |out| {
                        let (call, assign) = match (s.collection, value_shape(s)) {
                            (CollectionKind::None, ValueShape::Primitive) => (
                                format!("n.Get{}Value()", value_method_suffix(&s.name)),
                                format!("{} = val", field),
                            ),
                            (CollectionKind::None, ValueShape::Enum) => (
                                format!("n.GetEnumValue({}Parse{})", file_prefix(file, s), s.name),
                                format!("{} = val.(*{})", field, element),
                            ),
                            (CollectionKind::None, ValueShape::Object) => (
                                format!("n.GetObjectValue({})", file.parsable_factory(s)),
                                format!("{} = val.(*{})", field, element),
                            ),
                            (_, ValueShape::Object) => (
                                format!("n.GetCollectionOfObjectValues({})", file.parsable_factory(s)),
                                String::new(),
                            ),
                            (_, ValueShape::Enum) => (
                                format!("n.GetCollectionOfEnumValues({}Parse{})", file_prefix(file, s), s.name),
                                String::new(),
                            ),
                            (_, ValueShape::Primitive) => (
                                format!("n.GetCollectionOfPrimitiveValues(\"{}\")", element),
                                String::new(),
                            ),
                        };
                        out.line(format!("val, err := {}", call));
                        out.block("if err != nil {", "}", |out| out.line("return err"));
                        out.block("if val != nil {", "}", |out| {
                            if assign.is_empty() {
                                out.line(format!("cast := make([]{}, len(val))", element));
                                out.block("for i, v := range val {", "}", |out| {
                                    out.line(format!("cast[i] = *(v.(*{}))", element));
                                });
                                out.line(format!("{} = cast", field));
                            } else {
                                out.line(assign);
                            }
                        });
                        out.line("return nil");
                    },
                );
            }
            out.line("return res");
        },
    );
    out.blank();
}

fn file_prefix(file: &GoFile<'_>, ty: &SimpleType) -> String {
    ty.declaration()
        .map(|d| file.package_prefix(&d.namespace))
        .unwrap_or_default()
}

fn write_navigation(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass, method: &CodeMethod) {
    let Some(target) = method.return_type.as_simple() else {
        return;
    };
    let parameters: Vec<&CodeParameter> = method.parameters.iter().collect();
    let target_type = file.base_type(target);
    write_comment(out, &exported(&method.name), method.description.as_deref());
    out.block(
        format!(
            "{} {}({})(*{}) {{",
            receiver(class),
            exported(&method.name),
            parameter_list(file, &parameters),
            target_type
        ),
        "}",
        |out| {
            if method.kind == MethodKind::RequestBuilderBackwardCompatibility {
                out.line(format!(
                    "return {}(m.pathParameters, m.requestAdapter)",
                    file.constructor_function(target, "Internal")
                ));
                return;
            }
            copy_path_parameters(out, "m.pathParameters");
            for parameter in &method.parameters {
                let wire = match method.kind {
                    MethodKind::IndexerBackwardCompatibility => method
                        .accessed_member
                        .as_deref()
                        .or(parameter.serialization_name.as_deref())
                        .unwrap_or(&parameter.name),
                    _ => parameter.serialization_name.as_deref().unwrap_or(&parameter.name),
                };
                if file.type_name(&parameter.ty).starts_with('*') {
                    out.block(format!("if {} != nil {{", parameter.name), "}", |out| {
                        out.line(format!("urlTplParams[\"{}\"] = *{}", wire, parameter.name));
                    });
                } else {
                    out.block(format!("if {} != \"\" {{", parameter.name), "}", |out| {
                        out.line(format!("urlTplParams[\"{}\"] = {}", wire, parameter.name));
                    });
                }
            }
            out.line(format!(
                "return {}(urlTplParams, m.requestAdapter)",
                file.constructor_function(target, "Internal")
            ));
        },
    );
    out.blank();
}

fn write_accessor(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass, method: &CodeMethod) {
    let field = method
        .accessed_member
        .as_deref()
        .and_then(|name| class.property(name))
        .map(field_name)
        .unwrap_or_default();
    let name = exported(&method.name);
    match method.kind {
        MethodKind::Getter => {
            let return_type = file.type_name(&method.return_type);
            write_comment(out, &name, Some(&format!("gets the {} property value", field)));
            out.block(format!("{} {}()({}) {{", receiver(class), name, return_type), "}", |out| {
                out.line(format!("return m.{}", field));
            });
        }
        MethodKind::Setter => {
            let parameters: Vec<&CodeParameter> = method.parameters.iter().collect();
            write_comment(out, &name, Some(&format!("sets the {} property value", field)));
            out.block(format!("{} {}({})() {{", receiver(class), name, parameter_list(file, &parameters)), "}", |out| {
                out.line(format!("m.{} = value", field));
            });
        }
        _ => {
            write_comment(out, &name, Some("checks if the current instance is nil"));
            out.block(format!("{} {}()(bool) {{", receiver(class), name), "}", |out| {
                out.line("return m == nil");
            });
        }
    }
    out.blank();
}

fn write_methods(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass) {
    let has_constructor = class.methods.iter().any(|m| {
        m.is_of_kind(&[MethodKind::Constructor, MethodKind::ClientConstructor])
    });
    if !has_constructor && class.is_of_kind(&[ClassKind::Model, ClassKind::UnionWrapper]) {
        let constructor = CodeMethod::new("constructor", MethodKind::Constructor)
            .with_description(format!("Instantiates a new {} and sets the default values.", class.name));
        write_constructor(out, file, class, &constructor);
    }
    for method in &class.methods {
        match method.kind {
            MethodKind::Constructor | MethodKind::ClientConstructor | MethodKind::RawUrlConstructor => {
                write_constructor(out, file, class, method)
            }
            MethodKind::RequestGenerator => write_generator(out, file, class, method),
            MethodKind::RequestExecutor => write_executor(out, file, class, method),
            MethodKind::Serializer => write_serializer(out, file, class, method),
            MethodKind::Deserializer => write_deserializer(out, file, class, method),
            MethodKind::RequestBuilderBackwardCompatibility
            | MethodKind::RequestBuilderWithParameters
            | MethodKind::IndexerBackwardCompatibility => write_navigation(out, file, class, method),
            MethodKind::Getter | MethodKind::Setter | MethodKind::NullCheck => {
                write_accessor(out, file, class, method)
            }
            MethodKind::Custom => {
                let parameters: Vec<&CodeParameter> = method.parameters.iter().collect();
                out.block(
                    format!(
                        "{} {}({})({}) {{",
                        receiver(class),
                        exported(&method.name),
                        parameter_list(file, &parameters),
                        file.type_name(&method.return_type)
                    ),
                    "}",
                    |out| out.line("panic(\"not implemented\")"),
                );
                out.blank();
            }
        }
    }
}

fn collect_usings<'c>(class: &'c CodeClass, out: &mut Vec<&'c CodeUsing>) {
    out.extend(class.usings.iter());
    for inner in &class.inner_classes {
        collect_usings(inner, out);
    }
}

fn write_inner_classes(out: &mut CodeWriter, file: &GoFile<'_>, class: &CodeClass) {
    for inner in &class.inner_classes {
        write_struct(out, file, inner);
        write_methods(out, file, inner);
        write_inner_classes(out, file, inner);
    }
}

impl LanguageWriter for GoWriter {
    fn language(&self) -> GenerationLanguage {
        GenerationLanguage::Go
    }

    fn extension(&self) -> &'static str {
        "go"
    }

    fn file_name(&self, name: &str) -> String {
        name.to_snake_case()
    }

    fn directory_name(&self, segment: &str) -> String {
        segment.to_ascii_lowercase()
    }

    fn indent_unit(&self) -> &'static str {
        "\t"
    }

    fn write_class(&self, namespace: &str, class: &CodeClass, out: &mut CodeWriter) {
        let mut usings = Vec::new();
        collect_usings(class, &mut usings);
        let file = GoFile::new(namespace, usings.iter().copied());
        out.line(format!("package {}", package_name(namespace)));
        out.blank();
        write_imports(out, namespace, &usings);
        write_struct(out, &file, class);
        write_methods(out, &file, class);
        write_inner_classes(out, &file, class);
    }

    fn write_enum(&self, namespace: &str, enumeration: &CodeEnum, out: &mut CodeWriter) {
        let usings: Vec<&CodeUsing> = enumeration.usings.iter().collect();
        out.line(format!("package {}", package_name(namespace)));
        out.blank();
        write_imports(out, namespace, &usings);
        let name = &enumeration.name;
        let constant = |option: &str| {
            format!("{}_{}", option.to_shouty_snake_case(), name.to_shouty_snake_case())
        };
        write_comment(out, name, enumeration.description.as_deref());
        out.line(format!("type {} int", name));
        out.blank();
        out.block("const (", ")", |out| {
            for (index, option) in enumeration.options.iter().enumerate() {
                if index == 0 {
                    out.line(format!("{} {} = iota", constant(option), name));
                } else {
                    out.line(constant(option));
                }
            }
        });
        out.blank();
        let quoted: Vec<String> = enumeration.options.iter().map(|o| format!("\"{}\"", o)).collect();
        out.block(format!("func (i {}) String() string {{", name), "}", |out| {
            out.line(format!("return []string{{{}}}[i]", quoted.join(", ")));
        });
        out.block(format!("func Parse{}(v string) (interface{{}}, error) {{", name), "}", |out| {
            let Some(first) = enumeration.options.first() else {
                out.line(format!("return nil, errors.New(\"Unknown {} value: \" + v)", name));
                return;
            };
            out.line(format!("result := {}", constant(first)));
            out.block("switch v {", "}", |out| {
                for option in &enumeration.options {
                    out.line(format!("case \"{}\":", option));
                    out.indent();
                    out.line(format!("result = {}", constant(option)));
                    out.dedent();
                }
                out.line("default:");
                out.indent();
                out.line(format!("return 0, errors.New(\"Unknown {} value: \" + v)", name));
                out.dedent();
            });
            out.line("return &result, nil");
        });
    }
}
