#![deny(missing_docs)]

//! # Description Normalization
//!
//! Value-level rewrites applied before deserializing into `utoipa`, which
//! only accepts the 3.1 shape of a few constructs:
//!
//! - parameters must carry `required`
//! - schemas cannot be booleans
//! - nullability is a `null` member of `type`, not a `nullable` flag
//! - `const` is not recognized, a single-value `enum` is

use serde_json::{json, Map, Value};

/// Keys whose value is a single schema.
const SCHEMA_KEYS: &[&str] = &[
    "items",
    "not",
    "contains",
    "propertyNames",
    "if",
    "then",
    "else",
];

/// Keys whose value is a list of schemas.
const SCHEMA_LIST_KEYS: &[&str] = &["allOf", "anyOf", "oneOf", "prefixItems"];

/// Keys whose value is a map of schemas.
const SCHEMA_MAP_KEYS: &[&str] = &["properties", "patternProperties", "dependentSchemas"];

/// Keys that may hold `false` as a legitimate value rather than a schema.
const FREE_FORM_KEYS: &[&str] = &[
    "additionalProperties",
    "unevaluatedProperties",
    "unevaluatedItems",
];

/// Keys holding literal instance data; never rewritten.
const LITERAL_KEYS: &[&str] = &["example", "examples", "default", "enum"];

/// Runs every rewrite in order.
pub(crate) fn normalize_description(value: &mut Value) {
    normalize_parameter_required(value);
    normalize_boolean_schemas(value);
    normalize_nullable_schemas(value);
    normalize_const_schemas(value);
}

/// Fills in the optional `required` flag of parameter objects.
///
/// Path parameters are always required; everything else defaults to `false`.
/// Parameters are looked up on path items, operations and `components.parameters`.
pub(crate) fn normalize_parameter_required(value: &mut Value) {
    if let Some(paths) = value.get_mut("paths").and_then(Value::as_object_mut) {
        for item in paths.values_mut() {
            let Some(item) = item.as_object_mut() else {
                continue;
            };
            for (key, entry) in item.iter_mut() {
                if key == "parameters" {
                    fill_required(entry);
                } else if let Some(parameters) = entry.get_mut("parameters") {
                    fill_required(parameters);
                }
            }
        }
    }
    if let Some(parameters) = value
        .get_mut("components")
        .and_then(|c| c.get_mut("parameters"))
        .and_then(Value::as_object_mut)
    {
        for parameter in parameters.values_mut() {
            fill_parameter_required(parameter);
        }
    }
}

fn fill_required(parameters: &mut Value) {
    if let Some(parameters) = parameters.as_array_mut() {
        for parameter in parameters {
            fill_parameter_required(parameter);
        }
    }
}

fn fill_parameter_required(parameter: &mut Value) {
    let Some(map) = parameter.as_object_mut() else {
        return;
    };
    if map.contains_key("$ref") || map.contains_key("required") {
        return;
    }
    let in_path = map.get("in").and_then(Value::as_str) == Some("path");
    map.insert("required".to_string(), Value::Bool(in_path));
}

/// Rewrites boolean schemas into object schemas.
///
/// `true` becomes `{}`; `false` becomes an unsatisfiable object schema.
pub(crate) fn normalize_boolean_schemas(value: &mut Value) {
    if let Some(schemas) = value
        .get_mut("components")
        .and_then(|c| c.get_mut("schemas"))
        .and_then(Value::as_object_mut)
    {
        for schema in schemas.values_mut() {
            rewrite_schema(schema);
        }
    }
    rewrite_schema_positions(value);
}

/// Walks every `schema` slot (parameters, media types, headers).
fn rewrite_schema_positions(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if matches!(key.as_str(), "schema" | "itemSchema" | "contentSchema") {
                    rewrite_schema(v);
                } else if key != "schemas" {
                    rewrite_schema_positions(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_schema_positions),
        _ => {}
    }
}

fn rewrite_schema(schema: &mut Value) {
    match schema {
        Value::Bool(accepts) => *schema = boolean_replacement(*accepts),
        Value::Object(map) => {
            for key in SCHEMA_KEYS {
                if let Some(child) = map.get_mut(*key) {
                    rewrite_schema(child);
                }
            }
            for key in SCHEMA_LIST_KEYS {
                if let Some(children) = map.get_mut(*key).and_then(Value::as_array_mut) {
                    children.iter_mut().for_each(rewrite_schema);
                }
            }
            for key in SCHEMA_MAP_KEYS {
                if let Some(children) = map.get_mut(*key).and_then(Value::as_object_mut) {
                    children.values_mut().for_each(rewrite_schema);
                }
            }
            for key in FREE_FORM_KEYS {
                if let Some(child) = map.get_mut(*key).filter(|c| !c.is_boolean()) {
                    rewrite_schema(child);
                }
            }
        }
        _ => {}
    }
}

fn boolean_replacement(accepts: bool) -> Value {
    if accepts {
        Value::Object(Map::new())
    } else {
        json!({
            "type": "object",
            "additionalProperties": false,
            "required": ["__never__"]
        })
    }
}

/// Rewrites `nullable: true` (and `x-nullable: true`) into a `null` type member.
///
/// A schema without `type` (a bare `$ref`, a composition) is wrapped as
/// `anyOf: [schema, {type: null}]`.
pub(crate) fn normalize_nullable_schemas(value: &mut Value) {
    if let Value::Object(map) = value {
        if let Some(wrapped) = take_nullable_flag(map) {
            *value = wrapped;
        }
    }
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if !LITERAL_KEYS.contains(&key.as_str()) {
                    normalize_nullable_schemas(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_nullable_schemas),
        _ => {}
    }
}

fn take_nullable_flag(map: &mut Map<String, Value>) -> Option<Value> {
    let flagged = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);
    let nullable = flagged("nullable") || flagged("x-nullable");
    // `nullable: false` is dropped too; it is the 3.1 default.
    if map.get("nullable").is_some_and(Value::is_boolean) {
        map.remove("nullable");
    }
    if map.get("x-nullable").is_some_and(Value::is_boolean) {
        map.remove("x-nullable");
    }
    if !nullable {
        return None;
    }
    match map.get_mut("type") {
        Some(ty) if ty.is_string() => {
            if ty.as_str() != Some("null") {
                let name = ty.take();
                *ty = json!([name, "null"]);
            }
            None
        }
        Some(Value::Array(names)) => {
            if !names.iter().any(|n| n.as_str() == Some("null")) {
                names.push(json!("null"));
            }
            None
        }
        Some(_) => None,
        None => {
            let inner = Value::Object(std::mem::take(map));
            Some(json!({ "anyOf": [inner, { "type": "null" }] }))
        }
    }
}

/// Rewrites `const: v` into `enum: [v]`, inferring `type` when absent.
pub(crate) fn normalize_const_schemas(value: &mut Value) {
    match value {
        Value::Object(map) => {
            if let Some(constant) = map.remove("const") {
                if !map.contains_key("type") {
                    if let Some(name) = json_type_name(&constant) {
                        map.insert("type".to_string(), Value::String(name.to_string()));
                    }
                }
                map.entry("enum").or_insert_with(|| Value::Array(vec![constant]));
            }
            for (key, v) in map.iter_mut() {
                if !LITERAL_KEYS.contains(&key.as_str()) {
                    normalize_const_schemas(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_const_schemas),
        _ => {}
    }
}

fn json_type_name(value: &Value) -> Option<&'static str> {
    let name = match value {
        Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => return None,
    };
    Some(name)
}
