//! # Primitive Mapping
//!
//! Fixed `type`/`format` table used by the schema resolver and for parameter types.

use crate::codedom::SimpleType;
use crate::oas::refs::{has_type, primary_type};
use utoipa::openapi::schema::{Object, SchemaFormat, Type};

/// Format keyword as written in the description (`int64`, `date-time`, `base64url`).
pub(crate) fn format_name(format: Option<&SchemaFormat>) -> Option<String> {
    let format = format?;
    serde_json::to_value(format)
        .ok()
        .and_then(|v| v.as_str().map(str::to_ascii_lowercase))
}

/// Maps a primitive object schema to its external type name.
///
/// Returns `None` for objects, arrays, enums and type-less schemas.
pub(crate) fn primitive_type_name(object: &Object) -> Option<&'static str> {
    if object.enum_values.as_ref().is_some_and(|v| !v.is_empty()) {
        return None;
    }
    let format = format_name(object.format.as_ref());
    let name = match (primary_type(&object.schema_type)?, format.as_deref()) {
        (Type::String, Some("date-time")) => "DateTimeOffset",
        (Type::String, Some("date")) => "DateOnly",
        (Type::String, Some("time")) => "TimeOnly",
        (Type::String, Some("duration")) => "TimeSpan",
        (Type::String, Some("uuid")) => "Guid",
        (Type::String, Some("base64url" | "binary")) => "binary",
        (Type::String, _) => "string",
        (Type::Number | Type::Integer, Some("double")) => "double",
        (Type::Number | Type::Integer, Some("float")) => "float",
        (Type::Number | Type::Integer, Some("int64")) => "int64",
        (Type::Number | Type::Integer, Some("decimal")) => "decimal",
        (Type::Integer, _) => "integer",
        (Type::Number, _) => "number",
        (Type::Boolean, _) => "boolean",
        _ => return None,
    };
    Some(name)
}

/// External simple type for a primitive schema.
pub(crate) fn primitive_type(object: &Object) -> Option<SimpleType> {
    primitive_type_name(object).map(SimpleType::external)
}

/// Whether the schema is explicitly `type: null`.
pub(crate) fn is_null_type(object: &Object) -> bool {
    has_type(&object.schema_type, Type::Null) && primary_type(&object.schema_type).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, SchemaType};

    fn object(ty: Type, format: Option<SchemaFormat>) -> Object {
        ObjectBuilder::new()
            .schema_type(SchemaType::Type(ty))
            .format(format)
            .build()
    }

    #[test]
    fn test_string_formats() {
        assert_eq!(primitive_type_name(&object(Type::String, None)), Some("string"));
        assert_eq!(
            primitive_type_name(&object(
                Type::String,
                Some(SchemaFormat::KnownFormat(KnownFormat::DateTime))
            )),
            Some("DateTimeOffset")
        );
        assert_eq!(
            primitive_type_name(&object(
                Type::String,
                Some(SchemaFormat::Custom("base64url".into()))
            )),
            Some("binary")
        );
    }

    #[test]
    fn test_numeric_formats() {
        assert_eq!(
            primitive_type_name(&object(
                Type::Integer,
                Some(SchemaFormat::KnownFormat(KnownFormat::Int64))
            )),
            Some("int64")
        );
        assert_eq!(
            primitive_type_name(&object(
                Type::Integer,
                Some(SchemaFormat::KnownFormat(KnownFormat::Int32))
            )),
            Some("integer")
        );
        assert_eq!(
            primitive_type_name(&object(
                Type::Number,
                Some(SchemaFormat::Custom("decimal".into()))
            )),
            Some("decimal")
        );
        assert_eq!(primitive_type_name(&object(Type::Number, None)), Some("number"));
        assert_eq!(primitive_type_name(&object(Type::Boolean, None)), Some("boolean"));
    }

    #[test]
    fn test_objects_and_enums_are_not_primitives() {
        assert_eq!(primitive_type_name(&object(Type::Object, None)), None);
        let e = ObjectBuilder::new()
            .schema_type(SchemaType::Type(Type::String))
            .enum_values(Some(["a", "b"]))
            .build();
        assert_eq!(primitive_type_name(&e), None);
    }
}
