#![deny(missing_docs)]

//! # Reference Resolution
//!
//! Resolves `RefOr<Schema>` values against `components.schemas`, keeping the
//! component name ("reference id") of the schema that was finally reached.

use crate::error::{AppError, AppResult};
use std::collections::HashSet;
use utoipa::openapi::schema::{Schema, SchemaType, Type};
use utoipa::openapi::{OpenApi, RefOr, Response};

/// A schema together with the name of the component it was reached through.
#[derive(Clone, Copy)]
pub struct ResolvedSchema<'a> {
    /// The schema body.
    pub schema: &'a Schema,
    /// Component name, when the schema was reached through a `$ref`.
    pub reference_id: Option<&'a str>,
}

impl<'a> ResolvedSchema<'a> {
    /// Wraps an inline schema.
    pub fn inline(schema: &'a Schema) -> Self {
        Self {
            schema,
            reference_id: None,
        }
    }

    /// `title`, when the schema kind carries one.
    pub fn title(&self) -> Option<&'a str> {
        let title = match self.schema {
            Schema::Object(o) => o.title.as_deref(),
            Schema::Array(a) => a.title.as_deref(),
            Schema::AllOf(a) => a.title.as_deref(),
            Schema::AnyOf(_) => None,
            Schema::OneOf(o) => o.title.as_deref(),
            _ => None,
        };
        title.filter(|t| !t.trim().is_empty())
    }

    /// Title, falling back to the reference id.
    pub fn declaration_name(&self) -> Option<&'a str> {
        self.title().or(self.reference_id)
    }

    /// `description`, when the schema kind carries one.
    pub fn description(&self) -> Option<&'a str> {
        match self.schema {
            Schema::Object(o) => o.description.as_deref(),
            Schema::Array(a) => a.description.as_deref(),
            Schema::AllOf(a) => a.description.as_deref(),
            Schema::AnyOf(a) => a.description.as_deref(),
            Schema::OneOf(o) => o.description.as_deref(),
            _ => None,
        }
    }

    /// Whether the schema is an object (explicitly typed or carrying properties).
    pub fn is_object(&self) -> bool {
        match self.schema {
            Schema::Object(o) => {
                !o.properties.is_empty() || has_type(&o.schema_type, Type::Object)
            }
            _ => false,
        }
    }

    /// Whether the schema declares `enum` values.
    pub fn is_enum(&self) -> bool {
        matches!(self.schema, Schema::Object(o) if o.enum_values.as_ref().is_some_and(|v| !v.is_empty()))
    }
}

/// Whether `schema_type` names `ty`, alone or within a type array.
pub fn has_type(schema_type: &SchemaType, ty: Type) -> bool {
    match schema_type {
        SchemaType::Type(t) => *t == ty,
        SchemaType::Array(types) => types.contains(&ty),
        _ => false,
    }
}

/// The first non-null type named by `schema_type`.
pub fn primary_type(schema_type: &SchemaType) -> Option<Type> {
    match schema_type {
        SchemaType::Type(Type::Null) => None,
        SchemaType::Type(t) => Some(t.clone()),
        SchemaType::Array(types) => types.iter().find(|t| **t != Type::Null).cloned(),
        _ => None,
    }
}

/// Extracts the simple name from a reference string.
/// e.g. `#/components/schemas/User` -> `User`
pub fn extract_ref_name(ref_loc: &str) -> &str {
    ref_loc.rsplit('/').next().unwrap_or(ref_loc)
}

/// Resolves `ref_or`, following `$ref` chains through `components.schemas`.
///
/// `#/components/schemas/{Name}` and bare local pointers such as `#/Pet` are both
/// looked up by their last segment.
pub fn resolve_schema<'a>(
    document: &'a OpenApi,
    ref_or: &'a RefOr<Schema>,
) -> AppResult<ResolvedSchema<'a>> {
    let mut current = ref_or;
    let mut reference_id = None;
    let mut visited = HashSet::new();

    loop {
        match current {
            RefOr::T(schema) => {
                return Ok(ResolvedSchema {
                    schema,
                    reference_id,
                })
            }
            RefOr::Ref(r) => {
                let name = extract_ref_name(&r.ref_location);
                if !visited.insert(name) {
                    return Err(AppError::UnresolvedReference(format!(
                        "{} (reference cycle)",
                        r.ref_location
                    )));
                }
                let (key, target) = document
                    .components
                    .as_ref()
                    .and_then(|c| c.schemas.get_key_value(name))
                    .ok_or_else(|| AppError::UnresolvedReference(r.ref_location.clone()))?;
                reference_id = Some(key.as_str());
                current = target;
            }
        }
    }
}

/// Resolves a component by name.
pub fn resolve_component<'a>(
    document: &'a OpenApi,
    name: &str,
) -> AppResult<ResolvedSchema<'a>> {
    let (key, target) = document
        .components
        .as_ref()
        .and_then(|c| c.schemas.get_key_value(name))
        .ok_or_else(|| AppError::UnresolvedReference(name.to_string()))?;
    let mut resolved = resolve_schema(document, target)?;
    if resolved.reference_id.is_none() {
        resolved.reference_id = Some(key.as_str());
    }
    Ok(resolved)
}

/// Resolves a response, following references into `components.responses`.
pub fn resolve_response<'a>(
    document: &'a OpenApi,
    ref_or: &'a RefOr<Response>,
) -> AppResult<&'a Response> {
    let mut current = ref_or;
    let mut visited = HashSet::new();
    loop {
        match current {
            RefOr::T(response) => return Ok(response),
            RefOr::Ref(r) => {
                let name = extract_ref_name(&r.ref_location);
                if !visited.insert(name) {
                    return Err(AppError::UnresolvedReference(format!(
                        "{} (reference cycle)",
                        r.ref_location
                    )));
                }
                current = document
                    .components
                    .as_ref()
                    .and_then(|c| c.responses.get(name))
                    .ok_or_else(|| AppError::UnresolvedReference(r.ref_location.clone()))?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::load_description;

    const YAML: &str = r#"
openapi: 3.1.0
info:
  title: t
  version: v
components:
  schemas:
    Pet:
      title: Animal
      type: object
      properties:
        name:
          type: string
    PetAlias:
      $ref: '#/components/schemas/Pet'
    Loop:
      $ref: '#/components/schemas/Loop'
    Color:
      type: string
      enum: [red, green]
"#;

    fn pet_ref(location: &str) -> RefOr<Schema> {
        RefOr::Ref(utoipa::openapi::Ref::new(location))
    }

    #[test]
    fn test_extract_ref_name() {
        assert_eq!(extract_ref_name("#/components/schemas/User"), "User");
        assert_eq!(extract_ref_name("#/Pet"), "Pet");
    }

    #[test]
    fn test_resolves_components_and_bare_pointers() {
        let doc = load_description(YAML).unwrap();
        for location in ["#/components/schemas/Pet", "#/Pet"] {
            let r = pet_ref(location);
            let resolved = resolve_schema(&doc, &r).unwrap();
            assert_eq!(resolved.reference_id, Some("Pet"));
            assert_eq!(resolved.title(), Some("Animal"));
            assert!(resolved.is_object());
        }
    }

    #[test]
    fn test_follows_chains_to_final_component() {
        let doc = load_description(YAML).unwrap();
        let r = pet_ref("#/components/schemas/PetAlias");
        let resolved = resolve_schema(&doc, &r).unwrap();
        assert_eq!(resolved.reference_id, Some("Pet"));
    }

    #[test]
    fn test_cycles_and_unknown_names_fail() {
        let doc = load_description(YAML).unwrap();
        let cycle = pet_ref("#/components/schemas/Loop");
        assert!(matches!(
            resolve_schema(&doc, &cycle),
            Err(AppError::UnresolvedReference(_))
        ));
        let unknown = pet_ref("#/components/schemas/Nope");
        assert!(matches!(
            resolve_schema(&doc, &unknown),
            Err(AppError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn test_enum_detection() {
        let doc = load_description(YAML).unwrap();
        let resolved = resolve_component(&doc, "Color").unwrap();
        assert!(resolved.is_enum());
        assert!(!resolved.is_object());
        assert_eq!(resolved.declaration_name(), Some("Color"));
    }
}
