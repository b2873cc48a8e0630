//! # Schema Resolver
//!
//! Turns a schema into a code type, declaring the models, enums and unions it
//! needs on the way. Shapes are tried in a fixed order:
//!
//! 1. inline object with properties: a model in the current namespace
//! 2. `allOf`: an inheritance chain
//! 3. `anyOf` / `oneOf`: a union type
//! 4. referenced object or enum: a declaration in the models namespace
//! 5. array: the item type wrapped in a collection
//! 6. inline enum: an enum in the current namespace
//! 7. primitive: the fixed primitive table
//!
//! Anything else is fatal.

use super::primitives::{is_null_type, primitive_type};
use super::ModelBuilder;
use crate::codedom::{
    ClassKind, CodeClass, CodeEnum, CodeMethod, CodeProperty, CodeType, CollectionKind,
    DeclarationKind, DeclarationRef, PropertyKind, SimpleType, UnionType,
};
use crate::diagnostics::WarningKind;
use crate::error::{AppError, AppResult};
use crate::oas::refs::{has_type, resolve_schema, ResolvedSchema};
use crate::oas::tree::sanitize;
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use utoipa::openapi::schema::{AdditionalProperties, ArrayItems, Object, Schema, Type};
use utoipa::openapi::RefOr;

/// Where a schema is being resolved, and the name an inline declaration gets.
#[derive(Debug, Clone)]
pub(crate) struct NamingContext {
    /// Namespace receiving inline declarations.
    pub(crate) namespace: String,
    /// Name given to an inline declaration, used verbatim.
    pub(crate) class_name: String,
    /// Human readable position, reported by fatal errors.
    pub(crate) location: String,
}

impl NamingContext {
    pub(crate) fn new(
        namespace: impl Into<String>,
        class_name: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            class_name: class_name.into(),
            location: location.into(),
        }
    }

    fn unhandled(&self) -> AppError {
        AppError::UnhandledSchema {
            location: self.location.clone(),
        }
    }
}

/// Declaration name for a title or reference id: last dotted segment, upper camel.
pub(crate) fn declaration_name(raw: &str) -> String {
    let last = raw.rsplit('.').next().unwrap_or(raw);
    sanitize(last).to_upper_camel_case()
}

fn forbids_additional_properties(object: &Object) -> bool {
    matches!(
        object.additional_properties.as_deref(),
        Some(AdditionalProperties::FreeForm(false))
    )
}

fn enum_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl<'a> ModelBuilder<'a> {
    /// Resolves `schema` to a code type.
    pub(crate) fn resolve_schema_type(
        &self,
        schema: &'a RefOr<Schema>,
        ctx: &NamingContext,
    ) -> AppResult<CodeType> {
        let resolved = resolve_schema(self.document, schema)?;
        self.resolve_resolved(resolved, ctx)
    }

    fn resolve_resolved(
        &self,
        resolved: ResolvedSchema<'a>,
        ctx: &NamingContext,
    ) -> AppResult<CodeType> {
        match resolved.schema {
            Schema::Object(object)
                if resolved.reference_id.is_none() && !object.properties.is_empty() =>
            {
                let (declaration, _) = self.add_model_class(
                    &ctx.namespace,
                    ctx.class_name.clone(),
                    Some(object),
                    None,
                    ctx,
                )?;
                Ok(CodeType::bound(declaration))
            }
            Schema::AllOf(all_of) => self.resolve_all_of(resolved, &all_of.items, ctx),
            Schema::AnyOf(any_of) => self.resolve_union(resolved, &any_of.items, ctx),
            Schema::OneOf(one_of) => self.resolve_union(resolved, &one_of.items, ctx),
            Schema::Object(object) if resolved.is_object() || resolved.is_enum() => {
                match resolved.reference_id {
                    Some(reference_id) => self.resolve_referenced(resolved, reference_id, object, ctx),
                    None if resolved.is_enum() => {
                        let declaration =
                            self.add_enum(&ctx.namespace, ctx.class_name.clone(), object);
                        Ok(CodeType::bound(declaration))
                    }
                    None => Ok(CodeType::external("object")),
                }
            }
            Schema::Array(array) => {
                let ArrayItems::RefOrSchema(items) = &array.items else {
                    return Err(ctx.unhandled());
                };
                let mut ty = self.resolve_schema_type(items, ctx)?;
                ty.set_collection(CollectionKind::Array);
                Ok(ty)
            }
            Schema::Object(object) => {
                if let Some(primitive) = primitive_type(object) {
                    return Ok(primitive.into());
                }
                if has_type(&object.schema_type, Type::Object) {
                    return Ok(CodeType::external("object"));
                }
                Err(ctx.unhandled())
            }
            _ => Err(ctx.unhandled()),
        }
    }

    /// Models namespace for a reference id: the client prefix is stripped and
    /// every dotted segment but the last becomes a sub-namespace.
    /// `microsoft.graph.user` lands in `ApiSdk.models.microsoft.graph`.
    pub(crate) fn models_namespace_for(&self, reference_id: &str) -> String {
        let prefix = format!("{}.", self.config.client_class_name.to_ascii_lowercase());
        let id = if reference_id.to_ascii_lowercase().starts_with(&prefix) {
            reference_id.get(prefix.len()..).unwrap_or(reference_id)
        } else {
            reference_id
        };
        let mut namespace = self.config.models_namespace_name();
        if let Some((parents, _)) = id.rsplit_once('.') {
            for segment in parents.split('.') {
                let segment = sanitize(segment).to_lower_camel_case();
                if !segment.is_empty() {
                    namespace.push('.');
                    namespace.push_str(&segment);
                }
            }
        }
        namespace
    }

    fn resolve_referenced(
        &self,
        resolved: ResolvedSchema<'a>,
        reference_id: &str,
        object: &'a Object,
        ctx: &NamingContext,
    ) -> AppResult<CodeType> {
        let namespace = self.models_namespace_for(reference_id);
        let name = declaration_name(resolved.declaration_name().unwrap_or(reference_id));
        if resolved.is_enum() {
            return Ok(CodeType::bound(self.add_enum(&namespace, name, object)));
        }
        let (declaration, _) = self.add_model_class(&namespace, name, Some(object), None, ctx)?;
        Ok(CodeType::bound(declaration))
    }

    fn flatten_all_of(
        &self,
        branches: &'a [RefOr<Schema>],
        out: &mut Vec<ResolvedSchema<'a>>,
    ) -> AppResult<()> {
        for branch in branches {
            let resolved = resolve_schema(self.document, branch)?;
            match resolved.schema {
                Schema::AllOf(nested) if resolved.reference_id.is_none() => {
                    self.flatten_all_of(&nested.items, out)?
                }
                _ => out.push(resolved),
            }
        }
        Ok(())
    }

    /// The first referenced branch becomes the parent, wherever it sits. The
    /// first remaining object branch declares the class itself; later ones
    /// merge their properties into it.
    fn resolve_all_of(
        &self,
        resolved: ResolvedSchema<'a>,
        branches: &'a [RefOr<Schema>],
        ctx: &NamingContext,
    ) -> AppResult<CodeType> {
        let mut flattened = Vec::with_capacity(branches.len());
        self.flatten_all_of(branches, &mut flattened)?;

        let namespace = match resolved.reference_id {
            Some(reference_id) => self.models_namespace_for(reference_id),
            None => ctx.namespace.clone(),
        };
        let owner_name = |branch: &ResolvedSchema<'a>| {
            resolved
                .declaration_name()
                .or_else(|| branch.title())
                .map(declaration_name)
                .unwrap_or_else(|| ctx.class_name.clone())
        };

        let parent_index = flattened.iter().position(|b| b.reference_id.is_some());
        let parent = match parent_index.and_then(|i| flattened.get(i)) {
            Some(branch) => self.resolve_parent(*branch, ctx)?,
            None => None,
        };

        let mut owner: Option<(DeclarationRef, bool)> = None;
        for (index, branch) in flattened.into_iter().enumerate() {
            if Some(index) == parent_index {
                continue;
            }
            if branch.reference_id.is_some() {
                self.resolve_resolved(branch, ctx)?;
            }
            let Schema::Object(object) = branch.schema else {
                if branch.reference_id.is_none() {
                    self.resolve_resolved(branch, ctx)?;
                }
                continue;
            };
            match &owner {
                None => {
                    let name = owner_name(&branch);
                    owner = Some(self.add_model_class(
                        &namespace,
                        name,
                        Some(object),
                        parent.clone(),
                        ctx,
                    )?);
                }
                Some((declaration, true)) => self.merge_properties(declaration, object, ctx)?,
                Some((_, false)) => {}
            }
        }

        match (owner, parent) {
            (Some((declaration, _)), _) => Ok(CodeType::bound(declaration)),
            (None, Some(parent)) if resolved.reference_id.is_none() => Ok(CodeType::bound(parent)),
            (None, Some(parent)) => {
                let name = owner_name(&resolved);
                let (declaration, _) =
                    self.add_model_class(&namespace, name, None, Some(parent), ctx)?;
                Ok(CodeType::bound(declaration))
            }
            (None, None) => Err(ctx.unhandled()),
        }
    }

    /// Inheritance parent for a referenced branch.
    ///
    /// A class already declared under that name is reused, first in the
    /// branch's own models namespace and then anywhere in the tree.
    fn resolve_parent(
        &self,
        branch: ResolvedSchema<'a>,
        ctx: &NamingContext,
    ) -> AppResult<Option<DeclarationRef>> {
        if let Some(reference_id) = branch.reference_id {
            let namespace = self.models_namespace_for(reference_id);
            let name = declaration_name(branch.declaration_name().unwrap_or(reference_id));
            if let Some(existing) = self.registry.find_declaration_anywhere(&namespace, &name) {
                if existing.kind == DeclarationKind::Class {
                    return Ok(Some(existing));
                }
            }
        }
        let ty = self.resolve_resolved(branch, ctx)?;
        Ok(ty
            .declaration()
            .filter(|d| d.kind == DeclarationKind::Class)
            .cloned())
    }

    fn resolve_union(
        &self,
        resolved: ResolvedSchema<'a>,
        branches: &'a [RefOr<Schema>],
        ctx: &NamingContext,
    ) -> AppResult<CodeType> {
        let name = resolved
            .declaration_name()
            .map(declaration_name)
            .unwrap_or_else(|| ctx.class_name.clone());
        let namespace = match resolved.reference_id {
            Some(reference_id) => self.models_namespace_for(reference_id),
            None => ctx.namespace.clone(),
        };
        let mut members = Vec::with_capacity(branches.len());
        for branch in branches {
            let branch = resolve_schema(self.document, branch)?;
            if !matches!(branch.schema, Schema::Object(o) if is_null_type(o)) {
                members.push(branch);
            }
        }
        // `anyOf: [T, {type: null}]` is a nullable T, not a union.
        if let [single] = members.as_slice() {
            let single_ctx = NamingContext::new(namespace, name, ctx.location.clone());
            return self.resolve_resolved(*single, &single_ctx);
        }

        let mut union = UnionType::new(name);
        for (index, branch) in members.into_iter().enumerate() {
            let branch_ctx = NamingContext::new(
                namespace.clone(),
                format!("{}Member{}", union.name, index + 1),
                format!("{}/{}", ctx.location, index),
            );
            match self.resolve_resolved(branch, &branch_ctx)? {
                CodeType::Simple(member) => union.add_member(member),
                CodeType::Union(nested) => {
                    for member in nested.members {
                        union.add_member(member);
                    }
                }
            }
        }
        match union.members.len() {
            0 => Err(ctx.unhandled()),
            1 => Ok(union.members.remove(0).into()),
            _ => Ok(CodeType::Union(union)),
        }
    }

    fn add_enum(&self, namespace: &str, name: String, object: &Object) -> DeclarationRef {
        let values = object
            .enum_values
            .iter()
            .flatten()
            .filter_map(enum_value);
        let enumeration = CodeEnum::new(name, object.description.clone(), values);
        let (declaration, created) = self.registry.insert_enum_if_absent(namespace, enumeration);
        if created {
            tracing::trace!(declaration = %declaration, "Enum declared");
        }
        declaration
    }

    /// Declares a model class unless the name is taken, then fills it.
    ///
    /// The skeleton is registered before any property is resolved, so a
    /// self-referencing schema finds it instead of recursing.
    fn add_model_class(
        &self,
        namespace: &str,
        name: String,
        object: Option<&'a Object>,
        parent: Option<DeclarationRef>,
        ctx: &NamingContext,
    ) -> AppResult<(DeclarationRef, bool)> {
        let mut class = CodeClass::new(name, ClassKind::Model);
        class.description = object.and_then(|o| o.description.clone());
        class.parent_class = parent.map(SimpleType::bound);
        let (declaration, created) = self.registry.insert_class_if_absent(namespace, class);
        if !created {
            return Ok((declaration, false));
        }
        tracing::trace!(declaration = %declaration, "Model declared");

        let properties = match object {
            Some(object) => self.model_properties(&declaration, object, ctx)?,
            None => Vec::new(),
        };
        let additional_data = !object.is_some_and(forbids_additional_properties);
        self.registry
            .with_class(&declaration, |class| -> AppResult<()> {
                for property in properties {
                    class.add_property(property)?;
                }
                self.add_serialization_members(class, additional_data)
            })
            .transpose()?;
        Ok((declaration, true))
    }

    fn merge_properties(
        &self,
        declaration: &DeclarationRef,
        object: &'a Object,
        ctx: &NamingContext,
    ) -> AppResult<()> {
        let properties = self.model_properties(declaration, object, ctx)?;
        self.registry
            .with_class(declaration, |class| -> AppResult<()> {
                for property in properties {
                    class.add_property(property)?;
                }
                Ok(())
            })
            .transpose()?;
        Ok(())
    }

    fn model_properties(
        &self,
        owner: &DeclarationRef,
        object: &'a Object,
        ctx: &NamingContext,
    ) -> AppResult<Vec<CodeProperty>> {
        let mut properties = Vec::with_capacity(object.properties.len());
        for (wire_name, schema) in &object.properties {
            let identifier = sanitize(self.config.strip_property_prefix(wire_name)).to_lower_camel_case();
            if identifier.is_empty() {
                self.diagnostics.warn(
                    WarningKind::MissingName,
                    format!("Skipping property '{}' of {}: no usable name", wire_name, owner),
                );
                continue;
            }
            let property_ctx = NamingContext::new(
                owner.namespace.clone(),
                format!("{}_{}", owner.name, identifier),
                format!("{}/properties/{}", ctx.location, wire_name),
            );
            let resolved = resolve_schema(self.document, schema)?;
            let mut ty = self.resolve_resolved(resolved, &property_ctx)?;
            if matches!(resolved.schema, Schema::Array(_)) {
                ty.set_collection(CollectionKind::Complex);
            }
            let mut property = CodeProperty::new(identifier, PropertyKind::Custom, ty);
            property.description = resolved.description().map(str::to_string);
            property.read_only = matches!(resolved.schema, Schema::Object(o) if o.read_only == Some(true));
            if property.name != *wire_name {
                property.serialization_name = Some(wire_name.clone());
            }
            properties.push(property);
        }
        Ok(properties)
    }

    fn add_serialization_members(&self, class: &mut CodeClass, additional_data: bool) -> AppResult<()> {
        class.add_method(CodeMethod::field_deserializers())?;
        class.add_method(CodeMethod::serializer())?;

        if class.parent_class.is_some() {
            return Ok(());
        }
        if additional_data {
            class.add_property(
                CodeProperty::new(
                    "additionalData",
                    PropertyKind::AdditionalData,
                    CodeType::external("IDictionary<string, object>"),
                )
                .with_default("new Dictionary<string, object>()")
                .with_description(
                    "Stores additional data not described in the OpenAPI description found when deserializing. Can be used for serialization as well.",
                ),
            )?;
        }
        if self.config.uses_backing_store {
            let mut backing_store = CodeProperty::new(
                "backingStore",
                PropertyKind::BackingStore,
                CodeType::Simple(SimpleType::external("IBackingStore").nullable(false)),
            )
            .with_description("Stores model information.");
            backing_store.read_only = true;
            class.add_property(backing_store)?;
            class.implements.push(SimpleType::external("IBackedModel"));
        }
        Ok(())
    }

    /// Type of a path or query parameter: a primitive, a primitive array, or `string`.
    pub(crate) fn parameter_type(&self, schema: Option<&'a RefOr<Schema>>) -> AppResult<SimpleType> {
        let Some(schema) = schema else {
            return Ok(SimpleType::external("string"));
        };
        let resolved = resolve_schema(self.document, schema)?;
        let ty = match resolved.schema {
            Schema::Object(object) => primitive_type(object),
            Schema::Array(array) => match &array.items {
                ArrayItems::RefOrSchema(items) => match resolve_schema(self.document, items)?.schema {
                    Schema::Object(object) => {
                        primitive_type(object).map(|t| t.collection(CollectionKind::Array))
                    }
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        };
        Ok(ty.unwrap_or_else(|| SimpleType::external("string")))
    }
}
