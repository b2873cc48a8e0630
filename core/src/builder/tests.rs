use super::schemas::NamingContext;
use super::ModelBuilder;
use crate::codedom::{
    ClassKind, CodeClass, CodeNamespace, CodeType, CollectionKind, DeclarationRef, MethodKind,
    ParameterKind, PropertyKind,
};
use crate::config::GenerationConfiguration;
use crate::diagnostics::{Diagnostics, WarningKind};
use crate::error::AppError;
use crate::oas::{load_description, UrlTreeNode};
use pretty_assertions::assert_eq;
use utoipa::openapi::{Ref, RefOr};

const HEADER: &str = r#"
openapi: 3.0.1
info:
  title: Test
  version: 1.0.0
servers:
  - url: https://api.example.com/v1
"#;

fn description(body: &str) -> String {
    format!("{}{}", HEADER, body)
}

fn config() -> GenerationConfiguration {
    GenerationConfiguration {
        api_root_url: Some("https://api.example.com/v1".into()),
        ..GenerationConfiguration::default()
    }
}

fn build(body: &str) -> (CodeNamespace, Diagnostics) {
    let doc = load_description(&description(body)).unwrap();
    let config = config();
    let diagnostics = Diagnostics::new();
    let tree = UrlTreeNode::from_document(&doc);
    let root = ModelBuilder::new(&config, &doc, &diagnostics)
        .build(&tree)
        .unwrap();
    (root, diagnostics)
}

fn class<'t>(root: &'t CodeNamespace, namespace: &str, name: &str) -> &'t CodeClass {
    root.find_class(&DeclarationRef::class(namespace, name))
        .unwrap_or_else(|| panic!("missing class {}.{}", namespace, name))
}

fn request_builders(root: &CodeNamespace) -> Vec<String> {
    let mut names = Vec::new();
    for ns in root.all_namespaces() {
        for c in ns.classes.iter().filter(|c| c.kind == ClassKind::RequestBuilder) {
            names.push(format!("{}.{}", ns.name, c.name));
        }
    }
    names
}

const USERS: &str = r#"
paths:
  /users:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/User'
  /users/{id}:
    get:
      parameters:
        - name: id
          in: path
          required: true
          schema:
            type: string
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/User'
  /users/{id}/messages:
    get:
      parameters:
        - name: $top
          in: query
          schema:
            type: integer
        - name: filter
          in: query
          schema:
            type: string
        - name: filter
          in: query
          schema:
            type: string
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  type: string
components:
  schemas:
    User:
      type: object
      properties:
        displayName:
          type: string
        "@odata.type":
          type: string
        id:
          type: string
          readOnly: true
"#;

#[test]
fn test_users_tree_has_one_builder_per_segment() {
    let (root, _) = build(USERS);
    assert_eq!(
        request_builders(&root),
        vec![
            "ApiSdk.ApiClient",
            "ApiSdk.users.UsersRequestBuilder",
            "ApiSdk.users.item.UsersItemRequestBuilder",
            "ApiSdk.users.item.messages.MessagesRequestBuilder",
        ]
    );
}

#[test]
fn test_templated_segment_becomes_indexer() {
    let (root, _) = build(USERS);
    let users = class(&root, "ApiSdk.users", "UsersRequestBuilder");
    assert!(users.property("item").is_none());
    let indexer = users.indexer.as_ref().unwrap();
    assert_eq!(indexer.parameter_name, "id");
    assert_eq!(indexer.path_segment, "users");
    assert_eq!(indexer.return_type.name(), "UsersItemRequestBuilder");
    assert!(indexer.return_type.as_simple().unwrap().is_pending());

    let item = class(&root, "ApiSdk.users.item", "UsersItemRequestBuilder");
    let messages = item.property("messages").unwrap();
    assert_eq!(messages.kind, PropertyKind::RequestBuilder);
    assert_eq!(messages.ty.name(), "MessagesRequestBuilder");

    let constructor = item.methods_of_kind(MethodKind::Constructor).next().unwrap();
    let path = constructor.parameter_of_kind(ParameterKind::Path).unwrap();
    assert_eq!(path.name, "id");
}

#[test]
fn test_root_constructor_carries_configuration() {
    let (root, _) = build(USERS);
    let client = class(&root, "ApiSdk", "ApiClient");
    let constructor = client
        .methods_of_kind(MethodKind::ClientConstructor)
        .next()
        .unwrap();
    assert_eq!(constructor.base_url.as_deref(), Some("https://api.example.com/v1"));
    assert_eq!(constructor.serializer_modules, config().serializers);
    assert!(constructor.parameter_of_kind(ParameterKind::BackingStore).is_none());
    assert_eq!(
        client.property("urlTemplate").unwrap().default_value.as_deref(),
        Some("\"{+baseurl}\"")
    );
    assert_eq!(
        client.property("users").unwrap().ty.name(),
        "UsersRequestBuilder"
    );
}

#[test]
fn test_executor_and_generator_share_parameters() {
    let (root, diagnostics) = build(USERS);
    let messages = class(
        &root,
        "ApiSdk.users.item.messages",
        "MessagesRequestBuilder",
    );
    let executor = messages.method("get").unwrap();
    assert_eq!(executor.kind, MethodKind::RequestExecutor);
    assert!(executor.is_async);
    let executor_kinds: Vec<_> = executor.parameters.iter().map(|p| p.kind).collect();
    assert_eq!(
        executor_kinds,
        vec![
            ParameterKind::QueryParameter,
            ParameterKind::Headers,
            ParameterKind::Options,
            ParameterKind::ResponseHandler,
            ParameterKind::Cancellation,
        ]
    );
    let generator = messages.method("CreateGetRequestInformation").unwrap();
    let generator_kinds: Vec<_> = generator.parameters.iter().map(|p| p.kind).collect();
    assert_eq!(
        generator_kinds,
        vec![ParameterKind::QueryParameter, ParameterKind::Headers, ParameterKind::Options]
    );
    assert_eq!(executor.return_type.name(), "string");
    assert_eq!(executor.return_type.collection(), CollectionKind::Array);

    let query = messages.inner_class("GetQueryParameters").unwrap();
    let names: Vec<_> = query.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["top", "filter"]);
    assert_eq!(query.properties[0].serialization_name.as_deref(), Some("$top"));
    assert_eq!(
        generator
            .parameter_of_kind(ParameterKind::QueryParameter)
            .unwrap()
            .ty
            .declaration()
            .unwrap()
            .name,
        "MessagesRequestBuilder.GetQueryParameters"
    );
    assert!(diagnostics.contains(WarningKind::DuplicateQueryParameter));
    assert_eq!(
        messages.property("urlTemplate").unwrap().default_value.as_deref(),
        Some("\"{+baseurl}/users/{id}/messages{?%24top,filter}\"")
    );
}

#[test]
fn test_model_properties_follow_naming_rules() {
    let (root, _) = build(USERS);
    let user = class(&root, "ApiSdk.models", "User");
    let names: Vec<_> = user.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["displayName", "type", "id", "additionalData"]);
    assert_eq!(user.property("type").unwrap().serialization_name.as_deref(), Some("@odata.type"));
    assert!(user.property("id").unwrap().read_only);
    assert!(user.methods_of_kind(MethodKind::Serializer).next().is_some());
    assert!(user.methods_of_kind(MethodKind::Deserializer).next().is_some());

    let users = class(&root, "ApiSdk.users", "UsersRequestBuilder");
    let get = users.method("get").unwrap();
    assert_eq!(get.return_type.collection(), CollectionKind::Array);
    assert_eq!(
        get.return_type.declaration().unwrap().qualified_name(),
        "ApiSdk.models.User"
    );
}

#[test]
fn test_no_content_response_is_void_without_warning() {
    let (root, diagnostics) = build(
        r#"
paths:
  /ping:
    post:
      responses:
        '204':
          description: done
"#,
    );
    let ping = class(&root, "ApiSdk.ping", "PingRequestBuilder");
    let executor = ping.method("post").unwrap();
    assert_eq!(executor.return_type, CodeType::void());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_response_schema_warns_and_falls_back_to_void() {
    let (root, diagnostics) = build(
        r#"
paths:
  /ping:
    get:
      responses:
        '200':
          description: ok
"#,
    );
    let ping = class(&root, "ApiSdk.ping", "PingRequestBuilder");
    assert_eq!(ping.method("get").unwrap().return_type, CodeType::void());
    assert!(diagnostics.contains(WarningKind::MissingResponseSchema));
}

#[test]
fn test_reset_content_is_not_a_no_content_status() {
    let (root, diagnostics) = build(
        r#"
paths:
  /forms:
    post:
      responses:
        '205':
          description: reset
"#,
    );
    let forms = class(&root, "ApiSdk.forms", "FormsRequestBuilder");
    assert_eq!(forms.method("post").unwrap().return_type, CodeType::void());
    assert!(diagnostics.contains(WarningKind::MissingResponseSchema));
}

#[test]
fn test_any_of_becomes_union_with_bound_member() {
    let (root, _) = build(
        r#"
paths:
  /pets:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                anyOf:
                  - type: string
                  - $ref: '#/Pet'
components:
  schemas:
    Pet:
      type: object
      properties:
        name:
          type: string
"#,
    );
    let pets = class(&root, "ApiSdk.pets", "PetsRequestBuilder");
    let CodeType::Union(union) = &pets.method("get").unwrap().return_type else {
        panic!("expected a union return type");
    };
    assert_eq!(union.name, "PetsGetResponse");
    assert_eq!(union.members.len(), 2);
    assert!(union.members[0].is_external());
    assert_eq!(union.members[0].name, "string");
    assert_eq!(
        union.members[1].declaration(),
        Some(&DeclarationRef::class("ApiSdk.models", "Pet"))
    );
    assert!(root.contains_declaration(&DeclarationRef::class("ApiSdk.models", "Pet")));
}

#[test]
fn test_shared_schema_is_declared_once() {
    let (root, _) = build(
        r#"
paths:
  /home:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Address'
  /office:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Address'
components:
  schemas:
    Address:
      type: object
      properties:
        street:
          type: string
"#,
    );
    let count = root
        .all_namespaces()
        .iter()
        .flat_map(|ns| ns.classes.iter())
        .filter(|c| c.name == "Address")
        .count();
    assert_eq!(count, 1);
    let address = DeclarationRef::class("ApiSdk.models", "Address");
    for (ns, name) in [
        ("ApiSdk.home", "HomeRequestBuilder"),
        ("ApiSdk.office", "OfficeRequestBuilder"),
    ] {
        let get = class(&root, ns, name).method("get").unwrap();
        assert_eq!(get.return_type.declaration(), Some(&address));
    }
}

#[test]
fn test_resolving_a_reference_twice_returns_the_same_declaration() {
    let doc = load_description(&description(
        r#"
paths: {}
components:
  schemas:
    microsoft.graph.user:
      type: object
      properties:
        name:
          type: string
"#,
    ))
    .unwrap();
    let schema = RefOr::Ref(Ref::new("#/components/schemas/microsoft.graph.user"));
    let config = config();
    let diagnostics = Diagnostics::new();
    let builder = ModelBuilder::new(&config, &doc, &diagnostics);
    let ctx = NamingContext::new("ApiSdk", "Unused", "test");
    let first = builder.resolve_schema_type(&schema, &ctx).unwrap();
    let second = builder.resolve_schema_type(&schema, &ctx).unwrap();
    assert_eq!(first.declaration(), second.declaration());
    assert_eq!(
        first.declaration().unwrap().qualified_name(),
        "ApiSdk.models.microsoft.graph.User"
    );
}

const INHERITANCE: &str = r#"
paths:
  /dogs:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Dog'
    post:
      requestBody:
        content:
          application/json:
            schema:
              allOf:
                - $ref: '#/components/schemas/Animal'
                - type: object
                  properties:
                    nickname:
                      type: string
      responses:
        '204':
          description: created
components:
  schemas:
    Animal:
      type: object
      properties:
        name:
          type: string
        color:
          $ref: '#/components/schemas/Color'
        status:
          type: string
          enum: [alive, null, sleeping]
    Dog:
      allOf:
        - $ref: '#/components/schemas/Animal'
        - type: object
          properties:
            bark:
              type: boolean
    Color:
      type: string
      enum: [red, "null", green, red]
"#;

#[test]
fn test_all_of_parent_is_the_referenced_branch() {
    let (root, _) = build(INHERITANCE);
    let animal = DeclarationRef::class("ApiSdk.models", "Animal");
    let dog = class(&root, "ApiSdk.models", "Dog");
    assert_eq!(dog.parent_class.as_ref().and_then(|p| p.declaration()), Some(&animal));
    assert!(dog.property("bark").is_some());
    assert!(dog.property_of_kind(PropertyKind::AdditionalData).is_none());

    let body_type = class(&root, "ApiSdk.dogs", "DogsRequestBuilder")
        .method("post")
        .unwrap()
        .parameter_of_kind(ParameterKind::RequestBody)
        .unwrap()
        .ty
        .clone();
    let body = body_type.declaration().unwrap();
    assert_eq!(body.qualified_name(), "ApiSdk.dogs.DogsPostRequestBody");
    let body_class = root.find_class(body).unwrap();
    assert_eq!(
        body_class.parent_class.as_ref().and_then(|p| p.declaration()),
        Some(&animal)
    );
}

const INLINE_FIRST: &str = r#"
paths:
  /cats:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Cat'
  /kittens:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Kitten'
components:
  schemas:
    Animal:
      type: object
      properties:
        name:
          type: string
    Cat:
      allOf:
        - type: object
          properties:
            meow:
              type: boolean
        - $ref: '#/components/schemas/Animal'
    Kitten:
      allOf:
        - allOf:
            - type: object
              properties:
                whiskers:
                  type: integer
            - $ref: '#/components/schemas/Animal'
        - type: object
          properties:
            meow:
              type: boolean
"#;

fn property_names(class: &CodeClass) -> Vec<&str> {
    class.properties.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_all_of_parent_does_not_depend_on_branch_order() {
    let (root, _) = build(INLINE_FIRST);
    let animal = DeclarationRef::class("ApiSdk.models", "Animal");
    let cat = class(&root, "ApiSdk.models", "Cat");
    assert_eq!(cat.parent_class.as_ref().and_then(|p| p.declaration()), Some(&animal));
    assert_eq!(property_names(cat), vec!["meow"]);
}

#[test]
fn test_nested_all_of_is_flattened_into_one_class() {
    let (root, _) = build(INLINE_FIRST);
    let animal = DeclarationRef::class("ApiSdk.models", "Animal");
    let kitten = class(&root, "ApiSdk.models", "Kitten");
    assert_eq!(kitten.parent_class.as_ref().and_then(|p| p.declaration()), Some(&animal));
    assert_eq!(property_names(kitten), vec!["whiskers", "meow"]);
    assert_eq!(property_names(class(&root, "ApiSdk.models", "Animal")), vec!["name", "additionalData"]);
}

#[test]
fn test_all_of_parent_reuses_a_class_declared_elsewhere() {
    let doc = load_description(&description(INLINE_FIRST)).unwrap();
    let config = config();
    let diagnostics = Diagnostics::new();
    let builder = ModelBuilder::new(&config, &doc, &diagnostics);
    let animal_body = &doc.components.as_ref().unwrap().schemas["Animal"];
    let zoo_animal = builder
        .resolve_schema_type(animal_body, &NamingContext::new("ApiSdk.zoo", "Animal", "test"))
        .unwrap();
    assert_eq!(
        zoo_animal.declaration(),
        Some(&DeclarationRef::class("ApiSdk.zoo", "Animal"))
    );

    let cat_ref = RefOr::Ref(Ref::new("#/components/schemas/Cat"));
    let cat = builder
        .resolve_schema_type(&cat_ref, &NamingContext::new("ApiSdk", "Unused", "test"))
        .unwrap();
    let parent = builder
        .registry
        .with_class(cat.declaration().unwrap(), |c| c.parent_class.clone())
        .flatten()
        .unwrap();
    assert_eq!(
        parent.declaration(),
        Some(&DeclarationRef::class("ApiSdk.zoo", "Animal"))
    );
}

#[test]
fn test_nullable_schemas_keep_their_underlying_type() {
    let (root, _) = build(
        r#"
paths:
  /profiles:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Profile'
components:
  schemas:
    Profile:
      type: object
      properties:
        nickname:
          type: string
          nullable: true
        manager:
          $ref: '#/components/schemas/Manager'
          nullable: true
    Manager:
      type: object
      properties:
        name:
          type: string
"#,
    );
    let profile = class(&root, "ApiSdk.models", "Profile");
    let nickname = &profile.property("nickname").unwrap().ty;
    assert!(nickname.is_external());
    assert_eq!(nickname.name(), "string");
    assert_eq!(
        profile.property("manager").unwrap().ty.declaration(),
        Some(&DeclarationRef::class("ApiSdk.models", "Manager"))
    );
}

#[test]
fn test_model_array_properties_are_complex_collections() {
    let (root, _) = build(
        r#"
paths:
  /teams:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Team'
components:
  schemas:
    Team:
      type: object
      properties:
        members:
          type: array
          items:
            $ref: '#/components/schemas/Member'
    Member:
      type: object
      properties:
        name:
          type: string
"#,
    );
    let get = class(&root, "ApiSdk.teams", "TeamsRequestBuilder").method("get").unwrap();
    assert_eq!(get.return_type.collection(), CollectionKind::Array);
    let members = &class(&root, "ApiSdk.models", "Team").property("members").unwrap().ty;
    assert_eq!(members.collection(), CollectionKind::Complex);
    assert_eq!(
        members.declaration(),
        Some(&DeclarationRef::class("ApiSdk.models", "Member"))
    );
}

#[test]
fn test_enums_drop_null_and_duplicates() {
    let (root, _) = build(INHERITANCE);
    let models = root.find_namespace("ApiSdk.models").unwrap();
    assert_eq!(models.enumeration("Color").unwrap().options, vec!["red", "green"]);
    let status = models.enumeration("Animal_status").unwrap();
    assert_eq!(status.options, vec!["alive", "sleeping"]);
    let animal = class(&root, "ApiSdk.models", "Animal");
    assert_eq!(
        animal.property("color").unwrap().ty.declaration(),
        Some(&DeclarationRef::enumeration("ApiSdk.models", "Color"))
    );
}

#[test]
fn test_operations_with_only_ignored_content_types_are_skipped() {
    let (root, _) = build(
        r#"
paths:
  /login:
    post:
      requestBody:
        content:
          application/x-www-form-urlencoded:
            schema:
              type: object
              properties:
                user:
                  type: string
      responses:
        '204':
          description: ok
    put:
      requestBody:
        content:
          application/octet-stream: {}
      responses:
        '204':
          description: ok
"#,
    );
    let login = class(&root, "ApiSdk.login", "LoginRequestBuilder");
    assert!(login.method("post").is_none());
    assert!(login.method("CreatePostRequestInformation").is_none());
    let put = login.method("put").unwrap();
    let body = put.parameter_of_kind(ParameterKind::RequestBody).unwrap();
    assert_eq!(body.ty.name(), "binary");
    assert!(body.ty.is_external());
    assert_eq!(put.request_body_content_type.as_deref(), Some("application/octet-stream"));
}

#[test]
fn test_complex_segment_becomes_parameterized_method() {
    let (root, _) = build(
        r#"
paths:
  /reports/range(start={start},end={end}):
    get:
      responses:
        '204':
          description: ok
"#,
    );
    let reports = class(&root, "ApiSdk.reports", "ReportsRequestBuilder");
    let method = reports
        .methods_of_kind(MethodKind::RequestBuilderWithParameters)
        .next()
        .unwrap();
    let names: Vec<_> = method.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["start", "end"]);
    assert!(method.return_type.as_simple().unwrap().is_pending());
}

#[test]
fn test_unhandled_schema_is_attributed_to_its_node() {
    let doc = load_description(&description(
        r#"
paths:
  /broken:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: 'null'
"#,
    ))
    .unwrap();
    let config = config();
    let diagnostics = Diagnostics::new();
    let tree = UrlTreeNode::from_document(&doc);
    let err = ModelBuilder::new(&config, &doc, &diagnostics)
        .build(&tree)
        .unwrap_err();
    match err {
        AppError::Node { path, source } => {
            assert_eq!(path, "/broken");
            assert!(matches!(*source, AppError::UnhandledSchema { .. }));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_backing_store_members() {
    let doc = load_description(&description(INHERITANCE)).unwrap();
    let config = GenerationConfiguration {
        uses_backing_store: true,
        ..config()
    };
    let diagnostics = Diagnostics::new();
    let tree = UrlTreeNode::from_document(&doc);
    let root = ModelBuilder::new(&config, &doc, &diagnostics)
        .build(&tree)
        .unwrap();
    let animal = class(&root, "ApiSdk.models", "Animal");
    assert!(animal.property_of_kind(PropertyKind::BackingStore).is_some());
    assert_eq!(animal.implements[0].name, "IBackedModel");
    let dog = class(&root, "ApiSdk.models", "Dog");
    assert!(dog.property_of_kind(PropertyKind::BackingStore).is_none());
    let client = class(&root, "ApiSdk", "ApiClient");
    let constructor = client.method("constructor").unwrap();
    assert!(constructor.parameter_of_kind(ParameterKind::BackingStore).is_some());
}

#[test]
fn test_tree_is_independent_of_path_order() {
    let forward = r#"
paths:
  /a:
    get:
      responses:
        '204':
          description: ok
  /a/{id}:
    get:
      responses:
        '204':
          description: ok
  /b/c:
    get:
      responses:
        '204':
          description: ok
"#;
    let backward = r#"
paths:
  /b/c:
    get:
      responses:
        '204':
          description: ok
  /a/{id}:
    get:
      responses:
        '204':
          description: ok
  /a:
    get:
      responses:
        '204':
          description: ok
"#;
    let (first, _) = build(forward);
    let (second, _) = build(backward);
    assert_eq!(first, second);
}
