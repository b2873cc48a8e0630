#![deny(missing_docs)]

//! # Generation Pipeline
//!
//! Runs every stage for one configuration: load, tree, build, bind, refine,
//! render, write. Any fatal error aborts the run; recovered conditions end up
//! in [`GenerationReport::warnings`].

use crate::binding::bind_types;
use crate::builder::ModelBuilder;
use crate::codedom::CodeNamespace;
use crate::config::GenerationConfiguration;
use crate::diagnostics::{Diagnostics, GenerationWarning};
use crate::error::{AppError, AppResult};
use crate::oas::{api_root_url, load_description_file, UrlTreeNode};
use crate::refiners::refine;
use crate::writers::{render, write_files};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use utoipa::openapi::OpenApi;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Conditions recovered from while building and binding.
    pub warnings: Vec<GenerationWarning>,
    /// Files written, below the output directory.
    pub files: Vec<PathBuf>,
}

/// Builds, binds and refines the code model of `document` without touching disk.
///
/// # Arguments
///
/// * `config` - The run settings. `api_root_url` is taken from the document.
/// * `document` - The parsed description.
/// * `diagnostics` - Receives the recovered conditions.
///
/// # Returns
///
/// * The refined tree, ready for a writer.
pub fn build_code_model(
    config: &GenerationConfiguration,
    document: &OpenApi,
    diagnostics: &Diagnostics,
) -> AppResult<CodeNamespace> {
    let mut config = config.clone();
    let started = Instant::now();
    config.api_root_url = Some(api_root_url(document)?);
    tracing::debug!(url = ?config.api_root_url, elapsed = ?started.elapsed(), "Root URL set");

    let started = Instant::now();
    let tree = UrlTreeNode::from_document(document);
    tracing::debug!(nodes = tree.count(), elapsed = ?started.elapsed(), "URI tree built");

    let started = Instant::now();
    let mut root = ModelBuilder::new(&config, document, diagnostics).build(&tree)?;
    tracing::debug!(elapsed = ?started.elapsed(), "Source model built");

    let started = Instant::now();
    let unbound = bind_types(&mut root, diagnostics);
    if !unbound.is_empty() {
        return Err(AppError::UnboundTypes(unbound));
    }
    tracing::debug!(elapsed = ?started.elapsed(), "Types bound");

    let started = Instant::now();
    refine(&mut root, &config)?;
    tracing::debug!(language = %config.language, elapsed = ?started.elapsed(), "Code model refined");
    Ok(root)
}

/// Generates a client for `config.openapi_file_path` into `config.output_path`.
pub fn generate_client(config: &GenerationConfiguration) -> AppResult<GenerationReport> {
    let started = Instant::now();
    fs::create_dir_all(&config.output_path).map_err(|e| AppError::OutputDirectory {
        path: config.output_path.display().to_string(),
        message: e.to_string(),
    })?;
    tracing::debug!(path = %config.output_path.display(), elapsed = ?started.elapsed(), "Output directory ready");

    let started = Instant::now();
    let document = load_description_file(&config.openapi_file_path)?;
    tracing::debug!(
        path = %config.openapi_file_path.display(),
        elapsed = ?started.elapsed(),
        "Description loaded"
    );

    let diagnostics = Diagnostics::new();
    let root = build_code_model(config, &document, &diagnostics)?;

    let started = Instant::now();
    let rendered = render(&root, config);
    tracing::debug!(files = rendered.len(), elapsed = ?started.elapsed(), "Code rendered");

    let started = Instant::now();
    let files = write_files(&config.output_path, &rendered)?;
    tracing::debug!(files = files.len(), elapsed = ?started.elapsed(), "Files written");

    let warnings = diagnostics.into_warnings();
    tracing::info!(
        language = %config.language,
        files = files.len(),
        warnings = warnings.len(),
        "Client generated"
    );
    Ok(GenerationReport { warnings, files })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codedom::DeclarationRef;
    use crate::config::GenerationLanguage;
    use crate::diagnostics::WarningKind;
    use crate::oas::load_description;

    const PETS: &str = r#"
openapi: 3.0.1
info:
  title: Pets
  version: v1
servers:
  - url: https://pets.example.com/
paths:
  /pets:
    get:
      responses:
        '200':
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Pet'
  /pets/{petId}:
    delete:
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: string
      responses:
        '204':
          description: gone
components:
  schemas:
    Pet:
      type: object
      properties:
        name:
          type: string
"#;

    #[test]
    fn test_build_code_model_binds_and_refines() {
        let document = load_description(PETS).unwrap();
        let diagnostics = Diagnostics::new();
        let root = build_code_model(&GenerationConfiguration::default(), &document, &diagnostics).unwrap();
        assert!(root
            .find_class(&DeclarationRef::class("ApiSdk.Models", "Pet"))
            .is_some());
        assert!(root
            .find_class(&DeclarationRef::class("ApiSdk.Pets", "PetsRequestBuilder"))
            .is_some());
        assert!(!diagnostics.contains(WarningKind::MissingResponseSchema));
    }

    #[test]
    fn test_missing_servers_aborts_before_building() {
        let document = load_description("openapi: 3.0.1\ninfo:\n  title: t\n  version: v\npaths: {}\n").unwrap();
        let result = build_code_model(&GenerationConfiguration::default(), &document, &Diagnostics::new());
        assert!(matches!(result, Err(AppError::MissingBaseUrl)));
    }

    #[test]
    fn test_generate_client_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let description = dir.path().join("pets.yaml");
        fs::write(&description, PETS).unwrap();
        let config = GenerationConfiguration {
            openapi_file_path: description,
            output_path: dir.path().join("out"),
            language: GenerationLanguage::Go,
            ..GenerationConfiguration::default()
        };
        let report = generate_client(&config).unwrap();
        assert!(report.warnings.is_empty());
        assert!(report.files.contains(&dir.path().join("out/api_client.go")));
        assert!(report.files.contains(&dir.path().join("out/models/pet.go")));
    }

    #[test]
    fn test_unreadable_description_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfiguration {
            openapi_file_path: dir.path().join("missing.yaml"),
            output_path: dir.path().join("out"),
            ..GenerationConfiguration::default()
        };
        assert!(generate_client(&config).is_err());
    }
}
