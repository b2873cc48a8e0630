#![deny(missing_docs)]

//! # Generate Command
//!
//! Builds a `GenerationConfiguration` from an optional config file plus flags,
//! then runs the generation pipeline.
//!
//! Flag values win over the file; the file wins over the defaults.

use clientgen_core::{generate_client, AppResult, GenerationConfiguration, GenerationLanguage};
use std::path::PathBuf;

/// Arguments for the generate command.
#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Path to the OpenAPI description (YAML or JSON).
    #[clap(long, short = 'd', env = "CLIENTGEN_OPENAPI")]
    pub openapi: Option<PathBuf>,

    /// Output directory for the generated sources.
    #[clap(long, short = 'o', env = "CLIENTGEN_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Name of the root client class.
    #[clap(long, short = 'c', env = "CLIENTGEN_CLASS_NAME")]
    pub class_name: Option<String>,

    /// Root namespace of the generated code.
    #[clap(long, short = 'n', env = "CLIENTGEN_NAMESPACE")]
    pub namespace: Option<String>,

    /// Target language: csharp, go, typescript or php.
    #[clap(long, short = 'l', env = "CLIENTGEN_LANGUAGE")]
    pub language: Option<String>,

    /// Adds backing store support to models and the client.
    #[clap(long, short = 'b', env = "CLIENTGEN_BACKING_STORE")]
    pub backing_store: bool,

    /// YAML or JSON configuration file providing defaults for every flag.
    #[clap(long, env = "CLIENTGEN_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Merges the configuration file and the flags.
pub fn resolve_configuration(args: &GenerateArgs) -> AppResult<GenerationConfiguration> {
    let mut config = match &args.config {
        Some(path) => GenerationConfiguration::from_file(path)?,
        None => GenerationConfiguration::default(),
    };
    if let Some(openapi) = &args.openapi {
        config.openapi_file_path = openapi.clone();
    }
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(class_name) = &args.class_name {
        config.client_class_name = class_name.clone();
    }
    if let Some(namespace) = &args.namespace {
        config.client_namespace_name = namespace.clone();
    }
    if let Some(language) = &args.language {
        config.language = language.parse::<GenerationLanguage>()?;
    }
    if args.backing_store {
        config.uses_backing_store = true;
    }
    Ok(config)
}

/// Executes the generate command.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &GenerateArgs) -> AppResult<()> {
    let config = resolve_configuration(args)?;
    tracing::info!(
        description = %config.openapi_file_path.display(),
        output = %config.output_path.display(),
        language = %config.language,
        "Generating client"
    );
    let report = generate_client(&config)?;
    for warning in &report.warnings {
        eprintln!("warning: {}", warning);
    }
    println!(
        "Generated {} files into {}",
        report.files.len(),
        config.output_path.display()
    );
    Ok(())
}
