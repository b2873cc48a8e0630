#![deny(missing_docs)]

//! # Clientgen Core
//!
//! Turns an OpenAPI description into a client SDK: a URI tree of request
//! builders, a schema-derived model, a deferred binding pass, per-language
//! refiners and writers.

/// Shared error types.
pub mod error;

/// Generation settings.
pub mod config;

/// Recovered conditions collected during a run.
pub mod diagnostics;

/// OpenAPI (OAS) loading, references and the URI tree.
pub mod oas;

/// The language-neutral code element tree.
pub mod codedom;

/// Model Builder and Schema Resolver.
pub mod builder;

/// Deferred type binding.
pub mod binding;

/// Per-language tree rewrite pipelines.
pub mod refiners;

/// Per-language source emitters.
pub mod writers;

/// The end-to-end pipeline.
pub mod generator;

pub use binding::bind_types;
pub use builder::ModelBuilder;
pub use codedom::CodeNamespace;
pub use config::{GenerationConfiguration, GenerationLanguage};
pub use diagnostics::{Diagnostics, GenerationWarning, WarningKind};
pub use error::{AppError, AppResult, UnboundReference};
pub use generator::{build_code_model, generate_client, GenerationReport};
pub use oas::{load_description, load_description_file, UrlTreeNode};
pub use refiners::refine;
pub use writers::{render, write_files, RenderedFile};
