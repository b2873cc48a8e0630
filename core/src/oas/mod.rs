#![deny(missing_docs)]

//! # OpenAPI Input Graph
//!
//! - **document**: loading a description and reading document-level facts.
//! - **normalization**: 3.0 to 3.1 rewrites applied before parsing.
//! - **refs**: `$ref` resolution against `components.schemas`.
//! - **tree**: the URI tree built from `paths`.

pub mod document;
mod normalization;
pub mod refs;
pub mod tree;

pub use document::{api_root_url, load_description, load_description_file, HttpMethod};
pub use refs::{resolve_schema, ResolvedSchema};
pub use tree::UrlTreeNode;
