//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};
use std::fmt;

/// A type reference that is still unbound after every fallback search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnboundReference {
    /// Name carried by the type reference.
    pub type_name: String,
    /// Qualified name of the element owning the reference.
    pub owner: String,
}

impl fmt::Display for UnboundReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' referenced from {}", self.type_name, self.owner)
    }
}

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The description could not be parsed into an OpenAPI graph.
    #[from(ignore)]
    #[display("Invalid API description: {_0}")]
    InvalidDescription(String),

    /// No `servers` entry carries a usable base URL.
    #[from(ignore)]
    #[display("A servers entry (v3) or host + basePath + schemes properties (v2) must be present in the API description")]
    MissingBaseUrl,

    /// A `$ref` points at nothing, or at itself.
    #[from(ignore)]
    #[display("Unresolved schema reference: {_0}")]
    UnresolvedReference(String),

    /// A schema reached the last resolver case without a recognizable shape.
    #[from(ignore)]
    #[display("Unhandled schema shape at {location}")]
    UnhandledSchema {
        /// Where the schema was met (node path plus usage).
        location: String,
    },

    /// A failure attributed to the URI tree node being built.
    #[from(ignore)]
    #[display("Failed to build request builder for '{path}': {source}")]
    Node {
        /// Path of the originating node.
        path: String,
        /// Underlying failure.
        source: Box<AppError>,
    },

    /// The output directory could not be created or written.
    #[from(ignore)]
    #[display("Output directory '{path}' is not usable: {message}")]
    OutputDirectory {
        /// Directory path.
        path: String,
        /// Underlying message.
        message: String,
    },

    /// Type references left unbound after the binding pass.
    #[from(ignore)]
    #[display("{} type reference(s) could not be bound: {}", _0.len(), join_unbound(_0))]
    UnboundTypes(Vec<UnboundReference>),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

fn join_unbound(references: &[UnboundReference]) -> String {
    references
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// Wraps `self` with the path of the URI node that produced it.
    ///
    /// Errors already attributed to a node keep their innermost path.
    pub fn at_node(self, path: &str) -> Self {
        match self {
            AppError::Node { .. } => self,
            other => AppError::Node {
                path: path.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io(e) => Some(e),
            AppError::Node { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
