#![deny(missing_docs)]

//! # Model Builder
//!
//! Walks the URI tree top-down and produces the source code model.
//!
//! - **request_builders**: one request builder class per URI node.
//! - **schemas**: the schema resolver (models, enums, unions, collections).
//! - **primitives**: the primitive `type`/`format` table.
//! - **registry**: the concurrent namespace map shared by sibling tasks.
//!
//! Sibling subtrees are built in parallel. Every declaration goes through the
//! registry with insert-if-absent semantics, so the tree does not depend on
//! scheduling. Request builder navigation types are left pending for the
//! binding pass.

mod primitives;
mod registry;
mod request_builders;
mod schemas;

use crate::codedom::CodeNamespace;
use crate::config::GenerationConfiguration;
use crate::diagnostics::Diagnostics;
use crate::error::AppResult;
use crate::oas::UrlTreeNode;
use registry::NamespaceRegistry;
use utoipa::openapi::OpenApi;

/// Builds the code model for one description.
pub struct ModelBuilder<'a> {
    config: &'a GenerationConfiguration,
    document: &'a OpenApi,
    registry: NamespaceRegistry,
    diagnostics: &'a Diagnostics,
}

impl<'a> ModelBuilder<'a> {
    /// Creates a builder over `document`, recording warnings into `diagnostics`.
    pub fn new(
        config: &'a GenerationConfiguration,
        document: &'a OpenApi,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            config,
            document,
            registry: NamespaceRegistry::new(),
            diagnostics,
        }
    }

    /// Builds every request builder and model reachable from `tree`.
    ///
    /// # Arguments
    ///
    /// * `tree` - The root of the URI tree built from the same document.
    ///
    /// # Returns
    ///
    /// * The unbound code tree. Navigation types are still pending.
    pub fn build(self, tree: &UrlTreeNode<'a>) -> AppResult<CodeNamespace> {
        self.registry
            .ensure_namespace(&self.config.client_namespace_name);
        self.build_node(tree)?;
        let root = self.registry.into_tree();
        tracing::debug!(
            namespaces = root.all_namespaces().len(),
            "Source model built"
        );
        Ok(root)
    }
}

#[cfg(test)]
mod tests;
