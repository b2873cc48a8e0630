#![deny(missing_docs)]

//! # Refiner Pipeline
//!
//! A refiner is the ordered list of tree-rewrite passes one target language
//! needs before its writer can render the tree. Languages are registered
//! strategies: each one returns its pass list, and [`refine`] runs the passes
//! in order over the whole bound tree.
//!
//! Every pass is a plain function over `&mut CodeNamespace`, shared passes live
//! in [`common`] and are unit-tested on their own minimal trees.

pub mod common;
pub mod csharp;
pub mod go;
pub mod imports;
pub mod php;
pub mod reserved;
pub mod typescript;

use crate::codedom::CodeNamespace;
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::error::AppResult;
use std::time::Instant;

type PassFn = dyn Fn(&mut CodeNamespace, &GenerationConfiguration) -> AppResult<()> + Send + Sync;

/// One named rewrite of the tree.
pub struct RefinerPass {
    /// Name used in logs.
    pub name: &'static str,
    run: Box<PassFn>,
}

impl RefinerPass {
    /// Wraps a fallible pass.
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: Fn(&mut CodeNamespace, &GenerationConfiguration) -> AppResult<()> + Send + Sync + 'static,
    {
        Self {
            name,
            run: Box::new(run),
        }
    }

    /// Wraps a pass that cannot fail and ignores the configuration.
    pub fn infallible<F>(name: &'static str, run: F) -> Self
    where
        F: Fn(&mut CodeNamespace) + Send + Sync + 'static,
    {
        Self::new(name, move |root, _| {
            run(root);
            Ok(())
        })
    }

    /// Runs the pass.
    pub fn run(&self, root: &mut CodeNamespace, config: &GenerationConfiguration) -> AppResult<()> {
        (self.run)(root, config)
    }
}

impl std::fmt::Debug for RefinerPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefinerPass").field("name", &self.name).finish()
    }
}

/// Language-specific rewrite strategy.
///
/// Implementors only decide which passes run and in which order; the passes
/// themselves are free functions.
pub trait LanguageRefiner: Send + Sync {
    /// The language this strategy prepares the tree for.
    fn language(&self) -> GenerationLanguage;

    /// Ordered passes for one generation run.
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration. Passes that depend on it (backing
    ///   store, serialization modules) can capture values here or read it when run.
    fn passes(&self, config: &GenerationConfiguration) -> Vec<RefinerPass>;
}

/// The registered strategy for `language`.
pub fn refiner_for(language: GenerationLanguage) -> Box<dyn LanguageRefiner> {
    match language {
        GenerationLanguage::CSharp => Box::new(csharp::CSharpRefiner),
        GenerationLanguage::Go => Box::new(go::GoRefiner),
        GenerationLanguage::TypeScript => Box::new(typescript::TypeScriptRefiner),
        GenerationLanguage::Php => Box::new(php::PhpRefiner),
    }
}

/// Runs the refiner of `config.language` over `root`.
///
/// # Arguments
///
/// * `root` - The bound tree; rewritten in place.
/// * `config` - Selects the language and feeds configuration-dependent passes.
pub fn refine(root: &mut CodeNamespace, config: &GenerationConfiguration) -> AppResult<()> {
    let refiner = refiner_for(config.language);
    let passes = refiner.passes(config);
    tracing::debug!(language = %refiner.language(), passes = passes.len(), "Refining code model");
    for pass in &passes {
        let started = Instant::now();
        pass.run(root, config)?;
        tracing::trace!(pass = pass.name, elapsed = ?started.elapsed(), "Refiner pass done");
    }
    Ok(())
}
