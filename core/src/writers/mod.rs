#![deny(missing_docs)]

//! # Writers
//!
//! Renders a refined tree into source files, one per top-level class or enum.
//!
//! - **csharp**, **go**, **typescript**, **php**: one [`LanguageWriter`] each.
//!
//! The output path mirrors the namespace below the client namespace. Rendering
//! is a pure function of one declaration and runs in parallel; files are
//! written afterwards, sorted by path.

pub mod csharp;
pub mod go;
pub mod php;
pub mod typescript;

use crate::codedom::{
    namespace_depth, CodeClass, CodeEnum, CodeNamespace, DeclarationKind, SimpleType,
};
use crate::config::{GenerationConfiguration, GenerationLanguage};
use crate::error::{AppError, AppResult};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Indentation-aware line buffer.
#[derive(Debug)]
pub struct CodeWriter {
    buffer: String,
    level: usize,
    unit: &'static str,
}

impl CodeWriter {
    /// Creates an empty buffer indenting with `unit`.
    pub fn new(unit: &'static str) -> Self {
        Self {
            buffer: String::new(),
            level: 0,
            unit,
        }
    }

    /// Appends one line at the current indentation. Empty text yields a bare newline.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buffer.push_str(self.unit);
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
    }

    /// Appends an empty line.
    pub fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Increases indentation.
    pub fn indent(&mut self) {
        self.level += 1;
    }

    /// Decreases indentation.
    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Writes `open`, the indented `body`, then `close`.
    pub fn block(&mut self, open: impl AsRef<str>, close: impl AsRef<str>, body: impl FnOnce(&mut Self)) {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(close);
    }

    /// The rendered text.
    pub fn finish(self) -> String {
        self.buffer
    }
}

/// A top-level declaration handed to a writer.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'t> {
    /// A class with its inner classes.
    Class(&'t CodeClass),
    /// An enum.
    Enum(&'t CodeEnum),
}

impl Declaration<'_> {
    /// Name of the declaration.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Class(c) => &c.name,
            Declaration::Enum(e) => &e.name,
        }
    }
}

/// One rendered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// File content.
    pub content: String,
}

/// Renders declarations for one target language.
pub trait LanguageWriter: Send + Sync {
    /// Language written.
    fn language(&self) -> GenerationLanguage;

    /// File extension, without the dot.
    fn extension(&self) -> &'static str;

    /// File stem for a declaration named `name`.
    fn file_name(&self, name: &str) -> String;

    /// Directory name for one namespace segment.
    fn directory_name(&self, segment: &str) -> String {
        segment.to_string()
    }

    /// Renders `class`, declared in `namespace`.
    fn write_class(&self, namespace: &str, class: &CodeClass, out: &mut CodeWriter);

    /// Renders `enumeration`, declared in `namespace`.
    fn write_enum(&self, namespace: &str, enumeration: &CodeEnum, out: &mut CodeWriter);

    /// Indentation unit.
    fn indent_unit(&self) -> &'static str {
        "    "
    }
}

/// Returns the writer for `language`.
pub fn writer_for(language: GenerationLanguage) -> Box<dyn LanguageWriter> {
    match language {
        GenerationLanguage::CSharp => Box::new(csharp::CSharpWriter),
        GenerationLanguage::Go => Box::new(go::GoWriter),
        GenerationLanguage::TypeScript => Box::new(typescript::TypeScriptWriter),
        GenerationLanguage::Php => Box::new(php::PhpWriter),
    }
}

/// Output path of a declaration, relative to the output directory.
///
/// The first `root_depth` namespace segments (the client namespace) map to the
/// output directory itself.
pub fn relative_path(writer: &dyn LanguageWriter, namespace: &str, name: &str, root_depth: usize) -> PathBuf {
    let mut path: PathBuf = namespace
        .split('.')
        .filter(|s| !s.is_empty())
        .skip(root_depth)
        .map(|segment| writer.directory_name(segment))
        .collect();
    path.push(format!("{}.{}", writer.file_name(name), writer.extension()));
    path
}

/// Renders every top-level declaration of `root`.
pub fn render(root: &CodeNamespace, config: &GenerationConfiguration) -> Vec<RenderedFile> {
    let writer = writer_for(config.language);
    let root_depth = namespace_depth(&config.client_namespace_name);
    let declarations: Vec<(&str, Declaration<'_>)> = root
        .all_namespaces()
        .into_iter()
        .flat_map(|ns| {
            ns.classes
                .iter()
                .map(|c| (ns.name.as_str(), Declaration::Class(c)))
                .chain(ns.enums.iter().map(|e| (ns.name.as_str(), Declaration::Enum(e))))
        })
        .collect();

    let mut files: Vec<RenderedFile> = declarations
        .par_iter()
        .map(|(namespace, declaration)| {
            let mut out = CodeWriter::new(writer.indent_unit());
            match declaration {
                Declaration::Class(c) => writer.write_class(namespace, c, &mut out),
                Declaration::Enum(e) => writer.write_enum(namespace, e, &mut out),
            }
            RenderedFile {
                path: relative_path(writer.as_ref(), namespace, declaration.name(), root_depth),
                content: out.finish(),
            }
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(language = %config.language, files = files.len(), "Rendered declarations");
    files
}

/// Writes `files` below `output`, creating directories as needed.
///
/// # Returns
///
/// * The absolute or `output`-relative paths written, in input order.
pub fn write_files(output: &Path, files: &[RenderedFile]) -> AppResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = output.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| AppError::OutputDirectory {
                path: parent.display().to_string(),
                message: e.to_string(),
            })?;
        }
        fs::write(&path, &file.content)?;
        tracing::trace!(path = %path.display(), "Wrote file");
        written.push(path);
    }
    Ok(written)
}

/// Non-empty, trimmed lines of an optional description.
pub(crate) fn doc_lines(description: Option<&str>) -> Vec<&str> {
    description
        .map(|d| d.lines().map(str::trim).filter(|l| !l.is_empty()).collect())
        .unwrap_or_default()
}

/// How a value travels through serialization writers and parse nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueShape {
    /// A built-in value.
    Primitive,
    /// A generated class.
    Object,
    /// A generated enum.
    Enum,
}

pub(crate) fn value_shape(ty: &SimpleType) -> ValueShape {
    match ty.declaration() {
        Some(d) if d.kind == DeclarationKind::Enum => ValueShape::Enum,
        Some(_) => ValueShape::Object,
        None => ValueShape::Primitive,
    }
}
