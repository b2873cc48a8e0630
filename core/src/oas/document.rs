#![deny(missing_docs)]

//! # Description Loading
//!
//! Turns YAML or JSON text into a `utoipa` OpenAPI graph and exposes the few
//! document-level facts the pipeline needs (base URL, operations per path item).

use super::normalization::normalize_description;
use crate::error::{AppError, AppResult};
use std::fmt;
use std::path::Path;
use utoipa::openapi::path::{Operation, PathItem};
use utoipa::openapi::OpenApi;

/// HTTP methods in the order operations are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// Lowercase name, used for executor method names.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Patch => "patch",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Trace => "trace",
        }
    }

    /// Capitalized name (`Get`), used for generator and parameter class names.
    pub fn pascal_name(&self) -> &'static str {
        match self {
            HttpMethod::Get => "Get",
            HttpMethod::Post => "Post",
            HttpMethod::Patch => "Patch",
            HttpMethod::Put => "Put",
            HttpMethod::Delete => "Delete",
            HttpMethod::Head => "Head",
            HttpMethod::Options => "Options",
            HttpMethod::Trace => "Trace",
        }
    }

    /// Uppercase wire name.
    pub fn wire_name(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Parses a YAML (or JSON, which is a YAML subset) description.
///
/// `utoipa` only deserializes 3.1 documents, so any 3.x version string is
/// normalized to `3.1.0` first and 3.0 constructs are rewritten to their 3.1
/// form. A missing `paths` object is treated as empty.
pub fn load_description(content: &str) -> AppResult<OpenApi> {
    let mut json_val: serde_json::Value = serde_yaml::from_str(content)
        .map_err(|e| AppError::InvalidDescription(format!("Failed to parse YAML container: {}", e)))?;

    let Some(root) = json_val.as_object_mut() else {
        return Err(AppError::InvalidDescription(
            "The description root must be a mapping".into(),
        ));
    };

    if let Some(ver) = root.get_mut("openapi") {
        if ver.as_str().is_some_and(|v| v.starts_with("3.")) {
            *ver = serde_json::json!("3.1.0");
        }
    }
    root.entry("paths").or_insert_with(|| serde_json::json!({}));
    normalize_description(&mut json_val);

    serde_json::from_value(json_val)
        .map_err(|e| AppError::InvalidDescription(format!("Failed to parse OpenAPI AST: {}", e)))
}

/// Reads and parses a description file.
pub fn load_description_file(path: &Path) -> AppResult<OpenApi> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read API description '{}': {}", path.display(), e),
        ))
    })?;
    load_description(&content)
}

/// First server URL with trailing slashes removed.
pub fn api_root_url(document: &OpenApi) -> AppResult<String> {
    document
        .servers
        .as_ref()
        .and_then(|servers| servers.first())
        .map(|server| server.url.trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .ok_or(AppError::MissingBaseUrl)
}

/// Operations declared on a path item, in emission order.
pub fn operations(item: &PathItem) -> Vec<(HttpMethod, &Operation)> {
    [
        (HttpMethod::Get, item.get.as_ref()),
        (HttpMethod::Post, item.post.as_ref()),
        (HttpMethod::Patch, item.patch.as_ref()),
        (HttpMethod::Put, item.put.as_ref()),
        (HttpMethod::Delete, item.delete.as_ref()),
        (HttpMethod::Head, item.head.as_ref()),
        (HttpMethod::Options, item.options.as_ref()),
        (HttpMethod::Trace, item.trace.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, op)| op.map(|op| (method, op)))
    .collect()
}
