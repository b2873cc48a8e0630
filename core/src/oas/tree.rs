#![deny(missing_docs)]

//! # URI Tree
//!
//! Folds the flat `paths` map into a tree keyed by path segment. Nodes borrow
//! their path item from the document; no code elements are created here.
//! Children are kept in a `BTreeMap`, so the tree does not depend on the order
//! paths were declared in.

use crate::oas::document::{operations, HttpMethod};
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use indexmap::IndexSet;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use utoipa::openapi::path::{Operation, Parameter, ParameterIn, PathItem};
use utoipa::openapi::OpenApi;

/// Namespace segment used for nodes that represent a templated segment.
pub const ITEM_NAMESPACE: &str = "item";

fn single_parameter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\{[^{}]+\}$").expect("Invalid regex"))
}

fn parameter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^{}]+)\}").expect("Invalid regex"))
}

/// One path segment of the API surface.
pub struct UrlTreeNode<'a> {
    /// Raw segment text (`users`, `{id}`, `items({id})`); empty for the root.
    pub segment: String,
    /// Segment of the parent node; empty for the root and its direct children.
    pub parent_segment: String,
    /// Cumulative path, always starting with `/`.
    pub path: String,
    /// Path item declared for exactly this path, if any.
    pub path_item: Option<&'a PathItem>,
    /// Child segments.
    pub children: BTreeMap<String, UrlTreeNode<'a>>,
}

impl<'a> UrlTreeNode<'a> {
    fn new(segment: &str, parent_segment: &str, path: String) -> Self {
        Self {
            segment: segment.to_string(),
            parent_segment: parent_segment.to_string(),
            path,
            path_item: None,
            children: BTreeMap::new(),
        }
    }

    /// Builds the tree for every path of `document`.
    pub fn from_document(document: &'a OpenApi) -> Self {
        Self::from_paths(
            document
                .paths
                .paths
                .iter()
                .map(|(path, item)| (path.as_str(), item)),
        )
    }

    /// Builds the tree from `(path, item)` pairs.
    pub fn from_paths(paths: impl IntoIterator<Item = (&'a str, &'a PathItem)>) -> Self {
        let mut root = UrlTreeNode::new("", "", "/".to_string());
        for (path, item) in paths {
            let mut current = &mut root;
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                let child_path = if current.path == "/" {
                    format!("/{}", segment)
                } else {
                    format!("{}/{}", current.path, segment)
                };
                let parent_segment = current.segment.clone();
                current = current
                    .children
                    .entry(segment.to_string())
                    .or_insert_with(|| UrlTreeNode::new(segment, &parent_segment, child_path));
            }
            current.path_item = Some(item);
        }
        root
    }

    /// Whether this is the tree root.
    pub fn is_root(&self) -> bool {
        self.segment.is_empty()
    }

    /// `{id}`: a segment made of exactly one template parameter.
    pub fn is_path_segment_with_single_simple_parameter(&self) -> bool {
        single_parameter_regex().is_match(&self.segment)
    }

    /// `items({id})`, `{a}-{b}`: templated, but not a single simple parameter.
    pub fn is_complex_path_with_any_number_of_parameters(&self) -> bool {
        self.segment.contains('{') && !self.is_path_segment_with_single_simple_parameter()
    }

    /// Whether the node's builder lives in the `item` sub-namespace.
    pub fn does_node_belong_to_item_subnamespace(&self) -> bool {
        self.is_path_segment_with_single_simple_parameter()
    }

    /// Template parameter names appearing in the segment.
    pub fn segment_parameter_names(&self) -> Vec<String> {
        parameter_regex()
            .captures_iter(&self.segment)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Total number of nodes, root included.
    pub fn count(&self) -> usize {
        1 + self.children.values().map(UrlTreeNode::count).sum::<usize>()
    }

    /// Declaration name stem for the node, without suffix.
    ///
    /// The root uses `client_class_name`. A templated `{user-id}` becomes
    /// `UserItem`; when only `id` remains the parent segment is used instead
    /// (`UsersItem`). A complex segment `items({id})` becomes `ItemsWithId`.
    pub fn identifier(&self, client_class_name: &str) -> String {
        if self.is_root() {
            return client_class_name.to_string();
        }
        if self.is_path_segment_with_single_simple_parameter() {
            let raw = self.segment.trim_matches(|c| c == '{' || c == '}');
            let stem = strip_id_suffix(raw);
            let base = if stem.is_empty() || stem.eq_ignore_ascii_case("id") {
                sanitize(&self.parent_segment).to_upper_camel_case()
            } else {
                stem.to_upper_camel_case()
            };
            return format!("{}Item", base);
        }
        if self.is_complex_path_with_any_number_of_parameters() {
            let base = parameter_regex().replace_all(&self.segment, "");
            let params = self
                .segment_parameter_names()
                .iter()
                .map(|p| p.to_upper_camel_case())
                .collect::<Vec<_>>()
                .join("And");
            return format!("{}With{}", sanitize(&base).to_upper_camel_case(), params);
        }
        sanitize(&self.segment).to_upper_camel_case()
    }

    /// Class name for the node's request builder (or models derived from it).
    pub fn class_name(&self, client_class_name: &str, suffix: &str) -> String {
        format!("{}{}", self.identifier(client_class_name), suffix)
    }

    /// Member name used on the parent builder to navigate to this node.
    pub fn navigation_name(&self) -> String {
        sanitize(&self.segment).to_lower_camel_case()
    }

    /// Namespace of the node's builder, computed from the cumulative path.
    pub fn namespace_name(&self, root_namespace: &str) -> String {
        let mut name = root_namespace.to_string();
        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            name.push('.');
            if single_parameter_regex().is_match(segment) {
                name.push_str(ITEM_NAMESPACE);
            } else if segment.contains('{') {
                let base = parameter_regex().replace_all(segment, "");
                let params: String = parameter_regex()
                    .captures_iter(segment)
                    .filter_map(|c| c.get(1))
                    .map(|m| m.as_str().to_upper_camel_case())
                    .collect::<Vec<_>>()
                    .join("And");
                name.push_str(&format!("{}With{}", sanitize(&base), params).to_lower_camel_case());
            } else {
                name.push_str(&sanitize(segment).to_lower_camel_case());
            }
        }
        name
    }

    /// Operations of this node, in emission order.
    pub fn operations(&self) -> Vec<(HttpMethod, &'a Operation)> {
        self.path_item.map(operations).unwrap_or_default()
    }

    /// Path parameters declared for this segment's template names, from the path
    /// item and its operations, first declaration winning.
    pub fn path_parameters(&self) -> Vec<&'a Parameter> {
        let names = self.segment_parameter_names();
        if names.is_empty() {
            return Vec::new();
        }
        let Some(item) = self.path_item else {
            return Vec::new();
        };
        let item_params = item.parameters.iter().flatten();
        let op_params = operations(item)
            .into_iter()
            .flat_map(|(_, op)| op.parameters.iter().flatten());
        let mut seen = IndexSet::new();
        item_params
            .chain(op_params)
            .filter(|p| p.parameter_in == ParameterIn::Path && names.contains(&p.name))
            .filter(|p| seen.insert(p.name.clone()))
            .collect()
    }

    /// RFC 6570 template for this node: `{+baseurl}/users/{id}{?top,skip}`.
    pub fn url_template(&self) -> String {
        let mut template = String::from("{+baseurl}");
        if !self.is_root() {
            template.push_str(&self.path);
        }
        let mut query = IndexSet::new();
        if let Some(item) = self.path_item {
            let item_params = item.parameters.iter().flatten();
            let op_params = operations(item)
                .into_iter()
                .flat_map(|(_, op)| op.parameters.iter().flatten());
            for p in item_params.chain(op_params) {
                if p.parameter_in == ParameterIn::Query && !p.name.is_empty() {
                    query.insert(p.name.replace('$', "%24"));
                }
            }
        }
        if !query.is_empty() {
            template.push_str("{?");
            template.push_str(&query.into_iter().collect::<Vec<_>>().join(","));
            template.push('}');
        }
        template
    }
}

fn strip_id_suffix(raw: &str) -> &str {
    for suffix in ["-id", "_id", "Id"] {
        if let Some(stem) = raw.strip_suffix(suffix) {
            return stem;
        }
    }
    raw
}

/// Replaces every character that cannot appear in an identifier by a word break.
pub fn sanitize(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}
