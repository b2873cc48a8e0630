#![deny(missing_docs)]

//! # Generation Configuration
//!
//! Values consumed by the pipeline: naming of the client, target language,
//! request content types to ignore and the serialization modules wired into the
//! root constructor. Loaded from YAML/JSON or built in code, with CLI overrides
//! applied on top.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Target language selecting the refiner sequence and writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationLanguage {
    /// C# (`.cs`).
    #[default]
    CSharp,
    /// Go (`.go`).
    Go,
    /// TypeScript (`.ts`).
    TypeScript,
    /// PHP (`.php`).
    Php,
}

impl GenerationLanguage {
    /// Every supported language, in declaration order.
    pub const ALL: [GenerationLanguage; 4] = [
        GenerationLanguage::CSharp,
        GenerationLanguage::Go,
        GenerationLanguage::TypeScript,
        GenerationLanguage::Php,
    ];
}

impl fmt::Display for GenerationLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationLanguage::CSharp => "csharp",
            GenerationLanguage::Go => "go",
            GenerationLanguage::TypeScript => "typescript",
            GenerationLanguage::Php => "php",
        };
        f.write_str(name)
    }
}

impl FromStr for GenerationLanguage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csharp" | "cs" | "c#" => Ok(GenerationLanguage::CSharp),
            "go" | "golang" => Ok(GenerationLanguage::Go),
            "typescript" | "ts" => Ok(GenerationLanguage::TypeScript),
            "php" => Ok(GenerationLanguage::Php),
            other => Err(AppError::General(format!(
                "Unsupported language '{}'. Expected one of: csharp, go, typescript, php",
                other
            ))),
        }
    }
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationConfiguration {
    /// Location of the API description.
    pub openapi_file_path: PathBuf,
    /// Root directory receiving the generated files.
    pub output_path: PathBuf,
    /// Name of the root request builder class.
    pub client_class_name: String,
    /// Root namespace of the generated code.
    pub client_namespace_name: String,
    /// Target language.
    pub language: GenerationLanguage,
    /// Base URL, filled from the description's `servers` when generating.
    pub api_root_url: Option<String>,
    /// Adds backing store members to models and to the root constructor.
    pub uses_backing_store: bool,
    /// Request content types that do not warrant an executor on their own.
    pub ignored_request_content_types: Vec<String>,
    /// Literal prefixes stripped from property names.
    pub properties_prefix_to_strip: Vec<String>,
    /// Serialization writer factories registered by the root constructor.
    pub serializers: Vec<String>,
    /// Parse node factories registered by the root constructor.
    pub deserializers: Vec<String>,
}

impl Default for GenerationConfiguration {
    fn default() -> Self {
        Self {
            openapi_file_path: PathBuf::from("openapi.yaml"),
            output_path: PathBuf::from("./output"),
            client_class_name: "ApiClient".to_string(),
            client_namespace_name: "ApiSdk".to_string(),
            language: GenerationLanguage::default(),
            api_root_url: None,
            uses_backing_store: false,
            ignored_request_content_types: vec!["application/x-www-form-urlencoded".to_string()],
            properties_prefix_to_strip: vec!["@odata.".to_string()],
            serializers: vec![
                "Microsoft.Kiota.Serialization.Json.JsonSerializationWriterFactory".to_string(),
            ],
            deserializers: vec!["Microsoft.Kiota.Serialization.Json.JsonParseNodeFactory".to_string()],
        }
    }
}

impl GenerationConfiguration {
    /// Loads a configuration file. `.json` files are read as JSON, anything else as YAML.
    /// Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::General(format!(
                "Failed to read configuration '{}': {}",
                path.display(),
                e
            ))
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .map_err(|e| AppError::General(format!("Invalid configuration JSON: {}", e)))
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::General(format!("Invalid configuration YAML: {}", e)))
        }
    }

    /// Namespace holding every model declaration.
    pub fn models_namespace_name(&self) -> String {
        format!("{}.models", self.client_namespace_name)
    }

    /// Whether every content type in `content_types` is configured as ignored.
    pub fn ignores_all_content_types<'a>(
        &self,
        mut content_types: impl Iterator<Item = &'a String>,
    ) -> bool {
        content_types.all(|ct| {
            self.ignored_request_content_types
                .iter()
                .any(|ignored| ignored.eq_ignore_ascii_case(ct))
        })
    }

    /// Removes the first matching configured prefix from a property name.
    pub fn strip_property_prefix<'a>(&self, name: &'a str) -> &'a str {
        self.properties_prefix_to_strip
            .iter()
            .filter(|prefix| !prefix.is_empty())
            .find_map(|prefix| name.strip_prefix(prefix.as_str()))
            .filter(|stripped| !stripped.is_empty())
            .unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_language_parsing_accepts_aliases() {
        assert_eq!("CS".parse::<GenerationLanguage>().unwrap(), GenerationLanguage::CSharp);
        assert_eq!("ts".parse::<GenerationLanguage>().unwrap(), GenerationLanguage::TypeScript);
        assert_eq!("golang".parse::<GenerationLanguage>().unwrap(), GenerationLanguage::Go);
        assert!("cobol".parse::<GenerationLanguage>().is_err());
    }

    #[test]
    fn test_language_display_round_trips() {
        for language in GenerationLanguage::ALL {
            assert_eq!(language.to_string().parse::<GenerationLanguage>().unwrap(), language);
        }
    }

    #[test]
    fn test_strip_property_prefix() {
        let config = GenerationConfiguration::default();
        assert_eq!(config.strip_property_prefix("@odata.type"), "type");
        assert_eq!(config.strip_property_prefix("displayName"), "displayName");
        assert_eq!(config.strip_property_prefix("@odata."), "@odata.");
    }

    #[test]
    fn test_ignores_all_content_types() {
        let config = GenerationConfiguration::default();
        let form = vec!["application/x-www-form-urlencoded".to_string()];
        let mixed = vec![
            "application/x-www-form-urlencoded".to_string(),
            "application/json".to_string(),
        ];
        assert!(config.ignores_all_content_types(form.iter()));
        assert!(!config.ignores_all_content_types(mixed.iter()));
    }

    #[test]
    fn test_from_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "clientClassName: GraphClient\nlanguage: go\nusesBackingStore: true").unwrap();

        let config = GenerationConfiguration::from_file(file.path()).unwrap();
        assert_eq!(config.client_class_name, "GraphClient");
        assert_eq!(config.language, GenerationLanguage::Go);
        assert!(config.uses_backing_store);
        assert_eq!(config.client_namespace_name, "ApiSdk");
        assert_eq!(config.models_namespace_name(), "ApiSdk.models");
    }
}
