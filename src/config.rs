use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::error::GerritLabelError;
use crate::labels::{LabelMap, LabelRules};
use crate::providers::gerrit::client::DEFAULT_MAX_CONCURRENT_REQUESTS;

/// File names tried, in order, when no configuration path is given.
pub const CONFIG_CANDIDATES: [&str; 4] = [
    "gerrit-label.json",
    "gerrit-label.toml",
    "gerrit-label.yaml",
    "gerrit-label.yml",
];

/// Configuration for a labeling run.
///
/// Keys are camelCase (`queryString`, `labelMap`) so existing Gerrit tooling
/// configs load unchanged; kebab-case spellings are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Gerrit changes endpoint (e.g., 'https://review.example.org/changes')
    pub endpoint: String,

    /// Gerrit search expression sent as `q`
    #[serde(default, alias = "query-string", skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,

    /// Upper bound on concurrent file requests
    #[serde(
        default = "default_max_concurrent_requests",
        alias = "max-concurrent-requests"
    )]
    pub max_concurrent_requests: usize,

    /// Project -> label -> regex fragments
    #[serde(default, alias = "label-map")]
    pub label_map: LabelMap,
}

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

impl Config {
    pub fn new(endpoint: impl Into<String>, label_map: LabelMap) -> Self {
        Self {
            endpoint: endpoint.into(),
            query_string: None,
            max_concurrent_requests: default_max_concurrent_requests(),
            label_map,
        }
    }

    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. `CONFIG_CANDIDATES` in the current directory
    ///
    /// Only parsing happens here; call [`Config::validate`] once command-line
    /// overrides have been applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::discover(&std::env::current_dir()?),
        }
    }

    /// Load the first candidate configuration file found in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        for candidate in &CONFIG_CANDIDATES {
            let path = dir.join(candidate);
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        bail!(
            "No configuration file found in {} (tried {})",
            dir.display(),
            CONFIG_CANDIDATES.join(", ")
        )
    }

    /// Load configuration from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let config: Self = match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            _ => {
                // Try TOML first, then JSON, then YAML
                toml::from_str(&contents)
                    .or_else(|_| serde_json::from_str(&contents))
                    .or_else(|_| serde_yaml::from_str(&contents))
                    .with_context(|| format!("Failed to parse config file: {}", path.display()))?
            }
        };

        Ok(config)
    }

    /// Replace endpoint and query with command-line values where given.
    #[must_use]
    pub fn with_overrides(mut self, endpoint: Option<String>, query: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        if query.is_some() {
            self.query_string = query;
        }
        self
    }

    /// Check the endpoint and compile every label pattern.
    pub fn validate(&self) -> crate::error::Result<LabelRules> {
        Url::parse(&self.endpoint)
            .map_err(|e| GerritLabelError::Config(format!("Invalid endpoint URL: {e}")))?;

        if self.max_concurrent_requests == 0 {
            return Err(GerritLabelError::Config(
                "maxConcurrentRequests must be at least 1".to_string(),
            ));
        }

        LabelRules::compile(&self.label_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "endpoint": "https://review.example.org/changes",
  "queryString": "status:open",
  "labelMap": {
    "proj-a": {
      "domain1": ["\\.py$"],
      "domain2": ["^docs/", "\\.md$"]
    }
  }
}"#;
        write!(temp_file, "{json_content}").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.endpoint, "https://review.example.org/changes");
        assert_eq!(config.query_string.as_deref(), Some("status:open"));
        assert_eq!(config.max_concurrent_requests, DEFAULT_MAX_CONCURRENT_REQUESTS);

        let labels: Vec<_> = config.label_map["proj-a"].keys().collect();
        assert_eq!(labels, vec!["domain1", "domain2"]);
        assert_eq!(config.label_map["proj-a"]["domain2"], vec!["^docs/", "\\.md$"]);
    }

    #[test]
    fn test_load_toml_config_with_kebab_case_keys() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
endpoint = "https://review.example.org/changes"
query-string = "status:merged"
max-concurrent-requests = 4

[label-map.proj-a]
py = ['\.py$']
"#;
        write!(temp_file, "{toml_content}").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.query_string.as_deref(), Some("status:merged"));
        assert_eq!(config.max_concurrent_requests, 4);
        assert_eq!(config.label_map["proj-a"]["py"], vec!["\\.py$"]);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        let yaml_content = r#"
endpoint: https://review.example.org/changes
labelMap:
  proj-a:
    test: ['_test\.']
"#;
        write!(temp_file, "{yaml_content}").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert!(config.query_string.is_none());
        assert_eq!(config.label_map["proj-a"]["test"], vec!["_test\\."]);
    }

    #[test]
    fn test_unknown_extension_falls_back_to_json() {
        let mut temp_file = NamedTempFile::with_suffix(".conf").unwrap();
        write!(
            temp_file,
            r#"{{"endpoint": "https://review.example.org/changes", "labelMap": {{}}}}"#
        )
        .unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert!(config.label_map.is_empty());
    }

    #[test]
    fn test_invalid_pattern_fails_validation_after_load() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        write!(
            temp_file,
            r#"{{"endpoint": "https://review.example.org/changes", "labelMap": {{"proj-a": {{"bad": ["[a-"]}}}}}}"#
        )
        .unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        let err = config.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bad"));
        assert!(message.contains("proj-a"));
    }

    #[test]
    fn test_endpoint_override_replaces_invalid_file_endpoint() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        write!(
            temp_file,
            r#"{{"endpoint": "not a url", "labelMap": {{"proj-a": {{"py": ["\.py$"]}}}}}}"#
        )
        .unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert!(config.validate().is_err());

        let config =
            config.with_overrides(Some("https://review.example.org/changes".to_string()), None);
        let rules = config.validate().unwrap();
        assert_eq!(rules.projects().collect::<Vec<_>>(), vec!["proj-a"]);
    }

    #[test]
    fn test_invalid_endpoint_fails_validation() {
        let config = Config::new("review.example.org", LabelMap::new());
        assert!(matches!(config.validate(), Err(GerritLabelError::Config(_))));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        assert!(Config::load(Some(Path::new("nonexistent-gerrit-label.json"))).is_err());
    }

    #[test]
    fn test_discover_picks_first_candidate() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(
            temp_dir.path().join("gerrit-label.yaml"),
            "endpoint: https://yaml.example.org/changes\n",
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("gerrit-label.json"),
            r#"{"endpoint": "https://json.example.org/changes"}"#,
        )
        .unwrap();

        let config = Config::discover(temp_dir.path()).unwrap();
        assert_eq!(config.endpoint, "https://json.example.org/changes");
    }

    #[test]
    fn test_discover_without_files_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = Config::discover(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("No configuration file found"));
    }

    #[test]
    fn test_with_overrides() {
        let config = Config::new("https://a.example.org/changes", LabelMap::new())
            .with_overrides(None, Some("is:open".to_string()));
        assert_eq!(config.endpoint, "https://a.example.org/changes");
        assert_eq!(config.query_string.as_deref(), Some("is:open"));

        let config = config.with_overrides(Some("https://b.example.org/changes".to_string()), None);
        assert_eq!(config.endpoint, "https://b.example.org/changes");
        assert_eq!(config.query_string.as_deref(), Some("is:open"));
    }
}
