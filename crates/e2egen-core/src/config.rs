use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level project configuration loaded from `.e2egen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct E2eConfig {
    /// Root directory every output path is relative to.
    pub output: String,
    pub suite_version: SuiteVersion,
    pub async_mode: bool,
    /// Directory of an older layout that is removed on every run.
    pub legacy_clients_dir: Option<String>,
    pub paths: OutputPaths,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            output: ".".to_string(),
            suite_version: SuiteVersion::V2,
            async_mode: false,
            legacy_clients_dir: Some("clients".to_string()),
            paths: OutputPaths::default(),
        }
    }
}

/// Which fixture/test generation strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteVersion {
    /// One pytest fixture per API client.
    V1,
    /// One service object exposing every API client as an attribute.
    #[default]
    V2,
}

impl fmt::Display for SuiteVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteVersion::V1 => f.write_str("v1"),
            SuiteVersion::V2 => f.write_str("v2"),
        }
    }
}

/// Output locations, relative to the output root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub internal_clients: PathBuf,
    pub clients: PathBuf,
    pub fixtures: PathBuf,
    pub tests: PathBuf,
    pub settings: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            internal_clients: PathBuf::from("internal/clients/http"),
            clients: PathBuf::from("framework/clients/http"),
            fixtures: PathBuf::from("framework/fixtures/http"),
            tests: PathBuf::from("tests"),
            settings: PathBuf::from("framework/settings"),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".e2egen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<E2eConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: E2eConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# e2egen configuration
output: .
suite_version: v2       # v1 (fixture per API client) | v2 (service object)
async_mode: false       # generate async httpx clients and tests
legacy_clients_dir: clients   # removed on every run; null to disable

paths:
  internal_clients: internal/clients/http
  clients: framework/clients/http
  fixtures: framework/fixtures/http
  tests: tests
  settings: framework/settings
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = E2eConfig::default();
        assert_eq!(config.output, ".");
        assert_eq!(config.suite_version, SuiteVersion::V2);
        assert!(!config.async_mode);
        assert_eq!(config.legacy_clients_dir.as_deref(), Some("clients"));
        assert_eq!(config.paths.tests, PathBuf::from("tests"));
    }

    #[test]
    fn test_default_content_matches_defaults() {
        let config: E2eConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        let defaults = E2eConfig::default();
        assert_eq!(config.output, defaults.output);
        assert_eq!(config.suite_version, defaults.suite_version);
        assert_eq!(config.legacy_clients_dir, defaults.legacy_clients_dir);
        assert_eq!(config.paths.clients, defaults.paths.clients);
        assert_eq!(config.paths.settings, defaults.paths.settings);
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
suite_version: v1
legacy_clients_dir: null
paths:
  tests: e2e/tests
"#;
        let config: E2eConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.suite_version, SuiteVersion::V1);
        assert_eq!(config.legacy_clients_dir, None);
        assert_eq!(config.paths.tests, PathBuf::from("e2e/tests"));
        // Defaults applied
        assert_eq!(config.paths.fixtures, PathBuf::from("framework/fixtures/http"));
        assert_eq!(config.output, ".");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap().is_none());
    }
}
