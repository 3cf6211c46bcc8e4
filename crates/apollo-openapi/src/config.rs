use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::resolve::DEFAULT_CONTENT_TYPE;

/// Settings for a [`DocumentAccessor`](crate::DocumentAccessor), loadable from
/// `.apollo-openapi.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AccessorConfig {
    /// Media type whose schema is resolved for request bodies.
    pub default_content_type: String,
    /// Prefix of the URI schemas are registered under in a `SchemaStorage`.
    pub uri_scheme: String,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            uri_scheme: "file://".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".apollo-openapi.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<AccessorConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AccessorConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AccessorConfig::default();
        assert_eq!(config.default_content_type, "application/hal+json");
        assert_eq!(config.uri_scheme, "file://");
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
default_content_type: application/json
uri_scheme: "schema://"
"#;
        let config: AccessorConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.default_content_type, "application/json");
        assert_eq!(config.uri_scheme, "schema://");
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "default_content_type: application/vnd.api+json\n";
        let config: AccessorConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.default_content_type, "application/vnd.api+json");
        // Defaults applied
        assert_eq!(config.uri_scheme, "file://");
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "default_content_type: application/json\n").unwrap();
        let loaded = load_config(&path).unwrap().unwrap();
        assert_eq!(loaded.default_content_type, "application/json");
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "default_content_type: [not, a, string]\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }
}
