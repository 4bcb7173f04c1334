//! File-based service configuration (YAML)
//!
//! Default location is `<config dir>/secret-mgt/config.yaml`, overridable
//! with the `SECRET_MGT_CONFIG` environment variable.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use crate::backend::{create_backend, BackendRegistry};

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "SECRET_MGT_CONFIG";

/// Configuration of one storage backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend kind name, looked up in the backend catalog
    pub kind: String,
    /// Higher priority wins; only the highest priority backend is used
    #[serde(default)]
    pub priority: i32,
    /// Storage location for file-like backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Driver-specific settings
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl BackendConfig {
    pub fn new(kind: impl Into<String>, priority: i32) -> Self {
        Self {
            kind: kind.into(),
            priority,
            path: None,
            options: BTreeMap::new(),
        }
    }

    /// Set the storage path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set a driver-specific option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }
}

/// Configuration file structure
///
/// ```yaml
/// backends:
///   - kind: memory
///     priority: 10
///   - kind: file
///     priority: 20
///     path: /var/lib/secret-mgt/secrets.json
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretManagerConfig {
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

impl SecretManagerConfig {
    /// Parse configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a file; a missing file yields an empty config
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load from `SECRET_MGT_CONFIG` if set, otherwise from `default_path()`
    pub fn load_default() -> ConfigResult<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::default_path);
        Self::load(path)
    }

    /// `<config dir>/secret-mgt/config.yaml`
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        config_dir.join("secret-mgt").join("config.yaml")
    }

    /// Save configuration as YAML, creating the parent directory
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    /// Create every configured backend and order them by priority
    pub fn build_registry(&self) -> ConfigResult<BackendRegistry> {
        let mut builder = BackendRegistry::builder();

        for backend_config in &self.backends {
            let backend = create_backend(backend_config)
                .ok_or_else(|| ConfigError::UnknownBackendKind(backend_config.kind.clone()))?
                .map_err(|source| ConfigError::Backend {
                    kind: backend_config.kind.clone(),
                    source,
                })?;
            tracing::debug!(
                backend = %backend_config.kind,
                priority = backend_config.priority,
                "Configured secret backend"
            );
            builder = builder.with_backend(backend_config.priority, backend);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
backends:
  - kind: file
    priority: 20
    path: /tmp/secret-mgt-test/secrets.json
  - kind: memory
    priority: 10
    options:
      note: scratch
"#;

    #[test]
    fn test_parse_yaml() {
        let config = SecretManagerConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends[0].kind, "file");
        assert_eq!(config.backends[0].priority, 20);
        assert_eq!(
            config.backends[0].path.as_deref(),
            Some(Path::new("/tmp/secret-mgt-test/secrets.json"))
        );
        assert_eq!(config.backends[1].options.get("note").map(String::as_str), Some("scratch"));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(SecretManagerConfig::from_yaml_str("").unwrap(), SecretManagerConfig::default());
        assert!(SecretManagerConfig::from_yaml_str("backends: []")
            .unwrap()
            .backends
            .is_empty());
    }

    #[test]
    fn test_invalid_yaml() {
        let result = SecretManagerConfig::from_yaml_str("backends: [kind: {");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_build_registry_orders_by_priority() {
        let config = SecretManagerConfig::from_yaml_str(SAMPLE).unwrap();
        let registry = config.build_registry().unwrap();

        assert_eq!(registry.backend_names(), vec!["memory", "file"]);
        assert_eq!(registry.select().unwrap().name(), "file");
    }

    #[test]
    fn test_build_registry_unknown_kind() {
        let config = SecretManagerConfig {
            backends: vec![BackendConfig::new("carrier-pigeon", 1)],
        };
        let result = config.build_registry();
        assert!(matches!(result, Err(ConfigError::UnknownBackendKind(kind)) if kind == "carrier-pigeon"));
    }

    #[test]
    fn test_build_registry_backend_error() {
        let config = SecretManagerConfig {
            backends: vec![BackendConfig::new("file", 1)],
        };
        assert!(matches!(config.build_registry(), Err(ConfigError::Backend { .. })));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = SecretManagerConfig::load(dir.path().join("absent.yaml")).unwrap();
        assert!(config.backends.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("conf").join("config.yaml");

        let config = SecretManagerConfig {
            backends: vec![
                BackendConfig::new("memory", 1),
                BackendConfig::new("file", 2)
                    .with_path(dir.path().join("secrets.json"))
                    .with_option("mode", "0600"),
            ],
        };
        config.save(&path).unwrap();

        let loaded = SecretManagerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_default_path() {
        let path = SecretManagerConfig::default_path();
        assert!(path.ends_with("secret-mgt/config.yaml"));
    }
}
