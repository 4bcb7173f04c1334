//! Configuration errors

use crate::backend::BackendError;

/// Errors that can occur while loading configuration or building backends
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown backend kind: {0}")]
    UnknownBackendKind(String),

    #[error("Backend '{kind}' could not be created: {source}")]
    Backend {
        kind: String,
        #[source]
        source: BackendError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
