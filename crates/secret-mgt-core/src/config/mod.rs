//! Service configuration
//!
//! Describes which storage backends to create and their priorities.

mod error;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use file::{BackendConfig, SecretManagerConfig, CONFIG_PATH_ENV};
