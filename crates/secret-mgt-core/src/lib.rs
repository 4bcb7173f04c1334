//! Secret Management Core
//!
//! Tenant-scoped secret storage over pluggable backends.
//!
//! A `SecretManager` validates each request, picks the highest priority
//! backend from its `BackendRegistry`, assigns identifiers to new secrets and
//! reports failures as either client or server errors with a stable code.
//!
//! ```rust,ignore
//! use secret_mgt_core::{SecretManager, SecretManagerConfig, Secret, TenantContext};
//!
//! let config = SecretManagerConfig::load_default()?;
//! let manager = SecretManager::from_config(&config)?;
//! let ctx = TenantContext::new(1, "example.com");
//!
//! let secret = manager.add_secret(&ctx, Secret::new("db-password", "s3cr3t")).await?;
//! let same = manager.get_secret_by_id(&ctx, secret.id().unwrap()).await?;
//!
//! // Existing ids are kept on replace
//! manager.replace_secret(&ctx, Secret::new("db-password", "rotated")).await?;
//! ```

pub mod types;
pub mod backend;
pub mod service;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use types::{Secret, Secrets, TenantContext, TenantId};

pub use backend::{
    SecretBackend, BackendError, BackendResult, BackendRegistry,
    MemorySecretBackend, FileSecretBackend,
    register_backend_kind, create_backend, list_backend_kinds,
};

pub use service::{
    SecretManager, SecretManagementError, SecretManagementResult,
    ErrorCode, ErrorKind, IdGenerator, UuidIdGenerator,
};

pub use config::{BackendConfig, SecretManagerConfig, ConfigError, ConfigResult};
