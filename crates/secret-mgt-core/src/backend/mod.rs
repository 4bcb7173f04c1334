//! Secret storage backends
//!
//! This module provides the pluggable persistence layer:
//! - `SecretBackend` trait implemented by every storage driver
//! - Built-in implementations: `MemorySecretBackend`, `FileSecretBackend`
//! - `BackendRegistry`, the priority-ordered backends of one service
//! - A catalog for creating backends by kind name from configuration

mod traits;
mod memory_backend;
mod file_backend;
mod registry;
mod catalog;

pub use traits::{SecretBackend, BackendError, BackendResult};
pub use memory_backend::MemorySecretBackend;
pub use file_backend::FileSecretBackend;
pub use registry::{BackendRegistry, BackendRegistryBuilder};
pub use catalog::{
    register_backend_kind, create_backend, list_backend_kinds, has_backend_kind,
    unregister_backend_kind, BackendFactory, BackendKind,
};
