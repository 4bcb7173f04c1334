//! Catalog of backend kinds for building backends from configuration

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::file_backend::FileSecretBackend;
use super::memory_backend::MemorySecretBackend;
use super::traits::{BackendError, BackendResult, SecretBackend};
use crate::config::BackendConfig;

/// Factory function type for creating backends from their configuration
pub type BackendFactory = Box<dyn Fn(&BackendConfig) -> BackendResult<Arc<dyn SecretBackend>> + Send + Sync>;

type SharedFactory = Arc<dyn Fn(&BackendConfig) -> BackendResult<Arc<dyn SecretBackend>> + Send + Sync>;

/// Definition of a registered backend kind
pub struct BackendKind {
    /// Unique kind name, as used in configuration
    pub name: String,
    /// Human-readable description
    pub description: String,
    factory: SharedFactory,
}

impl BackendKind {
    fn new(name: &str, description: &str, factory: BackendFactory) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            factory: Arc::from(factory),
        }
    }
}

impl std::fmt::Debug for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendKind")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

fn memory_factory(_config: &BackendConfig) -> BackendResult<Arc<dyn SecretBackend>> {
    Ok(Arc::new(MemorySecretBackend::new()))
}

fn file_factory(config: &BackendConfig) -> BackendResult<Arc<dyn SecretBackend>> {
    let path = config
        .path
        .clone()
        .ok_or_else(|| BackendError::Other("file backend requires a `path`".to_string()))?;
    Ok(Arc::new(FileSecretBackend::new(path)))
}

/// Global catalog of backend kinds
///
/// Holds factories only. Backend instances live in a `BackendRegistry`
/// owned by the service.
static CATALOG: Lazy<RwLock<HashMap<String, BackendKind>>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        "memory".to_string(),
        BackendKind::new("memory", "In-memory storage for testing", Box::new(memory_factory)),
    );

    map.insert(
        "file".to_string(),
        BackendKind::new("file", "JSON document on the local filesystem", Box::new(file_factory)),
    );

    RwLock::new(map)
});

/// Register a new backend kind
///
/// Replaces any existing kind with the same name.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use secret_mgt_core::backend::{
///     register_backend_kind, has_backend_kind, BackendResult, MemorySecretBackend, SecretBackend,
/// };
/// use secret_mgt_core::config::BackendConfig;
///
/// register_backend_kind(
///     "scratch",
///     "Throwaway in-memory store",
///     Box::new(|_: &BackendConfig| -> BackendResult<Arc<dyn SecretBackend>> {
///         Ok(Arc::new(MemorySecretBackend::new()))
///     }),
/// );
/// assert!(has_backend_kind("scratch"));
/// ```
pub fn register_backend_kind(name: &str, description: &str, factory: BackendFactory) {
    CATALOG
        .write()
        .insert(name.to_string(), BackendKind::new(name, description, factory));
}

/// Create a backend from its configuration
///
/// Returns `None` if `config.kind` is not registered. The factory runs after
/// the catalog lock is released, so it may itself use the catalog.
pub fn create_backend(config: &BackendConfig) -> Option<BackendResult<Arc<dyn SecretBackend>>> {
    let factory = CATALOG.read().get(&config.kind).map(|kind| Arc::clone(&kind.factory))?;
    Some(factory(config))
}

/// List all registered backend kinds as (name, description) pairs
pub fn list_backend_kinds() -> Vec<(String, String)> {
    let catalog = CATALOG.read();
    catalog
        .values()
        .map(|kind| (kind.name.clone(), kind.description.clone()))
        .collect()
}

/// Check if a backend kind is registered
pub fn has_backend_kind(name: &str) -> bool {
    CATALOG.read().contains_key(name)
}

/// Unregister a backend kind (mainly for testing)
pub fn unregister_backend_kind(name: &str) -> bool {
    CATALOG.write().remove(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds_registered() {
        assert!(has_backend_kind("memory"));
        assert!(has_backend_kind("file"));

        let kinds = list_backend_kinds();
        let names: Vec<_> = kinds.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&"memory"));
        assert!(names.contains(&"file"));
    }

    #[test]
    fn test_create_memory_backend() {
        let backend = create_backend(&BackendConfig::new("memory", 1)).unwrap().unwrap();
        assert_eq!(backend.name(), "memory");
    }

    #[test]
    fn test_create_file_backend_requires_path() {
        let missing = create_backend(&BackendConfig::new("file", 1)).unwrap();
        assert!(matches!(missing, Err(BackendError::Other(_))));

        let backend = create_backend(&BackendConfig::new("file", 1).with_path("secrets.json"))
            .unwrap()
            .unwrap();
        assert_eq!(backend.name(), "file");
    }

    #[test]
    fn test_create_unknown_kind() {
        assert!(create_backend(&BackendConfig::new("nonexistent_xyz", 1)).is_none());
    }

    #[test]
    fn test_register_custom_kind() {
        register_backend_kind(
            "test_custom_kind",
            "A test backend",
            Box::new(memory_factory),
        );
        assert!(has_backend_kind("test_custom_kind"));

        let backend = create_backend(&BackendConfig::new("test_custom_kind", 1)).unwrap().unwrap();
        assert_eq!(backend.name(), "memory");

        assert!(unregister_backend_kind("test_custom_kind"));
        assert!(!has_backend_kind("test_custom_kind"));
    }

    fn registering_factory(config: &BackendConfig) -> BackendResult<Arc<dyn SecretBackend>> {
        register_backend_kind("test_registered_by_factory", "Added mid-create", Box::new(memory_factory));
        let inner = BackendConfig::new("memory", config.priority);
        create_backend(&inner).unwrap_or_else(|| Err(BackendError::Other("memory kind missing".into())))
    }

    #[test]
    fn test_factory_may_use_the_catalog() {
        register_backend_kind("test_reentrant_kind", "Touches the catalog", Box::new(registering_factory));

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let created = create_backend(&BackendConfig::new("test_reentrant_kind", 1));
            let _ = tx.send(created.map(|r| r.map(|b| b.name().to_string())));
        });

        let created = rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .expect("create_backend deadlocked on the catalog lock");
        assert_eq!(created.unwrap().unwrap(), "memory");
        assert!(has_backend_kind("test_registered_by_factory"));

        unregister_backend_kind("test_reentrant_kind");
        unregister_backend_kind("test_registered_by_factory");
    }
}
