//! Priority-ordered set of configured backends

use std::sync::Arc;

use super::traits::SecretBackend;

/// The backends configured for a service, in ascending priority order
///
/// Exactly one backend is active: the last one, i.e. the highest priority.
/// The registry is built once at startup and never changes afterwards.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use secret_mgt_core::backend::{BackendRegistry, MemorySecretBackend};
///
/// let registry = BackendRegistry::builder()
///     .with_backend(10, Arc::new(MemorySecretBackend::new()))
///     .build();
/// assert!(registry.select().is_some());
/// ```
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn SecretBackend>>,
}

impl BackendRegistry {
    /// Start building a registry from prioritised backends
    pub fn builder() -> BackendRegistryBuilder {
        BackendRegistryBuilder::default()
    }

    /// Create a registry from backends already sorted by ascending priority
    pub fn from_sorted(backends: Vec<Arc<dyn SecretBackend>>) -> Self {
        Self { backends }
    }

    /// A registry with no backends; every service call on it fails
    pub fn empty() -> Self {
        Self::default()
    }

    /// The highest priority backend, if any are configured
    pub fn select(&self) -> Option<&Arc<dyn SecretBackend>> {
        self.backends.last()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Backend names from lowest to highest priority
    pub fn backend_names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }
}

impl std::fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.backend_names())
            .finish()
    }
}

/// Collects backends with their priorities and sorts them on `build`
#[derive(Default)]
pub struct BackendRegistryBuilder {
    entries: Vec<(i32, Arc<dyn SecretBackend>)>,
}

impl BackendRegistryBuilder {
    /// Add a backend with a priority; higher wins
    pub fn with_backend(mut self, priority: i32, backend: Arc<dyn SecretBackend>) -> Self {
        self.entries.push((priority, backend));
        self
    }

    /// Sort by ascending priority and freeze
    ///
    /// The sort is stable: among equal priorities the one added last wins.
    pub fn build(mut self) -> BackendRegistry {
        self.entries.sort_by_key(|(priority, _)| *priority);
        BackendRegistry::from_sorted(self.entries.into_iter().map(|(_, b)| b).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FileSecretBackend, MemorySecretBackend};

    #[test]
    fn test_empty_registry() {
        let registry = BackendRegistry::empty();
        assert!(registry.is_empty());
        assert!(registry.select().is_none());
    }

    #[test]
    fn test_select_highest_priority() {
        let registry = BackendRegistry::builder()
            .with_backend(100, Arc::new(MemorySecretBackend::new()))
            .with_backend(5, Arc::new(FileSecretBackend::new("unused.json")))
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.backend_names(), vec!["file", "memory"]);
        assert_eq!(registry.select().unwrap().name(), "memory");
    }

    #[test]
    fn test_equal_priority_last_added_wins() {
        let registry = BackendRegistry::builder()
            .with_backend(1, Arc::new(MemorySecretBackend::new()))
            .with_backend(1, Arc::new(FileSecretBackend::new("unused.json")))
            .build();

        assert_eq!(registry.select().unwrap().name(), "file");
    }

    #[test]
    fn test_from_sorted_uses_tail() {
        let registry = BackendRegistry::from_sorted(vec![
            Arc::new(FileSecretBackend::new("unused.json")),
            Arc::new(MemorySecretBackend::new()),
        ]);
        assert_eq!(registry.select().unwrap().name(), "memory");
    }
}
