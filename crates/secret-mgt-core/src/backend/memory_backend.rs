//! In-memory secret backend

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{BackendError, BackendResult, SecretBackend};
use crate::types::{Secret, TenantId};

/// In-memory secret backend for testing and ephemeral use
///
/// Secrets are partitioned by tenant and kept in insertion order. A tenant
/// gets a partition on its first write and keeps it after its last delete, so
/// `get_secrets` distinguishes "never stored anything" (`None`) from "stores
/// nothing now" (`Some(vec![])`).
///
/// # Thread Safety
///
/// All state sits behind one `RwLock`. The uniqueness checks in `add_secret`
/// run under the write lock, so concurrent adds of the same name cannot both
/// succeed.
///
/// # Example
///
/// ```
/// use secret_mgt_core::backend::MemorySecretBackend;
///
/// let backend = MemorySecretBackend::new();
/// assert!(backend.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemorySecretBackend {
    tenants: RwLock<HashMap<TenantId, Vec<Secret>>>,
}

impl MemorySecretBackend {
    /// Create a new empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-populated for one tenant
    ///
    /// The secrets are taken as-is; callers are responsible for ids.
    pub fn with_secrets(tenant_id: TenantId, secrets: Vec<Secret>) -> Self {
        let mut tenants = HashMap::new();
        tenants.insert(tenant_id, secrets);
        Self {
            tenants: RwLock::new(tenants),
        }
    }

    /// Total number of secrets across all tenants
    pub fn len(&self) -> usize {
        self.tenants.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every tenant partition
    pub fn clear(&self) {
        self.tenants.write().clear();
    }
}

#[async_trait]
impl SecretBackend for MemorySecretBackend {
    fn name(&self) -> &str {
        "memory"
    }

    async fn add_secret(&self, tenant_id: TenantId, secret: &Secret) -> BackendResult<()> {
        let mut tenants = self.tenants.write();

        let name_taken = tenants
            .get(&tenant_id)
            .is_some_and(|p| p.iter().any(|s| s.secret_name == secret.secret_name));
        if name_taken {
            return Err(BackendError::name_conflict(&secret.secret_name));
        }
        if let Some(id) = secret.id() {
            if tenants.values().flatten().any(|s| s.id() == Some(id)) {
                return Err(BackendError::id_conflict(id));
            }
        }

        // Partitions only appear once something is actually stored
        tenants.entry(tenant_id).or_default().push(secret.clone());
        Ok(())
    }

    async fn get_secret_by_name(&self, tenant_id: TenantId, name: &str) -> BackendResult<Option<Secret>> {
        let tenants = self.tenants.read();
        Ok(tenants
            .get(&tenant_id)
            .and_then(|p| p.iter().find(|s| s.secret_name == name))
            .cloned())
    }

    async fn get_secret_by_id(&self, tenant_id: TenantId, secret_id: &str) -> BackendResult<Option<Secret>> {
        let tenants = self.tenants.read();
        Ok(tenants
            .get(&tenant_id)
            .and_then(|p| p.iter().find(|s| s.id() == Some(secret_id)))
            .cloned())
    }

    async fn get_secrets(&self, tenant_id: TenantId) -> BackendResult<Option<Vec<Secret>>> {
        Ok(self.tenants.read().get(&tenant_id).cloned())
    }

    async fn delete_secret_by_name(&self, tenant_id: TenantId, name: &str) -> BackendResult<()> {
        if let Some(partition) = self.tenants.write().get_mut(&tenant_id) {
            partition.retain(|s| s.secret_name != name);
        }
        Ok(())
    }

    async fn delete_secret_by_id(&self, tenant_id: TenantId, secret_id: &str) -> BackendResult<()> {
        if let Some(partition) = self.tenants.write().get_mut(&tenant_id) {
            partition.retain(|s| s.id() != Some(secret_id));
        }
        Ok(())
    }

    async fn replace_secret(&self, tenant_id: TenantId, secret: &Secret) -> BackendResult<()> {
        let mut tenants = self.tenants.write();
        let stored = tenants
            .get_mut(&tenant_id)
            .and_then(|p| p.iter_mut().find(|s| s.secret_name == secret.secret_name))
            .ok_or_else(|| BackendError::not_found(&secret.secret_name))?;
        *stored = secret.clone();
        Ok(())
    }
}

impl Clone for MemorySecretBackend {
    fn clone(&self) -> Self {
        Self {
            tenants: RwLock::new(self.tenants.read().clone()),
        }
    }
}
