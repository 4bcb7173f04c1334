//! Core traits and types for secret storage backends

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Secret, TenantId};

/// Errors that can occur during backend operations
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend not available: {0}")]
    Unavailable(String),

    /// The tenant already has a secret with this name
    #[error("Secret already stored: {name}")]
    NameConflict { name: String },

    /// The id is already held by another secret, possibly in another tenant
    #[error("Secret id already in use: {secret_id}")]
    IdConflict { secret_id: String },

    #[error("Secret not stored: {name}")]
    NotFound { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Other(String),
}

impl BackendError {
    pub fn name_conflict(name: impl Into<String>) -> Self {
        Self::NameConflict { name: name.into() }
    }

    pub fn id_conflict(secret_id: impl Into<String>) -> Self {
        Self::IdConflict {
            secret_id: secret_id.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Persistence contract for secrets
///
/// Every call is scoped to a tenant. Lookups return `Ok(None)` when nothing
/// is stored; `Err` is reserved for backend failures.
///
/// Implementations:
/// - `MemorySecretBackend`: In-memory, for tests and ephemeral use
/// - `FileSecretBackend`: JSON document on disk
/// - Custom drivers (database, vault, ...) registered through the backend catalog
///
/// Implementations must enforce uniqueness of (tenant, name) and of the id
/// themselves. The service checks existence before writing, but that check is
/// not atomic with the write.
#[async_trait]
pub trait SecretBackend: Send + Sync {
    /// Human-readable name of this backend
    fn name(&self) -> &str;

    /// Persist a new secret
    ///
    /// Returns `Err(BackendError::NameConflict)` if the tenant already uses the
    /// name and `Err(BackendError::IdConflict)` if any tenant holds the id. A
    /// rejected add leaves no trace, not even an empty tenant collection.
    async fn add_secret(&self, tenant_id: TenantId, secret: &Secret) -> BackendResult<()>;

    async fn get_secret_by_name(&self, tenant_id: TenantId, name: &str) -> BackendResult<Option<Secret>>;

    async fn get_secret_by_id(&self, tenant_id: TenantId, secret_id: &str) -> BackendResult<Option<Secret>>;

    /// List a tenant's secrets
    ///
    /// `None` means the backend has no collection for the tenant at all, which
    /// is distinct from an empty collection.
    async fn get_secrets(&self, tenant_id: TenantId) -> BackendResult<Option<Vec<Secret>>>;

    async fn delete_secret_by_name(&self, tenant_id: TenantId, name: &str) -> BackendResult<()>;

    async fn delete_secret_by_id(&self, tenant_id: TenantId, secret_id: &str) -> BackendResult<()>;

    /// Overwrite the secret stored under `secret.secret_name`
    ///
    /// Returns `Err(BackendError::NotFound)` if no secret has that name.
    async fn replace_secret(&self, tenant_id: TenantId, secret: &Secret) -> BackendResult<()>;

    /// Check if a secret with this id exists
    async fn is_existing_secret(&self, tenant_id: TenantId, secret_id: &str) -> BackendResult<bool> {
        Ok(self.get_secret_by_id(tenant_id, secret_id).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_messages() {
        assert_eq!(BackendError::name_conflict("db").to_string(), "Secret already stored: db");
        assert_eq!(BackendError::id_conflict("id-1").to_string(), "Secret id already in use: id-1");
        assert_eq!(BackendError::not_found("db").to_string(), "Secret not stored: db");
        assert_eq!(
            BackendError::Unavailable("vault sealed".into()).to_string(),
            "Backend not available: vault sealed"
        );
    }
}
