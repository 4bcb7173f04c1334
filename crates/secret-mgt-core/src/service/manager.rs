//! Secret management service

use std::sync::Arc;

use tracing::{debug, info};

use super::error::{SecretManagementError, SecretManagementResult};
use super::id::{IdGenerator, UuidIdGenerator};
use super::validation;
use crate::backend::{BackendError, BackendRegistry, SecretBackend};
use crate::config::{ConfigResult, SecretManagerConfig};
use crate::types::{Secret, Secrets, TenantContext};

/// Tenant-scoped secret management over the highest priority backend
///
/// Holds no secret state: every call goes to the backend selected from the
/// registry. Each operation makes a single attempt against that one backend.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use secret_mgt_core::backend::{BackendRegistry, MemorySecretBackend};
/// use secret_mgt_core::service::SecretManager;
/// use secret_mgt_core::types::{Secret, TenantContext};
///
/// # tokio_test_block(async {
/// let registry = BackendRegistry::builder()
///     .with_backend(1, Arc::new(MemorySecretBackend::new()))
///     .build();
/// let manager = SecretManager::new(registry);
/// let ctx = TenantContext::new(1, "example.com");
///
/// let added = manager.add_secret(&ctx, Secret::new("db-password", "s3cr3t")).await.unwrap();
/// assert!(added.secret_id.is_some());
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct SecretManager {
    registry: BackendRegistry,
    id_generator: Arc<dyn IdGenerator>,
}

impl SecretManager {
    /// Create a service over a fixed set of backends
    pub fn new(registry: BackendRegistry) -> Self {
        Self {
            registry,
            id_generator: Arc::new(UuidIdGenerator),
        }
    }

    /// Build the backends described by a configuration and wrap them
    pub fn from_config(config: &SecretManagerConfig) -> ConfigResult<Self> {
        Ok(Self::new(config.build_registry()?))
    }

    /// Replace the identifier generator
    pub fn with_id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = id_generator;
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Add a new secret and return it with its assigned id
    ///
    /// Any `secret_id` on the input is replaced by a freshly generated one.
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant_domain, secret_name = %secret.secret_name))]
    pub async fn add_secret(&self, ctx: &TenantContext, mut secret: Secret) -> SecretManagementResult<Secret> {
        let backend = self.backend()?;

        validation::validate_add_request(&secret)?;
        if self.secret_exists(ctx, &secret.secret_name).await? {
            return Err(SecretManagementError::already_exists(&secret.secret_name));
        }
        validation::apply_default_tenant_domain(&mut secret, ctx);

        secret.secret_id = Some(self.generate_id());
        backend
            .add_secret(ctx.tenant_id, &secret)
            .await
            .map_err(|e| match e {
                BackendError::NameConflict { .. } => SecretManagementError::already_exists(&secret.secret_name),
                // A taken id comes from the generator, not the caller
                other => SecretManagementError::backend("add_secret", other),
            })?;

        info!("Secret added successfully");
        Ok(secret)
    }

    /// Get a secret by name
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant_domain, secret_name = %secret_name))]
    pub async fn get_secret(&self, ctx: &TenantContext, secret_name: &str) -> SecretManagementResult<Secret> {
        let backend = self.backend()?;

        validation::validate_get_request(secret_name)?;
        let secret = backend
            .get_secret_by_name(ctx.tenant_id, secret_name)
            .await
            .map_err(|e| SecretManagementError::backend("get_secret_by_name", e))?;

        secret.ok_or_else(|| {
            debug!("No secret found for the name");
            SecretManagementError::does_not_exist(secret_name)
        })
    }

    /// List all secrets of the tenant
    ///
    /// Fails only when the backend has no collection for the tenant; an empty
    /// collection is returned as-is.
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant_domain))]
    pub async fn get_secrets(&self, ctx: &TenantContext) -> SecretManagementResult<Secrets> {
        let backend = self.backend()?;

        let secrets = backend
            .get_secrets(ctx.tenant_id)
            .await
            .map_err(|e| SecretManagementError::backend("get_secrets", e))?;

        match secrets {
            Some(list) => Ok(Secrets::new(list)),
            None => {
                debug!("No secrets found for the tenant");
                Err(SecretManagementError::SecretsDoNotExist {
                    tenant_domain: ctx.tenant_domain.clone(),
                })
            }
        }
    }

    /// Get a secret by id
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant_domain, secret_id = %secret_id))]
    pub async fn get_secret_by_id(&self, ctx: &TenantContext, secret_id: &str) -> SecretManagementResult<Secret> {
        let backend = self.backend()?;

        validation::validate_secret_id(secret_id)?;
        backend
            .get_secret_by_id(ctx.tenant_id, secret_id)
            .await
            .map_err(|e| SecretManagementError::backend("get_secret_by_id", e))?
            .ok_or_else(|| SecretManagementError::secret_id_does_not_exist(secret_id))
    }

    /// Delete a secret by name
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant_domain, secret_name = %secret_name))]
    pub async fn delete_secret(&self, ctx: &TenantContext, secret_name: &str) -> SecretManagementResult<()> {
        let backend = self.backend()?;

        validation::validate_delete_request(secret_name)?;
        if !self.secret_exists(ctx, secret_name).await? {
            debug!("No secret to delete with this name");
            return Err(SecretManagementError::does_not_exist(secret_name));
        }

        backend
            .delete_secret_by_name(ctx.tenant_id, secret_name)
            .await
            .map_err(|e| match e {
                BackendError::NotFound { .. } => SecretManagementError::does_not_exist(secret_name),
                other => SecretManagementError::backend("delete_secret_by_name", other),
            })?;

        debug!("Secret deleted successfully");
        Ok(())
    }

    /// Delete a secret by id
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant_domain, secret_id = %secret_id))]
    pub async fn delete_secret_by_id(&self, ctx: &TenantContext, secret_id: &str) -> SecretManagementResult<()> {
        let backend = self.backend()?;

        validation::validate_secret_id(secret_id)?;
        if !self.secret_exists_by_id(ctx, secret_id).await? {
            return Err(SecretManagementError::secret_id_does_not_exist(secret_id));
        }

        backend
            .delete_secret_by_id(ctx.tenant_id, secret_id)
            .await
            .map_err(|e| match e {
                BackendError::NotFound { .. } => SecretManagementError::secret_id_does_not_exist(secret_id),
                other => SecretManagementError::backend("delete_secret_by_id", other),
            })?;

        debug!("Secret deleted successfully");
        Ok(())
    }

    /// Replace the value and metadata of an existing secret
    ///
    /// The stored `secret_id` is kept; any id on the input is ignored.
    #[tracing::instrument(skip_all, fields(tenant = %ctx.tenant_domain, secret_name = %secret.secret_name))]
    pub async fn replace_secret(&self, ctx: &TenantContext, mut secret: Secret) -> SecretManagementResult<Secret> {
        let backend = self.backend()?;

        validation::validate_replace_request(&secret)?;
        if !self.secret_exists(ctx, &secret.secret_name).await? {
            return Err(SecretManagementError::does_not_exist(&secret.secret_name));
        }
        validation::apply_default_tenant_domain(&mut secret, ctx);

        secret.secret_id = Some(self.resolve_secret_id(ctx, &secret.secret_name).await?);
        backend
            .replace_secret(ctx.tenant_id, &secret)
            .await
            .map_err(|e| match e {
                BackendError::NotFound { .. } => SecretManagementError::does_not_exist(&secret.secret_name),
                other => SecretManagementError::backend("replace_secret", other),
            })?;

        info!("Secret replaced successfully");
        Ok(secret)
    }

    /// Check whether a secret with this name exists
    ///
    /// Only "does not exist" maps to `false`; every other failure, including
    /// backend errors, is returned unchanged.
    pub async fn secret_exists(&self, ctx: &TenantContext, secret_name: &str) -> SecretManagementResult<bool> {
        match self.get_secret(ctx, secret_name).await {
            Ok(_) => Ok(true),
            Err(SecretManagementError::DoesNotExist { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check whether a secret with this id exists
    pub async fn secret_exists_by_id(&self, ctx: &TenantContext, secret_id: &str) -> SecretManagementResult<bool> {
        let backend = self.backend()?;

        validation::validate_secret_id(secret_id)?;
        backend
            .is_existing_secret(ctx.tenant_id, secret_id)
            .await
            .map_err(|e| SecretManagementError::backend("is_existing_secret", e))
    }

    /// The highest priority backend
    fn backend(&self) -> SecretManagementResult<&Arc<dyn SecretBackend>> {
        self.registry.select().ok_or_else(|| {
            tracing::error!("No secret backend configured");
            SecretManagementError::NoBackendConfigured
        })
    }

    fn generate_id(&self) -> String {
        let secret_id = self.id_generator.generate();
        debug!(%secret_id, "Secret id generated");
        secret_id
    }

    /// Id to store on replace: the existing one, or a new one if the name is
    /// unknown. Replace checks existence first, so the second case only
    /// arises if the secret is deleted concurrently.
    async fn resolve_secret_id(&self, ctx: &TenantContext, secret_name: &str) -> SecretManagementResult<String> {
        match self.get_secret(ctx, secret_name).await {
            Ok(existing) => Ok(existing.secret_id.unwrap_or_else(|| self.generate_id())),
            Err(SecretManagementError::DoesNotExist { .. }) => Ok(self.generate_id()),
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManager")
            .field("registry", &self.registry)
            .finish()
    }
}
