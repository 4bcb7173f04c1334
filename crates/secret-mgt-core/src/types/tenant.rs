//! Tenant context passed explicitly into every service call

use serde::{Deserialize, Serialize};

/// Numeric tenant identifier used to partition backend storage
pub type TenantId = i32;

/// The tenant a request is executed on behalf of
///
/// Callers (or middleware in front of them) resolve this once per request.
/// The service only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantContext {
    /// Tenant identifier used to scope every backend call
    pub tenant_id: TenantId,
    /// Tenant domain, used to default `Secret::tenant_domain`
    pub tenant_domain: String,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId, tenant_domain: impl Into<String>) -> Self {
        Self {
            tenant_id,
            tenant_domain: tenant_domain.into(),
        }
    }
}
