//! Request validation for secret operations
//!
//! Pure checks only. Existence checks need the backend and live on
//! `SecretManager`.

use super::error::{SecretManagementError, SecretManagementResult};
use crate::types::{Secret, TenantContext};

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Name and value must be non-empty
pub fn validate_add_request(secret: &Secret) -> SecretManagementResult<()> {
    if secret.secret_name.is_empty() || secret.value.is_empty() {
        return Err(SecretManagementError::AddRequestInvalid);
    }
    Ok(())
}

/// Name and value must be non-empty
pub fn validate_replace_request(secret: &Secret) -> SecretManagementResult<()> {
    if secret.secret_name.is_empty() || secret.value.is_empty() {
        return Err(SecretManagementError::ReplaceRequestInvalid);
    }
    Ok(())
}

pub fn validate_get_request(secret_name: &str) -> SecretManagementResult<()> {
    if secret_name.is_empty() {
        tracing::debug!("Invalid secret identifier: empty secret name");
        return Err(SecretManagementError::GetRequestInvalid);
    }
    Ok(())
}

pub fn validate_delete_request(secret_name: &str) -> SecretManagementResult<()> {
    if secret_name.is_empty() {
        tracing::debug!("Error identifying the secret to delete: empty secret name");
        return Err(SecretManagementError::DeleteRequestRequired);
    }
    Ok(())
}

/// Ids must contain something other than whitespace
pub fn validate_secret_id(secret_id: &str) -> SecretManagementResult<()> {
    if is_blank(secret_id) {
        return Err(SecretManagementError::invalid_secret_id(secret_id));
    }
    Ok(())
}

/// Fill in the tenant domain from the context when the caller left it unset
///
/// A caller-supplied domain is never overwritten.
pub fn apply_default_tenant_domain(secret: &mut Secret, ctx: &TenantContext) {
    if !secret.has_tenant_domain() {
        secret.tenant_domain = Some(ctx.tenant_domain.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ErrorCode;

    fn code<T>(result: SecretManagementResult<T>) -> ErrorCode {
        match result {
            Ok(_) => panic!("expected an error"),
            Err(e) => e.code(),
        }
    }

    #[test]
    fn test_add_request() {
        assert!(validate_add_request(&Secret::new("db", "pw")).is_ok());
        assert_eq!(code(validate_add_request(&Secret::new("", "pw"))), ErrorCode::SecretAddRequestInvalid);
        assert_eq!(code(validate_add_request(&Secret::new("db", ""))), ErrorCode::SecretAddRequestInvalid);
    }

    #[test]
    fn test_replace_request() {
        assert!(validate_replace_request(&Secret::new("db", "pw")).is_ok());
        assert_eq!(
            code(validate_replace_request(&Secret::new("", ""))),
            ErrorCode::SecretReplaceRequestInvalid
        );
    }

    #[test]
    fn test_get_and_delete_requests() {
        assert!(validate_get_request("db").is_ok());
        assert_eq!(code(validate_get_request("")), ErrorCode::SecretGetRequestInvalid);

        assert!(validate_delete_request("db").is_ok());
        assert_eq!(code(validate_delete_request("")), ErrorCode::SecretDeleteRequestRequired);
    }

    #[test]
    fn test_secret_id_blank() {
        assert!(validate_secret_id("abc").is_ok());
        assert_eq!(code(validate_secret_id("")), ErrorCode::InvalidSecretId);

        match validate_secret_id("   ") {
            Err(SecretManagementError::InvalidSecretId { secret_id }) => assert_eq!(secret_id, "   "),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_default_tenant_domain() {
        let ctx = TenantContext::new(1, "example.com");

        let mut unset = Secret::new("db", "pw");
        apply_default_tenant_domain(&mut unset, &ctx);
        assert_eq!(unset.tenant_domain.as_deref(), Some("example.com"));

        let mut empty = Secret::new("db", "pw").with_tenant_domain("");
        apply_default_tenant_domain(&mut empty, &ctx);
        assert_eq!(empty.tenant_domain.as_deref(), Some("example.com"));

        let mut supplied = Secret::new("db", "pw").with_tenant_domain("other.org");
        apply_default_tenant_domain(&mut supplied, &ctx);
        assert_eq!(supplied.tenant_domain.as_deref(), Some("other.org"));
    }
}
