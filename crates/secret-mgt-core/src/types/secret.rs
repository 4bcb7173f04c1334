//! Secret model types

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named secret value owned by a single tenant
///
/// `secret_name` is unique per tenant. `secret_id` is assigned by the
/// service on creation and never changes afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Secret {
    /// Name of the secret, unique within a tenant
    pub secret_name: String,
    /// Service-assigned identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_id: Option<String>,
    /// Opaque secret payload
    pub value: String,
    /// Owning tenant domain; defaulted from the request context when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Secret {
    /// Create a new secret with a name and value
    pub fn new(secret_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            secret_name: secret_name.into(),
            secret_id: None,
            value: value.into(),
            tenant_domain: None,
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the tenant domain
    pub fn with_tenant_domain(mut self, tenant_domain: impl Into<String>) -> Self {
        self.tenant_domain = Some(tenant_domain.into());
        self
    }

    /// Set the secret id
    pub fn with_secret_id(mut self, secret_id: impl Into<String>) -> Self {
        self.secret_id = Some(secret_id.into());
        self
    }

    /// The secret id, if one has been assigned
    pub fn id(&self) -> Option<&str> {
        self.secret_id.as_deref()
    }

    /// Whether a non-empty tenant domain is set
    pub fn has_tenant_domain(&self) -> bool {
        self.tenant_domain.as_deref().is_some_and(|d| !d.is_empty())
    }
}

// Never print the value.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("secret_name", &self.secret_name)
            .field("secret_id", &self.secret_id)
            .field("value", &"<redacted>")
            .field("tenant_domain", &self.tenant_domain)
            .field("description", &self.description)
            .finish()
    }
}

/// The secrets of one tenant, in backend order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secrets {
    secrets: Vec<Secret>,
}

impl Secrets {
    pub fn new(secrets: Vec<Secret>) -> Self {
        Self { secrets }
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Secret> {
        self.secrets.iter()
    }

    /// Find a secret in the collection by name
    pub fn find(&self, secret_name: &str) -> Option<&Secret> {
        self.secrets.iter().find(|s| s.secret_name == secret_name)
    }

    pub fn into_inner(self) -> Vec<Secret> {
        self.secrets
    }
}

impl From<Vec<Secret>> for Secrets {
    fn from(secrets: Vec<Secret>) -> Self {
        Self::new(secrets)
    }
}

impl IntoIterator for Secrets {
    type Item = Secret;
    type IntoIter = std::vec::IntoIter<Secret>;

    fn into_iter(self) -> Self::IntoIter {
        self.secrets.into_iter()
    }
}

impl<'a> IntoIterator for &'a Secrets {
    type Item = &'a Secret;
    type IntoIter = std::slice::Iter<'a, Secret>;

    fn into_iter(self) -> Self::IntoIter {
        self.secrets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_builder() {
        let secret = Secret::new("db-password", "s3cr3t")
            .with_description("primary database")
            .with_tenant_domain("example.com");

        assert_eq!(secret.secret_name, "db-password");
        assert_eq!(secret.value, "s3cr3t");
        assert_eq!(secret.description.as_deref(), Some("primary database"));
        assert!(secret.has_tenant_domain());
        assert!(secret.id().is_none());
    }

    #[test]
    fn test_empty_tenant_domain_is_unset() {
        let secret = Secret::new("a", "b").with_tenant_domain("");
        assert!(!secret.has_tenant_domain());
        assert!(!Secret::new("a", "b").has_tenant_domain());
    }

    #[test]
    fn test_debug_redacts_value() {
        let secret = Secret::new("api-key", "super-secret-value");
        let debug = format!("{:?}", secret);
        assert!(debug.contains("api-key"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("super-secret-value"));
    }

    #[test]
    fn test_secret_serde_skips_unset_fields() {
        let json = serde_json::to_value(Secret::new("n", "v")).unwrap();
        assert_eq!(json, serde_json::json!({ "secret_name": "n", "value": "v" }));

        let parsed: Secret = serde_json::from_str(r#"{"secret_name":"n","value":"v","secret_id":"abc"}"#).unwrap();
        assert_eq!(parsed.id(), Some("abc"));
    }

    #[test]
    fn test_secrets_collection() {
        let secrets = Secrets::new(vec![Secret::new("a", "1"), Secret::new("b", "2")]);
        assert_eq!(secrets.len(), 2);
        assert!(!secrets.is_empty());
        assert_eq!(secrets.find("b").map(|s| s.value.as_str()), Some("2"));
        assert!(secrets.find("c").is_none());

        let names: Vec<_> = secrets.iter().map(|s| s.secret_name.clone()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(Secrets::default().is_empty());
    }
}
