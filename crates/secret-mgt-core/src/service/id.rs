//! Secret identifier generation

use uuid::Uuid;

/// Source of fresh secret identifiers
///
/// Identifiers must be unique for the lifetime of the deployment and must
/// not be derived from the secret name or tenant.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random (v4) UUID identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
