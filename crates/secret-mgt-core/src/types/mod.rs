//! Core types shared by the service and the storage backends

mod secret;
mod tenant;

pub use secret::{Secret, Secrets};
pub use tenant::{TenantContext, TenantId};
