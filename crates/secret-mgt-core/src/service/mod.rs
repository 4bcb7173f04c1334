//! Secret management service
//!
//! `SecretManager` validates requests, selects the active backend from the
//! registry, generates identifiers and maps every failure onto the error
//! taxonomy in `error`.

mod error;
mod id;
mod manager;
pub mod validation;

pub use error::{ErrorCode, ErrorKind, SecretManagementError, SecretManagementResult};
pub use id::{IdGenerator, UuidIdGenerator};
pub use manager::SecretManager;
