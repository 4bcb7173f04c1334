//! Error taxonomy for secret management operations

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::BackendError;

/// Whether a failure was caused by the caller or by the server side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Client,
    Server,
}

/// Stable machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    SecretAddRequestInvalid,
    SecretAlreadyExists,
    SecretGetRequestInvalid,
    SecretDoesNotExists,
    SecretsDoesNotExists,
    InvalidSecretId,
    SecretIdDoesNotExists,
    SecretDeleteRequestRequired,
    SecretReplaceRequestInvalid,
    GetDao,
    BackendOperationFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::SecretAddRequestInvalid => "SECRET_ADD_REQUEST_INVALID",
            ErrorCode::SecretAlreadyExists => "SECRET_ALREADY_EXISTS",
            ErrorCode::SecretGetRequestInvalid => "SECRET_GET_REQUEST_INVALID",
            ErrorCode::SecretDoesNotExists => "SECRET_DOES_NOT_EXISTS",
            ErrorCode::SecretsDoesNotExists => "SECRETS_DOES_NOT_EXISTS",
            ErrorCode::InvalidSecretId => "INVALID_SECRET_ID",
            ErrorCode::SecretIdDoesNotExists => "SECRET_ID_DOES_NOT_EXISTS",
            ErrorCode::SecretDeleteRequestRequired => "SECRET_DELETE_REQUEST_REQUIRED",
            ErrorCode::SecretReplaceRequestInvalid => "SECRET_REPLACE_REQUEST_INVALID",
            ErrorCode::GetDao => "GET_DAO",
            ErrorCode::BackendOperationFailed => "BACKEND_OPERATION_FAILED",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::GetDao | ErrorCode::BackendOperationFailed => ErrorKind::Server,
            _ => ErrorKind::Client,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by `SecretManager`
///
/// Client errors carry the offending name or id and can be shown to the
/// caller as-is. Server errors should be logged and reported opaquely.
#[derive(Error, Debug)]
pub enum SecretManagementError {
    #[error("Invalid secret add request: secret name and value are required")]
    AddRequestInvalid,

    #[error("Secret already exists with name: {name}")]
    AlreadyExists { name: String },

    #[error("Invalid secret get request: secret name is required")]
    GetRequestInvalid,

    #[error("Secret does not exist with name: {name}")]
    DoesNotExist { name: String },

    #[error("No secrets exist for tenant: {tenant_domain}")]
    SecretsDoNotExist { tenant_domain: String },

    #[error("Invalid secret id: '{secret_id}'")]
    InvalidSecretId { secret_id: String },

    #[error("Secret does not exist with id: {secret_id}")]
    SecretIdDoesNotExist { secret_id: String },

    #[error("Secret name is required to delete a secret")]
    DeleteRequestRequired,

    #[error("Invalid secret replace request: secret name and value are required")]
    ReplaceRequestInvalid,

    #[error("No secret backend is configured")]
    NoBackendConfigured,

    #[error("Secret backend failed during {operation}: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BackendError,
    },
}

impl SecretManagementError {
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    pub fn does_not_exist(name: impl Into<String>) -> Self {
        Self::DoesNotExist { name: name.into() }
    }

    pub fn invalid_secret_id(secret_id: impl Into<String>) -> Self {
        Self::InvalidSecretId {
            secret_id: secret_id.into(),
        }
    }

    pub fn secret_id_does_not_exist(secret_id: impl Into<String>) -> Self {
        Self::SecretIdDoesNotExist {
            secret_id: secret_id.into(),
        }
    }

    /// Wrap a backend failure as a server error
    ///
    /// Logged here so every server error is recorded exactly once.
    pub fn backend(operation: &'static str, source: BackendError) -> Self {
        tracing::error!(operation, error = %source, "Secret backend operation failed");
        Self::Backend { operation, source }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AddRequestInvalid => ErrorCode::SecretAddRequestInvalid,
            Self::AlreadyExists { .. } => ErrorCode::SecretAlreadyExists,
            Self::GetRequestInvalid => ErrorCode::SecretGetRequestInvalid,
            Self::DoesNotExist { .. } => ErrorCode::SecretDoesNotExists,
            Self::SecretsDoNotExist { .. } => ErrorCode::SecretsDoesNotExists,
            Self::InvalidSecretId { .. } => ErrorCode::InvalidSecretId,
            Self::SecretIdDoesNotExist { .. } => ErrorCode::SecretIdDoesNotExists,
            Self::DeleteRequestRequired => ErrorCode::SecretDeleteRequestRequired,
            Self::ReplaceRequestInvalid => ErrorCode::SecretReplaceRequestInvalid,
            Self::NoBackendConfigured => ErrorCode::GetDao,
            Self::Backend { .. } => ErrorCode::BackendOperationFailed,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    pub fn is_client_error(&self) -> bool {
        self.kind() == ErrorKind::Client
    }

    pub fn is_server_error(&self) -> bool {
        self.kind() == ErrorKind::Server
    }
}

pub type SecretManagementResult<T> = Result<T, SecretManagementError>;
