//! Error types for the document portal core.

use thiserror::Error;

/// Storage-related errors
///
/// These never cross the store's public read/write boundary: reads degrade to
/// a caller-supplied fallback and writes are logged and swallowed. They do
/// surface from `PortalStore::open`, where failing fast is the right call.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt record under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Portal-level errors
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("Category path resolves to nothing after trimming")]
    UnresolvedCategoryPath,

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider request failed: {0}")]
    ProviderRequestFailed(String),

    #[error("Provider returned a malformed response: {0}")]
    ProviderResponseMalformed(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("All {attempted} assistant providers failed")]
    ProviderBlackout { attempted: usize },

    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    #[error("The master account cannot be deleted")]
    MasterAccountImmutable,

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<config::ConfigError> for PortalError {
    fn from(err: config::ConfigError) -> Self {
        PortalError::ConfigError(err.to_string())
    }
}
