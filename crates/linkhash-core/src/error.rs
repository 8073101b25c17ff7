use thiserror::Error;

/// Errors reported by a key store backend.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors returned by key allocation and resolution.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("short key not found: {0}")]
    NotFound(String),
    #[error("no free short key after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
