//! Storage error types.

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`](super::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key contains characters the backend cannot store.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Value is larger than the per-entry quota.
    #[error("value for {key} is {size} bytes, quota is {quota}")]
    QuotaExceeded {
        key: String,
        size: usize,
        quota: usize,
    },

    /// A thread panicked while holding the store lock.
    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),

    /// Backend refused the operation (e.g. storage disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
