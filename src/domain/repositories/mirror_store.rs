//! Durable mirror contract and error types.

/// Errors that can occur while reading or writing the mirror.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("Mirror I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mirror serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Mirror backend error: {0}")]
    Backend(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Key-value store holding the persisted copy of the registry.
///
/// The registry writes its full snapshot under one fixed key after every
/// mutation and reads it back once at startup. Failures are reported to the
/// registry, which logs them and keeps running on its in-memory state.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::FileStore`] - One JSON file per key
/// - [`crate::infrastructure::persistence::RedisStore`] - Redis string keys
/// - [`crate::infrastructure::persistence::MemoryStore`] - Shared in-process map
#[cfg_attr(test, mockall::automock)]
pub trait MirrorStore {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if present
    /// - `Ok(None)` if nothing has been stored yet
    fn get(&self, key: &str) -> MirrorResult<Option<String>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> MirrorResult<()>;
}

impl<T: MirrorStore + ?Sized> MirrorStore for Box<T> {
    fn get(&self, key: &str) -> MirrorResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> MirrorResult<()> {
        (**self).set(key, value)
    }
}
