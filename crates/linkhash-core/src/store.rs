use crate::error::StorageError;
use crate::shortkey::ShortKey;
use async_trait::async_trait;

/// Result type for key store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Outcome of a conditional insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The key was free and now maps to the given URL.
    Inserted,
    /// The key was already taken; carries the URL currently stored under it.
    Occupied(String),
}

/// A read-only view of a key store.
///
/// The redirect path only needs lookups, so it depends on this trait alone.
#[async_trait]
pub trait ReadKeyStore: Send + Sync + 'static {
    /// Returns the URL stored under `key`, or `None` if the key is unused.
    async fn get(&self, key: &ShortKey) -> Result<Option<String>>;
}

#[async_trait]
pub trait KeyStore: ReadKeyStore {
    /// Stores `url` under `key`, replacing any previous value.
    async fn put(&self, key: &ShortKey, url: &str) -> Result<()>;

    /// Stores `url` under `key` only if the key is unused.
    ///
    /// Backends must override this with an operation that is atomic per key.
    /// The provided implementation is a plain get-then-put and leaves a window
    /// in which two writers can both observe the key as free.
    async fn put_if_absent(&self, key: &ShortKey, url: &str) -> Result<Insertion> {
        if let Some(existing) = self.get(key).await? {
            return Ok(Insertion::Occupied(existing));
        }
        self.put(key, url).await?;
        Ok(Insertion::Inserted)
    }
}
