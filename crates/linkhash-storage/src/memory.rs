use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use linkhash_core::store::Result;
use linkhash_core::{Insertion, KeyStore, ReadKeyStore, ShortKey};

/// In-memory key store backed by a `DashMap`.
///
/// `DashMap` shards its locks, so lookups and inserts on different keys do
/// not contend. `put_if_absent` goes through the entry API, which holds the
/// shard lock across the check and the insert.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyStore {
    storage: DashMap<ShortKey, String>,
}

impl InMemoryKeyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates an empty store with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadKeyStore for InMemoryKeyStore {
    async fn get(&self, key: &ShortKey) -> Result<Option<String>> {
        Ok(self.storage.get(key).map(|url| url.value().clone()))
    }
}

#[async_trait]
impl KeyStore for InMemoryKeyStore {
    async fn put(&self, key: &ShortKey, url: &str) -> Result<()> {
        self.storage.insert(key.clone(), url.to_owned());
        Ok(())
    }

    async fn put_if_absent(&self, key: &ShortKey, url: &str) -> Result<Insertion> {
        match self.storage.entry(key.clone()) {
            Entry::Occupied(existing) => Ok(Insertion::Occupied(existing.get().clone())),
            Entry::Vacant(slot) => {
                slot.insert(url.to_owned());
                Ok(Insertion::Inserted)
            }
        }
    }
}
