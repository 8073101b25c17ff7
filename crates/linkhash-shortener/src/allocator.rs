use std::sync::Arc;

use linkhash_core::{
    Allocation, AllocationOutcome, Insertion, KeyStore, ShortKey, ShortenerError, StorageError,
};
use linkhash_deriver::KeyDeriver;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Default ceiling on probing attempts per allocation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 256;

/// Settings for [`KeyAllocator`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct AllocatorSettings {
    /// Attempts made before an allocation fails with
    /// [`ShortenerError::Exhausted`].
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
}

impl AllocatorSettings {
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Assigns short keys to URLs.
///
/// For attempt `0, 1, 2, ...` the allocator derives a candidate key and looks
/// it up in the store:
///
/// - free: the URL is written with [`KeyStore::put_if_absent`] and the key is
///   returned as [`AllocationOutcome::Created`];
/// - holding the same URL: the key is returned as
///   [`AllocationOutcome::AlreadyExists`] without writing;
/// - holding another URL: collision, the next attempt is tried.
///
/// A conditional insert that loses a race is handled like a lookup that saw
/// the winner's value, so two concurrent allocations of the same URL agree on
/// one key and only one of them reports `Created`.
#[derive(Debug, Clone)]
pub struct KeyAllocator<S, D> {
    store: Arc<S>,
    deriver: D,
    settings: AllocatorSettings,
}

impl<S: KeyStore, D: KeyDeriver> KeyAllocator<S, D> {
    pub fn new(store: Arc<S>, deriver: D, settings: AllocatorSettings) -> Self {
        Self {
            store,
            deriver,
            settings,
        }
    }

    pub fn settings(&self) -> &AllocatorSettings {
        &self.settings
    }

    /// Allocates a short key for `url`.
    ///
    /// # Errors
    ///
    /// * [`ShortenerError::InvalidArgument`] if `url` is empty. The store is
    ///   not touched.
    /// * [`ShortenerError::Storage`] if a lookup or insert fails.
    /// * [`ShortenerError::Exhausted`] if every attempt collided.
    pub async fn allocate(&self, url: &str) -> Result<Allocation, ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidArgument(
                "url cannot be empty".to_string(),
            ));
        }

        let max_attempts = self.settings.max_attempts;
        for attempt in 0..max_attempts {
            let key = self.deriver.derive(url, attempt);
            trace!(key = %key, attempt, "probing candidate short key");

            let stored = match self.store.get(&key).await.map_err(|e| storage_failure(&key, e))? {
                Some(existing) => existing,
                None => match self
                    .store
                    .put_if_absent(&key, url)
                    .await
                    .map_err(|e| storage_failure(&key, e))?
                {
                    Insertion::Inserted => {
                        debug!(key = %key, attempt, "allocated short key");
                        return Ok(Allocation {
                            key,
                            outcome: AllocationOutcome::Created,
                        });
                    }
                    Insertion::Occupied(existing) => existing,
                },
            };

            if stored == url {
                debug!(key = %key, attempt, "url already has a short key");
                return Ok(Allocation {
                    key,
                    outcome: AllocationOutcome::AlreadyExists,
                });
            }

            debug!(key = %key, attempt, "short key collision");
        }

        warn!(url, attempts = max_attempts, "short key space exhausted for url");
        Err(ShortenerError::Exhausted {
            attempts: max_attempts,
        })
    }
}

fn storage_failure(key: &ShortKey, error: StorageError) -> ShortenerError {
    warn!(key = %key, error = %error, "key store operation failed");
    ShortenerError::Storage(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use linkhash_core::store::Result as StoreResult;
    use linkhash_core::ReadKeyStore;
    use linkhash_deriver::{PrefixDeriver, Sha256Deriver};
    use linkhash_storage::InMemoryKeyStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(s: &str) -> ShortKey {
        ShortKey::new_unchecked(s)
    }

    fn prefix_allocator(
        store: Arc<InMemoryKeyStore>,
    ) -> KeyAllocator<InMemoryKeyStore, PrefixDeriver> {
        KeyAllocator::new(
            store,
            PrefixDeriver::with_prefix("path"),
            AllocatorSettings::default(),
        )
    }

    /// Counts every call and relies on the provided `put_if_absent`.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryKeyStore,
        gets: AtomicUsize,
        puts: AtomicUsize,
    }

    #[async_trait]
    impl ReadKeyStore for CountingStore {
        async fn get(&self, key: &ShortKey) -> StoreResult<Option<String>> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key).await
        }
    }

    #[async_trait]
    impl KeyStore for CountingStore {
        async fn put(&self, key: &ShortKey, url: &str) -> StoreResult<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            self.inner.put(key, url).await
        }
    }

    /// Reports every key as free on lookup, so the conditional insert is what
    /// discovers the occupant. Models losing the race to a concurrent writer.
    struct RacingStore {
        inner: InMemoryKeyStore,
    }

    #[async_trait]
    impl ReadKeyStore for RacingStore {
        async fn get(&self, _key: &ShortKey) -> StoreResult<Option<String>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl KeyStore for RacingStore {
        async fn put(&self, key: &ShortKey, url: &str) -> StoreResult<()> {
            self.inner.put(key, url).await
        }

        async fn put_if_absent(&self, key: &ShortKey, url: &str) -> StoreResult<Insertion> {
            self.inner.put_if_absent(key, url).await
        }
    }

    struct FailingStore;

    #[async_trait]
    impl ReadKeyStore for FailingStore {
        async fn get(&self, _key: &ShortKey) -> StoreResult<Option<String>> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl KeyStore for FailingStore {
        async fn put(&self, _key: &ShortKey, _url: &str) -> StoreResult<()> {
            Err(StorageError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn first_allocation_creates_key() {
        let store = Arc::new(InMemoryKeyStore::new());
        let allocator = prefix_allocator(Arc::clone(&store));

        let allocation = allocator.allocate("http://example.com").await.unwrap();

        assert_eq!(allocation.key.as_str(), "path0");
        assert_eq!(allocation.outcome, AllocationOutcome::Created);
        assert_eq!(
            store.get(&key("path0")).await.unwrap().as_deref(),
            Some("http://example.com")
        );
    }

    #[tokio::test]
    async fn resubmission_returns_existing_key() {
        let store = Arc::new(InMemoryKeyStore::new());
        let allocator = prefix_allocator(Arc::clone(&store));

        let first = allocator.allocate("http://example.com").await.unwrap();
        let second = allocator.allocate("http://example.com").await.unwrap();

        assert_eq!(first.key, second.key);
        assert_eq!(first.outcome, AllocationOutcome::Created);
        assert_eq!(second.outcome, AllocationOutcome::AlreadyExists);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn collision_moves_to_next_attempt() {
        let store = Arc::new(InMemoryKeyStore::new());
        let allocator = prefix_allocator(Arc::clone(&store));

        let first = allocator.allocate("http://one.example").await.unwrap();
        let second = allocator.allocate("http://two.example").await.unwrap();
        let third = allocator.allocate("http://three.example").await.unwrap();

        assert_eq!(first.key.as_str(), "path0");
        assert_eq!(second.key.as_str(), "path1");
        assert_eq!(third.key.as_str(), "path2");
        assert!([first, second, third]
            .iter()
            .all(|a| a.outcome == AllocationOutcome::Created));
    }

    #[tokio::test]
    async fn collision_never_overwrites_existing_mapping() {
        let store = Arc::new(InMemoryKeyStore::new());
        store.put(&key("path0"), "http://taken.example").await.unwrap();
        let allocator = prefix_allocator(Arc::clone(&store));

        let allocation = allocator.allocate("http://example.com").await.unwrap();

        assert_eq!(allocation.key.as_str(), "path1");
        assert_eq!(
            store.get(&key("path0")).await.unwrap().as_deref(),
            Some("http://taken.example")
        );
    }

    #[tokio::test]
    async fn resubmission_after_collision_finds_probed_key() {
        let store = Arc::new(InMemoryKeyStore::new());
        store.put(&key("path0"), "http://taken.example").await.unwrap();
        let allocator = prefix_allocator(Arc::clone(&store));

        allocator.allocate("http://example.com").await.unwrap();
        let again = allocator.allocate("http://example.com").await.unwrap();

        assert_eq!(again.key.as_str(), "path1");
        assert_eq!(again.outcome, AllocationOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn empty_url_is_rejected_without_touching_store() {
        let store = Arc::new(CountingStore::default());
        let allocator = KeyAllocator::new(
            Arc::clone(&store),
            PrefixDeriver::with_prefix("path"),
            AllocatorSettings::default(),
        );

        let err = allocator.allocate("").await.unwrap_err();

        assert!(matches!(err, ShortenerError::InvalidArgument(_)));
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn writes_only_on_created_path() {
        let store = Arc::new(CountingStore::default());
        let allocator = KeyAllocator::new(
            Arc::clone(&store),
            PrefixDeriver::with_prefix("path"),
            AllocatorSettings::default(),
        );

        allocator.allocate("http://example.com").await.unwrap();
        assert_eq!(store.puts.load(Ordering::SeqCst), 1);

        let again = allocator.allocate("http://example.com").await.unwrap();
        assert_eq!(again.outcome, AllocationOutcome::AlreadyExists);
        assert_eq!(store.puts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn lost_insert_race_with_same_url_is_already_exists() {
        let store = Arc::new(RacingStore {
            inner: InMemoryKeyStore::new(),
        });
        store.inner.put(&key("path0"), "http://example.com").await.unwrap();
        let allocator = KeyAllocator::new(
            Arc::clone(&store),
            PrefixDeriver::with_prefix("path"),
            AllocatorSettings::default(),
        );

        let allocation = allocator.allocate("http://example.com").await.unwrap();

        assert_eq!(allocation.key.as_str(), "path0");
        assert_eq!(allocation.outcome, AllocationOutcome::AlreadyExists);
    }

    #[tokio::test]
    async fn lost_insert_race_with_other_url_probes_on() {
        let store = Arc::new(RacingStore {
            inner: InMemoryKeyStore::new(),
        });
        store.inner.put(&key("path0"), "http://other.example").await.unwrap();
        let allocator = KeyAllocator::new(
            Arc::clone(&store),
            PrefixDeriver::with_prefix("path"),
            AllocatorSettings::default(),
        );

        let allocation = allocator.allocate("http://example.com").await.unwrap();

        assert_eq!(allocation.key.as_str(), "path1");
        assert_eq!(allocation.outcome, AllocationOutcome::Created);
        assert_eq!(
            store.inner.get(&key("path0")).await.unwrap().as_deref(),
            Some("http://other.example")
        );
    }

    #[tokio::test]
    async fn exhausts_after_max_attempts() {
        let store = Arc::new(InMemoryKeyStore::new());
        store.put(&key("stuck"), "http://taken.example").await.unwrap();
        let allocator = KeyAllocator::new(
            Arc::clone(&store),
            |_: &str, _: u32| ShortKey::new_unchecked("stuck"),
            AllocatorSettings::builder().max_attempts(5).build(),
        );

        let err = allocator.allocate("http://example.com").await.unwrap_err();

        assert!(matches!(err, ShortenerError::Exhausted { attempts: 5 }));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn storage_failure_is_propagated() {
        let allocator = KeyAllocator::new(
            Arc::new(FailingStore),
            Sha256Deriver::new(),
            AllocatorSettings::default(),
        );

        let err = allocator.allocate("http://example.com").await.unwrap_err();

        assert!(matches!(
            err,
            ShortenerError::Storage(StorageError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn distinct_urls_get_distinct_keys() {
        let store = Arc::new(InMemoryKeyStore::new());
        let allocator = KeyAllocator::new(
            Arc::clone(&store),
            Sha256Deriver::new(),
            AllocatorSettings::default(),
        );

        let a = allocator.allocate("https://example.com/a").await.unwrap();
        let b = allocator.allocate("https://example.com/b").await.unwrap();

        assert_ne!(a.key, b.key);
        assert_eq!(a.key, Sha256Deriver::new().derive("https://example.com/a", 0));
    }

    #[test]
    fn default_settings() {
        assert_eq!(AllocatorSettings::default().max_attempts(), DEFAULT_MAX_ATTEMPTS);
    }
}
