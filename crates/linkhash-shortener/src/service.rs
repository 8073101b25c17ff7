use std::sync::Arc;

use crate::allocator::{AllocatorSettings, KeyAllocator};
use crate::resolver::KeyResolver;
use async_trait::async_trait;
use linkhash_core::{Allocation, KeyStore, Shortener, ShortenerError};
use linkhash_deriver::KeyDeriver;

/// A concrete implementation of the [`Shortener`] trait.
///
/// The allocator and the resolver share one key store instance.
#[derive(Debug, Clone)]
pub struct ShortenerService<S, D> {
    allocator: KeyAllocator<S, D>,
    resolver: KeyResolver<S>,
}

impl<S: KeyStore, D: KeyDeriver> ShortenerService<S, D> {
    /// Creates a service with the default allocator settings.
    pub fn new(store: Arc<S>, deriver: D) -> Self {
        Self::with_settings(store, deriver, AllocatorSettings::default())
    }

    pub fn with_settings(store: Arc<S>, deriver: D, settings: AllocatorSettings) -> Self {
        Self {
            allocator: KeyAllocator::new(Arc::clone(&store), deriver, settings),
            resolver: KeyResolver::new(store),
        }
    }

    pub fn allocator(&self) -> &KeyAllocator<S, D> {
        &self.allocator
    }

    pub fn resolver(&self) -> &KeyResolver<S> {
        &self.resolver
    }
}

#[async_trait]
impl<S: KeyStore, D: KeyDeriver> Shortener for ShortenerService<S, D> {
    async fn allocate(&self, url: &str) -> Result<Allocation, ShortenerError> {
        self.allocator.allocate(url).await
    }

    async fn resolve(&self, key: &str) -> Result<String, ShortenerError> {
        self.resolver.resolve(key).await
    }
}
