use std::sync::Arc;

use linkhash_core::{ReadKeyStore, ShortKey, ShortenerError};
use tracing::{trace, warn};

/// Resolves short keys back to their URLs on the redirect path.
///
/// Only needs read access to the key store.
#[derive(Debug, Clone)]
pub struct KeyResolver<S> {
    store: Arc<S>,
}

impl<S: ReadKeyStore> KeyResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the URL stored under `key`, unchanged.
    ///
    /// # Errors
    ///
    /// * [`ShortenerError::InvalidArgument`] if `key` is empty. The store is
    ///   not touched.
    /// * [`ShortenerError::NotFound`] if no URL is stored under `key`.
    /// * [`ShortenerError::Storage`] if the lookup fails.
    pub async fn resolve(&self, key: &str) -> Result<String, ShortenerError> {
        let key = ShortKey::new(key)?;
        trace!(key = %key, "resolving short key");

        let url = self.store.get(&key).await.map_err(|e| {
            warn!(key = %key, error = %e, "key store lookup failed");
            ShortenerError::Storage(e)
        })?;

        match url {
            Some(url) => Ok(url),
            None => {
                trace!(key = %key, "short key not found");
                Err(ShortenerError::NotFound(key.to_string()))
            }
        }
    }
}
