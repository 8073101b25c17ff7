use crate::error::ShortenerError;
use crate::shortkey::ShortKey;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

type Result<T> = std::result::Result<T, ShortenerError>;

/// Whether an allocation wrote a new mapping or found an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationOutcome {
    /// The URL was not stored yet and now maps to the returned key.
    Created,
    /// The URL was already stored under the returned key.
    AlreadyExists,
}

/// The short key assigned to a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub key: ShortKey,
    pub outcome: AllocationOutcome,
}

/// The two operations exposed to transports.
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Assigns a short key to `url`, reusing the existing key on resubmission.
    async fn allocate(&self, url: &str) -> Result<Allocation>;

    /// Returns the URL stored under `key`.
    async fn resolve(&self, key: &str) -> Result<String>;
}
