use crate::error::ShortenerError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// An opaque short key identifying a stored URL.
///
/// Keys produced by the SHA-256 deriver are always ten characters drawn from
/// `[0-9a-zA-Z_]`. The type itself only requires a non-empty string, so keys
/// received from callers can be looked up as they are.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "SmolStr", into = "SmolStr")]
pub struct ShortKey(SmolStr);

impl ShortKey {
    /// Creates a new `ShortKey`, rejecting the empty string.
    pub fn new(key: impl AsRef<str>) -> Result<Self, ShortenerError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(ShortenerError::InvalidArgument(
                "short key cannot be empty".to_string(),
            ));
        }
        Ok(Self(SmolStr::new(key)))
    }

    /// Creates a `ShortKey` without validation.
    ///
    /// Use this only for keys produced by derivers, which never emit an
    /// empty string.
    pub fn new_unchecked(key: impl AsRef<str>) -> Self {
        Self(SmolStr::new(key))
    }

    /// Builds the public short URL for this key under `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortKey").field(&self.0).finish()
    }
}

impl Display for ShortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<SmolStr> for ShortKey {
    type Error = ShortenerError;

    fn try_from(value: SmolStr) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(ShortenerError::InvalidArgument(
                "short key cannot be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }
}

impl From<ShortKey> for SmolStr {
    fn from(value: ShortKey) -> Self {
        value.0
    }
}
