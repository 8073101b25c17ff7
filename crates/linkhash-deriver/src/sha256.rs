use crate::KeyDeriver;
use linkhash_core::ShortKey;
use sha2::{Digest, Sha256};

/// Symbols a derived key is drawn from, indexed by `byte % 63`.
pub const ALPHABET: &[u8; 63] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";

/// Length of every key produced by [`Sha256Deriver`].
pub const KEY_LENGTH: usize = 10;

/// Derives keys from the SHA-256 digest of the URL salted with the attempt.
///
/// The digest input is the URL followed by the decimal attempt number, so
/// `("http://a.io", 12)` hashes `"http://a.io12"`. The first ten digest bytes
/// are each reduced modulo 63 and mapped onto [`ALPHABET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Deriver;

impl Sha256Deriver {
    pub fn new() -> Self {
        Self
    }
}

impl KeyDeriver for Sha256Deriver {
    fn derive(&self, url: &str, attempt: u32) -> ShortKey {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update(attempt.to_string().as_bytes());
        let digest = hasher.finalize();

        let key: String = digest[..KEY_LENGTH]
            .iter()
            .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
            .collect();

        ShortKey::new_unchecked(key)
    }
}
