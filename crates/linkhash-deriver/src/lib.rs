pub mod seq;
pub mod sha256;

pub use seq::PrefixDeriver;
pub use sha256::Sha256Deriver;

use linkhash_core::ShortKey;

/// Trait for deriving candidate short keys.
///
/// Implementations are pure functions of the URL and the attempt counter and
/// never touch storage. The allocator calls `derive` with attempt `0, 1, 2, ...`
/// until it finds a key that is free or already holds the same URL, so
/// different attempts for the same URL should yield independent keys.
pub trait KeyDeriver: Send + Sync + 'static {
    /// Derives the candidate key for `url` at the given attempt.
    fn derive(&self, url: &str, attempt: u32) -> ShortKey;
}

impl<F> KeyDeriver for F
where
    F: Fn(&str, u32) -> ShortKey + Send + Sync + 'static,
{
    fn derive(&self, url: &str, attempt: u32) -> ShortKey {
        self(url, attempt)
    }
}
