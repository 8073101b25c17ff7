use crate::KeyDeriver;
use linkhash_core::ShortKey;

/// A deriver that ignores the URL and emits `prefix` followed by the attempt.
///
/// Every URL maps to `"{prefix}0"` on its first attempt, so this deriver
/// forces collisions on purpose. It is meant for exercising the allocator's
/// probing loop, not for production use.
#[derive(Debug, Clone)]
pub struct PrefixDeriver {
    prefix: String,
}

impl PrefixDeriver {
    /// Creates a deriver producing `"{prefix}{attempt}"`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl KeyDeriver for PrefixDeriver {
    fn derive(&self, _url: &str, attempt: u32) -> ShortKey {
        ShortKey::new_unchecked(format!("{}{}", self.prefix, attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_deriver_appends_attempt() {
        let deriver = PrefixDeriver::with_prefix("path");

        assert_eq!(deriver.derive("http://example.com", 0).as_str(), "path0");
        assert_eq!(deriver.derive("http://example.com", 1).as_str(), "path1");
        assert_eq!(deriver.derive("http://other.com", 12).as_str(), "path12");
    }

    #[test]
    fn prefix_deriver_ignores_url() {
        let deriver = PrefixDeriver::with_prefix("k");

        assert_eq!(deriver.derive("a", 3), deriver.derive("b", 3));
    }

    #[test]
    fn deriver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PrefixDeriver>();
    }
}
