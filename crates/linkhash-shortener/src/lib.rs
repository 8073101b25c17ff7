//! Short key allocation and resolution.
//!
//! [`KeyAllocator`] probes derived keys against a shared key store until it
//! finds a free one or the one already holding the URL. [`KeyResolver`] is
//! the read-only redirect path. [`ShortenerService`] bundles both behind the
//! [`Shortener`](linkhash_core::Shortener) trait for transports.

pub mod allocator;
pub mod resolver;
pub mod service;

pub use allocator::{AllocatorSettings, KeyAllocator, DEFAULT_MAX_ATTEMPTS};
pub use resolver::KeyResolver;
pub use service::ShortenerService;
