//! Core types and traits for the linkhash URL shortener.
//!
//! This crate provides the shared vocabulary used by the deriver, the
//! storage backends, the shortener service and the HTTP gateway.

pub mod error;
pub mod shortener;
pub mod shortkey;
pub mod store;

pub use error::{ShortenerError, StorageError};
pub use shortener::{Allocation, AllocationOutcome, Shortener};
pub use shortkey::ShortKey;
pub use store::{Insertion, KeyStore, ReadKeyStore};
