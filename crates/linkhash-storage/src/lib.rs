//! Key store backends.
//!
//! Both backends implement [`KeyStore`] with an atomic `put_if_absent`, so
//! they can be shared by any number of concurrent allocations.

pub mod memory;
pub mod postgres;

pub use linkhash_core::store::Result;
pub use linkhash_core::{Insertion, KeyStore, ReadKeyStore, StorageError};
pub use memory::InMemoryKeyStore;
pub use postgres::PostgresKeyStore;
