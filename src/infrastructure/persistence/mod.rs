//! Durable mirror implementations.
//!
//! # Stores
//!
//! - [`FileStore`] - One JSON file per key under a directory
//! - [`RedisStore`] - Redis string keys behind a namespace prefix
//! - [`MemoryStore`] - Shared in-process map for tests and ephemeral runs
//!
//! [`snapshot`] encodes and decodes the registry's record set.

mod file_store;
mod memory_store;
mod redis_store;
pub mod snapshot;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use snapshot::STORAGE_KEY;
