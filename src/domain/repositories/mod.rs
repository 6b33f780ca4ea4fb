//! Store trait definitions for the domain layer.
//!
//! The registry persists through a key-value contract so the storage
//! technology stays an infrastructure choice.
//!
//! # Available Stores
//!
//! - [`MirrorStore`] - Durable key-value mirror of the registry snapshot
//!
//! Implementations live in `crate::infrastructure::persistence`. A mock is
//! generated via `mockall` for unit tests.

pub mod mirror_store;

pub use mirror_store::{MirrorError, MirrorResult, MirrorStore};

#[cfg(test)]
pub use mirror_store::MockMirrorStore;
