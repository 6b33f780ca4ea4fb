//! Infrastructure layer for external integrations.
//!
//! This layer implements the durable mirror contract defined by the domain
//! layer.
//!
//! # Modules
//!
//! - [`persistence`] - File, Redis and in-memory mirror stores plus the
//!   snapshot codec

pub mod persistence;
