//! Application layer services implementing registry logic.
//!
//! This layer owns the registry engine and the thin collaborators built on
//! top of it. Services depend on domain traits only; concrete stores are
//! chosen by the binary.
//!
//! # Available Services
//!
//! - [`services::url_registry::UrlRegistry`] - Short code registry and click analytics
//! - [`services::batch`] - Multi-entry submission with per-entry error reporting
//! - [`services::redirect`] - Visit resolution and click recording

pub mod services;
