//! # URL Registry
//!
//! A short-code registry with expiry tracking, click analytics and a durable
//! key-value mirror.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Records, clicks, the clock and the mirror trait
//! - **Application Layer** ([`application`]) - The registry engine, batch submission and redirects
//! - **Infrastructure Layer** ([`infrastructure`]) - File, Redis and in-memory mirrors
//! - **Telemetry** ([`telemetry`]) - Tracing setup and the in-memory log buffer
//!
//! ## Features
//!
//! - Random or custom short codes, unique over the registry's lifetime
//! - Per-record validity windows with lazy expiry
//! - Click history with source, location and user agent
//! - Full snapshot mirrored after every mutation
//!
//! ## Quick Start
//!
//! ```bash
//! export STORE_BACKEND="file"
//! export STORE_DIR="data"
//!
//! cargo run -- shorten https://example.com --validity 60
//! cargo run -- list
//! ```
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;
pub mod utils;

pub use error::RegistryError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        BatchEntry, RedirectOutcome, RegistrySettings, UrlRegistry, follow, shorten_batch,
    };
    pub use crate::domain::clock::{Clock, ManualClock, SystemClock};
    pub use crate::domain::entities::{ClickEvent, NewClick, RegistryStats, ShortenRequest, UrlRecord};
    pub use crate::domain::repositories::{MirrorError, MirrorStore};
    pub use crate::error::RegistryError;
    pub use crate::infrastructure::persistence::{FileStore, MemoryStore, RedisStore};
    pub use crate::telemetry::LogBuffer;
}
