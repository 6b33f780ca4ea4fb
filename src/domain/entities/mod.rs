//! Core domain entities representing the registry's data model.
//!
//! # Entity Types
//!
//! - [`UrlRecord`] - One shortening: original URL, code, expiry and clicks
//! - [`ClickEvent`] - A recorded visit to a short code
//! - [`RegistryStats`] - Aggregate counts across the registry
//!
//! # Design Pattern
//!
//! Creation inputs live in separate structs:
//! - `ShortenRequest` - For creating a record
//! - `NewClick` - For recording a visit

pub mod click;
pub mod stats;
pub mod url_record;

pub use click::{ClickEvent, NewClick};
pub use stats::RegistryStats;
pub use url_record::{ShortenRequest, UrlRecord};
