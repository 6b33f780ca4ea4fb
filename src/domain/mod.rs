//! Domain layer containing the registry's data model and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - URL records, click events and aggregate statistics
//! - [`repositories`] - The durable mirror contract
//! - [`clock`] - Time source used for creation and expiry checks
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Store traits define contracts implemented by the infrastructure layer
//! - Registry logic lives in [`crate::application::services`]

pub mod clock;
pub mod entities;
pub mod repositories;
