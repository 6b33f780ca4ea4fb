//! Registry engine and the collaborators that drive it.

pub mod batch;
pub mod redirect;
pub mod url_registry;

pub use batch::{BATCH_LIMIT, BatchEntry, BatchItem, BatchReport, BatchSummary, shorten_batch};
pub use redirect::{RedirectOutcome, follow};
pub use url_registry::{DEFAULT_VALIDITY_MINUTES, RegistrySettings, UrlRegistry};
