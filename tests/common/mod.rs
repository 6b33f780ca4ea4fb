#![allow(dead_code)]

use std::path::Path;

use url_registry::application::services::{RegistrySettings, UrlRegistry};
use url_registry::domain::clock::ManualClock;
use url_registry::domain::entities::{ShortenRequest, UrlRecord};
use url_registry::infrastructure::persistence::{FileStore, MemoryStore};

pub const BASE_URL: &str = "https://s.test.com";

pub fn test_settings() -> RegistrySettings {
    RegistrySettings {
        rng_seed: Some(42),
        ..RegistrySettings::default()
    }
}

pub fn memory_registry() -> (UrlRegistry<MemoryStore, ManualClock>, MemoryStore, ManualClock) {
    let store = MemoryStore::new();
    let clock = ManualClock::starting_now();
    let registry = UrlRegistry::init(store.clone(), clock.clone(), test_settings());
    (registry, store, clock)
}

pub fn file_registry(dir: &Path, clock: &ManualClock) -> UrlRegistry<FileStore, ManualClock> {
    UrlRegistry::init(FileStore::new(dir), clock.clone(), test_settings())
}

pub fn create_custom<S, C>(
    registry: &mut UrlRegistry<S, C>,
    code: &str,
    url: &str,
    minutes: i64,
) -> UrlRecord
where
    S: url_registry::domain::repositories::MirrorStore,
    C: url_registry::domain::clock::Clock,
{
    registry
        .shorten(
            ShortenRequest::new(url)
                .with_validity(minutes)
                .with_custom_code(code),
        )
        .unwrap()
}
