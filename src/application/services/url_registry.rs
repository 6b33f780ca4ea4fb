//! Short-code registry and click analytics engine.

use std::collections::{HashMap, HashSet};

use chrono::Duration;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::clock::{Clock, SystemClock};
use crate::domain::entities::click::best_effort_location;
use crate::domain::entities::{ClickEvent, NewClick, RegistryStats, ShortenRequest, UrlRecord};
use crate::domain::repositories::MirrorStore;
use crate::error::RegistryError;
use crate::infrastructure::persistence::snapshot::{self, STORAGE_KEY};
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};
use crate::utils::url_validator::validate_url;

const LOG_TARGET: &str = "url_service";

/// Validity applied when a request does not specify one.
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

/// Tunables for a [`UrlRegistry`].
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub default_validity_minutes: i64,
    pub code_generator: CodeGenerator,
    /// Fixed seed for code and location draws. `None` seeds from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            default_validity_minutes: DEFAULT_VALIDITY_MINUTES,
            code_generator: CodeGenerator::default(),
            rng_seed: None,
        }
    }
}

/// In-memory registry of short codes mirrored to a durable key-value store.
///
/// Owns every [`UrlRecord`]; callers only ever receive clones. All mutating
/// operations take `&mut self`, so there is exactly one writer. After each
/// mutation the full snapshot is written to the mirror under
/// [`STORAGE_KEY`]. Mirror failures are logged and swallowed: the in-memory
/// state stays authoritative for the rest of the process.
///
/// Expiry is evaluated lazily. [`resolve`](Self::resolve) and
/// [`list`](Self::list) set a record's expiry flag once the clock is past
/// `expires_at`; that flag flip is the only write performed on a read path.
pub struct UrlRegistry<S: MirrorStore, C: Clock = SystemClock> {
    records: HashMap<String, UrlRecord>,
    reserved: HashSet<String>,
    store: S,
    clock: C,
    rng: StdRng,
    settings: RegistrySettings,
}

impl<S: MirrorStore, C: Clock> UrlRegistry<S, C> {
    /// Creates the registry and loads any snapshot held by `store`.
    ///
    /// A missing snapshot starts the registry empty. A malformed or
    /// unreadable one is logged and also starts it empty.
    pub fn init(store: S, clock: C, settings: RegistrySettings) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut registry = Self {
            records: HashMap::new(),
            reserved: HashSet::new(),
            store,
            clock,
            rng,
            settings,
        };

        registry.load();
        info!(
            target: LOG_TARGET,
            records = registry.records.len(),
            "UrlRegistry initialized"
        );

        registry
    }

    /// Creates a short code for `request.original_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] if:
    /// - The URL is not a syntactically valid absolute URL
    /// - The validity is not a positive number of minutes
    /// - The custom code does not match `^[A-Za-z0-9]{3,12}$`
    ///
    /// Returns [`RegistryError::Conflict`] if the custom code is reserved.
    ///
    /// Returns [`RegistryError::Exhaustion`] if no free random code was found
    /// within the configured number of attempts.
    ///
    /// Nothing is mutated when an error is returned.
    pub fn shorten(&mut self, request: ShortenRequest) -> Result<UrlRecord, RegistryError> {
        info!(
            target: LOG_TARGET,
            original_url = %request.original_url,
            validity_minutes = ?request.validity_minutes,
            custom_short_code = ?request.custom_short_code,
            "Shortening URL request"
        );

        let result = self.try_shorten(request);

        if let Err(e) = &result {
            error!(
                target: LOG_TARGET,
                error_code = e.code(),
                details = %e.details(),
                "{}",
                e
            );
        }

        result
    }

    fn try_shorten(&mut self, request: ShortenRequest) -> Result<UrlRecord, RegistryError> {
        validate_url(&request.original_url).map_err(|e| {
            RegistryError::bad_request(
                "invalid URL",
                json!({ "url": request.original_url, "reason": e.to_string() }),
            )
        })?;

        let validity_minutes = request
            .validity_minutes
            .unwrap_or(self.settings.default_validity_minutes);
        let created_at = self.clock.now();

        let expires_at = Some(validity_minutes)
            .filter(|m| *m > 0)
            .and_then(Duration::try_minutes)
            .and_then(|window| created_at.checked_add_signed(window))
            .ok_or_else(|| {
                RegistryError::bad_request(
                    "validity must be a positive integer",
                    json!({ "validity_minutes": validity_minutes }),
                )
            })?;

        let (short_code, is_custom) = match request.custom_short_code {
            Some(custom) => {
                validate_custom_code(&custom)?;

                if self.reserved.contains(&custom) {
                    return Err(RegistryError::conflict(
                        "code already exists",
                        json!({ "code": custom }),
                    ));
                }

                (custom, true)
            }
            None => {
                let reserved = &self.reserved;
                let code = self
                    .settings
                    .code_generator
                    .generate_unique(&mut self.rng, |c| reserved.contains(c))?;

                (code, false)
            }
        };

        let record = UrlRecord::new(
            request.original_url,
            short_code.clone(),
            is_custom,
            created_at,
            validity_minutes,
            expires_at,
        );

        self.reserved.insert(short_code.clone());
        self.records.insert(short_code.clone(), record.clone());
        self.persist();

        info!(
            target: LOG_TARGET,
            short_code = %short_code,
            original_url = %record.original_url,
            expires_at = %record.expires_at,
            "URL shortened successfully"
        );

        Ok(record)
    }

    /// Looks up a short code.
    ///
    /// Returns `None` for unknown codes. Expired records are still returned;
    /// their expiry flag is set (and persisted) the first time a lookup
    /// observes that the clock is past `expires_at`.
    pub fn resolve(&mut self, short_code: &str) -> Option<UrlRecord> {
        self.refresh(short_code)?;
        self.records.get(short_code).cloned()
    }

    /// Refreshes the expiry flag of one record and reports whether it is
    /// expired. `None` means the code is unknown.
    fn refresh(&mut self, short_code: &str) -> Option<bool> {
        let now = self.clock.now();

        let Some(record) = self.records.get_mut(short_code) else {
            warn!(target: LOG_TARGET, short_code, "Short code not found");
            return None;
        };

        if record.refresh_expiry(now) {
            warn!(
                target: LOG_TARGET,
                short_code,
                expires_at = %record.expires_at,
                "URL has expired"
            );
            self.persist();
            return Some(true);
        }

        debug!(
            target: LOG_TARGET,
            short_code,
            expired = record.expired,
            "Short code resolved"
        );
        Some(record.expired)
    }

    /// Appends a click to a live record.
    ///
    /// Returns `false` without recording anything when the code is unknown or
    /// the record has expired.
    pub fn record_click(&mut self, short_code: &str, click: NewClick) -> bool {
        if self.refresh(short_code) != Some(false) {
            warn!(
                target: LOG_TARGET,
                short_code,
                source = %click.source,
                "Cannot record click for expired or missing URL"
            );
            return false;
        }

        let event = ClickEvent::new(
            self.clock.now(),
            click.source.clone(),
            best_effort_location(&mut self.rng).to_string(),
            click.user_agent_or_unknown(),
        );

        let Some(record) = self.records.get_mut(short_code) else {
            return false;
        };
        record.clicks.push(event);
        let total = record.click_count();
        self.persist();

        info!(
            target: LOG_TARGET,
            short_code,
            source = %click.source,
            clicks = total,
            "Click recorded"
        );
        true
    }

    /// Returns every record, newest first.
    ///
    /// Expiry flags are refreshed first; the snapshot is written only when at
    /// least one flag flipped.
    pub fn list(&mut self) -> Vec<UrlRecord> {
        let now = self.clock.now();

        let flipped = self
            .records
            .values_mut()
            .map(|record| record.refresh_expiry(now))
            .filter(|flipped| *flipped)
            .count();

        if flipped > 0 {
            self.persist();
        }

        let mut records: Vec<UrlRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.short_code.cmp(&b.short_code))
        });

        debug!(
            target: LOG_TARGET,
            count = records.len(),
            newly_expired = flipped,
            "Listed URLs"
        );
        records
    }

    /// Deletes a record and frees its code.
    ///
    /// Returns whether a record existed.
    pub fn remove(&mut self, short_code: &str) -> bool {
        if self.records.remove(short_code).is_none() {
            warn!(target: LOG_TARGET, short_code, "URL not found for deletion");
            return false;
        }

        self.reserved.remove(short_code);
        self.persist();

        info!(target: LOG_TARGET, short_code, "URL deleted");
        true
    }

    /// Computes aggregate counts against the current time.
    ///
    /// A record counts as expired when its flag is set or the clock is past
    /// `expires_at`. Flags are not touched.
    pub fn stats(&self) -> RegistryStats {
        let now = self.clock.now();

        let total = self.records.len();
        let expired = self
            .records
            .values()
            .filter(|record| record.is_expired_at(now))
            .count();
        let total_clicks = self.records.values().map(UrlRecord::click_count).sum();

        let stats = RegistryStats {
            total,
            active: total - expired,
            expired,
            total_clicks,
        };

        debug!(
            target: LOG_TARGET,
            total = stats.total,
            active = stats.active,
            expired = stats.expired,
            total_clicks = stats.total_clicks,
            "Statistics computed"
        );
        stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if `short_code` is currently reserved.
    pub fn contains(&self, short_code: &str) -> bool {
        self.reserved.contains(short_code)
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load(&mut self) {
        let payload = match self.store.get(STORAGE_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(target: LOG_TARGET, "No data in mirror, starting empty");
                return;
            }
            Err(e) => {
                error!(target: LOG_TARGET, error = %e, "Failed to load data from mirror");
                return;
            }
        };

        match snapshot::decode(&payload, self.clock.now()) {
            Ok(records) => {
                let count = records.len();
                for record in records {
                    self.reserved.insert(record.short_code.clone());
                    self.records.insert(record.short_code.clone(), record);
                }
                info!(target: LOG_TARGET, count, "Data loaded from mirror");
            }
            Err(e) => {
                error!(target: LOG_TARGET, error = %e, "Failed to load data from mirror");
            }
        }
    }

    fn persist(&self) {
        let result = snapshot::encode(self.records.values())
            .and_then(|payload| self.store.set(STORAGE_KEY, &payload));

        match result {
            Ok(()) => debug!(
                target: LOG_TARGET,
                count = self.records.len(),
                "Data saved to mirror"
            ),
            Err(e) => error!(target: LOG_TARGET, error = %e, "Failed to save data to mirror"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::ManualClock;
    use crate::domain::entities::click::SIMULATED_LOCATIONS;
    use crate::domain::repositories::{MirrorError, MockMirrorStore};
    use crate::infrastructure::persistence::MemoryStore;

    fn settings() -> RegistrySettings {
        RegistrySettings {
            rng_seed: Some(11),
            ..RegistrySettings::default()
        }
    }

    fn registry() -> (UrlRegistry<MemoryStore, ManualClock>, MemoryStore, ManualClock) {
        let store = MemoryStore::new();
        let clock = ManualClock::starting_now();
        let registry = UrlRegistry::init(store.clone(), clock.clone(), settings());
        (registry, store, clock)
    }

    fn mock_store(writes: usize) -> MockMirrorStore {
        let mut store = MockMirrorStore::new();
        store.expect_get().times(1).returning(|_| Ok(None));
        store.expect_set().times(writes).returning(|_, _| Ok(()));
        store
    }

    #[test]
    fn test_shorten_then_resolve() {
        let (mut registry, _, _) = registry();

        let created = registry
            .shorten(ShortenRequest::new("https://example.com").with_validity(15))
            .unwrap();
        let resolved = registry.resolve(&created.short_code).unwrap();

        assert_eq!(resolved.original_url, "https://example.com");
        assert_eq!(
            resolved.expires_at,
            resolved.created_at + Duration::seconds(15 * 60)
        );
        assert!(resolved.clicks.is_empty());
        assert!(!resolved.expired);
        assert_eq!(resolved, created);
    }

    #[test]
    fn test_shorten_default_validity() {
        let (mut registry, _, _) = registry();

        let record = registry
            .shorten(ShortenRequest::new("https://example.com"))
            .unwrap();

        assert_eq!(record.validity_minutes, 30);
        assert_eq!(record.expires_at, record.created_at + Duration::minutes(30));
    }

    #[test]
    fn test_shorten_generated_code() {
        let (mut registry, _, _) = registry();

        let record = registry
            .shorten(ShortenRequest::new("https://example.com"))
            .unwrap();

        assert_eq!(record.short_code.len(), 6);
        assert!(record.short_code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!record.is_custom);
        assert!(registry.contains(&record.short_code));
    }

    #[test]
    fn test_shorten_custom_code() {
        let (mut registry, _, _) = registry();

        let record = registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();

        assert_eq!(record.short_code, "abc");
        assert!(record.is_custom);
    }

    #[test]
    fn test_shorten_persists_before_returning() {
        let (mut registry, store, _) = registry();

        let record = registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();

        let raw = store.raw(STORAGE_KEY).unwrap();
        assert!(raw.contains(&record.short_code));
    }

    #[test]
    fn test_shorten_invalid_url() {
        let mut registry = UrlRegistry::init(mock_store(0), ManualClock::starting_now(), settings());

        let err = registry
            .shorten(ShortenRequest::new("not a url"))
            .unwrap_err();

        assert!(matches!(err, RegistryError::Validation { .. }));
        assert_eq!(err.to_string(), "invalid URL");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_shorten_non_positive_validity() {
        let mut registry = UrlRegistry::init(mock_store(0), ManualClock::starting_now(), settings());

        for minutes in [0, -5] {
            let err = registry
                .shorten(ShortenRequest::new("https://example.com").with_validity(minutes))
                .unwrap_err();

            assert!(matches!(err, RegistryError::Validation { .. }));
            assert_eq!(err.to_string(), "validity must be a positive integer");
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_shorten_overflowing_validity() {
        let (mut registry, _, _) = registry();

        let err = registry
            .shorten(ShortenRequest::new("https://example.com").with_validity(i64::MAX))
            .unwrap_err();

        assert!(matches!(err, RegistryError::Validation { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_shorten_invalid_custom_code() {
        let mut registry = UrlRegistry::init(mock_store(0), ManualClock::starting_now(), settings());

        for code in ["ab", "abcdefghijklm", "bad-code", ""] {
            let err = registry
                .shorten(ShortenRequest::new("https://example.com").with_custom_code(code))
                .unwrap_err();

            assert!(matches!(err, RegistryError::Validation { .. }));
            assert_eq!(err.to_string(), "invalid custom code");
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_shorten_custom_code_conflict() {
        let (mut registry, _, _) = registry();

        registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();
        let err = registry
            .shorten(ShortenRequest::new("https://b.com").with_custom_code("abc"))
            .unwrap_err();

        assert!(matches!(err, RegistryError::Conflict { .. }));
        assert_eq!(err.to_string(), "code already exists");

        let records = registry.list();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].short_code, "abc");
        assert_eq!(records[0].original_url, "https://a.com");
    }

    #[test]
    fn test_conflict_does_not_write() {
        let mut registry = UrlRegistry::init(mock_store(1), ManualClock::starting_now(), settings());

        registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();
        assert!(
            registry
                .shorten(ShortenRequest::new("https://b.com").with_custom_code("abc"))
                .is_err()
        );
    }

    #[test]
    fn test_expired_code_stays_reserved() {
        let (mut registry, _, clock) = registry();

        registry
            .shorten(
                ShortenRequest::new("https://a.com")
                    .with_validity(1)
                    .with_custom_code("abc"),
            )
            .unwrap();
        clock.advance(Duration::minutes(5));
        assert!(registry.resolve("abc").unwrap().expired);

        let err = registry
            .shorten(ShortenRequest::new("https://b.com").with_custom_code("abc"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Conflict { .. }));
    }

    #[test]
    fn test_shorten_exhaustion() {
        let store = MemoryStore::new();
        let settings = RegistrySettings {
            code_generator: CodeGenerator::new(3, 100)
                .and_then(|g| g.with_alphabet(b"a"))
                .unwrap(),
            ..settings()
        };
        let mut registry = UrlRegistry::init(store, ManualClock::starting_now(), settings);

        let first = registry
            .shorten(ShortenRequest::new("https://a.com"))
            .unwrap();
        assert_eq!(first.short_code, "aaa");

        let err = registry
            .shorten(ShortenRequest::new("https://b.com"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Exhaustion { .. }));
        assert_eq!(err.to_string(), "unable to allocate code");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_unknown() {
        let (mut registry, _, _) = registry();
        assert!(registry.resolve("nope").is_none());
    }

    #[test]
    fn test_resolve_marks_expired_after_window() {
        let (mut registry, _, clock) = registry();

        let record = registry
            .shorten(ShortenRequest::new("https://example.com").with_validity(1))
            .unwrap();
        assert_eq!(record.expires_at, record.created_at + Duration::seconds(60));

        clock.advance(Duration::seconds(60));
        assert!(!registry.resolve(&record.short_code).unwrap().expired);

        clock.advance(Duration::seconds(1));
        assert!(registry.resolve(&record.short_code).unwrap().expired);
    }

    #[test]
    fn test_resolve_expiry_marking_is_idempotent() {
        let clock = ManualClock::starting_now();
        // One write for the shorten, one for the flag flip.
        let mut registry = UrlRegistry::init(mock_store(2), clock.clone(), settings());

        let record = registry
            .shorten(ShortenRequest::new("https://example.com").with_validity(1))
            .unwrap();
        clock.advance(Duration::seconds(61));

        let first = registry.resolve(&record.short_code).unwrap();
        let second = registry.resolve(&record.short_code).unwrap();

        assert!(first.expired);
        assert!(second.expired);
        assert_eq!(first, second);
    }

    #[test]
    fn test_expiry_flag_is_persisted() {
        let (mut registry, store, clock) = registry();

        registry
            .shorten(
                ShortenRequest::new("https://a.com")
                    .with_validity(1)
                    .with_custom_code("abc"),
            )
            .unwrap();
        clock.advance(Duration::minutes(2));
        registry.resolve("abc");

        let raw = store.raw(STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["isExpired"], true);
    }

    #[test]
    fn test_record_click() {
        let (mut registry, store, _) = registry();

        registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();

        assert!(registry.record_click("abc", NewClick::new("email", Some("Mozilla/5.0"))));
        assert!(registry.record_click("abc", NewClick::default()));

        let record = registry.resolve("abc").unwrap();
        assert_eq!(record.clicks.len(), 2);
        assert_eq!(record.clicks[0].source, "email");
        assert_eq!(record.clicks[0].user_agent, "Mozilla/5.0");
        assert_eq!(record.clicks[1].source, "direct");
        assert_eq!(record.clicks[1].user_agent, "Unknown");
        assert!(SIMULATED_LOCATIONS.contains(&record.clicks[0].location.as_str()));

        let raw = store.raw(STORAGE_KEY).unwrap();
        assert!(raw.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_record_click_unknown_code() {
        let (mut registry, _, _) = registry();

        registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();

        assert!(!registry.record_click("zzz", NewClick::default()));
        assert_eq!(registry.stats().total_clicks, 0);
    }

    #[test]
    fn test_record_click_expired_code() {
        let (mut registry, _, clock) = registry();

        registry
            .shorten(
                ShortenRequest::new("https://a.com")
                    .with_validity(1)
                    .with_custom_code("abc"),
            )
            .unwrap();
        assert!(registry.record_click("abc", NewClick::default()));

        clock.advance(Duration::seconds(61));

        assert!(!registry.record_click("abc", NewClick::default()));
        let record = registry.resolve("abc").unwrap();
        assert!(record.expired);
        assert_eq!(record.clicks.len(), 1);
    }

    #[test]
    fn test_list_sorted_newest_first() {
        let (mut registry, _, clock) = registry();

        for code in ["one", "two", "three"] {
            registry
                .shorten(ShortenRequest::new("https://example.com").with_custom_code(code))
                .unwrap();
            clock.advance(Duration::seconds(1));
        }

        let codes: Vec<String> = registry
            .list()
            .into_iter()
            .map(|r| r.short_code)
            .collect();
        assert_eq!(codes, vec!["three", "two", "one"]);
    }

    #[test]
    fn test_list_refreshes_flags() {
        let (mut registry, _, clock) = registry();

        registry
            .shorten(
                ShortenRequest::new("https://a.com")
                    .with_validity(1)
                    .with_custom_code("short"),
            )
            .unwrap();
        registry
            .shorten(
                ShortenRequest::new("https://b.com")
                    .with_validity(60)
                    .with_custom_code("long"),
            )
            .unwrap();
        clock.advance(Duration::minutes(2));

        let records = registry.list();
        let short = records.iter().find(|r| r.short_code == "short").unwrap();
        let long = records.iter().find(|r| r.short_code == "long").unwrap();
        assert!(short.expired);
        assert!(!long.expired);
    }

    #[test]
    fn test_list_writes_only_when_flag_flips() {
        let clock = ManualClock::starting_now();
        // shorten + one flip; the other list calls must not write.
        let mut registry = UrlRegistry::init(mock_store(2), clock.clone(), settings());

        registry
            .shorten(ShortenRequest::new("https://a.com").with_validity(1))
            .unwrap();
        registry.list();
        clock.advance(Duration::minutes(2));
        registry.list();
        registry.list();
    }

    #[test]
    fn test_remove() {
        let (mut registry, _, _) = registry();

        registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();

        assert!(registry.remove("abc"));
        assert!(!registry.remove("abc"));
        assert!(registry.resolve("abc").is_none());
        assert!(!registry.contains("abc"));
    }

    #[test]
    fn test_removed_code_can_be_reused() {
        let (mut registry, _, _) = registry();

        registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();
        registry.remove("abc");

        let record = registry
            .shorten(ShortenRequest::new("https://b.com").with_custom_code("abc"))
            .unwrap();
        assert_eq!(record.original_url, "https://b.com");
    }

    #[test]
    fn test_remove_unknown_does_not_write() {
        let mut registry = UrlRegistry::init(mock_store(0), ManualClock::starting_now(), settings());
        assert!(!registry.remove("abc"));
    }

    #[test]
    fn test_stats_after_deletion() {
        let (mut registry, _, _) = registry();

        for code in ["one", "two", "three"] {
            registry
                .shorten(ShortenRequest::new("https://example.com").with_custom_code(code))
                .unwrap();
        }
        registry.record_click("one", NewClick::default());
        registry.record_click("one", NewClick::default());
        registry.record_click("two", NewClick::default());
        registry.record_click("three", NewClick::default());
        registry.remove("three");

        let stats = registry.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.total_clicks, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.expired, 0);
    }

    #[test]
    fn test_stats_counts_unflagged_expiry_without_mutating() {
        let (mut registry, _, clock) = registry();

        registry
            .shorten(
                ShortenRequest::new("https://a.com")
                    .with_validity(1)
                    .with_custom_code("old"),
            )
            .unwrap();
        registry
            .shorten(ShortenRequest::new("https://b.com").with_custom_code("new"))
            .unwrap();
        clock.advance(Duration::minutes(2));

        let stats = registry.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.active, 1);
        assert!(!registry.records["old"].expired);
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let mut store = MockMirrorStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_set()
            .returning(|_, _| Err(MirrorError::Backend("disk full".to_string())));
        let mut registry = UrlRegistry::init(store, ManualClock::starting_now(), settings());

        let record = registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();

        assert_eq!(record.short_code, "abc");
        assert!(registry.record_click("abc", NewClick::default()));
        assert_eq!(registry.resolve("abc").unwrap().clicks.len(), 1);
    }

    #[test]
    fn test_load_failure_starts_empty() {
        let mut store = MockMirrorStore::new();
        store
            .expect_get()
            .returning(|_| Err(MirrorError::Backend("connection refused".to_string())));
        store.expect_set().returning(|_, _| Ok(()));

        let mut registry = UrlRegistry::init(store, ManualClock::starting_now(), settings());

        assert!(registry.is_empty());
        assert!(
            registry
                .shorten(ShortenRequest::new("https://a.com"))
                .is_ok()
        );
    }

    #[test]
    fn test_malformed_snapshot_starts_empty() {
        let store = MemoryStore::new().with_entry(STORAGE_KEY, "{definitely not json");
        let registry = UrlRegistry::init(store, ManualClock::starting_now(), settings());

        assert!(registry.is_empty());
    }

    #[test]
    fn test_snapshot_with_invalid_code_starts_empty() {
        let (mut registry, store, clock) = registry();
        registry
            .shorten(ShortenRequest::new("https://a.com").with_custom_code("abc"))
            .unwrap();

        let mut records = registry.list();
        let mut renamed = records[0].clone();
        renamed.short_code = "a b!".to_string();
        records.push(renamed);
        let payload = snapshot::encode(&records).unwrap();
        store.set(STORAGE_KEY, &payload).unwrap();

        let reloaded = UrlRegistry::init(store, clock, settings());

        assert!(reloaded.is_empty());
        assert!(!reloaded.contains("a b!"));
    }

    #[test]
    fn test_reload_round_trip() {
        let (mut registry, store, clock) = registry();

        registry
            .shorten(
                ShortenRequest::new("https://a.com")
                    .with_validity(1)
                    .with_custom_code("soon"),
            )
            .unwrap();
        registry
            .shorten(
                ShortenRequest::new("https://b.com")
                    .with_validity(120)
                    .with_custom_code("later"),
            )
            .unwrap();
        registry.record_click("later", NewClick::default());
        registry.record_click("later", NewClick::default());
        let before = registry.list();

        clock.advance(Duration::minutes(5));
        let mut reloaded = UrlRegistry::init(store, clock, settings());
        let after = reloaded.list();

        assert_eq!(after.len(), before.len());
        for (a, b) in after.iter().zip(before.iter()) {
            assert_eq!(a.short_code, b.short_code);
            assert_eq!(a.id, b.id);
            assert_eq!(a.expires_at, b.expires_at);
            assert_eq!(a.clicks.len(), b.clicks.len());
        }
        let soon = after.iter().find(|r| r.short_code == "soon").unwrap();
        let later = after.iter().find(|r| r.short_code == "later").unwrap();
        assert!(soon.expired);
        assert!(!later.expired);
        assert!(reloaded.contains("soon"));
    }
}
