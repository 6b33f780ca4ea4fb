//! Multi-entry shortening for the submission front end.
//!
//! Entries arrive as raw form input. Rows with a blank URL are skipped and
//! blank optional fields mean "not supplied". Each remaining entry is
//! processed independently: one failure is reported in its slot and the rest
//! still run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};

use crate::application::services::url_registry::UrlRegistry;
use crate::domain::clock::Clock;
use crate::domain::entities::ShortenRequest;
use crate::domain::repositories::MirrorStore;
use crate::error::{ErrorInfo, RegistryError};
use crate::utils::short_url::short_url;

const LOG_TARGET: &str = "url_form";

/// Maximum number of entries accepted in one submission.
pub const BATCH_LIMIT: usize = 5;

/// One row of a submission, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub original_url: String,
    #[serde(default)]
    pub validity_minutes: Option<String>,
    #[serde(default)]
    pub custom_short_code: Option<String>,
}

impl BatchEntry {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Self::default()
        }
    }

    pub fn with_validity(mut self, minutes: impl Into<String>) -> Self {
        self.validity_minutes = Some(minutes.into());
        self
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_short_code = Some(code.into());
        self
    }

    /// Converts raw input into a registry request.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] when the validity is present but
    /// not an integer.
    pub fn into_request(self) -> Result<ShortenRequest, RegistryError> {
        let validity_minutes = match non_blank(self.validity_minutes) {
            Some(raw) => Some(raw.trim().parse::<i64>().map_err(|_| {
                RegistryError::bad_request(
                    "validity must be a positive integer",
                    json!({ "validity_minutes": raw }),
                )
            })?),
            None => None,
        };

        Ok(ShortenRequest {
            original_url: self.original_url,
            validity_minutes,
            custom_short_code: non_blank(self.custom_short_code).map(|c| c.trim().to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Outcome of a submission.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub items: Vec<BatchItem>,
}

/// Result for one entry, in submission order.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItem {
    Success {
        original_url: String,
        short_code: String,
        short_url: String,
        expires_at: DateTime<Utc>,
    },
    Failure {
        original_url: String,
        error: ErrorInfo,
    },
}

impl BatchItem {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Counts for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Shortens every entry with a non-blank URL, collecting per-entry results.
///
/// Skipped rows get no item and are not counted in the summary.
///
/// # Errors
///
/// Returns [`RegistryError::Validation`] without processing anything when
/// more than [`BATCH_LIMIT`] entries are submitted.
pub fn shorten_batch<S: MirrorStore, C: Clock>(
    registry: &mut UrlRegistry<S, C>,
    entries: Vec<BatchEntry>,
    base_url: &str,
) -> Result<BatchReport, RegistryError> {
    if entries.len() > BATCH_LIMIT {
        return Err(RegistryError::bad_request(
            "too many entries",
            json!({ "limit": BATCH_LIMIT, "provided": entries.len() }),
        ));
    }

    let mut items = Vec::with_capacity(entries.len());
    let mut successful = 0;
    let mut failed = 0;

    for (index, entry) in entries.into_iter().enumerate() {
        if entry.original_url.trim().is_empty() {
            debug!(target: LOG_TARGET, entry = index, "Skipping entry with blank URL");
            continue;
        }

        let original_url = entry.original_url.clone();

        match entry
            .into_request()
            .and_then(|request| registry.shorten(request))
        {
            Ok(record) => {
                successful += 1;
                info!(
                    target: LOG_TARGET,
                    entry = index,
                    short_code = %record.short_code,
                    "URL shortened successfully in form"
                );
                items.push(BatchItem::Success {
                    original_url,
                    short_url: short_url(base_url, &record.short_code),
                    short_code: record.short_code,
                    expires_at: record.expires_at,
                });
            }
            Err(err) => {
                failed += 1;
                error!(
                    target: LOG_TARGET,
                    entry = index,
                    error = %err,
                    "Failed to shorten URL in form"
                );
                items.push(BatchItem::Failure {
                    original_url,
                    error: err.to_error_info(),
                });
            }
        }
    }

    Ok(BatchReport {
        summary: BatchSummary {
            total: items.len(),
            successful,
            failed,
        },
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::url_registry::RegistrySettings;
    use crate::domain::clock::ManualClock;
    use crate::infrastructure::persistence::MemoryStore;

    const BASE: &str = "https://s.example.com";

    fn registry() -> UrlRegistry<MemoryStore, ManualClock> {
        UrlRegistry::init(
            MemoryStore::new(),
            ManualClock::starting_now(),
            RegistrySettings::default(),
        )
    }

    #[test]
    fn test_into_request_blank_fields_are_absent() {
        let request = BatchEntry::new("https://a.com")
            .with_validity("  ")
            .with_custom_code("")
            .into_request()
            .unwrap();

        assert_eq!(request.validity_minutes, None);
        assert_eq!(request.custom_short_code, None);
    }

    #[test]
    fn test_into_request_parses_validity() {
        let request = BatchEntry::new("https://a.com")
            .with_validity(" 45 ")
            .with_custom_code(" promo ")
            .into_request()
            .unwrap();

        assert_eq!(request.validity_minutes, Some(45));
        assert_eq!(request.custom_short_code.as_deref(), Some("promo"));
    }

    #[test]
    fn test_into_request_rejects_non_integer_validity() {
        for raw in ["abc", "1.5", "10m"] {
            let err = BatchEntry::new("https://a.com")
                .with_validity(raw)
                .into_request()
                .unwrap_err();
            assert_eq!(err.to_string(), "validity must be a positive integer");
        }
    }

    #[test]
    fn test_batch_all_successful() {
        let mut registry = registry();

        let report = shorten_batch(
            &mut registry,
            vec![
                BatchEntry::new("https://a.com"),
                BatchEntry::new("https://b.com").with_custom_code("bee"),
            ],
            BASE,
        )
        .unwrap();

        assert_eq!(
            report.summary,
            BatchSummary {
                total: 2,
                successful: 2,
                failed: 0
            }
        );
        match &report.items[1] {
            BatchItem::Success {
                short_code,
                short_url,
                ..
            } => {
                assert_eq!(short_code, "bee");
                assert_eq!(short_url, "https://s.example.com/bee");
            }
            other => panic!("unexpected item: {other:?}"),
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let mut registry = registry();

        let report = shorten_batch(
            &mut registry,
            vec![
                BatchEntry::new("https://a.com").with_custom_code("dup"),
                BatchEntry::new("not a url"),
                BatchEntry::new("https://b.com").with_custom_code("dup"),
                BatchEntry::new("https://c.com").with_validity("-1"),
                BatchEntry::new("https://d.com"),
            ],
            BASE,
        )
        .unwrap();

        assert_eq!(report.summary.total, 5);
        assert_eq!(report.summary.successful, 2);
        assert_eq!(report.summary.failed, 3);

        let outcomes: Vec<bool> = report.items.iter().map(BatchItem::is_success).collect();
        assert_eq!(outcomes, vec![true, false, false, false, true]);

        match &report.items[2] {
            BatchItem::Failure { error, .. } => assert_eq!(error.code, "conflict"),
            other => panic!("unexpected item: {other:?}"),
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_batch_skips_blank_urls() {
        let mut registry = registry();

        let report = shorten_batch(
            &mut registry,
            vec![
                BatchEntry::new(""),
                BatchEntry::new("https://a.com").with_custom_code("aaa"),
                BatchEntry::new("   ").with_custom_code("bbb"),
            ],
            BASE,
        )
        .unwrap();

        assert_eq!(
            report.summary,
            BatchSummary {
                total: 1,
                successful: 1,
                failed: 0
            }
        );
        assert_eq!(report.items.len(), 1);
        assert!(registry.contains("aaa"));
        assert!(!registry.contains("bbb"));
    }

    #[test]
    fn test_batch_over_limit_processes_nothing() {
        let mut registry = registry();
        let entries = (0..6)
            .map(|i| BatchEntry::new(format!("https://example.com/{i}")))
            .collect();

        let err = shorten_batch(&mut registry, entries, BASE).unwrap_err();

        assert!(matches!(err, RegistryError::Validation { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_report_serializes_untagged() {
        let mut registry = registry();

        let report = shorten_batch(
            &mut registry,
            vec![BatchEntry::new("nope"), BatchEntry::new("https://a.com")],
            BASE,
        )
        .unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["items"][0]["error"]["code"], "validation_error");
        assert!(value["items"][1]["short_url"].is_string());
    }
}
