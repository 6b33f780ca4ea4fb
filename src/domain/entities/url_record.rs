//! URL record entity representing one shortening.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::click::ClickEvent;

/// A shortened URL with its expiry window and click history.
///
/// `created_at`, `validity_minutes` and `expires_at` are fixed at creation.
/// `expired` only ever moves from `false` to `true`, and `clicks` only grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub id: Uuid,
    pub original_url: String,
    pub short_code: String,
    #[serde(default)]
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
    pub validity_minutes: i64,
    pub expires_at: DateTime<Utc>,
    #[serde(rename = "isExpired", default)]
    pub expired: bool,
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
}

impl UrlRecord {
    /// Creates a fresh record with no clicks.
    pub fn new(
        original_url: String,
        short_code: String,
        is_custom: bool,
        created_at: DateTime<Utc>,
        validity_minutes: i64,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_url,
            short_code,
            is_custom,
            created_at,
            validity_minutes,
            expires_at,
            expired: false,
            clicks: Vec::new(),
        }
    }

    /// Returns true once `now` is strictly past the expiry instant.
    pub fn is_past_expiry(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns true if the record is flagged or past its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired || self.is_past_expiry(now)
    }

    /// Sets the expiry flag if `now` is past expiry.
    ///
    /// Returns true only when the flag flipped during this call.
    pub fn refresh_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if !self.expired && self.is_past_expiry(now) {
            self.expired = true;
            return true;
        }
        false
    }

    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }
}

/// Input data for creating a new record.
///
/// `None` fields fall back to registry defaults: the configured validity and a
/// generated code.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    pub original_url: String,
    pub validity_minutes: Option<i64>,
    pub custom_short_code: Option<String>,
}

impl ShortenRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Self::default()
        }
    }

    pub fn with_validity(mut self, minutes: i64) -> Self {
        self.validity_minutes = Some(minutes);
        self
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_short_code = Some(code.into());
        self
    }
}
