//! Snapshot codec for the registry's record set.
//!
//! The snapshot is a JSON array of records with RFC 3339 timestamps. Decoding
//! recomputes expiry flags against the load-time instant; a flag that was
//! already set stays set.

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{MirrorError, MirrorResult};
use crate::utils::code_generator::validate_custom_code;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Fixed key the registry snapshot is stored under.
pub const STORAGE_KEY: &str = "shortened_urls";

/// Serializes `records` into the snapshot format.
pub fn encode<'a, I>(records: I) -> MirrorResult<String>
where
    I: IntoIterator<Item = &'a UrlRecord>,
{
    let records: Vec<&UrlRecord> = records.into_iter().collect();
    Ok(serde_json::to_string(&records)?)
}

/// Parses a snapshot and refreshes each record's expiry flag against `now`.
///
/// # Errors
///
/// Returns [`MirrorError::Serialization`] when the payload is not valid JSON
/// for a record list, and [`MirrorError::InvalidSnapshot`] when a short code
/// is malformed or appears twice. Partial results are never returned.
pub fn decode(payload: &str, now: DateTime<Utc>) -> MirrorResult<Vec<UrlRecord>> {
    let mut records: Vec<UrlRecord> = serde_json::from_str(payload)?;
    let mut seen = HashSet::with_capacity(records.len());

    for record in &mut records {
        if validate_custom_code(&record.short_code).is_err() {
            return Err(MirrorError::InvalidSnapshot(format!(
                "malformed short code '{}'",
                record.short_code
            )));
        }

        if !seen.insert(record.short_code.clone()) {
            return Err(MirrorError::InvalidSnapshot(format!(
                "duplicate short code '{}'",
                record.short_code
            )));
        }

        record.refresh_expiry(now);
    }

    Ok(records)
}
