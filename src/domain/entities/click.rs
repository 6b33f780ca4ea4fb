//! Click entity representing a single visit to a short code.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source tag used when the caller gives none.
pub const DEFAULT_CLICK_SOURCE: &str = "direct";

/// User agent recorded when the caller gives none.
pub const UNKNOWN_USER_AGENT: &str = "Unknown";

/// Labels used for the best-effort location of a click.
///
/// No geolocation is performed. A label is drawn at random, so the value is
/// illustrative only.
pub const SIMULATED_LOCATIONS: [&str; 5] = [
    "New York, US",
    "London, UK",
    "Tokyo, JP",
    "Sydney, AU",
    "Berlin, DE",
];

/// Picks a best-effort location label for a click.
pub fn best_effort_location<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    SIMULATED_LOCATIONS[rng.random_range(0..SIMULATED_LOCATIONS.len())]
}

/// A recorded visit to a short code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub source: String,
    /// Coarse, synthetic label. See [`SIMULATED_LOCATIONS`].
    pub location: String,
    pub user_agent: String,
}

impl ClickEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        source: String,
        location: String,
        user_agent: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            source,
            location,
            user_agent,
        }
    }
}

/// Input data for recording a click.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClick {
    pub source: String,
    pub user_agent: Option<String>,
}

impl NewClick {
    pub fn new(source: impl Into<String>, user_agent: Option<&str>) -> Self {
        Self {
            source: source.into(),
            user_agent: user_agent.map(|s| s.to_string()),
        }
    }

    /// A click arriving straight at the short URL.
    pub fn direct(user_agent: Option<&str>) -> Self {
        Self::new(DEFAULT_CLICK_SOURCE, user_agent)
    }

    pub(crate) fn user_agent_or_unknown(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| UNKNOWN_USER_AGENT.to_string())
    }
}

impl Default for NewClick {
    fn default() -> Self {
        Self::direct(None)
    }
}
