//! Visit resolution for short codes.

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::application::services::url_registry::UrlRegistry;
use crate::domain::clock::Clock;
use crate::domain::entities::NewClick;
use crate::domain::repositories::MirrorStore;

const LOG_TARGET: &str = "redirect";

/// What a visitor to a short code should see.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectOutcome {
    /// Send the visitor on; the click has been recorded.
    Redirect { original_url: String },
    /// No record holds this code.
    NotFound,
    /// The record exists but its validity window has passed.
    Expired { expires_at: DateTime<Utc> },
    /// The record was live but the click could not be recorded.
    ClickRejected,
}

/// Resolves `short_code` and records a `direct` click when it is live.
pub fn follow<S: MirrorStore, C: Clock>(
    registry: &mut UrlRegistry<S, C>,
    short_code: &str,
    user_agent: Option<&str>,
) -> RedirectOutcome {
    info!(target: LOG_TARGET, short_code, "Redirect request received");

    let Some(record) = registry.resolve(short_code) else {
        warn!(target: LOG_TARGET, short_code, "Short URL not found for redirect");
        return RedirectOutcome::NotFound;
    };

    if record.expired {
        warn!(
            target: LOG_TARGET,
            short_code,
            expires_at = %record.expires_at,
            "Expired URL access attempt"
        );
        return RedirectOutcome::Expired {
            expires_at: record.expires_at,
        };
    }

    if !registry.record_click(short_code, NewClick::direct(user_agent)) {
        error!(target: LOG_TARGET, short_code, "Failed to record click for redirect");
        return RedirectOutcome::ClickRejected;
    }

    info!(
        target: LOG_TARGET,
        short_code,
        original_url = %record.original_url,
        "Click recorded successfully for redirect"
    );
    RedirectOutcome::Redirect {
        original_url: record.original_url,
    }
}
