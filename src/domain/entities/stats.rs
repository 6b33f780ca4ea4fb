//! Aggregate registry statistics.

use serde::Serialize;

/// Counts across every record held by the registry.
///
/// `active + expired == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub total_clicks: usize,
}
