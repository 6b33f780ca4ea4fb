//! Rendering of full short URLs.

/// Joins a base URL and a short code.
///
/// A trailing slash on `base_url` is ignored.
pub fn short_url(base_url: &str, short_code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), short_code)
}
