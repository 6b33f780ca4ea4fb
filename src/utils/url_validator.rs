//! Syntactic validation of URLs submitted for shortening.
//!
//! Any absolute URL the WHATWG parser accepts is valid. The input is not
//! rewritten: callers store the string exactly as supplied.

use url::Url;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),
}

/// Parses `input` as an absolute URL.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for blank input and
/// [`UrlValidationError::InvalidFormat`] for anything the parser rejects,
/// including relative references such as `example.com`.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com").is_ok());
/// assert!(validate_url("mailto:test@example.com").is_ok());
/// assert!(validate_url("example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<Url, UrlValidationError> {
    if input.trim().is_empty() {
        return Err(UrlValidationError::Empty);
    }

    Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))
}
