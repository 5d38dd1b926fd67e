// src/analyzer/validate.rs
// =============================================================================
// Syntactic acceptance check for the URL a caller asks us to analyze.
//
// Two gates, both must pass:
// 1. A shape check: http or https, a host (domain name, bracketed IPv6
//    literal or dotted IPv4), optional port, optional path
// 2. A structural parse with the `url` crate
//
// No network access happens here.
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::AnalyzeError;

// Compiled on first use and never mutated afterwards
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^https?://([a-zA-Z0-9\-\.]+|\[[0-9a-fA-F:]+\]|[0-9]{1,3}(\.[0-9]{1,3}){3})(:[0-9]+)?(/.*)?$",
    )
    .expect("URL shape pattern is valid")
});

/// Validates `raw` and returns it as a parsed URL
///
/// The returned URL always has a path ("http://example.com" becomes
/// "http://example.com/").
pub fn validate_url(raw: &str) -> Result<Url, AnalyzeError> {
    if !URL_SHAPE.is_match(raw) {
        return Err(AnalyzeError::InvalidUrl);
    }

    let url = Url::parse(raw).map_err(|_| AnalyzeError::InvalidUrl)?;
    if url.host_str().is_none() {
        return Err(AnalyzeError::InvalidUrl);
    }

    Ok(url)
}
