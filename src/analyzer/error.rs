// src/analyzer/error.rs
// =============================================================================
// Every way a single page analysis can fail.
//
// Each variant carries a fixed HTTP status code and a fixed user-facing
// message (its Display string). Link probe failures are NOT errors: they are
// reported as data in `inaccessible_links`.
// =============================================================================

use thiserror::Error;

/// Terminal failure of one `analyze` call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    /// The input is not an absolute http(s) URL
    #[error("invalid url")]
    InvalidUrl,

    /// DNS lookup for the target host failed
    #[error("bad gateway: no such host")]
    HostUnresolved,

    /// The request exceeded the configured fetch timeout
    #[error("gateway timeout: request timed out")]
    Timeout,

    /// The TLS handshake with the target failed
    #[error("bad gateway: TLS handshake failed")]
    TlsFailure,

    /// Any other transport failure
    #[error("bad gateway: failed to fetch target URL")]
    ConnectionFailure,

    /// The response body could not be turned into a document
    #[error("failed to parse document: {0}")]
    Parse(String),
}

impl AnalyzeError {
    /// HTTP status code the dispatch layer answers with
    pub fn status_code(&self) -> u16 {
        match self {
            AnalyzeError::InvalidUrl => 400,
            AnalyzeError::HostUnresolved
            | AnalyzeError::TlsFailure
            | AnalyzeError::ConnectionFailure => 502,
            AnalyzeError::Timeout => 504,
            AnalyzeError::Parse(_) => 500,
        }
    }
}
