// src/server/types.rs
// =============================================================================
// JSON bodies returned by the HTTP API.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Error body: `{"status_code": 502, "error": "bad gateway: no such host"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Same value as the HTTP status of the response
    pub status_code: u16,
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(status_code: u16, error: impl Into<String>) -> Self {
        Self {
            status_code,
            error: error.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Whether the service is healthy
    pub healthy: bool,
    /// Service version
    pub version: String,
}
