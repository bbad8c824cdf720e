//! Error types for uvalue

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UvalueError {
    // Transport errors
    #[error("Server responded with HTTP {status}{}", format_body(body))]
    HttpStatus { status: u16, body: String },

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    #[error("Malformed response: {reason}")]
    Decode { reason: String },

    // Readiness errors
    #[error("Backend is taking too long to wake up (waited {}s)", waited.as_secs())]
    ReadinessTimeout { waited: Duration },

    // Design errors
    #[error("Design is not ready to calculate: {}", problems.join(" "))]
    Validation { problems: Vec<String> },

    #[error("Layer not found: {id}")]
    LayerNotFound { id: String },

    #[error("Layer id already present in the assembly: {id}")]
    DuplicateLayer { id: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

fn format_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {}", body)
    }
}

impl UvalueError {
    /// Cold-start class of failure: connection problems, timeouts and gateway errors.
    pub fn is_transient(&self) -> bool {
        match self {
            UvalueError::Network { .. } | UvalueError::Timeout { .. } => true,
            UvalueError::HttpStatus { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// The request never produced an HTTP response.
    pub fn is_network_level(&self) -> bool {
        matches!(self, UvalueError::Network { .. } | UvalueError::Timeout { .. })
    }

    /// The server understood the request and refused it (4xx).
    pub fn is_server_rejected(&self) -> bool {
        matches!(self, UvalueError::HttpStatus { status, .. } if (400..500).contains(status))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, UvalueError::HttpStatus { status: 404, .. })
    }
}

impl From<serde_json::Error> for UvalueError {
    fn from(err: serde_json::Error) -> Self {
        UvalueError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UvalueError>;
