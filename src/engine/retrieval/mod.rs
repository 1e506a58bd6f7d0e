pub mod result;
pub mod router;
pub mod sources;
pub mod throttle;

pub use result::{ProviderContent, SourceExtract, StructuredDocument};
pub use router::Router;
pub use throttle::Throttle;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("No result: {reason}")]
    NotFound { reason: String },
    #[error("Transport failure{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    TransportFailure {
        status: Option<u16>,
        message: String,
    },
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },
    #[error("No credential configured for {provider}")]
    ConfigurationMissing { provider: &'static str },
}

impl AdapterError {
    pub fn not_found(reason: impl Into<String>) -> Self {
        AdapterError::NotFound {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        AdapterError::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub fn status(status: reqwest::StatusCode, body: &str) -> Self {
        AdapterError::TransportFailure {
            status: Some(status.as_u16()),
            message: if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                body.trim().chars().take(200).collect()
            },
        }
    }

    /// Short label used in logs and attempt traces.
    pub fn kind(&self) -> &'static str {
        match self {
            AdapterError::NotFound { .. } => "not_found",
            AdapterError::TransportFailure { .. } => "transport_failure",
            AdapterError::MalformedResponse { .. } => "malformed_response",
            AdapterError::ConfigurationMissing { .. } => "configuration_missing",
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(e: reqwest::Error) -> Self {
        let message = if e.is_timeout() {
            "Request timeout - the API took too long to respond".to_string()
        } else if e.is_connect() {
            "Connection error - unable to reach the API".to_string()
        } else if e.is_decode() {
            format!("Failed to decode response: {}", e)
        } else {
            format!("Network error: {}", e)
        };
        AdapterError::TransportFailure {
            status: e.status().map(|s| s.as_u16()),
            message,
        }
    }
}

/// Returns the credential only when it is set and is not a template placeholder.
pub fn usable_credential(value: Option<&str>) -> Option<&str> {
    let value = value?.trim();
    if value.is_empty() || value.starts_with("your_") || value.ends_with("_here") {
        None
    } else {
        Some(value)
    }
}
