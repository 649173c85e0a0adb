//! Error types for remote calls
//!
//! Transport failures are typed so the retry layer can tell transient
//! conditions apart from responses that will never decode. Everything above
//! the transport uses `anyhow` with context.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single HTTP exchange with one of the remote services
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Network error calling {url}: {message}")]
    Network { url: String, message: String },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl TransportError {
    /// Timeouts, connection problems and non-2xx answers may succeed on a
    /// later attempt. A body that does not parse will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } | Self::Status { .. } => true,
            Self::Decode { .. } => false,
        }
    }

    pub(crate) fn from_reqwest(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                timeout,
            }
        } else if err.is_decode() {
            Self::Decode {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}
