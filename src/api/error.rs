use std::path::PathBuf;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub const MISSING_FILE_MESSAGE: &str = "Please select a CSV file first";

/// Failures from talking to the analysis service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caught before any network activity.
    #[error("{0}")]
    Validation(String),

    #[error("failed to read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response. `body` is the decoded JSON, or the raw text as a
    /// JSON string when it is not JSON.
    #[error("server responded with {status}")]
    Server {
        status: StatusCode,
        body: Option<Value>,
    },

    #[error("unexpected response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

impl ApiError {
    pub fn missing_file() -> Self {
        Self::Validation(MISSING_FILE_MESSAGE.to_string())
    }

    pub fn server(status: StatusCode, raw_body: &str) -> Self {
        let trimmed = raw_body.trim();
        let body = if trimmed.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(trimmed)
                    .unwrap_or_else(|_| Value::String(trimmed.to_string())),
            )
        };
        Self::Server { status, body }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Server { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Canonical reason phrase of the HTTP status, when one was received.
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            Self::Server { status, .. } => status.canonical_reason(),
            Self::Network(err) => err.status().and_then(|status| status.canonical_reason()),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
