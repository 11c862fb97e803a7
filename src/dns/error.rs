//! Error types for the Websupport DNS client.
//!
//! Callers decide on retries from the variant: only [`DnsError::Transport`]
//! is worth retrying, the client itself never retries.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::record::DnsRecord;

#[derive(Error, Debug)]
pub enum DnsError {
    /// Bad input to URL construction or request signing.
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection, resolution or timeout failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a status >= 400.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// No listed record matched the search pattern.
    #[error("{message}")]
    NotFound { pattern: DnsRecord, message: String },

    /// A successful response whose body was not the expected JSON.
    #[error("failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DnsError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, DnsError::Transport(_))
    }

    pub fn not_found(pattern: &DnsRecord) -> Self {
        DnsError::NotFound {
            message: format!(
                "no such record '{}' with content '{}' found",
                pattern.name, pattern.content
            ),
            pattern: pattern.clone(),
        }
    }
}

/// Decoded body of a Websupport error response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderError {
    /// The record the provider echoed back, if any.
    pub item: DnsRecord,
    /// HTTP status line, e.g. `503 Service Unavailable`.
    pub status: String,
    pub messages: Vec<String>,
}

impl ProviderError {
    /// Builds the error from a raw response body. Bodies that are not the
    /// documented shape still yield an error carrying the status line.
    pub fn from_body(status: String, body: &str) -> Self {
        let decoded: Value = serde_json::from_str(body).unwrap_or(Value::Null);

        // Item and messages are decoded separately so an odd field in the
        // echoed record never hides the provider's messages.
        let item: DnsRecord = decoded
            .get("item")
            .cloned()
            .and_then(|item| serde_json::from_value(item).ok())
            .unwrap_or_default();

        let messages: Vec<String> = decoded
            .pointer("/errors/content")
            .and_then(Value::as_array)
            .map(|content| {
                content
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            item,
            status,
            messages,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.messages.first() {
            Some(message) => write!(f, "{}", message),
            None => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for ProviderError {}
