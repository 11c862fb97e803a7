use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use reqwest::Method;
use sha1::Sha1;
use url::Url;

use super::error::DnsError;

type HmacSha1 = Hmac<Sha1>;

/// Per-request authentication material for the Websupport API.
///
/// The signature is `HMAC-SHA1(secret, "<METHOD> <path> <unix-timestamp>")`
/// in lowercase hex. `date` carries the same instant as RFC3339 and must be
/// sent as the `Date` header so the server can check the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    pub signature: String,
    pub date: String,
}

impl RequestSignature {
    pub fn new(
        method: &Method,
        url: &str,
        secret: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, DnsError> {
        let parsed = Url::parse(url)
            .map_err(|e| DnsError::Config(format!("invalid request URL '{}': {}", url, e)))?;

        let canonical = format!("{} {} {}", method.as_str(), parsed.path(), now.timestamp());

        let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
            .map_err(|e| DnsError::Config(format!("invalid signing key: {}", e)))?;
        mac.update(canonical.as_bytes());

        Ok(Self {
            signature: hex::encode(mac.finalize().into_bytes()),
            date: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}
