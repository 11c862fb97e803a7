use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Per-issuer solver configuration, decoded from the JSON the issuing
/// controller attaches to each challenge.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub email: String,
    #[serde(rename = "apiKeySecretRef")]
    pub api_key_secret_ref: SecretRef,
    #[serde(rename = "ApiKey")]
    pub api_key: String,
    #[serde(rename = "ApiSecret")]
    pub api_secret: String,
}

/// Reference to a named entry in the credential store. When `name` is set it
/// takes precedence over inline keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecretRef {
    pub name: String,
    pub key: String,
}

impl SolverConfig {
    /// Decodes raw solver config. No config at all is the empty default.
    pub fn from_json(raw: Option<&[u8]>) -> Result<Self> {
        match raw {
            None => Ok(Self::default()),
            Some(bytes) => serde_json::from_slice(bytes).context("error decoding solver config"),
        }
    }

    pub fn with_secret_ref(name: &str) -> Self {
        Self {
            api_key_secret_ref: SecretRef {
                name: name.to_string(),
                key: String::new(),
            },
            ..Self::default()
        }
    }
}

impl fmt::Debug for SolverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverConfig")
            .field("email", &self.email)
            .field("api_key_secret_ref", &self.api_key_secret_ref)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// A DNS-01 challenge as handed over by the issuing controller.
#[derive(Debug, Clone)]
pub struct ChallengeRequest {
    /// Fully-qualified record to publish, e.g. `_acme-challenge.example.com.`
    pub resolved_fqdn: String,
    /// Value of the TXT record.
    pub key: String,
    pub config: SolverConfig,
}
