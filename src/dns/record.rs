use std::fmt;

use serde::{Deserialize, Serialize};

pub const TXT: &str = "TXT";
pub const DEFAULT_TTL: u32 = 600;

#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// A DNS record as the Websupport API lists it.
///
/// The same type doubles as a search pattern for [`DnsRecord::matches`]:
/// an empty `content` or a zero `id`/`ttl` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    // Assigned by the provider; never part of a create/update body.
    #[serde(skip_serializing)]
    pub id: u64,
}

impl DnsRecord {
    pub fn txt(name: &str, content: &str, ttl: u32) -> Self {
        Self {
            record_type: TXT.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            ttl,
            id: 0,
        }
    }

    /// Returns true when `candidate` satisfies this record used as a pattern.
    pub fn matches(&self, candidate: &DnsRecord) -> bool {
        candidate.name == self.name
            && candidate.record_type == self.record_type
            && (self.content.is_empty() || candidate.content == self.content)
            && (self.id == 0 || candidate.id == self.id)
            && (self.ttl == 0 || candidate.ttl == self.ttl)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecordList {
    #[serde(default)]
    pub items: Vec<DnsRecord>,
}
