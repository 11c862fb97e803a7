mod client;
mod domain;
mod error;
mod record;
mod signing;

pub use client::{Lookup, WebsupportClient, REQUEST_TIMEOUT, WEBSUPPORT_API_BASE};
pub use domain::{split_domain, ChallengeDomain};
pub use error::{DnsError, ProviderError};
pub use record::{Credentials, DnsRecord, DEFAULT_TTL, TXT};
pub use signing::RequestSignature;
