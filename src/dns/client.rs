use std::time::Duration;

use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE, DATE};
use reqwest::{Client, Method, Response};
use tracing::debug;

use super::error::{DnsError, ProviderError};
use super::record::{Credentials, DnsRecord, RecordList};
use super::signing::RequestSignature;

pub const WEBSUPPORT_API_BASE: &str = "https://rest.websupport.sk/v1/user/self/zone/";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of a record search. A provider rejection is reported through
/// `Err(DnsError::Provider)` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(DnsRecord),
    NotFound(DnsRecord),
}

/// Client for the zone/record endpoints of the Websupport REST API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct WebsupportClient {
    client: Client,
    credentials: Credentials,
    base_url: String,
}

impl WebsupportClient {
    pub fn new(credentials: Credentials) -> Result<Self, DnsError> {
        Self::with_endpoint(credentials, WEBSUPPORT_API_BASE, REQUEST_TIMEOUT)
    }

    pub fn with_endpoint(
        credentials: Credentials,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, DnsError> {
        let client = Client::builder().timeout(timeout).build()?;

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self {
            client,
            credentials,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self, zone: &str) -> String {
        format!("{}{}/record", self.base_url, zone)
    }

    fn record_url(&self, zone: &str, id: u64) -> String {
        format!("{}{}/record/{}", self.base_url, zone, id)
    }

    /// Sends a signed request. Responses with status >= 400 are decoded into
    /// [`DnsError::Provider`]; anything else is handed back untouched.
    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&DnsRecord>,
    ) -> Result<Response, DnsError> {
        let auth = RequestSignature::new(&method, url, &self.credentials.api_secret, Utc::now())?;

        let mut builder = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(DATE, auth.date.as_str())
            .basic_auth(&self.credentials.api_key, Some(&auth.signature));

        if let Some(record) = body {
            builder = builder.json(record);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!("{} {} -> {}", method, url, status);

        if status.as_u16() >= 400 {
            let body = response.text().await?;
            return Err(ProviderError::from_body(status.to_string(), &body).into());
        }

        Ok(response)
    }

    /// Lists every record of `zone` in provider order.
    pub async fn get_records(&self, zone: &str) -> Result<Vec<DnsRecord>, DnsError> {
        let response = self.request(Method::GET, &self.records_url(zone), None).await?;
        let body = response.text().await?;
        let list: RecordList = serde_json::from_str(&body)?;
        Ok(list.items)
    }

    /// Returns the first listed record matching `pattern`.
    pub async fn lookup(&self, zone: &str, pattern: &DnsRecord) -> Result<Lookup, DnsError> {
        let records = self.get_records(zone).await?;

        Ok(records
            .into_iter()
            .find(|record| pattern.matches(record))
            .map_or_else(|| Lookup::NotFound(pattern.clone()), Lookup::Found))
    }

    /// Like [`lookup`](Self::lookup), with no match reported as
    /// [`DnsError::NotFound`].
    pub async fn find_record(&self, zone: &str, pattern: &DnsRecord) -> Result<DnsRecord, DnsError> {
        match self.lookup(zone, pattern).await? {
            Lookup::Found(record) => Ok(record),
            Lookup::NotFound(pattern) => Err(DnsError::not_found(&pattern)),
        }
    }

    pub async fn create_record(&self, zone: &str, record: &DnsRecord) -> Result<(), DnsError> {
        self.request(Method::POST, &self.records_url(zone), Some(record))
            .await?;
        Ok(())
    }

    pub async fn update_record(
        &self,
        zone: &str,
        old_pattern: &DnsRecord,
        new_record: &DnsRecord,
    ) -> Result<(), DnsError> {
        let found = self.find_record(zone, old_pattern).await?;
        self.request(Method::PUT, &self.record_url(zone, found.id), Some(new_record))
            .await?;
        Ok(())
    }

    /// Deletes the first record matching `pattern` and returns it.
    pub async fn delete_record(&self, zone: &str, pattern: &DnsRecord) -> Result<DnsRecord, DnsError> {
        let found = self.find_record(zone, pattern).await?;
        self.request(Method::DELETE, &self.record_url(zone, found.id), None)
            .await?;
        Ok(found)
    }
}
