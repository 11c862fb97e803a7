#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use wiremock::{Match, MockServer, Request};

use websupport_solver::dns::{Credentials, RequestSignature};

pub const API_KEY: &str = "test-key";
pub const API_SECRET: &str = "test-secret";
pub const RECORDS_PATH: &str = "/v1/user/self/zone/example.com/record";

pub fn credentials() -> Credentials {
    Credentials {
        api_key: API_KEY.to_string(),
        api_secret: API_SECRET.to_string(),
    }
}

pub fn base_url(server: &MockServer) -> String {
    format!("{}/v1/user/self/zone/", server.uri())
}

pub fn record_path(id: u64) -> String {
    format!("{}/{}", RECORDS_PATH, id)
}

pub fn txt(id: u64, name: &str, content: &str) -> Value {
    json!({ "id": id, "type": "TXT", "name": name, "content": content, "ttl": 600 })
}

pub fn listing(items: Vec<Value>) -> Value {
    json!({ "items": items })
}

pub fn rejection(message: &str) -> Value {
    json!({
        "item": {},
        "status": "error",
        "errors": { "content": [message] }
    })
}

/// Accepts only requests whose Basic-auth password is the HMAC signature of
/// the method, path and the instant carried in the `Date` header.
pub struct SignedRequest;

impl Match for SignedRequest {
    fn matches(&self, request: &Request) -> bool {
        let date = match request
            .headers
            .get("date")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        {
            Some(date) => date.with_timezone(&Utc),
            None => return false,
        };

        let decoded = match request
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Basic "))
            .and_then(|v| STANDARD.decode(v).ok())
            .and_then(|v| String::from_utf8(v).ok())
        {
            Some(decoded) => decoded,
            None => return false,
        };

        let (user, signature) = match decoded.split_once(':') {
            Some(parts) => parts,
            None => return false,
        };

        match RequestSignature::new(&request.method, request.url.as_str(), API_SECRET, date) {
            Ok(expected) => user == API_KEY && signature == expected.signature,
            Err(_) => false,
        }
    }
}
