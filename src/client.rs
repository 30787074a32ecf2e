use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::models::Kind;
use crate::{ImgurError, Result};

const API_URL: &str = "https://api.imgur.com/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of raw Imgur API response envelopes.
///
/// [`ImgurClient`] is the real implementation; the cache engine only sees
/// this trait, so tests can refresh records against a recording fake.
pub trait Fetch {
    /// Fetch and validate the response envelope for one Imgur ID.
    ///
    /// A returned `Value` is guaranteed to be a mapping whose `success` key
    /// was true. Failures are terminal for this attempt; nothing is retried.
    fn query(&self, imgur_id: &str, kind: Kind) -> Result<Value>;
}

/// Blocking Imgur API client.
///
/// One synchronous GET per query, fixed 5-second timeout, no retries.
pub struct ImgurClient {
    http: Client,
    client_id: String,
}

impl ImgurClient {
    /// Create a client authenticating with the given API client ID.
    pub fn new(client_id: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| ImgurError::Request(source).raise())?;
        Ok(Self {
            http,
            client_id: client_id.into(),
        })
    }

    pub(crate) fn url(kind: Kind, imgur_id: &str) -> String {
        format!("{}/{}/{}", API_URL, kind.resource(), imgur_id)
    }
}

impl Fetch for ImgurClient {
    fn query(&self, imgur_id: &str, kind: Kind) -> Result<Value> {
        let url = Self::url(kind, imgur_id);
        tracing::info!("querying {url}");

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .send()
            .map_err(|source| classify_transport(&url, source).raise())?;
        let body = response
            .text()
            .map_err(|source| classify_transport(&url, source).raise())?;
        tracing::debug!("Imgur API responded with: {body}");

        parse_envelope(&url, &body)
    }
}

/// Split transport failures into the timeout and connection cases the
/// caller's diagnostics distinguish.
fn classify_transport(url: &str, source: reqwest::Error) -> ImgurError {
    if source.is_timeout() {
        ImgurError::Timeout {
            url: url.to_string(),
            source,
        }
    } else if source.is_connect() {
        ImgurError::Connect {
            url: url.to_string(),
            source,
        }
    } else {
        ImgurError::Request(source)
    }
}

/// Validate the `{ "success": bool, "data": ... }` envelope shared by all
/// Imgur endpoints.
fn parse_envelope(url: &str, body: &str) -> Result<Value> {
    let parsed: Value = serde_json::from_str(body).map_err(|source| {
        ImgurError::Json {
            url: url.to_string(),
            source,
        }
        .raise()
    })?;

    if !parsed
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        let error = parsed
            .get("data")
            .and_then(|data| data.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("N/A")
            .to_string();
        return Err(ImgurError::Api {
            url: url.to_string(),
            error,
        }
        .raise());
    }

    Ok(parsed)
}
