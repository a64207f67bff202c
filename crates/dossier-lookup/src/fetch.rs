//! Single-shot HTTP fetch.
//!
//! An immutable [`FetchRequest`] goes in, a [`FetchResponse`] comes
//! out. The [`Fetcher`] holds nothing but the `reqwest` client, so
//! there is no per-request state to reset between calls.

use crate::error::{LookupError, LookupResult};
use std::time::Duration;
use tracing::debug;

/// Fixed desktop User-Agent sent on every request; scraped endpoints
/// answer differently to obvious bot agents.
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; WOW64; rv:56.0) Gecko/20100101 Firefox/56.0";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A single outbound GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Absolute URL to fetch
    pub url: String,
}

impl FetchRequest {
    /// Create a request for the given URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// A successful response: status, headers, and raw body bytes.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers as received
    pub headers: Vec<(String, String)>,
    /// Raw body bytes
    pub bytes: Vec<u8>,
}

impl FetchResponse {
    /// Body decoded as UTF-8, lossily.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Stateless HTTP fetcher shared by every lookup step.
#[derive(Clone)]
pub struct Fetcher {
    http: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher with the fixed User-Agent and default timeout.
    pub fn new() -> LookupResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        Ok(Self { http })
    }

    /// Issue a GET. Non-success statuses are errors; lookup steps
    /// treat "the page is not there" the same as "the fetch failed".
    pub async fn get(&self, request: &FetchRequest) -> LookupResult<FetchResponse> {
        debug!(url = %request.url, "GET request");

        let response = self
            .http
            .get(&request.url)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();

        let bytes = response
            .bytes()
            .await
            .map_err(classify)?
            .to_vec();

        Ok(FetchResponse {
            status: status.as_u16(),
            headers,
            bytes,
        })
    }
}

/// Map a `reqwest` error onto the lookup taxonomy, pulling DNS-level
/// failures out of the source chain so callers can tell an
/// unresolvable host from an ordinary connection problem.
fn classify(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        return LookupError::Timeout;
    }

    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        let message = cause.to_string();
        if message.contains("dns error") || message.contains("failed to lookup address") {
            return LookupError::UnresolvedHost(err.to_string());
        }
        source = cause.source();
    }

    if err.is_connect() {
        LookupError::Connect(err.to_string())
    } else {
        LookupError::Transport(err.to_string())
    }
}
