//! Single-shot HTTP probing.
//!
//! One GET against a target URL with a fixed User-Agent and a per-check
//! timeout. Redirects are followed; the recorded status is the final one.
//! Any HTTP status is captured as data — a 500 is a successful probe of an
//! unhealthy site, not a fetch failure.

use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

use crate::config::{MAX_RESPONSE_BODY_SIZE, USER_AGENT};
use crate::error_handling::FetchError;

/// Everything captured from one probe of a target URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome {
    /// Final HTTP status after redirects.
    pub status_code: u16,
    /// Whether the status falls in `[200, 400)`.
    pub available: bool,
    /// Wall-clock time from request start to body received.
    pub response_time_ms: u64,
    /// `Content-Type` header, if present.
    pub content_type: Option<String>,
    /// `Content-Length` header, or the body size when absent.
    pub content_length: u64,
    /// Response headers as name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Response body, truncated to the capture limit.
    #[serde(skip_serializing)]
    pub body: String,
}

/// HTTP prober with a fixed User-Agent.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Builds a fetcher with the crate's fixed User-Agent and redirect
    /// following enabled.
    ///
    /// # Errors
    ///
    /// Returns a `reqwest::Error` if client construction fails.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Probes `url` once, waiting at most `timeout` for the full response.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Timeout`] if the request exceeds `timeout`, or
    /// [`FetchError::Request`] for connection and transfer failures. Callers
    /// treat either as the site being unreachable, not as a fatal condition.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchOutcome, FetchError> {
        debug!("Fetching {url} (timeout {}s)", timeout.as_secs());
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status_code = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let header_length = response.content_length();

        let mut body = response.text().await.map_err(|e| classify(url, e))?;
        let response_time_ms = start.elapsed().as_millis() as u64;

        if body.len() > MAX_RESPONSE_BODY_SIZE {
            let mut cut = MAX_RESPONSE_BODY_SIZE;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        let content_length = header_length.unwrap_or(body.len() as u64);
        let available = (200..400).contains(&status_code);

        debug!("Fetched {url}: status {status_code} in {response_time_ms}ms");

        Ok(FetchOutcome {
            status_code,
            available,
            response_time_ms,
            content_type,
            content_length,
            headers,
            body,
        })
    }
}

fn classify(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout { url: url.to_string() }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: e,
        }
    }
}
