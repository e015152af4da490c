//! HTTP client wrapper.
//!
//! Provides a wrapper around reqwest with:
//! - Configurable total and connect timeouts
//! - A rotating `User-Agent` header
//! - Transport failures mapped to [`OpggError::Transport`]
//!
//! Status codes are *not* interpreted here; see the classifier.

use crate::config::NetworkConfig;
use crate::error::{OpggError, Result};
use rand::Rng;
use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Browser identities cycled through on successive requests.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.67",
];

/// A response as it came off the wire, before classification.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Body as (lossy) UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client shared by every fetch primitive.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    next_agent: AtomicUsize,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom total timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(NetworkConfig::CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| OpggError::Config {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        // Start at a random identity so separate processes don't share a sequence.
        let start = rand::rng().random_range(0..USER_AGENTS.len());

        Ok(Self {
            client,
            next_agent: AtomicUsize::new(start),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Issue a single GET request and return the unclassified response.
    pub async fn get(&self, url: &str) -> Result<RawResponse> {
        let user_agent = self.next_user_agent();
        debug!(url, user_agent, "GET");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, &e))?
            .to_vec();

        debug!(url, status, bytes = body.len(), "Response received");

        Ok(RawResponse {
            url: url.to_string(),
            status,
            headers,
            body,
        })
    }

    fn next_user_agent(&self) -> &'static str {
        let index = self.next_agent.fetch_add(1, Ordering::Relaxed);
        USER_AGENTS[index % USER_AGENTS.len()]
    }
}

fn transport_error(url: &str, err: &reqwest::Error) -> OpggError {
    OpggError::Transport {
        url: url.to_string(),
        message: err.to_string(),
        timed_out: err.is_timeout(),
    }
}
