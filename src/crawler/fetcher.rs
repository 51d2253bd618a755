//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client
//! - Applying the identity header and per-request timeout
//! - Inflating gzip-compressed sitemap payloads
//! - Classifying request failures
//!
//! Requests are never retried; a failed URL is reported once and dropped.

use crate::crawler::identity::UserAgentPool;
use crate::SeoError;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A successfully fetched remote document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Decoded body
    pub body: String,
}

/// Retrieves one remote document
///
/// Implementations must honor `timeout` and must not retry internally.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str, user_agent: &str, timeout: Duration)
        -> Result<Document, SeoError>;
}

/// Builds the HTTP client shared by every request of a run
///
/// Redirects are followed so that [`Document::url`] is the final location.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, SeoError> {
        Ok(Self::with_client(build_http_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Document, SeoError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| SeoError::from_request(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeoError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SeoError::from_request(url, e))?;
        let body = decode_body(&bytes).map_err(|e| SeoError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(Document {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }
}

/// Decodes a response body, inflating it first when it is gzip-compressed
///
/// Servers that send `.xml.gz` sitemaps as `application/x-gzip` leave the
/// payload compressed after transport decoding, so the magic bytes decide.
///
/// Invalid UTF-8 is replaced in both cases; only a corrupt gzip stream fails.
pub fn decode_body(bytes: &[u8]) -> std::io::Result<String> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut inflated)?;
        Ok(String::from_utf8_lossy(&inflated).into_owned())
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Everything a crawl task needs to issue one request
#[derive(Clone)]
pub struct FetchContext {
    fetcher: Arc<dyn Fetcher>,
    agents: Arc<UserAgentPool>,
    timeout: Duration,
}

impl FetchContext {
    pub fn new(fetcher: Arc<dyn Fetcher>, agents: Arc<UserAgentPool>, timeout: Duration) -> Self {
        Self {
            fetcher,
            agents,
            timeout,
        }
    }

    /// Fetches `url` with a freshly picked identity string
    pub async fn fetch(&self, url: &str) -> Result<Document, SeoError> {
        let user_agent = self.agents.pick().to_string();
        tracing::debug!("Requesting URL: {}", url);
        self.fetcher.get(url, &user_agent, self.timeout).await
    }
}
