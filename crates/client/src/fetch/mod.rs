//! HTTP fetch pipeline: the collaborator that turns a page URL into markup.
//!
//! ### Page URL validation
//! - Trim whitespace, ensure scheme (default: `https`)
//! - Lowercase host, remove fragments
//! - Preserve query string
//!
//! ### Safety gates
//! - Deny private ranges (RFC1918, link-local, localhost, etc.) unless allowed
//! - Resolve DNS and validate all A/AAAA answers are public.
//! - Max redirects: 5 (configurable)
//! - Max body bytes: 5MB (configurable)
//!
//! Every failure here is reported as [`Error::FetchFailed`]; callers do not
//! decompose fetch failures any further.

pub mod ssrf;
pub mod url;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use self::ssrf::{SsrfError, check_url, validate_ip};
pub use self::url::{UrlError, parse_page_url};

use linkdiff_core::{AppConfig, Error};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "linkdiff/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Whether private/reserved hosts may be fetched (default: false)
    pub allow_private_hosts: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "linkdiff/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
            allow_private_hosts: false,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: config.max_redirects,
            allow_private_hosts: config.allow_private_hosts,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
    /// When the response was received
    pub fetched_at: DateTime<Utc>,
}

impl FetchResponse {
    /// Build a successful HTML response that was served without redirects.
    pub fn from_html(url: Url, html: impl Into<String>) -> Self {
        Self {
            final_url: url.clone(),
            url,
            status: StatusCode::OK,
            content_type: Some("text/html; charset=utf-8".to_string()),
            bytes: Bytes::from(html.into()),
            fetch_ms: 0,
            fetched_at: Utc::now(),
        }
    }

    /// Response body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Source of page markup.
///
/// The pipeline only depends on this trait, so tests and alternative
/// transports can supply pages without touching the network.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page, following redirects.
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error>;
}

/// HTTP fetch client with safety checks.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    fn check_size(&self, len: usize) -> Result<(), Error> {
        if len > self.config.max_bytes {
            return Err(Error::FetchFailed(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }
        Ok(())
    }
}

#[async_trait]
impl Fetcher for FetchClient {
    /// Fetch a URL, returning raw bytes and metadata.
    ///
    /// Performs the SSRF check and respects redirect/byte limits.
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        if !self.config.allow_private_hosts {
            check_url(url).await?;
        }

        let response = self
            .http
            .get(url.as_str())
            .header(
                header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchFailed(format!("timed out after {}ms", self.config.timeout.as_millis()))
                } else {
                    Error::FetchFailed(format!("network error: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchFailed(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length() {
            self.check_size(len as usize)?;
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::FetchFailed(format!("failed to read response: {}", e)))?;
        self.check_size(bytes.len())?;

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse {
            url: url.clone(),
            final_url,
            status,
            content_type,
            bytes,
            fetch_ms,
            fetched_at: Utc::now(),
        })
    }
}
