//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with user agent and timeouts
//! - Fetching pages and surfacing rendered markup, title, and links
//! - Error classification for timeouts and connection failures

use crate::config::FetcherConfig;
use crate::crawler::parser::extract_page;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors surfaced by page fetches and document downloads
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to download PDF, status code: {status}")]
    DocumentStatus { status: u16 },

    #[error("Failed to read body for {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Classifies a transport error from the HTTP client
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Navigation {
                url: url.to_string(),
                message: "Connection refused".to_string(),
            }
        } else {
            Self::Navigation {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// A fetched page, rendered and parsed
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The rendered page markup
    pub body: String,

    /// The page title, when present
    pub title: Option<String>,

    /// Absolute anchor target URLs found on the page
    pub links: Vec<String>,
}

/// Capability contract for page fetching
///
/// Given a URL, a fetcher returns the rendered markup, the page title, and
/// every anchor target reachable from the page. Failures surface as a
/// [`FetchError`] instead of tearing the crawl down.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<RenderedPage, FetchError>;
}

/// Page fetcher backed by a plain HTTP client
pub struct HttpFetcher {
    client: Client,
    page_load_timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher sharing the given client
    pub fn new(client: Client, config: &FetcherConfig) -> Self {
        Self {
            client,
            page_load_timeout: Duration::from_secs(config.page_load_timeout),
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<RenderedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(self.page_load_timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let base_url = Url::parse(url).map_err(|e| FetchError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let extract = extract_page(&body, &base_url);

        Ok(RenderedPage {
            body,
            title: extract.title,
            links: extract.links,
        })
    }
}

/// Builds the shared HTTP client
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use washi_press::config::FetcherConfig;
/// use washi_press::crawler::build_http_client;
///
/// let config = FetcherConfig::default();
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}
