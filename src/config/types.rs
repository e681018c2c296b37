use serde::Deserialize;

/// Main configuration structure for Washi-Press
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub storage: StorageConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Path of the append-only log recording every visited canonical URL
    #[serde(rename = "visited-log", default = "default_visited_log")]
    pub visited_log: String,

    /// Substring patterns marking URLs that must never be fetched
    #[serde(rename = "exclude-patterns", default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on a single page fetch, in seconds
    #[serde(rename = "page-load-timeout", default = "default_page_load_timeout")]
    pub page_load_timeout: u64,

    /// Overall request timeout, in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Connection establishment timeout, in seconds
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            page_load_timeout: default_page_load_timeout(),
            request_timeout: default_request_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Bucket the archive writes into
    pub bucket: String,

    /// Key prefix for flattened page text artifacts
    #[serde(rename = "text-prefix", default = "default_text_prefix")]
    pub text_prefix: String,

    /// Key prefix for downloaded document artifacts
    #[serde(rename = "binary-prefix", default = "default_binary_prefix")]
    pub binary_prefix: String,

    /// Object key of the metadata CSV export
    #[serde(rename = "metadata-key", default = "default_metadata_key")]
    pub metadata_key: String,

    /// Object key of the failure CSV export
    #[serde(rename = "failures-key", default = "default_failures_key")]
    pub failures_key: String,
}

fn default_visited_log() -> String {
    "visited_urls.txt".to_string()
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "youtube.com/watch".to_string(),
        "facebook.com/login".to_string(),
    ]
}

fn default_user_agent() -> String {
    "washi-press/1.0".to_string()
}

fn default_page_load_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_text_prefix() -> String {
    "txt-files".to_string()
}

fn default_binary_prefix() -> String {
    "pdf-files".to_string()
}

fn default_metadata_key() -> String {
    "metadata.csv".to_string()
}

fn default_failures_key() -> String {
    "failed_urls.csv".to_string()
}
