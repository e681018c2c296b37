//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and document downloads
//! - HTML parsing, link extraction, and text flattening
//! - FIFO frontier management
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher, RenderedPage};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{extract_page, html_to_text, PageExtract};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the object store and archive
/// 2. Load the visited set from its log
/// 3. Build the HTTP client
/// 4. Seed the frontier and consume it FIFO
/// 5. Flush the metadata and failure exports
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(())` - Crawl completed successfully
/// * `Err(WashiError)` - Crawl failed
pub async fn crawl(config: Config) -> Result<()> {
    run_crawl(config).await
}
