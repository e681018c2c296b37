//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding and consuming the frontier queue
//! - Dispatching URLs to the page fetch or document download path
//! - Marking visited URLs and accumulating export rows
//! - Flushing the CSV exports when the frontier runs dry

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::html_to_text;
use crate::state::VisitedSet;
use crate::storage::{Archive, FsObjectStore};
use crate::url::{canonicalize, classify_url, matches_any_pattern, UrlClass};
use crate::Result;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    fetcher: Box<dyn PageFetcher>,
    archive: Archive,
    visited: VisitedSet,
    frontier: Frontier,
}

impl Coordinator {
    /// Creates a coordinator with the default HTTP page fetcher
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully initialized coordinator
    /// * `Err(WashiError)` - Failed to initialize
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.fetcher)?;
        let fetcher = Box::new(HttpFetcher::new(client.clone(), &config.fetcher));
        Self::assemble(config, client, fetcher)
    }

    /// Creates a coordinator with a caller-supplied page fetcher
    pub fn with_fetcher(config: Config, fetcher: Box<dyn PageFetcher>) -> Result<Self> {
        let client = build_http_client(&config.fetcher)?;
        Self::assemble(config, client, fetcher)
    }

    fn assemble(config: Config, client: Client, fetcher: Box<dyn PageFetcher>) -> Result<Self> {
        // Open the archive first so a bad bucket fails the run before any
        // fetch happens
        let store = FsObjectStore::open(Path::new(&config.storage.bucket))?;
        let archive = Archive::new(Box::new(store), config.storage.clone())?;

        let visited = VisitedSet::load(Path::new(&config.crawler.visited_log))?;
        if !visited.is_empty() {
            tracing::info!("Resuming with {} previously visited URLs", visited.len());
        }

        let mut frontier = Frontier::new();
        frontier.enqueue(&config.crawler.seed_url, "");

        Ok(Self {
            config: Arc::new(config),
            client,
            fetcher,
            archive,
            visited,
            frontier,
        })
    }

    /// Runs the main crawl loop
    ///
    /// This is the core crawling logic that:
    /// 1. Dequeues URLs strictly FIFO until the frontier runs dry
    /// 2. Dispatches each URL to the page or document path
    /// 3. Flushes the metadata and failure exports at the end
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!("Starting crawl from {}", self.config.crawler.seed_url);

        let mut processed = 0u64;
        let start_time = std::time::Instant::now();

        while let Some(entry) = self.frontier.dequeue() {
            tracing::debug!("Processing URL: {}", entry.url);

            self.process_entry(&entry).await?;

            processed += 1;

            // Progress reporting every 10 URLs
            if processed % 10 == 0 {
                let elapsed = start_time.elapsed();
                let rate = processed as f64 / elapsed.as_secs_f64();
                tracing::info!(
                    "Progress: {} URLs processed, {} in frontier, {} archived, {:.2} URLs/sec",
                    processed,
                    self.frontier.len(),
                    self.archive.metadata_count(),
                    rate
                );
            }
        }

        self.archive.flush_metadata()?;
        self.archive.flush_failures()?;

        tracing::info!(
            "Crawl completed: {} URLs processed in {:?}, {} artifacts stored, {} failures",
            processed,
            start_time.elapsed(),
            self.archive.metadata_count(),
            self.archive.failure_count()
        );

        Ok(())
    }

    /// Processes a single frontier entry
    ///
    /// Dispatch order: canonicalize, drop already-visited URLs, drop excluded
    /// URLs, then route documents to the download path and everything else to
    /// the page fetch. Fetched URLs are marked visited whether or not their
    /// fetch succeeded; excluded and already-visited URLs are not marked.
    async fn process_entry(&mut self, entry: &FrontierEntry) -> Result<()> {
        let canonical = match canonicalize(&entry.url) {
            Ok(canonical) => canonical,
            Err(e) => {
                tracing::warn!("Skipping unusable URL {}: {}", entry.url, e);
                self.archive.record_failure(&entry.url, &e.to_string());
                return Ok(());
            }
        };

        if self.visited.contains(&canonical) {
            tracing::debug!("Already visited: {}", canonical);
            return Ok(());
        }

        match classify_url(&entry.url, &self.config.crawler.exclude_patterns) {
            UrlClass::Excluded => {
                tracing::debug!("Excluded by pattern: {}", entry.url);
            }
            UrlClass::Document => {
                self.download_document(entry).await;
                self.visited.mark(&canonical)?;
            }
            UrlClass::Page => {
                self.fetch_page(entry).await;
                self.visited.mark(&canonical)?;
            }
        }

        Ok(())
    }

    /// Fetches a page, archives its flattened text, and enqueues its links
    async fn fetch_page(&mut self, entry: &FrontierEntry) {
        let page = match self.fetcher.fetch_page(&entry.url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", entry.url, e);
                self.archive.record_failure(&entry.url, &e.to_string());
                return;
            }
        };

        let text = html_to_text(&page.body);
        let title = page.title.as_deref().unwrap_or("N/A");
        tracing::info!("Archiving page {} ({} bytes of text)", entry.url, text.len());
        self.archive
            .upload_text(&entry.url, &text, &entry.parent_url, title);

        self.enqueue_links(&page.links, &entry.url);
    }

    /// Downloads a document and archives it byte for byte
    async fn download_document(&mut self, entry: &FrontierEntry) {
        match self.fetch_document_bytes(&entry.url).await {
            Ok(data) => {
                tracing::info!("Downloaded document {} ({} bytes)", entry.url, data.len());
                self.archive
                    .upload_binary(&entry.url, &data, &entry.parent_url);
            }
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", entry.url, e);
                self.archive.record_failure(&entry.url, &e.to_string());
            }
        }
    }

    /// Fetches raw document bytes, accepting only a 200 response
    async fn fetch_document_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(FetchError::DocumentStatus { status });
        }

        let bytes = response.bytes().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(bytes.to_vec())
    }

    /// Filters discovered links and adds the new ones to the frontier
    ///
    /// Links are enqueued in canonical form. Excluded links never enter the
    /// queue; URLs already visited or already waiting are dropped here.
    fn enqueue_links(&mut self, links: &[String], parent_url: &str) {
        for link in links {
            if matches_any_pattern(&self.config.crawler.exclude_patterns, link) {
                tracing::debug!("Excluded by pattern: {}", link);
                continue;
            }

            let canonical = match canonicalize(link) {
                Ok(canonical) => canonical,
                Err(e) => {
                    tracing::debug!("Failed to canonicalize {}: {}", link, e);
                    continue;
                }
            };

            if self.visited.contains(&canonical) {
                continue;
            }

            if self.frontier.enqueue(&canonical, parent_url) {
                tracing::debug!("Queued {}", canonical);
            }
        }
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(())` - Crawl completed successfully
/// * `Err(WashiError)` - Crawl failed with an error
///
/// # Example
///
/// ```no_run
/// use washi_press::config::load_config;
/// use washi_press::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// run_crawl(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<()> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
