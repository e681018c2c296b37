//! Integration tests for the crawler
//!
//! Page fetches are served from a scripted in-process fetcher so page URLs
//! can stay in canonical https form. Document downloads go through the real
//! HTTP client, so those tests use wiremock to create mock servers and
//! exercise the download path end-to-end.

use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use washi_press::config::{Config, CrawlerConfig, FetcherConfig, StorageConfig};
use washi_press::crawler::{Coordinator, FetchError, PageFetcher, RenderedPage};
use washi_press::storage::{compute_checksum, FAILURE_HEADER, METADATA_HEADER};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A fetcher that serves pages from a fixed URL map and counts requests
#[derive(Clone)]
struct ScriptedFetcher {
    pages: Arc<HashMap<String, RenderedPage>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedFetcher {
    fn new(pages: HashMap<String, RenderedPage>) -> Self {
        Self {
            pages: Arc::new(pages),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_page(&self, url: &str) -> Result<RenderedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Navigation {
                url: url.to_string(),
                message: "no scripted response".to_string(),
            })
    }
}

/// Builds a page whose body mentions the title, linking to the given URLs
fn page(title: &str, links: &[&str]) -> RenderedPage {
    RenderedPage {
        body: format!("<html><body><p>{} body text</p></body></html>", title),
        title: Some(title.to_string()),
        links: links.iter().map(|l| l.to_string()).collect(),
    }
}

/// Creates a test configuration rooted in the given temp directory
fn create_test_config(dir: &TempDir, seed: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed.to_string(),
            visited_log: dir
                .path()
                .join("visited.txt")
                .to_string_lossy()
                .into_owned(),
            exclude_patterns: vec!["youtube.com/watch".to_string()],
        },
        fetcher: FetcherConfig::default(),
        storage: StorageConfig {
            bucket: dir.path().join("archive").to_string_lossy().into_owned(),
            text_prefix: "text-files".to_string(),
            binary_prefix: "pdf-files".to_string(),
            metadata_key: "metadata.csv".to_string(),
            failures_key: "failures.csv".to_string(),
        },
    }
}

/// Reads a CSV export from the bucket and returns its data rows
fn read_csv_rows(dir: &TempDir, key: &str) -> Vec<Vec<String>> {
    let path = dir.path().join("archive").join(key);
    let mut reader = csv::Reader::from_path(&path).expect("Failed to open CSV export");
    reader
        .records()
        .map(|record| {
            record
                .expect("Failed to read CSV record")
                .iter()
                .map(|field| field.to_string())
                .collect()
        })
        .collect()
}

#[tokio::test]
async fn test_full_crawl_archives_pages() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir, "https://example.com");

    // Seed links to a child page; the link is messy on purpose and the
    // scripted map holds the child under its canonical form.
    let mut pages = HashMap::new();
    pages.insert(
        "https://example.com".to_string(),
        page(
            "Example Domain",
            &["https://example.com/docs/readme.html?v=2#top"],
        ),
    );
    pages.insert(
        "https://example.com/docs/readme".to_string(),
        page("Readme", &[]),
    );
    let fetcher = ScriptedFetcher::new(pages);

    // Run the crawl
    let mut coordinator = Coordinator::with_fetcher(config, Box::new(fetcher.clone()))
        .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    assert_eq!(fetcher.call_count(), 2, "Expected exactly 2 page fetches");

    // Visited log holds canonical URLs in crawl order
    let visited =
        fs::read_to_string(dir.path().join("visited.txt")).expect("Failed to read visited log");
    assert_eq!(
        visited,
        "https://example.com\nhttps://example.com/docs/readme\n"
    );

    // Text artifacts land under the text prefix with sanitized names
    let seed_artifact = dir
        .path()
        .join("archive/text-files/https___example.com.txt");
    let seed_text = fs::read_to_string(&seed_artifact).expect("Failed to read seed artifact");
    assert!(seed_text.starts_with("https://example.com\n\n"));
    assert!(seed_text.contains("Example Domain body text"));

    let child_artifact = dir
        .path()
        .join("archive/text-files/https___example.com_docs_readme.txt");
    assert!(child_artifact.exists(), "Expected child page artifact");

    // Metadata has one row per archived page, in crawl order
    let rows = read_csv_rows(&dir, "metadata.csv");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "");
    assert_eq!(rows[0][1], "https://example.com");
    assert_eq!(rows[0][2], "Example Domain");
    assert_eq!(rows[1][0], "https://example.com");
    assert_eq!(rows[1][1], "https://example.com/docs/readme");
    assert_eq!(rows[1][2], "Readme");

    // Nothing failed
    let failures = fs::read_to_string(dir.path().join("archive/failures.csv"))
        .expect("Failed to read failures export");
    assert_eq!(failures, format!("{}\n", FAILURE_HEADER.join(",")));
}

#[tokio::test]
async fn test_excluded_links_are_never_queued() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir, "https://example.com");

    let mut pages = HashMap::new();
    pages.insert(
        "https://example.com".to_string(),
        page(
            "Home",
            &[
                "https://youtube.com/watch?v=abc123",
                "https://example.com/about.html",
            ],
        ),
    );
    pages.insert("https://example.com/about".to_string(), page("About", &[]));
    let fetcher = ScriptedFetcher::new(pages);

    let mut coordinator = Coordinator::with_fetcher(config, Box::new(fetcher.clone()))
        .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    // The excluded link is dropped before it is ever queued
    assert_eq!(fetcher.call_count(), 2, "Expected exactly 2 page fetches");

    let visited =
        fs::read_to_string(dir.path().join("visited.txt")).expect("Failed to read visited log");
    assert!(!visited.contains("youtube"));

    let rows = read_csv_rows(&dir, "metadata.csv");
    assert_eq!(rows.len(), 2);

    // A skipped link is not a failure
    let failures = read_csv_rows(&dir, "failures.csv");
    assert!(failures.is_empty());
}

#[tokio::test]
async fn test_document_download_stores_bytes() {
    // Start a mock server for the document download
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let doc_url = format!("{}/files/report.pdf", base_url);

    let pdf_bytes: &[u8] = b"%PDF-1.4 sample document body";
    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(pdf_bytes)
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir, "https://example.com");

    let mut pages = HashMap::new();
    pages.insert(
        "https://example.com".to_string(),
        page("Home", &[doc_url.as_str()]),
    );
    let fetcher = ScriptedFetcher::new(pages);

    let mut coordinator = Coordinator::with_fetcher(config, Box::new(fetcher.clone()))
        .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    // Document bytes are stored unmodified under the binary prefix
    let stored = fs::read(dir.path().join("archive/pdf-files/report.pdf"))
        .expect("Failed to read stored document");
    assert_eq!(stored, pdf_bytes);

    // The document URL is marked visited as-is
    let visited =
        fs::read_to_string(dir.path().join("visited.txt")).expect("Failed to read visited log");
    assert!(visited.contains(&doc_url));

    // Seed row first, then the document row
    let rows = read_csv_rows(&dir, "metadata.csv");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], "https://example.com");
    assert_eq!(rows[1][1], doc_url);
    assert_eq!(rows[1][2], "N/A");
    assert_eq!(rows[1][9], "report.pdf");
    assert_eq!(rows[1][10], "pdf-files/report.pdf");
    assert_eq!(rows[1][11], compute_checksum(pdf_bytes));
    assert_eq!(rows[1][13], r#"["student","counsellor"]"#);

    let failures = read_csv_rows(&dir, "failures.csv");
    assert!(failures.is_empty());
}

#[tokio::test]
async fn test_document_download_failure_is_recorded() {
    // Start a mock server that has no such document
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let doc_url = format!("{}/missing.pdf", base_url);

    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir, "https://example.com");

    let mut pages = HashMap::new();
    pages.insert(
        "https://example.com".to_string(),
        page("Home", &[doc_url.as_str()]),
    );
    let fetcher = ScriptedFetcher::new(pages);

    let mut coordinator = Coordinator::with_fetcher(config, Box::new(fetcher.clone()))
        .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    // The failed download becomes a failure row with the status message
    let failures = read_csv_rows(&dir, "failures.csv");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0][0], doc_url);
    assert_eq!(failures[0][1], "Failed to download PDF, status code: 404");

    // Failed documents still count as visited and are not retried
    let visited =
        fs::read_to_string(dir.path().join("visited.txt")).expect("Failed to read visited log");
    assert!(visited.contains(&doc_url));

    // Only the seed page made it into the metadata
    let rows = read_csv_rows(&dir, "metadata.csv");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "https://example.com");
}

#[tokio::test]
async fn test_page_fetch_failure_is_recorded() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir, "https://example.com");

    // The child page is missing from the scripted map, so fetching it fails
    let mut pages = HashMap::new();
    pages.insert(
        "https://example.com".to_string(),
        page("Home", &["https://example.com/broken.html"]),
    );
    let fetcher = ScriptedFetcher::new(pages);

    let mut coordinator = Coordinator::with_fetcher(config, Box::new(fetcher.clone()))
        .expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    let failures = read_csv_rows(&dir, "failures.csv");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0][0], "https://example.com/broken");
    assert!(failures[0][1].contains("no scripted response"));

    // The failed page is marked visited so the crawl moves on
    let visited =
        fs::read_to_string(dir.path().join("visited.txt")).expect("Failed to read visited log");
    assert!(visited.contains("https://example.com/broken"));

    let rows = read_csv_rows(&dir, "metadata.csv");
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_default_fetcher_crawls_live_server() {
    // The seed is fetched by its exact URL, so the default HTTP fetcher can
    // crawl a plain-http mock server directly.
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let seed = format!("{}/", base_url);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head><title>Mock Home</title></head><body>
                    <p>Welcome to the archive source.</p>
                    <a href="files/report.pdf">Annual report</a>
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let pdf_bytes: &[u8] = b"%PDF-1.4 annual report";
    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(pdf_bytes)
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&dir, &seed);

    // Run the crawl with the default HTTP fetcher
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    // The seed page was flattened and archived; the linked document was
    // resolved relative to the page and downloaded.
    let rows = read_csv_rows(&dir, "metadata.csv");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], seed);
    assert_eq!(rows[0][2], "Mock Home");
    assert_eq!(rows[1][9], "report.pdf");

    let page_text = fs::read_to_string(dir.path().join("archive").join(&rows[0][10]))
        .expect("Failed to read page artifact");
    assert!(page_text.starts_with(&format!("{}\n\n", seed)));
    assert!(page_text.contains("Welcome to the archive source"));

    let stored = fs::read(dir.path().join("archive/pdf-files/report.pdf"))
        .expect("Failed to read stored document");
    assert_eq!(stored, pdf_bytes);

    // The seed is remembered in canonical form
    let visited =
        fs::read_to_string(dir.path().join("visited.txt")).expect("Failed to read visited log");
    assert!(visited.contains(&base_url.replace("http://", "https://")));

    let failures = read_csv_rows(&dir, "failures.csv");
    assert!(failures.is_empty());
}

#[tokio::test]
async fn test_restart_skips_visited_urls() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let mut pages = HashMap::new();
    pages.insert(
        "https://example.com".to_string(),
        page("Home", &["https://example.com/about.html"]),
    );
    pages.insert("https://example.com/about".to_string(), page("About", &[]));

    // First run archives both pages
    let first = ScriptedFetcher::new(pages.clone());
    let mut coordinator = Coordinator::with_fetcher(
        create_test_config(&dir, "https://example.com"),
        Box::new(first.clone()),
    )
    .expect("Failed to create coordinator");
    coordinator.run().await.expect("First crawl failed");
    assert_eq!(first.call_count(), 2);

    // Second run loads the visited log and has nothing left to fetch
    let second = ScriptedFetcher::new(pages);
    let mut coordinator = Coordinator::with_fetcher(
        create_test_config(&dir, "https://example.com"),
        Box::new(second.clone()),
    )
    .expect("Failed to create coordinator");
    coordinator.run().await.expect("Second crawl failed");
    assert_eq!(second.call_count(), 0, "Expected no fetches after restart");

    // The exports are rewritten from this run's (empty) records
    let metadata = fs::read_to_string(dir.path().join("archive/metadata.csv"))
        .expect("Failed to read metadata export");
    assert_eq!(metadata, format!("{}\n", METADATA_HEADER.join(",")));

    let failures = fs::read_to_string(dir.path().join("archive/failures.csv"))
        .expect("Failed to read failures export");
    assert_eq!(failures, format!("{}\n", FAILURE_HEADER.join(",")));
}
