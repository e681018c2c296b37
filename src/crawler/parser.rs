//! HTML content extraction
//!
//! Rendered markup carries three things the crawl needs: the page title for
//! the metadata export, the anchor targets to enqueue, and the body text to
//! archive. This module pulls out the first two and flattens the third.

use scraper::{Html, Selector};
use url::Url;

/// Title and outbound links pulled from one page
#[derive(Debug, Clone)]
pub struct PageExtract {
    /// Contents of the first `<title>` element, trimmed, when non-empty
    pub title: Option<String>,

    /// Absolute anchor targets in document order
    pub links: Vec<String>,
}

/// Pulls the title and anchor targets out of rendered markup
///
/// Every `<a href>` in the document is considered, wherever it sits. Relative
/// hrefs resolve against `base_url`; anything that does not end up as an
/// HTTP(S) URL is dropped, as are same-page fragment anchors. Anchors with
/// `download` or `rel="nofollow"` attributes are followed like any other.
///
/// # Example
///
/// ```no_run
/// use washi_press::crawler::extract_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Handbook</title></head><body><a href="/guides">Guides</a></body></html>"#;
/// let base = Url::parse("https://handbook.example.edu/").unwrap();
/// let extract = extract_page(html, &base);
/// assert_eq!(extract.title.as_deref(), Some("Handbook"));
/// assert_eq!(extract.links, vec!["https://handbook.example.edu/guides"]);
/// ```
pub fn extract_page(html: &str, base_url: &Url) -> PageExtract {
    let document = Html::parse_document(html);

    PageExtract {
        title: extract_title(&document),
        links: collect_links(&document, base_url),
    }
}

/// Flattens rendered HTML markup to plain text
///
/// The conversion is pure: the same markup always yields the same text, with
/// tags dropped and block structure kept as line breaks.
pub fn html_to_text(html: &str) -> String {
    html2md::parse_html(html)
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;

    let title = element.text().collect::<String>();
    let title = title.trim();

    (!title.is_empty()).then(|| title.to_string())
}

fn collect_links(document: &Html, base_url: &Url) -> Vec<String> {
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| resolve_href(href, base_url))
        .collect()
}

/// Resolves one href to an absolute URL, or drops it
///
/// Same-page fragment anchors yield None, as does anything that resolves to
/// a non-HTTP(S) scheme (mailto:, javascript:, tel:, data:, and friends) or
/// fails to parse at all.
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = base_url.join(href).ok()?;

    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}
