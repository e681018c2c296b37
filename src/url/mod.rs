//! URL handling module for Washi-Press
//!
//! This module provides URL canonicalization, exclusion pattern matching,
//! and URL classification functionality.

mod canonical;
mod matcher;

// Re-export main functions
pub use canonical::{canonicalize, DOCUMENT_EXTENSION};
pub use matcher::{matches_any_pattern, matches_pattern};

/// URL classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlClass {
    /// Excluded URL - matches an exclusion pattern, never fetched
    Excluded,
    /// Document URL - downloaded as raw bytes
    Document,
    /// Page URL - fetched and flattened to text
    Page,
}

/// Classifies a URL for dispatch
///
/// The URL is checked in the following priority order:
/// 1. Exclusion patterns (highest priority, case-sensitive substring)
/// 2. Document extension (case-insensitive `.pdf` suffix)
/// 3. Page (default)
///
/// Classification always inspects the URL as given, not its canonical form,
/// so query strings and original casing participate in pattern matching.
///
/// # Arguments
///
/// * `url` - The URL string to classify
/// * `exclude_patterns` - Exclusion patterns from the configuration
///
/// # Returns
///
/// The classification of the URL
///
/// # Examples
///
/// ```
/// use washi_press::url::{classify_url, UrlClass};
///
/// let patterns = vec!["youtube.com/watch".to_string()];
///
/// assert_eq!(
///     classify_url("https://youtube.com/watch?v=abc", &patterns),
///     UrlClass::Excluded
/// );
/// assert_eq!(
///     classify_url("https://example.com/files/report.pdf", &patterns),
///     UrlClass::Document
/// );
/// assert_eq!(
///     classify_url("https://example.com/about", &patterns),
///     UrlClass::Page
/// );
/// ```
pub fn classify_url(url: &str, exclude_patterns: &[String]) -> UrlClass {
    // Priority 1: Check exclusion patterns
    if matches_any_pattern(exclude_patterns, url) {
        return UrlClass::Excluded;
    }

    // Priority 2: Check document extension
    if url.to_ascii_lowercase().ends_with(DOCUMENT_EXTENSION) {
        return UrlClass::Document;
    }

    // Default: Page
    UrlClass::Page
}
