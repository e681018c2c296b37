/// Checks if a URL matches an exclusion pattern
///
/// Matching is plain substring containment, case-sensitive: the pattern
/// `"youtube.com/watch"` matches any URL containing that text anywhere.
/// An empty pattern matches nothing.
///
/// # Arguments
///
/// * `pattern` - The exclusion pattern
/// * `url` - The URL to check against the pattern
///
/// # Returns
///
/// * `true` - If the URL contains the pattern
/// * `false` - Otherwise
///
/// # Examples
///
/// ```
/// use washi_press::url::matches_pattern;
///
/// assert!(matches_pattern("youtube.com/watch", "https://youtube.com/watch?v=abc"));
/// assert!(matches_pattern("facebook.com/login", "https://m.facebook.com/login.php"));
/// assert!(!matches_pattern("youtube.com/watch", "https://youtube.com/channel/xyz"));
/// assert!(!matches_pattern("", "https://example.com/"));
/// ```
pub fn matches_pattern(pattern: &str, url: &str) -> bool {
    !pattern.is_empty() && url.contains(pattern)
}

/// Checks if a URL matches any of the given exclusion patterns
pub fn matches_any_pattern(patterns: &[String], url: &str) -> bool {
    patterns.iter().any(|pattern| matches_pattern(pattern, url))
}
