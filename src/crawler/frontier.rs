//! Frontier queue of URLs awaiting processing
//!
//! This module manages the breadth-first crawl order:
//! - Strict FIFO consumption of discovered URLs
//! - A companion membership set so a URL cannot wait in the queue twice

use std::collections::{HashSet, VecDeque};

/// A URL queued for processing, together with the page that discovered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The URL to process
    pub url: String,

    /// URL of the page the link was found on; empty for the seed
    pub parent_url: String,
}

/// FIFO frontier with constant-time queue membership checks
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    queued: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
        }
    }

    /// Adds a URL to the back of the queue
    ///
    /// Returns `false` without enqueuing when the URL is already waiting.
    pub fn enqueue(&mut self, url: &str, parent_url: &str) -> bool {
        if !self.queued.insert(url.to_string()) {
            return false;
        }

        self.queue.push_back(FrontierEntry {
            url: url.to_string(),
            parent_url: parent_url.to_string(),
        });
        true
    }

    /// Removes and returns the oldest queued URL
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        let entry = self.queue.pop_front()?;
        self.queued.remove(&entry.url);
        Some(entry)
    }

    /// Checks whether a URL is currently waiting in the queue
    pub fn contains(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    /// Number of queued URLs
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}
