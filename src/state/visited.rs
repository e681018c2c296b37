use crate::Result;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Set of canonical URLs already processed, backed by an append-only log
///
/// Every mark is written through to the log before the crawl moves on, so an
/// interrupted run can resume from the same file: URLs recorded by earlier
/// runs are skipped and only unfinished work is redone.
#[derive(Debug)]
pub struct VisitedSet {
    urls: HashSet<String>,
    log: File,
}

impl VisitedSet {
    /// Opens the visited set, loading any URLs recorded by earlier runs
    ///
    /// A missing log file starts an empty set. Blank lines and duplicate
    /// entries in the log are collapsed on load.
    pub fn load(path: &Path) -> Result<Self> {
        let mut urls = HashSet::new();

        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                let line = line?;
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    urls.insert(trimmed.to_string());
                }
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let log = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self { urls, log })
    }

    /// Records a canonical URL as visited, appending it to the log
    ///
    /// Returns `true` if the URL was newly inserted. Already-visited URLs are
    /// not written again.
    pub fn mark(&mut self, url: &str) -> Result<bool> {
        if !self.urls.insert(url.to_string()) {
            return Ok(false);
        }

        writeln!(self.log, "{}", url)?;
        self.log.flush()?;
        Ok(true)
    }

    /// Checks whether a canonical URL has already been visited
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Number of visited URLs
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns true if no URL has been visited yet
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
