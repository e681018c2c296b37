//! Artifact archive
//!
//! Owns the object store together with the in-memory metadata and failure
//! rows, and implements the artifact naming, checksum, and CSV export rules.

use crate::config::StorageConfig;
use crate::storage::traits::{ObjectStore, StorageError, StorageResult};
use crate::storage::{ArtifactRecord, FailureRecord, FAILURE_HEADER, METADATA_HEADER};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Characters replaced with underscores when deriving a text filename
const FILENAME_SANITIZE: [char; 8] = ['/', ':', '*', '?', '"', '<', '>', '|'];

/// Longest filename stem kept for text artifacts
const FILENAME_STEM_LIMIT: usize = 100;

/// Accumulating writer for crawl artifacts and their exports
///
/// Artifacts go to the store as they arrive; metadata and failure rows
/// accumulate in memory until the end-of-run flush. An upload that fails
/// turns into a failure row instead of aborting the crawl.
pub struct Archive {
    store: Box<dyn ObjectStore + Send>,
    config: StorageConfig,
    metadata: Vec<ArtifactRecord>,
    failures: Vec<FailureRecord>,
}

impl Archive {
    /// Opens the archive over a store, creating both artifact prefixes
    pub fn new(store: Box<dyn ObjectStore + Send>, config: StorageConfig) -> StorageResult<Self> {
        store.ensure_prefix(&config.text_prefix)?;
        store.ensure_prefix(&config.binary_prefix)?;

        Ok(Self {
            store,
            config,
            metadata: Vec::new(),
            failures: Vec::new(),
        })
    }

    /// Stores a flattened page text artifact
    ///
    /// The stored payload carries the source URL above the text, separated by
    /// a blank line, so every file names its own origin. The checksum covers
    /// the text alone.
    pub fn upload_text(&mut self, url: &str, content: &str, parent_url: &str, title: &str) {
        if let Err(e) = self.try_upload_text(url, content, parent_url, title) {
            self.record_failure(url, &e.to_string());
        }
    }

    fn try_upload_text(
        &mut self,
        url: &str,
        content: &str,
        parent_url: &str,
        title: &str,
    ) -> StorageResult<()> {
        let checksum = compute_checksum(content.as_bytes());
        let filename = text_filename(url);
        let key = format!("{}/{}", self.config.text_prefix, filename);
        let payload = format!("{}\n\n{}", url, content);

        self.store.put_object(&key, payload.as_bytes())?;
        self.metadata.push(ArtifactRecord::new(
            parent_url, url, title, &filename, &key, &checksum,
        ));
        Ok(())
    }

    /// Stores a downloaded document artifact byte for byte
    ///
    /// Document rows carry the title sentinel `N/A`.
    pub fn upload_binary(&mut self, url: &str, data: &[u8], parent_url: &str) {
        if let Err(e) = self.try_upload_binary(url, data, parent_url) {
            self.record_failure(url, &e.to_string());
        }
    }

    fn try_upload_binary(&mut self, url: &str, data: &[u8], parent_url: &str) -> StorageResult<()> {
        let checksum = compute_checksum(data);
        let filename = binary_filename(url);
        let key = format!("{}/{}", self.config.binary_prefix, filename);

        self.store.put_object(&key, data)?;
        self.metadata.push(ArtifactRecord::new(
            parent_url, url, "N/A", &filename, &key, &checksum,
        ));
        Ok(())
    }

    /// Records a URL that could not be fetched or stored
    pub fn record_failure(&mut self, url: &str, error_message: &str) {
        debug!(url = %url, error = %error_message, "Recorded failure");
        self.failures.push(FailureRecord {
            url: url.to_string(),
            error_message: error_message.to_string(),
        });
    }

    /// Writes the metadata CSV export to the store
    ///
    /// The export always carries the header row, even after a run that stored
    /// nothing.
    pub fn flush_metadata(&self) -> StorageResult<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(METADATA_HEADER)?;

        for record in &self.metadata {
            writer.write_record([
                record.parent_url.as_str(),
                record.url.as_str(),
                record.title.as_str(),
                record.std_flag.as_deref().unwrap_or(""),
                record.sub_flag.as_deref().unwrap_or(""),
                record.interpretation_date.as_deref().unwrap_or(""),
                record.duplicate_std_numbers.as_deref().unwrap_or(""),
                record.archive_status.as_deref().unwrap_or(""),
                record.publication_id.as_deref().unwrap_or(""),
                record.output_filename.as_str(),
                record.output_path.as_str(),
                record.checksum.as_str(),
                record.creation_date.as_str(),
                record.roles.as_str(),
            ])?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))?;
        self.store.put_object(&self.config.metadata_key, &data)
    }

    /// Writes the failure CSV export to the store
    pub fn flush_failures(&self) -> StorageResult<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(FAILURE_HEADER)?;

        for record in &self.failures {
            writer.write_record([record.url.as_str(), record.error_message.as_str()])?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| StorageError::Io(e.into_error()))?;
        self.store.put_object(&self.config.failures_key, &data)
    }

    /// Number of artifacts stored so far
    pub fn metadata_count(&self) -> usize {
        self.metadata.len()
    }

    /// Number of recorded failures
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Computes the hex-encoded SHA-256 checksum of artifact content
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Derives the text artifact filename from the page URL
///
/// Characters unsafe in filenames become underscores and the stem is capped
/// at 100 characters before the extension is appended.
fn text_filename(url: &str) -> String {
    let stem: String = url
        .chars()
        .map(|c| {
            if FILENAME_SANITIZE.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .take(FILENAME_STEM_LIMIT)
        .collect();

    format!("{}.txt", stem)
}

/// Derives the document artifact filename from the final URL segment
fn binary_filename(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}
