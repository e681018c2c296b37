//! Storage module for archiving crawl artifacts
//!
//! This module handles everything the crawl persists to the object store:
//! - Flattened page text and raw document artifacts
//! - The metadata CSV describing every stored artifact
//! - The failure CSV recording URLs that could not be archived

mod archive;
mod fs;
mod traits;

pub use archive::{compute_checksum, Archive};
pub use fs::FsObjectStore;
pub use traits::{ObjectStore, StorageError, StorageResult};

use chrono::Utc;

/// Roles granted access to every archived artifact
///
/// Reserved for per-row access control; currently the same for all rows.
pub const DEFAULT_ROLES: &[&str] = &["student", "counsellor"];

/// Column headers of the metadata CSV export
pub const METADATA_HEADER: [&str; 14] = [
    "parent_url",
    "url",
    "title",
    "std_flag",
    "sub_flag",
    "interpretation_date",
    "duplicate_std_numbers",
    "archive_status",
    "publication_id",
    "output_filename",
    "output_path",
    "checksum",
    "creation_date",
    "roles",
];

/// Column headers of the failure CSV export
pub const FAILURE_HEADER: [&str; 2] = ["url", "error_message"];

/// One row of the metadata export, describing a stored artifact
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    pub parent_url: String,
    pub url: String,
    pub title: String,
    pub std_flag: Option<String>,
    pub sub_flag: Option<String>,
    pub interpretation_date: Option<String>,
    pub duplicate_std_numbers: Option<String>,
    pub archive_status: Option<String>,
    pub publication_id: Option<String>,
    pub output_filename: String,
    pub output_path: String,
    pub checksum: String,
    pub creation_date: String,
    pub roles: String,
}

impl ArtifactRecord {
    /// Builds a record for a just-stored artifact
    ///
    /// The reserved columns stay empty; creation date and the constant role
    /// list are filled in here.
    pub fn new(
        parent_url: &str,
        url: &str,
        title: &str,
        output_filename: &str,
        output_path: &str,
        checksum: &str,
    ) -> Self {
        Self {
            parent_url: parent_url.to_string(),
            url: url.to_string(),
            title: title.to_string(),
            std_flag: None,
            sub_flag: None,
            interpretation_date: None,
            duplicate_std_numbers: None,
            archive_status: None,
            publication_id: None,
            output_filename: output_filename.to_string(),
            output_path: output_path.to_string(),
            checksum: checksum.to_string(),
            creation_date: Utc::now().to_rfc3339(),
            roles: render_roles(),
        }
    }
}

/// One row of the failure export
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub url: String,
    pub error_message: String,
}

/// Renders the constant role list as a JSON array cell
fn render_roles() -> String {
    serde_json::to_string(DEFAULT_ROLES).unwrap_or_else(|_| "[]".to_string())
}
