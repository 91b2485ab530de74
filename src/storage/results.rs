//! Storage result types
//!
//! Defines result structures returned by storage operations.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::fs::File;

use crate::storage::ValidatedPath;

/// Whether an entry is a regular file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One direct child of a listed directory
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub name: String,
    /// Byte size; always 0 for directories.
    pub size: u64,
    #[serde(rename = "modTime")]
    pub mod_time: DateTime<Utc>,
    #[serde(skip)]
    pub kind: EntryKind,
}

/// Result of a directory listing operation
///
/// Both sequences keep the order the directory enumeration produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListResult {
    pub directories: Vec<EntryInfo>,
    pub files: Vec<EntryInfo>,
}

/// Result of a file upload operation
#[derive(Debug, Clone)]
pub struct UploadResult {
    pub path: ValidatedPath,
    pub size: u64,
}

/// An opened file ready to be streamed back to the client
#[derive(Debug)]
pub struct DownloadResult {
    pub file: File,
    pub path: ValidatedPath,
    pub size: u64,
}
