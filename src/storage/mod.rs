//! File system storage management
//!
//! Path confinement plus the file and directory operations built on it.

pub mod directories;
pub mod filesystem;
pub mod operations;
pub mod results;
pub mod validation;

pub use directories::{create_directory, remove_directory};
pub use operations::{delete_file, list_directory, open_file, upload_file};
pub use results::{DownloadResult, EntryInfo, EntryKind, ListResult, UploadResult};
pub use validation::{StorageRoot, ValidatedPath, validate_filename};
