//! File system helpers
//!
//! Kind checks and idempotent directory creation shared by the file and
//! directory operations.

use std::io;
use tokio::fs;

use crate::error::StorageError;
use crate::storage::{EntryKind, ValidatedPath};

/// Returns the kind of entry at `path`, or `None` if nothing is there.
pub async fn entry_kind(path: &ValidatedPath) -> Result<Option<EntryKind>, StorageError> {
    match fs::metadata(path.as_path()).await {
        Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
        Ok(_) => Ok(Some(EntryKind::File)),
        Err(e) if is_absent(&e) => Ok(None),
        Err(e) => Err(StorageError::Fault(e)),
    }
}

/// True when `error` means the entry does not exist, including the case where
/// an ancestor along the path is a regular file.
fn is_absent(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Fails with `NotFound` or `WrongKind` unless `path` is an existing entry of
/// the `expected` kind.
pub async fn require_kind(path: &ValidatedPath, expected: EntryKind) -> Result<(), StorageError> {
    match entry_kind(path).await? {
        Some(kind) if kind == expected => Ok(()),
        Some(_) => Err(StorageError::WrongKind {
            path: path.display_path(),
            expected,
        }),
        None => Err(StorageError::NotFound(path.display_path())),
    }
}

/// mkdir -p; an existing directory is success, an existing file is not.
pub async fn ensure_directory(path: &ValidatedPath) -> Result<(), StorageError> {
    match entry_kind(path).await? {
        Some(EntryKind::Directory) => Ok(()),
        Some(EntryKind::File) => Err(StorageError::WrongKind {
            path: path.display_path(),
            expected: EntryKind::Directory,
        }),
        None => match fs::create_dir_all(path.as_path()).await {
            Ok(()) => Ok(()),
            // Some ancestor is a regular file.
            Err(e) if e.kind() == io::ErrorKind::NotADirectory => {
                Err(StorageError::WrongKind {
                    path: path.display_path(),
                    expected: EntryKind::Directory,
                })
            }
            Err(e) => Err(StorageError::Fault(e)),
        },
    }
}
