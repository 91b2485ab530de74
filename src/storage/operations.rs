//! Storage operations
//!
//! Upload, download, delete and list for files under the storage root. Every
//! operation resolves its inputs through [`StorageRoot::resolve`] before it
//! touches the disk.

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tokio::fs;
use uuid::Uuid;

use crate::error::StorageError;
use crate::storage::filesystem::{ensure_directory, entry_kind, require_kind};
use crate::storage::results::{DownloadResult, EntryInfo, EntryKind, ListResult, UploadResult};
use crate::storage::validation::{StorageRoot, validate_filename};

/// Writes `content` to `path/filename`, creating `path` if needed.
///
/// An existing file of the same name is replaced. The bytes go to a temporary
/// sibling first and are renamed into place, so readers never observe a
/// half-written file; concurrent uploads to the same name race and the last
/// rename wins.
pub async fn upload_file(
    root: &StorageRoot,
    path: &str,
    filename: &str,
    content: &[u8],
) -> Result<UploadResult, StorageError> {
    let filename = validate_filename(filename)?;

    let directory = root.resolve(&[path])?;
    ensure_directory(&directory).await?;

    let target = root.resolve(&[path, filename])?;
    if entry_kind(&target).await? == Some(EntryKind::Directory) {
        return Err(StorageError::WrongKind {
            path: target.display_path(),
            expected: EntryKind::File,
        });
    }

    let temp_path = temp_sibling(target.as_path());
    if let Err(e) = fs::write(&temp_path, content).await {
        error!(
            "Failed to write upload {} (temp: {}): {}",
            target.display_path(),
            temp_path.display(),
            e
        );
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::Fault(e));
    }

    if let Err(e) = fs::rename(&temp_path, target.as_path()).await {
        error!(
            "Failed to move upload into place {}: {}",
            target.display_path(),
            e
        );
        let _ = fs::remove_file(&temp_path).await;
        return Err(StorageError::Fault(e));
    }

    info!(
        "Stored file {} ({} bytes, real: {})",
        target.display_path(),
        content.len(),
        target.as_path().display()
    );

    Ok(UploadResult {
        path: target,
        size: content.len() as u64,
    })
}

/// Opens `path/filename` for streaming back to the client.
pub async fn open_file(
    root: &StorageRoot,
    path: &str,
    filename: &str,
) -> Result<DownloadResult, StorageError> {
    let filename = validate_filename(filename)?;
    let target = root.resolve(&[path, filename])?;
    require_kind(&target, EntryKind::File).await?;

    let file = fs::File::open(target.as_path())
        .await
        .map_err(|e| StorageError::from_io(e, &target.display_path()))?;
    let size = file
        .metadata()
        .await
        .map_err(|e| StorageError::from_io(e, &target.display_path()))?
        .len();

    info!(
        "Prepared file retrieval for {} ({} bytes)",
        target.display_path(),
        size
    );

    Ok(DownloadResult {
        file,
        path: target,
        size,
    })
}

/// Deletes exactly one file. Directories are refused with `WrongKind`.
///
/// A symlink whose target is missing or outside the root can still be
/// unlinked; the target itself is never touched.
pub async fn delete_file(
    root: &StorageRoot,
    path: &str,
    filename: &str,
) -> Result<(), StorageError> {
    let filename = validate_filename(filename)?;
    let target = match root.resolve(&[path, filename]) {
        Ok(target) => {
            require_kind(&target, EntryKind::File).await?;
            target
        }
        Err(StorageError::Confinement(requested)) => match root.resolve_link(&[path], filename)? {
            Some(link) => {
                info!("Unlinking unresolvable symlink {}", link.display_path());
                link
            }
            None => return Err(StorageError::Confinement(requested)),
        },
        Err(e) => return Err(e),
    };

    match fs::remove_file(target.as_path()).await {
        Ok(()) => {
            info!(
                "Deleted file {} (real: {})",
                target.display_path(),
                target.as_path().display()
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to delete file {}: {}", target.display_path(), e);
            Err(StorageError::from_io(e, &target.display_path()))
        }
    }
}

/// Lists the direct children of `path`, split into directories and files.
///
/// Symlinks are classified by what they point at, matching the kind checks of
/// the other operations; a broken link lists as a file. Entries whose metadata
/// cannot be read are skipped. A missing directory is `NotFound`, never an
/// empty listing.
pub async fn list_directory(root: &StorageRoot, path: &str) -> Result<ListResult, StorageError> {
    let directory = root.resolve(&[path])?;
    require_kind(&directory, EntryKind::Directory).await?;

    let mut entries = fs::read_dir(directory.as_path()).await.map_err(|e| {
        error!("Failed to list directory {}: {}", directory.display_path(), e);
        StorageError::from_io(e, &directory.display_path())
    })?;

    let mut listing = ListResult::default();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();

        let metadata = match fs::metadata(entry.path()).await {
            Ok(metadata) => metadata,
            Err(_) => match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Skipping {} in {}: {}", name, directory.display_path(), e);
                    continue;
                }
            },
        };

        let mod_time: DateTime<Utc> = metadata
            .modified()
            .unwrap_or(UNIX_EPOCH)
            .into();

        if metadata.is_dir() {
            listing.directories.push(EntryInfo {
                name,
                size: 0,
                mod_time,
                kind: EntryKind::Directory,
            });
        } else {
            listing.files.push(EntryInfo {
                name,
                size: metadata.len(),
                mod_time,
                kind: EntryKind::File,
            });
        }
    }

    info!(
        "Listed directory {} - {} directories, {} files",
        directory.display_path(),
        listing.directories.len(),
        listing.files.len()
    );

    Ok(listing)
}

/// Fixed-length name, so any filename that fits on disk also fits its temp file.
fn temp_sibling(target: &Path) -> PathBuf {
    target.with_file_name(format!(".upload-{}.tmp", Uuid::new_v4().simple()))
}
