//! Directory operations
//!
//! Creation (mkdir -p) and recursive removal of directories under the
//! storage root.

use log::{error, info};
use tokio::fs;

use crate::error::StorageError;
use crate::storage::filesystem::{ensure_directory, require_kind};
use crate::storage::results::EntryKind;
use crate::storage::validation::{StorageRoot, ValidatedPath};

/// Creates `path/name` and any missing ancestors.
///
/// Either part may be empty, but not both. Creating a directory that already
/// exists succeeds.
pub async fn create_directory(
    root: &StorageRoot,
    path: &str,
    name: &str,
) -> Result<ValidatedPath, StorageError> {
    if path.trim().is_empty() && name.trim().is_empty() {
        return Err(StorageError::InvalidInput(
            "Path and name are required".into(),
        ));
    }

    let target = root.resolve(&[path, name])?;
    ensure_directory(&target).await?;

    info!(
        "Created directory {} (real: {})",
        target.display_path(),
        target.as_path().display()
    );
    Ok(target)
}

/// Removes `path/name` and everything below it.
///
/// The target must exist and be a directory. The storage root itself is never
/// removable.
pub async fn remove_directory(
    root: &StorageRoot,
    path: &str,
    name: &str,
) -> Result<ValidatedPath, StorageError> {
    let target = root.resolve(&[path, name])?;
    if target.is_root() {
        return Err(StorageError::Confinement(format!(
            "{}/{} names the storage root",
            path, name
        )));
    }

    require_kind(&target, EntryKind::Directory).await?;

    fs::remove_dir_all(target.as_path()).await.map_err(|e| {
        error!("Failed to remove directory {}: {}", target.display_path(), e);
        StorageError::from_io(e, &target.display_path())
    })?;

    info!("Removed directory {} recursively", target.display_path());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root() -> (TempDir, StorageRoot) {
        let dir = TempDir::new().unwrap();
        let root = StorageRoot::open(dir.path()).unwrap();
        (dir, root)
    }

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let (_dir, root) = root();

        let first = create_directory(&root, "projects", "alpha").await.unwrap();
        let second = create_directory(&root, "projects", "alpha").await.unwrap();
        assert_eq!(first, second);
        assert!(root.path().join("projects/alpha").is_dir());

        let children: Vec<_> = std::fs::read_dir(root.path().join("projects"))
            .unwrap()
            .collect();
        assert_eq!(children.len(), 1);
    }

    #[tokio::test]
    async fn test_create_composes_path_and_name() {
        let (_dir, root) = root();

        let only_name = create_directory(&root, "", "a/b").await.unwrap();
        assert_eq!(only_name.display_path(), "/a/b");

        let only_path = create_directory(&root, "c/d", "").await.unwrap();
        assert_eq!(only_path.display_path(), "/c/d");

        assert!(matches!(
            create_directory(&root, " ", "").await,
            Err(StorageError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_escape_and_files() {
        let (_dir, root) = root();
        std::fs::write(root.path().join("taken"), b"x").unwrap();

        assert!(matches!(
            create_directory(&root, "..", "evil").await,
            Err(StorageError::Confinement(_))
        ));
        assert!(matches!(
            create_directory(&root, "", "taken").await,
            Err(StorageError::WrongKind {
                expected: EntryKind::Directory,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_remove_is_recursive() {
        let (_dir, root) = root();
        std::fs::create_dir_all(root.path().join("old/deep/er")).unwrap();
        std::fs::write(root.path().join("old/deep/file.bin"), b"data").unwrap();

        remove_directory(&root, "", "old").await.unwrap();
        assert!(!root.path().join("old").exists());
        assert!(root.path().is_dir());
    }

    #[tokio::test]
    async fn test_remove_distinguishes_missing_and_file() {
        let (_dir, root) = root();
        std::fs::write(root.path().join("file.txt"), b"x").unwrap();

        assert!(matches!(
            remove_directory(&root, "", "ghost").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            remove_directory(&root, "", "file.txt").await,
            Err(StorageError::WrongKind {
                expected: EntryKind::Directory,
                ..
            })
        ));
        assert!(root.path().join("file.txt").exists());
    }

    #[tokio::test]
    async fn test_remove_never_deletes_root() {
        let (_dir, root) = root();
        std::fs::create_dir_all(root.path().join("a")).unwrap();

        assert!(matches!(
            remove_directory(&root, "a", "..").await,
            Err(StorageError::Confinement(_))
        ));
        assert!(matches!(
            remove_directory(&root, "", ".").await,
            Err(StorageError::Confinement(_))
        ));
        assert!(root.path().join("a").is_dir());
    }
}
