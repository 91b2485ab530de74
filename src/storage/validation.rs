//! Path validation
//!
//! Resolves client-supplied relative paths against the storage root and
//! proves the result cannot leave it.

use log::warn;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::StorageError;
use crate::storage::EntryKind;

/// The single directory all served content lives under.
///
/// Canonicalized once when opened so lexical checks and the real filesystem
/// agree on what the root is.
#[derive(Debug, Clone)]
pub struct StorageRoot {
    path: PathBuf,
}

/// An absolute location proven (at resolution time) to lie inside a
/// [`StorageRoot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    absolute: PathBuf,
    relative: PathBuf,
}

impl StorageRoot {
    /// Opens the storage root, creating it if missing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        fs::create_dir_all(path)?;

        let canonical = path.canonicalize()?;
        if !canonical.is_dir() {
            return Err(StorageError::WrongKind {
                path: canonical.display().to_string(),
                expected: EntryKind::Directory,
            });
        }

        Ok(Self { path: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Joins `segments` onto the root and validates the result.
    ///
    /// Every segment is split on `/` and `\` and treated as relative, so a
    /// leading separator never re-roots the path. `..` is resolved lexically
    /// and any attempt to climb above the root is rejected, even when later
    /// segments would descend back into it.
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Result<ValidatedPath, StorageError> {
        let requested = segments
            .iter()
            .map(|s| s.as_ref())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");

        let mut parts: Vec<&str> = Vec::new();
        for segment in segments {
            let segment = segment.as_ref();
            if segment.contains('\0') {
                return Err(self.reject(&requested, "NUL byte in path"));
            }

            for piece in segment.split(['/', '\\']) {
                match piece {
                    "" | "." => {}
                    ".." => {
                        if parts.pop().is_none() {
                            return Err(self.reject(&requested, "climbs above root"));
                        }
                    }
                    other => parts.push(other),
                }
            }
        }

        let relative: PathBuf = parts.iter().collect();
        // Drive prefixes or root components would let `join` replace the base.
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(self.reject(&requested, "non-relative component"));
        }

        let absolute = self.path.join(&relative);
        // Component-wise: `/data/store-other` does not start with `/data/store`.
        if !absolute.starts_with(&self.path) {
            return Err(self.reject(&requested, "outside root after normalization"));
        }

        self.ensure_real_containment(&absolute, &requested)?;

        Ok(ValidatedPath { absolute, relative })
    }

    /// Resolves `name` inside the directory `segments` as a symlink entry,
    /// without following it.
    ///
    /// Returns `None` when the entry is not a symlink. The parent directory
    /// gets the full containment check; the link itself may be dangling or
    /// point outside the root, since only the link is ever touched.
    pub fn resolve_link<S: AsRef<str>>(
        &self,
        segments: &[S],
        name: &str,
    ) -> Result<Option<ValidatedPath>, StorageError> {
        let name = validate_filename(name)?;
        let parent = self.resolve(segments)?;
        let absolute = parent.absolute.join(name);

        match absolute.symlink_metadata() {
            Ok(meta) if meta.file_type().is_symlink() => Ok(Some(ValidatedPath {
                absolute,
                relative: parent.relative.join(name),
            })),
            _ => Ok(None),
        }
    }

    /// Follows symlinks on the deepest existing ancestor of `absolute` and
    /// checks the real location is still under the root.
    fn ensure_real_containment(&self, absolute: &Path, requested: &str) -> Result<(), StorageError> {
        let mut probe = absolute;
        while probe.symlink_metadata().is_err() {
            match probe.parent() {
                Some(parent) => probe = parent,
                None => return Ok(()),
            }
        }

        match probe.canonicalize() {
            Ok(real) if real.starts_with(&self.path) => Ok(()),
            Ok(real) => {
                warn!(
                    "Symlink escape: {} resolves to {}",
                    probe.display(),
                    real.display()
                );
                Err(self.reject(requested, "symlink leads outside root"))
            }
            // A dangling link exists but has no provable target.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(self.reject(requested, "dangling symlink"))
            }
            Err(e) => Err(StorageError::Fault(e)),
        }
    }

    fn reject(&self, requested: &str, reason: &str) -> StorageError {
        warn!(
            "Confinement violation ({}): {:?} under {}",
            reason,
            requested,
            self.path.display()
        );
        StorageError::Confinement(requested.to_string())
    }
}

impl ValidatedPath {
    pub fn as_path(&self) -> &Path {
        &self.absolute
    }

    /// Path relative to the storage root; empty for the root itself.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    pub fn is_root(&self) -> bool {
        self.relative.as_os_str().is_empty()
    }

    /// Client-facing form: forward slashes, rooted at `/`.
    pub fn display_path(&self) -> String {
        let parts = self
            .relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>();
        format!("/{}", parts.join("/"))
    }
}

impl AsRef<Path> for ValidatedPath {
    fn as_ref(&self) -> &Path {
        &self.absolute
    }
}

/// Checks that `filename` names exactly one entry.
pub fn validate_filename(filename: &str) -> Result<&str, StorageError> {
    if filename.trim().is_empty() {
        return Err(StorageError::InvalidInput("Empty filename".into()));
    }
    if filename == "." || filename == ".." || filename.contains(['/', '\\', '\0']) {
        return Err(StorageError::InvalidInput(format!(
            "Invalid filename: {}",
            filename
        )));
    }
    Ok(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn root() -> (TempDir, StorageRoot) {
        let dir = TempDir::new().unwrap();
        let root = StorageRoot::open(dir.path().join("store")).unwrap();
        (dir, root)
    }

    #[test]
    fn test_empty_resolves_to_root() {
        let (_dir, root) = root();
        let none: [&str; 0] = [];

        let resolved = root.resolve(&none).unwrap();
        assert_eq!(resolved.as_path(), root.path());
        assert!(resolved.is_root());

        let resolved = root.resolve(&["", "."]).unwrap();
        assert!(resolved.is_root());
        assert_eq!(resolved.display_path(), "/");
    }

    #[test]
    fn test_traversal_rejected() {
        let (_dir, root) = root();

        for attempt in ["../../etc/passwd", "a/../../b", "..", "./..", "..\\secret"] {
            let result = root.resolve(&[attempt]);
            assert!(
                matches!(result, Err(StorageError::Confinement(_))),
                "{} should be rejected",
                attempt
            );
        }

        // Climbing out in one segment and back in through the next is still rejected.
        let store = root.path().file_name().unwrap().to_string_lossy().to_string();
        let result = root.resolve(&["..", store.as_str(), "x"]);
        assert!(matches!(result, Err(StorageError::Confinement(_))));
    }

    #[test]
    fn test_normalization_stays_inside() {
        let (_dir, root) = root();

        let a = root.resolve(&["a/b/../c"]).unwrap();
        let b = root.resolve(&["a/c"]).unwrap();
        assert_eq!(a, b);
        assert!(a.as_path().starts_with(root.path()));
        assert_eq!(a.display_path(), "/a/c");

        let joined = root.resolve(&["2024", "q1", "report.txt"]).unwrap();
        assert_eq!(joined.relative(), Path::new("2024/q1/report.txt"));
    }

    #[test]
    fn test_leading_separator_does_not_reroot() {
        let (_dir, root) = root();

        let resolved = root.resolve(&["/etc", "passwd"]).unwrap();
        assert_eq!(resolved.as_path(), root.path().join("etc/passwd"));
    }

    #[test]
    fn test_sibling_prefix_rejected() {
        let dir = TempDir::new().unwrap();
        let root = StorageRoot::open(dir.path().join("store")).unwrap();
        std::fs::create_dir_all(dir.path().join("store-other")).unwrap();

        let result = root.resolve(&["../store-other/secret.txt"]);
        assert!(matches!(result, Err(StorageError::Confinement(_))));

        let inside = root.resolve(&["store-other"]).unwrap();
        assert_eq!(inside.as_path(), root.path().join("store-other"));
    }

    #[test]
    fn test_nul_byte_rejected() {
        let (_dir, root) = root();
        assert!(matches!(
            root.resolve(&["a\0b"]),
            Err(StorageError::Confinement(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_rejected() {
        let dir = TempDir::new().unwrap();
        let root = StorageRoot::open(dir.path().join("store")).unwrap();
        let outside = dir.path().join("outside");
        std::fs::create_dir_all(&outside).unwrap();
        std::os::unix::fs::symlink(&outside, root.path().join("link")).unwrap();
        std::os::unix::fs::symlink(root.path().join("missing"), root.path().join("dangling"))
            .unwrap();

        assert!(matches!(
            root.resolve(&["link", "file.txt"]),
            Err(StorageError::Confinement(_))
        ));
        assert!(matches!(
            root.resolve(&["dangling"]),
            Err(StorageError::Confinement(_))
        ));

        std::fs::create_dir_all(root.path().join("real")).unwrap();
        std::os::unix::fs::symlink(root.path().join("real"), root.path().join("alias")).unwrap();
        assert!(root.resolve(&["alias", "file.txt"]).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_link_does_not_follow() {
        let dir = TempDir::new().unwrap();
        let root = StorageRoot::open(dir.path().join("store")).unwrap();
        let outside = dir.path().join("outside.txt");
        std::fs::write(&outside, b"x").unwrap();
        std::fs::create_dir_all(root.path().join("sub")).unwrap();
        std::os::unix::fs::symlink(&outside, root.path().join("sub/leak")).unwrap();
        std::fs::write(root.path().join("sub/plain.txt"), b"x").unwrap();

        let link = root.resolve_link(&["sub"], "leak").unwrap().unwrap();
        assert_eq!(link.display_path(), "/sub/leak");
        assert_eq!(link.as_path(), root.path().join("sub/leak"));

        assert!(root.resolve_link(&["sub"], "plain.txt").unwrap().is_none());
        assert!(root.resolve_link(&["sub"], "absent").unwrap().is_none());
        assert!(matches!(
            root.resolve_link(&[".."], "leak"),
            Err(StorageError::Confinement(_))
        ));
        assert!(matches!(
            root.resolve_link(&["sub"], ".."),
            Err(StorageError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_filename() {
        assert_eq!(validate_filename("report.txt").unwrap(), "report.txt");
        assert_eq!(validate_filename("..hidden").unwrap(), "..hidden");

        for bad in ["", "  ", ".", "..", "a/b", "a\\b", "x\0"] {
            assert!(
                matches!(validate_filename(bad), Err(StorageError::InvalidInput(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }
}
