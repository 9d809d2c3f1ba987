//! File entries: the flat listing the builder consumes

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::CatalogError;

/// One file of the scanned tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileEntry {
    /// `/`-separated path relative to the scan root
    pub relative_path: String,
    /// Where to read it
    pub location: PathBuf,
}

impl FileEntry {
    pub fn new(relative_path: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
            location: location.into(),
        }
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Everything before the last component; the event key
    pub fn parent(&self) -> &str {
        self.relative_path
            .rsplit_once('/')
            .map_or("", |(parent, _)| parent)
    }

    /// Name of the directory holding the file
    pub fn parent_name(&self) -> Option<&str> {
        let parent = self.parent();
        if parent.is_empty() {
            return None;
        }
        parent.rsplit('/').next()
    }
}

/// Recursively list every regular file under `root`, sorted by relative path.
///
/// The root directory's own name is the first path component, so files placed
/// directly in `root` still belong to an event named after it. Entries that
/// cannot be read (permissions, dangling links, link loops) are skipped.
pub fn walk_directory(root: &Path) -> Result<Vec<FileEntry>, CatalogError> {
    if !root.is_dir() {
        return Err(CatalogError::NotADirectory {
            path: root.display().to_string(),
        });
    }
    let base = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());

    let mut entries: Vec<FileEntry> = WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|item| match item {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(path = ?e.path(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let mut joined = base.clone();
            for part in relative.components() {
                joined.push('/');
                joined.push_str(&part.as_os_str().to_string_lossy());
            }
            Some(FileEntry::new(joined, entry.into_path()))
        })
        .collect();

    entries.sort();
    debug!(root = %root.display(), files = entries.len(), "directory listed");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_path_parts() {
        let e = FileEntry::new("TeslaCam/SentryClips/2024-03-09_10-01-00/event.json", "x");
        assert_eq!(e.file_name(), "event.json");
        assert_eq!(e.parent(), "TeslaCam/SentryClips/2024-03-09_10-01-00");
        assert_eq!(e.parent_name(), Some("2024-03-09_10-01-00"));

        let bare = FileEntry::new("loose.mp4", "x");
        assert_eq!(bare.file_name(), "loose.mp4");
        assert_eq!(bare.parent(), "");
        assert_eq!(bare.parent_name(), None);
    }

    #[test]
    fn test_walk_directory() {
        let dir = tempfile::tempdir().unwrap();
        let event = dir.path().join("SentryClips").join("2024-03-09_10-01-00");
        fs::create_dir_all(&event).unwrap();
        fs::write(event.join("event.json"), "{}").unwrap();
        fs::write(event.join("2024-03-09_10-00-00-front.mp4"), b"").unwrap();

        let entries = walk_directory(dir.path()).unwrap();
        let base = dir.path().file_name().unwrap().to_string_lossy().into_owned();
        let paths: Vec<_> = entries.iter().map(|e| e.relative_path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                format!("{base}/SentryClips/2024-03-09_10-01-00/2024-03-09_10-00-00-front.mp4"),
                format!("{base}/SentryClips/2024-03-09_10-01-00/event.json"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_unreadable_entries() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let sentry = dir.path().join("SentryClips");
        let good = sentry.join("2024-03-09_10-01-00");
        fs::create_dir_all(&good).unwrap();
        fs::write(good.join("2024-03-09_10-00-00-front.mp4"), b"").unwrap();

        let broken = sentry.join("2024-03-09_11-00-00");
        fs::create_dir_all(&broken).unwrap();
        symlink(broken.join("gone.mp4"), broken.join("2024-03-09_11-00-00-front.mp4")).unwrap();
        symlink(&sentry, broken.join("loop")).unwrap();

        let entries = walk_directory(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name()).collect();
        assert_eq!(names, vec!["2024-03-09_10-00-00-front.mp4"]);
    }

    #[test]
    fn test_walk_rejects_file_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            walk_directory(&file),
            Err(CatalogError::NotADirectory { .. })
        ));
    }
}
