//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Entries {
    files: BTreeMap<String, Vec<u8>>,
    dirs: BTreeSet<String>,
}

/// An in-memory file system implementation.
///
/// Files are stored in a `BTreeMap`; a directory exists when it was created
/// explicitly or when some file lives below it.
///
/// # Example
/// ```
/// use pipec_vfs::{MemoryFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.write_file(Path::new("/src/a.marko"), b"hello").unwrap();
/// assert_eq!(fs.read_file(Path::new("/src/a.marko")).unwrap(), b"hello");
/// assert!(fs.is_dir(Path::new("/src")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new memory file system pre-populated with files.
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        if let Ok(mut entries) = fs.entries.write() {
            for (path, content) in files {
                let normalized = normalize(Path::new(path.as_ref()));
                entries.files.insert(normalized, content);
            }
        }
        fs
    }

    /// All file paths, sorted
    pub fn paths(&self) -> Vec<String> {
        match self.entries.read() {
            Ok(entries) => entries.files.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn read_entries(&self) -> VfsResult<std::sync::RwLockReadGuard<'_, Entries>> {
        self.entries.read().map_err(|_| poisoned())
    }

    fn write_entries(&self) -> VfsResult<std::sync::RwLockWriteGuard<'_, Entries>> {
        self.entries.write().map_err(|_| poisoned())
    }
}

/// Normalize a path for internal storage: forward slashes, no trailing slash.
fn normalize(path: &Path) -> String {
    let s = path.to_string_lossy().replace('\\', "/");
    if s.len() > 1 {
        s.trim_end_matches('/').to_string()
    } else {
        s
    }
}

fn poisoned() -> VfsError {
    VfsError::Custom {
        message: String::from("Lock poisoned"),
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = normalize(path);
        let entries = self.read_entries()?;
        entries
            .files
            .get(&normalized)
            .cloned()
            .ok_or(VfsError::NotFound { path: normalized })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let normalized = normalize(path);
        let mut entries = self.write_entries()?;
        if entries.dirs.contains(&normalized) {
            return Err(VfsError::WrongKind {
                path: normalized,
                expected: "file",
            });
        }
        entries.files.insert(normalized, content.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> VfsResult<()> {
        let normalized = normalize(path);
        let mut entries = self.write_entries()?;
        if entries.files.contains_key(&normalized) {
            return Err(VfsError::WrongKind {
                path: normalized,
                expected: "directory",
            });
        }
        entries.dirs.insert(normalized);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let normalized = normalize(path);
        match self.entries.read() {
            Ok(entries) => entries.files.contains_key(&normalized),
            Err(_) => false,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        let normalized = normalize(path);
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(_) => return false,
        };
        if entries.dirs.contains(&normalized) {
            return true;
        }
        let prefix = if normalized.ends_with('/') {
            normalized
        } else {
            format!("{}/", normalized)
        };
        entries
            .files
            .keys()
            .chain(entries.dirs.iter())
            .any(|p| p.starts_with(&prefix))
    }
}
