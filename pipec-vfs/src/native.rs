//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::io::ErrorKind;
use std::path::Path;

/// A native OS file system implementation.
///
/// This wraps `std::fs` operations and provides the `VirtualFileSystem`
/// interface for local file access.
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self
    }
}

fn map_io(path: &Path, err: std::io::Error) -> VfsError {
    let path = path.to_string_lossy().to_string();
    match err.kind() {
        ErrorKind::NotFound => VfsError::NotFound { path },
        ErrorKind::PermissionDenied => VfsError::PermissionDenied { path },
        _ => err.into(),
    }
}

impl VirtualFileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        if path.is_dir() {
            return Err(VfsError::WrongKind {
                path: path.to_string_lossy().to_string(),
                expected: "file",
            });
        }
        std::fs::read(path).map_err(|e| map_io(path, e))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| map_io(parent, e))?;
        }
        std::fs::write(path, content).map_err(|e| map_io(path, e))
    }

    fn create_dir_all(&self, path: &Path) -> VfsResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
