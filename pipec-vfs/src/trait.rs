//! VirtualFileSystem trait definition

use crate::error::VfsResult;
use std::path::Path;

/// Virtual File System trait
///
/// Backing store for loaders and emitters, decoupling them from specific
/// file system implementations.
///
/// # Implementations
/// - `MemoryFileSystem`: In-memory file system
/// - `NativeFileSystem`: Native OS file system
pub trait VirtualFileSystem: Send + Sync {
    /// Read file contents
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Write file contents
    ///
    /// Creates the file if it doesn't exist, truncates it if it does.
    /// Missing parent directories are created.
    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()>;

    /// Create a directory and all of its missing parents
    fn create_dir_all(&self, path: &Path) -> VfsResult<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory
    fn is_dir(&self, path: &Path) -> bool;
}
