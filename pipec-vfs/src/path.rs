//! Path helpers

use std::path::{Path, PathBuf};

/// Replace the extension of `path` with `ext`
///
/// An empty path is returned unchanged, a path without an extension gets one
/// appended (`.rc` becomes `.rc.js`), and only the last extension is replaced.
/// A leading dot on `ext` is ignored.
pub fn replace_extension(path: &Path, ext: &str) -> PathBuf {
    if path.as_os_str().is_empty() {
        return PathBuf::new();
    }
    path.with_extension(ext.trim_start_matches('.'))
}

/// The extension of `path`: the part of the file name after its last dot
pub fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}
