//! Virtual file definition

use crate::path::{extension_of, replace_extension};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Contents of a virtual file
///
/// Exactly one state holds at a time.
#[derive(Default)]
pub enum Contents {
    /// No contents, e.g. a directory entry
    #[default]
    Null,
    /// Fully buffered bytes
    Buffer(Vec<u8>),
    /// A live byte stream
    Stream(Box<dyn Read + Send>),
}

/// Content state of a file, without the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Null,
    Buffer,
    Stream,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Null => write!(f, "null"),
            ContentKind::Buffer => write!(f, "buffer"),
            ContentKind::Stream => write!(f, "stream"),
        }
    }
}

impl Contents {
    /// Get the content state
    pub fn kind(&self) -> ContentKind {
        match self {
            Contents::Null => ContentKind::Null,
            Contents::Buffer(_) => ContentKind::Buffer,
            Contents::Stream(_) => ContentKind::Stream,
        }
    }

    /// Borrow the buffered bytes, if buffered
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Contents::Null => write!(f, "Null"),
            Contents::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
            Contents::Stream(_) => write!(f, "Stream(..)"),
        }
    }
}

impl From<Vec<u8>> for Contents {
    fn from(bytes: Vec<u8>) -> Self {
        Contents::Buffer(bytes)
    }
}

impl From<String> for Contents {
    fn from(text: String) -> Self {
        Contents::Buffer(text.into_bytes())
    }
}

/// One logical source file flowing through a pipeline
///
/// Stages receive the file by value, mutate `path` and `contents` in place and
/// hand the same value on.
#[derive(Debug)]
pub struct VirtualFile {
    /// File path (absolute or pipeline-relative)
    pub path: PathBuf,
    /// Directory the file is considered relative to
    pub base: PathBuf,
    /// File contents
    pub contents: Contents,
}

impl VirtualFile {
    /// Create a file with no contents
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_contents(path, Contents::Null)
    }

    /// Create a file with buffered contents
    pub fn buffered(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::with_contents(path, Contents::Buffer(bytes.into()))
    }

    /// Create a file backed by a live stream
    pub fn streaming(path: impl Into<PathBuf>, reader: impl Read + Send + 'static) -> Self {
        Self::with_contents(path, Contents::Stream(Box::new(reader)))
    }

    /// Create a file with the given contents; `base` defaults to the parent of `path`
    pub fn with_contents(path: impl Into<PathBuf>, contents: Contents) -> Self {
        let path = path.into();
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            path,
            base,
            contents,
        }
    }

    /// Set the base directory
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self.contents, Contents::Buffer(_))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream(_))
    }

    /// Extension of the current path
    pub fn extension(&self) -> Option<&str> {
        extension_of(&self.path)
    }

    /// Replace the extension of the current path
    pub fn set_extension(&mut self, ext: &str) {
        self.path = replace_extension(&self.path, ext);
    }

    /// Path relative to `base`
    ///
    /// Falls back to the bare file name when `path` is not under `base`.
    pub fn relative(&self) -> PathBuf {
        match self.path.strip_prefix(&self.base) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => self
                .path
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_default(),
        }
    }

    /// Read the contents into memory, draining a stream if needed
    ///
    /// Returns `None` for null contents.
    pub fn read_all(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        match std::mem::take(&mut self.contents) {
            Contents::Null => Ok(None),
            Contents::Buffer(bytes) => {
                self.contents = Contents::Buffer(bytes.clone());
                Ok(Some(bytes))
            }
            Contents::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                self.contents = Contents::Buffer(bytes.clone());
                Ok(Some(bytes))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_content_states() {
        let null = VirtualFile::new("/src/dir");
        assert!(null.is_null());
        assert_eq!(null.contents.kind(), ContentKind::Null);

        let buffered = VirtualFile::buffered("/src/a.marko", "hi");
        assert!(buffered.is_buffer());
        assert_eq!(buffered.contents.as_bytes(), Some(&b"hi"[..]));

        let streaming = VirtualFile::streaming("/src/b.marko", Cursor::new(vec![1, 2]));
        assert!(streaming.is_stream());
        assert!(streaming.contents.as_bytes().is_none());
    }

    #[test]
    fn test_base_defaults_to_parent() {
        let file = VirtualFile::new("/src/views/page.marko");
        assert_eq!(file.base, PathBuf::from("/src/views"));
        assert_eq!(file.relative(), PathBuf::from("page.marko"));
    }

    #[test]
    fn test_relative_to_custom_base() {
        let file = VirtualFile::new("/src/views/page.marko").with_base("/src");
        assert_eq!(file.relative(), PathBuf::from("views/page.marko"));

        let outside = VirtualFile::new("/other/page.marko").with_base("/src");
        assert_eq!(outside.relative(), PathBuf::from("page.marko"));
    }

    #[test]
    fn test_set_extension() {
        let mut file = VirtualFile::buffered("/src/page.marko", "x");
        file.set_extension("js");
        assert_eq!(file.path, PathBuf::from("/src/page.js"));
        assert_eq!(file.extension(), Some("js"));
    }

    #[test]
    fn test_read_all_drains_stream() {
        let mut file = VirtualFile::streaming("/a.txt", Cursor::new(b"abc".to_vec()));
        let bytes = file.read_all().unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"abc"[..]));
        assert!(file.is_buffer());

        let mut null = VirtualFile::new("/dir");
        assert!(null.read_all().unwrap().is_none());
        assert!(null.is_null());
    }

    #[test]
    fn test_default_contents_is_null() {
        assert_eq!(Contents::default().kind(), ContentKind::Null);
    }

    #[test]
    fn test_debug_hides_payload() {
        let file = VirtualFile::buffered("/a", vec![0u8; 4]);
        let dbg = format!("{:?}", file);
        assert!(dbg.contains("Buffer(4 bytes)"));
    }
}
