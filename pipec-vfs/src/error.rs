//! VFS Error Types

use std::fmt;

/// Result type for VFS operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Error type for VFS operations
#[derive(Debug, Clone, PartialEq)]
pub enum VfsError {
    /// File or directory not found
    NotFound { path: String },

    /// Permission denied
    PermissionDenied { path: String },

    /// Expected a file, found a directory (or the reverse)
    WrongKind { path: String, expected: &'static str },

    /// IO error
    Io { message: String },

    /// Custom error message
    Custom { message: String },
}

impl fmt::Display for VfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VfsError::NotFound { path } => write!(f, "Path not found: {}", path),
            VfsError::PermissionDenied { path } => write!(f, "Permission denied: {}", path),
            VfsError::WrongKind { path, expected } => {
                write!(f, "Expected a {} at '{}'", expected, path)
            }
            VfsError::Io { message } => write!(f, "IO error: {}", message),
            VfsError::Custom { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for VfsError {}

impl From<std::io::Error> for VfsError {
    fn from(err: std::io::Error) -> Self {
        VfsError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = VfsError::NotFound {
            path: "/a.marko".to_string(),
        };
        assert_eq!(err.to_string(), "Path not found: /a.marko");

        let err = VfsError::WrongKind {
            path: "/src".to_string(),
            expected: "file",
        };
        assert_eq!(err.to_string(), "Expected a file at '/src'");
    }

    #[test]
    fn test_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: VfsError = io.into();
        assert!(matches!(err, VfsError::Io { .. }));
        assert!(err.to_string().contains("disk on fire"));
    }
}
