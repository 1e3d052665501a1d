//! Pipec Virtual File System
//!
//! Virtual files flowing through a Pipec pipeline, plus a file system
//! abstraction with memory and native backends.
//!
//! # Usage
//! ```rust
//! use pipec_vfs::{Contents, VirtualFile};
//!
//! let mut file = VirtualFile::buffered("src/view.marko", b"<div/>".to_vec());
//! assert!(file.is_buffer());
//! file.set_extension("js");
//! assert_eq!(file.extension(), Some("js"));
//! ```

mod error;
mod file;
mod memory;
mod native;
mod path;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use file::{ContentKind, Contents, VirtualFile};
pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use path::{extension_of, replace_extension};
pub use r#trait::VirtualFileSystem;

/// Create a new memory-based file system.
pub fn memory_fs() -> MemoryFileSystem {
    MemoryFileSystem::new()
}

/// Create a new native file system.
pub fn native_fs() -> NativeFileSystem {
    NativeFileSystem::new()
}
