//! File Emitter - 输出到虚拟文件系统

use crate::component::{Component, ComponentKind, ComponentMetadata};
use crate::emitter::Emitter;
use crate::error::EmitterError;
use pipec_vfs::{VfsError, VirtualFile, VirtualFileSystem};
use std::collections::HashSet;
use std::path::{Component as PathComponent, Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// 文件发射器
///
/// 按文件相对于 `base` 的路径写入输出目录；无内容文件只创建目录。
/// 同一发射器不会两次写入同一个文件。
pub struct FileEmitter {
    vfs: Arc<dyn VirtualFileSystem>,
    out_dir: PathBuf,
    written: Mutex<HashSet<PathBuf>>,
}

impl FileEmitter {
    /// 创建新的文件发射器
    pub fn new(vfs: Arc<dyn VirtualFileSystem>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            vfs,
            out_dir: out_dir.into(),
            written: Mutex::new(HashSet::new()),
        }
    }

    pub fn out_dir(&self) -> &PathBuf {
        &self.out_dir
    }

    /// Resolve the destination, refusing anything that leaves `out_dir`
    fn destination(&self, file: &VirtualFile) -> Result<PathBuf, EmitterError> {
        let relative = file.relative();
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                PathComponent::ParentDir | PathComponent::RootDir | PathComponent::Prefix(_)
            )
        });
        let dest = self.out_dir.join(&relative);
        if escapes {
            return Err(EmitterError::WriteFailed {
                path: dest,
                source: VfsError::Custom {
                    message: format!(
                        "'{}' is outside the output directory",
                        relative.display()
                    ),
                },
            });
        }
        Ok(dest)
    }

    /// Claim `dest` for this run; false if it was already written
    fn claim(&self, dest: &Path) -> bool {
        let mut written = self
            .written
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        written.insert(dest.to_path_buf())
    }
}

impl Component for FileEmitter {
    fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new(
            "file_emitter",
            env!("CARGO_PKG_VERSION"),
            ComponentKind::Emitter,
            Some("输出到文件"),
        )
    }
}

impl Emitter for FileEmitter {
    fn emit(&self, mut file: VirtualFile) -> Result<PathBuf, EmitterError> {
        let dest = self.destination(&file)?;
        let write_failed = |source: VfsError| EmitterError::WriteFailed {
            path: dest.clone(),
            source,
        };

        // 流内容先读入内存
        match file.read_all()? {
            None => self.vfs.create_dir_all(&dest).map_err(write_failed)?,
            Some(bytes) => {
                if !self.claim(&dest) {
                    return Err(EmitterError::AlreadyWritten(dest.clone()));
                }
                self.vfs.write_file(&dest, &bytes).map_err(write_failed)?
            }
        }

        debug!(target: "pipec::emit", dest = %dest.display(), "written");
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipec_vfs::MemoryFileSystem;
    use std::io::Cursor;
    use std::path::Path;

    fn emitter() -> (MemoryFileSystem, FileEmitter) {
        let fs = MemoryFileSystem::new();
        let emitter = FileEmitter::new(Arc::new(fs.clone()), "/dist");
        (fs, emitter)
    }

    #[test]
    fn test_file_emitter_metadata() {
        let (_, emitter) = emitter();
        let metadata = emitter.metadata();
        assert_eq!(metadata.name, "file_emitter");
        assert_eq!(metadata.kind, ComponentKind::Emitter);
        assert_eq!(emitter.out_dir(), &PathBuf::from("/dist"));
    }

    #[test]
    fn test_emit_buffer_keeps_relative_path() {
        let (fs, emitter) = emitter();
        let file = VirtualFile::buffered("/src/views/page.js", "code").with_base("/src");

        let dest = emitter.emit(file).unwrap();
        assert_eq!(dest, PathBuf::from("/dist/views/page.js"));
        assert_eq!(fs.read_file(Path::new("/dist/views/page.js")).unwrap(), b"code");
    }

    #[test]
    fn test_emit_null_creates_dir() {
        let (fs, emitter) = emitter();
        let dest = emitter
            .emit(VirtualFile::new("/src/partials").with_base("/src"))
            .unwrap();
        assert_eq!(dest, PathBuf::from("/dist/partials"));
        assert!(fs.is_dir(Path::new("/dist/partials")));
    }

    #[test]
    fn test_emit_stream_is_drained() {
        let (fs, emitter) = emitter();
        let file = VirtualFile::streaming("/src/raw.bin", Cursor::new(vec![1u8, 2, 3]));
        emitter.emit(file).unwrap();
        assert_eq!(fs.read_file(Path::new("/dist/raw.bin")).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_emit_rejects_parent_dir_escape() {
        let (fs, emitter) = emitter();
        let file = VirtualFile::buffered("/src/../secret/x.js", "x").with_base("/src");

        let err = emitter.emit(file).unwrap_err();
        assert!(matches!(err, EmitterError::WriteFailed { .. }));
        assert!(err.to_string().contains("outside the output directory"));
        assert!(fs.paths().is_empty());
    }

    #[test]
    fn test_emit_same_destination_twice_fails() {
        let (fs, emitter) = emitter();
        emitter
            .emit(VirtualFile::buffered("/a/b.js", "first"))
            .unwrap();

        let err = emitter
            .emit(VirtualFile::buffered("/c/b.js", "second"))
            .unwrap_err();
        assert!(matches!(err, EmitterError::AlreadyWritten(ref p) if p == Path::new("/dist/b.js")));
        assert_eq!(fs.read_file(Path::new("/dist/b.js")).unwrap(), b"first");
    }

    #[test]
    fn test_emit_directory_twice_is_fine() {
        let (_, emitter) = emitter();
        emitter.emit(VirtualFile::new("/src/dir").with_base("/src")).unwrap();
        emitter.emit(VirtualFile::new("/src/dir").with_base("/src")).unwrap();
    }

    #[test]
    fn test_emit_conflict_reports_path() {
        let (fs, emitter) = emitter();
        fs.create_dir_all(Path::new("/dist/page.js")).unwrap();

        let err = emitter
            .emit(VirtualFile::buffered("/src/page.js", "x"))
            .unwrap_err();
        assert!(matches!(err, EmitterError::WriteFailed { .. }));
        assert!(err.to_string().starts_with("cannot write '/dist/page.js'"));
    }
}
