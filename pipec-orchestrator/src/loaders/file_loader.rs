//! File Loader - 从虚拟文件系统加载源文件

use crate::component::{Component, ComponentKind, ComponentMetadata};
use crate::error::LoaderError;
use crate::loader::Loader;
use pipec_vfs::{VirtualFile, VirtualFileSystem};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// 文件加载器组件
///
/// 目录加载为无内容文件，普通文件加载为缓冲内容。
pub struct FileLoader {
    vfs: Arc<dyn VirtualFileSystem>,
    base: Option<PathBuf>,
}

impl FileLoader {
    /// 创建新的文件加载器
    pub fn new(vfs: Arc<dyn VirtualFileSystem>) -> Self {
        Self { vfs, base: None }
    }

    /// 设置所有加载文件的基准目录
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }
}

impl Component for FileLoader {
    fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new(
            "file_loader",
            env!("CARGO_PKG_VERSION"),
            ComponentKind::Loader,
            Some("从文件系统加载源文件"),
        )
    }
}

impl Loader for FileLoader {
    fn load(&self, path: &Path) -> Result<VirtualFile, LoaderError> {
        let file = if self.vfs.is_dir(path) {
            VirtualFile::new(path)
        } else if self.vfs.is_file(path) {
            let bytes = self.vfs.read_file(path).map_err(|source| LoaderError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
            VirtualFile::buffered(path, bytes)
        } else {
            return Err(LoaderError::SourceNotFound(path.to_path_buf()));
        };

        debug!(target: "pipec::load", path = %path.display(), kind = %file.contents.kind(), "loaded");

        Ok(match &self.base {
            Some(base) => file.with_base(base),
            None => file,
        })
    }
}
