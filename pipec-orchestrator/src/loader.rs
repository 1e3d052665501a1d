//! Loader trait
//!
//! Loaders turn paths into virtual files at the head of a pipeline.

use crate::component::Component;
use crate::error::LoaderError;
use pipec_vfs::VirtualFile;
use std::path::Path;

/// The Loader trait for reading files into the pipeline
pub trait Loader: Component {
    /// Load the file at `path`
    fn load(&self, path: &Path) -> Result<VirtualFile, LoaderError>;
}

/// Helper methods for Loaders
pub trait LoaderExt: Loader {
    /// Load several paths, keeping input order
    fn load_all<'a, I>(&self, paths: I) -> Vec<Result<VirtualFile, LoaderError>>
    where
        I: IntoIterator<Item = &'a Path>,
    {
        paths.into_iter().map(|path| self.load(path)).collect()
    }
}

impl<T: Loader + ?Sized> LoaderExt for T {}
