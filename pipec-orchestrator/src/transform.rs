//! Transform trait and the in-order iterator driver
//!
//! A transform is a per-file function `VirtualFile -> Result<VirtualFile,
//! PluginError>`. It knows nothing about how files are delivered; drivers
//! such as [`TransformExt::apply_each`], [`crate::Pipeline`] and
//! [`crate::stream::transform_stream`] feed it one file at a time.

use crate::component::Component;
use crate::error::PluginError;
use pipec_vfs::VirtualFile;
use std::sync::Arc;

/// A pipeline stage rewriting one file at a time
pub trait Transform: Component {
    /// Transform one file
    ///
    /// On success the same file value is returned, possibly mutated. On
    /// failure the file is dropped and the error stands in its place.
    fn transform(&self, file: VirtualFile) -> Result<VirtualFile, PluginError>;
}

impl<T: Transform + ?Sized> Component for Arc<T> {
    fn metadata(&self) -> crate::component::ComponentMetadata {
        (**self).metadata()
    }
}

impl<T: Transform + ?Sized> Transform for Arc<T> {
    fn transform(&self, file: VirtualFile) -> Result<VirtualFile, PluginError> {
        (**self).transform(file)
    }
}

impl<T: Transform + ?Sized> Component for Box<T> {
    fn metadata(&self) -> crate::component::ComponentMetadata {
        (**self).metadata()
    }
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn transform(&self, file: VirtualFile) -> Result<VirtualFile, PluginError> {
        (**self).transform(file)
    }
}

/// Helper methods for transforms
pub trait TransformExt: Transform {
    /// Apply the transform to each file of `files`, lazily and in order
    ///
    /// Exactly one result is yielded per input file. The next file is not
    /// pulled from `files` until the previous result has been taken.
    fn apply_each<I>(&self, files: I) -> Transformed<'_, Self, I::IntoIter>
    where
        I: IntoIterator<Item = VirtualFile>,
    {
        Transformed {
            transform: self,
            inner: files.into_iter(),
        }
    }
}

impl<T: Transform + ?Sized> TransformExt for T {}

/// Iterator returned by [`TransformExt::apply_each`]
pub struct Transformed<'a, T: ?Sized, I> {
    transform: &'a T,
    inner: I,
}

impl<'a, T, I> Iterator for Transformed<'a, T, I>
where
    T: Transform + ?Sized,
    I: Iterator<Item = VirtualFile>,
{
    type Item = Result<VirtualFile, PluginError>;

    fn next(&mut self) -> Option<Self::Item> {
        let file = self.inner.next()?;
        Some(self.transform.transform(file))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
