//! Async stream driver
//!
//! Maps a `Stream` of files through a transform with a synchronous closure.
//! Upstream is polled only when the returned stream is polled, so each file's
//! result is handed downstream before the next file is requested.

use crate::error::PluginError;
use crate::transform::Transform;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use pipec_vfs::VirtualFile;

/// Apply `transform` to every file of `files`, in order
pub fn transform_stream<S, T>(
    files: S,
    transform: T,
) -> impl Stream<Item = Result<VirtualFile, PluginError>>
where
    S: Stream<Item = VirtualFile>,
    T: Transform,
{
    files.map(move |file| transform.transform(file))
}

/// Boxed variant of [`transform_stream`] for storing in structs
pub fn boxed_transform_stream<S, T>(
    files: S,
    transform: T,
) -> BoxStream<'static, Result<VirtualFile, PluginError>>
where
    S: Stream<Item = VirtualFile> + Send + 'static,
    T: Transform + 'static,
{
    transform_stream(files, transform).boxed()
}
