//! Emitter trait
//!
//! Emitters take virtual files off the tail of a pipeline and write them to
//! a target.

use crate::component::Component;
use crate::error::EmitterError;
use pipec_vfs::VirtualFile;
use std::path::PathBuf;

/// The Emitter trait for writing files out of the pipeline
pub trait Emitter: Component {
    /// Write one file, returning where it was written
    fn emit(&self, file: VirtualFile) -> Result<PathBuf, EmitterError>;
}
