//! Error types for the orchestrator

use pipec_config::Phase;
use pipec_vfs::VfsError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error raised by a compiler collaborator
///
/// The compile stage wraps it without inspecting it further.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("{0}")]
    Failed(String),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("invalid compiler output: {0}")]
    InvalidOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-file error reported by a transform stage
///
/// Carries the stage's plugin name so the failing stage is identifiable in a
/// pipeline of many stages.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("plugin error [{plugin}]: streaming not supported")]
    UnsupportedMode { plugin: String, path: PathBuf },

    #[error("plugin error [{plugin}]: {source}")]
    Transform {
        plugin: String,
        path: PathBuf,
        #[source]
        source: CompileError,
    },
}

impl PluginError {
    /// Name of the stage that raised the error
    pub fn plugin(&self) -> &str {
        match self {
            PluginError::UnsupportedMode { plugin, .. } => plugin,
            PluginError::Transform { plugin, .. } => plugin,
        }
    }

    /// Path of the file that failed
    pub fn path(&self) -> &Path {
        match self {
            PluginError::UnsupportedMode { path, .. } => path,
            PluginError::Transform { path, .. } => path,
        }
    }
}

/// Error type for loader components
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("cannot read '{}': {}", .path.display(), .source)]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: VfsError,
    },

    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}

/// Error type for emitter components
#[derive(Error, Debug)]
pub enum EmitterError {
    #[error("cannot write '{}': {}", .path.display(), .source)]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: VfsError,
    },

    #[error("'{}' was already written in this run", .0.display())]
    AlreadyWritten(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error reported by the orchestrator for one file
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("loader error [{name}]: {source}")]
    Loader {
        name: String,
        #[source]
        source: LoaderError,
    },

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("emitter error [{name}]: {source}")]
    Emitter {
        name: String,
        #[source]
        source: EmitterError,
    },
}

impl PipelineError {
    /// Phase the failure happened in
    pub fn phase(&self) -> Phase {
        match self {
            PipelineError::Loader { .. } => Phase::Load,
            PipelineError::Plugin(_) => Phase::Transform,
            PipelineError::Emitter { .. } => Phase::Emit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unsupported_mode_display() {
        let err = PluginError::UnsupportedMode {
            plugin: "pipec-compile".to_string(),
            path: PathBuf::from("/a.marko"),
        };
        assert_eq!(
            err.to_string(),
            "plugin error [pipec-compile]: streaming not supported"
        );
        assert_eq!(err.plugin(), "pipec-compile");
        assert_eq!(err.path(), Path::new("/a.marko"));
    }

    #[test]
    fn test_transform_error_wraps_cause() {
        let err = PluginError::Transform {
            plugin: "pipec-compile".to_string(),
            path: PathBuf::from("/a.marko"),
            source: CompileError::Failed("unexpected token at 3:7".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "plugin error [pipec-compile]: unexpected token at 3:7"
        );
        let cause = err.source().unwrap();
        assert_eq!(cause.to_string(), "unexpected token at 3:7");
    }

    #[test]
    fn test_pipeline_error_labels() {
        let err = PipelineError::Loader {
            name: "file_loader".to_string(),
            source: LoaderError::SourceNotFound(PathBuf::from("/x")),
        };
        assert_eq!(
            err.to_string(),
            "loader error [file_loader]: source not found: /x"
        );

        let plugin: PipelineError = PluginError::UnsupportedMode {
            plugin: "p".to_string(),
            path: PathBuf::new(),
        }
        .into();
        assert_eq!(plugin.to_string(), "plugin error [p]: streaming not supported");
        assert_eq!(plugin.phase(), Phase::Transform);
    }

    #[test]
    fn test_pipeline_error_phase() {
        let load = PipelineError::Loader {
            name: "file_loader".to_string(),
            source: LoaderError::SourceNotFound(PathBuf::from("/x")),
        };
        assert_eq!(load.phase(), Phase::Load);

        let emit = PipelineError::Emitter {
            name: "file_emitter".to_string(),
            source: EmitterError::AlreadyWritten(PathBuf::from("/dist/x.js")),
        };
        assert_eq!(emit.phase(), Phase::Emit);
        assert_eq!(
            emit.to_string(),
            "emitter error [file_emitter]: '/dist/x.js' was already written in this run"
        );
    }
}
