//! Pipec Orchestrator
//!
//! The compile stage and the drivers that feed it.
//!
//! A [`Loader`] turns paths into [`VirtualFile`]s, a [`Pipeline`] of
//! [`Transform`] stages rewrites them one at a time, and an [`Emitter`] writes
//! the results out. The [`Orchestrator`] ties the three together.

pub mod adapters;
pub mod compiler;
pub mod component;
pub mod emitter;
pub mod emitters;
pub mod error;
pub mod loader;
pub mod loaders;
pub mod pipeline;
pub mod stream;
pub mod transform;

pub use adapters::{create_transform, CompileTransform};
pub use compiler::{CompileRequest, Compiler, ProcessCompiler};
pub use component::{Component, ComponentExt, ComponentKind, ComponentMetadata};
pub use emitter::Emitter;
pub use emitters::FileEmitter;
pub use error::{CompileError, EmitterError, LoaderError, PipelineError, PluginError};
pub use loader::{Loader, LoaderExt};
pub use loaders::FileLoader;
pub use pipeline::{ErrorPolicy, ExecutionResult, Pipeline};
pub use stream::{boxed_transform_stream, transform_stream};
pub use transform::{Transform, TransformExt, Transformed};

use pipec_config::Phase;
use pipec_vfs::VirtualFile;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Outcome of [`Orchestrator::run`]
#[derive(Debug, Default)]
pub struct RunReport {
    /// Written paths, in input order
    pub emitted: Vec<PathBuf>,
    /// Per-file errors, in input order
    pub errors: Vec<PipelineError>,
    /// Whether the run was cut short by [`ErrorPolicy::Halt`]
    pub halted: bool,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads, transforms and emits files one at a time
pub struct Orchestrator {
    loader: Box<dyn Loader>,
    pipeline: Pipeline,
    emitter: Box<dyn Emitter>,
}

impl Orchestrator {
    /// Create an orchestrator from its three components
    pub fn new<L, E>(loader: L, pipeline: Pipeline, emitter: E) -> Self
    where
        L: Loader + 'static,
        E: Emitter + 'static,
    {
        Self {
            loader: Box::new(loader),
            pipeline,
            emitter: Box::new(emitter),
        }
    }

    /// Get a reference to the pipeline
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run one path through load, transform and emit
    pub fn run_one(&self, path: &Path) -> Result<PathBuf, PipelineError> {
        let file: VirtualFile = self
            .loader
            .load(path)
            .map_err(|source| PipelineError::Loader {
                name: self.loader.metadata().name,
                source,
            })?;
        let file = self.pipeline.process(file)?;
        self.emitter
            .emit(file)
            .map_err(|source| PipelineError::Emitter {
                name: self.emitter.metadata().name,
                source,
            })
    }

    /// Run every path in order, honoring the pipeline's error policy
    pub fn run<'a, I>(&self, paths: I) -> RunReport
    where
        I: IntoIterator<Item = &'a Path>,
    {
        let mut report = RunReport::default();

        for path in paths {
            match self.run_one(path) {
                Ok(dest) => {
                    info!(target: "pipec::emit", src = %path.display(), dest = %dest.display(), "compiled");
                    report.emitted.push(dest);
                }
                Err(err) => {
                    match err.phase() {
                        Phase::Load => {
                            error!(target: "pipec::load", src = %path.display(), "{}", err)
                        }
                        Phase::Transform => {
                            error!(target: "pipec::transform", src = %path.display(), "{}", err)
                        }
                        Phase::Emit => {
                            error!(target: "pipec::emit", src = %path.display(), "{}", err)
                        }
                    }
                    report.errors.push(err);
                    if self.pipeline.policy() == ErrorPolicy::Halt {
                        report.halted = true;
                        break;
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipec_config::TransformConfig;
    use pipec_vfs::{MemoryFileSystem, VirtualFileSystem};
    use std::sync::Arc;

    fn bracket(req: &CompileRequest) -> Result<String, CompileError> {
        if req.code.contains("oops") {
            return Err(CompileError::Failed("oops found".to_string()));
        }
        Ok(format!("[{}]", req.code))
    }

    fn orchestrator(fs: &MemoryFileSystem, policy: ErrorPolicy) -> Orchestrator {
        let vfs: Arc<dyn VirtualFileSystem> = Arc::new(fs.clone());
        let pipeline = Pipeline::new()
            .stage(CompileTransform::new(bracket, TransformConfig::default()))
            .with_policy(policy);
        Orchestrator::new(
            FileLoader::new(vfs.clone()).with_base("/src"),
            pipeline,
            FileEmitter::new(vfs, "/dist"),
        )
    }

    fn fixture() -> MemoryFileSystem {
        MemoryFileSystem::with_files(vec![
            ("/src/a.marko", b"a".to_vec()),
            ("/src/b.marko", b"oops".to_vec()),
            ("/src/nested/c.marko", b"c".to_vec()),
        ])
    }

    #[test]
    fn test_run_continue() {
        let fs = fixture();
        let orch = orchestrator(&fs, ErrorPolicy::Continue);
        let report = orch.run([
            Path::new("/src/a.marko"),
            Path::new("/src/b.marko"),
            Path::new("/src/missing.marko"),
            Path::new("/src/nested/c.marko"),
        ]);

        assert_eq!(
            report.emitted,
            vec![PathBuf::from("/dist/a.js"), PathBuf::from("/dist/nested/c.js")]
        );
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(report.errors[0], PipelineError::Plugin(_)));
        assert!(matches!(report.errors[1], PipelineError::Loader { .. }));
        assert!(!report.halted);
        assert_eq!(fs.read_file(Path::new("/dist/nested/c.js")).unwrap(), b"[c]");
    }

    #[test]
    fn test_run_halt() {
        let fs = fixture();
        let orch = orchestrator(&fs, ErrorPolicy::Halt);
        let report = orch.run([
            Path::new("/src/a.marko"),
            Path::new("/src/b.marko"),
            Path::new("/src/nested/c.marko"),
        ]);

        assert!(report.halted);
        assert!(!report.is_success());
        assert_eq!(report.emitted, vec![PathBuf::from("/dist/a.js")]);
        assert!(!fs.exists(Path::new("/dist/nested/c.js")));
    }

    #[test]
    fn test_run_reports_same_destination() {
        let fs = MemoryFileSystem::with_files(vec![
            ("/a/b.marko", b"first".to_vec()),
            ("/c/b.marko", b"second".to_vec()),
        ]);
        let vfs: Arc<dyn VirtualFileSystem> = Arc::new(fs.clone());
        let orch = Orchestrator::new(
            FileLoader::new(vfs.clone()),
            Pipeline::new()
                .stage(CompileTransform::new(bracket, TransformConfig::default()))
                .with_policy(ErrorPolicy::Continue),
            FileEmitter::new(vfs, "/dist"),
        );

        let report = orch.run([Path::new("/a/b.marko"), Path::new("/c/b.marko")]);

        assert_eq!(report.emitted, vec![PathBuf::from("/dist/b.js")]);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0]
            .to_string()
            .starts_with("emitter error [file_emitter]: '/dist/b.js' was already written"));
        assert_eq!(fs.read_file(Path::new("/dist/b.js")).unwrap(), b"[first]");
    }

    #[test]
    fn test_run_rejects_escaping_input() {
        // the in-memory store keys paths verbatim, `..` included
        let fs = MemoryFileSystem::with_files(vec![("/src/../secret/x.marko", b"x".to_vec())]);
        let vfs: Arc<dyn VirtualFileSystem> = Arc::new(fs.clone());
        let orch = Orchestrator::new(
            FileLoader::new(vfs.clone()).with_base("/src"),
            Pipeline::new().stage(CompileTransform::new(bracket, TransformConfig::default())),
            FileEmitter::new(vfs, "/dist"),
        );

        let err = orch.run_one(Path::new("/src/../secret/x.marko")).unwrap_err();
        assert!(matches!(err, PipelineError::Emitter { .. }));
        assert_eq!(fs.paths(), vec!["/src/../secret/x.marko".to_string()]);
    }

    #[test]
    fn test_run_one_labels_loader() {
        let fs = fixture();
        let orch = orchestrator(&fs, ErrorPolicy::Halt);
        let err = orch.run_one(Path::new("/nowhere")).unwrap_err();
        assert!(err.to_string().starts_with("loader error [file_loader]"));
        assert_eq!(orch.pipeline().len(), 1);
    }
}
