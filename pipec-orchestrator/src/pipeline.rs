//! Pipeline - ordered transform stages driven over a file sequence
//!
//! Stages report errors per file; the pipeline's [`ErrorPolicy`] decides
//! whether one failure stops the whole sequence.

use crate::component::{Component, ComponentKind, ComponentMetadata};
use crate::error::PluginError;
use crate::transform::Transform;
use pipec_vfs::VirtualFile;
use tracing::{debug, error};

/// What a driver does after a file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing file
    #[default]
    Halt,
    /// Drop the failing file, record the error and keep going
    Continue,
}

/// Ordered list of transform stages
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
    policy: ErrorPolicy,
}

/// Outcome of [`Pipeline::execute`]
#[derive(Debug, Default)]
pub struct ExecutionResult {
    /// Files that made it through every stage, in input order
    pub files: Vec<VirtualFile>,
    /// Errors, in input order
    pub errors: Vec<PluginError>,
    /// Whether the sequence was cut short by [`ErrorPolicy::Halt`]
    pub halted: bool,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Pipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage
    pub fn stage<T: Transform + 'static>(mut self, stage: T) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Set the error policy
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names, in order
    pub fn names(&self) -> Vec<String> {
        self.stages.iter().map(|s| s.metadata().name).collect()
    }

    /// Run one file through every stage
    ///
    /// The first failing stage's error replaces the file.
    pub fn process(&self, file: VirtualFile) -> Result<VirtualFile, PluginError> {
        self.stages
            .iter()
            .try_fold(file, |file, stage| stage.transform(file))
    }

    /// Run a whole sequence, one file at a time, honoring the error policy
    pub fn execute<I>(&self, files: I) -> ExecutionResult
    where
        I: IntoIterator<Item = VirtualFile>,
    {
        let mut result = ExecutionResult::default();

        for file in files {
            match self.process(file) {
                Ok(file) => {
                    debug!(target: "pipec::transform", path = %file.path.display(), "file done");
                    result.files.push(file);
                }
                Err(err) => {
                    error!(target: "pipec::transform", path = %err.path().display(), "{}", err);
                    result.errors.push(err);
                    if self.policy == ErrorPolicy::Halt {
                        result.halted = true;
                        break;
                    }
                }
            }
        }

        result
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.names())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Component for Pipeline {
    fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new(
            "pipeline",
            env!("CARGO_PKG_VERSION"),
            ComponentKind::Transform,
            Some("Runs stages in order"),
        )
    }
}

impl Transform for Pipeline {
    fn transform(&self, file: VirtualFile) -> Result<VirtualFile, PluginError> {
        self.process(file)
    }
}
