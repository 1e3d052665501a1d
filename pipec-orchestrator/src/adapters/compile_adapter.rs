//! Compile adapter - runs an external compiler over buffered files
//!
//! | contents | action |
//! |---|---|
//! | null | passed through, compiler not called |
//! | stream | rejected with `PluginError::UnsupportedMode` |
//! | buffer | decoded as UTF-8 and compiled; contents and extension replaced |

use crate::compiler::{CompileRequest, Compiler};
use crate::component::{Component, ComponentKind, ComponentMetadata};
use crate::error::PluginError;
use crate::transform::Transform;
use pipec_config::{CompileOptions, TransformConfig};
use pipec_vfs::{Contents, VirtualFile};
use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Stage compiling each buffered file with an injected [`Compiler`]
#[derive(Clone)]
pub struct CompileTransform {
    compiler: Arc<dyn Compiler>,
    config: TransformConfig,
}

impl CompileTransform {
    /// Create a compile stage
    pub fn new<C: Compiler + 'static>(compiler: C, config: TransformConfig) -> Self {
        Self::with_shared(Arc::new(compiler), config)
    }

    /// Create a compile stage around an already shared compiler
    pub fn with_shared(compiler: Arc<dyn Compiler>, config: TransformConfig) -> Self {
        Self { compiler, config }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    fn unsupported(&self, path: &Path) -> PluginError {
        PluginError::UnsupportedMode {
            plugin: self.config.plugin_name.clone(),
            path: path.to_path_buf(),
        }
    }
}

/// Create a compile stage with default naming and target extension
pub fn create_transform<C: Compiler + 'static>(
    compiler: C,
    options: CompileOptions,
) -> CompileTransform {
    CompileTransform::new(compiler, TransformConfig::with_options(options))
}

impl std::fmt::Debug for CompileTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileTransform")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Component for CompileTransform {
    fn metadata(&self) -> ComponentMetadata {
        ComponentMetadata::new(
            self.config.plugin_name.clone(),
            env!("CARGO_PKG_VERSION"),
            ComponentKind::Transform,
            Some("Compiles buffered files with an external compiler"),
        )
    }
}

impl Transform for CompileTransform {
    fn transform(&self, mut file: VirtualFile) -> Result<VirtualFile, PluginError> {
        let bytes = match &file.contents {
            Contents::Null => {
                debug!(target: "pipec::transform", path = %file.path.display(), "no contents, passing through");
                return Ok(file);
            }
            Contents::Stream(_) => return Err(self.unsupported(&file.path)),
            Contents::Buffer(bytes) => bytes,
        };

        let code = match String::from_utf8_lossy(bytes) {
            Cow::Borrowed(text) => text.to_string(),
            Cow::Owned(text) => {
                warn!(target: "pipec::transform", path = %file.path.display(), "source is not valid UTF-8, invalid bytes replaced");
                text
            }
        };

        let request = CompileRequest::new(
            code,
            file.path.to_string_lossy(),
            &self.config.options,
        );

        // file stays untouched until the compiler succeeds
        let output = self
            .compiler
            .compile(&request)
            .map_err(|source| PluginError::Transform {
                plugin: self.config.plugin_name.clone(),
                path: file.path.clone(),
                source,
            })?;

        debug!(
            target: "pipec::transform",
            path = %file.path.display(),
            bytes = output.len(),
            "compiled"
        );

        file.contents = Contents::Buffer(output.into_bytes());
        file.set_extension(&self.config.target_extension);
        Ok(file)
    }
}
