//! Pipec - per-file compile stage for file pipelines
//!
//! Files flow through a pipeline as [`VirtualFile`]s. The compile stage
//! created by [`create_transform`] hands each buffered file to an external
//! [`Compiler`] and replaces its contents and extension with the result.
//! Files without contents pass through untouched; streamed files are rejected.
//!
//! # Architecture
//!
//! ```text
//! pipec-config/        - 编译选项、阶段配置
//! pipec-vfs/           - 虚拟文件与文件系统
//! pipec-orchestrator/  - 编译阶段、流水线、加载器、输出器
//! pipec-cli/           - 命令行入口
//! ```
//!
//! # Quick Start
//!
//! ```
//! use pipec::{create_transform, CompileError, CompileOptions, CompileRequest, Transform, VirtualFile};
//!
//! let upper = |req: &CompileRequest| -> Result<String, CompileError> {
//!     Ok(req.code.to_uppercase())
//! };
//! let stage = create_transform(upper, CompileOptions::new());
//!
//! let out = stage.transform(VirtualFile::buffered("/src/a.marko", "hi")).unwrap();
//! assert_eq!(out.path.to_str(), Some("/src/a.js"));
//! assert_eq!(out.contents.as_bytes(), Some(&b"HI"[..]));
//! ```

pub use pipec_config as config;
pub use pipec_orchestrator as orchestrator;
pub use pipec_vfs as vfs;

pub use pipec_config::{
    CompileOptions, Phase, TransformConfig, DEFAULT_PLUGIN_NAME, DEFAULT_TARGET_EXTENSION,
    RESERVED_KEYS,
};
pub use pipec_orchestrator::{
    boxed_transform_stream, create_transform, transform_stream, CompileError, CompileRequest,
    CompileTransform, Compiler, Component, ComponentKind, ComponentMetadata, Emitter,
    EmitterError, ErrorPolicy, ExecutionResult, FileEmitter, FileLoader, Loader, LoaderError,
    Orchestrator, Pipeline, PipelineError, PluginError, ProcessCompiler, RunReport, Transform,
    TransformExt,
};
pub use pipec_vfs::{
    replace_extension, ContentKind, Contents, MemoryFileSystem, NativeFileSystem, VfsError,
    VirtualFile, VirtualFileSystem,
};
