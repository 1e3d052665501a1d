//! Pipec CLI - Command line interface
//!
//! Compiles files through an external compiler command. Settings come from
//! the command line, falling back to the project file `pipec.json`.

use clap::Parser;
use pipec_config::{CompileOptions, TransformConfig};
use pipec_orchestrator::{
    CompileTransform, ErrorPolicy, FileEmitter, FileLoader, Orchestrator, Pipeline,
    ProcessCompiler,
};
use pipec_vfs::{NativeFileSystem, VirtualFileSystem};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{debug, info};

mod config;
mod logging;
mod platform;

use crate::config::{LogConfig, ProjectConfig};
use crate::logging::LogFormat;

/// 默认项目文件
const DEFAULT_PROJECT_FILE: &str = "pipec.json";

/// 默认输出目录
const DEFAULT_OUT_DIR: &str = "dist";

#[derive(Parser, Debug)]
#[command(
    name = "pipec",
    about = "Compile files through an external compiler",
    version
)]
struct Cli {
    /// Files or directories to process, in order
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,

    /// Project file (default: ./pipec.json when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output directory (default: dist)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Base directory; outputs keep their path relative to it
    #[arg(long, value_name = "DIR")]
    base: Option<PathBuf>,

    /// Extension of compiled files (default: js)
    #[arg(long, value_name = "EXT")]
    ext: Option<String>,

    /// Compiler command; reads JSON options on stdin, writes output on stdout
    #[arg(long, value_name = "PROGRAM")]
    compiler: Option<PathBuf>,

    /// Extra argument for the compiler command (repeatable)
    #[arg(long = "compiler-arg", value_name = "ARG", allow_hyphen_values = true)]
    compiler_args: Vec<String>,

    /// Compiler option as key=value; JSON values are parsed (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE", value_parser = parse_option)]
    options: Vec<(String, Value)>,

    /// Keep processing remaining files after a failure
    #[arg(long)]
    keep_going: bool,

    /// Log level: silent, error, warn, info, debug, trace
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn parse_option(s: &str) -> Result<(String, Value), String> {
    CompileOptions::parse_assignment(s)
}

/// 合并后的运行设置
#[derive(Debug)]
struct Settings {
    out_dir: PathBuf,
    base: PathBuf,
    program: PathBuf,
    program_args: Vec<String>,
    transform: TransformConfig,
    policy: ErrorPolicy,
    log: LogConfig,
}

fn main() {
    let cli = Cli::parse();

    let project = match load_project(cli.config.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Error: 无法获取当前目录: {}", e);
            process::exit(1);
        }
    };

    let settings = match build_settings(&cli, project, &cwd) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = logging::init(&settings.log, cli.log_format, cli.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    debug!(target: "pipec::cli", ?settings, "settings resolved");

    let orchestrator = build_orchestrator(&settings);
    let inputs = resolve_inputs(&cli.files, &cwd);
    let report = orchestrator.run(inputs.iter().map(PathBuf::as_path));

    for err in &report.errors {
        platform::print_error(err);
    }
    platform::print_summary(&report);

    info!(target: "pipec::cli", emitted = report.emitted.len(), failed = report.errors.len(), "done");

    if !report.is_success() {
        process::exit(1);
    }
}

/// Load the explicit project file, or `./pipec.json` when it exists
fn load_project(explicit: Option<&Path>) -> Result<ProjectConfig, String> {
    match explicit {
        Some(path) => ProjectConfig::read(path),
        None => {
            let default = Path::new(DEFAULT_PROJECT_FILE);
            if default.exists() {
                ProjectConfig::read(default)
            } else {
                Ok(ProjectConfig::default())
            }
        }
    }
}

/// Merge command-line values over the project file
///
/// Without an explicit base, outputs keep their path relative to `cwd`.
fn build_settings(cli: &Cli, project: ProjectConfig, cwd: &Path) -> Result<Settings, String> {
    let (program, program_args) = match &cli.compiler {
        Some(program) => (program.clone(), cli.compiler_args.clone()),
        None => {
            let mut command = project.compiler.into_iter();
            let program = command.next().ok_or_else(|| {
                format!(
                    "未指定编译器\n\n提示: 使用 --compiler 或在 '{}' 中设置 \"compiler\"",
                    DEFAULT_PROJECT_FILE
                )
            })?;
            let mut args: Vec<String> = command.collect();
            args.extend(cli.compiler_args.iter().cloned());
            (PathBuf::from(program), args)
        }
    };

    let mut options = project.options;
    options.merge(&cli.options.iter().cloned().collect());

    let mut transform = TransformConfig::with_options(options);
    if let Some(ext) = cli.ext.as_ref().or(project.extension.as_ref()) {
        if ext.trim_start_matches('.').is_empty() {
            return Err("扩展名不能为空".to_string());
        }
        transform = transform.extension(ext);
    }

    let keep_going = cli.keep_going || project.keep_going.unwrap_or(false);
    let policy = if keep_going {
        ErrorPolicy::Continue
    } else {
        ErrorPolicy::Halt
    };

    Ok(Settings {
        out_dir: cli
            .out_dir
            .clone()
            .or(project.out_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
        base: cli
            .base
            .clone()
            .or(project.base)
            .map(|base| cwd.join(base))
            .unwrap_or_else(|| cwd.to_path_buf()),
        program,
        program_args,
        transform,
        policy,
        log: LogConfig::from_section(&project.log, cli.log_level.as_deref())?,
    })
}

/// Anchor input paths at `cwd` so they line up with the base
fn resolve_inputs(files: &[PathBuf], cwd: &Path) -> Vec<PathBuf> {
    files.iter().map(|file| cwd.join(file)).collect()
}

fn build_orchestrator(settings: &Settings) -> Orchestrator {
    let vfs: Arc<dyn VirtualFileSystem> = Arc::new(NativeFileSystem::new());

    let loader = FileLoader::new(vfs.clone()).with_base(&settings.base);

    let compiler = ProcessCompiler::new(&settings.program).args(settings.program_args.iter().cloned());
    let pipeline = Pipeline::new()
        .stage(CompileTransform::new(compiler, settings.transform.clone()))
        .with_policy(settings.policy);

    Orchestrator::new(loader, pipeline, FileEmitter::new(vfs, &settings.out_dir))
}
