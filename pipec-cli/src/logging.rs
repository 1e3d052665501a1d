//! CLI 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现分阶段日志控制。

use crate::config::LogConfig;
use pipec_config::Phase;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{
    filter::Targets,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// Build the per-phase filter
pub fn targets(log_config: &LogConfig) -> Targets {
    Phase::all()
        .into_iter()
        .fold(Targets::new().with_default(log_config.global), |targets, phase| {
            targets.with_target(phase.target(), log_config.level_for(phase))
        })
        .with_target("pipec::cli", log_config.global)
}

/// 使用指定格式和日志配置初始化日志系统
///
/// Logs go to stderr, and additionally to `file` when given.
pub fn init(log_config: &LogConfig, format: LogFormat, file: Option<&Path>) -> Result<(), String> {
    let targets = targets(log_config);

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(
        create_format_layer(format, io::stderr, true)
            .with_filter(targets.clone())
            .boxed(),
    );

    // If file specified, output to both console and file
    if let Some(path) = file {
        let handle = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| format!("无法打开日志文件 '{}': {}", path.display(), e))?;
        layers.push(
            create_format_layer(format, Arc::new(handle), false)
                .with_filter(targets)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| format!("日志初始化失败: {}", e))
}

/// Create formatter layer based on format
fn create_format_layer<W>(
    format: LogFormat,
    make_writer: W,
    ansi: bool,
) -> Box<dyn Layer<Registry> + Send + Sync + 'static>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_ansi(ansi)
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(ansi)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(make_writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_targets_per_phase() {
        let cfg = LogConfig {
            global: Level::WARN,
            transform: Some(Level::DEBUG),
            ..LogConfig::default()
        };
        let targets = targets(&cfg);

        assert!(targets.would_enable("pipec::transform", &Level::DEBUG));
        assert!(!targets.would_enable("pipec::load", &Level::DEBUG));
        assert!(targets.would_enable("pipec::load", &Level::WARN));
        assert_eq!(targets.default_level(), Some(LevelFilter::WARN));
    }
}
