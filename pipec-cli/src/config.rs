//! CLI 配置
//!
//! 项目文件 `pipec.json` 与日志配置

use pipec_config::{CompileOptions, Phase};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::Level;

/// 项目文件 `pipec.json` 结构
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// 输出目录
    pub out_dir: Option<PathBuf>,
    /// 输入文件的基准目录
    pub base: Option<PathBuf>,
    /// 编译产物扩展名
    pub extension: Option<String>,
    /// 编译器命令及参数
    pub compiler: Vec<String>,
    /// 透传给编译器的选项
    pub options: CompileOptions,
    /// 单个文件失败后是否继续
    pub keep_going: Option<bool>,
    /// 日志配置
    pub log: LogSection,
}

/// `pipec.json` 中的日志配置
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSection {
    /// 全局日志级别: "silent", "error", "warn", "info", "debug", "trace"
    pub level: Option<String>,
    pub load: Option<String>,
    pub transform: Option<String>,
    pub emit: Option<String>,
}

impl ProjectConfig {
    /// Read and parse a project file
    ///
    /// Relative paths inside it are resolved against the file's directory.
    pub fn read(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Err(format!("未找到配置文件 '{}'", path.display()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("无法读取 '{}': {}", path.display(), e))?;

        let mut config: ProjectConfig = serde_json::from_str(&content)
            .map_err(|e| format!("解析 '{}' 失败: {}", path.display(), e))?;

        let base_dir = path.parent().unwrap_or(Path::new("."));
        config.out_dir = config.out_dir.map(|p| base_dir.join(p));
        config.base = config.base.map(|p| base_dir.join(p));
        Ok(config)
    }
}

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub load: Option<Level>,
    pub transform: Option<Level>,
    pub emit: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            load: None,
            transform: None,
            emit: None,
        }
    }
}

impl LogConfig {
    /// Build from the project file section, with an optional global override
    pub fn from_section(section: &LogSection, global_override: Option<&str>) -> Result<Self, String> {
        let parse = |value: Option<&String>| -> Result<Option<Level>, String> {
            value.map(|s| parse_log_level(s)).transpose()
        };

        let global = match global_override.or(section.level.as_deref()) {
            Some(s) => parse_log_level(s)?,
            None => LogConfig::default().global,
        };

        Ok(Self {
            global,
            load: parse(section.load.as_ref())?,
            transform: parse(section.transform.as_ref())?,
            emit: parse(section.emit.as_ref())?,
        })
    }

    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> Level {
        let specific = match phase {
            Phase::Load => self.load,
            Phase::Transform => self.transform,
            Phase::Emit => self.emit,
        };
        specific.unwrap_or(self.global)
    }
}

/// Parse log level string
pub fn parse_log_level(s: &str) -> Result<Level, String> {
    match s.to_lowercase().as_str() {
        "silent" => Ok(Level::ERROR), // silent = only errors
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        other => Err(format!("未知日志级别 '{}'", other)),
    }
}
