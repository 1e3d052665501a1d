//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和运行摘要。

use pipec_orchestrator::{PipelineError, RunReport};
use std::error::Error;

/// Render an error and its causes, one per line
pub fn format_error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        // thiserror messages often embed their source already
        if !out.contains(&text) {
            out.push_str("\n  caused by: ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

/// 打印单个文件的错误
pub fn print_error(err: &PipelineError) {
    eprintln!("❌ {}", format_error_chain(err));
}

/// 打印运行摘要
pub fn print_summary(report: &RunReport) {
    let failed = report.errors.len();
    if report.halted {
        eprintln!(
            "stopped after first failure: {} compiled, {} failed (use --keep-going to continue past errors)",
            report.emitted.len(),
            failed
        );
    } else if failed > 0 {
        eprintln!("{} compiled, {} failed", report.emitted.len(), failed);
    } else {
        println!("✅ {} compiled", report.emitted.len());
    }
}
