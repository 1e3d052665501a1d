//! 测试辅助工具
//!
//! 提供端到端测试用的桩编译器

#![allow(dead_code)]

use pipec::{CompileError, CompileRequest, Compiler};
use std::sync::{Arc, Mutex};

/// 记录每次调用的桩编译器
///
/// Output is `compiled(<code>)`; sources containing `FAIL` are rejected.
#[derive(Clone, Default)]
pub struct StubCompiler {
    calls: Arc<Mutex<Vec<CompileRequest>>>,
}

impl StubCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已收到的请求
    pub fn calls(&self) -> Vec<CompileRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Compiler for StubCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<String, CompileError> {
        self.calls.lock().unwrap().push(request.clone());
        if request.code.contains("FAIL") {
            return Err(CompileError::Failed(format!(
                "cannot compile {}",
                request.path
            )));
        }
        Ok(format!("compiled({})", request.code))
    }
}

/// 内容为 UTF-8 文本时返回文本
pub fn text(file: &pipec::VirtualFile) -> Option<String> {
    file.contents
        .as_bytes()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}
