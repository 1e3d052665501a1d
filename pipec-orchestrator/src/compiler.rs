//! Compiler collaborator
//!
//! The compile stage does not know how templates are compiled. It hands a
//! [`CompileRequest`] to an injected [`Compiler`] and takes back the output
//! text. Closures implement the trait, so tests can substitute a stub.

use crate::error::CompileError;
use pipec_config::{CompileOptions, RESERVED_KEYS};
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

/// Everything a compiler receives for one file
#[derive(Debug, Clone, PartialEq)]
pub struct CompileRequest {
    /// Decoded source text
    pub code: String,
    /// Original file path
    pub path: String,
    /// Caller options, without the reserved keys
    pub options: CompileOptions,
}

impl CompileRequest {
    /// Build a request from per-file values and the caller's options
    ///
    /// The caller's options are cloned; any `code`/`path` entries in them are
    /// discarded in favor of the per-file values.
    pub fn new(code: impl Into<String>, path: impl Into<String>, caller: &CompileOptions) -> Self {
        let options = caller
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self {
            code: code.into(),
            path: path.into(),
            options,
        }
    }

    /// Look up a merged option, reserved keys included
    pub fn option(&self, key: &str) -> Option<Value> {
        match key {
            "code" => Some(Value::String(self.code.clone())),
            "path" => Some(Value::String(self.path.clone())),
            _ => self.options.get(key).cloned(),
        }
    }

    /// The merged option object: caller options plus `code` and `path`
    pub fn to_json(&self) -> Value {
        let mut map = self.options.clone().into_map();
        map.insert("code".to_string(), Value::String(self.code.clone()));
        map.insert("path".to_string(), Value::String(self.path.clone()));
        Value::Object(map)
    }
}

/// A synchronous source-to-output compiler
pub trait Compiler: Send + Sync {
    /// Compile one file
    fn compile(&self, request: &CompileRequest) -> Result<String, CompileError>;
}

impl<F> Compiler for F
where
    F: Fn(&CompileRequest) -> Result<String, CompileError> + Send + Sync,
{
    fn compile(&self, request: &CompileRequest) -> Result<String, CompileError> {
        self(request)
    }
}

/// Compiler backed by an external command
///
/// The merged options are written to the command's stdin as one JSON object;
/// its stdout is the compiled output. A non-zero exit status is a failure
/// whose message is the command's stderr.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessCompiler {
    /// Create a compiler running `program`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl Compiler for ProcessCompiler {
    fn compile(&self, request: &CompileRequest) -> Result<String, CompileError> {
        let payload = serde_json::to_vec(&request.to_json())
            .map_err(|e| CompileError::InvalidOptions(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // stdin is fed from another thread so a chatty compiler cannot deadlock us
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || -> std::io::Result<()> {
                stdin.write_all(&payload)?;
                stdin.flush()
            })
        });

        let output = child.wait_with_output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", self.program.display(), output.status)
            } else {
                stderr
            };
            return Err(CompileError::Failed(message));
        }

        if let Some(handle) = writer {
            match handle.join() {
                Ok(Err(e)) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                Ok(_) => {}
                Err(_) => {
                    return Err(CompileError::Failed(
                        "stdin writer thread panicked".to_string(),
                    ))
                }
            }
        }

        String::from_utf8(output.stdout).map_err(|e| CompileError::InvalidOutput(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_overrides_reserved_keys() {
        let caller = CompileOptions::new()
            .with("code", "caller code")
            .with("path", "/caller/path")
            .with("pretty", true);

        let request = CompileRequest::new("<div/>", "/src/a.marko", &caller);

        assert_eq!(request.code, "<div/>");
        assert_eq!(request.path, "/src/a.marko");
        assert!(request.options.get("code").is_none());
        assert_eq!(
            request.to_json(),
            json!({ "code": "<div/>", "path": "/src/a.marko", "pretty": true })
        );
        // caller options untouched
        assert_eq!(caller.get("code"), Some(&json!("caller code")));
    }

    #[test]
    fn test_request_option_lookup() {
        let caller = CompileOptions::new().with("mode", "strict");
        let request = CompileRequest::new("x", "/x", &caller);

        assert_eq!(request.option("code"), Some(json!("x")));
        assert_eq!(request.option("mode"), Some(json!("strict")));
        assert_eq!(request.option("missing"), None);
    }

    #[test]
    fn test_closure_is_compiler() {
        let upper = |req: &CompileRequest| -> Result<String, CompileError> {
            Ok(req.code.to_uppercase())
        };
        let request = CompileRequest::new("abc", "/a", &CompileOptions::new());
        assert_eq!(upper.compile(&request).unwrap(), "ABC");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_compiler_pipes_request() {
        let compiler = ProcessCompiler::new("sh").arg("-c").arg("cat");
        let caller = CompileOptions::new().with("flag", 1);
        let request = CompileRequest::new("hello", "/src/a.marko", &caller);

        let output = compiler.compile(&request).unwrap();
        let echoed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(echoed, request.to_json());
    }

    #[cfg(unix)]
    #[test]
    fn test_process_compiler_failure_uses_stderr() {
        let compiler = ProcessCompiler::new("sh").args(["-c", "echo 'bad template' >&2; exit 3"]);
        let request = CompileRequest::new("x", "/x", &CompileOptions::new());

        let err = compiler.compile(&request).unwrap_err();
        assert!(matches!(&err, CompileError::Failed(msg) if msg == "bad template"));
    }

    #[test]
    fn test_process_compiler_missing_program() {
        let compiler = ProcessCompiler::new("/definitely/not/a/compiler");
        let request = CompileRequest::new("x", "/x", &CompileOptions::new());
        assert!(matches!(compiler.compile(&request), Err(CompileError::Io(_))));
    }
}
