//! Pipec Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Pipec crates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Plugin name attached to every error raised by the compile stage
pub const DEFAULT_PLUGIN_NAME: &str = "pipec-compile";

/// Extension given to compiled files
pub const DEFAULT_TARGET_EXTENSION: &str = "js";

/// Option keys the compile stage always overwrites with per-file values
pub const RESERVED_KEYS: [&str; 2] = ["code", "path"];

/// Caller-supplied compiler options
///
/// An open map of option names to arbitrary JSON values. The map is handed to
/// the compiler verbatim, except for the keys in [`RESERVED_KEYS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompileOptions(Map<String, Value>);

impl CompileOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap an existing JSON map
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Insert an option, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get an option value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of options
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether no options are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the options
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Borrow the underlying map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into the underlying map
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Merge `other` into `self`; values from `other` win
    pub fn merge(&mut self, other: &CompileOptions) {
        for (key, value) in other.iter() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Parse a `key=value` assignment
    ///
    /// The value is read as JSON when it parses (`true`, `42`, `{"a":1}`),
    /// otherwise it is taken as a plain string.
    pub fn parse_assignment(input: &str) -> Result<(String, Value), String> {
        let (key, raw) = input
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", input))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("empty option name in '{}'", input));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        Ok((key.to_string(), value))
    }
}

impl From<Map<String, Value>> for CompileOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for CompileOptions {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Configuration for the compile stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Name used to label errors raised by the stage
    pub plugin_name: String,
    /// Extension (without the dot) given to compiled files
    pub target_extension: String,
    /// Options forwarded to the compiler
    pub options: CompileOptions,
}

impl TransformConfig {
    /// Create a config with the given compiler options
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Set the target extension; a leading dot is ignored
    pub fn extension(mut self, ext: impl AsRef<str>) -> Self {
        self.target_extension = ext.as_ref().trim_start_matches('.').to_string();
        self
    }

    /// Set the plugin name
    pub fn plugin_name(mut self, name: impl Into<String>) -> Self {
        self.plugin_name = name.into();
        self
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            plugin_name: DEFAULT_PLUGIN_NAME.to_string(),
            target_extension: DEFAULT_TARGET_EXTENSION.to_string(),
            options: CompileOptions::new(),
        }
    }
}

/// Processing phase, used for phase-specific log targets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Load,
    Transform,
    Emit,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Load => "load",
            Phase::Transform => "transform",
            Phase::Emit => "emit",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("pipec::{}", self.as_str())
    }

    /// All phases, in processing order
    pub fn all() -> [Phase; 3] {
        [Phase::Load, Phase::Transform, Phase::Emit]
    }
}
