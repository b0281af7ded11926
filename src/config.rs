//! Dump configuration via `vardump.toml`
//!
//! One flat TOML file selects the output format and carries the traversal
//! and rendering options. Every key is optional; missing keys take their
//! defaults.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vardump_core::{DumpError, DumpResult};
use vardump_engine::{DumperOptions, DEFAULT_MAX_DEPTH};
use vardump_writers::{OutputFormat, WriterOptions, DEFAULT_ANCHOR_PREFIX, DEFAULT_INDENT};

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "vardump.toml";

/// Dump configuration loaded from `vardump.toml`.
///
/// # Example
///
/// ```toml
/// format = "json"
/// indent = 4
/// max_string_length = 80
/// max_depth = 64
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DumpConfig {
    /// Output format: `"text"`, `"json"` or `"html"`.
    #[serde(default)]
    pub format: OutputFormat,
    /// Spaces per nesting level for text and HTML output.
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Truncate rendered strings to this many characters, in every format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_string_length: Option<usize>,
    /// Maximum first-visit nesting depth.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Prefix of HTML anchor ids.
    #[serde(default = "default_anchor_prefix")]
    pub anchor_prefix: String,
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_anchor_prefix() -> String {
    DEFAULT_ANCHOR_PREFIX.to_string()
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            indent: default_indent(),
            max_string_length: None,
            max_depth: default_max_depth(),
            anchor_prefix: default_anchor_prefix(),
        }
    }
}

impl FromStr for DumpConfig {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: DumpConfig = toml::from_str(s)
            .map_err(|e| DumpError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl DumpConfig {
    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `Config` if `max_depth` is zero.
    pub fn validate(&self) -> DumpResult<()> {
        self.dumper_options().validate()
    }

    /// Traversal options for the engine.
    pub fn dumper_options(&self) -> DumperOptions {
        DumperOptions::new().with_max_depth(self.max_depth)
    }

    /// Rendering options for the writers.
    pub fn writer_options(&self) -> WriterOptions {
        WriterOptions::new()
            .with_indent(self.indent)
            .with_max_string_length(self.max_string_length)
            .with_anchor_prefix(self.anchor_prefix.clone())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# vardump configuration
#
# Output format: "text" (default), "json" or "html"
format = "text"

# Spaces per nesting level (text and html)
indent = 2

# Truncate long strings to this many characters (default: no limit)
# max_string_length = 120

# Maximum nesting depth of composites on their first visit
max_depth = 512

# Prefix of HTML anchor ids
anchor_prefix = "vardump-"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> DumpResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DumpError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        content.parse().map_err(|e| match e {
            DumpError::Config(msg) => {
                DumpError::config(format!("{} (in '{}')", msg, path.display()))
            }
            other => other,
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> DumpResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> DumpResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DumpError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
