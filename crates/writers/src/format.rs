//! Output format selection
//!
//! Writers are interchangeable behind `dyn VarWriter`. Callers pick one at
//! run time with [`writer_for`].

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vardump_core::{DumpError, DumpResult, VarWriter};

use crate::html::HtmlWriter;
use crate::json::JsonWriter;
use crate::text::TextWriter;

/// Default indent width for text and HTML output
pub const DEFAULT_INDENT: usize = 2;

/// Default prefix of HTML anchor ids
pub const DEFAULT_ANCHOR_PREFIX: &str = "vardump-";

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented plain text
    #[default]
    Text,
    /// JSON document
    Json,
    /// HTML fragment
    Html,
}

impl OutputFormat {
    /// All formats (for iteration)
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Text, OutputFormat::Json, OutputFormat::Html];

    /// Short identifier
    pub const fn id(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OutputFormat {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            other => Err(DumpError::config(format!(
                "unknown output format '{}', expected \"text\", \"json\" or \"html\"",
                other
            ))),
        }
    }
}

/// Rendering options shared by the writers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    /// Spaces per nesting level for text and HTML (default: 2)
    pub indent: usize,
    /// Truncate rendered strings to this many characters, in every format
    /// (default: none)
    pub max_string_length: Option<usize>,
    /// Prefix of HTML anchor ids (default: "vardump-")
    pub anchor_prefix: String,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            indent: DEFAULT_INDENT,
            max_string_length: None,
            anchor_prefix: DEFAULT_ANCHOR_PREFIX.to_string(),
        }
    }
}

impl WriterOptions {
    /// Create options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set indent width (builder pattern)
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set string truncation (builder pattern)
    pub fn with_max_string_length(mut self, max: Option<usize>) -> Self {
        self.max_string_length = max;
        self
    }

    /// Set HTML anchor prefix (builder pattern)
    pub fn with_anchor_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.anchor_prefix = prefix.into();
        self
    }

    /// Shorten `value` according to `max_string_length`
    ///
    /// Returns the text to render and whether it was cut.
    pub fn truncate<'a>(&self, value: &'a str) -> (&'a str, bool) {
        match self.max_string_length {
            Some(max) => match value.char_indices().nth(max) {
                Some((cut, _)) => (&value[..cut], true),
                None => (value, false),
            },
            None => (value, false),
        }
    }
}

/// Build a writer for `format` over `sink`
pub fn writer_for<'a, W>(
    format: OutputFormat,
    options: WriterOptions,
    sink: W,
) -> Box<dyn VarWriter + 'a>
where
    W: Write + 'a,
{
    match format {
        OutputFormat::Text => Box::new(TextWriter::with_options(sink, options)),
        OutputFormat::Json => Box::new(JsonWriter::with_options(sink, options)),
        OutputFormat::Html => Box::new(HtmlWriter::with_options(sink, options)),
    }
}
