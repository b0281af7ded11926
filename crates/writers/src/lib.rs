//! Output backends for vardump
//!
//! Every writer here implements `VarWriter` and enforces the call protocol
//! with a `ContractTracker`:
//! - TextWriter: indented plain text, the reference renderer
//! - JsonWriter: JSON document written on `stop()`
//! - HtmlWriter: nested lists with anchors and back-links
//! - EventRecorder: records calls as `Event`s for assertions
//!
//! `OutputFormat` and `writer_for` select one at run time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod format;
pub mod html;
pub mod json;
pub mod recorder;
pub mod text;

pub use format::{
    writer_for, OutputFormat, WriterOptions, DEFAULT_ANCHOR_PREFIX, DEFAULT_INDENT,
};
pub use html::{escape_html, HtmlWriter};
pub use json::JsonWriter;
pub use recorder::{Event, EventRecorder};
pub use text::TextWriter;
