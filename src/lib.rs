//! vardump - Pluggable dumping of value graphs
//!
//! A [`Dumper`] walks a [`Heap`] depth first and reports every value to a
//! [`VarWriter`]. Each value receives a session-unique [`DumpId`] on its
//! first occurrence; later occurrences of the same storage are reported as
//! references to that id, so shared and cyclic structure is written once.
//!
//! # Quick Start
//!
//! ```
//! use vardump::{dump_to_string, DumpConfig, Heap, Value, VarName};
//!
//! let mut heap = Heap::new();
//! let list = heap.list([Value::Int(1), Value::from("two")])?;
//! heap.push(list, Value::Ref(list))?;
//!
//! let text = dump_to_string(
//!     &heap,
//!     &Value::Ref(list),
//!     Some(&VarName::from("list")),
//!     &DumpConfig::default(),
//! )?;
//! assert!(text.contains("[2]: array *1"));
//! # Ok::<(), vardump::DumpError>(())
//! ```
//!
//! # Architecture
//!
//! - `vardump-core`: value graph, ids, names and the `VarWriter` contract
//! - `vardump-engine`: traversal, identity assignment, capability gating
//! - `vardump-writers`: text, JSON and HTML backends plus an event recorder
//!
//! This crate re-exports all three and adds file configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;

use std::io::Write;

use tracing::debug;

pub use config::{DumpConfig, CONFIG_FILE_NAME};
pub use vardump_core::{
    Array, Capabilities, CompositeKind, ContractTracker, ContractViolation, DumpError, DumpId,
    DumpResult, Handle, Heap, IdAllocator, KeyType, Node, Object, Occurrence, Property, Resource,
    Value, VarName, VarWriter,
};
pub use vardump_engine::{DumpStats, Dumper, DumperOptions, IdentityTable, DEFAULT_MAX_DEPTH};
pub use vardump_writers::{
    escape_html, writer_for, Event, EventRecorder, HtmlWriter, JsonWriter, OutputFormat,
    TextWriter, WriterOptions,
};

/// Dump one value into `sink` in the configured format
///
/// # Errors
///
/// Returns `Config` for an invalid configuration, otherwise the first error
/// raised by the traversal or the writer.
pub fn dump_to_writer<W: Write>(
    heap: &Heap,
    value: &Value,
    name: Option<&VarName>,
    config: &DumpConfig,
    sink: W,
) -> DumpResult<DumpStats> {
    config.validate()?;
    debug!(target: "vardump::session", format = %config.format, "Selected writer");
    let mut writer = writer_for(config.format, config.writer_options(), sink);
    Dumper::with_options(heap, config.dumper_options()).dump(writer.as_mut(), value, name)
}

/// Dump several named roots into `sink` as one session
pub fn dump_all_to_writer<W: Write>(
    heap: &Heap,
    vars: &[(VarName, Value)],
    config: &DumpConfig,
    sink: W,
) -> DumpResult<DumpStats> {
    config.validate()?;
    let mut writer = writer_for(config.format, config.writer_options(), sink);
    Dumper::with_options(heap, config.dumper_options()).dump_all(writer.as_mut(), vars)
}

/// Dump one value and return the rendered output
pub fn dump_to_string(
    heap: &Heap,
    value: &Value,
    name: Option<&VarName>,
    config: &DumpConfig,
) -> DumpResult<String> {
    let mut buf = Vec::new();
    dump_to_writer(heap, value, name, config, &mut buf)?;
    String::from_utf8(buf).map_err(|e| DumpError::Serialization(e.to_string()))
}
