//! Traversal engine for vardump
//!
//! This crate walks a `Heap` and drives a `VarWriter`:
//! - Dumper: depth-first traversal, one session per call
//! - IdentityTable: storage identity to `DumpId`, reference detection
//! - DumperOptions: traversal limits
//!
//! The engine is the only component that knows about:
//! - Visiting order
//! - Identity assignment
//! - Capability gating of optional contract parts

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dumper;
pub mod identity;
pub mod options;

pub use dumper::{DumpStats, Dumper};
pub use identity::IdentityTable;
pub use options::{DumperOptions, DEFAULT_MAX_DEPTH};
