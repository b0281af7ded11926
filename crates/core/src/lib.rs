//! Core types and traits for vardump
//!
//! This crate defines the foundational types used throughout the system:
//! - Heap / Value / Handle: the value graph and its storage identity
//! - DumpId / Occurrence: session-scoped identity and the id/ref pair
//! - VarName / KeyType: labels of values inside their containers
//! - VarWriter / Capabilities: the contract every output backend implements
//! - ContractTracker: writer-side enforcement of the call protocol
//! - DumpError: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod error;
pub mod id;
pub mod name;
pub mod value;
pub mod writer;

pub use contract::ContractTracker;
pub use error::{ContractViolation, DumpError, DumpResult};
pub use id::{DumpId, IdAllocator, Occurrence};
pub use name::{KeyType, VarName};
pub use value::{Array, Handle, Heap, Node, Object, Property, Resource, Value};
pub use writer::{Capabilities, CompositeKind, VarWriter};
