//! Error types for vardump
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! ## Taxonomy
//!
//! | Category | Variants | Recovery |
//! |----------|----------|----------|
//! | Contract | `Contract` | Fatal, the dump aborts without `stop()` |
//! | Backend | `Io`, `Serialization` | Propagated, `stop()` attempted best-effort |
//! | Graph | `InvalidGraph`, `NestingTooDeep` | Propagated, `stop()` attempted best-effort |
//! | Config | `Config` | Raised before any session starts |

use std::io;

use thiserror::Error;

use crate::id::DumpId;
use crate::writer::CompositeKind;

/// Result type alias for dump operations
pub type DumpResult<T> = std::result::Result<T, DumpError>;

/// Error types for a dump session
#[derive(Debug, Error)]
pub enum DumpError {
    /// The calling engine broke the writer contract
    #[error("Contract violation: {0}")]
    Contract(#[from] ContractViolation),

    /// I/O error from the output sink
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization error from a structured backend
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A handle or node does not fit the operation
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// First-visit nesting exceeded the configured maximum
    #[error("Nesting too deep: depth {depth} exceeds maximum {max}")]
    NestingTooDeep {
        /// Depth that was reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DumpError {
    /// True if this error signals a defect in the traversal engine
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, DumpError::Contract(_))
    }

    /// Create an `InvalidGraph` error
    pub fn invalid_graph(msg: impl Into<String>) -> Self {
        DumpError::InvalidGraph(msg.into())
    }

    /// Create a `Config` error
    pub fn config(msg: impl Into<String>) -> Self {
        DumpError::Config(msg.into())
    }
}

impl From<serde_json::Error> for DumpError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            return DumpError::Io(e.into());
        }
        DumpError::Serialization(e.to_string())
    }
}

/// A breach of the writer protocol
///
/// Every variant is a programming error in whatever drives the writer,
/// never a property of the data being dumped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// A write arrived before `start()`
    #[error("write before start()")]
    NotStarted,

    /// `start()` was called on a writer that already started
    #[error("start() called twice")]
    AlreadyStarted,

    /// A call arrived after `stop()`
    #[error("call after stop()")]
    AlreadyStopped,

    /// A write arrived after `abort()`
    #[error("write after abort()")]
    Aborted,

    /// `stop()` was reached while composites were still open
    #[error("stop() with {depth} unclosed composite(s)")]
    UnclosedAtStop {
        /// Number of opens without a close
        depth: usize,
    },

    /// A close arrived with nothing open
    #[error("{kind} close #{id} without a matching open")]
    UnbalancedClose {
        /// Kind of the close event
        kind: CompositeKind,
        /// Id carried by the close event
        id: DumpId,
    },

    /// A close does not match the innermost open
    #[error("{kind} close #{id} does not match innermost open {open_kind} #{open_id}")]
    MismatchedClose {
        /// Kind of the close event
        kind: CompositeKind,
        /// Id carried by the close event
        id: DumpId,
        /// Kind of the innermost open
        open_kind: CompositeKind,
        /// Id of the innermost open
        open_id: DumpId,
    },

    /// A reference names an id that was never issued
    #[error("dangling reference *{0}")]
    DanglingReference(DumpId),

    /// An id was issued twice in one session
    #[error("id #{0} issued twice")]
    IdReused(DumpId),

    /// An id/ref pair with both or neither side set
    #[error("exactly one of id and ref must be set (id: {id:?}, ref: {reference:?})")]
    AmbiguousOccurrence {
        /// The id side
        id: Option<DumpId>,
        /// The ref side
        reference: Option<DumpId>,
    },
}
