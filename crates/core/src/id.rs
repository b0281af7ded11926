//! Identity types for a dump session
//!
//! - `DumpId`: engine-assigned integer naming a value within one session
//! - `IdAllocator`: monotonic issuer of `DumpId`s, starting at 1
//! - `Occurrence`: the id/ref pair carried by every value event

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ContractViolation;

/// Identity of a value within one dump session
///
/// Ids are positive and issued in increasing order. They carry no meaning
/// across sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DumpId(u64);

impl DumpId {
    /// Wrap a raw id
    pub const fn new(raw: u64) -> Self {
        DumpId(raw)
    }

    /// Get the numeric value
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DumpId {
    fn from(raw: u64) -> Self {
        DumpId(raw)
    }
}

/// Monotonic id issuer for one session
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Create an allocator whose first id is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id
    pub fn next_id(&mut self) -> DumpId {
        self.last += 1;
        DumpId(self.last)
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.last
    }
}

/// Whether a value event is the first visit or a repeat
///
/// Encodes the contract's nullable `(id, ref)` pair so that exactly one
/// side is always set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occurrence {
    /// First visit; full content follows
    First(DumpId),
    /// Repeat visit of an id emitted earlier; no content follows
    Repeat(DumpId),
}

impl Occurrence {
    /// Build from the nullable pair form
    ///
    /// # Errors
    ///
    /// Returns `AmbiguousOccurrence` unless exactly one side is set.
    pub fn from_parts(
        id: Option<DumpId>,
        reference: Option<DumpId>,
    ) -> Result<Self, ContractViolation> {
        match (id, reference) {
            (Some(id), None) => Ok(Occurrence::First(id)),
            (None, Some(reference)) => Ok(Occurrence::Repeat(reference)),
            (id, reference) => Err(ContractViolation::AmbiguousOccurrence { id, reference }),
        }
    }

    /// The id side, set on first visits
    pub fn id(&self) -> Option<DumpId> {
        match self {
            Occurrence::First(id) => Some(*id),
            Occurrence::Repeat(_) => None,
        }
    }

    /// The ref side, set on repeat visits
    pub fn reference(&self) -> Option<DumpId> {
        match self {
            Occurrence::First(_) => None,
            Occurrence::Repeat(r) => Some(*r),
        }
    }

    /// Check if this is a first visit
    pub fn is_first(&self) -> bool {
        matches!(self, Occurrence::First(_))
    }

    /// The id this event is about, whichever side carries it
    pub fn target(&self) -> DumpId {
        match self {
            Occurrence::First(id) | Occurrence::Repeat(id) => *id,
        }
    }
}
