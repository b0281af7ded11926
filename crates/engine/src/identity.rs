//! Identity assignment for one dump session
//!
//! Maps heap handles to the `DumpId` issued on their first visit. Inline
//! scalars have no handle and get a fresh id every time.

use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

use vardump_core::{DumpId, Handle, IdAllocator, Occurrence};

/// Session-scoped table of visited values
#[derive(Debug, Default)]
pub struct IdentityTable {
    ids: IdAllocator,
    seen: FxHashMap<Handle, DumpId>,
}

impl IdentityTable {
    /// Create an empty table; the first id issued is 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue an id for a value without storage identity
    pub fn fresh(&mut self) -> DumpId {
        self.ids.next_id()
    }

    /// First or repeat occurrence of a heap node
    ///
    /// Issues an id on the first call for `handle` and returns that same id
    /// as a reference on every later call.
    pub fn occurrence(&mut self, handle: Handle) -> Occurrence {
        match self.seen.entry(handle) {
            Entry::Occupied(e) => Occurrence::Repeat(*e.get()),
            Entry::Vacant(e) => {
                let id = self.ids.next_id();
                e.insert(id);
                Occurrence::First(id)
            }
        }
    }

    /// Id already issued for `handle`, if any
    pub fn get(&self, handle: Handle) -> Option<DumpId> {
        self.seen.get(&handle).copied()
    }

    /// Number of heap nodes visited
    pub fn tracked(&self) -> usize {
        self.seen.len()
    }

    /// Number of ids issued, including fresh ones
    pub fn issued(&self) -> u64 {
        self.ids.issued()
    }
}
