//! Writer-side enforcement of the call protocol
//!
//! `ContractTracker` is a small state machine a writer feeds with every
//! call it receives. It rejects:
//!
//! - writes outside `start()`..`stop()`, repeated `start()` or `stop()`
//! - closes without an open, or not matching the innermost open
//! - references to ids never issued, ids issued twice
//! - `stop()` with composites still open, unless `abort()` came first
//!
//! It also exposes the current nesting depth, which renderers use for
//! indentation.

use rustc_hash::FxHashSet;

use crate::error::ContractViolation;
use crate::id::{DumpId, Occurrence};
use crate::writer::CompositeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Idle,
    Active,
    Aborted,
    Stopped,
}

/// Protocol state of one writer session
#[derive(Debug, Clone)]
pub struct ContractTracker {
    state: SessionState,
    open: Vec<(CompositeKind, DumpId)>,
    issued: FxHashSet<DumpId>,
}

impl Default for ContractTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractTracker {
    /// Create a tracker for a session that has not started
    pub fn new() -> Self {
        ContractTracker {
            state: SessionState::Idle,
            open: Vec::new(),
            issued: FxHashSet::default(),
        }
    }

    /// Number of composites currently open
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Check if `start()` has been seen and `stop()` has not
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Check if an id has been issued in this session
    pub fn is_issued(&self, id: DumpId) -> bool {
        self.issued.contains(&id)
    }

    fn ensure_active(&self) -> Result<(), ContractViolation> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Idle => Err(ContractViolation::NotStarted),
            SessionState::Aborted => Err(ContractViolation::Aborted),
            SessionState::Stopped => Err(ContractViolation::AlreadyStopped),
        }
    }

    fn issue(&mut self, id: DumpId) -> Result<(), ContractViolation> {
        if !self.issued.insert(id) {
            return Err(ContractViolation::IdReused(id));
        }
        Ok(())
    }

    /// Record `start()`
    pub fn start(&mut self) -> Result<(), ContractViolation> {
        match self.state {
            SessionState::Idle => {
                self.state = SessionState::Active;
                Ok(())
            }
            SessionState::Active | SessionState::Aborted => {
                Err(ContractViolation::AlreadyStarted)
            }
            SessionState::Stopped => Err(ContractViolation::AlreadyStopped),
        }
    }

    /// Record `abort()`
    ///
    /// Abandons every open composite and returns them innermost first. After
    /// this only `stop()` is accepted, and it succeeds with nothing closed.
    pub fn abort(&mut self) -> Result<Vec<(CompositeKind, DumpId)>, ContractViolation> {
        self.ensure_active()?;
        self.state = SessionState::Aborted;
        let mut unwound = std::mem::take(&mut self.open);
        unwound.reverse();
        Ok(unwound)
    }

    /// Check if `abort()` has been seen
    pub fn is_aborted(&self) -> bool {
        self.state == SessionState::Aborted
    }

    /// Record `stop()`
    pub fn stop(&mut self) -> Result<(), ContractViolation> {
        if self.state == SessionState::Aborted {
            self.state = SessionState::Stopped;
            return Ok(());
        }
        self.ensure_active()?;
        if !self.open.is_empty() {
            return Err(ContractViolation::UnclosedAtStop {
                depth: self.open.len(),
            });
        }
        self.state = SessionState::Stopped;
        Ok(())
    }

    /// Record a `write_*_open`
    pub fn open(&mut self, kind: CompositeKind, id: DumpId) -> Result<(), ContractViolation> {
        self.ensure_active()?;
        self.issue(id)?;
        self.open.push((kind, id));
        Ok(())
    }

    /// Record a `write_*_close`
    pub fn close(&mut self, kind: CompositeKind, id: DumpId) -> Result<(), ContractViolation> {
        self.ensure_active()?;
        match self.open.last() {
            None => Err(ContractViolation::UnbalancedClose { kind, id }),
            Some(&(open_kind, open_id)) if open_kind != kind || open_id != id => {
                Err(ContractViolation::MismatchedClose {
                    kind,
                    id,
                    open_kind,
                    open_id,
                })
            }
            Some(_) => {
                self.open.pop();
                Ok(())
            }
        }
    }

    /// Record a reference event
    pub fn reference(&mut self, reference: DumpId) -> Result<(), ContractViolation> {
        self.ensure_active()?;
        if !self.issued.contains(&reference) {
            return Err(ContractViolation::DanglingReference(reference));
        }
        Ok(())
    }

    /// Record a leaf value event
    pub fn leaf(&mut self, occurrence: Occurrence) -> Result<(), ContractViolation> {
        match occurrence {
            Occurrence::First(id) => {
                self.ensure_active()?;
                self.issue(id)
            }
            Occurrence::Repeat(reference) => self.reference(reference),
        }
    }

    /// Record an event that carries no identity
    pub fn anonymous(&mut self) -> Result<(), ContractViolation> {
        self.ensure_active()
    }
}
