//! Writer that records every call it receives.
//!
//! `EventRecorder` is the assertion surface for engine tests: the recorded
//! `Event` list is exactly the call sequence, in order, with owned copies
//! of every payload.

use serde::Serialize;

use vardump_core::{
    Capabilities, CompositeKind, ContractTracker, DumpId, DumpResult, KeyType, Occurrence,
    VarName, VarWriter,
};

/// One writer call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Event {
    Start,
    Stop,
    Abort,
    ArrayOpen {
        id: DumpId,
        name: Option<VarName>,
        key_type: Option<KeyType>,
    },
    ArrayClose {
        id: DumpId,
        name: Option<VarName>,
    },
    ArrayReference {
        reference: DumpId,
        name: Option<VarName>,
        key_type: Option<KeyType>,
    },
    ObjectOpen {
        id: DumpId,
        name: Option<VarName>,
        key_type: Option<KeyType>,
        class: String,
    },
    ObjectClose {
        id: DumpId,
        name: Option<VarName>,
        class: String,
    },
    ObjectReference {
        reference: DumpId,
        name: Option<VarName>,
        key_type: Option<KeyType>,
        class: String,
    },
    Bool {
        occurrence: Occurrence,
        value: bool,
        name: Option<VarName>,
        key_type: Option<KeyType>,
    },
    Int {
        occurrence: Occurrence,
        value: i64,
        name: Option<VarName>,
        key_type: Option<KeyType>,
    },
    Float {
        occurrence: Occurrence,
        value: f64,
        name: Option<VarName>,
        key_type: Option<KeyType>,
    },
    String {
        occurrence: Occurrence,
        value: String,
        name: Option<VarName>,
        key_type: Option<KeyType>,
    },
    Null {
        occurrence: Occurrence,
        name: Option<VarName>,
        key_type: Option<KeyType>,
    },
    Resource {
        occurrence: Occurrence,
        name: Option<VarName>,
        resource_type: String,
        key_type: Option<KeyType>,
    },
    ResourceReference {
        reference: DumpId,
        name: Option<VarName>,
        resource_type: String,
        key_type: Option<KeyType>,
    },
    Uninitialized {
        name: VarName,
    },
}

impl Event {
    /// Id issued by this event, if it is a first occurrence
    pub fn id(&self) -> Option<DumpId> {
        match self {
            Event::ArrayOpen { id, .. } | Event::ObjectOpen { id, .. } => Some(*id),
            Event::Bool { occurrence, .. }
            | Event::Int { occurrence, .. }
            | Event::Float { occurrence, .. }
            | Event::String { occurrence, .. }
            | Event::Null { occurrence, .. }
            | Event::Resource { occurrence, .. } => occurrence.id(),
            _ => None,
        }
    }

    /// Id referred back to, if this is a reference event
    pub fn reference(&self) -> Option<DumpId> {
        match self {
            Event::ArrayReference { reference, .. }
            | Event::ObjectReference { reference, .. }
            | Event::ResourceReference { reference, .. } => Some(*reference),
            Event::Bool { occurrence, .. }
            | Event::Int { occurrence, .. }
            | Event::Float { occurrence, .. }
            | Event::String { occurrence, .. }
            | Event::Null { occurrence, .. }
            | Event::Resource { occurrence, .. } => occurrence.reference(),
            _ => None,
        }
    }

    /// Kind and id if this event opens a composite
    pub fn opens(&self) -> Option<(CompositeKind, DumpId)> {
        match self {
            Event::ArrayOpen { id, .. } => Some((CompositeKind::Array, *id)),
            Event::ObjectOpen { id, .. } => Some((CompositeKind::Object, *id)),
            _ => None,
        }
    }

    /// Kind and id if this event closes a composite
    pub fn closes(&self) -> Option<(CompositeKind, DumpId)> {
        match self {
            Event::ArrayClose { id, .. } => Some((CompositeKind::Array, *id)),
            Event::ObjectClose { id, .. } => Some((CompositeKind::Object, *id)),
            _ => None,
        }
    }
}

/// Records writer calls as `Event`s
#[derive(Debug, Clone)]
pub struct EventRecorder {
    events: Vec<Event>,
    tracker: Option<ContractTracker>,
    capabilities: Capabilities,
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRecorder {
    /// Recorder that validates the contract and supports every capability
    pub fn new() -> Self {
        EventRecorder {
            events: Vec::new(),
            tracker: Some(ContractTracker::new()),
            capabilities: Capabilities::FULL,
        }
    }

    /// Recorder that accepts any call sequence
    pub fn unchecked() -> Self {
        EventRecorder {
            tracker: None,
            ..Self::new()
        }
    }

    /// Advertise a different capability set (builder pattern)
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Events recorded so far
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Take the recorded events
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn check<F>(&mut self, f: F) -> DumpResult<()>
    where
        F: FnOnce(&mut ContractTracker) -> Result<(), vardump_core::ContractViolation>,
    {
        if let Some(tracker) = self.tracker.as_mut() {
            f(tracker)?;
        }
        Ok(())
    }

    fn leaf(&mut self, occurrence: Occurrence, event: Event) -> DumpResult<()> {
        self.check(|t| t.leaf(occurrence))?;
        self.events.push(event);
        Ok(())
    }
}

impl VarWriter for EventRecorder {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn start(&mut self) -> DumpResult<()> {
        self.check(|t| t.start())?;
        self.events.push(Event::Start);
        Ok(())
    }

    fn stop(&mut self) -> DumpResult<()> {
        self.check(|t| t.stop())?;
        self.events.push(Event::Stop);
        Ok(())
    }

    fn write_array_open(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.check(|t| t.open(CompositeKind::Array, id))?;
        self.events.push(Event::ArrayOpen {
            id,
            name: name.cloned(),
            key_type,
        });
        Ok(())
    }

    fn write_array_close(&mut self, id: DumpId, name: Option<&VarName>) -> DumpResult<()> {
        self.check(|t| t.close(CompositeKind::Array, id))?;
        self.events.push(Event::ArrayClose {
            id,
            name: name.cloned(),
        });
        Ok(())
    }

    fn write_array_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.check(|t| t.reference(reference))?;
        self.events.push(Event::ArrayReference {
            reference,
            name: name.cloned(),
            key_type,
        });
        Ok(())
    }

    fn write_object_open(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()> {
        self.check(|t| t.open(CompositeKind::Object, id))?;
        self.events.push(Event::ObjectOpen {
            id,
            name: name.cloned(),
            key_type,
            class: class.to_string(),
        });
        Ok(())
    }

    fn write_object_close(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        class: &str,
    ) -> DumpResult<()> {
        self.check(|t| t.close(CompositeKind::Object, id))?;
        self.events.push(Event::ObjectClose {
            id,
            name: name.cloned(),
            class: class.to_string(),
        });
        Ok(())
    }

    fn write_object_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()> {
        self.check(|t| t.reference(reference))?;
        self.events.push(Event::ObjectReference {
            reference,
            name: name.cloned(),
            key_type,
            class: class.to_string(),
        });
        Ok(())
    }

    fn write_bool(
        &mut self,
        occurrence: Occurrence,
        value: bool,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let event = Event::Bool {
            occurrence,
            value,
            name: name.cloned(),
            key_type,
        };
        self.leaf(occurrence, event)
    }

    fn write_int(
        &mut self,
        occurrence: Occurrence,
        value: i64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let event = Event::Int {
            occurrence,
            value,
            name: name.cloned(),
            key_type,
        };
        self.leaf(occurrence, event)
    }

    fn write_float(
        &mut self,
        occurrence: Occurrence,
        value: f64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let event = Event::Float {
            occurrence,
            value,
            name: name.cloned(),
            key_type,
        };
        self.leaf(occurrence, event)
    }

    fn write_string(
        &mut self,
        occurrence: Occurrence,
        value: &str,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let event = Event::String {
            occurrence,
            value: value.to_string(),
            name: name.cloned(),
            key_type,
        };
        self.leaf(occurrence, event)
    }

    fn write_null(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let event = Event::Null {
            occurrence,
            name: name.cloned(),
            key_type,
        };
        self.leaf(occurrence, event)
    }

    fn write_resource(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        resource_type: &str,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let event = Event::Resource {
            occurrence,
            name: name.cloned(),
            resource_type: resource_type.to_string(),
            key_type,
        };
        self.leaf(occurrence, event)
    }

    fn write_resource_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        resource_type: &str,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.check(|t| t.reference(reference))?;
        self.events.push(Event::ResourceReference {
            reference,
            name: name.cloned(),
            resource_type: resource_type.to_string(),
            key_type,
        });
        Ok(())
    }

    fn write_uninitialized(&mut self, name: &VarName) -> DumpResult<()> {
        self.check(|t| t.anonymous())?;
        self.events.push(Event::Uninitialized { name: name.clone() });
        Ok(())
    }

    fn abort(&mut self) -> DumpResult<()> {
        self.check(|t| t.abort().map(|_| ()))?;
        self.events.push(Event::Abort);
        Ok(())
    }
}
