//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use std::collections::HashSet;
use std::sync::Once;

pub use vardump::{
    Capabilities, CompositeKind, DumpConfig, DumpError, DumpId, DumpResult, DumpStats, Dumper,
    DumperOptions, Event, EventRecorder, Handle, Heap, KeyType, Node, Occurrence, OutputFormat,
    Property, Value, VarName, VarWriter,
};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route `tracing` output through the test harness (set RUST_LOG to see it).
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ============================================================================
// Recording helpers
// ============================================================================

/// Dump `value` into a validating recorder with every capability.
pub fn record(heap: &Heap, value: &Value) -> Vec<Event> {
    record_with(heap, value, None, Capabilities::FULL)
}

/// Dump `value` under `name` into a recorder advertising `capabilities`.
pub fn record_with(
    heap: &Heap,
    value: &Value,
    name: Option<&VarName>,
    capabilities: Capabilities,
) -> Vec<Event> {
    init_tracing();
    let mut recorder = EventRecorder::new().with_capabilities(capabilities);
    Dumper::new(heap)
        .dump(&mut recorder, value, name)
        .expect("dump should succeed");
    recorder.into_events()
}

/// Dump `value` in `format` with default settings.
pub fn render(heap: &Heap, value: &Value, name: Option<&str>, format: OutputFormat) -> String {
    init_tracing();
    let config = DumpConfig {
        format,
        ..DumpConfig::default()
    };
    let name = name.map(VarName::from);
    vardump::dump_to_string(heap, value, name.as_ref(), &config).expect("dump should succeed")
}

// ============================================================================
// Protocol checks
// ============================================================================

/// Assert the recorded sequence obeys the call protocol:
/// start first, stop last, balanced nesting, unique ids, resolvable refs.
pub fn assert_protocol(events: &[Event]) {
    assert_eq!(events.first(), Some(&Event::Start), "session must start");
    assert_eq!(events.last(), Some(&Event::Stop), "session must stop");
    assert_eq!(
        events.iter().filter(|e| **e == Event::Start).count(),
        1,
        "start must be called once"
    );
    assert_eq!(
        events.iter().filter(|e| **e == Event::Stop).count(),
        1,
        "stop must be called once"
    );

    let mut issued = HashSet::new();
    let mut stack: Vec<(CompositeKind, DumpId)> = Vec::new();
    for event in events {
        if let Some(reference) = event.reference() {
            assert!(
                issued.contains(&reference),
                "reference {} precedes its first occurrence",
                reference
            );
        }
        if let Some(id) = event.id() {
            assert!(issued.insert(id), "id {} issued twice", id);
        }
        if let Some(open) = event.opens() {
            stack.push(open);
        }
        if let Some(close) = event.closes() {
            assert_eq!(stack.pop(), Some(close), "close does not match open");
        }
    }
    assert!(stack.is_empty(), "unclosed composites at stop: {:?}", stack);
}

/// Ids issued by first occurrences, in order.
pub fn issued_ids(events: &[Event]) -> Vec<u64> {
    events
        .iter()
        .filter_map(Event::id)
        .map(|id| id.as_u64())
        .collect()
}

/// Number of composites opened.
pub fn opened(events: &[Event]) -> usize {
    events.iter().filter(|e| e.opens().is_some()).count()
}

/// Number of reference events.
pub fn references(events: &[Event]) -> usize {
    events.iter().filter(|e| e.reference().is_some()).count()
}

/// Deepest nesting of opens.
pub fn nesting(events: &[Event]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    for event in events {
        if event.opens().is_some() {
            depth += 1;
            deepest = deepest.max(depth);
        }
        if event.closes().is_some() {
            depth -= 1;
        }
    }
    deepest
}

// ============================================================================
// Graph helpers
// ============================================================================

/// Distinct arrays and objects reachable from `root`.
pub fn reachable_composites(heap: &Heap, root: &Value) -> usize {
    let mut seen = HashSet::new();
    let mut pending: Vec<Value> = vec![root.clone()];
    let mut composites = 0;
    while let Some(value) = pending.pop() {
        let Value::Ref(handle) = value else {
            continue;
        };
        if !seen.insert(handle) {
            continue;
        }
        match heap.get(handle).expect("handle from this heap") {
            Node::Cell(inner) => pending.push(inner.clone()),
            Node::Array(array) => {
                composites += 1;
                pending.extend(array.entries().iter().map(|(_, v)| v.clone()));
            }
            Node::Object(object) => {
                composites += 1;
                pending.extend(object.properties().iter().filter_map(|(_, p)| match p {
                    Property::Value(v) => Some(v.clone()),
                    Property::Uninitialized => None,
                }));
            }
            Node::Resource(_) => {}
        }
    }
    composites
}

/// `$a = [1, 2]; $a[] = &$a;` style self-containing list.
pub fn self_containing_list(heap: &mut Heap) -> Handle {
    let list = heap.list([Value::Int(1), Value::Int(2)]).unwrap();
    heap.push(list, list).unwrap();
    list
}

/// Object with two properties pointing at one shared `Point`.
pub fn shared_point_pair(heap: &mut Heap) -> Handle {
    let point = heap.object("Point");
    heap.set_property(point, "x", 1).unwrap();
    heap.set_property(point, "y", 2).unwrap();
    let pair = heap.object("Pair");
    heap.set_property(pair, "left", point).unwrap();
    heap.set_property(pair, "right", point).unwrap();
    pair
}
