//! Graph Property Tests
//!
//! Randomized graphs with sharing and cycles. Every session must be well
//! formed, emit each reachable composite exactly once, and terminate.

use proptest::prelude::*;

use crate::common::*;

// -- Graph description --

#[derive(Debug, Clone)]
enum Slot {
    Int(i64),
    Str(String),
    Null,
    Edge(usize),
    Unset,
}

#[derive(Debug, Clone)]
enum Shape {
    Array(Vec<Slot>),
    Object(Vec<Slot>),
    Resource,
    Cell(i64),
}

fn arb_slot() -> impl Strategy<Value = Slot> {
    prop_oneof![
        1 => any::<i64>().prop_map(Slot::Int),
        1 => "[a-z]{0,6}".prop_map(Slot::Str),
        1 => Just(Slot::Null),
        3 => (0usize..32).prop_map(Slot::Edge),
        1 => Just(Slot::Unset),
    ]
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        3 => prop::collection::vec(arb_slot(), 0..5).prop_map(Shape::Array),
        2 => prop::collection::vec(arb_slot(), 0..5).prop_map(Shape::Object),
        1 => Just(Shape::Resource),
        1 => any::<i64>().prop_map(Shape::Cell),
    ]
}

fn arb_graph() -> impl Strategy<Value = Vec<Shape>> {
    prop::collection::vec(arb_shape(), 1..16)
}

fn slot_value(slot: &Slot, handles: &[Handle]) -> Option<Value> {
    match slot {
        Slot::Int(i) => Some(Value::Int(*i)),
        Slot::Str(s) => Some(Value::String(s.clone())),
        Slot::Null => Some(Value::Null),
        Slot::Edge(i) => Some(Value::Ref(handles[i % handles.len()])),
        Slot::Unset => None,
    }
}

/// Allocate every node first so edges may point anywhere, cycles included.
fn build(shapes: &[Shape]) -> (Heap, Value) {
    let mut heap = Heap::new();
    let handles: Vec<Handle> = shapes
        .iter()
        .map(|shape| match shape {
            Shape::Array(_) => heap.array(),
            Shape::Object(_) => heap.object("Node"),
            Shape::Resource => heap.resource("stream"),
            Shape::Cell(i) => heap.cell(*i).unwrap(),
        })
        .collect();

    for (shape, &handle) in shapes.iter().zip(&handles) {
        match shape {
            Shape::Array(slots) => {
                for slot in slots {
                    if let Some(value) = slot_value(slot, &handles) {
                        heap.push(handle, value).unwrap();
                    }
                }
            }
            Shape::Object(slots) => {
                for (i, slot) in slots.iter().enumerate() {
                    let name = format!("p{}", i);
                    match slot_value(slot, &handles) {
                        Some(value) => heap.set_property(handle, name, value).unwrap(),
                        None => heap.declare_property(handle, name).unwrap(),
                    }
                }
            }
            Shape::Resource | Shape::Cell(_) => {}
        }
    }
    (heap, Value::Ref(handles[0]))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn sessions_are_well_formed(shapes in arb_graph()) {
        let (heap, root) = build(&shapes);
        let events = record(&heap, &root);
        assert_protocol(&events);
    }

    #[test]
    fn each_reachable_composite_opens_once(shapes in arb_graph()) {
        let (heap, root) = build(&shapes);
        let events = record(&heap, &root);
        prop_assert_eq!(opened(&events), reachable_composites(&heap, &root));
    }

    /// Stats agree with the events the writer actually received.
    #[test]
    fn stats_match_events(shapes in arb_graph()) {
        let (heap, root) = build(&shapes);
        let mut recorder = EventRecorder::new();
        let stats = Dumper::new(&heap).dump(&mut recorder, &root, None).unwrap();
        let events = recorder.into_events();

        prop_assert_eq!(stats.composites, opened(&events));
        prop_assert_eq!(stats.references, references(&events));
        prop_assert_eq!(stats.max_depth, nesting(&events));
    }

    #[test]
    fn baseline_sessions_are_well_formed(shapes in arb_graph()) {
        let (heap, root) = build(&shapes);
        let events = record_with(&heap, &root, None, Capabilities::BASELINE);
        assert_protocol(&events);
        let has_extended = events.iter().any(|e| matches!(
            e,
            Event::Uninitialized { .. } | Event::ResourceReference { .. }
        ));
        prop_assert!(!has_extended);
    }

    #[test]
    fn every_format_renders(shapes in arb_graph()) {
        let (heap, root) = build(&shapes);
        for format in OutputFormat::ALL {
            let config = DumpConfig { format, ..DumpConfig::default() };
            let out = vardump::dump_to_string(&heap, &root, None, &config);
            prop_assert!(out.is_ok(), "{} failed: {:?}", format, out);
        }
    }

    #[test]
    fn json_output_parses(shapes in arb_graph()) {
        let (heap, root) = build(&shapes);
        let out = render(&heap, &root, Some("root"), OutputFormat::Json);
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        prop_assert_eq!(doc.as_array().map(Vec::len), Some(1));
    }
}
