//! Protocol Tests
//!
//! Exact event sequences for representative graphs, and the structural
//! guarantees every session must keep.

use crate::common::*;

fn id(n: u64) -> DumpId {
    DumpId::new(n)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scalar_root_is_one_leaf() {
    let heap = Heap::new();
    let events = record_with(
        &heap,
        &Value::Bool(true),
        Some(&VarName::from("flag")),
        Capabilities::FULL,
    );

    assert_eq!(
        events,
        vec![
            Event::Start,
            Event::Bool {
                occurrence: Occurrence::First(id(1)),
                value: true,
                name: Some(VarName::from("flag")),
                key_type: None,
            },
            Event::Stop,
        ]
    );
}

#[test]
fn two_element_list_in_order() {
    let mut heap = Heap::new();
    let list = heap.list([Value::Int(10), Value::from("a")]).unwrap();
    let events = record_with(&heap, &Value::Ref(list), None, Capabilities::BASELINE);

    assert_eq!(
        events,
        vec![
            Event::Start,
            Event::ArrayOpen {
                id: id(1),
                name: None,
                key_type: None,
            },
            Event::Int {
                occurrence: Occurrence::First(id(2)),
                value: 10,
                name: Some(VarName::Index(0)),
                key_type: None,
            },
            Event::String {
                occurrence: Occurrence::First(id(3)),
                value: "a".to_string(),
                name: Some(VarName::Index(1)),
                key_type: None,
            },
            Event::ArrayClose {
                id: id(1),
                name: None,
            },
            Event::Stop,
        ]
    );
}

#[test]
fn aliased_object_is_referenced_with_its_class() {
    let mut heap = Heap::new();
    let pair = shared_point_pair(&mut heap);
    let events = record(&heap, &Value::Ref(pair));
    assert_protocol(&events);

    let opens: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::ObjectOpen { id, class, .. } => Some((*id, class.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(opens, vec![(id(1), "Pair"), (id(2), "Point")]);

    let refs: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::ObjectReference {
                reference,
                name,
                class,
                ..
            } => Some((*reference, name.clone(), class.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(refs, vec![(id(2), Some(VarName::from("right")), "Point")]);
}

#[test]
fn self_containing_list_terminates() {
    let mut heap = Heap::new();
    let list = self_containing_list(&mut heap);
    let events = record(&heap, &Value::Ref(list));
    assert_protocol(&events);

    assert_eq!(opened(&events), 1);
    assert!(events.contains(&Event::ArrayReference {
        reference: id(1),
        name: Some(VarName::Index(2)),
        key_type: Some(KeyType::Int),
    }));
}

#[test]
fn mutual_cycle_through_objects() {
    let mut heap = Heap::new();
    let parent = heap.object("Parent");
    let child = heap.object("Child");
    heap.set_property(parent, "child", child).unwrap();
    heap.set_property(child, "parent", parent).unwrap();

    let events = record(&heap, &Value::Ref(parent));
    assert_protocol(&events);
    assert_eq!(opened(&events), 2);
    assert_eq!(references(&events), 1);
    assert_eq!(nesting(&events), 2);
}

#[test]
fn ids_are_monotonic_from_one() {
    let mut heap = Heap::new();
    let inner = heap.list([1, 2]).unwrap();
    let outer = heap.list([Value::Ref(inner), Value::from("x")]).unwrap();
    let events = record(&heap, &Value::Ref(outer));

    assert_eq!(issued_ids(&events), vec![1, 2, 3, 4, 5]);
}

#[test]
fn string_keys_carry_string_key_type() {
    let mut heap = Heap::new();
    let map = heap.array();
    heap.insert(map, "10", "ten").unwrap();
    heap.insert(map, 10, "int ten").unwrap();
    let events = record(&heap, &Value::Ref(map));

    let keys: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::String { name, key_type, .. } => Some((name.clone(), *key_type)),
            _ => None,
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            (Some(VarName::from("10")), Some(KeyType::String)),
            (Some(VarName::Index(10)), Some(KeyType::Int)),
        ]
    );
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn equal_contents_are_distinct_values() {
    let mut heap = Heap::new();
    let a = heap.list([1]).unwrap();
    let b = heap.list([1]).unwrap();
    let both = heap.list([a, b]).unwrap();
    let events = record(&heap, &Value::Ref(both));

    assert_eq!(opened(&events), 3);
    assert_eq!(references(&events), 0);
}

#[test]
fn inline_scalars_are_never_references() {
    let mut heap = Heap::new();
    let list = heap.list(["same", "same", "same"]).unwrap();
    let events = record(&heap, &Value::Ref(list));

    assert_eq!(references(&events), 0);
    assert_eq!(issued_ids(&events).len(), 4);
}

#[test]
fn shared_scalar_slot_is_referenced() {
    let mut heap = Heap::new();
    let slot = heap.cell(42).unwrap();
    let list = heap.list([slot, slot]).unwrap();
    let events = record(&heap, &Value::Ref(list));
    assert_protocol(&events);

    let ints: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::Int { occurrence, .. } => Some(*occurrence),
            _ => None,
        })
        .collect();
    assert_eq!(
        ints,
        vec![Occurrence::First(id(2)), Occurrence::Repeat(id(2))]
    );
}

#[test]
fn shared_resource_is_referenced() {
    let mut heap = Heap::new();
    let stream = heap.resource("stream");
    let list = heap.list([stream, stream]).unwrap();
    let events = record(&heap, &Value::Ref(list));
    assert_protocol(&events);

    assert!(matches!(
        events[2],
        Event::Resource {
            occurrence: Occurrence::First(_),
            ..
        }
    ));
    assert_eq!(
        events[3],
        Event::ResourceReference {
            reference: id(2),
            name: Some(VarName::Index(1)),
            resource_type: "stream".to_string(),
            key_type: Some(KeyType::Int),
        }
    );
}

#[test]
fn dump_all_shares_identity_across_roots() {
    init_tracing();
    let mut heap = Heap::new();
    let pair = shared_point_pair(&mut heap);
    let vars = vec![
        (VarName::from("first"), Value::Ref(pair)),
        (VarName::from("second"), Value::Ref(pair)),
        (VarName::from("n"), Value::Null),
    ];

    let mut recorder = EventRecorder::new();
    let stats = Dumper::new(&heap).dump_all(&mut recorder, &vars).unwrap();
    let events = recorder.into_events();
    assert_protocol(&events);

    assert_eq!(stats.composites, 2);
    assert_eq!(stats.references, 2);
    assert_eq!(
        events[events.len() - 3],
        Event::ObjectReference {
            reference: id(1),
            name: Some(VarName::from("second")),
            key_type: None,
            class: "Pair".to_string(),
        }
    );
}

#[test]
fn sessions_are_independent() {
    let mut heap = Heap::new();
    let list = self_containing_list(&mut heap);
    let first = record(&heap, &Value::Ref(list));
    let second = record(&heap, &Value::Ref(list));
    assert_eq!(first, second);
}

// ============================================================================
// Uninitialized
// ============================================================================

#[test]
fn uninitialized_is_never_null() {
    let mut heap = Heap::new();
    let obj = heap.object("Lazy");
    heap.declare_property(obj, "pending").unwrap();
    heap.set_property(obj, "none", Value::Null).unwrap();
    let events = record(&heap, &Value::Ref(obj));
    assert_protocol(&events);

    assert_eq!(
        events[2],
        Event::Uninitialized {
            name: VarName::from("pending")
        }
    );
    assert!(matches!(
        &events[3],
        Event::Null { name: Some(n), .. } if *n == VarName::from("none")
    ));
}

#[test]
fn uninitialized_issues_no_id() {
    let mut heap = Heap::new();
    let obj = heap.object("Lazy");
    heap.declare_property(obj, "a").unwrap();
    heap.set_property(obj, "b", 1).unwrap();
    let events = record(&heap, &Value::Ref(obj));
    assert_eq!(issued_ids(&events), vec![1, 2]);
}

// ============================================================================
// Stats
// ============================================================================

#[test]
fn stats_count_session() {
    init_tracing();
    let mut heap = Heap::new();
    let list = self_containing_list(&mut heap);
    let mut recorder = EventRecorder::new();
    let stats = Dumper::new(&heap)
        .dump(&mut recorder, &Value::Ref(list), None)
        .unwrap();

    assert_eq!(
        stats,
        DumpStats {
            values: 4,
            composites: 1,
            references: 1,
            max_depth: 1,
        }
    );
}
