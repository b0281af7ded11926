//! Value graph for vardump
//!
//! This module defines:
//! - Value: a scalar, or a handle to a node in the heap
//! - Heap: arena owning every composite and shared slot
//! - Node: Cell, Array, Object, Resource
//!
//! ## Identity
//!
//! A `Handle` is storage identity. Two `Value::Ref`s with the same handle
//! name the same underlying value, whatever its contents. Equal contents in
//! two different nodes are still two values.
//!
//! ## Cycles
//!
//! Arrays and objects are mutable after allocation, so an array may hold a
//! reference to itself or to any ancestor. Cells are immutable once created
//! and may only point at nodes that already exist, so a chain of cells
//! always ends.

use std::fmt;

use crate::error::{DumpError, DumpResult};
use crate::name::VarName;

/// Storage identity of a node in a `Heap`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(usize);

impl Handle {
    /// Position of the node in its heap
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{}", self.0)
    }
}

/// A value as it appears in a variable, array entry or property
///
/// Scalars are stored inline. Anything with identity lives in the heap and
/// is reached through `Ref`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Reference to a heap node
    Ref(Handle),
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Ref(_) => "Ref",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is stored inline
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Ref(_))
    }

    /// Get the handle if this is a reference
    pub fn as_handle(&self) -> Option<Handle> {
        match self {
            Value::Ref(h) => Some(*h),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for ergonomic graph construction
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Ref(h)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A heap node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Shared slot holding a value by reference
    Cell(Value),
    /// Ordered container
    Array(Array),
    /// Instance of a class
    Object(Object),
    /// Opaque handle
    Resource(Resource),
}

impl Node {
    /// Get the kind name as a string
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Cell(_) => "cell",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
            Node::Resource(_) => "resource",
        }
    }
}

/// Ordered container with integer or string keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Array {
    entries: Vec<(VarName, Value)>,
    next_index: i64,
}

impl Array {
    /// Entries in insertion order
    pub fn entries(&self) -> &[(VarName, Value)] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the array has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by key
    pub fn get(&self, key: &VarName) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn push(&mut self, value: Value) {
        let index = self.next_index;
        self.entries.push((VarName::Index(index), value));
        self.next_index = index.saturating_add(1);
    }

    fn insert(&mut self, key: VarName, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
            return;
        }
        if let VarName::Index(i) = key {
            if i >= self.next_index {
                self.next_index = i.saturating_add(1);
            }
        }
        self.entries.push((key, value));
    }
}

/// Property slot of an object
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// Slot holding a value (possibly null)
    Value(Value),
    /// Declared slot with no value yet
    Uninitialized,
}

/// Instance of a class
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    class: String,
    properties: Vec<(VarName, Property)>,
}

impl Object {
    /// Run-time class name
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &[(VarName, Property)] {
        &self.properties
    }

    /// Look up a property by name
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(k, _)| k.as_key() == Some(name))
            .map(|(_, p)| p)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties
            .iter_mut()
            .find(|(k, _)| k.as_key() == Some(name))
            .map(|(_, p)| p)
    }

    fn set(&mut self, name: String, value: Value) {
        match self.slot_mut(&name) {
            Some(slot) => *slot = Property::Value(value),
            None => self
                .properties
                .push((VarName::Key(name), Property::Value(value))),
        }
    }

    fn declare(&mut self, name: String) {
        if self.slot_mut(&name).is_none() {
            self.properties
                .push((VarName::Key(name), Property::Uninitialized));
        }
    }
}

/// Opaque handle whose internals are never rendered
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    type_name: String,
}

impl Resource {
    /// Declared type of the resource
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

// ============================================================================
// Heap
// ============================================================================

/// Arena owning every node of a value graph
///
/// Nodes are never freed while the heap lives, so a `Handle` stays valid
/// for the heap that issued it.
#[derive(Debug, Clone, Default)]
pub struct Heap {
    nodes: Vec<Node>,
}

impl Heap {
    /// Create an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the heap has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node, or None if the handle is not from this heap
    pub fn node(&self, handle: Handle) -> Option<&Node> {
        self.nodes.get(handle.0)
    }

    /// Get a node
    ///
    /// # Errors
    ///
    /// Returns `InvalidGraph` if the handle is not from this heap.
    pub fn get(&self, handle: Handle) -> DumpResult<&Node> {
        self.node(handle)
            .ok_or_else(|| DumpError::invalid_graph(format!("unknown handle {}", handle)))
    }

    fn alloc(&mut self, node: Node) -> Handle {
        let handle = Handle(self.nodes.len());
        self.nodes.push(node);
        handle
    }

    fn check(&self, value: &Value) -> DumpResult<()> {
        if let Value::Ref(h) = value {
            self.get(*h)?;
        }
        Ok(())
    }

    fn array_mut(&mut self, handle: Handle) -> DumpResult<&mut Array> {
        match self.nodes.get_mut(handle.0) {
            Some(Node::Array(a)) => Ok(a),
            Some(other) => Err(DumpError::invalid_graph(format!(
                "{} is a {}, not an array",
                handle,
                other.kind_name()
            ))),
            None => Err(DumpError::invalid_graph(format!("unknown handle {}", handle))),
        }
    }

    fn object_mut(&mut self, handle: Handle) -> DumpResult<&mut Object> {
        match self.nodes.get_mut(handle.0) {
            Some(Node::Object(o)) => Ok(o),
            Some(other) => Err(DumpError::invalid_graph(format!(
                "{} is a {}, not an object",
                handle,
                other.kind_name()
            ))),
            None => Err(DumpError::invalid_graph(format!("unknown handle {}", handle))),
        }
    }

    /// Allocate an empty array
    pub fn array(&mut self) -> Handle {
        self.alloc(Node::Array(Array::default()))
    }

    /// Allocate an array holding `items` at indices 0..n
    pub fn list<I>(&mut self, items: I) -> DumpResult<Handle>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let mut array = Array::default();
        for item in items {
            let value = item.into();
            self.check(&value)?;
            array.push(value);
        }
        Ok(self.alloc(Node::Array(array)))
    }

    /// Append at the next integer index
    ///
    /// # Errors
    ///
    /// Returns `InvalidGraph` if `array` is not an array of this heap or
    /// `value` references an unknown handle.
    pub fn push(&mut self, array: Handle, value: impl Into<Value>) -> DumpResult<()> {
        let value = value.into();
        self.check(&value)?;
        self.array_mut(array)?.push(value);
        Ok(())
    }

    /// Insert under `key`, replacing an existing entry in place
    pub fn insert(
        &mut self,
        array: Handle,
        key: impl Into<VarName>,
        value: impl Into<Value>,
    ) -> DumpResult<()> {
        let value = value.into();
        self.check(&value)?;
        self.array_mut(array)?.insert(key.into(), value);
        Ok(())
    }

    /// Allocate an object with no properties
    pub fn object(&mut self, class: impl Into<String>) -> Handle {
        self.alloc(Node::Object(Object {
            class: class.into(),
            properties: Vec::new(),
        }))
    }

    /// Set a property, initializing a declared slot in place
    pub fn set_property(
        &mut self,
        object: Handle,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> DumpResult<()> {
        let value = value.into();
        self.check(&value)?;
        self.object_mut(object)?.set(name.into(), value);
        Ok(())
    }

    /// Declare a property slot without a value
    ///
    /// Declaring a property that already exists leaves it unchanged.
    pub fn declare_property(&mut self, object: Handle, name: impl Into<String>) -> DumpResult<()> {
        self.object_mut(object)?.declare(name.into());
        Ok(())
    }

    /// Allocate an opaque resource
    pub fn resource(&mut self, type_name: impl Into<String>) -> Handle {
        self.alloc(Node::Resource(Resource {
            type_name: type_name.into(),
        }))
    }

    /// Allocate a shared slot holding `value`
    ///
    /// Every `Value::Ref` to the returned handle aliases the same slot, so a
    /// scalar stored here is dumped once and referenced afterwards.
    pub fn cell(&mut self, value: impl Into<Value>) -> DumpResult<Handle> {
        let value = value.into();
        self.check(&value)?;
        Ok(self.alloc(Node::Cell(value)))
    }

    /// Import a JSON document
    ///
    /// JSON arrays become lists, JSON objects become arrays with string
    /// keys. Integers outside `i64` become floats.
    pub fn import_json(&mut self, json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // Fallback for u64 that doesn't fit in i64
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => {
                let mut array = Array::default();
                for item in items {
                    array.push(self.import_json(item));
                }
                Value::Ref(self.alloc(Node::Array(array)))
            }
            serde_json::Value::Object(map) => {
                let mut array = Array::default();
                for (k, v) in map {
                    let value = self.import_json(v);
                    array.insert(VarName::Key(k.clone()), value);
                }
                Value::Ref(self.alloc(Node::Array(array)))
            }
        }
    }
}
