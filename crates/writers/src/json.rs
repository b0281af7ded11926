//! JSON writer
//!
//! Builds a `serde_json::Value` tree while the session runs and writes it
//! on `stop()`. The document is an array with one node per root:
//!
//! ```json
//! [
//!   {
//!     "kind": "array",
//!     "id": 1,
//!     "children": [
//!       { "kind": "int", "id": 2, "name": 0, "key_type": "int", "value": 10 },
//!       { "kind": "array", "ref": 1, "name": 1, "key_type": "int" }
//!     ]
//!   }
//! ]
//! ```
//!
//! Non-finite floats have no JSON number form and are written as strings.
//! Strings cut by `max_string_length` carry `"truncated": true` and their
//! full byte `"length"`. After an aborted walk the open composites are
//! closed with `"incomplete": true`.

use std::io::Write;

use serde_json::{Map, Number, Value as Json};

use vardump_core::{
    Capabilities, CompositeKind, ContractTracker, ContractViolation, DumpId, DumpResult, KeyType,
    Occurrence, VarName, VarWriter,
};

use crate::format::WriterOptions;

fn name_json(name: &VarName) -> Json {
    match name {
        VarName::Index(i) => Json::from(*i),
        VarName::Key(k) => Json::from(k.as_str()),
    }
}

fn float_json(value: f64) -> Json {
    Number::from_f64(value)
        .map(Json::Number)
        .unwrap_or_else(|| Json::String(value.to_string()))
}

fn node(kind: &str, name: Option<&VarName>, key_type: Option<KeyType>) -> Map<String, Json> {
    let mut map = Map::new();
    map.insert("kind".to_string(), Json::from(kind));
    if let Some(name) = name {
        map.insert("name".to_string(), name_json(name));
    }
    if let Some(key_type) = key_type {
        map.insert("key_type".to_string(), Json::from(key_type.as_str()));
    }
    map
}

fn mark(map: &mut Map<String, Json>, occurrence: Occurrence) {
    match occurrence {
        Occurrence::First(id) => map.insert("id".to_string(), Json::from(id.as_u64())),
        Occurrence::Repeat(r) => map.insert("ref".to_string(), Json::from(r.as_u64())),
    };
}

/// JSON `VarWriter`
#[derive(Debug)]
pub struct JsonWriter<W: Write> {
    out: W,
    pretty: bool,
    options: WriterOptions,
    tracker: ContractTracker,
    roots: Vec<Json>,
    stack: Vec<(Map<String, Json>, Vec<Json>)>,
}

impl<W: Write> JsonWriter<W> {
    /// Create a writer producing indented JSON
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    /// Create a writer producing indented JSON with explicit options
    ///
    /// Only `max_string_length` applies; indentation is serde_json's.
    pub fn with_options(out: W, options: WriterOptions) -> Self {
        JsonWriter {
            out,
            pretty: true,
            options,
            tracker: ContractTracker::new(),
            roots: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Create a writer producing single-line JSON
    pub fn compact(out: W) -> Self {
        JsonWriter {
            pretty: false,
            ..Self::new(out)
        }
    }

    /// Take the sink back
    pub fn into_inner(self) -> W {
        self.out
    }

    fn push(&mut self, map: Map<String, Json>) {
        let node = Json::Object(map);
        match self.stack.last_mut() {
            Some((_, children)) => children.push(node),
            None => self.roots.push(node),
        }
    }

    fn open(&mut self, kind: CompositeKind, id: DumpId, map: Map<String, Json>) -> DumpResult<()> {
        self.tracker.open(kind, id)?;
        self.stack.push((map, Vec::new()));
        Ok(())
    }

    fn close(&mut self, kind: CompositeKind, id: DumpId) -> DumpResult<()> {
        self.tracker.close(kind, id)?;
        let (mut map, children) = self
            .stack
            .pop()
            .ok_or(ContractViolation::UnbalancedClose { kind, id })?;
        map.insert("children".to_string(), Json::Array(children));
        self.push(map);
        Ok(())
    }

    fn scalar(
        &mut self,
        kind: &str,
        occurrence: Occurrence,
        value: Option<Json>,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.tracker.leaf(occurrence)?;
        let mut map = node(kind, name, key_type);
        mark(&mut map, occurrence);
        if let (Some(value), true) = (value, occurrence.is_first()) {
            map.insert("value".to_string(), value);
        }
        self.push(map);
        Ok(())
    }
}

impl<W: Write> VarWriter for JsonWriter<W> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }

    fn start(&mut self) -> DumpResult<()> {
        self.tracker.start()?;
        Ok(())
    }

    fn stop(&mut self) -> DumpResult<()> {
        self.tracker.stop()?;
        let document = Json::Array(std::mem::take(&mut self.roots));
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, &document)?;
        } else {
            serde_json::to_writer(&mut self.out, &document)?;
        }
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }

    fn write_array_open(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let mut map = node("array", name, key_type);
        mark(&mut map, Occurrence::First(id));
        self.open(CompositeKind::Array, id, map)
    }

    fn write_array_close(&mut self, id: DumpId, _name: Option<&VarName>) -> DumpResult<()> {
        self.close(CompositeKind::Array, id)
    }

    fn write_array_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.tracker.reference(reference)?;
        let mut map = node("array", name, key_type);
        mark(&mut map, Occurrence::Repeat(reference));
        self.push(map);
        Ok(())
    }

    fn write_object_open(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()> {
        let mut map = node("object", name, key_type);
        mark(&mut map, Occurrence::First(id));
        map.insert("class".to_string(), Json::from(class));
        self.open(CompositeKind::Object, id, map)
    }

    fn write_object_close(
        &mut self,
        id: DumpId,
        _name: Option<&VarName>,
        _class: &str,
    ) -> DumpResult<()> {
        self.close(CompositeKind::Object, id)
    }

    fn write_object_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()> {
        self.tracker.reference(reference)?;
        let mut map = node("object", name, key_type);
        mark(&mut map, Occurrence::Repeat(reference));
        map.insert("class".to_string(), Json::from(class));
        self.push(map);
        Ok(())
    }

    fn write_bool(
        &mut self,
        occurrence: Occurrence,
        value: bool,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar("bool", occurrence, Some(Json::Bool(value)), name, key_type)
    }

    fn write_int(
        &mut self,
        occurrence: Occurrence,
        value: i64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar("int", occurrence, Some(Json::from(value)), name, key_type)
    }

    fn write_float(
        &mut self,
        occurrence: Occurrence,
        value: f64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar("float", occurrence, Some(float_json(value)), name, key_type)
    }

    fn write_string(
        &mut self,
        occurrence: Occurrence,
        value: &str,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.tracker.leaf(occurrence)?;
        let mut map = node("string", name, key_type);
        mark(&mut map, occurrence);
        if occurrence.is_first() {
            let (shown, cut) = self.options.truncate(value);
            map.insert("value".to_string(), Json::from(shown));
            if cut {
                map.insert("length".to_string(), Json::from(value.len()));
                map.insert("truncated".to_string(), Json::Bool(true));
            }
        }
        self.push(map);
        Ok(())
    }

    fn write_null(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar("null", occurrence, None, name, key_type)
    }

    fn write_resource(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        resource_type: &str,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.tracker.leaf(occurrence)?;
        let mut map = node("resource", name, key_type);
        mark(&mut map, occurrence);
        map.insert("type".to_string(), Json::from(resource_type));
        self.push(map);
        Ok(())
    }

    fn write_resource_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        resource_type: &str,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.write_resource(Occurrence::Repeat(reference), name, resource_type, key_type)
    }

    fn write_uninitialized(&mut self, name: &VarName) -> DumpResult<()> {
        self.tracker.anonymous()?;
        self.push(node("uninitialized", Some(name), None));
        Ok(())
    }

    fn abort(&mut self) -> DumpResult<()> {
        self.tracker.abort()?;
        while let Some((mut map, children)) = self.stack.pop() {
            map.insert("children".to_string(), Json::Array(children));
            map.insert("incomplete".to_string(), Json::Bool(true));
            self.push(map);
        }
        Ok(())
    }
}
