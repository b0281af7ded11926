//! Depth-first traversal of a value graph into a `VarWriter`
//!
//! ## Protocol
//!
//! One call to [`Dumper::dump`] or [`Dumper::dump_all`] is one session:
//!
//! 1. `start()`
//! 2. For each root, depth first in natural iteration order:
//!    - inline scalar: leaf event with a fresh id
//!    - heap node seen for the first time: open / children / close, or a
//!      leaf with `Occurrence::First`
//!    - heap node seen before: reference event naming its id
//! 3. `stop()`
//!
//! Because a node is entered at most once, traversal terminates on cyclic
//! graphs and its depth is bounded by first-visit nesting.
//!
//! ## Failure
//!
//! - Contract violations abort at once; `stop()` is not called.
//! - Any other error abandons the walk. The writer gets `abort()` in place
//!   of the outstanding closes, then `stop()`, so it can finalize and flush
//!   what it has. Failures of either are logged and the original error is
//!   returned.

use tracing::{debug, info, warn};

use vardump_core::{
    Capabilities, DumpError, DumpResult, Handle, Heap, KeyType, Node, Occurrence, Property,
    Value, VarName, VarWriter,
};

use crate::identity::IdentityTable;
use crate::options::DumperOptions;

/// Counters for one completed session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpStats {
    /// Value events written (scalars, composites, references)
    pub values: usize,
    /// Composites opened
    pub composites: usize,
    /// Reference events written
    pub references: usize,
    /// Deepest first-visit nesting reached
    pub max_depth: usize,
}

/// Traversal engine over a `Heap`
///
/// The heap is only read, so several dumpers may walk it at once, each with
/// its own writer.
#[derive(Debug, Clone)]
pub struct Dumper<'h> {
    heap: &'h Heap,
    options: DumperOptions,
}

impl<'h> Dumper<'h> {
    /// Create a dumper with default options
    pub fn new(heap: &'h Heap) -> Self {
        Self::with_options(heap, DumperOptions::default())
    }

    /// Create a dumper with explicit options
    pub fn with_options(heap: &'h Heap, options: DumperOptions) -> Self {
        Dumper { heap, options }
    }

    /// Traversal options in effect
    pub fn options(&self) -> &DumperOptions {
        &self.options
    }

    /// Dump one root value as one session
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the writer or the graph.
    pub fn dump<W>(
        &self,
        writer: &mut W,
        value: &Value,
        name: Option<&VarName>,
    ) -> DumpResult<DumpStats>
    where
        W: VarWriter + ?Sized,
    {
        self.run(writer, std::iter::once((name, value)))
    }

    /// Dump several named roots as one session
    ///
    /// Ids stay unique across roots; a node shared between roots is written
    /// in full once and referenced afterwards.
    pub fn dump_all<W>(&self, writer: &mut W, vars: &[(VarName, Value)]) -> DumpResult<DumpStats>
    where
        W: VarWriter + ?Sized,
    {
        self.run(writer, vars.iter().map(|(name, value)| (Some(name), value)))
    }

    fn run<'a, W, I>(&self, writer: &mut W, roots: I) -> DumpResult<DumpStats>
    where
        W: VarWriter + ?Sized,
        I: IntoIterator<Item = (Option<&'a VarName>, &'a Value)>,
    {
        self.options.validate()?;
        let mut session = Session::new(self.heap, &self.options, writer.capabilities());
        debug!(target: "vardump::session", nodes = self.heap.len(), "Dump session started");

        writer.start()?;
        match session.walk(writer, roots) {
            Ok(()) => writer.stop()?,
            Err(e) if e.is_contract_violation() => return Err(e),
            Err(e) => {
                debug!(target: "vardump::session", error = %e, "Dump abandoned");
                if let Err(abort_err) = writer.abort() {
                    warn!(target: "vardump::session", error = %abort_err, "abort() failed after failed dump");
                }
                if let Err(stop_err) = writer.stop() {
                    warn!(target: "vardump::session", error = %stop_err, "stop() failed after aborted dump");
                }
                return Err(e);
            }
        }

        let stats = session.stats;
        info!(
            target: "vardump::session",
            values = stats.values,
            composites = stats.composites,
            references = stats.references,
            max_depth = stats.max_depth,
            "Dump session complete"
        );
        Ok(stats)
    }
}

struct Session<'h, 'o> {
    heap: &'h Heap,
    options: &'o DumperOptions,
    capabilities: Capabilities,
    table: IdentityTable,
    stats: DumpStats,
}

impl<'h, 'o> Session<'h, 'o> {
    fn new(heap: &'h Heap, options: &'o DumperOptions, capabilities: Capabilities) -> Self {
        Session {
            heap,
            options,
            capabilities,
            table: IdentityTable::new(),
            stats: DumpStats::default(),
        }
    }

    fn walk<'a, W, I>(&mut self, writer: &mut W, roots: I) -> DumpResult<()>
    where
        W: VarWriter + ?Sized,
        I: IntoIterator<Item = (Option<&'a VarName>, &'a Value)>,
    {
        for (name, value) in roots {
            self.visit(writer, value, name, None, 0)?;
        }
        Ok(())
    }

    fn key_type(&self, key: &VarName) -> Option<KeyType> {
        if self.capabilities.key_type {
            Some(key.natural_key_type())
        } else {
            None
        }
    }

    fn enter(&mut self, depth: usize) -> DumpResult<()> {
        let level = depth + 1;
        if level > self.options.max_depth {
            return Err(DumpError::NestingTooDeep {
                depth: level,
                max: self.options.max_depth,
            });
        }
        self.stats.values += 1;
        self.stats.composites += 1;
        self.stats.max_depth = self.stats.max_depth.max(level);
        Ok(())
    }

    fn reference(&mut self) {
        self.stats.values += 1;
        self.stats.references += 1;
    }

    fn visit<W>(
        &mut self,
        writer: &mut W,
        value: &Value,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        depth: usize,
    ) -> DumpResult<()>
    where
        W: VarWriter + ?Sized,
    {
        match value {
            Value::Ref(handle) => self.visit_node(writer, *handle, name, key_type, depth),
            scalar => {
                let occurrence = Occurrence::First(self.table.fresh());
                self.write_scalar(writer, occurrence, scalar, name, key_type)
            }
        }
    }

    fn write_scalar<W>(
        &mut self,
        writer: &mut W,
        occurrence: Occurrence,
        value: &Value,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()>
    where
        W: VarWriter + ?Sized,
    {
        if occurrence.is_first() {
            self.stats.values += 1;
        } else {
            self.reference();
        }
        match value {
            Value::Null => writer.write_null(occurrence, name, key_type),
            Value::Bool(b) => writer.write_bool(occurrence, *b, name, key_type),
            Value::Int(i) => writer.write_int(occurrence, *i, name, key_type),
            Value::Float(f) => writer.write_float(occurrence, *f, name, key_type),
            Value::String(s) => writer.write_string(occurrence, s, name, key_type),
            Value::Ref(h) => Err(DumpError::invalid_graph(format!(
                "{} reached the scalar path",
                h
            ))),
        }
    }

    fn visit_node<W>(
        &mut self,
        writer: &mut W,
        handle: Handle,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        depth: usize,
    ) -> DumpResult<()>
    where
        W: VarWriter + ?Sized,
    {
        let heap = self.heap;
        let mut handle = handle;
        let mut node = heap.get(handle)?;
        // An alias of a composite takes the composite's identity. Cells only
        // point at older handles, so the chain ends.
        while let Node::Cell(Value::Ref(target)) = node {
            handle = *target;
            node = heap.get(handle)?;
        }
        match node {
            Node::Cell(scalar) => {
                let occurrence = self.table.occurrence(handle);
                self.write_scalar(writer, occurrence, scalar, name, key_type)
            }
            Node::Array(array) => match self.table.occurrence(handle) {
                Occurrence::Repeat(reference) => {
                    self.reference();
                    writer.write_array_reference(reference, name, key_type)
                }
                Occurrence::First(id) => {
                    self.enter(depth)?;
                    writer.write_array_open(id, name, key_type)?;
                    for (key, item) in array.entries() {
                        let item_key_type = self.key_type(key);
                        self.visit(writer, item, Some(key), item_key_type, depth + 1)?;
                    }
                    writer.write_array_close(id, name)
                }
            },
            Node::Object(object) => match self.table.occurrence(handle) {
                Occurrence::Repeat(reference) => {
                    self.reference();
                    writer.write_object_reference(reference, name, key_type, object.class())
                }
                Occurrence::First(id) => {
                    self.enter(depth)?;
                    writer.write_object_open(id, name, key_type, object.class())?;
                    for (property, slot) in object.properties() {
                        match slot {
                            Property::Value(item) => {
                                self.visit(writer, item, Some(property), None, depth + 1)?
                            }
                            Property::Uninitialized => self.uninitialized(writer, property)?,
                        }
                    }
                    writer.write_object_close(id, name, object.class())
                }
            },
            Node::Resource(resource) => {
                let resource_type = resource.type_name();
                match self.table.occurrence(handle) {
                    Occurrence::First(id) => {
                        self.stats.values += 1;
                        writer.write_resource(Occurrence::First(id), name, resource_type, key_type)
                    }
                    Occurrence::Repeat(reference) => {
                        self.reference();
                        if self.capabilities.resource_reference {
                            writer.write_resource_reference(reference, name, resource_type, key_type)
                        } else {
                            writer.write_resource(
                                Occurrence::Repeat(reference),
                                name,
                                resource_type,
                                key_type,
                            )
                        }
                    }
                }
            }
        }
    }

    fn uninitialized<W>(&mut self, writer: &mut W, property: &VarName) -> DumpResult<()>
    where
        W: VarWriter + ?Sized,
    {
        if self.capabilities.uninitialized {
            return writer.write_uninitialized(property);
        }
        debug!(
            target: "vardump::session",
            property = %property,
            "Skipping uninitialized property, writer does not support it"
        );
        Ok(())
    }
}
