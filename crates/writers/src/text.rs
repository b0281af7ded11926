//! Indented plain-text writer
//!
//! One line per event. First occurrences end in `#<id>`, references are
//! rendered as `*<id>` instead of their content:
//!
//! ```text
//! object(Pair) #1 {
//!   left: object(Point) #2 {
//!     x: int(1) #3
//!   }
//!   right: object(Point) *2
//! }
//! ```

use std::io::Write;

use vardump_core::{
    Capabilities, CompositeKind, ContractTracker, DumpId, DumpResult, KeyType, Occurrence,
    VarName, VarWriter,
};

use crate::format::WriterOptions;

/// Label of a value: `[0]` for int keys, `["k"]` for string keys, the bare
/// name for properties and roots
pub(crate) fn label(name: Option<&VarName>, key_type: Option<KeyType>) -> Option<String> {
    let name = name?;
    let label = match (name, key_type) {
        (name, Some(KeyType::Int)) => format!("[{}]", name),
        (name, Some(KeyType::String)) => format!("[{:?}]", name.to_string()),
        (VarName::Index(i), None) => format!("[{}]", i),
        (VarName::Key(k), None) => k.clone(),
    };
    Some(label)
}

fn marker(occurrence: Occurrence) -> String {
    match occurrence {
        Occurrence::First(id) => format!("#{}", id),
        Occurrence::Repeat(reference) => format!("*{}", reference),
    }
}

/// Plain-text `VarWriter`
#[derive(Debug)]
pub struct TextWriter<W: Write> {
    out: W,
    tracker: ContractTracker,
    options: WriterOptions,
}

impl<W: Write> TextWriter<W> {
    /// Create a writer with default options
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    /// Create a writer with explicit options
    pub fn with_options(out: W, options: WriterOptions) -> Self {
        TextWriter {
            out,
            tracker: ContractTracker::new(),
            options,
        }
    }

    /// Borrow the sink
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Take the sink back
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(
        &mut self,
        depth: usize,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        body: &str,
    ) -> DumpResult<()> {
        let pad = depth * self.options.indent;
        let label = label(name, key_type)
            .map(|l| format!("{}: ", l))
            .unwrap_or_default();
        writeln!(self.out, "{:pad$}{}{}", "", label, body, pad = pad)?;
        Ok(())
    }

    fn scalar(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        kind: &str,
        shown: String,
    ) -> DumpResult<()> {
        self.tracker.leaf(occurrence)?;
        let body = match occurrence {
            Occurrence::First(_) => format!("{}{} {}", kind, shown, marker(occurrence)),
            Occurrence::Repeat(_) => format!("{} {}", kind, marker(occurrence)),
        };
        self.line(self.tracker.depth(), name, key_type, &body)
    }
}

impl<W: Write> VarWriter for TextWriter<W> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }

    fn start(&mut self) -> DumpResult<()> {
        self.tracker.start()?;
        Ok(())
    }

    fn stop(&mut self) -> DumpResult<()> {
        self.tracker.stop()?;
        self.out.flush()?;
        Ok(())
    }

    fn write_array_open(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let depth = self.tracker.depth();
        self.tracker.open(CompositeKind::Array, id)?;
        self.line(depth, name, key_type, &format!("array #{} {{", id))
    }

    fn write_array_close(&mut self, id: DumpId, _name: Option<&VarName>) -> DumpResult<()> {
        self.tracker.close(CompositeKind::Array, id)?;
        self.line(self.tracker.depth(), None, None, "}")
    }

    fn write_array_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.tracker.reference(reference)?;
        self.line(self.tracker.depth(), name, key_type, &format!("array *{}", reference))
    }

    fn write_object_open(
        &mut self,
        id: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()> {
        let depth = self.tracker.depth();
        self.tracker.open(CompositeKind::Object, id)?;
        self.line(depth, name, key_type, &format!("object({}) #{} {{", class, id))
    }

    fn write_object_close(
        &mut self,
        id: DumpId,
        _name: Option<&VarName>,
        _class: &str,
    ) -> DumpResult<()> {
        self.tracker.close(CompositeKind::Object, id)?;
        self.line(self.tracker.depth(), None, None, "}")
    }

    fn write_object_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()> {
        self.tracker.reference(reference)?;
        let body = format!("object({}) *{}", class, reference);
        self.line(self.tracker.depth(), name, key_type, &body)
    }

    fn write_bool(
        &mut self,
        occurrence: Occurrence,
        value: bool,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar(occurrence, name, key_type, "bool", format!("({})", value))
    }

    fn write_int(
        &mut self,
        occurrence: Occurrence,
        value: i64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar(occurrence, name, key_type, "int", format!("({})", value))
    }

    fn write_float(
        &mut self,
        occurrence: Occurrence,
        value: f64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar(occurrence, name, key_type, "float", format!("({:?})", value))
    }

    fn write_string(
        &mut self,
        occurrence: Occurrence,
        value: &str,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let (shown, cut) = self.options.truncate(value);
        let ellipsis = if cut { "..." } else { "" };
        let shown = format!("({}) {:?}{}", value.len(), shown, ellipsis);
        self.scalar(occurrence, name, key_type, "string", shown)
    }

    fn write_null(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar(occurrence, name, key_type, "null", String::new())
    }

    fn write_resource(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        resource_type: &str,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.tracker.leaf(occurrence)?;
        let body = format!("resource({}) {}", resource_type, marker(occurrence));
        self.line(self.tracker.depth(), name, key_type, &body)
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
        self.line(self.tracker.depth(), Some(name), None, "uninitialized")
    }

    fn abort(&mut self) -> DumpResult<()> {
        let unwound = self.tracker.abort()?;
        if !unwound.is_empty() {
            self.line(unwound.len(), None, None, "...")?;
        }
        for depth in (0..unwound.len()).rev() {
            self.line(depth, None, None, "}")?;
        }
        Ok(())
    }
}
