//! HTML writer
//!
//! Streams a nested list inside `<div class="vardump">`. Every first
//! occurrence carries an anchor `id="<prefix><id>"`; references link back
//! to it, so shared and cyclic structure is navigable in a browser.

use std::io::Write;

use vardump_core::{
    Capabilities, CompositeKind, ContractTracker, DumpId, DumpResult, KeyType, Occurrence,
    VarName, VarWriter,
};

use crate::format::WriterOptions;
use crate::text::label;

/// Escape text for HTML element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// HTML `VarWriter`
#[derive(Debug)]
pub struct HtmlWriter<W: Write> {
    out: W,
    tracker: ContractTracker,
    options: WriterOptions,
}

impl<W: Write> HtmlWriter<W> {
    /// Create a writer with default options
    pub fn new(out: W) -> Self {
        Self::with_options(out, WriterOptions::default())
    }

    /// Create a writer with explicit options
    pub fn with_options(out: W, options: WriterOptions) -> Self {
        HtmlWriter {
            out,
            tracker: ContractTracker::new(),
            options,
        }
    }

    /// Take the sink back
    pub fn into_inner(self) -> W {
        self.out
    }

    fn anchor(&self, occurrence: Occurrence) -> String {
        let prefix = escape_html(&self.options.anchor_prefix);
        match occurrence {
            Occurrence::First(id) => {
                format!(r#"<span class="id" id="{}{}">#{}</span>"#, prefix, id, id)
            }
            Occurrence::Repeat(r) => {
                format!(r##"<a class="ref" href="#{}{}">*{}</a>"##, prefix, r, r)
            }
        }
    }

    fn line(&mut self, depth: usize, html: &str) -> DumpResult<()> {
        // Nesting inside the outer <ul> adds one level
        let pad = (depth + 1) * self.options.indent;
        writeln!(self.out, "{:pad$}{}", "", html, pad = pad)?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn item(
        &mut self,
        depth: usize,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        kind: &str,
        detail: Option<String>,
        occurrence: Occurrence,
        open: bool,
    ) -> DumpResult<()> {
        let mut html = String::from("<li>");
        if let Some(label) = label(name, key_type) {
            html.push_str(&format!(
                r#"<span class="name">{}</span> "#,
                escape_html(&label)
            ));
        }
        html.push_str(&format!(r#"<span class="type">{}</span> "#, escape_html(kind)));
        if let Some(detail) = detail {
            html.push_str(&format!(r#"<span class="value">{}</span> "#, escape_html(&detail)));
        }
        html.push_str(&self.anchor(occurrence));
        html.push_str(if open { "<ul>" } else { "</li>" });
        self.line(depth, &html)
    }

    fn scalar(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        kind: &str,
        detail: Option<String>,
    ) -> DumpResult<()> {
        self.tracker.leaf(occurrence)?;
        let detail = if occurrence.is_first() { detail } else { None };
        self.item(self.tracker.depth(), name, key_type, kind, detail, occurrence, false)
    }
}

impl<W: Write> VarWriter for HtmlWriter<W> {
    fn capabilities(&self) -> Capabilities {
        Capabilities::FULL
    }

    fn start(&mut self) -> DumpResult<()> {
        self.tracker.start()?;
        writeln!(self.out, r#"<div class="vardump"><ul>"#)?;
        Ok(())
    }

    fn stop(&mut self) -> DumpResult<()> {
        self.tracker.stop()?;
        writeln!(self.out, "</ul></div>")?;
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
        self.item(depth, name, key_type, "array", None, Occurrence::First(id), true)
    }

    fn write_array_close(&mut self, id: DumpId, _name: Option<&VarName>) -> DumpResult<()> {
        self.tracker.close(CompositeKind::Array, id)?;
        self.line(self.tracker.depth(), "</ul></li>")
    }

    fn write_array_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.tracker.reference(reference)?;
        let occurrence = Occurrence::Repeat(reference);
        self.item(self.tracker.depth(), name, key_type, "array", None, occurrence, false)
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
        let kind = format!("object({})", class);
        self.item(depth, name, key_type, &kind, None, Occurrence::First(id), true)
    }

    fn write_object_close(
        &mut self,
        id: DumpId,
        _name: Option<&VarName>,
        _class: &str,
    ) -> DumpResult<()> {
        self.tracker.close(CompositeKind::Object, id)?;
        self.line(self.tracker.depth(), "</ul></li>")
    }

    fn write_object_reference(
        &mut self,
        reference: DumpId,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
        class: &str,
    ) -> DumpResult<()> {
        self.tracker.reference(reference)?;
        let kind = format!("object({})", class);
        let occurrence = Occurrence::Repeat(reference);
        self.item(self.tracker.depth(), name, key_type, &kind, None, occurrence, false)
    }

    fn write_bool(
        &mut self,
        occurrence: Occurrence,
        value: bool,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar(occurrence, name, key_type, "bool", Some(value.to_string()))
    }

    fn write_int(
        &mut self,
        occurrence: Occurrence,
        value: i64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar(occurrence, name, key_type, "int", Some(value.to_string()))
    }

    fn write_float(
        &mut self,
        occurrence: Occurrence,
        value: f64,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar(occurrence, name, key_type, "float", Some(format!("{:?}", value)))
    }

    fn write_string(
        &mut self,
        occurrence: Occurrence,
        value: &str,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let (shown, cut) = self.options.truncate(value);
        let detail = format!("{:?}{}", shown, if cut { "..." } else { "" });
        let kind = format!("string({})", value.len());
        self.scalar(occurrence, name, key_type, &kind, Some(detail))
    }

    fn write_null(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        self.scalar(occurrence, name, key_type, "null", None)
    }

    fn write_resource(
        &mut self,
        occurrence: Occurrence,
        name: Option<&VarName>,
        resource_type: &str,
        key_type: Option<KeyType>,
    ) -> DumpResult<()> {
        let kind = format!("resource({})", resource_type);
        self.tracker.leaf(occurrence)?;
        self.item(self.tracker.depth(), name, key_type, &kind, None, occurrence, false)
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
        let html = format!(
            r#"<li><span class="name">{}</span> <span class="type">uninitialized</span></li>"#,
            escape_html(&name.to_string())
        );
        self.line(self.tracker.depth(), &html)
    }

    fn abort(&mut self) -> DumpResult<()> {
        let unwound = self.tracker.abort()?;
        if !unwound.is_empty() {
            self.line(unwound.len(), r#"<li class="incomplete">...</li>"#)?;
        }
        for depth in (0..unwound.len()).rev() {
            self.line(depth, "</ul></li>")?;
        }
        Ok(())
    }
}
