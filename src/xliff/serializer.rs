/*!
 * XLIFF 1.2 serializer.
 *
 * Renders a `Document` as pretty-printed UTF-8 XML through quick-xml's event
 * writer. Structural elements are indented two spaces per level; `<source>`
 * and `<target>` are written on a single line so no indentation whitespace
 * leaks into their mixed content. Indentation is emitted explicitly because
 * the writer's own indenting mode breaks lines between sibling `<g>` spans.
 */

use log::error;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::{self, Write};

use super::model::{Document, FileUnit, TextContainer, TranslationUnit};
use super::{XHTML_NAMESPACE, XLIFF_NAMESPACE, XLIFF_SCHEMA_LOCATION, XSI_NAMESPACE};

const INDENT: &str = "  ";

/// Render the document as an XLIFF 1.2 string.
///
/// Missing `source-language`/`target-language` attributes fall back to
/// `target_language`; missing `original`/`datatype` render as empty strings.
pub fn to_xliff_string(document: &Document, target_language: &str) -> String {
    let mut buffer = Vec::with_capacity(1024 + document.unit_count() * 256);
    if let Err(e) = write_xliff(document, target_language, &mut buffer) {
        // Only reachable through an encoder bug: the sink is in memory
        error!("Failed to serialize XLIFF document: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Serialize the document into any writer.
pub fn write_xliff<W: Write>(document: &Document, target_language: &str, writer: W) -> io::Result<()> {
    let mut out = XliffWriter::new(writer);
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    out.newline()?;

    let root = BytesStart::new("xliff").with_attributes([
        ("xmlns", XLIFF_NAMESPACE),
        ("xmlns:xsi", XSI_NAMESPACE),
        ("xmlns:xhtml", XHTML_NAMESPACE),
        ("version", "1.2"),
        ("xsi:schemaLocation", XLIFF_SCHEMA_LOCATION),
    ]);

    if document.files.is_empty() {
        out.line(0, Event::Empty(root))?;
    } else {
        out.line(0, Event::Start(root))?;
        for file in &document.files {
            out.file(file, target_language)?;
        }
        out.line(0, Event::End(BytesEnd::new("xliff")))?;
    }

    out.finish()
}

/// Event writer plus the line layout of the output
struct XliffWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XliffWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            writer: Writer::new(inner),
        }
    }

    fn event(&mut self, event: Event<'_>) -> io::Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| io::Error::other(e.to_string()))
    }

    fn text(&mut self, text: &str) -> io::Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn indent(&mut self, depth: usize) -> io::Result<()> {
        if depth == 0 {
            return Ok(());
        }
        self.text(&INDENT.repeat(depth))
    }

    fn newline(&mut self) -> io::Result<()> {
        self.text("\n")
    }

    /// One structural tag on its own line
    fn line(&mut self, depth: usize, event: Event<'_>) -> io::Result<()> {
        self.indent(depth)?;
        self.event(event)?;
        self.newline()
    }

    fn file(&mut self, file: &FileUnit, target_language: &str) -> io::Result<()> {
        let start = BytesStart::new("file").with_attributes([
            ("original", file.original.as_deref().unwrap_or("")),
            ("datatype", file.datatype.as_deref().unwrap_or("")),
            ("source-language", file.source_language.as_deref().unwrap_or(target_language)),
            ("target-language", file.target_language.as_deref().unwrap_or(target_language)),
        ]);
        self.line(1, Event::Start(start))?;

        if file.units.is_empty() {
            self.line(2, Event::Empty(BytesStart::new("body")))?;
        } else {
            self.line(2, Event::Start(BytesStart::new("body")))?;
            for unit in &file.units {
                self.unit(unit)?;
            }
            self.line(2, Event::End(BytesEnd::new("body")))?;
        }

        self.line(1, Event::End(BytesEnd::new("file")))
    }

    fn unit(&mut self, unit: &TranslationUnit) -> io::Result<()> {
        let start = BytesStart::new("trans-unit").with_attributes([("id", unit.id.as_str())]);
        self.line(3, Event::Start(start))?;
        self.container("source", unit.source())?;
        self.container("target", unit.target())?;
        self.line(3, Event::End(BytesEnd::new("trans-unit")))
    }

    fn container(&mut self, name: &str, container: &TextContainer) -> io::Result<()> {
        let text = container.text.as_deref().filter(|text| !text.is_empty());
        if text.is_none() && container.placeholders.is_empty() {
            return self.line(4, Event::Empty(BytesStart::new(name)));
        }

        self.indent(4)?;
        self.event(Event::Start(BytesStart::new(name)))?;
        if let Some(text) = text {
            self.text(text)?;
        }
        for placeholder in &container.placeholders {
            let mut span = BytesStart::new("g");
            span.push_attribute(("id", placeholder.id.as_str()));
            if let Some(ctype) = &placeholder.ctype {
                span.push_attribute(("ctype", ctype.as_str()));
            }
            if placeholder.text.is_empty() {
                self.event(Event::Empty(span))?;
            } else {
                self.event(Event::Start(span))?;
                self.text(&placeholder.text)?;
                self.event(Event::End(BytesEnd::new("g")))?;
            }
        }
        self.event(Event::End(BytesEnd::new(name)))?;
        self.newline()
    }

    fn finish(self) -> io::Result<()> {
        self.writer.into_inner().flush()
    }
}
