//! Full and incremental document write orchestration.
//!
//! [`DocumentWriter`] writes a complete file: header, body, cross-reference
//! data and trailer. [`IncrementalWriter`] appends an update to an existing
//! byte stream: the original bytes are copied through untouched, only the
//! changed objects follow, and the new cross-reference section chains back
//! to the previous one via `Prev`.

use std::io::Write;

use tracing::debug;

use crate::error::Result;
use crate::model::objects::{Dict, IndirectObject};
use crate::output::body::BodyWriter;
use crate::output::context::{PDFWriteContext, WriteOption};
use crate::output::sink::CountingWriter;
use crate::output::writer::PDFWriter;

/// The version that introduced cross-reference streams and object streams.
const V1_5: &str = "1.5";

/// Parse "major.minor" for comparison; malformed parts compare as zero.
fn version_parts(version: &str) -> (u32, u32) {
    let mut parts = version.splitn(2, '.');
    let major = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
    (major, minor)
}

/// Raise `version` to `required` when it is lower.
fn bump_version(version: &mut String, required: &str) {
    if version_parts(version) < version_parts(required) {
        debug!(from = %version, to = required, "raising document version");
        *version = required.to_string();
    }
}

/// A document to be written in full: its declared version, the live
/// indirect objects, and the trailer dictionary.
#[derive(Debug)]
pub struct Document {
    /// Declared PDF version, e.g. "1.4".
    pub version: String,
    /// Every live indirect object, in the order they should be written.
    pub objects: Vec<IndirectObject>,
    /// Trailer dictionary (Root, Info, ID...). `Size` is writer-computed.
    pub trailer: Dict,
}

impl Document {
    /// Create an empty document with the given declared version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            objects: Vec::new(),
            trailer: Dict::new(),
        }
    }

    /// Add an indirect object to the body.
    pub fn add_object(&mut self, object: IndirectObject) {
        self.objects.push(object);
    }

    /// Highest object number allocated in this document.
    pub fn highest_object_number(&self) -> u32 {
        self.objects.iter().map(IndirectObject::objid).max().unwrap_or(0)
    }

    /// Raise the declared version to at least `required`.
    pub fn require_min_version(&mut self, required: &str) {
        bump_version(&mut self.version, required);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("1.4")
    }
}

/// Writes a [`Document`] from scratch.
///
/// Linear state machine: header, body, cross-reference table or stream,
/// trailer (table path only), closed. The strategy is picked from the
/// write options; asking for cross-reference or object streams raises the
/// document version to 1.5 before any bytes are written.
pub struct DocumentWriter<W: Write> {
    writer: PDFWriter<W>,
    options: Vec<WriteOption>,
}

impl<W: Write> DocumentWriter<W> {
    /// Create a writer over `sink` with the given options.
    pub fn new(sink: W, options: &[WriteOption]) -> Self {
        Self {
            writer: PDFWriter::new(CountingWriter::new(sink)),
            options: options.to_vec(),
        }
    }

    /// Write the whole document. Object payloads are consumed; the handles
    /// remain as keys only. Any failure invalidates the entire output.
    pub fn write(&mut self, document: &mut Document) -> Result<()> {
        let mut context = PDFWriteContext::new(document.highest_object_number(), &self.options);
        if context.needs_xref_stream() {
            document.require_min_version(V1_5);
        }
        self.writer.write_header(&document.version)?;

        let mut body = BodyWriter::for_context(&context);
        let written = body.write(&mut self.writer, &mut context, &mut document.objects);
        body.close();
        written?;

        if context.needs_xref_stream() {
            self.writer
                .write_xref_stream(&document.trailer, None, &mut context)?;
        } else {
            let startxref = self.writer.write_xref_table()?;
            self.writer
                .write_trailer(&mut document.trailer, startxref, None)?;
        }
        self.close()
    }

    /// Clear the registry and flush the sink. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        self.writer.close()
    }

    /// Unwrap, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

/// A pending incremental update: the source document's bytes as given,
/// the previous cross-reference offset and trailer taken from it (opaque,
/// never recomputed here), and the new or changed objects to append.
#[derive(Debug)]
pub struct IncrementalDocument {
    /// Declared PDF version of the source document. If a write option
    /// forces a raise, the caller must carry the new value into the
    /// catalog's `/Version` entry among the updates.
    pub version: String,
    /// The original file, byte for byte up to its current end.
    pub original: Vec<u8>,
    /// startxref of the source document's last cross-reference section.
    pub prev_xref_offset: u64,
    /// Highest object number already allocated in the source document.
    pub highest_object_number: u32,
    /// Trailer dictionary of the source document.
    pub trailer: Dict,
    /// New or modified objects to append.
    pub updates: Vec<IndirectObject>,
}

impl IncrementalDocument {
    /// Create an update over `original`, whose last cross-reference section
    /// starts at `prev_xref_offset` and whose highest allocated object
    /// number is `highest_object_number`.
    pub fn new(original: Vec<u8>, prev_xref_offset: u64, highest_object_number: u32) -> Self {
        Self {
            version: "1.4".into(),
            original,
            prev_xref_offset,
            highest_object_number,
            trailer: Dict::new(),
            updates: Vec::new(),
        }
    }

    /// Add a new or modified object to the update.
    pub fn add_update(&mut self, object: IndirectObject) {
        self.updates.push(object);
    }

    /// Raise the declared version to at least `required`.
    pub fn require_min_version(&mut self, required: &str) {
        bump_version(&mut self.version, required);
    }
}

/// Appends an incremental update to an existing document.
pub struct IncrementalWriter<W: Write> {
    writer: PDFWriter<W>,
    options: Vec<WriteOption>,
}

impl<W: Write> IncrementalWriter<W> {
    /// Create a writer over `sink` with the given options.
    pub fn new(sink: W, options: &[WriteOption]) -> Self {
        Self {
            writer: PDFWriter::new(CountingWriter::new(sink)),
            options: options.to_vec(),
        }
    }

    /// Write the update: original bytes verbatim, one separator line, the
    /// changed objects, then the new cross-reference section chained to
    /// the previous one.
    pub fn write(&mut self, document: &mut IncrementalDocument) -> Result<()> {
        // updates may carry caller-assigned numbers above the source
        // document's highest; the allocator must start past both
        let highest = document
            .updates
            .iter()
            .map(IndirectObject::objid)
            .max()
            .unwrap_or(0)
            .max(document.highest_object_number);
        let mut context = PDFWriteContext::new(highest, &self.options);
        if context.needs_xref_stream() {
            document.require_min_version(V1_5);
        }

        self.writer.sink().write_all(&document.original)?;
        self.writer.sink().write_eol()?;

        let mut body = BodyWriter::for_context(&context);
        let written = body.write(&mut self.writer, &mut context, &mut document.updates);
        body.close();
        written?;

        let prev = document.prev_xref_offset;
        if context.needs_xref_stream() {
            self.writer
                .write_xref_stream(&document.trailer, Some(prev), &mut context)?;
        } else {
            let startxref = self.writer.write_incremental_xref_table()?;
            self.writer
                .write_trailer(&mut document.trailer, startxref, Some(prev))?;
        }
        self.close()
    }

    /// Clear the registry and flush the sink. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        self.writer.close()
    }

    /// Unwrap, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}
