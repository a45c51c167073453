//! Low-level part writer.
//!
//! Writes the individual pieces of a PDF file (header, indirect objects,
//! cross-reference table or stream, trailer) to the counting sink, keeping
//! the registry of everything written so far. Object numbers are cached to
//! avoid writing the same object multiple times.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use tracing::{debug, trace, warn};

use crate::error::{PdfError, Result};
use crate::model::objects::{Dict, IndirectObject, PDFObject, PDFStream};
use crate::output::context::PDFWriteContext;
use crate::output::serializer;
use crate::output::sink::CountingWriter;
use crate::output::xref::{XRefEntry, XRefRegistry};

/// Signature every PDF file starts with.
const PDF_HEADER: &str = "%PDF-";

/// Four bytes outside the ASCII range, written in a comment right after the
/// header so transfer tools treat the file as binary.
const BINARY_MARKER: [u8; 4] = [0xA7, 0xE3, 0xF1, 0xF1];

/// Trailer keys the writer either computes itself or does not support;
/// they are stripped before the trailer (or xref stream dictionary) is
/// serialized. `/Encrypt` is stripped because encrypted output is not a
/// supported end state.
const STRIPPED_TRAILER_KEYS: [&str; 8] = [
    "Prev",
    "XRefStm",
    "DocChecksum",
    "DecodeParms",
    "FDecodeParms",
    "FFilter",
    "F",
    "Encrypt",
];

/// Keys the xref stream dictionary owns outright; trailer values for these
/// are never carried over.
const XREF_STREAM_KEYS: [&str; 6] = ["Type", "Size", "W", "Index", "Filter", "Length"];

/// Component writing parts of a PDF document through a [`CountingWriter`].
pub struct PDFWriter<W: Write> {
    sink: CountingWriter<W>,
    registry: XRefRegistry,
}

impl<W: Write> PDFWriter<W> {
    /// Create a writer over the given sink.
    pub fn new(sink: CountingWriter<W>) -> Self {
        Self {
            sink,
            registry: XRefRegistry::new(),
        }
    }

    /// The underlying counting sink.
    pub fn sink(&mut self) -> &mut CountingWriter<W> {
        &mut self.sink
    }

    /// Registry of entries written so far.
    pub fn registry(&self) -> &XRefRegistry {
        &self.registry
    }

    /// Mutable registry access, for callers that register entries outside
    /// the plain object path (object stream members, table round-trips).
    pub fn registry_mut(&mut self) -> &mut XRefRegistry {
        &mut self.registry
    }

    /// Write the file header: signature, version and binary marker comment.
    pub fn write_header(&mut self, version: &str) -> Result<()> {
        debug!(version, "writing header");
        self.sink.write_str(PDF_HEADER)?;
        self.sink.write_str(version)?;
        self.sink.write_eol()?;
        self.sink.write_all(b"%")?;
        self.sink.write_all(&BINARY_MARKER)?;
        self.sink.write_eol()
    }

    /// Write the given indirect object, recording its offset and releasing
    /// its payload once written. A repeated call for an already-registered
    /// object number is a no-op.
    pub fn write_object(&mut self, object: &mut IndirectObject) -> Result<()> {
        if self.registry.contains(object.objid()) {
            return Ok(());
        }
        self.write_object_raw(object)
    }

    /// Write without the registry check; used by [`Self::write_object`] and
    /// the xref stream path, whose self-referencing entry is registered up
    /// front.
    fn write_object_raw(&mut self, object: &mut IndirectObject) -> Result<()> {
        let value = object
            .take()
            .ok_or(PdfError::ObjectReleased(object.objid()))?;
        let offset = self.sink.offset();
        self.sink
            .write_str(&format!("{} {} obj", object.objid(), object.genno()))?;
        self.sink.write_eol()?;
        serializer::write_value(&mut self.sink, &value)?;
        self.sink.write_eol()?;
        self.sink.write_str("endobj")?;
        self.sink.write_eol()?;
        self.registry
            .insert(XRefEntry::in_use(object.objid(), object.genno(), offset));
        trace!(objid = object.objid(), offset, "written object");
        Ok(())
    }

    /// Write the classic cross-reference table as one contiguous subsection
    /// from object 0 to the highest registered number, filling gaps with
    /// free entries.
    ///
    /// Returns the startxref value.
    pub fn write_xref_table(&mut self) -> Result<u64> {
        let startxref = self.sink.offset();
        debug!(startxref, "writing xref table");
        if let Some(previous) = self.registry.insert_replacing(XRefEntry::default_free()) {
            if previous != XRefEntry::default_free() {
                warn!("reserved object number 0 has been overwritten with the expected free entry");
            }
        }
        let highest = self.registry.highest().unwrap_or(0);
        self.sink.write_str("xref")?;
        self.sink.write_eol()?;
        self.sink.write_str(&format!("0 {}", highest + 1))?;
        self.sink.write_eol()?;
        for objid in 0..=highest {
            let record = match self.registry.get(objid) {
                Some(entry @ XRefEntry::Compressed { .. }) => {
                    warn!(objid, "compressed entry rendered as free in classic table");
                    entry.to_table_record()
                }
                Some(entry) => entry.to_table_record(),
                None => XRefEntry::gap_free(objid).to_table_record(),
            };
            self.sink.write_str(&record)?;
        }
        Ok(startxref)
    }

    /// Write a cross-reference table holding only the registered entries,
    /// grouped into contiguous-run subsections. Used by incremental
    /// updates, where untouched objects stay in the previous table.
    pub fn write_incremental_xref_table(&mut self) -> Result<u64> {
        let startxref = self.sink.offset();
        debug!(startxref, "writing incremental xref table");
        self.sink.write_str("xref")?;
        self.sink.write_eol()?;
        for (start, entries) in self.registry.contiguous_runs() {
            self.sink.write_str(&format!("{start} {}", entries.len()))?;
            self.sink.write_eol()?;
            for entry in entries {
                self.sink.write_str(&entry.to_table_record())?;
            }
        }
        Ok(startxref)
    }

    /// Write the trailer dictionary followed by `startxref` and the
    /// end-of-file marker. Strips writer-computed and unsupported keys,
    /// sets `Size`, and chains to `prev` when given.
    pub fn write_trailer(
        &mut self,
        trailer: &mut Dict,
        startxref: u64,
        prev: Option<u64>,
    ) -> Result<()> {
        trace!("writing trailer");
        for key in STRIPPED_TRAILER_KEYS {
            trailer.shift_remove(key);
        }
        let size = self.registry.highest().map_or(1, |h| u64::from(h) + 1);
        trailer.insert("Size".into(), PDFObject::Int(size as i64));
        if let Some(prev) = prev {
            trailer.insert("Prev".into(), PDFObject::Int(prev as i64));
        }
        self.sink.write_str("trailer")?;
        self.sink.write_eol()?;
        serializer::write_dict(&mut self.sink, trailer)?;
        self.sink.write_eol()?;
        self.write_startxref(startxref)
    }

    /// Write the cross-reference data as a stream object: a new object
    /// number is allocated from the context, a self-referencing in-use
    /// entry is registered at the current offset, and the whole registry is
    /// packed into binary rows inside a FlateDecode stream whose dictionary
    /// doubles as the trailer.
    pub fn write_xref_stream(
        &mut self,
        trailer: &Dict,
        prev: Option<u64>,
        context: &mut PDFWriteContext,
    ) -> Result<()> {
        let startxref = self.sink.offset();
        debug!(startxref, "writing xref stream");
        let objid = context.next_object_number();
        self.registry.insert(XRefEntry::in_use(objid, 0, startxref));

        let widths = self.registry.stream_row_widths();
        let rows = self.registry.pack_stream_rows(widths);
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&rows)?;
        let data = encoder.finish()?;

        let mut index = Vec::new();
        for (start, entries) in self.registry.contiguous_runs() {
            index.push(PDFObject::Int(i64::from(start)));
            index.push(PDFObject::Int(entries.len() as i64));
        }

        let size = self.registry.highest().map_or(1, |h| u64::from(h) + 1);
        let mut attrs = Dict::new();
        attrs.insert("Type".into(), PDFObject::name("XRef"));
        attrs.insert("Size".into(), PDFObject::Int(size as i64));
        attrs.insert(
            "W".into(),
            PDFObject::Array(widths.iter().map(|&w| PDFObject::Int(w as i64)).collect()),
        );
        attrs.insert("Index".into(), PDFObject::Array(index));
        attrs.insert("Filter".into(), PDFObject::name("FlateDecode"));
        if let Some(prev) = prev {
            attrs.insert("Prev".into(), PDFObject::Int(prev as i64));
        }
        for (key, value) in trailer {
            if !STRIPPED_TRAILER_KEYS.contains(&key.as_str())
                && !XREF_STREAM_KEYS.contains(&key.as_str())
                && !attrs.contains_key(key)
            {
                attrs.insert(key.clone(), value.clone());
            }
        }

        let stream = PDFStream::new(attrs, data);
        let mut object = IndirectObject::new(objid, 0, PDFObject::Stream(Box::new(stream)));
        self.write_object_raw(&mut object)?;
        self.write_startxref(startxref)
    }

    /// Write `startxref`, the offset and the end-of-file marker.
    fn write_startxref(&mut self, startxref: u64) -> Result<()> {
        self.sink.write_str("startxref")?;
        self.sink.write_eol()?;
        self.sink.write_str(&startxref.to_string())?;
        self.sink.write_eol()?;
        self.sink.write_str("%%EOF")?;
        self.sink.write_eol()
    }

    /// Clear the registry and flush the sink. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        self.registry.clear();
        self.sink.flush()
    }

    /// Unwrap, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }
}
