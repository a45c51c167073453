//! Body-writing strategies.
//!
//! The document writers delegate object traversal to one of a closed set of
//! strategies: `Plain` writes every object as a top-level indirect object,
//! `ObjectStreams` packs eligible objects into `/ObjStm` containers and
//! registers compressed cross-reference entries for them. Either way every
//! live object is written exactly once.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::error::{PdfError, Result};
use crate::model::objects::{Dict, IndirectObject, PDFObject, PDFStream};
use crate::output::context::{PDFWriteContext, WriteOption};
use crate::output::serializer;
use crate::output::sink::CountingWriter;
use crate::output::writer::PDFWriter;
use crate::output::xref::XRefEntry;

/// How many objects go into one object stream before it is flushed.
const OBJECTS_PER_STREAM: usize = 100;

/// Strategy deciding how the document body is laid out.
pub enum BodyWriter {
    /// One top-level indirect object per live object.
    Plain,
    /// Pack non-stream, generation-0 objects into object streams.
    ObjectStreams(ObjectStreamState),
}

impl BodyWriter {
    /// Pick the strategy the context's options call for.
    pub fn for_context(context: &PDFWriteContext) -> Self {
        if context.has_option(WriteOption::ObjectStreams) {
            Self::ObjectStreams(ObjectStreamState::default())
        } else {
            Self::Plain
        }
    }

    /// Write every object once, in the order given. Flushes any partially
    /// filled object stream at the end.
    pub fn write<W: Write>(
        &mut self,
        writer: &mut PDFWriter<W>,
        context: &mut PDFWriteContext,
        objects: &mut [IndirectObject],
    ) -> Result<()> {
        for object in objects {
            match self {
                Self::Plain => writer.write_object(object)?,
                Self::ObjectStreams(state) => state.write_one(writer, context, object)?,
            }
        }
        if let Self::ObjectStreams(state) = self {
            state.flush(writer, context)?;
        }
        Ok(())
    }

    /// Release any buffered state. The document writers call this on every
    /// code path, including after a failed write.
    pub fn close(&mut self) {
        if let Self::ObjectStreams(state) = self {
            state.pending.clear();
        }
    }
}

/// Buffered objects waiting to be packed into the next object stream.
#[derive(Default)]
pub struct ObjectStreamState {
    pending: Vec<(u32, Vec<u8>)>,
}

impl ObjectStreamState {
    fn write_one<W: Write>(
        &mut self,
        writer: &mut PDFWriter<W>,
        context: &mut PDFWriteContext,
        object: &mut IndirectObject,
    ) -> Result<()> {
        let objid = object.objid();
        if writer.registry().contains(objid) || self.pending.iter().any(|(id, _)| *id == objid) {
            return Ok(());
        }
        // Streams and non-zero generations are not allowed inside an
        // object stream; those stay top-level.
        let packable =
            object.genno() == 0 && !matches!(object.value(), Some(PDFObject::Stream(_)));
        if !packable {
            return writer.write_object(object);
        }
        let value = object.take().ok_or(PdfError::ObjectReleased(objid))?;
        let mut buf = CountingWriter::new(Vec::new());
        serializer::write_value(&mut buf, &value)?;
        self.pending.push((objid, buf.into_inner()));
        if self.pending.len() >= OBJECTS_PER_STREAM {
            self.flush(writer, context)?;
        }
        Ok(())
    }

    /// Pack the buffered objects into one `/ObjStm` object and write it.
    fn flush<W: Write>(
        &mut self,
        writer: &mut PDFWriter<W>,
        context: &mut PDFWriteContext,
    ) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let stream_objid = context.next_object_number();

        let mut header = String::new();
        let mut bodies: Vec<u8> = Vec::new();
        for (objid, body) in &self.pending {
            header.push_str(&format!("{objid} {} ", bodies.len()));
            bodies.extend_from_slice(body);
            bodies.push(b'\n');
        }
        let first = header.len();
        let mut payload = header.into_bytes();
        payload.extend_from_slice(&bodies);

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload)?;
        let data = encoder.finish()?;

        let mut attrs = Dict::new();
        attrs.insert("Type".into(), PDFObject::name("ObjStm"));
        attrs.insert("N".into(), PDFObject::Int(self.pending.len() as i64));
        attrs.insert("First".into(), PDFObject::Int(first as i64));
        attrs.insert("Filter".into(), PDFObject::name("FlateDecode"));

        for (index, (objid, _)) in self.pending.iter().enumerate() {
            writer
                .registry_mut()
                .insert(XRefEntry::compressed(*objid, stream_objid, index as u32));
        }

        let stream = PDFStream::new(attrs, data);
        let mut container =
            IndirectObject::new(stream_objid, 0, PDFObject::Stream(Box::new(stream)));
        writer.write_object(&mut container)?;
        self.pending.clear();
        Ok(())
    }
}
