//! tinta - a PDF document serialization engine.
//!
//! Writes complete PDF documents (header, body, cross-reference table or
//! stream, trailer) as well as incremental updates that append changed
//! objects after an untouched original byte stream, and implements the
//! standard security handler key-derivation math.

pub mod codec;
pub mod document;
pub mod error;
pub mod model;
pub mod output;

// Re-export codec modules for convenience
pub use codec::arcfour;

// Re-export model modules for convenience
pub use model::objects as pdftypes;

// Re-export document modules for convenience
pub use document::security;

// Re-export the main writer entry points
pub use output::context::{PDFWriteContext, WriteOption};
pub use output::document::{Document, DocumentWriter, IncrementalDocument, IncrementalWriter};
pub use output::sink::CountingWriter;
pub use output::writer::PDFWriter;
pub use output::xref::{XRefEntry, XRefRegistry};

pub use error::{PdfError, Result};
