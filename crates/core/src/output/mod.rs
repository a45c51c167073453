//! PDF output pipeline.
//!
//! This module contains:
//! - `sink` - counting byte sink with centralized line-ending policy
//! - `serializer` - renders a single object value to its on-wire form
//! - `xref` - cross-reference entries, registry, table records and stream rows
//! - `context` - per-write-operation options and object number allocation
//! - `body` - body-writing strategies (plain, object streams)
//! - `writer` - low-level part writer (header, objects, xref, trailer)
//! - `document` - full and incremental document write orchestration

pub mod body;
pub mod context;
pub mod document;
pub mod serializer;
pub mod sink;
pub mod writer;
pub mod xref;

// Re-export main types for convenience
pub use context::{PDFWriteContext, WriteOption};
pub use document::{Document, DocumentWriter, IncrementalDocument, IncrementalWriter};
pub use sink::CountingWriter;
pub use writer::PDFWriter;
pub use xref::{XRefEntry, XRefRegistry};
