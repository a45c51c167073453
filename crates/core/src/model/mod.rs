//! PDF model types for the writer side.
//!
//! This module contains:
//! - `objects` - PDF object types (PDFObject, PDFStream, PDFObjRef) and the
//!   indirect object handle consumed by the writer

pub mod objects;

// Re-export main types for convenience
pub use objects::{Dict, IndirectObject, PDFObjRef, PDFObject, PDFStream};
