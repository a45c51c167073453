//! Per-write-operation state.
//!
//! One context is created for every write call: it carries the enabled
//! options, the highest object number already allocated in the target
//! document (the allocator for any new numbers the writer needs, such as
//! the xref stream's own object) and the encryption algorithm slot.

use crate::document::security::EncryptionAlgorithm;

/// Options that change how a document is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOption {
    /// Write the cross-reference data as a stream object instead of the
    /// classic text table. Requires PDF 1.5.
    XrefStream,
    /// Pack non-stream objects into object streams. Implies a cross
    /// reference stream. Requires PDF 1.5.
    ObjectStreams,
}

/// State scoped to a single write operation.
#[derive(Debug)]
pub struct PDFWriteContext {
    highest_objid: u32,
    options: Vec<WriteOption>,
    encryption: Option<EncryptionAlgorithm>,
}

impl PDFWriteContext {
    /// Create a context for a document whose highest allocated object
    /// number is `highest_objid`.
    pub fn new(highest_objid: u32, options: &[WriteOption]) -> Self {
        Self {
            highest_objid,
            options: options.to_vec(),
            encryption: None,
        }
    }

    /// Whether `option` was requested for this write.
    pub fn has_option(&self, option: WriteOption) -> bool {
        self.options.contains(&option)
    }

    /// Whether this write must produce a cross-reference stream.
    pub fn needs_xref_stream(&self) -> bool {
        self.has_option(WriteOption::XrefStream) || self.has_option(WriteOption::ObjectStreams)
    }

    /// Highest object number allocated so far.
    pub const fn highest_object_number(&self) -> u32 {
        self.highest_objid
    }

    /// Allocate the next free object number.
    pub fn next_object_number(&mut self) -> u32 {
        self.highest_objid += 1;
        self.highest_objid
    }

    /// The encryption algorithm selected for this write, if any.
    pub const fn encryption_algorithm(&self) -> Option<EncryptionAlgorithm> {
        self.encryption
    }
}
