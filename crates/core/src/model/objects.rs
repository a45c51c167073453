//! PDF object types.
//!
//! The value model the serializer renders. Dictionaries preserve insertion
//! order so repeated writes of the same document produce identical bytes.

use bytes::Bytes;
use indexmap::IndexMap;

/// Dictionary type used throughout the writer.
pub type Dict = IndexMap<String, PDFObject>;

/// PDF Object types - the fundamental value type in PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum PDFObject {
    /// Null object
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Real (floating point) value
    Real(f64),
    /// Name object (e.g., /Type, /Font)
    Name(String),
    /// Literal string (byte array, written in parentheses)
    String(Vec<u8>),
    /// Hexadecimal string (written in angle brackets)
    HexString(Vec<u8>),
    /// Array of objects
    Array(Vec<Self>),
    /// Dictionary (name -> object mapping)
    Dict(Dict),
    /// Stream (dictionary + binary data)
    Stream(Box<PDFStream>),
    /// Indirect object reference
    Ref(PDFObjRef),
}

impl PDFObject {
    /// Check if this is a null object.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Shorthand for a name object.
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Shorthand for a literal string object.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        Self::String(bytes.into())
    }

    /// Shorthand for a reference to object `objid`, generation `genno`.
    pub const fn reference(objid: u32, genno: u16) -> Self {
        Self::Ref(PDFObjRef { objid, genno })
    }
}

/// PDF indirect object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PDFObjRef {
    /// Object number
    pub objid: u32,
    /// Generation number
    pub genno: u16,
}

impl PDFObjRef {
    /// Create a new object reference.
    pub const fn new(objid: u32, genno: u16) -> Self {
        Self { objid, genno }
    }
}

/// PDF Stream - dictionary attributes + already-encoded binary data.
///
/// The writer does not apply filters; callers hand over the payload in its
/// final encoded form and `/Length` is filled in at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct PDFStream {
    /// Stream dictionary attributes
    pub attrs: Dict,
    /// Encoded stream data
    data: Bytes,
}

impl PDFStream {
    /// Create a new stream. Sets `/Length` from the payload.
    pub fn new(mut attrs: Dict, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        attrs.insert("Length".into(), PDFObject::Int(data.len() as i64));
        Self { attrs, data }
    }

    /// Get the encoded stream data.
    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }
}

/// An indirect object pending serialization: an (object number, generation)
/// pair owning the value to write.
///
/// Writing consumes the value; afterwards the handle only serves as a lookup
/// key so large documents do not keep every payload alive. The registry
/// check in the writer guarantees a handle is never written twice.
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    objid: u32,
    genno: u16,
    value: Option<PDFObject>,
}

impl IndirectObject {
    /// Create a handle owning `value`.
    pub const fn new(objid: u32, genno: u16, value: PDFObject) -> Self {
        Self {
            objid,
            genno,
            value: Some(value),
        }
    }

    /// Object number.
    pub const fn objid(&self) -> u32 {
        self.objid
    }

    /// Generation number.
    pub const fn genno(&self) -> u16 {
        self.genno
    }

    /// Reference pointing at this object.
    pub const fn reference(&self) -> PDFObjRef {
        PDFObjRef::new(self.objid, self.genno)
    }

    /// Borrow the value, if not yet released.
    pub fn value(&self) -> Option<&PDFObject> {
        self.value.as_ref()
    }

    /// Whether the payload has been released by a write.
    pub const fn is_released(&self) -> bool {
        self.value.is_none()
    }

    /// Take ownership of the value, releasing the handle.
    pub(crate) fn take(&mut self) -> Option<PDFObject> {
        self.value.take()
    }
}
