//! Value serialization visitor.
//!
//! Renders one [`PDFObject`] to its exact on-wire textual or binary form.
//! The writer calls this once per object body, once for the trailer
//! dictionary and once for the xref stream object.

use std::io::Write;

use crate::error::Result;
use crate::model::objects::{Dict, PDFObjRef, PDFObject, PDFStream};
use crate::output::sink::CountingWriter;

/// Write the on-wire form of `value` to the sink.
pub fn write_value<W: Write>(out: &mut CountingWriter<W>, value: &PDFObject) -> Result<()> {
    match value {
        PDFObject::Null => out.write_str("null"),
        PDFObject::Bool(true) => out.write_str("true"),
        PDFObject::Bool(false) => out.write_str("false"),
        PDFObject::Int(n) => out.write_str(&n.to_string()),
        PDFObject::Real(r) => out.write_str(&format_real(*r)),
        PDFObject::Name(name) => write_name(out, name),
        PDFObject::String(bytes) => write_literal_string(out, bytes),
        PDFObject::HexString(bytes) => write_hex_string(out, bytes),
        PDFObject::Array(items) => write_array(out, items),
        PDFObject::Dict(dict) => write_dict(out, dict),
        PDFObject::Stream(stream) => write_stream(out, stream),
        PDFObject::Ref(r) => write_ref(out, r),
    }
}

/// Format a real number: fixed notation, trailing zeros trimmed.
/// NaN and infinities have no PDF token form and render as zero.
fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".into();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let mut s = format!("{value:.6}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

/// Bytes a name can carry unescaped: printable ASCII minus delimiters and `#`.
const fn is_regular_name_byte(b: u8) -> bool {
    matches!(b, b'!'..=b'~')
        && !matches!(
            b,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#'
        )
}

fn write_name<W: Write>(out: &mut CountingWriter<W>, name: &str) -> Result<()> {
    out.write_all(b"/")?;
    for &b in name.as_bytes() {
        if is_regular_name_byte(b) {
            out.write_all(&[b])?;
        } else {
            out.write_str(&format!("#{b:02X}"))?;
        }
    }
    Ok(())
}

fn write_literal_string<W: Write>(out: &mut CountingWriter<W>, bytes: &[u8]) -> Result<()> {
    out.write_all(b"(")?;
    for &b in bytes {
        match b {
            b'(' => out.write_all(b"\\(")?,
            b')' => out.write_all(b"\\)")?,
            b'\\' => out.write_all(b"\\\\")?,
            b'\n' => out.write_all(b"\\n")?,
            b'\r' => out.write_all(b"\\r")?,
            b'\t' => out.write_all(b"\\t")?,
            0x08 => out.write_all(b"\\b")?,
            0x0C => out.write_all(b"\\f")?,
            0x20..=0x7E => out.write_all(&[b])?,
            _ => out.write_str(&format!("\\{b:03o}"))?,
        }
    }
    out.write_all(b")")
}

fn write_hex_string<W: Write>(out: &mut CountingWriter<W>, bytes: &[u8]) -> Result<()> {
    out.write_all(b"<")?;
    for &b in bytes {
        out.write_str(&format!("{b:02X}"))?;
    }
    out.write_all(b">")
}

fn write_array<W: Write>(out: &mut CountingWriter<W>, items: &[PDFObject]) -> Result<()> {
    out.write_all(b"[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        write_value(out, item)?;
    }
    out.write_all(b"]")
}

pub(crate) fn write_dict<W: Write>(out: &mut CountingWriter<W>, dict: &Dict) -> Result<()> {
    out.write_all(b"<<")?;
    for (i, (key, value)) in dict.iter().enumerate() {
        if i > 0 {
            out.write_all(b" ")?;
        }
        write_name(out, key)?;
        out.write_all(b" ")?;
        write_value(out, value)?;
    }
    out.write_all(b">>")
}

fn write_stream<W: Write>(out: &mut CountingWriter<W>, stream: &PDFStream) -> Result<()> {
    write_dict(out, &stream.attrs)?;
    out.write_eol()?;
    out.write_str("stream")?;
    out.write_eol()?;
    out.write_all(stream.data())?;
    out.write_eol()?;
    out.write_str("endstream")
}

fn write_ref<W: Write>(out: &mut CountingWriter<W>, r: &PDFObjRef) -> Result<()> {
    out.write_str(&format!("{} {} R", r.objid, r.genno))
}
