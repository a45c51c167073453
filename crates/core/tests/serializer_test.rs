//! Tests for the on-wire value serializer.

use tinta_core::CountingWriter;
use tinta_core::output::serializer::write_value;
use tinta_core::pdftypes::{Dict, PDFObjRef, PDFObject, PDFStream};

fn render(value: &PDFObject) -> Vec<u8> {
    let mut out = CountingWriter::new(Vec::new());
    write_value(&mut out, value).unwrap();
    out.into_inner()
}

#[test]
fn test_scalars() {
    assert_eq!(render(&PDFObject::Null), b"null");
    assert_eq!(render(&PDFObject::Bool(true)), b"true");
    assert_eq!(render(&PDFObject::Bool(false)), b"false");
    assert_eq!(render(&PDFObject::Int(-42)), b"-42");
}

#[test]
fn test_real_formatting() {
    assert_eq!(render(&PDFObject::Real(3.0)), b"3");
    assert_eq!(render(&PDFObject::Real(1.5)), b"1.5");
    assert_eq!(render(&PDFObject::Real(0.125)), b"0.125");
    assert_eq!(render(&PDFObject::Real(-0.5)), b"-0.5");
}

#[test]
fn test_non_finite_reals_render_as_zero() {
    assert_eq!(render(&PDFObject::Real(f64::NAN)), b"0");
    assert_eq!(render(&PDFObject::Real(f64::INFINITY)), b"0");
    assert_eq!(render(&PDFObject::Real(f64::NEG_INFINITY)), b"0");
}

#[test]
fn test_name_escaping() {
    assert_eq!(render(&PDFObject::name("Type")), b"/Type");
    assert_eq!(render(&PDFObject::name("A B")), b"/A#20B");
    assert_eq!(render(&PDFObject::name("a#b")), b"/a#23b");
    assert_eq!(render(&PDFObject::name("x(y)")), b"/x#28y#29");
}

#[test]
fn test_literal_string_escaping() {
    assert_eq!(render(&PDFObject::string(*b"plain")), b"(plain)");
    assert_eq!(render(&PDFObject::string(*b"a(b)c")), b"(a\\(b\\)c)");
    assert_eq!(render(&PDFObject::string(*b"back\\slash")), b"(back\\\\slash)");
    assert_eq!(render(&PDFObject::string(*b"line\nbreak")), b"(line\\nbreak)");
    assert_eq!(render(&PDFObject::string([0x01u8])), b"(\\001)");
}

#[test]
fn test_hex_string() {
    assert_eq!(
        render(&PDFObject::HexString(vec![0xDE, 0xAD, 0x01])),
        b"<DEAD01>"
    );
}

#[test]
fn test_array_and_ref() {
    let array = PDFObject::Array(vec![
        PDFObject::Int(1),
        PDFObject::name("Two"),
        PDFObject::Ref(PDFObjRef::new(3, 0)),
    ]);
    assert_eq!(render(&array), b"[1 /Two 3 0 R]");
}

#[test]
fn test_dict_preserves_insertion_order() {
    let mut dict = Dict::new();
    dict.insert("Zebra".into(), PDFObject::Int(1));
    dict.insert("Alpha".into(), PDFObject::Int(2));
    assert_eq!(render(&PDFObject::Dict(dict)), b"<</Zebra 1 /Alpha 2>>");
}

#[test]
fn test_stream_sets_length() {
    let stream = PDFStream::new(Dict::new(), b"abcde".to_vec());
    let rendered = render(&PDFObject::Stream(Box::new(stream)));
    let text = String::from_utf8_lossy(&rendered);
    assert!(text.starts_with("<</Length 5>>\nstream\n"));
    assert!(text.ends_with("abcde\nendstream"));
}
