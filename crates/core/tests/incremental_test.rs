//! Tests for incremental updates: verbatim prefix, appended objects and the
//! chained cross-reference section.

use tinta_core::pdftypes::{Dict, IndirectObject, PDFObject};
use tinta_core::{Document, DocumentWriter, IncrementalDocument, IncrementalWriter, WriteOption};

fn dict_object(objid: u32, kind: &str) -> IndirectObject {
    let mut dict = Dict::new();
    dict.insert("Type".into(), PDFObject::name(kind));
    IndirectObject::new(objid, 0, PDFObject::Dict(dict))
}

/// Write a small two-object file and return its bytes and startxref.
fn original_document() -> (Vec<u8>, u64) {
    let mut document = Document::new("1.4");
    document.add_object(dict_object(1, "Catalog"));
    document.add_object(dict_object(2, "Pages"));
    document
        .trailer
        .insert("Root".into(), PDFObject::reference(1, 0));

    let mut writer = DocumentWriter::new(Vec::new(), &[]);
    writer.write(&mut document).unwrap();
    let out = writer.into_inner();

    let text = String::from_utf8_lossy(&out);
    let idx = text.rfind("startxref").unwrap();
    let startxref = text[idx + "startxref".len()..]
        .split_whitespace()
        .next()
        .unwrap()
        .parse()
        .unwrap();
    (out, startxref)
}

fn incremental_update(
    original: &[u8],
    prev: u64,
    updates: Vec<IndirectObject>,
    options: &[WriteOption],
) -> Vec<u8> {
    let mut document = IncrementalDocument::new(original.to_vec(), prev, 2);
    document
        .trailer
        .insert("Root".into(), PDFObject::reference(1, 0));
    for update in updates {
        document.add_update(update);
    }
    let mut writer = IncrementalWriter::new(Vec::new(), options);
    writer.write(&mut document).unwrap();
    writer.into_inner()
}

#[test]
fn test_original_bytes_preserved_verbatim() {
    let (original, prev) = original_document();
    let out = incremental_update(
        &original,
        prev,
        vec![dict_object(2, "Pages"), dict_object(3, "Metadata")],
        &[],
    );

    assert!(out.len() > original.len());
    assert_eq!(&out[..original.len()], &original[..]);
    // one separator line before the appended objects
    assert_eq!(out[original.len()], b'\n');
}

#[test]
fn test_chained_trailer_and_new_objects() {
    let (original, prev) = original_document();
    let out = incremental_update(
        &original,
        prev,
        vec![dict_object(2, "Pages"), dict_object(3, "Metadata")],
        &[],
    );
    let appended = String::from_utf8_lossy(&out[original.len()..]).into_owned();

    assert!(appended.contains("2 0 obj"));
    assert!(appended.contains("3 0 obj"));
    assert!(!appended.contains("1 0 obj"), "unchanged object rewritten");
    assert!(appended.contains(&format!("/Prev {prev}")));
    assert!(appended.contains("/Size 4"));
    // updated objects 2 and 3 form one contiguous subsection
    assert!(appended.contains("xref\n2 2\n"));
    assert!(appended.ends_with("%%EOF\n"));
}

#[test]
fn test_non_contiguous_updates_split_subsections() {
    let (original, prev) = original_document();
    let out = incremental_update(
        &original,
        prev,
        vec![dict_object(1, "Catalog"), dict_object(3, "Metadata")],
        &[],
    );
    let appended = String::from_utf8_lossy(&out[original.len()..]).into_owned();

    assert!(appended.contains("xref\n1 1\n"));
    assert!(appended.contains("\n3 1\n"));
}

#[test]
fn test_incremental_xref_stream() {
    let (original, prev) = original_document();
    let out = incremental_update(
        &original,
        prev,
        vec![dict_object(3, "Metadata")],
        &[WriteOption::XrefStream],
    );
    let appended = String::from_utf8_lossy(&out[original.len()..]).into_owned();

    assert_eq!(&out[..original.len()], &original[..]);
    assert!(appended.contains("/Type /XRef"));
    assert!(appended.contains(&format!("/Prev {prev}")));
    // no textual trailer on the stream path
    assert!(!appended.contains("trailer"));
    // update object plus the xref stream allocated above the highest number
    assert!(appended.contains("3 0 obj"));
    assert!(appended.contains("4 0 obj"));
}

#[test]
fn test_version_raised_when_streams_requested() {
    let (original, prev) = original_document();
    let mut document = IncrementalDocument::new(original, prev, 2);
    document.add_update(dict_object(3, "Metadata"));
    assert_eq!(document.version, "1.4");

    let mut writer = IncrementalWriter::new(Vec::new(), &[WriteOption::ObjectStreams]);
    writer.write(&mut document).unwrap();
    assert_eq!(document.version, "1.5");
}

#[test]
fn test_prev_offset_is_opaque() {
    // the writer chains whatever offset it is handed, valid or not
    let (original, _) = original_document();
    let out = incremental_update(&original, 999_999, vec![dict_object(3, "Metadata")], &[]);
    let appended = String::from_utf8_lossy(&out[original.len()..]).into_owned();
    assert!(appended.contains("/Prev 999999"));
}
