//! Tests for the standard security handler key derivation.
//!
//! The reference values come from a real RC4 128-bit encrypted file
//! (V=2, R=3, user password "baz"): its /O, /U, /P and document id.

use tinta_core::PdfError;
use tinta_core::security::{PASSWORD_PADDING, StandardSecurity, StandardSecurityRevision};

const RC4_128_P: i32 = -4;
const RC4_128_LENGTH: usize = 128;
const RC4_128_O: [u8; 32] = [
    208, 72, 209, 82, 158, 83, 93, 24, 132, 205, 56, 86, 54, 123, 24, 75, 74, 144, 223, 1, 230, 55,
    209, 110, 202, 6, 91, 175, 78, 100, 144, 11,
];
const RC4_128_U: [u8; 32] = [
    9, 52, 18, 54, 59, 157, 50, 124, 122, 197, 1, 68, 199, 199, 85, 241, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0, 0, 0, 0,
];
const RC4_128_DOCID: [u8; 16] = [
    101, 26, 148, 254, 235, 120, 104, 211, 18, 169, 123, 55, 114, 112, 134, 14,
];

fn rc4_128_security() -> StandardSecurity {
    StandardSecurity {
        user_password: b"baz".to_vec(),
        owner_hash: RC4_128_O,
        permissions: RC4_128_P,
        document_id: RC4_128_DOCID.to_vec(),
        revision: StandardSecurityRevision::R3,
        key_length: RC4_128_LENGTH,
    }
}

#[test]
fn test_validation_value_matches_real_file() {
    let security = rc4_128_security();
    let value = security.compute_user_validation_value().unwrap();
    assert_eq!(
        hex::encode(&value[..16]),
        hex::encode(&RC4_128_U[..16]),
        "first 16 bytes must match the /U entry of the reference file"
    );
}

#[test]
fn test_validation_value_tail_is_padding() {
    let value = rc4_128_security().compute_user_validation_value().unwrap();
    assert_eq!(&value[16..], &PASSWORD_PADDING[..16]);
}

#[test]
fn test_validation_value_deterministic() {
    let security = rc4_128_security();
    let first = security.compute_user_validation_value().unwrap();
    let second = security.compute_user_validation_value().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_validation_value_sensitive_to_password() {
    let mut security = rc4_128_security();
    security.user_password = b"bay".to_vec();
    let value = security.compute_user_validation_value().unwrap();
    assert_ne!(&value[..16], &RC4_128_U[..16]);
}

#[test]
fn test_validation_value_sensitive_to_document_id() {
    let mut security = rc4_128_security();
    security.document_id[0] ^= 0x01;
    let value = security.compute_user_validation_value().unwrap();
    assert_ne!(&value[..16], &RC4_128_U[..16]);
}

#[test]
fn test_validation_value_sensitive_to_permissions() {
    let mut security = rc4_128_security();
    security.permissions = -44;
    let value = security.compute_user_validation_value().unwrap();
    assert_ne!(&value[..16], &RC4_128_U[..16]);
}

#[test]
fn test_revision_2_rejected_before_any_crypto() {
    let mut security = rc4_128_security();
    security.revision = StandardSecurityRevision::R2;
    match security.compute_user_validation_value() {
        Err(PdfError::UnsupportedRevision { required, actual }) => {
            assert_eq!(required, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("expected UnsupportedRevision, got {other:?}"),
    }
}

#[test]
fn test_revision_4_accepted() {
    let mut security = rc4_128_security();
    security.revision = StandardSecurityRevision::R4;
    assert!(security.compute_user_validation_value().is_ok());
}

#[test]
fn test_encryption_key_length_follows_configuration() {
    let security = rc4_128_security();
    assert_eq!(security.compute_encryption_key().len(), 16);

    let mut short = rc4_128_security();
    short.key_length = 40;
    assert_eq!(short.compute_encryption_key().len(), 5);
}
