//! Standard security handler key derivation.
//!
//! Implements the password-based key math of the standard security handler:
//! Algorithm 2 (encryption key from a password) and Algorithm 5 (the `/U`
//! user-password validation value) from PDF 32000-1:2008, chapter 7.6.3.
//! Both are pure functions of their inputs; wiring encrypted streams into
//! the writer is not part of this module.

use crate::codec::arcfour::Arcfour;
use crate::error::Result;

/// Password padding constant from the PDF spec.
pub const PASSWORD_PADDING: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Revision of the standard security handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StandardSecurityRevision {
    /// Revision 2 (40-bit RC4)
    R2,
    /// Revision 3 (variable-length RC4, up to 128-bit)
    R3,
    /// Revision 4 (crypt filters, RC4 or AES-128)
    R4,
}

impl StandardSecurityRevision {
    /// Numeric value as stored in the `/R` entry.
    pub const fn value(self) -> u8 {
        match self {
            Self::R2 => 2,
            Self::R3 => 3,
            Self::R4 => 4,
        }
    }

    /// Fail with a configuration error when this revision is below `required`.
    pub fn require_at_least(self, required: Self) -> Result<()> {
        if self < required {
            return Err(crate::PdfError::UnsupportedRevision {
                required: required.value(),
                actual: self.value(),
            });
        }
        Ok(())
    }
}

/// Descriptor for the encryption algorithm a write operation would use.
///
/// Nothing consumes this yet: encrypted output is not a supported end state
/// and the trailer writer strips `/Encrypt` unconditionally. The descriptor
/// exists so the write context can carry the selection once it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionAlgorithm {
    /// RC4 with a 40-bit key (R2)
    Arcfour40,
    /// RC4 with a key of up to 128 bits (R3/R4)
    Arcfour128,
}

/// Parameters of the standard security handler for one document.
#[derive(Debug, Clone)]
pub struct StandardSecurity {
    /// User password bytes (unpadded).
    pub user_password: Vec<u8>,
    /// The `/O` entry (owner password hash).
    pub owner_hash: [u8; 32],
    /// The `/P` permission flags.
    pub permissions: i32,
    /// First element of the document `/ID` array.
    pub document_id: Vec<u8>,
    /// Handler revision.
    pub revision: StandardSecurityRevision,
    /// Key length in bits (40-128, multiple of 8).
    pub key_length: usize,
}

impl StandardSecurity {
    /// Pad or truncate a password to exactly 32 bytes (Algorithm 2 step a).
    fn pad_password(password: &[u8]) -> [u8; 32] {
        let mut padded = [0u8; 32];
        let len = password.len().min(32);
        padded[..len].copy_from_slice(&password[..len]);
        if len < 32 {
            padded[len..].copy_from_slice(&PASSWORD_PADDING[..32 - len]);
        }
        padded
    }

    /// Key length in bytes for this revision.
    fn key_bytes(&self) -> usize {
        if self.revision >= StandardSecurityRevision::R3 {
            self.key_length / 8
        } else {
            5 // 40-bit for R2
        }
    }

    /// Compute the encryption key from the user password (Algorithm 2).
    ///
    /// This is the lower-level primitive the validation-value computation
    /// builds on.
    pub fn compute_encryption_key(&self) -> Vec<u8> {
        let padded = Self::pad_password(&self.user_password);

        let mut context = md5::Context::new();
        context.consume(padded);
        context.consume(self.owner_hash);
        context.consume(self.permissions.to_le_bytes());
        context.consume(&self.document_id);
        let mut result = context.finalize().0.to_vec();

        let n = self.key_bytes();

        // For R3+, rehash the truncated key 50 more times
        if self.revision >= StandardSecurityRevision::R3 {
            for _ in 0..50 {
                result = md5::compute(&result[..n]).0.to_vec();
            }
        }

        result.truncate(n);
        result
    }

    /// Compute the 32-byte `/U` validation value (Algorithm 5).
    ///
    /// Requires revision 3 or greater; refuses to run before any
    /// cryptographic work otherwise. The sequence is fixed: MD5 over the
    /// padding constant and the document id, RC4 of the first 16 digest
    /// bytes under the base key, then 19 further passes each keyed by the
    /// base key XORed with the pass index, and finally the first half of
    /// the padding constant appended.
    pub fn compute_user_validation_value(&self) -> Result<[u8; 32]> {
        self.revision
            .require_at_least(StandardSecurityRevision::R3)?;

        let key = self.compute_encryption_key();

        let mut context = md5::Context::new();
        context.consume(PASSWORD_PADDING);
        context.consume(&self.document_id);
        let digest = context.finalize();

        let mut encrypted = Arcfour::new(&key).process(&digest.0);
        for i in 1..20u8 {
            let pass_key: Vec<u8> = key.iter().map(|b| b ^ i).collect();
            encrypted = Arcfour::new(&pass_key).process(&encrypted);
        }

        let mut value = [0u8; 32];
        value[..16].copy_from_slice(&encrypted[..16]);
        value[16..].copy_from_slice(&PASSWORD_PADDING[..16]);
        Ok(value)
    }
}
