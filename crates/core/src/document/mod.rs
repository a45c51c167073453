//! Document-level concerns that sit next to the writer.
//!
//! This module contains:
//! - `security` - standard security handler key derivation (Algorithms 2 and 5)

pub mod security;

// Re-export main types for convenience
pub use security::{
    EncryptionAlgorithm, PASSWORD_PADDING, StandardSecurity, StandardSecurityRevision,
};
