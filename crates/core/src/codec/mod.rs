//! Codec modules for PDF encryption primitives.
//!
//! This module contains:
//! - `arcfour`: RC4 encryption, used by the standard security handler

pub mod arcfour;

// Re-export main types for convenience
pub use arcfour::{Arcfour, arcfour_encrypt};
