//! Error types for the tinta PDF serialization library.

use thiserror::Error;

/// Primary error type for PDF write operations.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encryption error: {0}")]
    EncryptionError(String),

    #[error("unsupported security handler revision {actual}, requires at least revision {required}")]
    UnsupportedRevision { required: u8, actual: u8 },

    #[error("configuration error: {0}")]
    ConfigurationError(String),

    #[error("object {0} has already been written and released")]
    ObjectReleased(u32),
}

/// Convenience Result type alias for PdfError.
pub type Result<T> = std::result::Result<T, PdfError>;
