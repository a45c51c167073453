//! Counting byte sink.
//!
//! Append-only output channel that tracks the absolute byte offset, which
//! becomes the recorded position of every written object. Line endings go
//! through [`CountingWriter::write_eol`] so the policy lives in one place.

use std::io::Write;

use crate::error::Result;

/// End-of-line byte sequence used everywhere in the produced file.
const EOL: &[u8] = b"\n";

/// A byte sink that counts how many bytes have been written.
pub struct CountingWriter<W: Write> {
    inner: W,
    offset: u64,
}

impl<W: Write> CountingWriter<W> {
    /// Wrap an output sink, starting the offset at zero.
    pub const fn new(inner: W) -> Self {
        Self { inner, offset: 0 }
    }

    /// Current absolute offset: the number of bytes written so far.
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Write raw bytes.
    pub fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write_all(buf)?;
        self.offset += buf.len() as u64;
        Ok(())
    }

    /// Write a string as its UTF-8 bytes.
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_all(s.as_bytes())
    }

    /// Write the end-of-line sequence.
    pub fn write_eol(&mut self) -> Result<()> {
        self.write_all(EOL)
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Unwrap, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
