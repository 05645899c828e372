//! Byte sink abstraction
//!
//! The codec layer never touches sockets. It reads and writes through
//! [`ByteSink`], which the transport layer implements over whatever it has
//! (a TCP stream's buffered reader, a decompressed bundle, a test buffer).
//! The sink also carries the two out-of-band agreements both ends must
//! share: byte order and text encoding.

use bytes::{Buf, BufMut, BytesMut};
use gamewire_core::Result;

/// Byte order for fixed-width numeric fields
///
/// There is no in-band negotiation; both ends must agree out of band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Text encoding for string fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 (the default; invalid sequences are a decode error)
    Utf8,
    /// ISO 8859-1, one byte per character
    Latin1,
}

/// Abstract byte source/destination for the wire codec
///
/// # Contract
/// - `read` fills as much of `dst` as it can and returns the count; `0`
///   means end of stream. Partial fills are legal, the codec loops.
/// - `write` consumes as much of `src` as it can and returns the count;
///   `0` means the sink can take no more.
/// - `endianness`/`encoding` are fixed for the sink's lifetime.
pub trait ByteSink {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize>;
    fn write(&mut self, src: &[u8]) -> Result<usize>;
    fn endianness(&self) -> Endianness;
    fn encoding(&self) -> TextEncoding;
}

/// In-memory byte sink backed by a [`BytesMut`]
///
/// Writes append at the tail, reads consume from the head. Used by tests
/// and by any caller that frames a whole packet in memory before handing
/// it to the transport.
#[derive(Debug)]
pub struct MemorySink {
    buf: BytesMut,
    endianness: Endianness,
    encoding: TextEncoding,
}

impl MemorySink {
    /// Create an empty sink with the given byte order, UTF-8 text
    #[inline]
    pub fn new(endianness: Endianness) -> Self {
        Self {
            buf: BytesMut::new(),
            endianness,
            encoding: TextEncoding::Utf8,
        }
    }

    /// Create a sink over existing bytes (for decoding)
    #[inline]
    pub fn from_bytes(buf: BytesMut, endianness: Endianness) -> Self {
        Self {
            buf,
            endianness,
            encoding: TextEncoding::Utf8,
        }
    }

    /// Override the text encoding
    #[inline]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Bytes written so far and not yet read back
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// Take the accumulated bytes out of the sink
    #[inline]
    pub fn into_bytes(self) -> BytesMut {
        self.buf
    }

    /// Borrow the accumulated bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

impl ByteSink for MemorySink {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        let n = dst.len().min(self.buf.remaining());
        self.buf.copy_to_slice(&mut dst[..n]);
        Ok(n)
    }

    fn write(&mut self, src: &[u8]) -> Result<usize> {
        self.buf.put_slice(src);
        Ok(src.len())
    }

    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn encoding(&self) -> TextEncoding {
        self.encoding
    }
}
