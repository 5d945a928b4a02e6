//! Varuint and length-prefixed byte-string encoding.
//!
//! Integers use the standard LEB128-style variable-length encoding:
//! little-endian base-128 with the continuation bit in the high bit of each
//! byte. Byte strings and text are length-prefixed with a varuint. Both ends
//! of a connection must agree on this layout bit-for-bit.
//!
//! [`Encoder`] and [`Decoder`] are single-pass and forward-only: one is
//! created per outgoing message or per incoming buffer and discarded after a
//! full pass. After a decode error the cursor position is unspecified and the
//! decoder must not be reused.

use crate::error::{ProtocolError, Result};

/// Longest legal varuint for a u64: ceil(64 / 7) bytes.
const MAX_VARUINT_LEN: usize = 10;

/// Growable write buffer for one outgoing message.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Pre-sized buffer for callers that know the payload size up front.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Write a non-negative integer as a LEB128 varuint.
    pub fn write_uint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Write a varuint length prefix followed by the raw bytes.
    pub fn write_bytes(&mut self, blob: &[u8]) {
        self.write_uint(blob.len() as u64);
        self.buf.extend_from_slice(blob);
    }

    /// Write a length-prefixed UTF-8 string. Same layout as [`write_bytes`];
    /// the contract that the payload is valid UTF-8 is what lets the decoder
    /// hand back `&str`.
    ///
    /// [`write_bytes`]: Encoder::write_bytes
    pub fn write_string(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the encoder, yielding the encoded message bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Forward-only read cursor over one incoming buffer.
///
/// Reads borrow from the underlying buffer; nothing is copied until the
/// caller decides to keep a payload.
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn has_remaining(&self) -> bool {
        self.pos < self.buf.len()
    }

    /// Read a LEB128 varuint.
    ///
    /// # Errors
    /// `TruncatedInput` if the buffer ends before the final (high-bit-clear)
    /// byte. `MalformedVaruint` if the encoding runs past 10 bytes or the
    /// tenth byte carries more than the single remaining bit: that is an
    /// invalid encoding, not a short read, and no amount of further input
    /// can complete it.
    pub fn read_uint(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or(ProtocolError::TruncatedInput)?;
            self.pos += 1;

            if shift == 63 && byte > 0x01 {
                // Tenth byte may only carry the single remaining bit.
                return Err(ProtocolError::MalformedVaruint);
            }
            value |= u64::from(byte & 0x7f) << shift;

            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
            if shift as usize >= MAX_VARUINT_LEN * 7 {
                return Err(ProtocolError::MalformedVaruint);
            }
        }
    }

    /// Read a varuint length prefix followed by that many raw bytes.
    ///
    /// The length claim is checked against the remaining input before the
    /// slice is taken, so a hostile prefix cannot read past the buffer end.
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_uint()?;
        let len = usize::try_from(len).map_err(|_| ProtocolError::TruncatedInput)?;
        if len > self.remaining() {
            return Err(ProtocolError::TruncatedInput);
        }
        let blob = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(blob)
    }

    /// Read a length-prefixed UTF-8 string.
    ///
    /// # Errors
    /// `MalformedText` if the payload is not valid UTF-8.
    pub fn read_string(&mut self) -> Result<&'a str> {
        let blob = self.read_bytes()?;
        std::str::from_utf8(blob).map_err(ProtocolError::from)
    }
}
