//! Endian-aware, bounds-checked reading over an in-memory frame body.
//!
//! The wire format declares its byte order once per frame (the header's
//! first byte), so every multi-byte read downstream of the frame reader
//! takes the same [`Endian`] value rather than assuming a fixed order.

use crate::error::DecodeErrorInt;

/// Byte order declared by a frame's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// A cursor over a fully-buffered frame body. Every read either returns
/// the requested bytes or a [`DecodeErrorInt::TruncatedPayload`]; it never
/// panics on short input.
pub(crate) struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    endian: Endian,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8], endian: Endian) -> Self {
        Cursor { bytes, pos: 0, endian }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeErrorInt> {
        if self.remaining() < n {
            return Err(DecodeErrorInt::TruncatedPayload {
                expected: n,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn u8(&mut self) -> Result<u8, DecodeErrorInt> {
        Ok(self.take(1)?[0])
    }

    pub fn i8(&mut self) -> Result<i8, DecodeErrorInt> {
        Ok(self.u8()? as i8)
    }

    pub fn u16(&mut self) -> Result<u16, DecodeErrorInt> {
        let b = self.take(2)?;
        Ok(match self.endian {
            Endian::Little => u16::from_le_bytes([b[0], b[1]]),
            Endian::Big => u16::from_be_bytes([b[0], b[1]]),
        })
    }

    pub fn i16(&mut self) -> Result<i16, DecodeErrorInt> {
        Ok(self.u16()? as i16)
    }

    pub fn u32(&mut self) -> Result<u32, DecodeErrorInt> {
        let b = self.take(4)?;
        Ok(match self.endian {
            Endian::Little => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            Endian::Big => u32::from_be_bytes([b[0], b[1], b[2], b[3]]),
        })
    }

    pub fn i32(&mut self) -> Result<i32, DecodeErrorInt> {
        Ok(self.u32()? as i32)
    }

    pub fn u64(&mut self) -> Result<u64, DecodeErrorInt> {
        let b = self.take(8)?;
        Ok(match self.endian {
            Endian::Little => u64::from_le_bytes(b.try_into().expect("8 bytes")),
            Endian::Big => u64::from_be_bytes(b.try_into().expect("8 bytes")),
        })
    }

    pub fn i64(&mut self) -> Result<i64, DecodeErrorInt> {
        Ok(self.u64()? as i64)
    }

    pub fn f32(&mut self) -> Result<f32, DecodeErrorInt> {
        Ok(f32::from_bits(self.u32()?))
    }

    pub fn f64(&mut self) -> Result<f64, DecodeErrorInt> {
        Ok(f64::from_bits(self.u64()?))
    }

    pub fn bytes(&mut self, n: usize) -> Result<Vec<u8>, DecodeErrorInt> {
        Ok(self.take(n)?.to_vec())
    }

    pub fn guid(&mut self) -> Result<[u8; 16], DecodeErrorInt> {
        let b = self.take(16)?;
        let mut out = [0u8; 16];
        out.copy_from_slice(b);
        Ok(out)
    }

    /// Reads a NUL-terminated byte string, consuming the terminator, and
    /// returns it decoded as UTF-8 (q symbols are ASCII in practice but
    /// the wire format makes no such guarantee).
    pub fn cstr(&mut self) -> Result<String, DecodeErrorInt> {
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != 0 {
            self.pos += 1;
        }
        if self.pos >= self.bytes.len() {
            return Err(DecodeErrorInt::TruncatedPayload {
                expected: 1,
                available: 0,
            });
        }
        let s = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        self.pos += 1;
        Ok(s)
    }
}
