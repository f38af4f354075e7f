//! Parses the 8-byte IPC frame header, expands a compressed body if one is
//! present, and hands the resulting bytes to the value decoder.

use std::io::Read;

use crate::decoder::{decode_value, ReadOptions};
use crate::decompress::decompress;
use crate::error::{DecodeErrorInt, DecoderError};
use crate::reader::{Cursor, Endian};
use crate::value::Value;

/// The three message kinds a q process distinguishes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Async,
    Sync,
    Response,
}

/// The parsed 8-byte frame header.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    pub endian: Endian,
    pub kind: MessageKind,
    pub compressed: bool,
    /// Total message length in bytes, header included.
    pub total_size: u32,
}

/// The body of a decoded frame: either a reconstructed value tree, or the
/// raw bytes when [`ReadOptions::raw`] was requested.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Value(Value),
    Raw(Vec<u8>),
}

/// A fully read IPC message.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub data: Body,
}

/// Reads and validates the 8-byte frame header from `src`.
pub fn read_header<R: Read>(src: &mut R) -> Result<Header, DecoderError> {
    read_header_int(src).map_err(Into::into)
}

fn read_header_int<R: Read>(src: &mut R) -> Result<Header, DecodeErrorInt> {
    let mut buf = [0u8; 8];
    src.read_exact(&mut buf)?;

    let endian = match buf[0] {
        0 => Endian::Big,
        1 => Endian::Little,
        other => {
            return Err(DecodeErrorInt::MalformedHeader(format!(
                "invalid endianness byte {}",
                other
            )))
        }
    };
    let kind = match buf[1] {
        0 => MessageKind::Async,
        1 => MessageKind::Sync,
        2 => MessageKind::Response,
        other => {
            return Err(DecodeErrorInt::MalformedHeader(format!(
                "invalid message kind byte {}",
                other
            )))
        }
    };
    let compressed = match buf[2] {
        0 => false,
        1 => true,
        other => {
            return Err(DecodeErrorInt::MalformedHeader(format!(
                "invalid compression flag byte {}",
                other
            )))
        }
    };
    // buf[3] is reserved and carries no meaning.
    let total_size = match endian {
        Endian::Little => u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        Endian::Big => u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]),
    };
    if total_size < 8 {
        return Err(DecodeErrorInt::MalformedHeader(format!(
            "declared total size {} is smaller than the header itself",
            total_size
        )));
    }

    Ok(Header {
        endian,
        kind,
        compressed,
        total_size,
    })
}

/// Reads the body that follows a frame header and, unless
/// [`ReadOptions::raw`] is set, decodes it into a [`Value`] tree.
pub fn read_data<R: Read>(
    src: &mut R,
    header: &Header,
    options: ReadOptions,
) -> Result<Body, DecoderError> {
    read_data_int(src, header, options).map_err(Into::into)
}

fn read_data_int<R: Read>(
    src: &mut R,
    header: &Header,
    options: ReadOptions,
) -> Result<Body, DecodeErrorInt> {
    let remaining = header.total_size as usize - 8;
    let mut raw = vec![0u8; remaining];
    src.read_exact(&mut raw)?;

    let body_bytes = if header.compressed {
        if raw.len() < 4 {
            return Err(DecodeErrorInt::TruncatedPayload {
                expected: 4,
                available: raw.len(),
            });
        }
        let uncompressed_length = match header.endian {
            Endian::Little => u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
            Endian::Big => u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
        } as usize;
        if uncompressed_length < 8 {
            return Err(DecodeErrorInt::DecompressionError(format!(
                "advertised uncompressed length {} is smaller than the header itself",
                uncompressed_length
            )));
        }
        decompress(&raw[4..], uncompressed_length - 8)?
    } else {
        raw
    };

    if options.raw {
        return Ok(Body::Raw(body_bytes));
    }

    let mut cursor = Cursor::new(&body_bytes, header.endian);
    let value = decode_value(&mut cursor, &options)?;
    Ok(Body::Value(value))
}

/// Reads one complete IPC message: header, then body.
pub fn read<R: Read>(src: &mut R, options: ReadOptions) -> Result<Message, DecoderError> {
    let header = read_header(src)?;
    let kind = header.kind;
    let data = read_data(src, &header, options)?;
    Ok(Message { kind, data })
}
