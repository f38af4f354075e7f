//! # `qipc-decode`
//!
//! A decoder for the q/kdb+ interprocess-communication wire format: frame
//! parsing, decompression, and reconstruction of the full value tree a q
//! process can send over IPC (atoms, typed vectors, general lists,
//! dictionaries, tables, keyed tables, lambdas, projections, function
//! references, and errors).
//!
//! This crate decodes only; it does not open sockets, authenticate a
//! connection, or serialize values back to the wire. Bring your own
//! [`std::io::Read`] (a `TcpStream`, a `File`, or a `&[u8]`) and call
//! [`read`]:
//!
//! ```
//! use qipc_decode::{read, ReadOptions};
//!
//! // a minimal uncompressed frame carrying the long atom 42
//! let frame: &[u8] = &[
//!     1, 0, 0, 0, 17, 0, 0, 0,
//!     0xF9, 42, 0, 0, 0, 0, 0, 0, 0,
//! ];
//! let mut src = frame;
//! let message = read(&mut src, ReadOptions::default()).unwrap();
//! println!("{:?}", message.data);
//! ```
mod decoder;
mod decompress;
mod error;
mod frame;
mod reader;
mod registry;
mod temporal;
mod value;

pub use decoder::ReadOptions;
pub use error::DecoderError;
pub use frame::{read, read_data, read_header, Body, Header, Message, MessageKind};
pub use reader::Endian;
pub use temporal::UniversalTemporal;
pub use value::{AdverbKind, Atom, Attribute, FunctionRef, Lambda, Value, Vector};
