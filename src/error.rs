//! Error types produced while decoding an IPC message.

/// Errors surfaced to callers of [`crate::read`], [`crate::read_header`] and
/// [`crate::read_data`].
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    /// The 8-byte frame header could not be parsed.
    #[error("malformed frame header: {0}")]
    MalformedHeader(String),

    /// A vector, list, or string claimed more elements than remained in the
    /// frame body.
    #[error("truncated payload: expected {expected} more byte(s), {available} available")]
    TruncatedPayload {
        /// Bytes required to satisfy the current read.
        expected: usize,
        /// Bytes actually left in the frame.
        available: usize,
    },

    /// A type code outside the documented set was encountered.
    #[error("unsupported type code: {0}")]
    UnsupportedTypeCode(i8),

    /// The compressed body did not expand to its advertised length.
    #[error("decompression error: {0}")]
    DecompressionError(String),

    /// The message carried a q exception (type code -128).
    #[error("q exception: {0}")]
    QException(String),

    /// The underlying byte source failed.
    #[error("source error: {0}")]
    SourceError(#[from] std::io::Error),
}

/// Internal error used while recursively decoding a value. Collapsed into
/// [`DecoderError`] at the `read`/`read_data`/`read_header` boundary.
#[derive(Debug, thiserror::Error)]
pub(crate) enum DecodeErrorInt {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("EOF encountered while decoding")]
    Eof,

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("truncated payload: expected {expected} more byte(s), {available} available")]
    TruncatedPayload { expected: usize, available: usize },

    #[error("unsupported type code: {0}")]
    UnsupportedTypeCode(i8),

    #[error("decompression error: {0}")]
    DecompressionError(String),

    #[error("q exception: {0}")]
    QException(String),
}

impl From<DecodeErrorInt> for DecoderError {
    fn from(e: DecodeErrorInt) -> Self {
        match e {
            DecodeErrorInt::Io(e) => DecoderError::SourceError(e),
            DecodeErrorInt::Eof => {
                DecoderError::SourceError(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "EOF encountered while decoding"))
            }
            DecodeErrorInt::MalformedHeader(s) => DecoderError::MalformedHeader(s),
            DecodeErrorInt::TruncatedPayload { expected, available } => {
                DecoderError::TruncatedPayload { expected, available }
            }
            DecodeErrorInt::UnsupportedTypeCode(t) => DecoderError::UnsupportedTypeCode(t),
            DecodeErrorInt::DecompressionError(s) => DecoderError::DecompressionError(s),
            DecodeErrorInt::QException(s) => DecoderError::QException(s),
        }
    }
}
