/// Errors raised by the cursor primitives while decoding or encoding a payload.
///
/// A `CodecError` aborts the message being decoded or built. It never says
/// anything about the health of the connection itself.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// A read needed more bytes than the payload holds.
    #[error("out of data (needed {needed} bytes, {remaining} remaining)")]
    OutOfData { needed: usize, remaining: usize },

    /// Outbound strings use the 16-bit length form only.
    #[error("string too long for wire ({len} bytes, max {max})")]
    StringTooLong { len: usize, max: usize },

    /// Hashes are exactly 16 bytes on the wire.
    #[error("hash too long ({len} bytes, max 16)")]
    HashTooLong { len: usize },

    /// The decimal float format has no encoding for this value.
    #[error("float {0} cannot be encoded")]
    InvalidFloat(f64),

    /// Address type byte was neither 0 (ip) nor 1 (name).
    #[error("invalid address type {0}")]
    InvalidAddressType(u8),

    /// Query tree nesting exceeded the decoder limit.
    #[error("query tree deeper than {max} levels")]
    QueryTooDeep { max: usize },

    /// A field node used a type byte reserved for structural nodes.
    #[error("query field type {0} is reserved for structural nodes")]
    ReservedQueryType(u8),

    /// The signed tag encoding cannot carry this value.
    #[error("signed tag value {0} out of range")]
    SignedOutOfRange(i32),

    /// A list has more entries than its u16 count prefix can describe.
    #[error("list too long for wire ({len} entries, max {max})")]
    ListTooLong { len: usize, max: usize },
}

/// Errors that can occur while reading or writing frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame length cannot even hold the opcode.
    #[error("frame length {0} too short (must cover the 2-byte opcode)")]
    LengthTooShort(u32),

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended cleanly between frames.
    #[error("connection closed")]
    ConnectionClosed,

    /// The stream ended after a frame header promised more bytes.
    #[error("incomplete frame (expected {expected} bytes, received {received})")]
    IncompleteFrame { expected: usize, received: usize },

    /// A payload primitive failed while building or parsing a frame.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, FrameError>;

pub type CodecResult<T> = std::result::Result<T, CodecError>;
