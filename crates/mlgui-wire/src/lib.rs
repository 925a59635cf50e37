//! Wire primitives and framing for the MLDonkey GUI protocol.
//!
//! Every message on the GUI socket is framed as:
//! - A 4-byte little-endian length covering the opcode and the payload
//! - A 2-byte little-endian opcode
//! - The payload, read and written with [`ByteCursor`]
//!
//! A zero length field carries no message. Payload strings are byte strings
//! with a 16-bit length that escapes to 32 bits, 64-bit integers travel as two
//! 32-bit words, and floats travel as decimal text.

pub mod address;
#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod cursor;
pub mod error;
pub mod query;
pub mod reader;
pub mod string;
pub mod tag;
pub mod writer;

pub use address::Address;
#[cfg(feature = "async")]
pub use async_codec::GuiCodec;
pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, ReadStatus, DEFAULT_MAX_PAYLOAD, HEADER_SIZE,
};
pub use cursor::{ByteCursor, Hash, HASH_LEN, MAX_WRITE_STRING_LEN};
pub use error::{CodecError, CodecResult, FrameError, Result};
pub use query::{QueryNode, MAX_QUERY_DEPTH};
pub use reader::FrameReader;
pub use string::WireString;
pub use tag::{Tag, TagValue};
pub use writer::{FrameWriter, SharedFrameWriter};
