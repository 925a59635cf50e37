use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::cursor::ByteCursor;
use crate::error::{FrameError, Result};

/// Frame header: length (4) + opcode (2) = 6 bytes.
pub const HEADER_SIZE: usize = 6;

/// Size of the length field alone.
pub const LENGTH_SIZE: usize = 4;

/// Size of the opcode, which the length field also covers.
pub const OPCODE_SIZE: usize = 2;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// One protocol message: an opcode and its undecoded payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: u16,
    pub payload: Bytes,
}

impl Frame {
    pub fn new(opcode: u16, payload: impl Into<Bytes>) -> Self {
        Self {
            opcode,
            payload: payload.into(),
        }
    }

    /// Value of the length field: opcode plus payload.
    pub fn length_field(&self) -> usize {
        OPCODE_SIZE + self.payload.len()
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Cursor over opcode and payload, positioned before the opcode.
    pub fn to_cursor(&self) -> ByteCursor {
        let mut cursor = ByteCursor::with_capacity(self.length_field());
        cursor.put_u16(self.opcode);
        cursor.put_bytes(&self.payload);
        cursor
    }
}

/// Outcome of one attempt to pull a frame from buffered or streamed bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    /// A complete frame.
    Frame(Frame),
    /// The peer sent a zero length field: nothing to process.
    NoMessage,
    /// Not enough bytes yet. Whatever was buffered is kept for the next attempt.
    Pending,
}

impl ReadStatus {
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            Self::Frame(frame) => Some(frame),
            Self::NoMessage | Self::Pending => None,
        }
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬───────────┬─────────────────────┐
/// │ Length (4B)  │ Opcode    │ Payload             │
/// │ LE, covers   │ (2B LE)   │ (Length - 2 bytes)  │
/// │ opcode+body  │           │                     │
/// └──────────────┴───────────┴─────────────────────┘
/// ```
pub fn encode_frame(opcode: u16, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let max = u32::MAX as usize - OPCODE_SIZE;
    if payload.len() > max {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u32_le((OPCODE_SIZE + payload.len()) as u32);
    dst.put_u16_le(opcode);
    dst.put_slice(payload);
    Ok(())
}

/// Decode a frame from a buffer.
///
/// Returns [`ReadStatus::Pending`] if the buffer doesn't contain a complete
/// frame yet. A frame or a zero-length marker is consumed from the buffer.
pub fn decode_frame(src: &mut BytesMut, max_payload: usize) -> Result<ReadStatus> {
    if src.len() < LENGTH_SIZE {
        return Ok(ReadStatus::Pending);
    }

    let length = u32::from_le_bytes([src[0], src[1], src[2], src[3]]);
    if length == 0 {
        src.advance(LENGTH_SIZE);
        return Ok(ReadStatus::NoMessage);
    }
    if (length as usize) < OPCODE_SIZE {
        return Err(FrameError::LengthTooShort(length));
    }

    let payload_len = length as usize - OPCODE_SIZE;
    if payload_len > max_payload {
        return Err(FrameError::PayloadTooLarge {
            size: payload_len,
            max: max_payload,
        });
    }

    let total = LENGTH_SIZE + length as usize;
    if src.len() < total {
        return Ok(ReadStatus::Pending);
    }

    src.advance(LENGTH_SIZE);
    let opcode = src.get_u16_le();
    let payload = src.split_to(payload_len).freeze();

    Ok(ReadStatus::Frame(Frame { opcode, payload }))
}

/// Configuration for the frame codec.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Read timeout applied to TCP streams.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout applied to TCP streams.
    pub write_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_frame(status: ReadStatus) -> Frame {
        match status {
            ReadStatus::Frame(frame) => frame,
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let mut buf = BytesMut::new();
        let payload = b"\x29\x00\x00\x00";

        encode_frame(0, payload, &mut buf).unwrap();

        assert_eq!(buf.len(), HEADER_SIZE + payload.len());
        assert_eq!(&buf[..6], &[6, 0, 0, 0, 0, 0]);

        let frame = expect_frame(decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap());

        assert_eq!(frame.opcode, 0);
        assert_eq!(frame.payload.as_ref(), payload);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_length_field_counts_opcode() {
        for len in [0usize, 1, 100, 4096] {
            let mut buf = BytesMut::new();
            encode_frame(52, &vec![0u8; len], &mut buf).unwrap();
            let field = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
            assert_eq!(field as usize, 2 + len);
        }
    }

    #[test]
    fn test_decode_incomplete_header() {
        let mut buf = BytesMut::from(&[0x06, 0x00, 0x00][..]);
        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert_eq!(result, ReadStatus::Pending);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let mut buf = BytesMut::new();
        encode_frame(1, b"hello", &mut buf).unwrap();
        buf.truncate(HEADER_SIZE + 2);

        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap();
        assert_eq!(result, ReadStatus::Pending);
        assert_eq!(buf.len(), HEADER_SIZE + 2);
    }

    #[test]
    fn test_zero_length_is_no_message() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(0);
        encode_frame(19, b"x", &mut buf).unwrap();

        assert_eq!(
            decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap(),
            ReadStatus::NoMessage
        );
        let frame = expect_frame(decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap());
        assert_eq!(frame.opcode, 19);
    }

    #[test]
    fn test_length_one_is_too_short() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(1);
        buf.put_u8(0);

        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(result, Err(FrameError::LengthTooShort(1))));
    }

    #[test]
    fn test_decode_payload_too_large() {
        let mut buf = BytesMut::new();
        buf.put_u32_le(1024 * 1024 * 32);
        buf.put_u16_le(1);

        let result = decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD);
        assert!(matches!(result, Err(FrameError::PayloadTooLarge { .. })));
    }

    #[test]
    fn test_multiple_frames() {
        let mut buf = BytesMut::new();
        encode_frame(1, b"first", &mut buf).unwrap();
        encode_frame(2, b"second", &mut buf).unwrap();

        let f1 = expect_frame(decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap());
        assert_eq!(f1.opcode, 1);
        assert_eq!(f1.payload.as_ref(), b"first");

        let f2 = expect_frame(decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap());
        assert_eq!(f2.opcode, 2);
        assert_eq!(f2.payload.as_ref(), b"second");

        assert!(buf.is_empty());
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(47, b"", &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[2, 0, 0, 0, 47, 0]);

        let frame = expect_frame(decode_frame(&mut buf, DEFAULT_MAX_PAYLOAD).unwrap());
        assert_eq!(frame.opcode, 47);
        assert!(frame.payload.is_empty());
    }

    #[test]
    fn test_frame_sizes_and_cursor() {
        let frame = Frame::new(0x0102, Bytes::from_static(b"test"));
        assert_eq!(frame.wire_size(), HEADER_SIZE + 4);
        assert_eq!(frame.length_field(), 6);

        let mut cursor = frame.to_cursor();
        assert_eq!(cursor.get_u16().unwrap(), 0x0102);
        assert_eq!(cursor.unread(), b"test");
    }
}
