//! `tokio_util::codec` adapter for use with `Framed` streams.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::codec::{decode_frame, encode_frame, Frame, ReadStatus, DEFAULT_MAX_PAYLOAD, LENGTH_SIZE};
use crate::error::FrameError;

/// Frame codec for async streams.
///
/// Zero-length markers are consumed silently; the stream only yields frames.
#[derive(Debug, Clone)]
pub struct GuiCodec {
    max_payload_size: usize,
}

impl GuiCodec {
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD)
    }

    pub fn with_max_payload(max_payload_size: usize) -> Self {
        Self { max_payload_size }
    }
}

impl Default for GuiCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for GuiCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        loop {
            match decode_frame(src, self.max_payload_size)? {
                ReadStatus::Frame(frame) => return Ok(Some(frame)),
                ReadStatus::NoMessage => trace!("skipping empty frame marker"),
                ReadStatus::Pending => return Ok(None),
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if src.is_empty() {
            return Ok(None);
        }
        let received = src.len();
        let expected = if received >= LENGTH_SIZE {
            LENGTH_SIZE + u32::from_le_bytes([src[0], src[1], src[2], src[3]]) as usize
        } else {
            LENGTH_SIZE
        };
        Err(FrameError::IncompleteFrame { expected, received })
    }
}

impl Encoder<Frame> for GuiCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        if frame.payload.len() > self.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: frame.payload.len(),
                max: self.max_payload_size,
            });
        }
        encode_frame(frame.opcode, &frame.payload, dst)
    }
}
