use mlgui_wire::{ByteCursor, CodecResult, Frame};

/// Protocol version this client announces.
pub const PROTOCOL_VERSION: u32 = 41;

/// First protocol version whose `FileInfo` carries the magic/comments/owner tail.
pub const FILE_INFO_TAIL_VERSION: u32 = 40;

/// A frame that has been read but not yet dispatched.
///
/// `raw` holds the opcode followed by the payload, positioned before the
/// opcode. It is `None` only for messages created locally without a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub opcode: u16,
    pub raw: Option<ByteCursor>,
}

impl RawMessage {
    pub fn new(opcode: u16) -> Self {
        Self { opcode, raw: None }
    }

    pub fn payload_len(&self) -> usize {
        self.raw
            .as_ref()
            .map(|raw| raw.len().saturating_sub(2))
            .unwrap_or(0)
    }
}

impl From<Frame> for RawMessage {
    fn from(frame: Frame) -> Self {
        Self {
            opcode: frame.opcode,
            raw: Some(frame.to_cursor()),
        }
    }
}

impl From<&Frame> for RawMessage {
    fn from(frame: &Frame) -> Self {
        Self {
            opcode: frame.opcode,
            raw: Some(frame.to_cursor()),
        }
    }
}

/// Session facts that change how some payloads are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeContext {
    pub protocol_version: u32,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
        }
    }
}

impl DecodeContext {
    pub fn new(protocol_version: u32) -> Self {
        Self { protocol_version }
    }
}

/// A payload layout readable from a cursor positioned after the opcode.
pub trait Decode: Sized {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self>;
}

/// Read a `u16` count followed by that many items.
pub(crate) fn decode_list<T>(
    cursor: &mut ByteCursor,
    mut item: impl FnMut(&mut ByteCursor) -> CodecResult<T>,
) -> CodecResult<Vec<T>> {
    let count = cursor.get_count()?;
    let mut items = Vec::with_capacity(count.min(cursor.remaining()));
    for _ in 0..count {
        items.push(item(cursor)?);
    }
    Ok(items)
}

/// Write a `u16` count followed by each item.
pub(crate) fn encode_list<T>(
    cursor: &mut ByteCursor,
    items: &[T],
    mut item: impl FnMut(&mut ByteCursor, &T) -> CodecResult<()>,
) -> CodecResult<()> {
    cursor.put_count(items.len())?;
    for value in items {
        item(cursor, value)?;
    }
    Ok(())
}
