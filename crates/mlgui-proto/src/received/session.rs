use mlgui_wire::{ByteCursor, CodecResult, WireString};
use serde::Serialize;

use crate::message::{decode_list, Decode, DecodeContext};

/// Versions above this one also report their opcode ranges.
const OPCODE_RANGE_VERSION: u32 = 25;

/// First message of every session: the core's protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoreProtocol {
    pub version: u32,
    pub max_opcode_sent: u32,
    pub max_opcode_accepted: u32,
}

impl Decode for CoreProtocol {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        let version = cursor.get_u32()?;
        let (max_opcode_sent, max_opcode_accepted) = if version > OPCODE_RANGE_VERSION {
            (cursor.get_u32()?, cursor.get_u32()?)
        } else {
            (0, 0)
        };
        Ok(Self {
            version,
            max_opcode_sent,
            max_opcode_accepted,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsoleMessage {
    pub message: WireString,
}

impl Decode for ConsoleMessage {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            message: cursor.get_string()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoreVersion {
    pub version: WireString,
}

impl Decode for CoreVersion {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            version: cursor.get_string()?,
        })
    }
}

/// Client and server ids the GUI should keep; everything else can be dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanTables {
    pub clients: Vec<u32>,
    pub servers: Vec<u32>,
}

impl Decode for CleanTables {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            clients: decode_list(cursor, ByteCursor::get_u32)?,
            servers: decode_list(cursor, ByteCursor::get_u32)?,
        })
    }
}
