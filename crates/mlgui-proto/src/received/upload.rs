use mlgui_wire::{ByteCursor, CodecResult, WireString};
use serde::Serialize;

use crate::message::{decode_list, Decode, DecodeContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedFileInfo {
    /// Not the same id space as download `file_id`s.
    pub file_id: u32,
    pub network_id: u32,
    pub name: WireString,
    pub size: u64,
    pub uploaded: u64,
    pub requests: u32,
}

impl Decode for SharedFileInfo {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            file_id: cursor.get_u32()?,
            network_id: cursor.get_u32()?,
            name: cursor.get_string()?,
            size: cursor.get_u64()?,
            uploaded: cursor.get_u64()?,
            requests: cursor.get_u32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SharedFileUpload {
    pub file_id: u32,
    pub uploaded: u64,
    pub requests: u32,
}

impl Decode for SharedFileUpload {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            file_id: cursor.get_u32()?,
            uploaded: cursor.get_u64()?,
            requests: cursor.get_u32()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SharedFileUnshared {
    pub file_id: u32,
}

impl Decode for SharedFileUnshared {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            file_id: cursor.get_u32()?,
        })
    }
}

/// `Uploaders` and `Pending`: a counted list of client ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientIdList {
    pub client_ids: Vec<u32>,
}

impl Decode for ClientIdList {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            client_ids: decode_list(cursor, ByteCursor::get_u32)?,
        })
    }
}
