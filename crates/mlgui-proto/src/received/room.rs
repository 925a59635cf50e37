use mlgui_wire::{ByteCursor, CodecResult, WireString};
use serde::Serialize;

use crate::message::{Decode, DecodeContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInfo {
    pub room_id: u32,
    pub network_id: u32,
    pub name: WireString,
    pub state: u8,
}

impl Decode for RoomInfo {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            room_id: cursor.get_u32()?,
            network_id: cursor.get_u32()?,
            name: cursor.get_string()?,
            state: cursor.get_u8()?,
        })
    }
}

/// Chat line in a room. Kinds 1 (public) and 2 (private) name their sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomMessage {
    pub room_id: u32,
    pub kind: u8,
    pub source: Option<u32>,
    pub message: WireString,
}

impl Decode for RoomMessage {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        let room_id = cursor.get_u32()?;
        let kind = cursor.get_u8()?;
        let source = if matches!(kind, 1 | 2) {
            Some(cursor.get_u32()?)
        } else {
            None
        };
        let message = cursor.get_string()?;
        Ok(Self {
            room_id,
            kind,
            source,
            message,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomAddUser {
    pub room_id: u32,
    pub user_id: u32,
}

impl Decode for RoomAddUser {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            room_id: cursor.get_u32()?,
            user_id: cursor.get_u32()?,
        })
    }
}
