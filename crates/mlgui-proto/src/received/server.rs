use mlgui_wire::{Address, ByteCursor, CodecResult, Tag, WireString};
use serde::Serialize;

use super::host::HostState;
use crate::message::{decode_list, Decode, DecodeContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub server_id: u32,
    pub network_id: u32,
    pub address: Address,
    pub port: u16,
    pub score: u32,
    pub metadata: Vec<Tag>,
    pub users: u64,
    pub files: u64,
    pub state: HostState,
    pub name: WireString,
    pub description: WireString,
    pub preferred: bool,
    pub version: WireString,
    pub max_users: u64,
    pub lowid_users: u64,
    pub soft_limit: u64,
    pub hard_limit: u64,
    pub ping: u32,
}

impl Decode for ServerInfo {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            server_id: cursor.get_u32()?,
            network_id: cursor.get_u32()?,
            address: cursor.get_address()?,
            port: cursor.get_u16()?,
            score: cursor.get_u32()?,
            metadata: cursor.get_tags()?,
            users: cursor.get_u64()?,
            files: cursor.get_u64()?,
            state: HostState::decode(cursor, ctx)?,
            name: cursor.get_string()?,
            description: cursor.get_string()?,
            preferred: cursor.get_bool()?,
            version: cursor.get_string()?,
            max_users: cursor.get_u64()?,
            lowid_users: cursor.get_u64()?,
            soft_limit: cursor.get_u64()?,
            hard_limit: cursor.get_u64()?,
            ping: cursor.get_u32()?,
        })
    }
}

/// A counted list of `ServerInfo` records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectedServers {
    pub servers: Vec<ServerInfo>,
}

impl Decode for ConnectedServers {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            servers: decode_list(cursor, |c| ServerInfo::decode(c, ctx))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerState {
    pub server_id: u32,
    pub state: HostState,
}

impl Decode for ServerState {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            server_id: cursor.get_u32()?,
            state: HostState::decode(cursor, ctx)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerUser {
    pub server_id: u32,
    pub user_id: u32,
}

impl Decode for ServerUser {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            server_id: cursor.get_u32()?,
            user_id: cursor.get_u32()?,
        })
    }
}
