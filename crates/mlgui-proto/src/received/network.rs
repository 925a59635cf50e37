use mlgui_wire::{ByteCursor, CodecResult, WireString};
use serde::Serialize;

use crate::message::{decode_list, Decode, DecodeContext};

const NETWORK_FLAG_NAMES: [&str; 8] = [
    "has_servers",
    "has_rooms",
    "has_multinet",
    "virtual",
    "has_search",
    "has_chat",
    "has_supernodes",
    "has_upload",
];

/// Capability bit advertised by a network plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkFlag(pub u16);

impl NetworkFlag {
    pub const HAS_SERVERS: Self = Self(0);
    pub const HAS_ROOMS: Self = Self(1);
    pub const HAS_MULTINET: Self = Self(2);
    pub const VIRTUAL: Self = Self(3);
    pub const HAS_SEARCH: Self = Self(4);
    pub const HAS_CHAT: Self = Self(5);
    pub const HAS_SUPERNODES: Self = Self(6);
    pub const HAS_UPLOAD: Self = Self(7);

    pub fn name(self) -> Option<&'static str> {
        NETWORK_FLAG_NAMES.get(usize::from(self.0)).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub network_id: u32,
    pub name: WireString,
    pub enabled: bool,
    pub config_file: WireString,
    pub uploaded: u64,
    pub downloaded: u64,
    /// Sent only by cores that append the server count and capability flags.
    pub connected_servers: Option<u32>,
    pub flags: Vec<NetworkFlag>,
}

impl NetworkInfo {
    pub fn has_flag(&self, flag: NetworkFlag) -> bool {
        self.flags.contains(&flag)
    }
}

impl Decode for NetworkInfo {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        let network_id = cursor.get_u32()?;
        let name = cursor.get_string()?;
        let enabled = cursor.get_bool()?;
        let config_file = cursor.get_string()?;
        let uploaded = cursor.get_u64()?;
        let downloaded = cursor.get_u64()?;

        let (connected_servers, flags) = if cursor.has_remaining() {
            let servers = cursor.get_u32()?;
            let flags = decode_list(cursor, |c| c.get_u16().map(NetworkFlag))?;
            (Some(servers), flags)
        } else {
            (None, Vec::new())
        };

        Ok(Self {
            network_id,
            name,
            enabled,
            config_file,
            uploaded,
            downloaded,
            connected_servers,
            flags,
        })
    }
}

/// Per-network statistics tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub network_id: u32,
    pub tables: Vec<StatsTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsTable {
    pub name: WireString,
    pub uptime: u32,
    pub rows: Vec<StatsRow>,
}

/// Counters for one client software brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsRow {
    pub long_name: WireString,
    pub short_name: WireString,
    pub seen: u32,
    pub banned: u32,
    pub requests: u32,
    pub downloaded: u64,
    pub uploaded: u64,
}

impl Decode for Stats {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        let network_id = cursor.get_u32()?;
        let tables = decode_list(cursor, |c| {
            Ok(StatsTable {
                name: c.get_string()?,
                uptime: c.get_u32()?,
                rows: decode_list(c, |r| {
                    Ok(StatsRow {
                        long_name: r.get_string()?,
                        short_name: r.get_string()?,
                        seen: r.get_u32()?,
                        banned: r.get_u32()?,
                        requests: r.get_u32()?,
                        downloaded: r.get_u64()?,
                        uploaded: r.get_u64()?,
                    })
                })?,
            })
        })?;
        Ok(Self { network_id, tables })
    }
}
