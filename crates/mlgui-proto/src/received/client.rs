use mlgui_wire::{Address, ByteCursor, CodecResult, Hash, Tag, WireString};
use serde::Serialize;

use super::host::{ClientKind, HostState};
use crate::message::{decode_list, Decode, DecodeContext};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    pub client_id: u32,
    pub network_id: u32,
    pub kind: ClientKind,
    pub state: HostState,
    pub client_type: u8,
    pub metadata: Vec<Tag>,
    pub name: WireString,
    pub rating: u32,
    pub software: WireString,
    pub downloaded: u64,
    pub uploaded: u64,
    pub upload_filename: WireString,
    pub connect_time: u32,
    pub emule_mod: WireString,
    pub release: WireString,
    pub sui_verified: bool,
}

impl Decode for ClientInfo {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            client_id: cursor.get_u32()?,
            network_id: cursor.get_u32()?,
            kind: ClientKind::decode(cursor, ctx)?,
            state: HostState::decode(cursor, ctx)?,
            client_type: cursor.get_u8()?,
            metadata: cursor.get_tags()?,
            name: cursor.get_string()?,
            rating: cursor.get_u32()?,
            software: cursor.get_string()?,
            downloaded: cursor.get_u64()?,
            uploaded: cursor.get_u64()?,
            upload_filename: cursor.get_string()?,
            connect_time: cursor.get_u32()?,
            emule_mod: cursor.get_string()?,
            release: cursor.get_string()?,
            sui_verified: cursor.get_bool()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientState {
    pub client_id: u32,
    pub state: HostState,
}

impl Decode for ClientState {
    fn decode(cursor: &mut ByteCursor, ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            client_id: cursor.get_u32()?,
            state: HostState::decode(cursor, ctx)?,
        })
    }
}

/// Global transfer counters, rates in bytes per second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientStats {
    pub uploaded: u64,
    pub downloaded: u64,
    pub shared: u64,
    pub shared_files: u32,
    pub tcp_up_rate: u32,
    pub tcp_down_rate: u32,
    pub udp_up_rate: u32,
    pub udp_down_rate: u32,
    pub current_downloads: u32,
    pub finished_downloads: u32,
    pub connected_networks: Vec<NetworkServers>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkServers {
    pub network_id: u32,
    pub servers: u32,
}

impl Decode for ClientStats {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            uploaded: cursor.get_u64()?,
            downloaded: cursor.get_u64()?,
            shared: cursor.get_u64()?,
            shared_files: cursor.get_u32()?,
            tcp_up_rate: cursor.get_u32()?,
            tcp_down_rate: cursor.get_u32()?,
            udp_up_rate: cursor.get_u32()?,
            udp_down_rate: cursor.get_u32()?,
            current_downloads: cursor.get_u32()?,
            finished_downloads: cursor.get_u32()?,
            connected_networks: decode_list(cursor, |c| {
                Ok(NetworkServers {
                    network_id: c.get_u32()?,
                    servers: c.get_u32()?,
                })
            })?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageFromClient {
    pub client_id: u32,
    pub message: WireString,
}

impl Decode for MessageFromClient {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            client_id: cursor.get_u32()?,
            message: cursor.get_string()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub user_id: u32,
    #[serde(serialize_with = "super::serialize_hash")]
    pub md4: Hash,
    pub name: WireString,
    pub address: Address,
    pub port: u16,
    pub tags: Vec<Tag>,
    pub server_id: u32,
}

impl Decode for UserInfo {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        Ok(Self {
            user_id: cursor.get_u32()?,
            md4: cursor.get_hash()?,
            name: cursor.get_string()?,
            address: cursor.get_address()?,
            port: cursor.get_u16()?,
            tags: cursor.get_tags()?,
            server_id: cursor.get_u32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use mlgui_wire::TagValue;

    use super::*;

    #[test]
    fn client_info_reads_every_field() {
        let mut cursor = ByteCursor::new();
        cursor.put_u32(77);
        cursor.put_u32(1);
        cursor.put_u8(0);
        cursor.put_ipv4(Ipv4Addr::new(82, 1, 2, 3));
        cursor.put_u8(12);
        cursor.put_u16(4662);
        cursor.put_u8(5);
        cursor.put_u32(40);
        cursor.put_u8(0);
        cursor.put_u16(0);
        cursor.put_string("peer").unwrap();
        cursor.put_u32(0);
        cursor.put_string("aMule").unwrap();
        cursor.put_u64(10);
        cursor.put_u64(20);
        cursor.put_string("song.ogg").unwrap();
        cursor.put_u32(1_700_000_000);
        cursor.put_string("").unwrap();
        cursor.put_string("2.3.3").unwrap();
        cursor.put_u8(1);

        let info = ClientInfo::decode(&mut cursor, &DecodeContext::default()).unwrap();
        assert!(!cursor.has_remaining());
        assert_eq!(info.client_id, 77);
        assert!(matches!(info.kind, ClientKind::Direct { port: 4662, .. }));
        assert_eq!(info.state.rank, Some(40));
        assert_eq!(info.software, "aMule");
        assert_eq!(info.uploaded, 20);
        assert!(info.sui_verified);
    }

    #[test]
    fn client_stats_network_list() {
        let mut cursor = ByteCursor::new();
        for value in [1u64, 2, 3] {
            cursor.put_u64(value);
        }
        for value in [4u32, 5, 6, 7, 8, 9, 10] {
            cursor.put_u32(value);
        }
        cursor.put_u16(2);
        for value in [1u32, 3, 2, 0] {
            cursor.put_u32(value);
        }

        let stats = ClientStats::decode(&mut cursor, &DecodeContext::default()).unwrap();
        assert_eq!(stats.shared, 3);
        assert_eq!(stats.finished_downloads, 10);
        assert_eq!(
            stats.connected_networks,
            vec![
                NetworkServers {
                    network_id: 1,
                    servers: 3
                },
                NetworkServers {
                    network_id: 2,
                    servers: 0
                },
            ]
        );
    }

    #[test]
    fn user_info_with_named_address() {
        let mut cursor = ByteCursor::new();
        cursor.put_u32(5);
        cursor.put_hash(b"0123456789abcdef").unwrap();
        cursor.put_string("bob").unwrap();
        cursor
            .put_address(&Address::Named {
                name: WireString::from("bob.example"),
                geoip: 3,
                blocked: true,
            })
            .unwrap();
        cursor.put_u16(4662);
        cursor
            .put_tags(&[Tag::new("rank", TagValue::Signed(-2))])
            .unwrap();
        cursor.put_u32(9);

        let user = UserInfo::decode(&mut cursor, &DecodeContext::default()).unwrap();
        assert_eq!(&user.md4, b"0123456789abcdef");
        assert!(user.address.is_blocked());
        assert_eq!(user.tags[0].value, TagValue::Signed(-2));
        assert_eq!(user.server_id, 9);
    }
}
