use std::net::Ipv4Addr;

use mlgui_wire::{ByteCursor, CodecResult, Hash, WireString};
use serde::Serialize;

use crate::message::{Decode, DecodeContext};

const HOST_STATE_NAMES: [&str; 11] = [
    "Not connected",
    "Connecting",
    "Connected initiating",
    "Connected downloading",
    "Connected",
    "Connected and queued",
    "New host",
    "Removed host",
    "Black listed",
    "Not connected and was queued",
    "Connected and unknown",
];

/// Connection state of a server or client, with a queue rank for queued states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostState {
    pub state: u8,
    pub rank: Option<u32>,
}

impl HostState {
    /// States 3, 5 and 9 are followed by a queue rank.
    pub fn has_rank(state: u8) -> bool {
        matches!(state, 3 | 5 | 9)
    }

    pub fn description(&self) -> &'static str {
        HOST_STATE_NAMES
            .get(usize::from(self.state))
            .copied()
            .unwrap_or("Unknown")
    }
}

impl Decode for HostState {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        let state = cursor.get_u8()?;
        let rank = if Self::has_rank(state) {
            Some(cursor.get_u32()?)
        } else {
            None
        };
        Ok(Self { state, rank })
    }
}

/// How a client can be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClientKind {
    /// Tag 0: directly reachable.
    Direct { ip: Ipv4Addr, geoip: u8, port: u16 },
    /// Tag 1: behind a firewall, known by name and hash.
    Firewalled {
        name: WireString,
        #[serde(serialize_with = "super::serialize_hash")]
        hash: Hash,
        ip: Ipv4Addr,
        geoip: u8,
        port: u16,
    },
    /// Any other tag carries no further fields.
    Other { code: u8 },
}

impl Decode for ClientKind {
    fn decode(cursor: &mut ByteCursor, _ctx: &DecodeContext) -> CodecResult<Self> {
        let kind = match cursor.get_u8()? {
            0 => {
                let ip = cursor.get_ipv4()?;
                let geoip = cursor.get_u8()?;
                let port = cursor.get_u16()?;
                ClientKind::Direct { ip, geoip, port }
            }
            1 => {
                let name = cursor.get_string()?;
                let hash = cursor.get_hash()?;
                let ip = cursor.get_ipv4()?;
                let geoip = cursor.get_u8()?;
                let port = cursor.get_u16()?;
                ClientKind::Firewalled {
                    name,
                    hash,
                    ip,
                    geoip,
                    port,
                }
            }
            code => ClientKind::Other { code },
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<T: Decode>(cursor: &mut ByteCursor) -> T {
        T::decode(cursor, &DecodeContext::default()).unwrap()
    }

    #[test]
    fn queued_states_carry_rank() {
        for state in [3u8, 5, 9] {
            let mut cursor = ByteCursor::new();
            cursor.put_u8(state);
            cursor.put_u32(17);
            let host: HostState = decode(&mut cursor);
            assert_eq!(host.rank, Some(17));
            assert!(!cursor.has_remaining());
        }
    }

    #[test]
    fn other_states_have_no_rank() {
        let mut cursor = ByteCursor::from_slice(&[4, 0xAA]);
        let host: HostState = decode(&mut cursor);
        assert_eq!(host, HostState { state: 4, rank: None });
        assert_eq!(host.description(), "Connected");
        assert_eq!(cursor.unread(), &[0xAA]);
    }

    #[test]
    fn unknown_state_description() {
        let host = HostState {
            state: 200,
            rank: None,
        };
        assert_eq!(host.description(), "Unknown");
    }

    #[test]
    fn firewalled_client_kind() {
        let mut cursor = ByteCursor::new();
        cursor.put_u8(1);
        cursor.put_string("peer").unwrap();
        cursor.put_hash(&[0x11; 16]).unwrap();
        cursor.put_ipv4(Ipv4Addr::new(10, 1, 2, 3));
        cursor.put_u8(2);
        cursor.put_u16(4662);

        let kind: ClientKind = decode(&mut cursor);
        assert_eq!(
            kind,
            ClientKind::Firewalled {
                name: WireString::from("peer"),
                hash: [0x11; 16],
                ip: Ipv4Addr::new(10, 1, 2, 3),
                geoip: 2,
                port: 4662,
            }
        );
    }

    #[test]
    fn unknown_client_kind_reads_only_tag() {
        let mut cursor = ByteCursor::from_slice(&[7, 1, 2]);
        let kind: ClientKind = decode(&mut cursor);
        assert_eq!(kind, ClientKind::Other { code: 7 });
        assert_eq!(cursor.remaining(), 2);
    }
}
