use std::net::Ipv4Addr;

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{CodecError, CodecResult};
use crate::string::WireString;

/// Peer address as reported by the core: either a numeric IP or a host name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Address {
    /// Type byte 0.
    Ip {
        ip: Ipv4Addr,
        geoip: u8,
        blocked: bool,
    },
    /// Type byte 1.
    Named {
        name: WireString,
        geoip: u8,
        blocked: bool,
    },
}

impl Address {
    pub fn geoip(&self) -> u8 {
        match self {
            Self::Ip { geoip, .. } | Self::Named { geoip, .. } => *geoip,
        }
    }

    pub fn is_blocked(&self) -> bool {
        match self {
            Self::Ip { blocked, .. } | Self::Named { blocked, .. } => *blocked,
        }
    }
}

impl ByteCursor {
    pub fn get_address(&mut self) -> CodecResult<Address> {
        match self.get_u8()? {
            0 => {
                let ip = self.get_ipv4()?;
                let geoip = self.get_u8()?;
                let blocked = self.get_bool()?;
                Ok(Address::Ip { ip, geoip, blocked })
            }
            1 => {
                // Note the order: geoip comes before the name here.
                let geoip = self.get_u8()?;
                let name = self.get_string()?;
                let blocked = self.get_bool()?;
                Ok(Address::Named {
                    name,
                    geoip,
                    blocked,
                })
            }
            other => Err(CodecError::InvalidAddressType(other)),
        }
    }

    pub fn put_address(&mut self, address: &Address) -> CodecResult<()> {
        match address {
            Address::Ip { ip, geoip, blocked } => {
                self.put_u8(0);
                self.put_ipv4(*ip);
                self.put_u8(*geoip);
                self.put_bool(*blocked);
            }
            Address::Named {
                name,
                geoip,
                blocked,
            } => {
                self.put_u8(1);
                self.put_u8(*geoip);
                self.put_string(name)?;
                self.put_bool(*blocked);
            }
        }
        Ok(())
    }
}
