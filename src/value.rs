//! Typed attribute values (what the parsers store for the wire encoder).

use crate::types::SetType;
use byteorder::{BigEndian, ByteOrder};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// Length of a hardware (Ethernet) address.
pub const ETH_ALEN: usize = 6;

/// A single stored attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Ether([u8; ETH_ALEN]),
    Str(String),
    /// Presence-only marker.
    Flag,
    /// Active set type, resolved from a type name.
    Type(Arc<SetType>),
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U8(x) => Some(*x as u64),
            Value::U16(x) => Some(*x as u64),
            Value::U32(x) => Some(*x as u64),
            _ => None,
        }
    }

    pub fn as_ip(&self) -> Option<IpAddr> {
        match self {
            Value::Ipv4(a) => Some(IpAddr::V4(*a)),
            Value::Ipv6(a) => Some(IpAddr::V6(*a)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_ether(&self) -> Option<&[u8; ETH_ALEN]> {
        match self {
            Value::Ether(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&Arc<SetType>> {
        match self {
            Value::Type(t) => Some(t),
            _ => None,
        }
    }

    /// Network byte order representation handed to the wire encoder.
    /// Flags and type descriptors carry no payload.
    pub fn to_wire(&self) -> Vec<u8> {
        match self {
            Value::U8(x) => vec![*x],
            Value::U16(x) => {
                let mut buf = vec![0; 2];
                BigEndian::write_u16(&mut buf, *x);
                buf
            }
            Value::U32(x) => {
                let mut buf = vec![0; 4];
                BigEndian::write_u32(&mut buf, *x);
                buf
            }
            Value::Ipv4(a) => {
                let mut buf = vec![0; 4];
                BigEndian::write_u32(&mut buf, u32::from(*a));
                buf
            }
            Value::Ipv6(a) => {
                let mut buf = vec![0; 16];
                BigEndian::write_u128(&mut buf, u128::from(*a));
                buf
            }
            Value::Ether(e) => e.to_vec(),
            Value::Str(s) => {
                let mut buf = Vec::with_capacity(s.len() + 1);
                buf.extend_from_slice(s.as_bytes());
                buf.push(0);
                buf
            }
            Value::Flag | Value::Type(_) => Vec::new(),
        }
    }
}

impl From<IpAddr> for Value {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(a) => Value::Ipv4(a),
            IpAddr::V6(a) => Value::Ipv6(a),
        }
    }
}
