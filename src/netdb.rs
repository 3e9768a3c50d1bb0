//! Protocol and service name lookup.
//!
//! [`StaticNetdb`] carries the well-known entries; [`FileNetdb`] reads files in
//! the `/etc/protocols` and `/etc/services` formats. Lookups are
//! case-insensitive.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

pub const IPPROTO_ICMP: u8 = 1;
pub const IPPROTO_TCP: u8 = 6;
pub const IPPROTO_UDP: u8 = 17;
pub const IPPROTO_ICMPV6: u8 = 58;

pub trait Netdb {
    /// Protocol number for a protocol name or alias.
    fn protocol(&self, name: &str) -> Option<u8>;
    /// Port of service `name` for protocol `proto` ("tcp", "udp", ...).
    fn service(&self, name: &str, proto: &str) -> Option<u16>;
}

const PROTOCOLS: &[(&str, u8)] = &[
    ("ip", 0),
    ("hopopt", 0),
    ("icmp", 1),
    ("igmp", 2),
    ("ipencap", 4),
    ("tcp", 6),
    ("egp", 8),
    ("udp", 17),
    ("ipv6", 41),
    ("ipv6-route", 43),
    ("ipv6-frag", 44),
    ("rsvp", 46),
    ("gre", 47),
    ("esp", 50),
    ("ah", 51),
    ("ipv6-icmp", 58),
    ("ipv6-nonxt", 59),
    ("ipv6-opts", 60),
    ("ospf", 89),
    ("pim", 103),
    ("vrrp", 112),
    ("l2tp", 115),
    ("sctp", 132),
    ("udplite", 136),
];

const SERVICES: &[(&str, u16, &[&str])] = &[
    ("ftp-data", 20, &["tcp"]),
    ("ftp", 21, &["tcp"]),
    ("ssh", 22, &["tcp"]),
    ("telnet", 23, &["tcp"]),
    ("smtp", 25, &["tcp"]),
    ("domain", 53, &["tcp", "udp"]),
    ("bootps", 67, &["udp"]),
    ("bootpc", 68, &["udp"]),
    ("tftp", 69, &["udp"]),
    ("http", 80, &["tcp", "udp"]),
    ("www", 80, &["tcp", "udp"]),
    ("pop3", 110, &["tcp"]),
    ("ntp", 123, &["udp"]),
    ("imap", 143, &["tcp"]),
    ("snmp", 161, &["tcp", "udp"]),
    ("bgp", 179, &["tcp"]),
    ("ldap", 389, &["tcp", "udp"]),
    ("https", 443, &["tcp", "udp"]),
    ("syslog", 514, &["udp"]),
    ("submission", 587, &["tcp"]),
    ("ldaps", 636, &["tcp"]),
    ("imaps", 993, &["tcp"]),
    ("pop3s", 995, &["tcp"]),
    ("openvpn", 1194, &["tcp", "udp"]),
    ("mysql", 3306, &["tcp"]),
    ("postgresql", 5432, &["tcp"]),
];

/// Built-in protocol and service tables.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticNetdb;

impl Netdb for StaticNetdb {
    fn protocol(&self, name: &str) -> Option<u8> {
        PROTOCOLS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, p)| *p)
    }

    fn service(&self, name: &str, proto: &str) -> Option<u16> {
        SERVICES
            .iter()
            .find(|(n, _, protos)| {
                n.eq_ignore_ascii_case(name) && protos.iter().any(|p| p.eq_ignore_ascii_case(proto))
            })
            .map(|(_, port, _)| *port)
    }
}

/// Tables loaded from `protocols(5)` and `services(5)` formatted files.
#[derive(Debug, Default, Clone)]
pub struct FileNetdb {
    protocols: HashMap<String, u8>,
    services: HashMap<(String, String), u16>,
}

impl FileNetdb {
    pub fn load(protocols: impl AsRef<Path>, services: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::from_sources(
            &fs::read_to_string(protocols)?,
            &fs::read_to_string(services)?,
        ))
    }

    /// The files found on this host.
    pub fn system() -> io::Result<Self> {
        Self::load("/etc/protocols", "/etc/services")
    }

    /// Build from file contents. Malformed lines are skipped.
    pub fn from_sources(protocols: &str, services: &str) -> Self {
        let mut db = FileNetdb::default();
        // protocol-name number [aliases...]
        for line in entries(protocols) {
            let mut words = line.split_whitespace();
            let (Some(name), Some(number)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(number) = number.parse::<u8>() else {
                continue;
            };
            for n in std::iter::once(name).chain(words) {
                db.protocols.entry(n.to_ascii_lowercase()).or_insert(number);
            }
        }
        // service-name port/protocol [aliases...]
        for line in entries(services) {
            let mut words = line.split_whitespace();
            let (Some(name), Some(port_proto)) = (words.next(), words.next()) else {
                continue;
            };
            let Some((port, proto)) = port_proto.split_once('/') else {
                continue;
            };
            let Ok(port) = port.parse::<u16>() else {
                continue;
            };
            let proto = proto.to_ascii_lowercase();
            for n in std::iter::once(name).chain(words) {
                db.services
                    .entry((n.to_ascii_lowercase(), proto.clone()))
                    .or_insert(port);
            }
        }
        db
    }
}

fn entries(source: &str) -> impl Iterator<Item = &str> {
    source
        .lines()
        .map(|l| l.split('#').next().unwrap_or("").trim())
        .filter(|l| !l.is_empty())
}

impl Netdb for FileNetdb {
    fn protocol(&self, name: &str) -> Option<u8> {
        self.protocols.get(&name.to_ascii_lowercase()).copied()
    }

    fn service(&self, name: &str, proto: &str) -> Option<u16> {
        self.services
            .get(&(name.to_ascii_lowercase(), proto.to_ascii_lowercase()))
            .copied()
    }
}
