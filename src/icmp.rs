//! Symbolic ICMP and ICMPv6 type/code names.
//!
//! Values are packed as `type << 8 | code`.

const fn tc(ty: u8, code: u8) -> u16 {
    ((ty as u16) << 8) | code as u16
}

const ICMP: &[(&str, u16)] = &[
    ("echo-reply", tc(0, 0)),
    ("pong", tc(0, 0)),
    ("network-unreachable", tc(3, 0)),
    ("host-unreachable", tc(3, 1)),
    ("protocol-unreachable", tc(3, 2)),
    ("port-unreachable", tc(3, 3)),
    ("fragmentation-needed", tc(3, 4)),
    ("source-route-failed", tc(3, 5)),
    ("network-unknown", tc(3, 6)),
    ("host-unknown", tc(3, 7)),
    ("network-prohibited", tc(3, 9)),
    ("host-prohibited", tc(3, 10)),
    ("TOS-network-unreachable", tc(3, 11)),
    ("TOS-host-unreachable", tc(3, 12)),
    ("communication-prohibited", tc(3, 13)),
    ("host-precedence-violation", tc(3, 14)),
    ("precedence-cutoff", tc(3, 15)),
    ("source-quench", tc(4, 0)),
    ("network-redirect", tc(5, 0)),
    ("host-redirect", tc(5, 1)),
    ("TOS-network-redirect", tc(5, 2)),
    ("TOS-host-redirect", tc(5, 3)),
    ("echo-request", tc(8, 0)),
    ("ping", tc(8, 0)),
    ("router-advertisement", tc(9, 0)),
    ("router-solicitation", tc(10, 0)),
    ("ttl-zero-during-transit", tc(11, 0)),
    ("ttl-zero-during-reassembly", tc(11, 1)),
    ("ip-header-bad", tc(12, 0)),
    ("required-option-missing", tc(12, 1)),
    ("timestamp-request", tc(13, 0)),
    ("timestamp-reply", tc(14, 0)),
    ("address-mask-request", tc(17, 0)),
    ("address-mask-reply", tc(18, 0)),
];

const ICMPV6: &[(&str, u16)] = &[
    ("no-route", tc(1, 0)),
    ("communication-prohibited", tc(1, 1)),
    ("address-unreachable", tc(1, 3)),
    ("port-unreachable", tc(1, 4)),
    ("packet-too-big", tc(2, 0)),
    ("ttl-zero-during-transit", tc(3, 0)),
    ("ttl-zero-during-reassembly", tc(3, 1)),
    ("bad-header", tc(4, 0)),
    ("unknown-header-type", tc(4, 1)),
    ("unknown-option", tc(4, 2)),
    ("echo-request", tc(128, 0)),
    ("ping", tc(128, 0)),
    ("echo-reply", tc(129, 0)),
    ("pong", tc(129, 0)),
    ("router-solicitation", tc(133, 0)),
    ("router-advertisement", tc(134, 0)),
    ("neighbour-solicitation", tc(135, 0)),
    ("neighbor-solicitation", tc(135, 0)),
    ("neighbour-advertisement", tc(136, 0)),
    ("neighbor-advertisement", tc(136, 0)),
    ("redirect", tc(137, 0)),
];

fn lookup(table: &[(&str, u16)], name: &str) -> Option<u16> {
    table
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| *v)
}

pub fn name_to_icmp(name: &str) -> Option<u16> {
    lookup(ICMP, name)
}

pub fn name_to_icmpv6(name: &str) -> Option<u16> {
    lookup(ICMPV6, name)
}

/// Canonical ICMP name for a packed type/code.
pub fn icmp_to_name(typecode: u16) -> Option<&'static str> {
    ICMP.iter().find(|(_, v)| *v == typecode).map(|(n, _)| *n)
}

pub fn icmpv6_to_name(typecode: u16) -> Option<&'static str> {
    ICMPV6.iter().find(|(_, v)| *v == typecode).map(|(n, _)| *n)
}
