//! Ports, protocols and ICMP/ICMPv6 type/codes.

use super::check_free;
use crate::data::{Family, Opt};
use crate::error::ParseError;
use crate::icmp::{name_to_icmp, name_to_icmpv6};
use crate::netdb::{IPPROTO_ICMP, IPPROTO_ICMPV6, IPPROTO_TCP, IPPROTO_UDP};
use crate::number::{parse_u16, parse_u8};
use crate::separator::Separator;
use crate::session::Session;
use crate::value::Value;

/// Try each strategy in order. The first success wins and the failures of
/// earlier strategies are discarded; if all fail, the last failure is returned.
fn first_ok<T>(attempts: &[&dyn Fn() -> Result<T, ParseError>]) -> Result<T, ParseError> {
    let mut last = ParseError::Internal("no parse strategy".to_string());
    for attempt in attempts {
        match attempt() {
            Ok(v) => return Ok(v),
            Err(e) => last = e,
        }
    }
    Err(last)
}

/// Port number or service name of `proto`.
fn port_value(session: &Session<'_>, s: &str, proto: &str) -> Result<u16, ParseError> {
    let netdb = session.netdb();
    first_ok::<u16>(&[&|| parse_u16(s), &|| {
        netdb.service(s, proto).ok_or_else(|| {
            ParseError::syntax(format!("cannot parse '{}' as a {} port", s, proto))
        })
    }])
}

/// `port` or `port-port`.
fn port_range(
    session: &Session<'_>,
    s: &str,
    proto: &str,
) -> Result<(u16, Option<u16>), ParseError> {
    match Separator::Range.split(s) {
        Some((from, to)) => Ok((
            port_value(session, from, proto)?,
            Some(port_value(session, to, proto)?),
        )),
        None => Ok((port_value(session, s, proto)?, None)),
    }
}

fn store_ports(
    session: &mut Session<'_>,
    opt: Opt,
    from: u16,
    to: Option<u16>,
) -> Result<(), ParseError> {
    let data = session.data_mut();
    match to {
        Some(to) => {
            let to_opt = opt.range_end().ok_or_else(|| {
                ParseError::Internal(format!("option {} has no range end slot", opt))
            })?;
            check_free(data, &[opt, to_opt])?;
            data.set(opt, Value::U16(from))?;
            data.set(to_opt, Value::U16(to))
        }
        None => data.set(opt, Value::U16(from)),
    }
}

/// Single port number or `proto` service name.
pub fn parse_port(
    session: &mut Session<'_>,
    opt: Opt,
    s: &str,
    proto: &str,
) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Port | Opt::PortTo));
    let port = port_value(session, s, proto)?;
    session.data_mut().set(opt, Value::U16(port))
}

/// TCP/UDP port, service name, or a dash separated range of them.
pub fn parse_tcpudp_port(
    session: &mut Session<'_>,
    opt: Opt,
    s: &str,
    proto: &str,
) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Port);
    let (from, to) = port_range(session, s, proto)?;
    store_ports(session, opt, from, to)
}

pub fn parse_tcp_port(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    parse_tcpudp_port(session, opt, s, "tcp")
}

pub fn parse_single_tcp_port(
    session: &mut Session<'_>,
    opt: Opt,
    s: &str,
) -> Result<(), ParseError> {
    parse_port(session, opt, s, "tcp")
}

fn proto_number(session: &Session<'_>, s: &str) -> Result<u8, ParseError> {
    let name = if s.eq_ignore_ascii_case("icmpv6") {
        "ipv6-icmp"
    } else {
        s
    };
    match session.netdb().protocol(name) {
        None => Err(ParseError::syntax(format!(
            "cannot parse '{}' as a protocol name",
            s
        ))),
        Some(0) => Err(ParseError::syntax(format!("Unsupported protocol '{}'", s))),
        Some(p) => Ok(p),
    }
}

/// Protocol name (`icmpv6` is accepted for `ipv6-icmp`).
pub fn parse_proto(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Proto);
    let proto = proto_number(session, s)?;
    session.data_mut().set(opt, Value::U8(proto))
}

/// Numeric `type/code`, each 0-255.
fn icmp_typecode(s: &str, family: &str) -> Result<u16, ParseError> {
    let (ty, code) = Separator::Cidr.split(s).ok_or_else(|| {
        ParseError::syntax(format!("Cannot parse {} as an {} type/code.", s, family))
    })?;
    let ty = parse_u8(ty)?;
    let code = parse_u8(code)?;
    Ok(((ty as u16) << 8) | code as u16)
}

fn icmp_value(s: &str) -> Result<u16, ParseError> {
    match name_to_icmp(s) {
        Some(tc) => Ok(tc),
        None => icmp_typecode(s, "ICMP"),
    }
}

fn icmpv6_value(s: &str) -> Result<u16, ParseError> {
    match name_to_icmpv6(s) {
        Some(tc) => Ok(tc),
        None => icmp_typecode(s, "ICMPv6"),
    }
}

/// ICMP name or `type/code`.
pub fn parse_icmp(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Port);
    let tc = icmp_value(s)?;
    session.data_mut().set(opt, Value::U16(tc))
}

/// ICMPv6 name or `type/code`.
pub fn parse_icmpv6(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Port);
    let tc = icmpv6_value(s)?;
    session.data_mut().set(opt, Value::U16(tc))
}

/// What follows the protocol in `proto:port`.
enum PortPart {
    Ports(u16, Option<u16>),
    TypeCode(u16),
    /// Protocols without ports, pseudo port `0`.
    Pseudo,
}

/// `[proto:]port`. The protocol defaults to TCP. ICMP and ICMPv6 take a
/// type/code and need the matching family already in effect; other
/// port-less protocols only take the pseudo port `0`.
pub fn parse_proto_port(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Port);
    let (proto_str, port) = Separator::Proto.split(s).unwrap_or(("tcp", s));
    let proto = proto_number(session, proto_str)?;

    let family = session.data().family();
    let part = match proto {
        IPPROTO_TCP => {
            let (from, to) = port_range(session, port, "tcp")?;
            PortPart::Ports(from, to)
        }
        IPPROTO_UDP => {
            let (from, to) = port_range(session, port, "udp")?;
            PortPart::Ports(from, to)
        }
        IPPROTO_ICMP => {
            if family != Family::Inet {
                return Err(ParseError::ProtocolFamilyMismatch {
                    proto: "ICMP",
                    family: Family::Inet.name(),
                });
            }
            PortPart::TypeCode(icmp_value(port)?)
        }
        IPPROTO_ICMPV6 => {
            if family != Family::Inet6 {
                return Err(ParseError::ProtocolFamilyMismatch {
                    proto: "ICMPv6",
                    family: Family::Inet6.name(),
                });
            }
            PortPart::TypeCode(icmpv6_value(port)?)
        }
        _ => {
            if port != "0" {
                return Err(ParseError::syntax(format!(
                    "Protocol {} can be used with pseudo port value 0 only.",
                    proto_str
                )));
            }
            PortPart::Pseudo
        }
    };

    let mut slots = vec![Opt::Proto, opt];
    if let (PortPart::Ports(_, Some(_)), Some(end)) = (&part, opt.range_end()) {
        slots.push(end);
    }
    check_free(session.data(), &slots)?;
    session.data_mut().set(Opt::Proto, Value::U8(proto))?;
    match part {
        PortPart::Ports(from, to) => store_ports(session, opt, from, to),
        PortPart::TypeCode(tc) => session.data_mut().set(opt, Value::U16(tc)),
        PortPart::Pseudo => session.data_mut().set(opt, Value::Flag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::TypeRegistry;

    #[test]
    fn number_and_service_name_agree() {
        let reg = TypeRegistry::builtin();
        let mut a = Session::new(&reg);
        let mut b = Session::new(&reg);
        parse_port(&mut a, Opt::Port, "80", "tcp").unwrap();
        parse_port(&mut b, Opt::Port, "http", "tcp").unwrap();
        assert_eq!(a.data().get(Opt::Port), Some(&Value::U16(80)));
        assert_eq!(a.data().get(Opt::Port), b.data().get(Opt::Port));
    }

    #[test]
    fn failed_service_lookup_reports_name_error() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        let err = parse_port(&mut s, Opt::Port, "nosuch", "tcp").unwrap_err();
        assert!(err.to_string().contains("as a tcp port"), "{}", err);
    }

    #[test]
    fn port_range() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_tcp_port(&mut s, Opt::Port, "80-90").unwrap();
        assert_eq!(s.data().get(Opt::Port), Some(&Value::U16(80)));
        assert_eq!(s.data().get(Opt::PortTo), Some(&Value::U16(90)));
    }

    #[test]
    fn bad_range_end_writes_nothing() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        assert!(parse_tcp_port(&mut s, Opt::Port, "80-70000").is_err());
        assert!(s.data().get(Opt::Port).is_none());
        assert!(s.data().get(Opt::PortTo).is_none());
    }

    #[test]
    fn icmp_type_code_packing() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_icmp(&mut s, Opt::Port, "3/1").unwrap();
        assert_eq!(s.data().get(Opt::Port), Some(&Value::U16((3 << 8) | 1)));

        let mut s = Session::new(&reg);
        parse_icmp(&mut s, Opt::Port, "echo-reply").unwrap();
        assert_eq!(s.data().get(Opt::Port), Some(&Value::U16(0)));

        let mut s = Session::new(&reg);
        assert_eq!(
            parse_icmp(&mut s, Opt::Port, "3/256").unwrap_err().kind(),
            ErrorKind::Range
        );
        assert!(parse_icmp(&mut s, Opt::Port, "no-such-name").is_err());
    }

    #[test]
    fn proto_names() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_proto(&mut s, Opt::Proto, "icmpv6").unwrap();
        assert_eq!(s.data().get(Opt::Proto), Some(&Value::U8(IPPROTO_ICMPV6)));

        let mut s = Session::new(&reg);
        assert!(parse_proto(&mut s, Opt::Proto, "ip").is_err());
        assert!(parse_proto(&mut s, Opt::Proto, "bogus").is_err());
    }

    #[test]
    fn proto_port_defaults_to_tcp() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_proto_port(&mut s, Opt::Port, "22").unwrap();
        assert_eq!(s.data().get(Opt::Proto), Some(&Value::U8(IPPROTO_TCP)));
        assert_eq!(s.data().get(Opt::Port), Some(&Value::U16(22)));
    }

    #[test]
    fn proto_port_udp_service_range() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_proto_port(&mut s, Opt::Port, "udp:domain-1024").unwrap();
        assert_eq!(s.data().get(Opt::Proto), Some(&Value::U8(IPPROTO_UDP)));
        assert_eq!(s.data().get(Opt::Port), Some(&Value::U16(53)));
        assert_eq!(s.data().get(Opt::PortTo), Some(&Value::U16(1024)));
    }

    #[test]
    fn proto_port_icmp_family_checks() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        s.data_mut().set_family(Family::Inet6).unwrap();
        let err = parse_proto_port(&mut s, Opt::Port, "icmp:echo-request").unwrap_err();
        assert!(matches!(err, ParseError::ProtocolFamilyMismatch { proto: "ICMP", .. }));
        assert!(s.data().get(Opt::Proto).is_none());
        parse_proto_port(&mut s, Opt::Port, "icmpv6:echo-request").unwrap();
        assert_eq!(s.data().get(Opt::Port), Some(&Value::U16(128 << 8)));

        let mut s = Session::new(&reg);
        s.data_mut().imply_family();
        assert!(parse_proto_port(&mut s, Opt::Port, "icmpv6:1/0").is_err());
        parse_proto_port(&mut s, Opt::Port, "icmp:8/0").unwrap();
        assert_eq!(s.data().get(Opt::Port), Some(&Value::U16(8 << 8)));

        for proto_port in ["icmp:echo-request", "icmpv6:echo-request"] {
            let mut s = Session::new(&reg);
            let err = parse_proto_port(&mut s, Opt::Port, proto_port).unwrap_err();
            assert!(
                matches!(err, ParseError::ProtocolFamilyMismatch { .. }),
                "{}",
                proto_port
            );
            assert!(s.data().get(Opt::Proto).is_none());
            assert!(s.data().get(Opt::Port).is_none());
        }
    }

    #[test]
    fn portless_protocol_takes_pseudo_port_zero() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        let err = parse_proto_port(&mut s, Opt::Port, "gre:5").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax error: Protocol gre can be used with pseudo port value 0 only."
        );
        parse_proto_port(&mut s, Opt::Port, "gre:0").unwrap();
        assert_eq!(s.data().get(Opt::Proto), Some(&Value::U8(47)));
        assert_eq!(s.data().get(Opt::Port), Some(&Value::Flag));
    }
}
