//! IPv4/IPv6 addresses, networks and ranges.
//!
//! Hostnames are resolved, but only the first address of the requested
//! family is used; further addresses produce a warning. When no family is
//! set yet, IPv4 is assumed and becomes the session's family.

use super::check_free;
use crate::data::{Family, Opt};
use crate::error::ParseError;
use crate::number::{parse_cidr, parse_u32};
use crate::separator::Separator;
use crate::session::Session;
use crate::value::Value;
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddrType {
    Any,
    Plain,
    Net,
    Range,
}

fn family_of(addr: &IpAddr) -> Family {
    match addr {
        IpAddr::V4(_) => Family::Inet,
        IpAddr::V6(_) => Family::Inet6,
    }
}

fn resolve_addr(session: &mut Session<'_>, s: &str, family: Family) -> Result<IpAddr, ParseError> {
    if let Ok(addr) = s.parse::<IpAddr>() {
        if family_of(&addr) != family {
            return Err(ParseError::AddressFamilyMismatch(format!(
                "cannot parse {}: {} address expected",
                s,
                family.addr_name()
            )));
        }
        return Ok(addr);
    }

    let resolved = session.resolver().resolve(s).map_err(|e| {
        ParseError::Resolution(format!(
            "cannot resolve '{}' to an {} address: {}",
            s,
            family.addr_name(),
            e
        ))
    })?;
    let mut usable = resolved.into_iter().filter(|a| family_of(a) == family);
    let first = usable.next().ok_or_else(|| {
        ParseError::Resolution(format!(
            "cannot parse {}: {} address could not be resolved",
            s,
            family.addr_name()
        ))
    })?;
    if usable.next().is_some() {
        session.warn(format!(
            "{} resolves to multiple addresses: using only the first one returned by the resolver",
            s
        ));
    }
    log::debug!("resolved {} to {}", s, first);
    Ok(first)
}

fn companion(opt: Opt, found: Option<Opt>, what: &str) -> Result<Opt, ParseError> {
    found.ok_or_else(|| ParseError::Internal(format!("option {} has no {} slot", opt, what)))
}

fn parse_ipaddr(
    session: &mut Session<'_>,
    opt: Opt,
    s: &str,
    family: Family,
) -> Result<(), ParseError> {
    if let Some((addr, mask)) = Separator::Cidr.split(s) {
        let cidr_opt = companion(opt, opt.cidr(), "prefix length")?;
        let cidr = parse_cidr(mask, 0, family.max_cidr())?;
        let addr = resolve_addr(session, addr, family)?;
        let data = session.data_mut();
        check_free(data, &[opt, cidr_opt])?;
        data.set(opt, addr.into())?;
        data.set(cidr_opt, Value::U8(cidr))
    } else if let Some((from, to)) = Separator::Range.split(s) {
        let to_opt = companion(opt, opt.range_end(), "range end")?;
        log::debug!("range {} - {}", from, to);
        let from = resolve_addr(session, from, family)?;
        let to = resolve_addr(session, to, family)?;
        let data = session.data_mut();
        check_free(data, &[opt, to_opt])?;
        data.set(opt, from.into())?;
        data.set(to_opt, to.into())
    } else {
        let addr = resolve_addr(session, s, family)?;
        session.data_mut().set(opt, addr.into())
    }
}

/// `addr/32` or `addr/128`: a network that is a single host.
fn cidr_hostaddr(s: &str, family: Family) -> Option<&str> {
    let at = Separator::Cidr.find(s)?;
    let host = match family {
        Family::Inet6 => "/128",
        _ => "/32",
    };
    (&s[at..] == host).then(|| &s[..at])
}

fn parse_ip_as(
    session: &mut Session<'_>,
    opt: Opt,
    s: &str,
    addrtype: AddrType,
) -> Result<(), ParseError> {
    let family = session.data_mut().imply_family();
    let is_range = Separator::Range.contained_in(s);
    let is_net = Separator::Cidr.contained_in(s);

    let s = match addrtype {
        AddrType::Plain => {
            if is_range {
                return Err(ParseError::syntax(format!(
                    "plain IP address must be supplied: {}",
                    s
                )));
            }
            match (is_net, cidr_hostaddr(s, family)) {
                (false, _) => s,
                (true, Some(host)) => host,
                (true, None) => {
                    return Err(ParseError::syntax(format!(
                        "plain IP address must be supplied: {}",
                        s
                    )))
                }
            }
        }
        AddrType::Net => {
            if !is_net || is_range {
                return Err(ParseError::syntax(format!(
                    "IP/netblock must be supplied: {}",
                    s
                )));
            }
            s
        }
        AddrType::Range => {
            if !is_range || is_net {
                return Err(ParseError::syntax(format!(
                    "IP-IP range must be supplied: {}",
                    s
                )));
            }
            s
        }
        AddrType::Any => s,
    };

    parse_ipaddr(session, opt, s, family)
}

/// Address, `address/cidr` or `address-address`.
pub fn parse_ip(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Ip | Opt::Ip2));
    parse_ip_as(session, opt, s, AddrType::Any)
}

/// A single address or hostname. A host-length prefix (`/32`, `/128`) is accepted.
pub fn parse_single_ip(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Ip | Opt::IpTo | Opt::Ip2 | Opt::Ip2To));
    parse_ip_as(session, opt, s, AddrType::Plain)
}

/// `address/cidr` only.
pub fn parse_net(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Ip | Opt::Ip2));
    parse_ip_as(session, opt, s, AddrType::Net)
}

/// `address-address` only.
pub fn parse_range(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Ip | Opt::Ip2));
    parse_ip_as(session, opt, s, AddrType::Range)
}

/// `address/cidr` or `address-address`.
pub fn parse_netrange(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Ip | Opt::Ip2));
    if !(Separator::Range.contained_in(s) || Separator::Cidr.contained_in(s)) {
        return Err(ParseError::syntax(format!(
            "IP/cidr or IP-IP range must be specified: {}",
            s
        )));
    }
    parse_ip_as(session, opt, s, AddrType::Any)
}

/// Address or `address-address`.
pub fn parse_iprange(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Ip | Opt::Ip2));
    if Separator::Cidr.contained_in(s) {
        return Err(ParseError::syntax(format!(
            "IP address or IP-IP range must be specified: {}",
            s
        )));
    }
    parse_ip_as(session, opt, s, AddrType::Any)
}

/// Address or `address/cidr`.
pub fn parse_ipnet(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Ip | Opt::Ip2));
    if Separator::Range.contained_in(s) {
        return Err(ParseError::syntax(format!(
            "IP address or IP/cidr must be specified: {}",
            s
        )));
    }
    parse_ip_as(session, opt, s, AddrType::Any)
}

/// IPv4 address, network or range; IPv6 single address.
pub fn parse_ip4_single6(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert!(matches!(opt, Opt::Ip | Opt::Ip2));
    match session.data_mut().imply_family() {
        Family::Inet6 => parse_single_ip(session, opt, s),
        _ => parse_ip(session, opt, s),
    }
}

/// Legacy `address,timeout` element.
pub fn parse_iptimeout(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Ip);
    if session.data().test_flag(Opt::Timeout) {
        return Err(ParseError::syntax(
            "mixed syntax, timeout already specified",
        ));
    }
    let (addr, timeout) =
        Separator::Elem.split(s).ok_or_else(|| ParseError::MissingSeparator(s.to_string()))?;
    let timeout = parse_u32(timeout)?;
    parse_ip_as(session, opt, addr, AddrType::Any)?;
    session.data_mut().set(Opt::Timeout, Value::U32(timeout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::resolve::StaticResolver;
    use crate::types::TypeRegistry;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn v4(s: &str) -> Value {
        Value::Ipv4(s.parse::<Ipv4Addr>().unwrap())
    }

    #[test]
    fn network_sets_address_and_mask() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_ip(&mut s, Opt::Ip, "192.0.2.10/24").unwrap();
        assert_eq!(s.data().get(Opt::Ip), Some(&v4("192.0.2.10")));
        assert_eq!(s.data().get(Opt::Cidr), Some(&Value::U8(24)));
        assert_eq!(s.data().family(), Family::Inet);
    }

    #[test]
    fn second_address_uses_second_mask_slot() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_ip(&mut s, Opt::Ip2, "10.0.0.0/8").unwrap();
        assert_eq!(s.data().get(Opt::Cidr2), Some(&Value::U8(8)));
        assert!(s.data().get(Opt::Cidr).is_none());
    }

    #[test]
    fn cidr_bound_depends_on_family() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        let err = parse_ip(&mut s, Opt::Ip, "192.0.2.0/33").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(s.data().get(Opt::Ip).is_none());

        let mut s = Session::new(&reg);
        s.data_mut().set_family(Family::Inet6).unwrap();
        parse_ip(&mut s, Opt::Ip, "2001:db8::/64").unwrap();
        assert_eq!(s.data().get(Opt::Cidr), Some(&Value::U8(64)));
    }

    #[test]
    fn single_host_prefix_is_plain_address() {
        let reg = TypeRegistry::builtin();
        let mut a = Session::new(&reg);
        let mut b = Session::new(&reg);
        parse_single_ip(&mut a, Opt::Ip, "192.0.2.10/32").unwrap();
        parse_single_ip(&mut b, Opt::Ip, "192.0.2.10").unwrap();
        assert_eq!(a.data().get(Opt::Ip), b.data().get(Opt::Ip));
        assert!(a.data().get(Opt::Cidr).is_none());

        let mut s = Session::new(&reg);
        assert!(parse_single_ip(&mut s, Opt::Ip, "192.0.2.10/24").is_err());
        assert!(parse_single_ip(&mut s, Opt::Ip, "192.0.2.1-192.0.2.2").is_err());
    }

    #[test]
    fn ipv6_host_prefix() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        s.data_mut().set_family(Family::Inet6).unwrap();
        parse_single_ip(&mut s, Opt::Ip, "2001:db8::1/128").unwrap();
        assert_eq!(
            s.data().get(Opt::Ip),
            Some(&Value::Ipv6("2001:db8::1".parse::<Ipv6Addr>().unwrap()))
        );
    }

    #[test]
    fn strict_variants_check_separators() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        assert!(parse_net(&mut s, Opt::Ip, "192.0.2.1").is_err());
        assert!(parse_range(&mut s, Opt::Ip, "192.0.2.0/24").is_err());
        assert!(parse_netrange(&mut s, Opt::Ip, "192.0.2.1").is_err());
        assert!(parse_iprange(&mut s, Opt::Ip, "192.0.2.0/24").is_err());
        assert!(parse_ipnet(&mut s, Opt::Ip, "192.0.2.1-192.0.2.3").is_err());
        assert!(s.data().get(Opt::Ip).is_none());
    }

    #[test]
    fn range_rejects_cidr_too() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        let err = parse_range(&mut s, Opt::Ip, "192.0.2.10-192.0.2.20/24").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn other_family_literal_is_mismatch() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        let err = parse_ip(&mut s, Opt::Ip, "192.0.2.1-2001:db8::1").unwrap_err();
        assert!(matches!(err, ParseError::AddressFamilyMismatch(_)));
        assert!(s.data().get(Opt::Ip).is_none());
    }

    #[test]
    fn hostname_first_address_wins_with_warning() {
        let reg = TypeRegistry::builtin();
        let resolver = StaticResolver::new().with_host(
            "web",
            &[
                "2001:db8::5".parse().unwrap(),
                "198.51.100.7".parse().unwrap(),
                "198.51.100.8".parse().unwrap(),
            ],
        );
        let mut s = Session::new(&reg).with_resolver(&resolver);
        parse_ip(&mut s, Opt::Ip, "web").unwrap();
        assert_eq!(s.data().get(Opt::Ip), Some(&v4("198.51.100.7")));
        assert_eq!(s.warnings().len(), 1);
        assert!(s.warnings()[0].contains("multiple addresses"));
    }

    #[test]
    fn unresolvable_host_is_resolution_error() {
        let reg = TypeRegistry::builtin();
        let resolver = StaticResolver::new().with_host("v6only", &["2001:db8::5".parse().unwrap()]);
        let mut s = Session::new(&reg).with_resolver(&resolver);
        for host in ["missing", "v6only"] {
            let err = parse_ip(&mut s, Opt::Ip, host).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Resolution, "{}", host);
        }
    }

    #[test]
    fn ip4_single6_follows_family() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_ip4_single6(&mut s, Opt::Ip, "192.0.2.0/24").unwrap();

        let mut s = Session::new(&reg);
        s.data_mut().set_family(Family::Inet6).unwrap();
        assert!(parse_ip4_single6(&mut s, Opt::Ip, "2001:db8::/64").is_err());
        parse_ip4_single6(&mut s, Opt::Ip, "2001:db8::1").unwrap();
    }

    #[test]
    fn iptimeout_compat() {
        let reg = TypeRegistry::builtin();
        let mut s = Session::new(&reg);
        parse_iptimeout(&mut s, Opt::Ip, "192.0.2.1,600").unwrap();
        assert_eq!(s.data().get(Opt::Ip), Some(&v4("192.0.2.1")));
        assert_eq!(s.data().get(Opt::Timeout), Some(&Value::U32(600)));

        let mut s = Session::new(&reg);
        assert!(matches!(
            parse_iptimeout(&mut s, Opt::Ip, "192.0.2.1").unwrap_err(),
            ParseError::MissingSeparator(_)
        ));
        assert!(parse_iptimeout(&mut s, Opt::Ip, "192.0.2.1,soon").is_err());
        assert!(s.data().get(Opt::Ip).is_none());
    }
}
