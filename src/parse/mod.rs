//! Field parsers: turn one textual option value into session attributes.
//!
//! Every parser has the [`ParseFn`] shape: it gets the session, the option
//! kind to fill and the raw token. Parsers validate the whole token before
//! writing, so a failed parse leaves previously stored attributes untouched.

pub mod ip;
pub mod name;
pub mod port;

pub use ip::{
    parse_ip, parse_ip4_single6, parse_ipnet, parse_iprange, parse_iptimeout, parse_net,
    parse_netrange, parse_range, parse_single_ip,
};
pub use name::{parse_after, parse_before, parse_name_compat, parse_setname, MAX_NAME_LEN};
pub use port::{
    parse_icmp, parse_icmpv6, parse_port, parse_proto, parse_proto_port, parse_single_tcp_port,
    parse_tcp_port, parse_tcpudp_port,
};

use crate::data::{Family, Opt, SessionData};
use crate::error::ParseError;
use crate::number::{parse_cidr, parse_u32, parse_u8};
use crate::session::{OutputMode, Session};
use crate::value::{Value, ETH_ALEN};

/// Common shape of all field parsers.
pub type ParseFn = fn(&mut Session<'_>, Opt, &str) -> Result<(), ParseError>;

/// Fail before any write if one of `opts` is already set.
pub(crate) fn check_free(data: &SessionData, opts: &[Opt]) -> Result<(), ParseError> {
    match opts.iter().find(|o| data.test_flag(**o)) {
        Some(o) => Err(ParseError::DuplicateOption(*o)),
        None => Ok(()),
    }
}

/// Parse `xx:xx:xx:xx:xx:xx`.
pub fn parse_ether(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Ether);
    let bad = || ParseError::NotAnEtherAddress(s.to_string());
    let b = s.as_bytes();
    if b.len() != ETH_ALEN * 3 - 1 {
        return Err(bad());
    }
    let mut ether = [0u8; ETH_ALEN];
    for (i, octet) in ether.iter_mut().enumerate() {
        let at = i * 3;
        if i + 1 < ETH_ALEN && b[at + 2] != b':' {
            return Err(bad());
        }
        let hi = (b[at] as char).to_digit(16).ok_or_else(bad)?;
        let lo = (b[at + 1] as char).to_digit(16).ok_or_else(bad)?;
        *octet = (hi * 16 + lo) as u8;
    }
    session.data_mut().set(opt, Value::Ether(ether))
}

pub fn parse_uint8(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    let value = parse_u8(s)?;
    session.data_mut().set(opt, Value::U8(value))
}

pub fn parse_uint32(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    let value = parse_u32(s)?;
    session.data_mut().set(opt, Value::U32(value))
}

/// Netmask prefix: 1-31 for IPv4, 4-124 for IPv6 (IPv4 when unspecified).
pub fn parse_netmask(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Netmask);
    let (min, max) = match session.data_mut().imply_family() {
        Family::Inet6 => (4, 124),
        _ => (1, 31),
    };
    let cidr = parse_cidr(s, min, max)?;
    session.data_mut().set(opt, Value::U8(cidr))
}

pub fn parse_family(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::Family);
    let family = match s {
        "inet" | "ipv4" | "-4" => Family::Inet,
        "inet6" | "ipv6" | "-6" => Family::Inet6,
        "any" | "unspec" => Family::Unspec,
        _ => return Err(ParseError::syntax(format!("unknown INET family {}", s))),
    };
    session.data_mut().set_family(family)
}

/// Presence-only option; the token is not looked at.
pub fn parse_flag(session: &mut Session<'_>, opt: Opt, _s: &str) -> Result<(), ParseError> {
    session.data_mut().set(opt, Value::Flag)
}

pub fn parse_output(session: &mut Session<'_>, _opt: Opt, s: &str) -> Result<(), ParseError> {
    let mode = match s {
        "plain" => OutputMode::Plain,
        "xml" => OutputMode::Xml,
        "save" => OutputMode::Save,
        _ => return Err(ParseError::syntax(format!("unknown output mode '{}'", s))),
    };
    session.set_output(mode);
    Ok(())
}

/// Deprecated option: warn once per option kind, never fail.
/// `optstr` is the option as the user spelled it.
pub fn parse_ignored(session: &mut Session<'_>, opt: Opt, optstr: &str) -> Result<(), ParseError> {
    if !session.data_mut().ignored(opt) {
        session.warn(format!(
            "Option {} is ignored. Please upgrade your syntax.",
            optstr
        ));
    }
    Ok(())
}

/// How a command line option is handled.
#[derive(Debug, Clone, Copy)]
pub enum Handler {
    Parse(ParseFn),
    /// Accepted for compatibility and dropped.
    Ignored,
}

/// Run the handler of option `optstr`, rejecting options given twice.
pub fn call_parser(
    session: &mut Session<'_>,
    handler: Handler,
    optstr: &str,
    opt: Opt,
    s: &str,
) -> Result<(), ParseError> {
    match handler {
        Handler::Ignored => parse_ignored(session, opt, optstr),
        Handler::Parse(parse) => {
            if session.data().test_flag(opt) {
                return Err(ParseError::DuplicateOption(opt));
            }
            parse(session, opt, s)
        }
    }
}
