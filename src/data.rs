//! Session data: the typed attribute store filled in by the parsers.
//!
//! One [`SessionData`] lives for exactly one command. Every successful
//! [`SessionData::set`] raises the option's set-bit; bits are never cleared,
//! which is how repeated options are detected.

use crate::error::ParseError;
use crate::types::SetType;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Option kinds: one attribute slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opt {
    SetName,
    TypeName,
    Type,
    Family,
    Ip,
    IpTo,
    Cidr,
    Ip2,
    Ip2To,
    Cidr2,
    Port,
    PortTo,
    Proto,
    Ether,
    Timeout,
    Gc,
    HashSize,
    MaxElem,
    Netmask,
    Probes,
    Resize,
    Size,
    Name,
    NameRef,
    Before,
    SetName2,
    Exist,
}

impl Opt {
    fn bit(self) -> u64 {
        1u64 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            Opt::SetName => "setname",
            Opt::TypeName => "typename",
            Opt::Type => "type",
            Opt::Family => "family",
            Opt::Ip => "ip",
            Opt::IpTo => "ip-to",
            Opt::Cidr => "cidr",
            Opt::Ip2 => "ip2",
            Opt::Ip2To => "ip2-to",
            Opt::Cidr2 => "cidr2",
            Opt::Port => "port",
            Opt::PortTo => "port-to",
            Opt::Proto => "proto",
            Opt::Ether => "ether",
            Opt::Timeout => "timeout",
            Opt::Gc => "gc",
            Opt::HashSize => "hashsize",
            Opt::MaxElem => "maxelem",
            Opt::Netmask => "netmask",
            Opt::Probes => "probes",
            Opt::Resize => "resize",
            Opt::Size => "size",
            Opt::Name => "name",
            Opt::NameRef => "nameref",
            Opt::Before => "before",
            Opt::SetName2 => "setname2",
            Opt::Exist => "exist",
        }
    }

    /// Slot holding the upper end of a range starting at `self`.
    pub fn range_end(self) -> Option<Opt> {
        match self {
            Opt::Ip => Some(Opt::IpTo),
            Opt::Ip2 => Some(Opt::Ip2To),
            Opt::Port => Some(Opt::PortTo),
            _ => None,
        }
    }

    /// Slot holding the prefix length of a network at `self`.
    pub fn cidr(self) -> Option<Opt> {
        match self {
            Opt::Ip | Opt::IpTo => Some(Opt::Cidr),
            Opt::Ip2 | Opt::Ip2To => Some(Opt::Cidr2),
            _ => None,
        }
    }
}

impl fmt::Display for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Address family governing validation bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Family {
    #[default]
    Unspec,
    Inet,
    Inet6,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Family::Unspec => "UNSPEC",
            Family::Inet => "INET",
            Family::Inet6 => "INET6",
        }
    }

    pub fn addr_name(self) -> &'static str {
        match self {
            Family::Inet6 => "IPv6",
            _ => "IPv4",
        }
    }

    /// Maximal prefix length for addresses of this family.
    pub fn max_cidr(self) -> u8 {
        match self {
            Family::Inet6 => 128,
            _ => 32,
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionData {
    values: HashMap<Opt, Value>,
    flags: u64,
    ignored: u64,
    family: Family,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `opt`. An option can be set once per command.
    pub fn set(&mut self, opt: Opt, value: Value) -> Result<(), ParseError> {
        if self.test_flag(opt) {
            return Err(ParseError::DuplicateOption(opt));
        }
        self.values.insert(opt, value);
        self.flags |= opt.bit();
        Ok(())
    }

    pub fn get(&self, opt: Opt) -> Option<&Value> {
        self.values.get(&opt)
    }

    pub fn test_flag(&self, opt: Opt) -> bool {
        self.flags & opt.bit() != 0
    }

    pub fn family(&self) -> Family {
        self.family
    }

    /// Default an unspecified family to IPv4 and return the active one.
    /// Does not raise the family set-bit: the user may still name it.
    pub fn imply_family(&mut self) -> Family {
        if self.family == Family::Unspec {
            self.family = Family::Inet;
        }
        self.family
    }

    /// Record a user supplied family. A concrete family already implied by an
    /// address cannot be switched to the other one.
    pub fn set_family(&mut self, family: Family) -> Result<(), ParseError> {
        if self.test_flag(Opt::Family) {
            return Err(ParseError::DuplicateOption(Opt::Family));
        }
        if self.family != Family::Unspec && family != Family::Unspec && self.family != family {
            return Err(ParseError::AddressFamilyMismatch(format!(
                "family {} conflicts with already used family {}",
                family.name(),
                self.family.name()
            )));
        }
        if family != Family::Unspec || self.family == Family::Unspec {
            self.family = family;
        }
        self.flags |= Opt::Family.bit();
        Ok(())
    }

    /// Mark `opt` as ignored; returns whether it was already marked.
    pub fn ignored(&mut self, opt: Opt) -> bool {
        let seen = self.ignored & opt.bit() != 0;
        self.ignored |= opt.bit();
        seen
    }

    pub fn set_type(&self) -> Option<&Arc<SetType>> {
        self.get(Opt::Type).and_then(Value::as_type)
    }

    /// Stored attributes in option order.
    pub fn iter(&self) -> impl Iterator<Item = (Opt, &Value)> {
        let mut all: Vec<_> = self.values.iter().map(|(o, v)| (*o, v)).collect();
        all.sort_by_key(|(o, _)| *o);
        all.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_set_is_duplicate_and_keeps_first_value() {
        let mut data = SessionData::new();
        data.set(Opt::Timeout, Value::U32(10)).unwrap();
        let err = data.set(Opt::Timeout, Value::U32(20)).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateOption(Opt::Timeout)));
        assert_eq!(data.get(Opt::Timeout), Some(&Value::U32(10)));
    }

    #[test]
    fn set_raises_only_its_own_bit() {
        let mut data = SessionData::new();
        data.set(Opt::Port, Value::U16(80)).unwrap();
        assert!(data.test_flag(Opt::Port));
        assert!(!data.test_flag(Opt::PortTo));
        assert!(data.get(Opt::PortTo).is_none());
    }

    #[test]
    fn implied_family_is_sticky() {
        let mut data = SessionData::new();
        assert_eq!(data.family(), Family::Unspec);
        assert_eq!(data.imply_family(), Family::Inet);
        assert!(!data.test_flag(Opt::Family));
        assert!(data.set_family(Family::Inet6).is_err());
        assert_eq!(data.family(), Family::Inet);
    }

    #[test]
    fn family_can_be_named_after_matching_implication() {
        let mut data = SessionData::new();
        data.imply_family();
        data.set_family(Family::Inet).unwrap();
        assert!(matches!(
            data.set_family(Family::Inet),
            Err(ParseError::DuplicateOption(Opt::Family))
        ));
    }

    #[test]
    fn ignored_reports_first_sight_once() {
        let mut data = SessionData::new();
        assert!(!data.ignored(Opt::Probes));
        assert!(data.ignored(Opt::Probes));
        assert!(!data.ignored(Opt::Resize));
    }

    #[test]
    fn companions() {
        assert_eq!(Opt::Ip.range_end(), Some(Opt::IpTo));
        assert_eq!(Opt::Ip2.cidr(), Some(Opt::Cidr2));
        assert_eq!(Opt::Port.range_end(), Some(Opt::PortTo));
        assert_eq!(Opt::Name.cidr(), None);
    }
}
