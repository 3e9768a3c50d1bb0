//! Set types and element parsing.
//!
//! A [`SetType`] declares how many comma separated parts an element of the
//! set carries (its [`Dimension`]) and which option/parser pair handles each
//! part. The [`TypeRegistry`] maps type names (and legacy aliases) to
//! descriptors; it is built once and shared read-only by every session.
//!
//! [`parse_typename`] stores the active descriptor in the session data,
//! [`parse_elem`] then dispatches element strings through it.

use crate::data::{Family, Opt};
use crate::error::{dup, ParseError};
use crate::parse::{self, ParseFn, MAX_NAME_LEN};
use crate::separator::Separator;
use crate::session::Session;
use crate::value::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dimension {
    One = 1,
    Two = 2,
    Three = 3,
}

impl Dimension {
    pub fn count(self) -> usize {
        self as usize
    }
}

/// Option kind and parser of one element part.
#[derive(Debug, Clone, Copy)]
pub struct Elem {
    pub opt: Opt,
    pub parse: ParseFn,
}

#[derive(Debug, Clone)]
pub struct SetType {
    pub name: String,
    pub aliases: Vec<String>,
    pub revision: u8,
    /// `Unspec` when both families are supported.
    pub family: Family,
    pub dimension: Dimension,
    pub elems: [Option<Elem>; 3],
    /// Legacy parser for a separated string given to a one-part type.
    pub compat: Option<ParseFn>,
}

impl PartialEq for SetType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.revision == other.revision
    }
}

impl SetType {
    pub fn new(name: &str, family: Family, dimension: Dimension) -> Self {
        SetType {
            name: name.to_string(),
            aliases: Vec::new(),
            revision: 0,
            family,
            dimension,
            elems: [None; 3],
            compat: None,
        }
    }

    /// Bind the next element part.
    pub fn elem(mut self, opt: Opt, parse: ParseFn) -> Self {
        if let Some(slot) = self.elems.iter_mut().find(|e| e.is_none()) {
            *slot = Some(Elem { opt, parse });
        }
        self
    }

    pub fn compat(mut self, parse: ParseFn) -> Self {
        self.compat = Some(parse);
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn revision(mut self, revision: u8) -> Self {
        self.revision = revision;
        self
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    pub fn supports(&self, family: Family) -> bool {
        self.family == Family::Unspec || family == Family::Unspec || self.family == family
    }

    fn part(&self, index: usize) -> Result<Elem, ParseError> {
        self.elems[index].ok_or_else(|| {
            ParseError::Internal(format!("missing parser function for {}", self.name))
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    types: Vec<Arc<SetType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all set types known to this crate.
    pub fn builtin() -> Self {
        TypeRegistry {
            types: builtin_types().into_iter().map(Arc::new).collect(),
        }
    }

    /// Add a set type. Names and aliases must not clash with registered ones.
    pub fn register(&mut self, ty: SetType) -> Result<(), ParseError> {
        let clash = std::iter::once(&ty.name)
            .chain(ty.aliases.iter())
            .find(|n| self.get(n).is_some());
        if let Some(name) = clash {
            return Err(ParseError::Internal(format!(
                "set type {} is already registered",
                name
            )));
        }
        log::debug!("registered set type {} (dimension {})", ty.name, ty.dimension.count());
        self.types.push(Arc::new(ty));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SetType>> {
        self.types.iter().find(|t| t.matches(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SetType>> {
        self.types.iter()
    }
}

fn builtin_types() -> Vec<SetType> {
    use Dimension::*;
    vec![
        SetType::new("bitmap:ip", Family::Inet, One)
            .alias("ipmap")
            .elem(Opt::Ip, parse::parse_ip),
        SetType::new("bitmap:ip,mac", Family::Inet, Two)
            .alias("macipmap")
            .elem(Opt::Ip, parse::parse_single_ip)
            .elem(Opt::Ether, parse::parse_ether),
        SetType::new("bitmap:port", Family::Unspec, One)
            .alias("portmap")
            .elem(Opt::Port, parse::parse_tcp_port),
        SetType::new("hash:ip", Family::Unspec, One)
            .alias("iphash")
            .alias("iptree")
            .alias("iptreemap")
            .elem(Opt::Ip, parse::parse_ip4_single6)
            .compat(parse::parse_iptimeout),
        SetType::new("hash:net", Family::Unspec, One)
            .alias("nethash")
            .elem(Opt::Ip, parse::parse_ipnet),
        SetType::new("hash:ip,port", Family::Unspec, Two)
            .alias("ipporthash")
            .elem(Opt::Ip, parse::parse_ip4_single6)
            .elem(Opt::Port, parse::parse_proto_port),
        SetType::new("hash:ip,port,ip", Family::Unspec, Three)
            .alias("ipportiphash")
            .elem(Opt::Ip, parse::parse_ip4_single6)
            .elem(Opt::Port, parse::parse_proto_port)
            .elem(Opt::Ip2, parse::parse_single_ip),
        SetType::new("hash:ip,port,net", Family::Unspec, Three)
            .alias("ipportnethash")
            .elem(Opt::Ip, parse::parse_ip4_single6)
            .elem(Opt::Port, parse::parse_proto_port)
            .elem(Opt::Ip2, parse::parse_ipnet),
        SetType::new("hash:net,port", Family::Unspec, Two)
            .elem(Opt::Ip, parse::parse_ipnet)
            .elem(Opt::Port, parse::parse_proto_port),
        SetType::new("list:set", Family::Unspec, One)
            .alias("setlist")
            .elem(Opt::Name, parse::parse_setname)
            .compat(parse::parse_name_compat),
    ]
}

/// Look up a set type by name or alias and make it the session's active type.
pub fn parse_typename(session: &mut Session<'_>, opt: Opt, s: &str) -> Result<(), ParseError> {
    debug_assert_eq!(opt, Opt::TypeName);
    if s.len() > MAX_NAME_LEN - 1 {
        return Err(ParseError::syntax(format!(
            "typename '{}' is longer than {} characters",
            s,
            MAX_NAME_LEN - 1
        )));
    }
    let ty = session
        .registry()
        .get(s)
        .cloned()
        .ok_or_else(|| ParseError::syntax(format!("typename '{}' is unknown", s)))?;

    let data = session.data_mut();
    if data.test_flag(Opt::Family) && !ty.supports(data.family()) {
        return Err(ParseError::syntax(format!(
            "settype {} does not support family {}",
            ty.name,
            data.family().name()
        )));
    }
    let name = dup(&ty.name)?;
    parse::check_free(data, &[Opt::TypeName, Opt::Type])?;
    data.set(Opt::TypeName, Value::Str(name))?;
    data.set(Opt::Type, Value::Type(ty))
}

/// Parse a (multi-part) element according to the active set type.
///
/// With `optional`, trailing parts may be left out.
pub fn parse_elem(session: &mut Session<'_>, optional: bool, s: &str) -> Result<(), ParseError> {
    let ty = session
        .data()
        .set_type()
        .cloned()
        .ok_or_else(|| ParseError::Internal("set type is unknown!".to_string()))?;

    let (first, rest) = match Separator::Elem.split(s) {
        Some((a, b)) => (a, Some(b)),
        None => (s, None),
    };

    if ty.dimension > Dimension::One {
        if rest.is_none() && !optional {
            return Err(ParseError::MissingElement {
                which: "Second",
                elem: s.to_string(),
            });
        }
    } else if rest.is_some() {
        if let Some(compat) = ty.compat {
            log::debug!("compat parse of {} for {}", s, ty.name);
            return compat(session, ty.part(0)?.opt, s);
        }
        return Err(ParseError::UnsupportedElementSyntax {
            elem: s.to_string(),
            settype: ty.name.clone(),
        });
    }

    let (second, third) = match rest.map(|r| (r, Separator::Elem.split(r))) {
        Some((_, Some((b, c)))) => (Some(b), Some(c)),
        Some((r, None)) => (Some(r), None),
        None => (None, None),
    };

    if ty.dimension > Dimension::Two {
        if third.is_none() && !optional {
            return Err(ParseError::MissingElement {
                which: "Third",
                elem: s.to_string(),
            });
        }
    } else if third.is_some() {
        return Err(ParseError::TooManyElements {
            elem: s.to_string(),
            settype: ty.name.clone(),
            found: "Two",
            supported: "one",
        });
    }
    if third.is_some_and(|c| Separator::Elem.contained_in(c)) {
        return Err(ParseError::TooManyElements {
            elem: s.to_string(),
            settype: ty.name.clone(),
            found: "Three",
            supported: "two",
        });
    }

    let parts = [Some(first), second, third];
    for (index, part) in parts.into_iter().enumerate() {
        let Some(part) = part else { break };
        let elem = ty.part(index)?;
        log::debug!("parse elem part {}: {}", index + 1, part);
        (elem.parse)(session, elem.opt, part)?;
    }
    Ok(())
}
