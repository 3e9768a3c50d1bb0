//! # ipset-args: argument parsing core for ipset
//!
//! Turns the textual arguments of an ipset command (addresses, networks,
//! ranges, ports, protocols, ICMP type/codes, MAC addresses, set names,
//! timeouts) into a typed attribute store that a netlink encoder serialises
//! for the kernel.
//!
//! ## Pieces
//!
//! - [`SessionData`]: option kind → typed [`Value`], with a set-bit per option
//!   so that an option given twice is rejected
//! - [`number`]: bounded integers with `0x`/octal detection
//! - [`separator`]: `/ - , :` lookup that ignores separators at token edges
//! - [`parse`]: one parser per field kind, all of shape [`ParseFn`]
//! - [`types`]: set type descriptors and [`parse_elem`], which splits
//!   `part,part[,part]` and routes each part to the parser bound by the type
//!
//! ## Element syntax
//!
//! ```text
//! hash:ip            192.0.2.1 | 192.0.2.0/24 | 192.0.2.1-192.0.2.9
//! hash:ip,port       192.0.2.1,udp:53 | 192.0.2.1,80-90 | 192.0.2.1,icmp:ping
//! hash:ip,port,net   192.0.2.1,tcp:443,10.0.0.0/8
//! bitmap:ip,mac      192.0.2.1,00:11:22:33:44:55
//! list:set           myset | myset,before,otherset
//! ```
//!
//! ## Usage
//!
//! ```
//! use ipset_args::{parse_elem, parse_typename, Opt, Session, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::builtin();
//! let mut session = Session::new(&registry);
//! parse_typename(&mut session, Opt::TypeName, "hash:ip,port").unwrap();
//! parse_elem(&mut session, false, "192.0.2.1,udp:53").unwrap();
//! assert_eq!(session.data().get(Opt::Port), Some(&Value::U16(53)));
//! ```

pub mod data;
pub mod error;
pub mod icmp;
pub mod netdb;
pub mod number;
pub mod parse;
pub mod resolve;
pub mod separator;
pub mod session;
pub mod types;
pub mod value;

pub use data::{Family, Opt, SessionData};
pub use error::{ErrorKind, ParseError};
pub use netdb::{FileNetdb, Netdb, StaticNetdb};
pub use parse::{call_parser, Handler, ParseFn};
pub use resolve::{Resolver, StaticResolver, SystemResolver};
pub use session::{OutputMode, Session};
pub use types::{parse_elem, parse_typename, Dimension, SetType, TypeRegistry};
pub use value::Value;
