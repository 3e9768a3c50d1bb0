//! Per-command parse session.
//!
//! A [`Session`] owns the [`SessionData`] of one command, collects non-fatal
//! warnings, and borrows the read-only collaborators the parsers consult:
//! the set type registry, the hostname resolver and the protocol/service
//! database.

use crate::data::SessionData;
use crate::netdb::{Netdb, StaticNetdb};
use crate::resolve::{Resolver, SystemResolver};
use crate::types::TypeRegistry;

/// Listing format selected with `-output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Plain,
    Xml,
    Save,
}

static SYSTEM_RESOLVER: SystemResolver = SystemResolver;
static STATIC_NETDB: StaticNetdb = StaticNetdb;

pub struct Session<'a> {
    data: SessionData,
    warnings: Vec<String>,
    output: OutputMode,
    registry: &'a TypeRegistry,
    resolver: &'a dyn Resolver,
    netdb: &'a dyn Netdb,
}

impl<'a> Session<'a> {
    /// Session using the system resolver and the built-in netdb tables.
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Session {
            data: SessionData::new(),
            warnings: Vec::new(),
            output: OutputMode::default(),
            registry,
            resolver: &SYSTEM_RESOLVER,
            netdb: &STATIC_NETDB,
        }
    }

    pub fn with_resolver(mut self, resolver: &'a dyn Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_netdb(mut self, netdb: &'a dyn Netdb) -> Self {
        self.netdb = netdb;
        self
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut SessionData {
        &mut self.data
    }

    /// Hand the collected attributes to the encoder, ending the session.
    pub fn into_data(self) -> SessionData {
        self.data
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    pub fn resolver(&self) -> &'a dyn Resolver {
        self.resolver
    }

    pub fn netdb(&self) -> &'a dyn Netdb {
        self.netdb
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }

    pub fn set_output(&mut self, mode: OutputMode) {
        self.output = mode;
    }

    /// Record a non-fatal diagnostic.
    pub fn warn(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::warn!("{}", msg);
        self.warnings.push(msg);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
