//! Identity of the machine running the sweep.

use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

/// Placeholder printed for identity fields that could not be determined.
pub const NOT_FOUND: &str = "Not found";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalIdentity {
    pub hostname: Option<String>,
    pub ip: Option<Ipv4Addr>,
    pub mac: Option<MacAddr>,
    pub gateway: Option<Ipv4Addr>,
    pub os: String,
}

/// Renders an optional identity field, falling back to [`NOT_FOUND`].
pub struct OrNotFound<'a, T>(pub &'a Option<T>);

impl<T: fmt::Display> fmt::Display for OrNotFound<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str(NOT_FOUND),
        }
    }
}

pub trait SystemRepository {
    /// Collects the local identity. Never fails: unknown fields are `None`.
    fn local_identity(&self) -> LocalIdentity;
}
