//! # Probe Outcome
//!
//! The result of probing one address. An outcome is either reachable (with a
//! hostname, possibly [`Hostname::Unknown`]) or unreachable with the cause.
//! The two states are separate enum variants so a reachable outcome can never
//! carry an error.

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use thiserror::Error;

/// Sentinel printed when reverse resolution did not produce a name.
pub const UNKNOWN_HOSTNAME: &str = "unknown";

/// Why a probe did not reach its host.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum ProbeError {
    #[error("timeout")]
    Timeout,

    #[error("connection refused")]
    Refused,

    #[error("host unreachable")]
    Unreachable,

    #[error("probe failed: {0}")]
    Failed(String),

    #[error("probe aborted: {0}")]
    Aborted(String),
}

/// Coarse classification of [`ProbeError`] used for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProbeErrorKind {
    Timeout,
    Refused,
    Unreachable,
    Failed,
    Aborted,
}

impl ProbeError {
    pub fn kind(&self) -> ProbeErrorKind {
        match self {
            ProbeError::Timeout => ProbeErrorKind::Timeout,
            ProbeError::Refused => ProbeErrorKind::Refused,
            ProbeError::Unreachable => ProbeErrorKind::Unreachable,
            ProbeError::Failed(_) => ProbeErrorKind::Failed,
            ProbeError::Aborted(_) => ProbeErrorKind::Aborted,
        }
    }
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProbeErrorKind::Timeout => "timeout",
            ProbeErrorKind::Refused => "refused",
            ProbeErrorKind::Unreachable => "unreachable",
            ProbeErrorKind::Failed => "failed",
            ProbeErrorKind::Aborted => "aborted",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Hostname {
    Resolved(String),
    #[default]
    Unknown,
}

impl Hostname {
    pub fn as_str(&self) -> &str {
        match self {
            Hostname::Resolved(name) => name,
            Hostname::Unknown => UNKNOWN_HOSTNAME,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Hostname::Resolved(_))
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Reachable { hostname: Hostname, rtt: Duration },
    Unreachable(ProbeError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    address: Ipv4Addr,
    status: ProbeStatus,
}

impl ProbeOutcome {
    pub fn reachable(address: Ipv4Addr, hostname: Hostname, rtt: Duration) -> Self {
        Self {
            address,
            status: ProbeStatus::Reachable { hostname, rtt },
        }
    }

    pub fn unreachable(address: Ipv4Addr, error: ProbeError) -> Self {
        Self {
            address,
            status: ProbeStatus::Unreachable(error),
        }
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn status(&self) -> &ProbeStatus {
        &self.status
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self.status, ProbeStatus::Reachable { .. })
    }

    /// Resolved name, or [`Hostname::Unknown`] for unreachable hosts.
    pub fn hostname(&self) -> &Hostname {
        static UNKNOWN: Hostname = Hostname::Unknown;
        match &self.status {
            ProbeStatus::Reachable { hostname, .. } => hostname,
            ProbeStatus::Unreachable(_) => &UNKNOWN,
        }
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match &self.status {
            ProbeStatus::Reachable { .. } => None,
            ProbeStatus::Unreachable(err) => Some(err),
        }
    }

    pub fn rtt(&self) -> Option<Duration> {
        match &self.status {
            ProbeStatus::Reachable { rtt, .. } => Some(*rtt),
            ProbeStatus::Unreachable(_) => None,
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
