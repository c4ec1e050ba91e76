//! # Liveness Probe
//!
//! A [`LivenessCheck`] answers one question: did this address respond?
//! [`LivenessProbe`] wraps a check with everything the scheduler relies on:
//!
//! 1. **Hard timeout**: the check is dropped once the limit elapses, whatever it was doing.
//! 2. **Naming**: reachable hosts get a best-effort reverse lookup with its own short timeout.
//! 3. **No escaping errors**: every failure ends up inside the returned [`ProbeOutcome`].

use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Instant};
use tracing::debug;

use lansweep_common::network::outcome::{Hostname, ProbeError, ProbeOutcome};

use crate::resolver::NameResolver;

mod ping;
mod tcp;

pub use ping::PingCheck;
pub use tcp::TcpCheck;

/// A single reachability check against one address.
#[async_trait]
pub trait LivenessCheck: Send + Sync {
    /// Returns `Ok(())` when the host answered.
    ///
    /// `timeout` is advisory (e.g. passed on to a child process);
    /// [`LivenessProbe`] enforces it regardless.
    async fn check(&self, addr: Ipv4Addr, timeout: Duration) -> Result<(), ProbeError>;
}

#[derive(Clone)]
pub struct LivenessProbe {
    check: Arc<dyn LivenessCheck>,
    resolver: Option<Arc<dyn NameResolver>>,
    dns_timeout: Duration,
}

impl LivenessProbe {
    pub fn new(check: Arc<dyn LivenessCheck>) -> Self {
        Self {
            check,
            resolver: None,
            dns_timeout: Duration::ZERO,
        }
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn NameResolver>, dns_timeout: Duration) -> Self {
        self.resolver = Some(resolver);
        self.dns_timeout = dns_timeout;
        self
    }

    pub async fn probe(&self, addr: Ipv4Addr, timeout: Duration) -> ProbeOutcome {
        let started = Instant::now();

        let checked = match time::timeout(timeout, self.check.check(addr, timeout)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ProbeError::Timeout),
        };

        match checked {
            Ok(()) => {
                let rtt = started.elapsed();
                let hostname = self.resolve(addr).await;
                debug!(%addr, ?rtt, %hostname, "host is up");
                ProbeOutcome::reachable(addr, hostname, rtt)
            }
            Err(err) => {
                debug!(%addr, %err, "host did not respond");
                ProbeOutcome::unreachable(addr, err)
            }
        }
    }

    async fn resolve(&self, addr: Ipv4Addr) -> Hostname {
        let Some(resolver) = &self.resolver else {
            return Hostname::Unknown;
        };

        match time::timeout(self.dns_timeout, resolver.reverse(addr)).await {
            Ok(Ok(name)) if !name.is_empty() => Hostname::Resolved(name),
            Ok(Ok(_)) => Hostname::Unknown,
            Ok(Err(e)) => {
                debug!(%addr, "reverse lookup failed: {e:#}");
                Hostname::Unknown
            }
            Err(_elapsed) => {
                debug!(%addr, "reverse lookup timed out");
                Hostname::Unknown
            }
        }
    }
}

/// Maps a socket error onto the probe taxonomy.
pub fn probe_error_from_io(err: &io::Error) -> ProbeError {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => ProbeError::Refused,
        io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => ProbeError::Unreachable,
        io::ErrorKind::TimedOut => ProbeError::Timeout,
        _ => ProbeError::Failed(err.to_string()),
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
