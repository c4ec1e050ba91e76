//! # Network Discovery Service
//!
//! Implements the "sweep a subnet" use case.
//!
//! The service turns a [`Target`] into a range, runs the [`Sweeper`] over it
//! and returns the finalized snapshot. Which liveness check and resolver are
//! used is decided once, from [`Config`].

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use lansweep_common::config::{Config, ProbeMethod};
use lansweep_common::network::target::Target;
use lansweep_common::report::ScanSnapshot;
use lansweep_common::{info, warn};

use crate::probe::{LivenessCheck, LivenessProbe, PingCheck, TcpCheck};
use crate::resolver::{DnsResolver, NameResolver};
use crate::scanner::{OutcomeCallback, Sweeper};
use crate::system;

/// Application Service for Network Discovery.
///
/// Orchestrates the sweep by:
/// 1. resolving the [`Target`] into a concrete range.
/// 2. delegating the probing to the [`Sweeper`].
pub struct DiscoveryService {
    sweeper: Sweeper,
}

impl DiscoveryService {
    pub fn new(sweeper: Sweeper) -> Self {
        Self { sweeper }
    }

    /// Wires the probe stack described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let check: Arc<dyn LivenessCheck> = match config.method {
            ProbeMethod::Ping => Arc::new(PingCheck),
            ProbeMethod::Tcp => Arc::new(TcpCheck::new(config.tcp_ports.clone())),
        };

        let mut probe = LivenessProbe::new(check);
        if config.no_dns {
            info!("Reverse DNS disabled");
        } else if let Some(resolver) = DnsResolver::from_system(system::default_gateway()) {
            let resolver: Arc<dyn NameResolver> = Arc::new(resolver);
            probe = probe.with_resolver(resolver, config.dns_timeout);
        }

        Self::new(Sweeper::new(probe, config.concurrency, config.timeout))
    }

    pub fn with_progress(self, on_outcome: OutcomeCallback) -> Self {
        Self {
            sweeper: self.sweeper.on_outcome(on_outcome),
        }
    }

    pub fn sweeper(&self) -> &Sweeper {
        &self.sweeper
    }

    /// Sweeps `target` until done or until `cancel` fires.
    ///
    /// Fails only when the target cannot be resolved into a range.
    pub async fn perform_discovery(
        &self,
        target: Target,
        cancel: &CancellationToken,
    ) -> anyhow::Result<ScanSnapshot> {
        let range = target.resolve().context("resolving the sweep target")?;

        let hosts = range.host_count();
        info!(
            "Sweeping {range} ({hosts} hosts, {} at a time)",
            self.sweeper.concurrency()
        );
        if hosts > u64::from(u16::MAX) {
            warn!("{range} is large, this sweep will take a while");
        }

        let snapshot = self.sweeper.sweep(range, cancel).await?;
        Ok(snapshot)
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

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lansweep_common::network::outcome::ProbeError;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    struct OnlyGateway;

    #[async_trait]
    impl LivenessCheck for OnlyGateway {
        async fn check(&self, addr: Ipv4Addr, _timeout: Duration) -> Result<(), ProbeError> {
            if addr.octets()[3] == 1 {
                Ok(())
            } else {
                Err(ProbeError::Timeout)
            }
        }
    }

    fn service() -> DiscoveryService {
        let probe = LivenessProbe::new(Arc::new(OnlyGateway));
        DiscoveryService::new(Sweeper::new(probe, 16, Duration::from_millis(50)))
    }

    #[tokio::test]
    async fn discovers_hosts_of_explicit_network() {
        let target: Target = "192.168.7.0/29".parse().unwrap();
        let snapshot = service()
            .perform_discovery(target, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(snapshot.len(), 6);
        let up: Vec<Ipv4Addr> = snapshot.reachable().iter().map(|o| o.address()).collect();
        assert_eq!(up, vec![Ipv4Addr::new(192, 168, 7, 1)]);
    }

    #[tokio::test]
    async fn single_host_target() {
        let target: Target = "10.1.1.1".parse().unwrap();
        let snapshot = service()
            .perform_discovery(target, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.summary().reachable, 1);
    }

    #[test]
    fn config_wires_sweeper_limits() {
        let config = Config {
            concurrency: 0,
            timeout: Duration::from_millis(250),
            no_dns: true,
            ..Config::default()
        };
        let service = DiscoveryService::from_config(&config);
        assert_eq!(service.sweeper().concurrency(), 1);
        assert_eq!(service.sweeper().timeout(), Duration::from_millis(250));
    }
}
