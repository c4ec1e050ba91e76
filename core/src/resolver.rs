//! Reverse (PTR) name resolution for reachable hosts.

use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU16, Ordering};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use tokio::net::UdpSocket;
use tracing::debug;

use lansweep_common::warn;
use lansweep_protocols::dns::{self, DNS_PORT};

const RESOLV_CONF: &str = "/etc/resolv.conf";
const MAX_DNS_PACKET: usize = 512;

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Returns the PTR name of `addr` without the trailing dot.
    async fn reverse(&self, addr: Ipv4Addr) -> anyhow::Result<String>;
}

pub struct DnsResolver {
    server: SocketAddr,
    id_counter: AtomicU16,
}

impl DnsResolver {
    pub fn new(server: IpAddr) -> Self {
        Self::with_socket(SocketAddr::new(server, DNS_PORT))
    }

    pub fn with_socket(server: SocketAddr) -> Self {
        Self {
            server,
            id_counter: AtomicU16::new(rand::random::<u16>()),
        }
    }

    /// Picks the system nameserver, falling back to the default gateway.
    ///
    /// Returns `None` when neither is known; callers then skip naming.
    pub fn from_system(gateway: Option<Ipv4Addr>) -> Option<Self> {
        let configured = fs::read_to_string(RESOLV_CONF)
            .ok()
            .and_then(|contents| nameserver_from(&contents));

        match configured.or(gateway) {
            Some(server) => {
                debug!(%server, "using DNS server for reverse lookups");
                Some(Self::new(IpAddr::V4(server)))
            }
            None => {
                warn!("No DNS server found, hostnames will not be resolved");
                None
            }
        }
    }

    fn get_next_trans_id(&self) -> u16 {
        self.id_counter.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl NameResolver for DnsResolver {
    async fn reverse(&self, addr: Ipv4Addr) -> anyhow::Result<String> {
        let id = self.get_next_trans_id();
        let query = dns::create_ptr_packet(&addr, id)?;

        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
            .await
            .context("binding DNS socket")?;
        socket
            .connect(self.server)
            .await
            .with_context(|| format!("connecting to {}", self.server))?;
        socket.send(&query).await.context("sending PTR query")?;

        let mut buf = [0u8; MAX_DNS_PACKET];
        loop {
            let len = socket.recv(&mut buf).await.context("receiving PTR answer")?;
            let (response_id, hostname) = match dns::get_hostname(&buf[..len]) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!(%addr, "ignoring malformed DNS answer: {e:#}");
                    continue;
                }
            };
            // Stray answers to earlier queries may still arrive on a reused port.
            if response_id != id {
                continue;
            }
            let name = hostname.ok_or_else(|| anyhow!("no PTR record for {addr}"))?;
            return Ok(name.trim_end_matches('.').to_string());
        }
    }
}

/// First IPv4 `nameserver` entry of a resolv.conf.
pub fn nameserver_from(contents: &str) -> Option<Ipv4Addr> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with(';'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("nameserver") => fields.next()?.parse::<Ipv4Addr>().ok(),
                _ => None,
            }
        })
        .next()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
