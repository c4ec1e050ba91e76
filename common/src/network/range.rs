//! # IPv4 Network Range
//!
//! A [`NetworkRange`] is a normalized IPv4 network (base address + prefix
//! length). It is the only input the sweep accepts and is immutable once built.
//!
//! Host enumeration follows standard subnetting: the network and broadcast
//! addresses are skipped for prefixes shorter than /31, a /31 yields both of its
//! addresses and a /32 yields the single address.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::RangeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkRange {
    network: Ipv4Network,
}

impl NetworkRange {
    /// Builds a range from any address inside the network.
    ///
    /// `192.168.1.77/24` is normalized to `192.168.1.0/24`.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self, RangeError> {
        let raw = Ipv4Network::new(addr, prefix).map_err(|_| RangeError::InvalidPrefix(prefix))?;
        let network = Ipv4Network::new(raw.network(), prefix)
            .map_err(|_| RangeError::InvalidPrefix(prefix))?;
        Ok(Self { network })
    }

    pub fn network_addr(&self) -> Ipv4Addr {
        self.network.network()
    }

    pub fn broadcast_addr(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.network.contains(addr)
    }

    /// Number of usable host addresses, computed without iterating.
    pub fn host_count(&self) -> u64 {
        let (first, last) = self.host_bounds();
        last - first + 1
    }

    /// Lazy, ascending iterator over every usable host address.
    ///
    /// Each call starts over from the first host.
    pub fn hosts(&self) -> HostIter {
        let (first, last) = self.host_bounds();
        HostIter { next: first, last }
    }

    fn host_bounds(&self) -> (u64, u64) {
        let network = u64::from(u32::from(self.network_addr()));
        let broadcast = u64::from(u32::from(self.broadcast_addr()));
        match self.prefix() {
            31 | 32 => (network, broadcast),
            _ => (network + 1, broadcast - 1),
        }
    }
}

impl fmt::Display for NetworkRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_addr(), self.prefix())
    }
}

impl FromStr for NetworkRange {
    type Err = RangeError;

    /// Parses `a.b.c.d/p`. A bare address is treated as a /32.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr_str, prefix_str) = s.split_once('/').unwrap_or((s, "32"));

        let addr = addr_str
            .parse::<Ipv4Addr>()
            .map_err(|_| RangeError::InvalidAddress(addr_str.to_string()))?;

        let prefix = prefix_str.parse::<u8>().map_err(|e| RangeError::Malformed {
            input: s.to_string(),
            reason: format!("invalid prefix '{prefix_str}': {e}"),
        })?;

        Self::new(addr, prefix)
    }
}

/// Iterator returned by [`NetworkRange::hosts`].
#[derive(Debug, Clone)]
pub struct HostIter {
    next: u64,
    last: u64,
}

impl Iterator for HostIter {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }
        let addr = Ipv4Addr::from(self.next as u32);
        self.next += 1;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.last + 1).saturating_sub(self.next);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
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

#[cfg(test)]
mod tests {
    use super::*;

    fn range(s: &str) -> NetworkRange {
        s.parse().unwrap()
    }

    #[test]
    fn new_normalizes_to_network_address() {
        let range = NetworkRange::new(Ipv4Addr::new(192, 168, 1, 77), 24).unwrap();
        assert_eq!(range.network_addr(), Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(range.broadcast_addr(), Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(range.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn new_rejects_prefix_over_32() {
        let result = NetworkRange::new(Ipv4Addr::new(10, 0, 0, 1), 33);
        assert_eq!(result, Err(RangeError::InvalidPrefix(33)));
    }

    #[test]
    fn slash_30_yields_two_hosts() {
        let hosts: Vec<Ipv4Addr> = range("192.168.1.0/30").hosts().collect();
        assert_eq!(
            hosts,
            vec![Ipv4Addr::new(192, 168, 1, 1), Ipv4Addr::new(192, 168, 1, 2)]
        );
    }

    #[test]
    fn slash_31_keeps_both_addresses() {
        let hosts: Vec<Ipv4Addr> = range("10.0.0.6/31").hosts().collect();
        assert_eq!(hosts, vec![Ipv4Addr::new(10, 0, 0, 6), Ipv4Addr::new(10, 0, 0, 7)]);
    }

    #[test]
    fn slash_32_yields_single_address() {
        let hosts: Vec<Ipv4Addr> = range("172.16.0.9/32").hosts().collect();
        assert_eq!(hosts, vec![Ipv4Addr::new(172, 16, 0, 9)]);
        assert_eq!(range("172.16.0.9").host_count(), 1);
    }

    #[test]
    fn host_count_matches_subnetting_formula() {
        for prefix in 0..=30u8 {
            let range = NetworkRange::new(Ipv4Addr::new(10, 1, 2, 3), prefix).unwrap();
            assert_eq!(range.host_count(), (1u64 << (32 - prefix)) - 2, "prefix /{prefix}");
        }
    }

    #[test]
    fn hosts_are_strictly_ascending_and_complete() {
        for prefix in 16..=30u8 {
            let range = NetworkRange::new(Ipv4Addr::new(192, 168, 0, 0), prefix).unwrap();
            let hosts: Vec<u32> = range.hosts().map(u32::from).collect();
            assert_eq!(hosts.len() as u64, range.host_count());
            assert!(hosts.windows(2).all(|w| w[0] < w[1]));
            assert!(hosts.iter().all(|h| range.contains(Ipv4Addr::from(*h))));
        }
    }

    #[test]
    fn hosts_is_restartable() {
        let range = range("10.0.0.0/29");
        let first: Vec<Ipv4Addr> = range.hosts().collect();
        let second: Vec<Ipv4Addr> = range.hosts().collect();
        assert_eq!(first, second);
        assert_eq!(range.hosts().size_hint(), (6, Some(6)));
    }

    #[test]
    fn whole_internet_is_lazy() {
        let range = range("0.0.0.0/0");
        assert_eq!(range.host_count(), u64::from(u32::MAX) - 1);
        assert_eq!(range.hosts().next(), Some(Ipv4Addr::new(0, 0, 0, 1)));
    }

    #[test]
    fn from_str_errors() {
        assert!(matches!(
            "300.1.1.1/24".parse::<NetworkRange>(),
            Err(RangeError::InvalidAddress(_))
        ));
        assert!(matches!(
            "10.0.0.0/abc".parse::<NetworkRange>(),
            Err(RangeError::Malformed { .. })
        ));
        assert_eq!(
            "10.0.0.0/40".parse::<NetworkRange>(),
            Err(RangeError::InvalidPrefix(40))
        );
    }
}
