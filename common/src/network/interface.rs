use std::net::{IpAddr, Ipv4Addr, SocketAddr, UdpSocket};

use pnet::datalink::{self, NetworkInterface};

use crate::error::RangeError;
use crate::network::range::NetworkRange;
use crate::utils::interface::NetworkInterfaceExtension;

/// Prefix assumed for the local network when none is given.
pub const LAN_PREFIX: u8 = 24;

/// Public address used only to let the kernel pick a route. No packet is sent.
const ROUTE_PROBE_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), 80);

/// Returns the IPv4 address the kernel would use for outbound traffic.
pub fn outbound_ipv4() -> Result<Ipv4Addr, RangeError> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .map_err(|e| RangeError::NoLocalAddress(e.to_string()))?;
    socket
        .connect(ROUTE_PROBE_ADDR)
        .map_err(|e| RangeError::NoLocalAddress(format!("no route to {ROUTE_PROBE_ADDR}: {e}")))?;

    match socket.local_addr() {
        Ok(SocketAddr::V4(local)) if !local.ip().is_unspecified() => Ok(*local.ip()),
        Ok(other) => Err(RangeError::NoLocalAddress(format!("unusable local address {other}"))),
        Err(e) => Err(RangeError::NoLocalAddress(e.to_string())),
    }
}

/// Derives the network to sweep from the outbound address, assuming a /24.
pub fn get_lan_network() -> Result<NetworkRange, RangeError> {
    let local_ip = outbound_ipv4()?;
    NetworkRange::new(local_ip, LAN_PREFIX)
}

/// Finds the interface that owns `addr`.
pub fn interface_for(addr: Ipv4Addr) -> Option<NetworkInterface> {
    find_owner(datalink::interfaces(), addr)
}

fn find_owner(interfaces: Vec<NetworkInterface>, addr: Ipv4Addr) -> Option<NetworkInterface> {
    interfaces.into_iter().find(|intf| intf.has_ipv4(addr))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
