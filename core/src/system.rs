use std::net::Ipv4Addr;
#[cfg(any(target_os = "macos", target_os = "windows"))]
use std::process::Command;

use tracing::debug;

use lansweep_common::network::interface;
use lansweep_common::system::{LocalIdentity, SystemRepository};

pub struct SystemRepo;

impl SystemRepository for SystemRepo {
    fn local_identity(&self) -> LocalIdentity {
        let hostname = sys_info::hostname()
            .inspect_err(|e| debug!("hostname lookup failed: {e}"))
            .ok();

        let ip = interface::outbound_ipv4()
            .inspect_err(|e| debug!("outbound address lookup failed: {e}"))
            .ok();

        let mac = ip
            .and_then(interface::interface_for)
            .and_then(|intf| intf.mac);

        LocalIdentity {
            hostname,
            ip,
            mac,
            gateway: default_gateway(),
            os: std::env::consts::OS.to_string(),
        }
    }
}

/// IPv4 address of the default route's next hop, if the OS tells us.
pub fn default_gateway() -> Option<Ipv4Addr> {
    #[cfg(target_os = "linux")]
    {
        let table = std::fs::read_to_string("/proc/net/route").ok()?;
        parse_proc_net_route(&table)
    }

    #[cfg(target_os = "macos")]
    {
        let output = Command::new("route").args(["-n", "get", "default"]).output().ok()?;
        parse_route_get(&String::from_utf8_lossy(&output.stdout))
    }

    #[cfg(target_os = "windows")]
    {
        let output = Command::new("ipconfig").output().ok()?;
        parse_ipconfig(&String::from_utf8_lossy(&output.stdout))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        None
    }
}

/// Reads the default route out of `/proc/net/route`.
///
/// Addresses in that table are hex in host (little-endian) byte order.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_proc_net_route(table: &str) -> Option<Ipv4Addr> {
    table.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (destination, gateway) = (fields.get(1)?, fields.get(2)?);
        if *destination != "00000000" {
            return None;
        }
        let raw = u32::from_str_radix(gateway, 16).ok()?;
        let addr = Ipv4Addr::from(raw.to_le_bytes());
        (!addr.is_unspecified()).then_some(addr)
    })
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_route_get(output: &str) -> Option<Ipv4Addr> {
    output.lines().find_map(|line| {
        let value = line.trim().strip_prefix("gateway:")?;
        value.trim().parse().ok()
    })
}

/// The gateway value may sit on the label line or, after an IPv6 gateway,
/// on the continuation line below it.
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
fn parse_ipconfig(output: &str) -> Option<Ipv4Addr> {
    let lines: Vec<&str> = output.lines().collect();
    lines.iter().enumerate().find_map(|(i, line)| {
        if !line.contains("Default Gateway") {
            return None;
        }
        let inline = line.split_once(':').map(|(_, value)| value.trim());
        let next = lines.get(i + 1).map(|l| l.trim());
        [inline, next]
            .into_iter()
            .flatten()
            .find_map(|value| value.parse::<Ipv4Addr>().ok())
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
