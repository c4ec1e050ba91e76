//! # Sweep Target
//!
//! Parses what the caller asked to sweep. A target is either:
//! * The local LAN (`lan`), derived from the outbound IPv4 address with an assumed /24.
//! * A CIDR block (e.g. `192.168.1.0/24`).
//! * A single IPv4 address, swept as a /32.

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::RangeError;
use crate::network::interface;
use crate::network::range::NetworkRange;
use crate::info;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Target {
    /// The network of the interface used for outbound traffic.
    #[default]
    LAN,
    /// An explicit network, already normalized.
    Network { range: NetworkRange },
    /// A single address.
    Host { target_addr: Ipv4Addr },
}

impl FromStr for Target {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if trimmed.eq_ignore_ascii_case("lan") {
            return Ok(Target::LAN);
        }

        if let Ok(target_addr) = trimmed.parse::<Ipv4Addr>() {
            return Ok(Target::Host { target_addr });
        }

        if trimmed.contains('/') {
            let range = trimmed.parse::<NetworkRange>()?;
            return Ok(Target::Network { range });
        }

        Err(RangeError::Malformed {
            input: trimmed.to_string(),
            reason: "expected 'lan', an IPv4 address or a CIDR block".to_string(),
        })
    }
}

impl Target {
    /// Turns the target into the range to sweep.
    ///
    /// Resolving [`Target::LAN`] touches the OS routing table and may fail.
    pub fn resolve(self) -> Result<NetworkRange, RangeError> {
        match self {
            Target::LAN => {
                let range = interface::get_lan_network()?;
                info!("Local network detected as {range}");
                Ok(range)
            }
            Target::Network { range } => Ok(range),
            Target::Host { target_addr } => NetworkRange::new(target_addr, 32),
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
