use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 50;
pub const MAX_CONCURRENCY: usize = 4096;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_DNS_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_TCP_PORTS: &[u16] = &[22, 80, 139, 443, 445];
pub const DEFAULT_REPORT_FILE: &str = "sweep_report.txt";

/// How a single host is checked for liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMethod {
    /// One ICMP echo through the system `ping` binary.
    #[default]
    Ping,
    /// TCP connect against a list of ports.
    Tcp,
}

impl FromStr for ProbeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ping" | "icmp" => Ok(ProbeMethod::Ping),
            "tcp" => Ok(ProbeMethod::Tcp),
            other => Err(format!("unknown probe method '{other}' (expected 'ping' or 'tcp')")),
        }
    }
}

pub struct Config {
    /// Maximum number of probes in flight at once.
    pub concurrency: usize,

    /// Hard limit for one liveness check. Identical for every host of a sweep.
    pub timeout: Duration,

    pub method: ProbeMethod,

    /// Ports tried by [`ProbeMethod::Tcp`].
    pub tcp_ports: Vec<u16>,

    /// Disables reverse-name lookups. Every hostname is reported as unknown.
    pub no_dns: bool,

    pub dns_timeout: Duration,

    /// File the text report is appended to.
    pub output: PathBuf,

    /// Also list unreachable hosts in the report file.
    pub include_unreachable: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout: DEFAULT_TIMEOUT,
            method: ProbeMethod::default(),
            tcp_ports: DEFAULT_TCP_PORTS.to_vec(),
            no_dns: false,
            dns_timeout: DEFAULT_DNS_TIMEOUT,
            output: PathBuf::from(DEFAULT_REPORT_FILE),
            include_unreachable: false,
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

    #[test]
    fn probe_method_parsing() {
        assert_eq!("ping".parse::<ProbeMethod>(), Ok(ProbeMethod::Ping));
        assert_eq!("ICMP".parse::<ProbeMethod>(), Ok(ProbeMethod::Ping));
        assert_eq!("tcp".parse::<ProbeMethod>(), Ok(ProbeMethod::Tcp));
        assert!("arp".parse::<ProbeMethod>().is_err());
    }
}
