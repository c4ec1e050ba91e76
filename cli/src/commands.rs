pub mod discover;
pub mod info;

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};

use lansweep_common::config::{
    Config, DEFAULT_CONCURRENCY, DEFAULT_REPORT_FILE, DEFAULT_TCP_PORTS, MAX_CONCURRENCY,
    ProbeMethod,
};
use lansweep_common::network::target::Target;

#[derive(Parser)]
#[command(name = "lansweep")]
#[command(version, about = "A bounded-concurrency IPv4 subnet sweeper.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show networking information about this device
    #[command(alias = "i")]
    Info,
    /// Sweep a network for live hosts
    #[command(alias = "d")]
    Discover(DiscoverArgs),
}

#[derive(Args)]
pub struct DiscoverArgs {
    /// `lan`, a CIDR block (192.168.1.0/24) or a single address. Defaults to the local /24.
    pub target: Option<Target>,

    /// Maximum number of probes in flight
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_CONCURRENCY as u64)
    )]
    pub concurrency: usize,

    /// Per-host probe timeout in milliseconds
    #[arg(short, long = "timeout-ms", default_value_t = 1_000)]
    pub timeout_ms: u64,

    /// Liveness check: `ping` (system ping) or `tcp` (connect to --ports)
    #[arg(short, long, default_value = "ping")]
    pub method: ProbeMethod,

    /// Ports tried by the tcp method
    #[arg(short, long, value_delimiter = ',', default_values_t = DEFAULT_TCP_PORTS.to_vec())]
    pub ports: Vec<u16>,

    /// Skip reverse DNS lookups
    #[arg(long)]
    pub no_dns: bool,

    /// Reverse DNS timeout in milliseconds
    #[arg(long = "dns-timeout-ms", default_value_t = 500)]
    pub dns_timeout_ms: u64,

    /// Report file the results are appended to
    #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
    pub output: PathBuf,

    /// Also list unreachable hosts in the report file
    #[arg(long)]
    pub all: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl DiscoverArgs {
    pub fn to_config(&self) -> Config {
        Config {
            concurrency: self.concurrency,
            timeout: Duration::from_millis(self.timeout_ms),
            method: self.method,
            tcp_ports: self.ports.clone(),
            no_dns: self.no_dns,
            dns_timeout: Duration::from_millis(self.dns_timeout_ms),
            output: self.output.clone(),
            include_unreachable: self.all,
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
