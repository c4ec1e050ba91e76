use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::task::JoinSet;
use tokio::time;

use lansweep_common::config::DEFAULT_TCP_PORTS;
use lansweep_common::network::outcome::ProbeError;

use super::{LivenessCheck, probe_error_from_io};

/// Headroom left to report the best failure before the probe's own timeout fires.
const REPORT_MARGIN: Duration = Duration::from_millis(50);

/// Host is up if any of `ports` accepts a TCP handshake.
///
/// All ports are tried at once. The first accepted connection wins and
/// the remaining attempts are aborted with the `JoinSet`.
#[derive(Debug, Clone)]
pub struct TcpCheck {
    ports: Vec<u16>,
}

impl TcpCheck {
    pub fn new(ports: Vec<u16>) -> Self {
        Self { ports }
    }
}

impl Default for TcpCheck {
    fn default() -> Self {
        Self::new(DEFAULT_TCP_PORTS.to_vec())
    }
}

#[async_trait]
impl LivenessCheck for TcpCheck {
    async fn check(&self, addr: Ipv4Addr, timeout: Duration) -> Result<(), ProbeError> {
        let attempts = self.ports.iter().map(move |&port| async move {
            TcpStream::connect(SocketAddrV4::new(addr, port))
                .await
                .map(drop)
                .map_err(|e| probe_error_from_io(&e))
        });
        first_success(attempts, connect_deadline(timeout)).await
    }
}

/// Connects give up slightly before `timeout` so a filtered port cannot hide
/// a refusal seen on another one.
fn connect_deadline(timeout: Duration) -> Duration {
    timeout.saturating_sub(REPORT_MARGIN.min(timeout / 4))
}

/// Runs every attempt concurrently, each bounded by `deadline`.
///
/// Returns on the first success, otherwise the most telling failure.
async fn first_success<I, F>(attempts: I, deadline: Duration) -> Result<(), ProbeError>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<(), ProbeError>> + Send + 'static,
{
    let mut running = JoinSet::new();
    for attempt in attempts {
        running.spawn(async move {
            time::timeout(deadline, attempt)
                .await
                .unwrap_or(Err(ProbeError::Timeout))
        });
    }

    let mut worst: Option<ProbeError> = None;
    while let Some(joined) = running.join_next().await {
        let err = match joined {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(err)) => err,
            Err(join_err) => ProbeError::Failed(join_err.to_string()),
        };
        worst = Some(match worst {
            Some(prev) if rank(&prev) >= rank(&err) => prev,
            _ => err,
        });
    }

    Err(worst.unwrap_or(ProbeError::Timeout))
}

/// Higher is more telling. A refusal proves the host exists.
fn rank(err: &ProbeError) -> u8 {
    match err {
        ProbeError::Refused => 4,
        ProbeError::Unreachable => 3,
        ProbeError::Failed(_) | ProbeError::Aborted(_) => 2,
        ProbeError::Timeout => 1,
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
